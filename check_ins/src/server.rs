use crate::{api, CheckInStore, Result};
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;

pub struct ApiServer {
    pub socket_addr: SocketAddr,
    app: Router,
}

impl ApiServer {
    pub fn new<S: CheckInStore>(
        socket_addr: SocketAddr,
        store: S,
        base_url: Option<&str>,
    ) -> Self {
        Self {
            socket_addr,
            app: api::router(store, base_url),
        }
    }

    pub async fn run(self, shutdown: triggered::Listener) -> Result {
        let listener = TcpListener::bind(self.socket_addr).await?;
        tracing::info!(addr = %self.socket_addr, "starting api server");
        let result = axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await;
        tracing::info!("stopping api server");
        result.map_err(crate::Error::from)
    }
}
