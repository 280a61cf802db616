mod check_ins;
mod page;

pub use check_ins::{
    create_check_in, CheckInId, delete_check_in, get_check_in, list_check_ins, override_check_in,
    update_check_in,
};

use crate::CheckInStore;
use axum::{
    body::Body,
    http::{header, Request},
    routing::get,
    Router,
};
use std::sync::Arc;

pub const CHECK_INS_PATH: &str = "/check-ins";

#[derive(Clone)]
pub struct ApiState<S> {
    pub store: S,
    /// Absolute or path-relative URL of the list endpoint, used to build
    /// pagination links
    pub list_url: Arc<str>,
}

impl<S> ApiState<S> {
    pub fn new(store: S, base_url: Option<&str>) -> Self {
        let base = base_url.unwrap_or_default().trim_end_matches('/');
        Self {
            store,
            list_url: format!("{base}{CHECK_INS_PATH}").into(),
        }
    }
}

pub fn router<S: CheckInStore>(store: S, base_url: Option<&str>) -> Router {
    Router::new()
        // page
        .route("/", get(page::index))
        .route("/assets/checkins.js", get(page::script))
        // health
        .route("/health", get(empty_handler))
        // check-ins
        .route(
            CHECK_INS_PATH,
            get(list_check_ins::<S>).post(create_check_in::<S>),
        )
        .route(
            "/check-ins/:id",
            get(get_check_in::<S>)
                .put(update_check_in::<S>)
                .post(override_check_in::<S>)
                .delete(delete_check_in::<S>),
        )
        .layer(service_metrics::request_layer!("check_ins_request"))
        .layer(custom_tracing::http_layer::new_with_span(make_span))
        .with_state(ApiState::new(store, base_url))
}

async fn empty_handler() {}

fn make_span(request: &Request<Body>) -> tracing::Span {
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .map(|value| value.to_str().unwrap_or("unknown"));

    tracing::info_span!(
        "http",
        method = %request.method(),
        uri = %request.uri(),
        user_agent,
        check_in_id = tracing::field::Empty,
    )
}
