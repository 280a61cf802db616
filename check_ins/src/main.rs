use anyhow::{bail, Result};
use check_ins::{
    seeder::{self, DEFAULT_SEED_COUNT},
    server::ApiServer,
    settings::Settings,
    telemetry, MemoryStore,
};
use clap::Parser;
use futures::future::{self, FutureExt};
use std::path::PathBuf;
use tokio::signal;

const APP_NAME: &str = "check-ins";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, clap::Parser)]
#[clap(version = env!("CARGO_PKG_VERSION"))]
#[clap(about = "Check-ins Service")]
pub struct Cli {
    /// Optional configuration file to use. If present, the toml file at the
    /// given path will be loaded. Environment variables can override the
    /// settings in the given file.
    #[clap(short = 'c')]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    cmd: Cmd,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let settings = Settings::new(self.config)?;
        custom_tracing::init(settings.log.clone())?;
        self.cmd.run(settings).await
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum Cmd {
    /// Serve the check-ins API and page
    Server(Daemon),
    /// Insert generated check-ins into the configured database
    Seed(Seed),
}

impl Cmd {
    pub async fn run(&self, settings: Settings) -> Result<()> {
        match self {
            Self::Server(cmd) => cmd.run(&settings).await,
            Self::Seed(cmd) => cmd.run(&settings).await,
        }
    }
}

#[derive(Debug, clap::Args)]
pub struct Daemon;

impl Daemon {
    pub async fn run(&self, settings: &Settings) -> Result<()> {
        // Install prometheus metrics exporter
        service_metrics::start_metrics(&settings.metrics)?;
        telemetry::describe_metrics();

        let (shutdown_trigger, shutdown_listener) = triggered::trigger();
        tokio::spawn(async move {
            if let Err(err) = shutdown_signal().await {
                tracing::error!(?err, "failed to listen for shutdown signals");
            }
            shutdown_trigger.trigger();
        });

        let base_url = settings.base_url.as_deref();
        match &settings.database {
            Some(database) => {
                let pool = database
                    .connect(APP_NAME, DEFAULT_MAX_CONNECTIONS)
                    .await?;
                sqlx::migrate!().run(&pool).await?;
                ApiServer::new(settings.listen, pool, base_url)
                    .run(shutdown_listener)
                    .await?;
            }
            None => {
                tracing::warn!("no database configured, check-ins are kept in memory");
                ApiServer::new(settings.listen, MemoryStore::default(), base_url)
                    .run(shutdown_listener)
                    .await?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, clap::Args)]
pub struct Seed {
    /// Number of check-ins to insert
    #[clap(long, default_value_t = DEFAULT_SEED_COUNT)]
    count: usize,
}

impl Seed {
    pub async fn run(&self, settings: &Settings) -> Result<()> {
        let Some(database) = &settings.database else {
            bail!("seeding requires a database to be configured");
        };
        let pool = database.connect(APP_NAME, 1).await?;
        sqlx::migrate!().run(&pool).await?;
        let seeded = seeder::seed(&pool, self.count).await?;
        println!("seeded {} check-ins", seeded.len());
        Ok(())
    }
}

/// Resolves on SIGTERM or ctrl-c
async fn shutdown_signal() -> Result<()> {
    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;
    future::select(
        Box::pin(async move { sigterm.recv().await }),
        Box::pin(signal::ctrl_c()),
    )
    .map(|_| ())
    .await;
    tracing::info!("shutdown signal received");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run().await
}
