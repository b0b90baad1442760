#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use std::net::SocketAddr;

use crate::{config::Config, runner::Runner, shutdown::Shutdown};

pub use captioner::Captioner;

pub mod attributes;
pub mod captioner;
pub mod config;
pub mod errors;
pub mod helpers;
pub mod imaging;
pub mod model;
pub mod routes;
pub mod runner;
pub mod shutdown;

/// Largest request body the service accepts. Anything bigger is rejected
/// before the handler runs.
pub const MAX_REQUEST_BYTES: usize = 16 * 1024 * 1024;

/// Load the model and start the server.
///
/// The listener is only bound once the model has loaded, so a serving process
/// always has a working captioner behind it.
///
/// # Errors
///
/// This function will return an error if the configuration cannot be read,
/// if the model fails to load, or if the server fails to start.
pub async fn start<T: Captioner + 'static>() -> Result<()> {
    let config = Config::from_env()?;
    let shutdown = Shutdown::new();
    let runner = Runner::new::<T>(&config, shutdown.clone()).await?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = routes::handler()
        .layer(runner.extension())
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES));

    tracing::info!("Listening on {addr}");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown.handle())
        .await?;

    Ok(())
}

#[macro_export]
macro_rules! serve {
    ($model:ty) => {
        #[tokio::main]
        async fn main() -> ::anyhow::Result<()> {
            ::tracing_subscriber::fmt()
                .with_env_filter(
                    ::tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| ::tracing_subscriber::EnvFilter::new("info")),
                )
                .init();

            $crate::start::<$model>().await
        }
    };
}
