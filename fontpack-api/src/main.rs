use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use fontpack::{ConvertOptions, FontConverter, RemoteConverter, SubprocessConverter};
use fontpack_api::{app, AppState};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Pick the converter transport from the environment:
/// `FONTPACK_CONVERTER_URL` selects the remote HTTP service, otherwise
/// `FONTPACK_CONVERTER_CMD` (default `fontconvert`) is spawned per file.
fn converter_from_env(timeout: Duration) -> Result<Arc<dyn FontConverter>> {
    if let Ok(url) = std::env::var("FONTPACK_CONVERTER_URL") {
        info!(%url, "using remote converter");
        return Ok(Arc::new(RemoteConverter::with_timeout(url, timeout)?));
    }

    let command = std::env::var("FONTPACK_CONVERTER_CMD")
        .unwrap_or_else(|_| "fontconvert".to_string());
    info!(%command, "using subprocess converter");
    Ok(Arc::new(
        SubprocessConverter::from_command_line(&command)?.with_timeout(timeout),
    ))
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fontpack_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let timeout = Duration::from_secs(env_or("FONTPACK_TIMEOUT_SECS", 60));
    let converter = converter_from_env(timeout)?;
    let options = ConvertOptions::default().with_parallelism(env_or("FONTPACK_PARALLELISM", 1));

    let state = AppState::new(converter, options);

    let addr = std::env::var("FONTPACK_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("fontpack API listening on http://{addr}");

    axum::serve(listener, app(state)).await?;

    Ok(())
}
