use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use api_shared::ApplicatieRegistry;
use zrc_core::config::{page_size_from_env_value, registry_timeout_from_env_value};
use zrc_core::constants::DEFAULT_BASE_URL;
use zrc_core::{CoreConfig, HttpRegistry, InMemoryRegistry, Registries, ZaakRegistry};

/// Main entry point for the ZRC application
///
/// Starts the REST server.
///
/// # Environment Variables
/// - `ZRC_REST_ADDR`: REST server address (default: "0.0.0.0:8000")
/// - `ZRC_BASE_URL`: absolute base URL resource URLs are built from
///   (default: "http://localhost:8000/api/v1")
/// - `ZRC_PAGE_SIZE`: page size of `GET /zaken` (default: 100)
/// - `ZRC_APPLICATIES_FILE`: YAML file with the client applications, their secrets and
///   authorisations (required)
/// - `ZRC_REGISTRY_FIXTURES`: YAML file of catalogue, decision, document and channel
///   documents; when set, no outbound HTTP lookups are made
/// - `ZRC_REGISTRY_TIMEOUT_SECS`: timeout for outbound lookups (default: 10)
/// - `ZRC_REGISTRY_TOKEN`: bearer token sent with outbound lookups
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("zrc=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("api_shared=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("ZRC_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());
    let base_url = std::env::var("ZRC_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
    let page_size = page_size_from_env_value(std::env::var("ZRC_PAGE_SIZE").ok())?;
    let cfg = Arc::new(CoreConfig::new(&base_url, page_size)?);

    let applicaties_file: PathBuf = std::env::var("ZRC_APPLICATIES_FILE")
        .context("ZRC_APPLICATIES_FILE must point at the client applications file")?
        .into();
    let applicaties = ApplicatieRegistry::from_yaml_file(&applicaties_file)
        .with_context(|| format!("loading {}", applicaties_file.display()))?;
    if applicaties.is_empty() {
        tracing::warn!("no client applications configured; every request will be refused");
    }

    let registry = ZaakRegistry::new(cfg, registries()?);

    tracing::info!("++ Starting ZRC REST on {}", rest_addr);
    tracing::info!("++ Serving resources under {}", base_url);

    let app = api_rest::router(AppState::new(registry, applicaties));
    let listener = tokio::net::TcpListener::bind(&rest_addr)
        .await
        .with_context(|| format!("binding {rest_addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// The external registries, from a fixture file or over HTTP.
fn registries() -> anyhow::Result<Registries> {
    if let Ok(path) = std::env::var("ZRC_REGISTRY_FIXTURES") {
        let fixtures = Arc::new(
            InMemoryRegistry::from_yaml_file(Path::new(&path)).map_err(anyhow::Error::msg)?,
        );
        tracing::info!("registry lookups served from {}", path);
        return Ok(Registries::shared(fixtures));
    }

    let timeout = registry_timeout_from_env_value(std::env::var("ZRC_REGISTRY_TIMEOUT_SECS").ok())?;
    let mut http = HttpRegistry::new(timeout)?;
    if let Ok(token) = std::env::var("ZRC_REGISTRY_TOKEN") {
        http = http.with_token(token);
    }
    Ok(Registries::shared(Arc::new(http)))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutting down");
    }
}
