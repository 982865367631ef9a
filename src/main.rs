use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use company_api::app::{router, AppState};
use company_api::cli::Cli;
use company_api::config::AppConfig;
use company_api::database::{CompanyRepository, DatabaseManager};
use company_api::geo::IpApiClient;
use company_api::middleware::GateChain;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, GATES, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("company_api=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.apply(AppConfig::from_env());
    tracing::info!("Starting Company API in {:?} mode", config.environment);

    let gates = config.gates().context("invalid gate options")?;
    tracing::info!("Create and delete gated by {:?}", gates);

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    let state = AppState::new(CompanyRepository::new(pool));
    let lookup = Arc::new(IpApiClient::new(config.geo.lookup_url.clone()));
    let chain = GateChain::new(gates, &config.auth, &config.geo, lookup);

    let mut app = router(state, &chain);
    if config.server.enable_cors {
        app = app.layer(CorsLayer::permissive());
    }
    if config.server.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Company API listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .context("server error")?;

    Ok(())
}
