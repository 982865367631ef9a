#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::{Executor, PgPool};

use company_api::app::{router, AppState};
use company_api::config::AppConfig;
use company_api::database::{CompanyRepository, DatabaseManager};
use company_api::geo::IpApiClient;
use company_api::middleware::{Gate, GateChain};

const SCHEMA: &str = include_str!("../../sql/schema.sql");

static NEXT_TAG: AtomicUsize = AtomicUsize::new(0);

/// Connect to the database named by `DATABASE_URL` and make sure the company
/// table exists. Returns `None` when no database is configured so callers can
/// skip.
pub async fn database() -> Result<Option<PgPool>> {
    let _ = dotenvy::dotenv();
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set, skipping database test");
        return Ok(None);
    }

    let config = AppConfig::from_env();
    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to test database")?;

    // Concurrent CREATE TABLE IF NOT EXISTS can still collide, so serialize it
    let mut tx = pool.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock(8080)")
        .execute(&mut *tx)
        .await?;
    // Plain (unprepared) execution so the file may hold several statements
    (&mut *tx).execute(SCHEMA).await?;
    tx.commit().await?;

    Ok(Some(pool))
}

/// Tag unique to this test run, for names that must not clash with other rows
pub fn unique_tag() -> String {
    format!(
        "{}-{}-{}",
        std::process::id(),
        chrono::Utc::now().timestamp_millis(),
        NEXT_TAG.fetch_add(1, Ordering::SeqCst)
    )
}

pub struct TestServer {
    pub base_url: String,
    pub config: AppConfig,
}

/// Serve the real router on an ephemeral port, gated by `gates`
pub async fn spawn_server(pool: PgPool, gates: Vec<Gate>) -> Result<TestServer> {
    let config = AppConfig::from_env();
    let lookup = Arc::new(IpApiClient::new(config.geo.lookup_url.clone()));
    let chain = GateChain::new(gates, &config.auth, &config.geo, lookup);
    let app = router(AppState::new(CompanyRepository::new(pool)), &chain);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await;
    });

    Ok(TestServer {
        base_url: format!("http://{}", addr),
        config,
    })
}
