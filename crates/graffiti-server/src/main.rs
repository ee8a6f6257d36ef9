use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use graffiti_api::{AppStateInner, reports};
use graffiti_core::Session;
use graffiti_store::SheetStore;
use graffiti_store::file::FileSheetStore;
use graffiti_store::http::HttpSheetStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "graffiti=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let host = std::env::var("GRAFFITI_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("GRAFFITI_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // One session per server process, loaded up front. An unreachable or
    // unconfigured store aborts startup; there is no retry. The sheet
    // client is blocking, so construction and the initial load run off the
    // async runtime.
    let session = tokio::task::spawn_blocking(|| -> anyhow::Result<Session> {
        let store = build_store()?;
        Ok(Session::start(store)?)
    })
    .await??;
    let state = Arc::new(AppStateInner {
        session: Mutex::new(session),
    });

    // Routes
    let app = Router::new()
        .route("/reports", get(reports::list_reports).post(reports::submit_report))
        .route("/reports/active", get(reports::active_reports))
        .route("/reports/markers", get(reports::report_markers))
        .route("/reports/stats", get(reports::report_stats))
        .route("/reports/{index}/status", post(reports::update_report_status))
        .route("/reports/{index}/photo/{kind}", get(reports::report_photo))
        .route("/clicks", post(reports::classify_click))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Graffiti reporter listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Remote sheet service when a URL is configured (its bearer token is
/// required), otherwise a local sheet file.
fn build_store() -> anyhow::Result<Arc<dyn SheetStore>> {
    match std::env::var("GRAFFITI_SHEET_URL") {
        Ok(url) => {
            let token = std::env::var("GRAFFITI_SHEET_TOKEN").map_err(|_| {
                anyhow::anyhow!("GRAFFITI_SHEET_TOKEN is required when GRAFFITI_SHEET_URL is set")
            })?;
            Ok(Arc::new(HttpSheetStore::new(url, token)?))
        }
        Err(_) => match std::env::var("GRAFFITI_SHEET_PATH") {
            Ok(path) => Ok(Arc::new(FileSheetStore::new(path))),
            Err(_) => anyhow::bail!(
                "no backing sheet configured: set GRAFFITI_SHEET_URL or GRAFFITI_SHEET_PATH"
            ),
        },
    }
}
