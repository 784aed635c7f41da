// Peta UMKM Sulawesi Barat - Web Server
// Browser dashboard + JSON API with Axum

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use umkm_map::{
    init_logging, Config, Dashboard, FilterCriteria, FilterOptions, LogTarget, Record,
    RenderModel, APP_TITLE,
};

/// Shared application state. The dashboard is read-only, so no lock.
#[derive(Clone)]
struct AppState {
    dashboard: Arc<Dashboard>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Query string of `/api/dashboard`. Missing, empty or "Semua" means no filter.
#[derive(Debug, Default, Deserialize)]
struct DashboardQuery {
    regency: Option<String>,
    category: Option<String>,
    name: Option<String>,
}

impl DashboardQuery {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria::from_selection(
            self.regency.as_deref(),
            self.category.as_deref(),
            self.name.as_deref(),
        )
    }
}

#[derive(Parser)]
#[command(name = "umkm-server", version, about = "Peta UMKM Sulawesi Barat web server")]
struct Cli {
    /// Path to a TOML config file (defaults to ./umkm-map.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the bind address from the config
    #[arg(long)]
    bind: Option<String>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/options - Selection widget contents
async fn get_options(State(state): State<AppState>) -> Json<ApiResponse<FilterOptions>> {
    Json(ApiResponse::ok(state.dashboard.options()))
}

/// GET /api/records - The full, unfiltered dataset
async fn get_records(State(state): State<AppState>) -> Json<ApiResponse<Vec<Record>>> {
    Json(ApiResponse::ok(state.dashboard.store().all().to_vec()))
}

/// GET /api/dashboard?regency=&category=&name= - Render model for a filter
async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Json<ApiResponse<RenderModel>> {
    Json(ApiResponse::ok(state.dashboard.on_filter_changed(&query.criteria())))
}

/// GET / - Serve index.html
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/options", get(get_options))
        .route("/records", get(get_records))
        .route("/dashboard", get(get_dashboard))
        .with_state(state);

    Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let _guard = init_logging(LogTarget::Console, &config.logging.filter)
        .context("Failed to initialize logging")?;

    println!("🌐 {} - Web Server", APP_TITLE);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let store = config.record_store().context("Failed to load UMKM records")?;
    tracing::info!(records = store.len(), "record store ready");

    let state = AppState {
        dashboard: Arc::new(Dashboard::new(store)),
    };
    let app = router(state);

    let addr = cli.bind.unwrap_or(config.server.bind);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to address {}", addr))?;

    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/dashboard", addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn get_json(uri: &str) -> serde_json::Value {
        let app = router(AppState {
            dashboard: Arc::new(Dashboard::default()),
        });
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_dashboard_no_match_is_empty_map() {
        let json = get_json("/api/dashboard?name=zzz").await;

        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["map"]["status"], "empty");
        assert_eq!(json["data"]["metrics"]["filtered_count"], 0);
        assert_eq!(json["data"]["metrics"]["total_count"], 10);
        assert_eq!(json["data"]["table_rows"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_dashboard_regency_filter() {
        let json = get_json("/api/dashboard?regency=Mamuju&category=Semua").await;

        assert_eq!(json["data"]["map"]["status"], "ready");
        assert_eq!(json["data"]["metrics"]["filtered_count"], 3);
        assert_eq!(json["data"]["table_rows"][0]["name"], "UMKM Ikan Asap Tande");
    }

    #[tokio::test]
    async fn test_options_route() {
        let json = get_json("/api/options").await;

        assert_eq!(json["data"]["regencies"][0], "Semua");
        assert_eq!(json["data"]["categories"][1], "Kerajinan");
    }

    #[test]
    fn test_query_sentinel_maps_to_no_filter() {
        let query = DashboardQuery {
            regency: Some("Semua".to_string()),
            category: Some(String::new()),
            name: Some("kopi".to_string()),
        };
        let criteria = query.criteria();

        assert_eq!(criteria.regency, None);
        assert_eq!(criteria.category, None);
        assert_eq!(criteria.name_keyword.as_deref(), Some("kopi"));
        assert!(DashboardQuery::default().criteria().is_unfiltered());
    }
}
