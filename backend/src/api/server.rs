//! HTTP server for the dashboard API.
//!
//! # API Endpoints
//!
//! | Method | Path              | Description                                  |
//! |--------|-------------------|----------------------------------------------|
//! | GET    | `/health`         | Health check                                 |
//! | GET    | `/api/dashboard`  | Full page payload (`?regions=a,b`)           |
//! | GET    | `/api/table`      | Wide table                                   |
//! | GET    | `/api/regions`    | Region list                                  |
//! | GET    | `/api/chart`      | Vega-Lite spec (`?regions=a,b`)              |
//! | GET    | `/api/logs`       | SSE stream for pipeline logs                 |
//!
//! Every request re-runs the transformation over the cached download.

use axum::{
    extract::{Query, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, IntoResponse, Json, Response, Sse},
    routing::get,
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use super::logs::{log_error, log_info, LOG_BROADCASTER};
use super::types::{error_response, DashboardResponse, RegionsQuery};
use crate::cache::FetchCache;
use crate::chart::ChartSpec;
use crate::config::FetchConfig;
use crate::error::{ServerError, ServerResult};
use crate::fetch::{DatasetFetcher, FileFetcher, HttpFetcher};
use crate::models::{RegionSet, WideTable};
use crate::transform::pipeline::{load_dashboard, Dashboard, PipelineOptions};

/// Server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Built frontend to serve at `/`
    pub static_dir: Option<PathBuf>,
    /// Local CSV used instead of the INE download
    pub input: Option<PathBuf>,
    pub fetch: FetchConfig,
    pub pipeline: PipelineOptions,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            static_dir: None,
            input: None,
            fetch: FetchConfig::default(),
            pipeline: PipelineOptions::default(),
        }
    }
}

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<FetchCache>,
    pub fetcher: Arc<DatasetFetcher>,
    pub options: Arc<PipelineOptions>,
}

impl AppState {
    pub fn new(fetcher: DatasetFetcher, options: PipelineOptions) -> Self {
        Self {
            cache: Arc::new(FetchCache::new()),
            fetcher: Arc::new(fetcher),
            options: Arc::new(options),
        }
    }

    async fn dashboard(&self) -> ServerResult<Dashboard> {
        let dashboard = load_dashboard(&self.cache, self.fetcher.as_ref(), &self.options).await?;
        Ok(dashboard)
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        log_error(self.to_string());
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(error_response(&self.to_string()))).into_response()
    }
}

/// Build the router; exposed for embedding and tests.
pub fn router(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    let api = Router::new()
        .route("/health", get(health))
        .route("/api/dashboard", get(dashboard))
        .route("/api/table", get(table))
        .route("/api/regions", get(regions))
        .route("/api/chart", get(chart))
        .route("/api/logs", get(sse_logs))
        .with_state(state);

    let app = match static_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api.route("/", get(health)),
    };

    app.layer(cors)
}

/// Start the HTTP server
pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let fetcher = match &config.input {
        Some(path) => DatasetFetcher::File(FileFetcher::new(path)),
        None => DatasetFetcher::Http(HttpFetcher::new(config.fetch.clone())?),
    };
    let state = AppState::new(fetcher, config.pipeline.clone());
    let app = router(state, config.static_dir.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    println!("🚬 Smokestats server running on http://localhost:{}", config.port);
    println!("   GET  /api/dashboard - Page payload");
    println!("   GET  /api/table     - Wide table");
    println!("   GET  /api/regions   - Region list");
    println!("   GET  /api/chart     - Chart spec");
    println!("   GET  /api/logs      - SSE log stream");
    println!("   GET  /health        - Health check");
    match &config.input {
        Some(path) => println!("📄 Dataset: {}", path.display()),
        None => println!("🌐 Dataset: {}", config.pipeline.source.csv_url()),
    }
    if let Some(dir) = &config.static_dir {
        println!("🗂️  Frontend: {}", dir.display());
    }
    println!();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "smokestats",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "dashboard": "GET /api/dashboard",
            "table": "GET /api/table",
            "regions": "GET /api/regions",
            "chart": "GET /api/chart",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<RegionsQuery>,
) -> ServerResult<Json<DashboardResponse>> {
    log_info("📊 Rendering dashboard");
    let dashboard = state.dashboard().await?;
    Ok(Json(DashboardResponse::new(
        &dashboard,
        &state.options.source,
        query.selection(),
    )))
}

async fn table(State(state): State<AppState>) -> ServerResult<Json<WideTable>> {
    Ok(Json(state.dashboard().await?.table))
}

async fn regions(State(state): State<AppState>) -> ServerResult<Json<RegionSet>> {
    Ok(Json(state.dashboard().await?.regions))
}

async fn chart(
    State(state): State<AppState>,
    Query(query): Query<RegionsQuery>,
) -> ServerResult<Json<ChartSpec>> {
    let dashboard = state.dashboard().await?;
    Ok(Json(dashboard.chart(&query.selection())))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| {
        let entry = result.ok()?;
        let json = serde_json::to_string(&entry).ok()?;
        Some(Ok(Event::default().data(json)))
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "Comunidades y Ciudades Autónomas;Total Nacional;periodo;Total\n\
                          01 Andalucía;;2021;20,3\n\
                          01 Andalucía;;2022 (P);1.234,5\n\
                          ;Total Nacional;2022 (P);45.000,0\n";

    fn file_state(contents: &str) -> (AppState, tempfile::NamedTempFile) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        let state = AppState::new(
            DatasetFetcher::File(FileFetcher::new(file.path())),
            PipelineOptions::default(),
        );
        (state, file)
    }

    #[tokio::test]
    async fn test_dashboard_handler() {
        let (state, _file) = file_state(SAMPLE);
        let query = RegionsQuery {
            regions: Some("Total Nacional".into()),
        };

        let Json(response) = dashboard(State(state.clone()), Query(query)).await.unwrap();

        assert_eq!(response.table.periods, vec!["2021", "2022"]);
        assert_eq!(response.regions.len(), 2);
        assert_eq!(response.chart.default_regions(), vec!["Total Nacional"]);
        assert_eq!(state.cache.len(), 1);
    }

    #[tokio::test]
    async fn test_table_and_regions_handlers() {
        let (state, _file) = file_state(SAMPLE);

        let Json(table) = table(State(state.clone())).await.unwrap();
        let Json(regions) = regions(State(state)).await.unwrap();

        assert_eq!(table.get("Andalucía", "2021"), Some(20.3));
        assert_eq!(regions, table.regions());
    }

    #[tokio::test]
    async fn test_parse_failure_is_unprocessable() {
        let (state, _file) = file_state("");

        let err = table(State(state)).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_bad_gateway() {
        let state = AppState::new(
            DatasetFetcher::File(FileFetcher::new("/nonexistent/smokestats.csv")),
            PipelineOptions::default(),
        );

        let err = chart(State(state), Query(RegionsQuery::default())).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
