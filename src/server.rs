//! HTTP JSON API.
//!
//! # Endpoints
//!
//! | Method   | Path | Description |
//! |----------|------|-------------|
//! | `GET`    | `/health` | Health check (returns version) |
//! | `GET`    | `/keywords?category=` | List stored keywords |
//! | `POST`   | `/keywords` | Add a keyword (`201`, `409` on duplicate) |
//! | `DELETE` | `/keywords/{id}` | Remove a keyword (`204`, `404`) |
//! | `POST`   | `/scan` | Scan a base64-encoded document |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "keyword must not be empty" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `conflict` (409),
//! `payload_too_large` (413), `unprocessable_document` (422),
//! `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so browser front ends
//! can post documents directly.

use axum::{
    extract::{DefaultBodyLimit, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use base64::Engine as _;
use keyword_scan_core::models::{Category, Keyword, SearchMode};
use keyword_scan_core::store::{KeywordStore, StoredKeyword};
use keyword_scan_core::KeywordError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};

use crate::config::Config;
use crate::extract::{self, ExtractError};
use crate::scan::{scan_document, ScanOverrides, ScanReport};
use crate::sqlite_store::SqliteKeywordStore;
use crate::{db, migrate};

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn KeywordStore>,
}

/// Open the configured database and serve until the process is stopped.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let pool = db::connect(config).await?;
    migrate::apply(&pool).await?;

    let state = AppState {
        config: Arc::new(config.clone()),
        store: Arc::new(SqliteKeywordStore::new(pool)),
    };

    let bind_addr = config.server.bind.clone();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(bind = %bind_addr, "server listening");
    println!("keyword-scan server listening on http://{}", bind_addr);

    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Build the router. Exposed so tests can serve it on an ephemeral port.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // base64 inflates by 4/3; leave room for the JSON envelope
    let body_limit = (state.config.scan.max_file_bytes as usize)
        .saturating_mul(4)
        / 3
        + 64 * 1024;

    Router::new()
        .route("/health", get(handle_health))
        .route("/keywords", get(handle_list_keywords).post(handle_add_keyword))
        .route("/keywords/{id}", delete(handle_remove_keyword))
        .route("/scan", post(handle_scan))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

#[derive(Debug)]
struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn app_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> AppError {
    AppError {
        status,
        code,
        message: message.into(),
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    app_error(StatusCode::BAD_REQUEST, "bad_request", message)
}

fn not_found(message: impl Into<String>) -> AppError {
    app_error(StatusCode::NOT_FOUND, "not_found", message)
}

fn internal(err: impl std::fmt::Display) -> AppError {
    app_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", err.to_string())
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<KeywordError>() {
            Some(KeywordError::Duplicate(_)) => {
                app_error(StatusCode::CONFLICT, "conflict", err.to_string())
            }
            Some(_) => bad_request(err.to_string()),
            None => internal(err),
        }
    }
}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        if err.is_corrupt_input() {
            app_error(
                StatusCode::UNPROCESSABLE_ENTITY,
                "unprocessable_document",
                err.to_string(),
            )
        } else {
            bad_request(err.to_string())
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ /keywords ============

#[derive(Deserialize)]
struct ListParams {
    category: Option<Category>,
}

#[derive(Serialize)]
struct KeywordList {
    keywords: Vec<StoredKeyword>,
}

async fn handle_list_keywords(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<KeywordList>, AppError> {
    let keywords = state.store.list_keywords(params.category).await?;
    Ok(Json(KeywordList { keywords }))
}

#[derive(Deserialize)]
struct AddKeywordRequest {
    text: String,
    category: Category,
}

async fn handle_add_keyword(
    State(state): State<AppState>,
    Json(req): Json<AddKeywordRequest>,
) -> Result<(StatusCode, Json<StoredKeyword>), AppError> {
    let keyword = Keyword::new(&req.text, req.category).map_err(|e| bad_request(e.to_string()))?;
    let stored = state.store.add_keyword(&keyword).await?;
    debug!(id = stored.id, keyword = stored.keyword.text(), "keyword added");
    Ok((StatusCode::CREATED, Json(stored)))
}

async fn handle_remove_keyword(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if state.store.remove_keyword(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(format!("no keyword with id {}", id)))
    }
}

// ============ POST /scan ============

#[derive(Deserialize)]
struct ScanRequest {
    filename: Option<String>,
    content_type: Option<String>,
    content_base64: String,
    mode: Option<SearchMode>,
    context_radius: Option<usize>,
    category: Option<Category>,
}

async fn handle_scan(
    State(state): State<AppState>,
    Json(req): Json<ScanRequest>,
) -> Result<Json<ScanReport>, AppError> {
    let content_type = match (&req.content_type, &req.filename) {
        (Some(ct), _) => ct.clone(),
        (None, Some(name)) => extract::content_type_for_path(std::path::Path::new(name))
            .map(str::to_string)
            .ok_or_else(|| bad_request(format!("cannot infer content type for {}", name)))?,
        (None, None) => return Err(bad_request("content_type or filename is required")),
    };

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(req.content_base64.trim())
        .map_err(|e| bad_request(format!("content_base64 is not valid base64: {}", e)))?;

    let limit = state.config.scan.max_file_bytes;
    if bytes.len() as u64 > limit {
        return Err(app_error(
            StatusCode::PAYLOAD_TOO_LARGE,
            "payload_too_large",
            format!("document is {} bytes; limit is {}", bytes.len(), limit),
        ));
    }

    let registry = state.store.load_registry(req.category).await?;
    let overrides = ScanOverrides {
        mode: req.mode,
        context_radius: req.context_radius,
        ..Default::default()
    };
    let options = overrides.apply(state.config.scan.search_options());
    let document = req.filename.unwrap_or_else(|| "upload".to_string());

    let report = tokio::task::spawn_blocking(move || {
        scan_document(&document, &bytes, &content_type, &registry, options)
    })
    .await
    .map_err(internal)??;

    Ok(Json(report))
}
