//! permbits REST API Server
//!
//! Run with: cargo run --features server --bin permbits-server
//!
//! Endpoints:
//!   GET  /status             - Registry status
//!   POST /decode             - Decode a bitmask into named flags
//!   POST /encode             - Encode named flags into a bitmask
//!   POST /transition         - Check an old -> new permission change
//!   POST /collection         - Register a collection
//!   GET  /collection/:id     - Get a collection's permissions
//!   GET  /collections        - List collections
//!   POST /update             - Replace a collection's permissions
//!   POST /flag               - Set one flag on a collection
//!   POST /reset              - Reset database (dev only)

use axum::{
    extract::Path,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use permbits::{
    clear_all, count_collections, create_collection, decode, encode, get_permissions, init,
    list_collections, narrow, set_permission, update_permissions, validate_transition, Flag,
    PermissionError, PermissionSet,
};

// ============================================================================
// Config
// ============================================================================

struct Config {
    db_path: String,
    port: String,
}

impl Config {
    fn from_env() -> Self {
        Self {
            db_path: std::env::var("PERMBITS_DB").unwrap_or_else(|_| "./data/permbits.mdb".into()),
            port: std::env::var("PORT").unwrap_or_else(|_| "3000".into()),
        }
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
struct DecodeReq {
    bitmask: i64,
}

#[derive(Deserialize)]
struct EncodeReq {
    flags: PermissionSet,
}

#[derive(Deserialize)]
struct TransitionReq {
    old: i64,
    new: i64,
}

#[derive(Deserialize)]
struct CollectionReq {
    id: u64,
    permissions: i64,
}

#[derive(Deserialize)]
struct FlagReq {
    id: u64,
    flag: Flag,
    value: bool,
}

#[derive(Serialize)]
struct StatusRes {
    collections: usize,
}

#[derive(Serialize)]
struct PermissionsInfo {
    id: Option<u64>,
    bitmask: u8,
    flags: PermissionSet,
    summary: String,
}

impl PermissionsInfo {
    fn new(id: Option<u64>, bitmask: u8) -> Self {
        let flags = decode(bitmask);
        Self { id, bitmask, flags, summary: flags.to_string() }
    }
}

#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(msg.into()) }
    }
}

type Reply<T> = (StatusCode, Json<ApiResponse<T>>);

// ============================================================================
// Helpers
// ============================================================================

fn status_of(e: &PermissionError) -> StatusCode {
    match e {
        PermissionError::CollectionNotFound(_) => StatusCode::NOT_FOUND,
        PermissionError::CollectionExists(_) => StatusCode::CONFLICT,
        e if e.is_policy_violation() => StatusCode::BAD_REQUEST,
        PermissionError::UnknownFlag(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn reply<T>(r: permbits::Result<T>) -> Reply<T> {
    match r {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::ok(data))),
        Err(e) => {
            let code = status_of(&e);
            if code.is_server_error() {
                error!(error = %e, "request failed");
            }
            (code, Json(ApiResponse::err(e.to_string())))
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn get_status() -> Reply<StatusRes> {
    reply(count_collections().map(|collections| StatusRes { collections }))
}

async fn post_decode(Json(req): Json<DecodeReq>) -> Reply<PermissionsInfo> {
    reply(narrow(req.bitmask).map(|m| PermissionsInfo::new(None, m)))
}

async fn post_encode(Json(req): Json<EncodeReq>) -> Reply<PermissionsInfo> {
    reply(Ok(PermissionsInfo::new(None, encode(&req.flags))))
}

async fn post_transition(Json(req): Json<TransitionReq>) -> Reply<String> {
    reply(validate_transition(req.old, req.new).map(|_| "allowed".into()))
}

async fn post_collection(Json(req): Json<CollectionReq>) -> Reply<PermissionsInfo> {
    reply(create_collection(req.id, req.permissions).map(|m| PermissionsInfo::new(Some(req.id), m)))
}

async fn get_collection(Path(id): Path<u64>) -> Reply<PermissionsInfo> {
    reply(
        get_permissions(id)
            .and_then(|m| m.ok_or(PermissionError::CollectionNotFound(id)))
            .map(|m| PermissionsInfo::new(Some(id), m)),
    )
}

async fn get_collections() -> Reply<Vec<PermissionsInfo>> {
    reply(list_collections().map(|all| {
        all.into_iter().map(|(id, m)| PermissionsInfo::new(Some(id), m)).collect()
    }))
}

async fn post_update(Json(req): Json<CollectionReq>) -> Reply<PermissionsInfo> {
    reply(update_permissions(req.id, req.permissions).map(|m| PermissionsInfo::new(Some(req.id), m)))
}

async fn post_flag(Json(req): Json<FlagReq>) -> Reply<PermissionsInfo> {
    reply(set_permission(req.id, req.flag, req.value).map(|m| PermissionsInfo::new(Some(req.id), m)))
}

async fn post_reset() -> Reply<String> {
    reply(clear_all().map(|_| "reset".into()))
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();
    info!(path = %config.db_path, "initializing database");
    init(&config.db_path)?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/status", get(get_status))
        .route("/decode", post(post_decode))
        .route("/encode", post(post_encode))
        .route("/transition", post(post_transition))
        .route("/collection", post(post_collection))
        .route("/collection/:id", get(get_collection))
        .route("/collections", get(get_collections))
        .route("/update", post(post_update))
        .route("/flag", post(post_flag))
        .route("/reset", post(post_reset))
        .layer(cors);

    let addr = format!("0.0.0.0:{}", config.port);
    info!(%addr, "permbits server running");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
