//! API routes for the RAG server

pub mod chat;
pub mod reports;
pub mod users;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Chat
        .route("/chat", post(chat::chat))
        // Reports - larger body limit for file uploads
        .route(
            "/reports/upload",
            post(reports::upload_report).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route(
            "/users/:user_id/reports/:report_id",
            delete(reports::delete_report),
        )
        // Account deletion
        .route("/users/:user_id", delete(users::delete_user))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "medreport-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Medical-report Q&A with per-user document grounding and citations",
        "endpoints": {
            "POST /api/reports/upload": "Upload a report (multipart: user_id, file, description)",
            "POST /api/chat": "Ask a question against your uploaded reports",
            "DELETE /api/users/:user_id/reports/:report_id": "Delete one report's chunks",
            "DELETE /api/users/:user_id": "Delete a user's entire collection"
        }
    }))
}
