use axum::{Json, response::IntoResponse};
use serde_json::json;

pub struct RootController;

impl RootController {
    /// Always 200, whatever state the store is in.
    pub async fn health_check() -> impl IntoResponse {
        Json(json!({ "status": 200 }))
    }
}
