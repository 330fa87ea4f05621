use axum::Json;
use serde_json::{json, Value};

/// GET /
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "message": "Server up and running" }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::test_support::{send, TestApp};

    #[tokio::test]
    async fn test_health_is_public() {
        let app = TestApp::new();
        let (status, body) = send(&app.router, "GET", "/", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Server up and running"}));
    }
}
