use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// API 的錯誤回應。
///
/// 資料層的所有錯誤（連線、SQL、解碼）都視為同一種資料存取錯誤。
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    DataAccess(String),
}

impl From<anyhow::Error> for AppError {
    fn from(why: anyhow::Error) -> Self {
        AppError::DataAccess(format!("{:#}", why))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::DataAccess(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
