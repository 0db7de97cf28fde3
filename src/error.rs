use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The finalize call itself faulted (panicked or was cancelled), as opposed
    /// to reporting a network or application failure.
    #[error("Finalize call faulted: {0}")]
    TriggerFault(#[from] tokio::task::JoinError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("Internal error: {:?}", self);

        let message = match &self {
            AppError::TriggerFault(_) => "Manual trigger error",
        };

        let body = json!({
            "success": false,
            "message": message,
            "error": self.to_string(),
        });

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
