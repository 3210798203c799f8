use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use derive_more::derive::Display;
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;
pub type AppJsonResult<T> = AppResult<Json<T>>;

#[derive(Debug, Display)]
pub enum AppError {
    #[display("Email read failed: {_0}")]
    Gmail(anyhow::Error),
    #[display("Sheet error: {_0}")]
    Sheets(anyhow::Error),
    #[display("Credential error: {_0}")]
    Credentials(anyhow::Error),
    #[display("{_0}")]
    Internal(anyhow::Error),
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal(error)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        tracing::error!("Reqwest error: {:?}", error);
        AppError::Internal(error.into())
    }
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Gmail(_) | AppError::Sheets(_) => StatusCode::BAD_GATEWAY,
            AppError::Credentials(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Every failure leaves the API as a tagged error outcome
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::error!("Error: {:?}", self);

        (
            status,
            Json(json!({
                "status": "error",
                "message": self.to_string(),
            })),
        )
            .into_response()
    }
}
