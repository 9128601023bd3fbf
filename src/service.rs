use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{actuators::chat::dto::ChatResponse, infer::ApiError, ocr::OcrError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Bad Request: {0}")]
    BadRequest(Box<str>),
    #[error("OCR failed: {0}")]
    Ocr(#[from] OcrError),
    #[error("Upstream failed: {0}")]
    Upstream(#[from] ApiError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn bad_request(error: impl std::fmt::Display) -> Self {
        Error::BadRequest(error.to_string().into())
    }
}

pub trait CoercibleResult<T> {
    fn into_service_result(self: Self) -> Result<T>;
}

impl<T, E> CoercibleResult<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn into_service_result(self: Self) -> Result<T> {
        self.map_err(|e| anyhow::Error::from(e).into())
    }
}

// Clients only ever see the uniform failure body; the details stay in the operator log.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!("Server error: {:?}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, Json(ChatResponse::failure())).into_response()
    }
}
