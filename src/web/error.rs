use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tokio::sync::oneshot::error::RecvError;

use crate::error::{TranslateError, TransportError};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    InvalidRequest(#[from] anyhow::Error),
    #[error(transparent)]
    Translate(#[from] TranslateError),
    #[error(transparent)]
    ChannelReceiveError(#[from] RecvError),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::Translate(TranslateError::Transport(err)) if err.is_timeout() => {
                StatusCode::GATEWAY_TIMEOUT
            }
            ServiceError::Translate(_) => StatusCode::BAD_GATEWAY,
            ServiceError::ChannelReceiveError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TransportError> for ServiceError {
    fn from(err: TransportError) -> Self {
        ServiceError::Translate(err.into())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}
