use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{1}")]
    Server(StatusCode, String),
    // Froms
    #[error("{0}")]
    Validation(#[from] validator::ValidationErrors),
    #[error("{0}")]
    Quiz(#[from] quiz_utils::error::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let msg = self.to_string();
        let status = StatusCode::from(&self);

        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        } else {
            tracing::debug!(%status, %msg, "request rejected");
        }

        (status, msg).into_response()
    }
}

impl From<&Error> for StatusCode {
    fn from(error: &Error) -> Self {
        match error {
            Error::Server(c, _) => *c,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Quiz(quiz_utils::error::Error::NotFound(_)) => StatusCode::NOT_FOUND,
            Error::Quiz(quiz_utils::error::Error::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
