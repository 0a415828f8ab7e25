use std::io;
use axum::{http::StatusCode, response::{IntoResponse, Response}};

/// Custom error types for the wiki application
#[derive(Debug)]
pub enum WikiError {
    Io(io::Error),
    NotFound,
    InvalidTitle,
    MissingField(&'static str),
    TemplateError(String),
    RenderError(String),
}

impl From<io::Error> for WikiError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            WikiError::NotFound
        } else {
            WikiError::Io(err)
        }
    }
}

impl std::fmt::Display for WikiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WikiError::Io(e) => write!(f, "I/O error: {}", e),
            WikiError::NotFound => write!(f, "Not found"),
            WikiError::InvalidTitle => write!(f, "Invalid page title"),
            WikiError::MissingField(name) => write!(f, "Missing form field: {}", name),
            WikiError::TemplateError(e) => write!(f, "Template error: {}", e),
            WikiError::RenderError(e) => write!(f, "Render error: {}", e),
        }
    }
}

impl std::error::Error for WikiError {}

impl IntoResponse for WikiError {
    fn into_response(self) -> Response {
        match self {
            // An invalid title is indistinguishable from a missing page.
            WikiError::NotFound | WikiError::InvalidTitle => {
                (StatusCode::NOT_FOUND, "Not found").into_response()
            }
            WikiError::MissingField(_) => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            WikiError::Io(_) | WikiError::TemplateError(_) | WikiError::RenderError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
            }
        }
    }
}
