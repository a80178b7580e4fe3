//! Error types for CGI handlers

use thiserror::Error;

use crate::response::Response;

/// Errors that stop a request before the handler can answer it
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Invalid CONTENT_LENGTH: {0:?}")]
    InvalidContentLength(String),

    #[error("Request body truncated: expected {expected} bytes, received {received}")]
    TruncatedBody { expected: u64, received: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Convert the error to an HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::InvalidContentLength(_) | HandlerError::TruncatedBody { .. } => 400,
            HandlerError::Io(_) | HandlerError::Internal(_) => 500,
        }
    }

    /// Convert to an HTML error page
    pub fn to_response(&self) -> Response {
        Response::error_page(self.status_code(), &self.to_string())
    }
}

impl From<HandlerError> for Response {
    fn from(err: HandlerError) -> Self {
        err.to_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(HandlerError::InvalidContentLength("x".into()).status_code(), 400);
        assert_eq!(
            HandlerError::TruncatedBody { expected: 10, received: 3 }.status_code(),
            400
        );
        assert_eq!(HandlerError::Internal("boom".into()).status_code(), 500);
    }

    #[test]
    fn test_handler_error_conversion() {
        let err = HandlerError::InvalidContentLength("<12>".to_string());
        let response: Response = err.into();
        assert_eq!(response.status, 400);

        let body = String::from_utf8(response.body).unwrap();
        assert!(body.contains("<h1>Bad Request</h1>"));
        assert!(body.contains("Invalid CONTENT_LENGTH: &quot;&lt;12&gt;&quot;"));
    }
}
