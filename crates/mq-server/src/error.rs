//! Error-to-HTTP response conversion.
//!
//! Wraps [`mq_core::Error`] so route handlers can return it with `?`. Error
//! bodies are short plain-text messages; the status comes from
//! [`mq_core::Error::http_status`].

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError(pub mq_core::Error);

impl From<mq_core::Error> for AppError {
    fn from(e: mq_core::Error) -> Self {
        Self(e)
    }
}

impl AppError {
    fn public_message(&self) -> String {
        match &self.0 {
            mq_core::Error::NotFound { entity, .. } => {
                let mut msg = entity.clone();
                if let Some(first) = msg.get_mut(0..1) {
                    first.make_ascii_uppercase();
                }
                format!("{msg} not found")
            }
            mq_core::Error::ReadFailure { .. } => "Could not read subtitle".into(),
            mq_core::Error::Validation(msg) => msg.clone(),
            mq_core::Error::Io { .. } | mq_core::Error::Internal(_) => {
                "Internal server error".into()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self.0, "Server error in handler");
        } else {
            tracing::debug!(status = %status, error = %self.0, "Request rejected");
        }

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.public_message(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_produces_404() {
        let err = AppError(mq_core::Error::not_found("video", "Movies/a.mp4"));
        assert_eq!(err.public_message(), "Video not found");
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn read_failure_produces_500() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = AppError(mq_core::Error::read_failure("a.srt", io));
        assert_eq!(err.public_message(), "Could not read subtitle");
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_produces_400() {
        let err = AppError(mq_core::Error::Validation("Invalid path segment".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
    }
}
