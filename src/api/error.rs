use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::filter::FilterError;
use crate::store::StoreError;
use crate::validation::SubmissionError;

/// Everything a handler can fail with, mapped onto an HTTP status.
///
/// Client mistakes become 400 with the human-readable message as a plain-text
/// body. Storage failures become 500 and are logged; their details stay out of
/// the response.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request body must be valid JSON")]
    MalformedBody,

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Store(e) => {
                error!(error = %e, "Store operation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal storage error").into_response()
            }
            other => (StatusCode::BAD_REQUEST, other.to_string()).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_are_bad_request() {
        let response = ApiError::MalformedBody.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::from(FilterError::InvalidTimestamp("start")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_store_errors_are_internal() {
        let err = StoreError::CorruptRow("bad".to_string());
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
