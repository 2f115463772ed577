use axum::http::StatusCode;
use thiserror::Error;

/// Failures surfaced to HTTP clients
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Restaurant data not loaded")]
    DataUnavailable,

    #[error("{0}")]
    InvalidParameter(String),

    #[error("Unknown chart type: {0}")]
    UnknownChart(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::DataUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            AppError::UnknownChart(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text placed in the error envelope. Internal causes stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::DataUnavailable.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            AppError::InvalidParameter("limit".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::UnknownChart("x".into()).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let err = AppError::from(anyhow::anyhow!("Failed to encode PNG"));
        assert_eq!(err.public_message(), "Internal server error");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::DataUnavailable.public_message(), "Restaurant data not loaded");
    }
}
