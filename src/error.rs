//! Error types for contact requests
//!
//! Errors are classified by who has to act on them:
//! - Validation: the caller sent a bad payload (400)
//! - NotFound: the referenced contact does not exist (404)
//! - Everything else: store or environment failure (500)

use thiserror::Error;

use crate::db::DbError;

/// Error type for every fallible request handler.
#[derive(Debug, Error)]
pub enum CrmError {
    #[error("{0}")]
    Validation(String),

    #[error("Contact not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CrmError {
    /// HTTP-equivalent status for transports that need one.
    pub fn status_code(&self) -> u16 {
        match self {
            CrmError::Validation(_) => 400,
            CrmError::NotFound(_) => 404,
            CrmError::Db(_) | CrmError::Config(_) => 500,
        }
    }

    /// True when retrying the same request cannot succeed.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, CrmError::Validation(_) | CrmError::NotFound(_))
    }
}

/// Serializable error body.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub status: u16,
}

impl From<&CrmError> for ErrorResponse {
    fn from(err: &CrmError) -> Self {
        ErrorResponse {
            error: err.to_string(),
            status: err.status_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(CrmError::Validation("name and email required".into()).status_code(), 400);
        assert_eq!(CrmError::NotFound("c-1".into()).status_code(), 404);
        assert_eq!(CrmError::Config("bad".into()).status_code(), 500);
        assert_eq!(CrmError::Db(DbError::HomeDirNotFound).status_code(), 500);
    }

    #[test]
    fn test_error_response_carries_message() {
        let err = CrmError::NotFound("c-42".into());
        let body = ErrorResponse::from(&err);
        assert_eq!(body.error, "Contact not found: c-42");
        assert_eq!(body.status, 404);
        assert!(err.is_caller_error());
    }
}
