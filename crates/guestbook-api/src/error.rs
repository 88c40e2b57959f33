use axum::http::StatusCode;
use thiserror::Error;

use guestbook_db::StorageError;

/// Everything that can go wrong while serving the public page.
///
/// None of these abort the request: each one becomes an inline banner.
#[derive(Debug, Error)]
pub enum GuestbookError {
    #[error("entry store unavailable: {0}")]
    StorageUnavailable(String),

    #[error("entry could not be stored: {0}")]
    StorageWriteFailed(String),

    #[error("verification rejected: {0}")]
    VerificationFailed(String),

    #[error("verification service unavailable: {0}")]
    VerificationUnavailable(String),
}

impl GuestbookError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::StorageUnavailable(_) => "Could not connect to the guestbook database.",
            Self::StorageWriteFailed(_) => {
                "Something went wrong and your message could not be posted."
            }
            Self::VerificationFailed(_) => "Try the reCaptcha again!",
            Self::VerificationUnavailable(_) => {
                "The verification service is unavailable, please try again later."
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::StorageWriteFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::VerificationFailed(_) => StatusCode::OK,
            Self::VerificationUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Map a store error raised while writing.
    pub fn from_write(err: StorageError) -> Self {
        match err {
            StorageError::Unavailable(msg) => Self::StorageUnavailable(msg),
            other => Self::StorageWriteFailed(other.to_string()),
        }
    }

    /// Map a store error raised while reading the listing.
    pub fn from_read(err: StorageError) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}
