//! Administrative JSON endpoints for auditing and soft-deleting entries.
//!
//! There is no authentication here; the router is only ever bound to its own
//! listener, which operators should keep on loopback.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, info};

use guestbook_db::{Database, StorageError};
use guestbook_types::api::{AuditQuery, AuditResponse, ErrorResponse};
use guestbook_types::{Entry, EntryId};

use crate::state::AppState;

const MAX_AUDIT_LIMIT: u32 = 500;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("entry {0} not found")]
    NotFound(EntryId),

    #[error("entry store unavailable")]
    StoreUnavailable,

    #[error("storage error: {0}")]
    Storage(StorageError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StorageError> for AdminError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(id) => Self::NotFound(id),
            StorageError::Unavailable(_) => Self::StoreUnavailable,
            other => Self::Storage(other),
        }
    }
}

impl AdminError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::StoreUnavailable => "store_unavailable",
            Self::Storage(_) => "storage_error",
            Self::Internal(_) => "internal_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        if self.status().is_server_error() {
            error!("Admin request failed: {}", self);
        }
        let body = ErrorResponse {
            code: self.code(),
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// GET /entries — every entry, deleted ones included, newest id first.
pub async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<AuditResponse>, AdminError> {
    let limit = query.limit.min(MAX_AUDIT_LIMIT);
    let offset = query.offset;
    let entries = with_store(&state, move |db| db.list_all(offset, limit)).await?;

    Ok(Json(AuditResponse {
        offset,
        limit,
        entries,
    }))
}

/// GET /entries/{id}
pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<EntryId>,
) -> Result<Json<Entry>, AdminError> {
    with_store(&state, move |db| db.get_entry(id))
        .await?
        .map(Json)
        .ok_or(AdminError::NotFound(id))
}

/// DELETE /entries/{id} — soft delete; repeating it is harmless.
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<EntryId>,
) -> Result<StatusCode, AdminError> {
    with_store(&state, move |db| db.soft_delete(id)).await?;
    info!("Admin soft-deleted entry {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Run a store call on the blocking pool.
async fn with_store<F, T>(state: &AppState, f: F) -> Result<T, AdminError>
where
    F: FnOnce(&Database) -> guestbook_db::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || {
        let db = state.db.as_ref().ok_or(AdminError::StoreUnavailable)?;
        f(db).map_err(AdminError::from)
    })
    .await
    .map_err(|e| AdminError::Internal(e.to_string()))?
}
