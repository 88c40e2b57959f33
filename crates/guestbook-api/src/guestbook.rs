use std::net::{IpAddr, SocketAddr};

use axum::{
    Form,
    extract::{ConnectInfo, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::{error, info, warn};

use guestbook_types::EntryId;
use guestbook_types::api::{PageQuery, SubmitForm};
use guestbook_types::models::EntryPage;

use crate::error::GuestbookError;
use crate::render::{Banner, DEFAULT_MESSAGE_TEXT, DEFAULT_NAME_TEXT, PageView, render_page};
use crate::state::{AppState, AppStateInner};

/// GET / — list one page of entries below the submission form.
pub async fn show_page(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let offset = PageQuery::from_pairs(&params).offset();
    let listing = load_page(&state, offset).await;
    respond(&state, listing, None, None)
}

/// POST / — try to add an entry, then render the listing at the requested offset.
///
/// A post without the `postEntry` marker is rendered like a plain GET.
pub async fn submit_entry(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Query(params): Query<Vec<(String, String)>>,
    Form(form): Form<SubmitForm>,
) -> Response {
    let outcome = if form.is_submission() {
        let ip = peer.ip().to_canonical();
        let result = accept_submission(&state, &form, ip).await;
        match &result {
            Ok(id) => info!("Entry {} posted from {}", id, ip),
            Err(e) => warn!("Submission from {} not accepted: {}", ip, e),
        }
        Some(result)
    } else {
        None
    };

    let offset = PageQuery::from_pairs(&params).offset();
    let listing = load_page(&state, offset).await;

    // A rejected submission keeps the visitor's text in the form.
    let echo = match &outcome {
        Some(Err(_)) => Some(&form),
        _ => None,
    };
    respond(&state, listing, outcome.as_ref(), echo)
}

pub async fn health() -> &'static str {
    "ok"
}

async fn accept_submission(
    state: &AppState,
    form: &SubmitForm,
    ip: IpAddr,
) -> Result<EntryId, GuestbookError> {
    if state.db.is_none() {
        return Err(store_not_open());
    }

    if let Some(verifier) = &state.verifier {
        verifier
            .verify(&form.challenge, &form.response, &ip.to_string())
            .await?;
    }

    // Run blocking DB insert off the async runtime
    let db = state.clone();
    let name = form.name.clone();
    let message = form.message.clone();
    let ip = ip.to_string();
    let time = chrono::Utc::now().timestamp();
    tokio::task::spawn_blocking(move || {
        let store = db.db.as_ref().ok_or_else(store_not_open)?;
        store
            .add_entry(&name, &message, time, &ip)
            .map_err(GuestbookError::from_write)
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        GuestbookError::StorageWriteFailed(e.to_string())
    })?
}

async fn load_page(state: &AppState, offset: u64) -> Result<EntryPage, GuestbookError> {
    let db = state.clone();
    let page_size = state.config.page_size;
    let page = tokio::task::spawn_blocking(move || {
        let store = db.db.as_ref().ok_or_else(store_not_open)?;
        store
            .page(offset, page_size)
            .map_err(GuestbookError::from_read)
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        GuestbookError::StorageUnavailable(e.to_string())
    })?;

    if let Err(e) = &page {
        error!("Listing at offset {} failed: {}", offset, e);
    }
    page
}

fn respond(
    state: &AppStateInner,
    listing: Result<EntryPage, GuestbookError>,
    outcome: Option<&Result<EntryId, GuestbookError>>,
    echo: Option<&SubmitForm>,
) -> Response {
    let mut banners = Vec::new();
    let mut status = StatusCode::OK;

    match outcome {
        Some(Ok(_)) => banners.push(Banner::posted()),
        Some(Err(e)) => {
            banners.push(Banner::from_error(e));
            status = e.status_code();
        }
        None => {}
    }

    let page = match &listing {
        Ok(page) => Some(page),
        Err(e) => {
            let already_reported =
                matches!(outcome, Some(Err(GuestbookError::StorageUnavailable(_))));
            if !already_reported {
                banners.push(Banner::from_error(e));
            }
            if status == StatusCode::OK {
                status = e.status_code();
            }
            None
        }
    };

    let view = PageView {
        page,
        name_text: echo.map_or(DEFAULT_NAME_TEXT, |f| f.name.as_str()),
        message_text: echo.map_or(DEFAULT_MESSAGE_TEXT, |f| f.message.as_str()),
        banners,
        recaptcha_public_key: state.recaptcha_public_key(),
    };

    (status, Html(render_page(&view))).into_response()
}

fn store_not_open() -> GuestbookError {
    GuestbookError::StorageUnavailable("entry store is not open".into())
}
