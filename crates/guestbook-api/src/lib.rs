pub mod admin;
pub mod config;
pub mod error;
pub mod guestbook;
pub mod render;
pub mod state;
pub mod verify;

use axum::{Router, routing::get};

pub use config::GuestbookConfig;
pub use error::GuestbookError;
pub use state::{AppState, AppStateInner};

/// Public routes: the guestbook page and a liveness probe.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(guestbook::show_page).post(guestbook::submit_entry))
        .route("/health", get(guestbook::health))
        .with_state(state)
}

/// Administrative routes. Served on a separate listener, never merged into [`router`].
pub fn admin_router(state: AppState) -> Router {
    Router::new()
        .route("/entries", get(admin::list_entries))
        .route("/entries/{id}", get(admin::get_entry).delete(admin::delete_entry))
        .with_state(state)
}
