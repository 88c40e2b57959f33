use std::sync::Arc;

use guestbook_db::Database;

use crate::config::GuestbookConfig;
use crate::verify::Verifier;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    /// `None` when the store failed to open at startup; pages render degraded.
    pub db: Option<Database>,
    pub config: GuestbookConfig,
    /// Set only when both reCAPTCHA keys are configured.
    pub verifier: Option<Verifier>,
}

impl AppStateInner {
    pub fn new(config: GuestbookConfig, db: Option<Database>) -> anyhow::Result<AppState> {
        let verifier = config.recaptcha.as_ref().map(Verifier::new).transpose()?;
        Ok(Arc::new(Self {
            db,
            config,
            verifier,
        }))
    }

    pub fn recaptcha_public_key(&self) -> Option<&str> {
        self.config.recaptcha.as_ref().map(|r| r.public_key.as_str())
    }
}
