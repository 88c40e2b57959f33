use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use tracing::warn;

/// reCAPTCHA v1 verification endpoint.
pub const DEFAULT_VERIFY_URL: &str = "http://www.google.com/recaptcha/api/verify";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_VERIFY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct GuestbookConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    /// Entries per page. Always at least 1.
    pub page_size: u32,
    /// Present only when both keys are configured.
    pub recaptcha: Option<RecaptchaConfig>,
    /// Address for the admin listener; `None` disables it.
    pub admin_addr: Option<SocketAddr>,
}

#[derive(Debug, Clone)]
pub struct RecaptchaConfig {
    pub public_key: String,
    pub private_key: String,
    pub verify_url: String,
    pub timeout: Duration,
}

impl Default for GuestbookConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            db_path: PathBuf::from("guestbook.db"),
            page_size: DEFAULT_PAGE_SIZE,
            recaptcha: None,
            admin_addr: None,
        }
    }
}

impl GuestbookConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from a variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let host = get("GUESTBOOK_HOST").unwrap_or(defaults.host);
        let port = match get("GUESTBOOK_PORT") {
            Some(v) => v.parse().with_context(|| format!("invalid GUESTBOOK_PORT '{v}'"))?,
            None => defaults.port,
        };
        let db_path = get("GUESTBOOK_DB_PATH").map(PathBuf::from).unwrap_or(defaults.db_path);

        let page_size: u32 = match get("GUESTBOOK_PAGE_SIZE") {
            Some(v) => v.parse().with_context(|| format!("invalid GUESTBOOK_PAGE_SIZE '{v}'"))?,
            None => defaults.page_size,
        };
        if page_size == 0 {
            bail!("GUESTBOOK_PAGE_SIZE must be at least 1");
        }

        let recaptcha = match (
            get("GUESTBOOK_RECAPTCHA_PUBLIC_KEY"),
            get("GUESTBOOK_RECAPTCHA_PRIVATE_KEY"),
        ) {
            (Some(public_key), Some(private_key)) => {
                let timeout = match get("GUESTBOOK_RECAPTCHA_TIMEOUT_MS") {
                    Some(v) => Duration::from_millis(
                        v.parse()
                            .with_context(|| format!("invalid GUESTBOOK_RECAPTCHA_TIMEOUT_MS '{v}'"))?,
                    ),
                    None => DEFAULT_VERIFY_TIMEOUT,
                };
                Some(RecaptchaConfig {
                    public_key,
                    private_key,
                    verify_url: get("GUESTBOOK_RECAPTCHA_VERIFY_URL")
                        .unwrap_or_else(|| DEFAULT_VERIFY_URL.into()),
                    timeout,
                })
            }
            (None, None) => None,
            _ => {
                warn!("Only one reCAPTCHA key is set; verification stays disabled");
                None
            }
        };

        let admin_addr = match get("GUESTBOOK_ADMIN_ADDR") {
            Some(v) => Some(
                v.parse()
                    .with_context(|| format!("invalid GUESTBOOK_ADMIN_ADDR '{v}'"))?,
            ),
            None => None,
        };

        Ok(Self {
            host,
            port,
            db_path,
            page_size,
            recaptcha,
            admin_addr,
        })
    }

    pub fn verification_enabled(&self) -> bool {
        self.recaptcha.is_some()
    }
}
