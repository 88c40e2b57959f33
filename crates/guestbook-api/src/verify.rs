use reqwest::Client;
use tracing::{debug, warn};

use crate::config::RecaptchaConfig;
use crate::error::GuestbookError;

/// Client for the reCAPTCHA v1 verify endpoint.
///
/// Anything other than an explicit `true` rejects the submission; transport
/// problems are reported separately from a wrong answer.
pub struct Verifier {
    client: Client,
    private_key: String,
    verify_url: String,
}

impl Verifier {
    pub fn new(config: &RecaptchaConfig) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            private_key: config.private_key.clone(),
            verify_url: config.verify_url.clone(),
        })
    }

    pub async fn verify(
        &self,
        challenge: &str,
        response: &str,
        remote_ip: &str,
    ) -> Result<(), GuestbookError> {
        let fields = [
            ("privatekey", self.private_key.as_str()),
            ("remoteip", remote_ip),
            ("challenge", challenge),
            ("response", response),
        ];

        let reply = self
            .client
            .post(&self.verify_url)
            .form(&fields)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                warn!("Verification request to {} failed: {}", self.verify_url, e);
                GuestbookError::VerificationUnavailable(e.to_string())
            })?;

        let body = reply.text().await.map_err(|e| {
            warn!("Verification response unreadable: {}", e);
            GuestbookError::VerificationUnavailable(e.to_string())
        })?;

        parse_verdict(&body)
    }
}

/// Interpret the newline-separated verify response. Line one is the verdict,
/// line two (if any) is an error code.
pub fn parse_verdict(body: &str) -> Result<(), GuestbookError> {
    let mut lines = body.lines().map(str::trim);
    let verdict = lines.next().unwrap_or_default();
    let detail = lines.next().filter(|l| !l.is_empty()).unwrap_or("unknown");

    match verdict {
        "true" => {
            debug!("Verification passed");
            Ok(())
        }
        "false" => {
            debug!("Verification rejected: {}", detail);
            Err(GuestbookError::VerificationFailed(detail.to_string()))
        }
        other => {
            warn!("Unexpected verification verdict '{}'", other);
            Err(GuestbookError::VerificationUnavailable(format!(
                "unexpected verdict '{other}'"
            )))
        }
    }
}
