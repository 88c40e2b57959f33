use serde::{Deserialize, Serialize};

use crate::models::Entry;

// -- Public page --

/// Query string accepted by `GET /` and `POST /`.
///
/// Built from the raw key/value pairs so that junk or repeated keys fall
/// back to a usable page instead of rejecting the request.
#[derive(Debug, Default)]
pub struct PageQuery {
    pub offset: Option<String>,
}

impl PageQuery {
    /// The last `offset` pair wins; other keys are ignored.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let offset = pairs
            .iter()
            .rev()
            .find(|(key, _)| key == "offset")
            .map(|(_, value)| value.clone());
        Self { offset }
    }

    pub fn offset(&self) -> u64 {
        parse_offset(self.offset.as_deref())
    }
}

/// Parse a page offset. Missing, non-numeric and negative values all mean 0.
pub fn parse_offset(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .map(|n| n.max(0) as u64)
        .unwrap_or(0)
}

/// Form body posted to `/`.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub message: String,
    /// Submit button marker; a post without it is treated as a plain page view.
    #[serde(rename = "postEntry")]
    pub post_entry: Option<String>,
    #[serde(rename = "recaptcha_challenge_field", default)]
    pub challenge: String,
    #[serde(rename = "recaptcha_response_field", default)]
    pub response: String,
}

impl SubmitForm {
    pub fn is_submission(&self) -> bool {
        self.post_entry.is_some()
    }
}

// -- Admin --

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    #[serde(default)]
    pub offset: u64,
    #[serde(default = "default_audit_limit")]
    pub limit: u32,
}

fn default_audit_limit() -> u32 {
    50
}

#[derive(Debug, Serialize)]
pub struct AuditResponse {
    pub offset: u64,
    pub limit: u32,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}
