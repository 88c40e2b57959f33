use serde::{Deserialize, Serialize};

pub type EntryId = i64;

/// One guestbook submission.
///
/// `name` and `message` hold markup-escaped text: the store escapes them on
/// insert, so they can be embedded into a page as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub name: String,
    pub message: String,
    /// Unix epoch seconds, set by the server at insert time.
    pub time: i64,
    /// Submitter address. Audit only, never shown on the public page.
    pub ip: String,
    pub deleted: bool,
}

/// A window of non-deleted entries, newest first.
#[derive(Debug, Clone, Default)]
pub struct EntryPage {
    pub entries: Vec<Entry>,
    pub offset: u64,
    pub page_size: u32,
    /// True when at least one older eligible entry exists past this page.
    pub has_older: bool,
}

impl EntryPage {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
