use guestbook_types::models::EntryPage;
use guestbook_types::{Entry, EntryId};
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Result, StorageError};
use crate::models::EntryRow;
use crate::sanitize::escape_html;
use crate::Database;

impl Database {
    // -- Writes --

    /// Insert a new entry. Name and message are escaped for HTML before they are stored.
    pub fn add_entry(&self, name: &str, message: &str, time: i64, ip: &str) -> Result<EntryId> {
        let name = escape_html(name);
        let message = escape_html(message);

        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO entries (name, message, time, ip, deleted) VALUES (?1, ?2, ?3, ?4, 0)",
                rusqlite::params![name, message, time, ip],
            )
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
            Ok(conn.last_insert_rowid())
        })
        .inspect(|id| debug!("Entry {} added", id))
    }

    /// Mark an entry deleted. Deleting an already-deleted entry succeeds.
    pub fn soft_delete(&self, id: EntryId) -> Result<()> {
        let changed = self.with_conn_mut(|conn| {
            conn.execute("UPDATE entries SET deleted = 1 WHERE id = ?1", [id])
                .map_err(|e| StorageError::WriteFailed(e.to_string()))
        })?;

        if changed == 0 {
            return Err(StorageError::NotFound(id));
        }
        info!("Entry {} soft-deleted", id);
        Ok(())
    }

    // -- Public reads --

    /// Up to `limit` non-deleted entries, newest first, skipping `offset` of them.
    /// Negative offsets are treated as 0.
    pub fn list_entries(&self, offset: i64, limit: u32) -> Result<Vec<Entry>> {
        let offset = offset.max(0);
        self.with_conn(|conn| query_visible(conn, offset, limit))
    }

    /// One display page. Fetches a single extra row to learn whether an older page exists.
    pub fn page(&self, offset: u64, page_size: u32) -> Result<EntryPage> {
        let offset_i = i64::try_from(offset).unwrap_or(i64::MAX);
        let mut entries = self.list_entries(offset_i, page_size.saturating_add(1))?;

        let has_older = entries.len() > page_size as usize;
        entries.truncate(page_size as usize);

        Ok(EntryPage {
            entries,
            offset,
            page_size,
            has_older,
        })
    }

    // -- Audit reads (include deleted rows) --

    pub fn get_entry(&self, id: EntryId) -> Result<Option<Entry>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {} FROM entries WHERE id = ?1", EntryRow::COLUMNS);
            let row = conn
                .query_row(&sql, [id], EntryRow::from_row)
                .optional()?;
            Ok(row.map(Entry::from))
        })
    }

    pub fn list_all(&self, offset: u64, limit: u32) -> Result<Vec<Entry>> {
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM entries ORDER BY id DESC LIMIT ?1 OFFSET ?2",
                EntryRow::COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(rusqlite::params![limit, offset], EntryRow::from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows.into_iter().map(Entry::from).collect())
        })
    }
}

fn query_visible(conn: &Connection, offset: i64, limit: u32) -> Result<Vec<Entry>> {
    // Ties on `time` go to the later insert.
    let sql = format!(
        "SELECT {} FROM entries
         WHERE deleted = 0
         ORDER BY time DESC, id DESC
         LIMIT ?1 OFFSET ?2",
        EntryRow::COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt
        .query_map(rusqlite::params![limit, offset], EntryRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows.into_iter().map(Entry::from).collect())
}
