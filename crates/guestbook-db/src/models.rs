/// Row type for the `entries` table, mapped 1:1 from SQLite.
/// Converted into the shared `Entry` model before leaving the crate.
pub struct EntryRow {
    pub id: i64,
    pub name: String,
    pub message: String,
    pub time: i64,
    pub ip: String,
    pub deleted: bool,
}

impl EntryRow {
    pub(crate) const COLUMNS: &'static str = "id, name, message, time, ip, deleted";

    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            message: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            time: row.get::<_, Option<i64>>(3)?.unwrap_or_default(),
            ip: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            deleted: row.get(5)?,
        })
    }
}

impl From<EntryRow> for guestbook_types::Entry {
    fn from(row: EntryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            message: row.message,
            time: row.time,
            ip: row.ip,
            deleted: row.deleted,
        }
    }
}
