use rusqlite::Connection;
use tracing::info;

use crate::error::Result;
use crate::sanitize::escape_html;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Entry store: running migration v1 (entries table)");
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS entries (
                id       INTEGER PRIMARY KEY,
                name     TEXT,
                message  TEXT,
                time     INTEGER NOT NULL,
                ip       TEXT,
                deleted  INTEGER NOT NULL DEFAULT 0
            );

            ",
        )?;

        // Tables created by older visitor-book installs have no `deleted` column.
        if !has_column(conn, "entries", "deleted")? {
            info!("Entry store: adding deleted column to existing entries table");
            let tx = conn.unchecked_transaction()?;
            tx.execute_batch("ALTER TABLE entries ADD COLUMN deleted INTEGER NOT NULL DEFAULT 0;")?;
            let escaped = escape_legacy_rows(&tx)?;
            tx.commit()?;
            info!("Entry store: escaped {} legacy entries", escaped);
        }

        conn.execute_batch(
            "
            CREATE INDEX IF NOT EXISTS idx_entries_listing
                ON entries(deleted, time DESC, id DESC);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Entry store migrations complete");
    Ok(())
}

fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(names.iter().any(|n| n == column))
}

/// Legacy rows were stored unescaped; bring them in line with `add_entry`.
fn escape_legacy_rows(conn: &Connection) -> Result<usize> {
    let rows: Vec<(i64, Option<String>, Option<String>)> = {
        let mut stmt = conn.prepare("SELECT id, name, message FROM entries")?;
        stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?
    };

    let mut update = conn.prepare("UPDATE entries SET name = ?1, message = ?2 WHERE id = ?3")?;
    for (id, name, message) in &rows {
        update.execute(rusqlite::params![
            name.as_deref().map(escape_html),
            message.as_deref().map(escape_html),
            id
        ])?;
    }
    Ok(rows.len())
}
