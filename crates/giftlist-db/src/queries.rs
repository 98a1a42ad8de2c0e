use crate::Database;
use crate::models::GiftRow;
use anyhow::{Result, anyhow};
use rusqlite::{Connection, Row};

const GIFT_COLUMNS: &str = "id, nome, presente, link, created_at";

impl Database {
    /// Every gift, newest first.
    pub fn list_gifts(&self) -> Result<Vec<GiftRow>> {
        self.with_conn(query_gifts)
    }

    /// Insert a gift and return the stored row, including the
    /// server-assigned id and timestamp.
    pub fn insert_gift(&self, nome: &str, presente: &str, link: &str) -> Result<GiftRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO gifts (nome, presente, link) VALUES (?1, ?2, ?3)",
                (nome, presente, link),
            )?;
            let id = conn.last_insert_rowid();

            query_gift_by_id(conn, id)?
                .ok_or_else(|| anyhow!("Gift {} vanished after insert", id))
        })
    }

    pub fn get_gift(&self, id: i64) -> Result<Option<GiftRow>> {
        self.with_conn(|conn| query_gift_by_id(conn, id))
    }

    /// Returns `false` when no gift had that id.
    pub fn delete_gift(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM gifts WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }
}

fn map_gift(row: &Row<'_>) -> rusqlite::Result<GiftRow> {
    Ok(GiftRow {
        id: row.get(0)?,
        nome: row.get(1)?,
        presente: row.get(2)?,
        link: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn query_gifts(conn: &Connection) -> Result<Vec<GiftRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {GIFT_COLUMNS} FROM gifts ORDER BY created_at DESC, id DESC"
    ))?;

    let rows = stmt
        .query_map([], map_gift)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_gift_by_id(conn: &Connection, id: i64) -> Result<Option<GiftRow>> {
    let mut stmt = conn.prepare(&format!("SELECT {GIFT_COLUMNS} FROM gifts WHERE id = ?1"))?;

    let row = stmt.query_row([id], map_gift).optional()?;

    Ok(row)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
