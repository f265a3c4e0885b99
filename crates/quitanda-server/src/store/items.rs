use crate::db::DbPool;
use crate::models::Item;

use super::{checkout, StoreError};

/// Insert one item row. Price validation (finite, non-negative) happens in
/// the handler before this is called.
pub fn create(
    pool: &DbPool,
    owner_id: i64,
    name: &str,
    description: &str,
    price: f64,
) -> Result<i64, StoreError> {
    let conn = checkout(pool)?;
    conn.execute(
        "INSERT INTO itens (user_id, name, description, price) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![owner_id, name, description, price],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All items, newest first. The listing is intentionally system-wide rather
/// than filtered to the calling user.
pub fn list_newest_first(pool: &DbPool) -> Result<Vec<Item>, StoreError> {
    let conn = checkout(pool)?;
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, description, price FROM itens ORDER BY id DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Item {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            price: row.get(4)?,
        })
    })?;

    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}
