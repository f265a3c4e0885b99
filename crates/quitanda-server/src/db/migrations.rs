use chrono::Utc;
use rusqlite::Connection;

const SCHEMA: &str = include_str!("schema.sql");

pub fn run(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)?;

    // Expired sessions accumulate across restarts; sweep them on boot.
    let now = Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
    conn.execute(
        "DELETE FROM sessions WHERE expires_at < ?1",
        rusqlite::params![now],
    )?;

    Ok(())
}
