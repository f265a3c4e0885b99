use crate::db::DbPool;
use crate::models::User;

use super::{checkout, StoreError};

/// Insert a new user row. Username uniqueness is enforced by the UNIQUE
/// constraint, so concurrent registrations of the same name race at the
/// database and exactly one wins.
pub fn create(pool: &DbPool, username: &str, password_hash: &str) -> Result<i64, StoreError> {
    let conn = checkout(pool)?;
    conn.execute(
        "INSERT INTO usuarios (username, senha) VALUES (?1, ?2)",
        rusqlite::params![username, password_hash],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_by_username(pool: &DbPool, username: &str) -> Result<Option<User>, StoreError> {
    let conn = checkout(pool)?;
    let result = conn.query_row(
        "SELECT id, username, senha FROM usuarios WHERE username = ?1",
        rusqlite::params![username],
        |row| {
            Ok(User {
                id: row.get(0)?,
                username: row.get(1)?,
                password_hash: row.get(2)?,
            })
        },
    );

    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[test]
    fn create_then_find_roundtrip() {
        let pool = db::test_pool();
        let id = create(&pool, "alice", "$argon2id$fake").expect("insert should succeed");

        let user = find_by_username(&pool, "alice")
            .expect("lookup should succeed")
            .expect("user should exist");
        assert_eq!(user.id, id);
        assert_eq!(user.username, "alice");
        assert_eq!(user.password_hash, "$argon2id$fake");
    }

    #[test]
    fn find_missing_user_is_none_not_error() {
        let pool = db::test_pool();
        let found = find_by_username(&pool, "nobody").expect("lookup should succeed");
        assert!(found.is_none());
    }

    #[test]
    fn duplicate_username_maps_to_duplicate_key() {
        let pool = db::test_pool();
        create(&pool, "alice", "hash-1").expect("first insert should succeed");

        let err = create(&pool, "alice", "hash-2").unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey));

        let count: i64 = pool
            .get()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM usuarios WHERE username = 'alice'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn usernames_are_case_sensitive() {
        let pool = db::test_pool();
        create(&pool, "Alice", "hash").unwrap();
        assert!(find_by_username(&pool, "alice").unwrap().is_none());
    }
}
