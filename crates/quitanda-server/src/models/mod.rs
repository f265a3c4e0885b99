use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Argon2 PHC string, never the plaintext.
    #[serde(skip_serializing)]
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Item {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
}
