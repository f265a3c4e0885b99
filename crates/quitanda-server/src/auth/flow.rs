//! Registration and login. Both return outcomes rather than errors for the
//! recoverable cases, so handlers can translate them into flash messages and
//! redirects; only infrastructure failures surface as [`AppError`].

use crate::auth::password;
use crate::auth::session::{SessionHandle, Sessions};
use crate::db::DbPool;
use crate::error::AppResult;
use crate::store::{users, StoreError};

#[derive(Debug, PartialEq)]
pub enum RegisterOutcome {
    Registered,
    MissingFields,
    UsernameTaken,
    /// Store failure; the message is shown to the user as-is.
    Failed(String),
}

#[derive(Debug, PartialEq)]
pub enum LoginOutcome {
    Authenticated { username: String },
    MissingFields,
    /// Unknown username and wrong password collapse into this one variant,
    /// so the response cannot be used to enumerate accounts.
    InvalidCredentials,
}

pub fn register(pool: &DbPool, username: &str, password: &str) -> AppResult<RegisterOutcome> {
    if username.is_empty() || password.is_empty() {
        return Ok(RegisterOutcome::MissingFields);
    }

    let hash = password::hash_password(password)?;
    match users::create(pool, username, &hash) {
        Ok(_) => Ok(RegisterOutcome::Registered),
        Err(StoreError::DuplicateKey) => Ok(RegisterOutcome::UsernameTaken),
        Err(e) => Ok(RegisterOutcome::Failed(e.to_string())),
    }
}

pub fn login(
    pool: &DbPool,
    sessions: &Sessions,
    session: &mut SessionHandle,
    username: &str,
    password: &str,
) -> AppResult<LoginOutcome> {
    if username.is_empty() || password.is_empty() {
        return Ok(LoginOutcome::MissingFields);
    }

    let Some(user) = users::find_by_username(pool, username)? else {
        return Ok(LoginOutcome::InvalidCredentials);
    };

    if !password::verify_password(password, &user.password_hash)? {
        return Ok(LoginOutcome::InvalidCredentials);
    }

    sessions.bind(session, user.id, &user.username)?;
    Ok(LoginOutcome::Authenticated {
        username: user.username,
    })
}
