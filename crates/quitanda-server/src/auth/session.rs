//! Cookie-backed sessions. The browser carries an opaque signed token; the
//! token maps to a row in `sessions`, which holds the bound user (if any)
//! and the pending flash messages. [`Sessions`] is constructed once at
//! startup and injected through the router state.

use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::SignedCookieJar;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::db::DbPool;
use crate::store::{self, StoreError};

pub const SESSION_COOKIE: &str = "quitanda_session";

const SESSION_DURATION_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Warning,
}

impl Severity {
    fn as_str(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(Severity::Success),
            "error" => Some(Severity::Error),
            "warning" => Some(Severity::Warning),
            _ => None,
        }
    }
}

/// One-shot notifications drained for a single page render, grouped by
/// severity, insertion-ordered within each group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlashBag {
    pub success: Vec<String>,
    pub error: Vec<String>,
    pub warning: Vec<String>,
}

impl FlashBag {
    pub fn is_empty(&self) -> bool {
        self.success.is_empty() && self.error.is_empty() && self.warning.is_empty()
    }

    fn push(&mut self, severity: Severity, message: String) {
        match severity {
            Severity::Success => self.success.push(message),
            Severity::Error => self.error.push(message),
            Severity::Warning => self.warning.push(message),
        }
    }
}

/// A session as seen by one request. `row_id` is `None` until the session is
/// first written to (lazy persistence, unless configured otherwise); `fresh`
/// marks a token minted by this request, which must be sent back as a cookie.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    row_id: Option<String>,
    token: String,
    fresh: bool,
    user_id: Option<i64>,
    username: Option<String>,
}

impl SessionHandle {
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }
}

#[derive(Clone)]
pub struct Sessions {
    pool: DbPool,
    config: SessionConfig,
}

impl Sessions {
    pub fn new(pool: DbPool, config: SessionConfig) -> Self {
        Self { pool, config }
    }

    /// Load the session named by the request cookie, or mint a fresh one.
    /// Idempotent per token: two opens of the same valid token see the same
    /// session row.
    pub fn open(&self, jar: &SignedCookieJar) -> Result<SessionHandle, StoreError> {
        if let Some(cookie) = jar.get(SESSION_COOKIE) {
            if let Some(handle) = self.load(cookie.value())? {
                return Ok(handle);
            }
        }

        let mut handle = SessionHandle {
            row_id: None,
            token: generate_token(),
            fresh: true,
            user_id: None,
            username: None,
        };
        if self.config.save_uninitialized {
            self.persist(&mut handle)?;
        }
        Ok(handle)
    }

    /// Read-only lookup for gate checks: `Some` only for a valid, unexpired,
    /// user-bound session. Never creates anything.
    pub fn authenticate(
        &self,
        jar: &SignedCookieJar,
    ) -> Result<Option<SessionHandle>, StoreError> {
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Ok(None);
        };
        match self.load(cookie.value())? {
            Some(handle) if handle.is_authenticated() => Ok(Some(handle)),
            _ => Ok(None),
        }
    }

    /// Associate the session with a user. Takes effect for the rest of this
    /// request and every later request bearing the same token.
    pub fn bind(
        &self,
        handle: &mut SessionHandle,
        user_id: i64,
        username: &str,
    ) -> Result<(), StoreError> {
        let id = self.persist(handle)?;
        let conn = store::checkout(&self.pool)?;
        conn.execute(
            "UPDATE sessions SET user_id = ?1, username = ?2 WHERE id = ?3",
            rusqlite::params![user_id, username, id],
        )?;
        handle.user_id = Some(user_id);
        handle.username = Some(username.to_string());
        Ok(())
    }

    pub fn push_flash(
        &self,
        handle: &mut SessionHandle,
        severity: Severity,
        message: impl Into<String>,
    ) -> Result<(), StoreError> {
        let id = self.persist(handle)?;
        let conn = store::checkout(&self.pool)?;
        conn.execute(
            "INSERT INTO flash_messages (session_id, severity, message) VALUES (?1, ?2, ?3)",
            rusqlite::params![id, severity.as_str(), message.into()],
        )?;
        Ok(())
    }

    /// Return and clear all pending flash messages. Select and delete run on
    /// the same connection, so the request that reads a message is the one
    /// that consumes it.
    pub fn drain_flash(&self, handle: &SessionHandle) -> Result<FlashBag, StoreError> {
        let Some(id) = handle.row_id.as_deref() else {
            return Ok(FlashBag::default());
        };

        let conn = store::checkout(&self.pool)?;
        let mut bag = FlashBag::default();
        {
            let mut stmt = conn.prepare(
                "SELECT severity, message FROM flash_messages WHERE session_id = ?1 ORDER BY id",
            )?;
            let rows = stmt.query_map(rusqlite::params![id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;
            for row in rows {
                let (severity, message) = row?;
                if let Some(severity) = Severity::parse(&severity) {
                    bag.push(severity, message);
                }
            }
        }
        conn.execute(
            "DELETE FROM flash_messages WHERE session_id = ?1",
            rusqlite::params![id],
        )?;
        Ok(bag)
    }

    /// Invalidate the session named by the cookie and expire the cookie
    /// itself. Requests that still present the old token are anonymous.
    pub fn destroy(&self, jar: SignedCookieJar) -> Result<SignedCookieJar, StoreError> {
        if let Some(cookie) = jar.get(SESSION_COOKIE) {
            let conn = store::checkout(&self.pool)?;
            conn.execute(
                "DELETE FROM sessions WHERE token = ?1",
                rusqlite::params![cookie.value()],
            )?;
        }

        let removal = Cookie::build(SESSION_COOKIE)
            .path("/")
            .max_age(time::Duration::ZERO)
            .http_only(true)
            .build();
        Ok(jar.add(removal))
    }

    /// Attach the session cookie to the response jar when a token minted by
    /// this request actually got a row; otherwise the jar passes through
    /// untouched.
    pub fn apply(&self, handle: &SessionHandle, jar: SignedCookieJar) -> SignedCookieJar {
        if !handle.fresh || handle.row_id.is_none() {
            return jar;
        }
        jar.add(self.build_cookie(handle.token.clone()))
    }

    fn load(&self, token: &str) -> Result<Option<SessionHandle>, StoreError> {
        let conn = store::checkout(&self.pool)?;
        let now = timestamp(Utc::now());
        let result = conn.query_row(
            "SELECT id, user_id, username FROM sessions WHERE token = ?1 AND expires_at > ?2",
            rusqlite::params![token, now],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<i64>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            },
        );

        match result {
            Ok((id, user_id, username)) => Ok(Some(SessionHandle {
                row_id: Some(id),
                token: token.to_string(),
                fresh: false,
                user_id,
                username,
            })),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn persist(&self, handle: &mut SessionHandle) -> Result<String, StoreError> {
        if let Some(id) = &handle.row_id {
            return Ok(id.clone());
        }

        let conn = store::checkout(&self.pool)?;
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        conn.execute(
            "INSERT INTO sessions (id, token, user_id, username, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                id,
                handle.token,
                handle.user_id,
                handle.username,
                timestamp(now),
                timestamp(now + Duration::days(SESSION_DURATION_DAYS)),
            ],
        )?;
        handle.row_id = Some(id.clone());
        Ok(id)
    }

    fn build_cookie(&self, token: String) -> Cookie<'static> {
        let mut builder = Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .secure(self.config.secure_cookies)
            .same_site(SameSite::Lax);
        if self.config.persistent_cookies {
            builder = builder.max_age(time::Duration::days(SESSION_DURATION_DAYS));
        }
        builder.build()
    }
}

fn generate_token() -> String {
    use base64::Engine;
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn timestamp(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_extra::extract::cookie::Key;

    use crate::db;

    fn setup() -> (Sessions, Key) {
        let config = SessionConfig {
            secret: "0123456789abcdef0123456789abcdef".to_string(),
            secure_cookies: false,
            persistent_cookies: false,
            save_uninitialized: false,
        };
        let key = Key::derive_from(config.secret.as_bytes());
        (Sessions::new(db::test_pool(), config), key)
    }

    #[test]
    fn open_without_cookie_is_anonymous_and_unpersisted() {
        let (sessions, key) = setup();
        let jar = SignedCookieJar::new(key);

        let handle = sessions.open(&jar).unwrap();
        assert!(!handle.is_authenticated());
        assert!(handle.row_id.is_none());

        // Nothing written, so no cookie goes out either.
        let jar = sessions.apply(&handle, jar);
        assert!(jar.get(SESSION_COOKIE).is_none());
    }

    #[test]
    fn flash_is_delivered_exactly_once() {
        let (sessions, key) = setup();
        let jar = SignedCookieJar::new(key);

        let mut handle = sessions.open(&jar).unwrap();
        sessions
            .push_flash(&mut handle, Severity::Success, "primeira")
            .unwrap();
        sessions
            .push_flash(&mut handle, Severity::Success, "segunda")
            .unwrap();
        sessions
            .push_flash(&mut handle, Severity::Warning, "atenção")
            .unwrap();

        let bag = sessions.drain_flash(&handle).unwrap();
        assert_eq!(bag.success, ["primeira", "segunda"]);
        assert_eq!(bag.warning, ["atenção"]);
        assert!(bag.error.is_empty());

        let second = sessions.drain_flash(&handle).unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn bind_survives_a_cookie_roundtrip() {
        let (sessions, key) = setup();
        let jar = SignedCookieJar::new(key);

        let mut handle = sessions.open(&jar).unwrap();
        sessions.bind(&mut handle, 7, "alice").unwrap();
        assert!(handle.is_authenticated());

        // Replay the cookie the way the browser would.
        let jar = sessions.apply(&handle, jar);
        let reloaded = sessions.open(&jar).unwrap();
        assert_eq!(reloaded.user_id(), Some(7));
        assert_eq!(reloaded.username(), Some("alice"));

        let gate = sessions.authenticate(&jar).unwrap();
        assert!(gate.is_some());
    }

    #[test]
    fn destroy_makes_the_token_anonymous() {
        let (sessions, key) = setup();
        let jar = SignedCookieJar::new(key);

        let mut handle = sessions.open(&jar).unwrap();
        sessions.bind(&mut handle, 1, "alice").unwrap();
        let jar = sessions.apply(&handle, jar);

        let jar = sessions.destroy(jar).unwrap();
        assert!(sessions.authenticate(&jar).unwrap().is_none());
    }

    #[test]
    fn authenticate_ignores_anonymous_sessions() {
        let (sessions, key) = setup();
        let jar = SignedCookieJar::new(key);

        let mut handle = sessions.open(&jar).unwrap();
        sessions
            .push_flash(&mut handle, Severity::Error, "algo")
            .unwrap();
        let jar = sessions.apply(&handle, jar);

        // Persisted, but no user bound.
        assert!(sessions.authenticate(&jar).unwrap().is_none());
        assert!(sessions.open(&jar).unwrap().row_id.is_some());
    }

    #[test]
    fn save_uninitialized_persists_immediately() {
        let config = SessionConfig {
            secret: "0123456789abcdef0123456789abcdef".to_string(),
            secure_cookies: false,
            persistent_cookies: false,
            save_uninitialized: true,
        };
        let key = Key::derive_from(config.secret.as_bytes());
        let sessions = Sessions::new(db::test_pool(), config);
        let jar = SignedCookieJar::new(key);

        let handle = sessions.open(&jar).unwrap();
        assert!(handle.row_id.is_some());

        let jar = sessions.apply(&handle, jar);
        assert!(jar.get(SESSION_COOKIE).is_some());
    }
}
