use std::env;

/// Session middleware settings, grouped so the knobs that belong together
/// travel together instead of living in an anonymous bag of env lookups.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Cookie-signing secret. Must be at least 32 bytes; the signing key is
    /// derived from it at startup.
    pub secret: String,
    /// Mark session cookies `Secure` (HTTPS-only).
    pub secure_cookies: bool,
    /// Persistent cookies carry a Max-Age; otherwise the cookie dies with
    /// the browser session.
    pub persistent_cookies: bool,
    /// Persist a session row even before anything is written to it.
    pub save_uninitialized: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub sqlite_path: String,
    pub public_dir: String,
    pub session: SessionConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a valid port number"),
            sqlite_path: env::var("SQLITE_PATH")
                .unwrap_or_else(|_| "./data/quitanda.db".to_string()),
            public_dir: env::var("PUBLIC_DIR").unwrap_or_else(|_| "./public".to_string()),
            session: SessionConfig {
                secret: env::var("SESSION_SECRET")
                    .unwrap_or_else(|_| "change-me-to-a-random-32-char-string".to_string()),
                secure_cookies: env::var("SECURE_COOKIES")
                    .unwrap_or_else(|_| "false".to_string())
                    .parse()
                    .unwrap_or(false),
                persistent_cookies: env::var("PERSISTENT_COOKIES")
                    .unwrap_or_else(|_| "false".to_string())
                    .parse()
                    .unwrap_or(false),
                save_uninitialized: env::var("SESSION_SAVE_UNINITIALIZED")
                    .unwrap_or_else(|_| "false".to_string())
                    .parse()
                    .unwrap_or(false),
            },
        }
    }
}
