use std::{env, fmt::Display, str::FromStr};

use tracing::info;

/// Environment-driven server configuration, loaded once at startup.
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Bearer token lifetime.
    pub session_ttl_days: i64,
    pub password_policy: crate::validation::PasswordPolicy,
}

impl Config {
    pub fn load() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: try_load("PORT", "3000"),
            session_ttl_days: try_load("SESSION_TTL_DAYS", "30"),
            password_policy: crate::validation::PasswordPolicy {
                min_length: try_load("PASSWORD_MIN_LENGTH", "8"),
            },
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .unwrap_or_else(|e| panic!("Invalid {key} value: {e}"))
}
