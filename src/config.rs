use std::{env, path::PathBuf, time::Duration};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REMEMBER_PATH: &str = "data/remembered_user.json";
const DEFAULT_LOGIN_DELAY_MS: u64 = 800;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub remember_path: PathBuf,
    /// Pause before answering a login attempt.
    pub login_delay: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let remember_path = lookup("APP_REMEMBER_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REMEMBER_PATH));
        let login_delay_ms = lookup("APP_LOGIN_DELAY_MS")
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_LOGIN_DELAY_MS);

        Self {
            port,
            remember_path,
            login_delay: Duration::from_millis(login_delay_ms),
        }
    }
}
