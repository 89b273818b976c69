use std::{env, fmt::Display, fs::read_to_string, str::FromStr, time::Duration};

use tracing::{debug, info, warn};

use crate::error::ConfigError;

pub const DEFAULT_MATCH_URL: &str = "http://127.0.0.1:8000/api/calcular-match";
pub const DEFAULT_SIMPLIFY_URL: &str = "http://127.0.0.1:8000/api/explicar-ia";

#[derive(Debug, Clone)]
pub struct Config {
    pub store_url: String,
    pub store_key: String,
    pub match_url: String,
    pub simplify_url: String,
    pub store_timeout: Duration,
    pub match_timeout: Duration,
    pub simplify_timeout: Duration,
    pub deck_size: usize,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| env::var(key).ok())
    }

    pub fn load_with(vars: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            store_url: require(&vars, "SUPABASE_URL")?,
            store_key: read_secret(&vars, "SUPABASE_KEY")?,
            match_url: try_load(&vars, "MATCH_URL", DEFAULT_MATCH_URL)?,
            simplify_url: try_load(&vars, "SIMPLIFY_URL", DEFAULT_SIMPLIFY_URL)?,
            store_timeout: millis(try_load(&vars, "STORE_TIMEOUT_MS", "10000")?),
            match_timeout: millis(try_load(&vars, "MATCH_TIMEOUT_MS", "15000")?),
            simplify_timeout: millis(try_load(&vars, "SIMPLIFY_TIMEOUT_MS", "15000")?),
            deck_size: try_load(&vars, "DECK_SIZE", "10")?,
        })
    }
}

fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

fn require(vars: impl Fn(&str) -> Option<String>, key: &str) -> Result<String, ConfigError> {
    vars(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| {
            warn!("Environment variable {key} not found");
            ConfigError::Missing(key.to_string())
        })
}

pub fn try_load<T: FromStr>(
    vars: impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    vars(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::Invalid {
                key: key.to_string(),
                reason: e.to_string(),
            }
        })
}

fn read_secret(
    vars: impl Fn(&str) -> Option<String>,
    secret_name: &str,
) -> Result<String, ConfigError> {
    let path = format!("/run/secrets/{secret_name}");

    match read_to_string(&path) {
        Ok(secret) => Ok(secret.trim().to_string()),
        Err(e) => {
            debug!("Failed to read {secret_name} from {path}: {e}, trying environment");
            require(vars, secret_name)
        }
    }
}
