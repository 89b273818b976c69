use std::env;

use session::{Config as SessionConfig, ConfigError, config::try_load};

pub struct Config {
    pub port: u16,
    pub session: SessionConfig,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            port: try_load(|key| env::var(key).ok(), "RUST_PORT", "1111")?,
            session: SessionConfig::load()?,
        })
    }
}
