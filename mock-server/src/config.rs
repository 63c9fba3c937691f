use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

pub const DEFAULT_PORT: u16 = 8080;

pub struct Config {
    pub port: u16,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("PORT", DEFAULT_PORT),
        }
    }
}

fn try_load<T: FromStr + Display>(key: &str, default: T) -> T
where
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
            default
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}
