use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub supabase_url: String,
    pub supabase_key: String,
}

impl Config {
    /// Loads configuration from the environment. The store endpoint and key
    /// are mandatory; a missing value aborts startup instead of failing on
    /// the first request.
    pub fn load() -> Self {
        Self {
            port: try_load("RUST_PORT", "8000"),
            supabase_url: require("SUPABASE_URL"),
            supabase_key: require("SUPABASE_KEY"),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn require(key: &str) -> String {
    var(key).expect("Environment misconfigured!")
}
