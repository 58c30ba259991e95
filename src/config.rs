use log::warn;
use std::env;

use crate::blockchain::{DEFAULT_DIFFICULTY, MAX_DIFFICULTY};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

/// Process configuration, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub difficulty: u32,
}

impl Config {
    /// Read `HOST`, `PORT` and `DIFFICULTY` from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unparsable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = lookup("PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let difficulty = match lookup("DIFFICULTY") {
            None => DEFAULT_DIFFICULTY,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(d) if d <= MAX_DIFFICULTY => d,
                _ => {
                    warn!(
                        "DIFFICULTY={raw:?} is not an integer in 0..={MAX_DIFFICULTY}; using {DEFAULT_DIFFICULTY}"
                    );
                    DEFAULT_DIFFICULTY
                }
            },
        };

        Self {
            host,
            port,
            difficulty,
        }
    }
}
