use std::net::SocketAddr;
use thiserror::Error;

use crate::event::DEFAULT_GAME_CAPACITY;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid bind address '{0}'")]
    InvalidBindAddr(String),

    #[error("Invalid event capacity '{0}': expected a positive integer")]
    InvalidEventCapacity(String),
}

/// Server settings read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Events queued per subscriber before emitting waits for it
    pub event_capacity: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = match lookup("BOXSCORE_BIND_ADDR") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidBindAddr(raw))?,
            None => DEFAULT_BIND_ADDR
                .parse()
                .map_err(|_| ConfigError::InvalidBindAddr(DEFAULT_BIND_ADDR.to_string()))?,
        };

        let event_capacity = match lookup("BOXSCORE_EVENT_CAPACITY") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(capacity) if capacity > 0 => capacity,
                _ => return Err(ConfigError::InvalidEventCapacity(raw)),
            },
            None => DEFAULT_GAME_CAPACITY,
        };

        Ok(Self {
            bind_addr,
            event_capacity,
        })
    }
}
