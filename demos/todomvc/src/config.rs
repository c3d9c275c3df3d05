//! Runtime configuration, read from the environment.
//!
//! | variable | default | meaning |
//! |---|---|---|
//! | `TODOMVC_FILTER` | `SHOW_ALL` | filter the list starts with |
//! | `TODOMVC_ACTION_BUFFER` | `16` | action broadcast capacity, at most 65536 |
//! | `TODOMVC_SHUTDOWN_TIMEOUT_SECS` | `5` | how long shutdown waits for effects |
//! | `TODOMVC_METRICS_ADDR` | unset | serve Prometheus metrics over HTTP on this address |

use crate::types::{ParseFilterError, VisibilityFilter};
use reactive_todo_runtime::{MAX_ACTION_BUFFER, StoreConfig};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

/// Initial filter variable
pub const FILTER_VAR: &str = "TODOMVC_FILTER";
/// Action broadcast capacity variable
pub const ACTION_BUFFER_VAR: &str = "TODOMVC_ACTION_BUFFER";
/// Shutdown timeout variable, in seconds
pub const SHUTDOWN_TIMEOUT_VAR: &str = "TODOMVC_SHUTDOWN_TIMEOUT_SECS";
/// Metrics address variable
pub const METRICS_ADDR_VAR: &str = "TODOMVC_METRICS_ADDR";

/// Errors from reading configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The initial filter is not a known filter
    #[error("TODOMVC_FILTER: {0}")]
    Filter(#[from] ParseFilterError),

    /// A numeric variable did not parse
    #[error("{name}: `{value}` is not a non-negative integer")]
    Number {
        /// Variable name
        name: &'static str,
        /// Offending value
        value: String,
    },

    /// A numeric variable is larger than allowed
    #[error("{name}: `{value}` exceeds the maximum of {max}")]
    OutOfRange {
        /// Variable name
        name: &'static str,
        /// Offending value
        value: String,
        /// Largest accepted value
        max: usize,
    },

    /// The metrics address did not parse
    #[error("TODOMVC_METRICS_ADDR: `{0}` is not a socket address")]
    MetricsAddr(String),
}

/// TodoMVC configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoConfig {
    /// Filter of the initial state
    pub initial_filter: VisibilityFilter,
    /// Action broadcast capacity
    pub action_buffer: usize,
    /// Shutdown timeout
    pub shutdown_timeout: Duration,
    /// Where metrics are exposed, if at all
    pub metrics_addr: Option<SocketAddr>,
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self {
            initial_filter: VisibilityFilter::ShowAll,
            action_buffer: 16,
            shutdown_timeout: Duration::from_secs(5),
            metrics_addr: None,
        }
    }
}

impl TodoConfig {
    /// Read configuration from the process environment
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a variable that is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to its
    /// value if set
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a variable that is set but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(filter) = lookup(FILTER_VAR) {
            config.initial_filter = filter.parse()?;
        }

        if let Some(buffer) = lookup(ACTION_BUFFER_VAR) {
            let parsed: usize = parse_number(ACTION_BUFFER_VAR, &buffer)?;
            if parsed > MAX_ACTION_BUFFER {
                return Err(ConfigError::OutOfRange {
                    name: ACTION_BUFFER_VAR,
                    value: buffer,
                    max: MAX_ACTION_BUFFER,
                });
            }
            config.action_buffer = parsed;
        }

        if let Some(secs) = lookup(SHUTDOWN_TIMEOUT_VAR) {
            config.shutdown_timeout = Duration::from_secs(parse_number(SHUTDOWN_TIMEOUT_VAR, &secs)?);
        }

        if let Some(addr) = lookup(METRICS_ADDR_VAR) {
            let parsed = addr
                .trim()
                .parse()
                .map_err(|_| ConfigError::MetricsAddr(addr.clone()))?;
            config.metrics_addr = Some(parsed);
        }

        Ok(config)
    }

    /// The store configuration this maps to
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::default()
            .with_action_buffer(self.action_buffer)
            .with_shutdown_timeout(self.shutdown_timeout)
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Number {
        name,
        value: value.to_string(),
    })
}
