//! Client configuration resolved from environment variables.
//!
//! | Variable            | Meaning                                 | Default          |
//! |---------------------|-----------------------------------------|------------------|
//! | `JRPC_ADDR`         | Server address (`host:port`)            | `127.0.0.1:1234` |
//! | `JRPC_TIMEOUT_SECS` | Per-call timeout, `0` disables it       | unset (none)     |
//! | `JRPC_DEBUG`        | Debug level: 1 = debug, 2+ = JSON dumps | `0`              |

use std::time::Duration;

use anyhow::{Context, Result};

/// Address used when `JRPC_ADDR` is not set.
pub const DEFAULT_ADDR: &str = "127.0.0.1:1234";

pub const ADDR_VAR: &str = "JRPC_ADDR";
pub const TIMEOUT_VAR: &str = "JRPC_TIMEOUT_SECS";
pub const DEBUG_VAR: &str = "JRPC_DEBUG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server address to dial.
    pub addr: String,
    /// Per-call timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Verbosity of the default log filter.
    pub debug_level: u8,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            timeout: None,
            debug_level: 0,
        }
    }
}

impl ClientConfig {
    /// Resolve configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through `lookup`, which returns the value of
    /// a variable if it is set.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();

        if let Some(addr) = get(ADDR_VAR) {
            config.addr = addr;
        }

        if let Some(raw) = get(TIMEOUT_VAR) {
            let secs: u64 = raw
                .parse()
                .with_context(|| format!("Invalid {} value: {}", TIMEOUT_VAR, raw))?;
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        if let Some(raw) = get(DEBUG_VAR) {
            config.debug_level = raw
                .parse()
                .with_context(|| format!("Invalid {} value: {}", DEBUG_VAR, raw))?;
        }

        Ok(config)
    }
}
