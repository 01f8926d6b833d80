//! Configuration types.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Default bind address for the webhook server.
pub const DEFAULT_BIND: &str = "0.0.0.0";

/// Default webhook port.
pub const DEFAULT_PORT: u16 = 5000;

/// Skill server configuration.
#[derive(Debug, Clone)]
pub struct SkillConfig {
    /// Address the HTTP listener binds to.
    pub bind: IpAddr,
    /// Port the HTTP listener binds to.
    pub port: u16,
    /// Model snapshot for the prediction oracle. When unset the skill runs
    /// without predictions and simply ends the session on approval.
    pub model_path: Option<PathBuf>,
    /// Directory for daily-rolling log files, in addition to stderr.
    pub log_dir: Option<PathBuf>,
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            model_path: None,
            log_dir: None,
        }
    }
}

impl SkillConfig {
    /// Build the configuration from `DIABOTIK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = lookup("DIABOTIK_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: IpAddr = bind_raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::InvalidValue {
                key: "DIABOTIK_BIND".to_string(),
                message: format!("{bind_raw:?}: {e}"),
            })?;

        let port = match lookup("DIABOTIK_PORT") {
            Some(raw) => raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
                key: "DIABOTIK_PORT".to_string(),
                message: format!("{raw:?}: {e}"),
            })?,
            None => DEFAULT_PORT,
        };

        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            bind,
            port,
            model_path: non_empty("DIABOTIK_MODEL_PATH").map(PathBuf::from),
            log_dir: non_empty("DIABOTIK_LOG_DIR").map(PathBuf::from),
        })
    }

    /// Socket address for the HTTP listener.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}
