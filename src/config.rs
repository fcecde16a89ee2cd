use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::warn;

use crate::schedule::SchedulerConfig;

pub const STATE_PATH_VAR: &str = "PLANNER_STATE_PATH";
pub const HTTP_ADDR_VAR: &str = "PLANNER_HTTP_ADDR";
pub const MAX_ENERGY_VAR: &str = "PLANNER_MAX_ENERGY";

pub const DEFAULT_STATE_PATH: &str = "dual-stream-planner-state.json";
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:3000";

/// Settings for the binaries, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub state_path: PathBuf,
    pub http_addr: SocketAddr,
    pub scheduler: SchedulerConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            http_addr: default_addr(),
            scheduler: SchedulerConfig::default(),
        }
    }
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Unparseable
    /// values are ignored with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(STATE_PATH_VAR).filter(|v| !v.trim().is_empty()) {
            config.state_path = PathBuf::from(path.trim());
        }

        if let Some(raw) = lookup(HTTP_ADDR_VAR) {
            match raw.trim().parse::<SocketAddr>() {
                Ok(addr) => config.http_addr = addr,
                Err(err) => warn!(
                    value = %raw,
                    error = %err,
                    "ignoring {HTTP_ADDR_VAR}; using {DEFAULT_HTTP_ADDR}"
                ),
            }
        }

        if let Some(raw) = lookup(MAX_ENERGY_VAR) {
            match raw.trim().parse::<u32>() {
                Ok(value) if value > 0 => config.scheduler.max_energy_per_day = value,
                _ => warn!(value = %raw, "ignoring {MAX_ENERGY_VAR}; expected a positive integer"),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        let config = ServiceConfig::from_lookup(|_| None);
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.http_addr.to_string(), DEFAULT_HTTP_ADDR);
        assert_eq!(config.scheduler.max_energy_per_day, 10);
    }

    #[test]
    fn reads_overrides() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            (STATE_PATH_VAR, "/tmp/planner.json"),
            (HTTP_ADDR_VAR, "127.0.0.1:8080"),
            (MAX_ENERGY_VAR, "12"),
        ]));
        assert_eq!(config.state_path, PathBuf::from("/tmp/planner.json"));
        assert_eq!(config.http_addr.port(), 8080);
        assert_eq!(config.scheduler.max_energy_per_day, 12);
    }

    #[test]
    fn bad_values_fall_back() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            (HTTP_ADDR_VAR, "not-an-addr"),
            (MAX_ENERGY_VAR, "0"),
        ]));
        assert_eq!(config.http_addr, default_addr());
        assert_eq!(config.scheduler.max_energy_per_day, 10);
    }
}
