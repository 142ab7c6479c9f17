//! Daemon configuration: `config.json` in the data directory, then
//! `BENEME_*` environment overrides.

use beneme::engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_ADDR: &str = "127.0.0.1:9877";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub listen_addr: String,
    /// Upper bound on a single insight fetch.
    pub insight_timeout_ms: u64,
    pub engine: EngineConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_ADDR.to_string(),
            insight_timeout_ms: 5_000,
            engine: EngineConfig::default(),
        }
    }
}

impl Settings {
    /// A missing file is not an error; it yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// File then environment. Anything invalid is logged and left at its
    /// previous value.
    pub fn load_or_default(path: &Path) -> Self {
        let mut settings = match Self::load(path) {
            Ok(s) => s,
            Err(e) => {
                warn!("{e}; using defaults");
                Self::default()
            }
        };
        for e in settings.apply_overrides(|var| std::env::var(var).ok()) {
            warn!("{e}");
        }
        info!(addr = %settings.listen_addr, period_ms = settings.engine.simulation.period_ms, "settings loaded");
        settings
    }

    pub fn apply_overrides(&mut self, get: impl Fn(&str) -> Option<String>) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        // BENEME_ADDR=127.0.0.1:9877
        if let Some(v) = get("BENEME_ADDR") {
            let v = v.trim();
            if v.is_empty() {
                errors.push(ConfigError::InvalidEnv {
                    var: "BENEME_ADDR",
                    value: v.to_string(),
                });
            } else {
                self.listen_addr = v.to_string();
            }
        }

        // BENEME_TICK_MS=2000
        match parse_u64(&get, "BENEME_TICK_MS") {
            Ok(Some(ms)) => {
                self.engine.simulation = self.engine.simulation.clone().with_period_ms(ms)
            }
            Ok(None) => {}
            Err(e) => errors.push(e),
        }

        // BENEME_INSIGHT_INTERVAL_MS=10000
        match parse_u64(&get, "BENEME_INSIGHT_INTERVAL_MS") {
            Ok(Some(ms)) => self.engine.insight.min_interval_ms = ms,
            Ok(None) => {}
            Err(e) => errors.push(e),
        }

        // BENEME_SEED=42
        match parse_u64(&get, "BENEME_SEED") {
            Ok(Some(seed)) => self.engine.seed = seed,
            Ok(None) => {}
            Err(e) => errors.push(e),
        }

        errors
    }

    pub fn insight_timeout(&self) -> Duration {
        Duration::from_millis(self.insight_timeout_ms.max(1))
    }
}

fn parse_u64(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<u64>, ConfigError> {
    let Some(v) = get(var) else {
        return Ok(None);
    };
    v.trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidEnv { var, value: v })
}
