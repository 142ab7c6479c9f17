//! Rate-limited advisory text for the top banner.
//!
//! The provider is a slow loop next to the simulation: it only asks its
//! [`InsightSource`] for a new message once the refresh window has elapsed,
//! and it keeps the previous message whenever the source fails.

use crate::metrics::MetricsState;
use crate::prng::RandomSource;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_INSIGHT: &str = "Your garden is waiting for your attention.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsightError {
    #[error("insight source returned an empty message")]
    Empty,
    #[error("malformed insight response: {0}")]
    Malformed(String),
    #[error("insight source unavailable: {0}")]
    Unavailable(String),
    #[error("insight fetch timed out after {0:?}")]
    TimedOut(Duration),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InsightConfig {
    /// Minimum time between successful refreshes.
    pub min_interval_ms: u64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 10_000,
        }
    }
}

impl InsightConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

/// Anything that can phrase a message for a metrics snapshot.
pub trait InsightSource: Send + Sync {
    fn insight(
        &self,
        metrics: &MetricsState,
        rng: &mut dyn RandomSource,
    ) -> Result<String, InsightError>;
}

/// Built-in source: fixed priority rules, then a random generic line.
#[derive(Debug, Clone, Default)]
pub struct RuleTable;

impl RuleTable {
    pub const FALLBACKS: [&'static str; 4] = [
        "Clean air is the first step toward a quiet mind.",
        "Breathe deep. Your environment is currently in sync with your biology.",
        "Presence begins with the simple act of noticing the air around you.",
        "The rhythm of your breath dictates the pace of your thoughts.",
    ];

    /// First rule that fires, if any.
    pub fn rule_for(metrics: &MetricsState) -> Option<&'static str> {
        if metrics.aqi < 30.0 {
            return Some(
                "Exceptional air quality today. Your brain is receiving optimal oxygen for deep focus.",
            );
        }
        if metrics.aqi > 100.0 {
            return Some(
                "The atmosphere is heavy. Use the 'Ocean Breath' meditation to filter your internal state.",
            );
        }
        if metrics.calm_score > 85.0 {
            return Some("Your inner silence matches the clarity of your surroundings.");
        }
        if metrics.calm_score < 40.0 {
            return Some(
                "Stress is a cloud; breathing is the wind that moves it. Focus on long exhales.",
            );
        }
        None
    }
}

impl InsightSource for RuleTable {
    fn insight(
        &self,
        metrics: &MetricsState,
        rng: &mut dyn RandomSource,
    ) -> Result<String, InsightError> {
        let text = match Self::rule_for(metrics) {
            Some(t) => t,
            None => Self::FALLBACKS[rng.gen_range_usize(0, Self::FALLBACKS.len())],
        };
        Ok(text.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct InsightState {
    pub text: String,
    /// Engine-clock time of the last successful refresh.
    pub last_refresh_at: Option<Duration>,
}

impl Default for InsightState {
    fn default() -> Self {
        Self {
            text: DEFAULT_INSIGHT.to_string(),
            last_refresh_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Inside the rate-limit window; nothing asked.
    Skipped,
    Updated,
    /// Source failed; previous text retained.
    Failed,
}

pub struct InsightProvider {
    cfg: InsightConfig,
    source: Arc<dyn InsightSource>,
    state: InsightState,
}

impl std::fmt::Debug for InsightProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsightProvider")
            .field("cfg", &self.cfg)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl InsightProvider {
    pub fn new(cfg: InsightConfig) -> Self {
        Self::with_source(cfg, Arc::new(RuleTable))
    }

    pub fn with_source(cfg: InsightConfig, source: Arc<dyn InsightSource>) -> Self {
        Self {
            cfg,
            source,
            state: InsightState::default(),
        }
    }

    pub fn config(&self) -> &InsightConfig {
        &self.cfg
    }

    pub fn state(&self) -> &InsightState {
        &self.state
    }

    pub fn text(&self) -> &str {
        &self.state.text
    }

    /// Shared handle for fetching outside of whatever lock owns the provider.
    pub fn source(&self) -> Arc<dyn InsightSource> {
        Arc::clone(&self.source)
    }

    pub fn is_due(&self, now: Duration) -> bool {
        match self.state.last_refresh_at {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.cfg.min_interval(),
        }
    }

    /// Commit a fetch result. Only a non-empty success moves the window.
    pub fn apply(
        &mut self,
        now: Duration,
        result: Result<String, InsightError>,
    ) -> RefreshOutcome {
        match result {
            Ok(text) if !text.trim().is_empty() => {
                debug!(?now, "insight refreshed");
                self.state.text = text;
                self.state.last_refresh_at = Some(now);
                RefreshOutcome::Updated
            }
            Ok(_) => {
                warn!(error = %InsightError::Empty, "insight refresh failed; keeping previous text");
                RefreshOutcome::Failed
            }
            Err(e) => {
                warn!(error = %e, "insight refresh failed; keeping previous text");
                RefreshOutcome::Failed
            }
        }
    }

    /// Synchronous refresh: window check, fetch, commit.
    pub fn refresh(
        &mut self,
        now: Duration,
        metrics: &MetricsState,
        rng: &mut dyn RandomSource,
    ) -> RefreshOutcome {
        if !self.is_due(now) {
            return RefreshOutcome::Skipped;
        }
        let result = self.source.insight(metrics, rng);
        self.apply(now, result)
    }

    /// Forget the window and go back to the default text.
    pub fn reset(&mut self) {
        self.state = InsightState::default();
    }
}
