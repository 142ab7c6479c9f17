//! Progress tracking for the selected focus challenge.

use crate::catalog::ChallengeDefinition;
use crate::metrics::MetricsState;
use tracing::info;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Progress at or above this value completes the challenge on the next tick.
pub const COMPLETION_THRESHOLD: f32 = 99.9;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ChallengeConfig {
    /// Points lost per tick below target. Never less than 0.5.
    pub penalty: f32,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self { penalty: 0.5 }
    }
}

impl ChallengeConfig {
    pub const MIN_PENALTY: f32 = 0.5;

    fn effective_penalty(&self) -> f32 {
        if self.penalty.is_nan() {
            return Self::MIN_PENALTY;
        }
        self.penalty.max(Self::MIN_PENALTY)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "state"))]
pub enum ChallengeState {
    Idle,
    InProgress { progress: f32 },
    Complete,
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChallengeTick {
    /// Nothing selected, or already complete.
    Inactive,
    Advanced { progress: f32 },
    Decayed { progress: f32 },
    Completed,
}

#[derive(Debug, Clone)]
struct ActiveChallenge {
    def: ChallengeDefinition,
    progress: f32,
    complete: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ChallengeEngine {
    cfg: ChallengeConfig,
    active: Option<ActiveChallenge>,
}

impl ChallengeEngine {
    pub fn new(cfg: ChallengeConfig) -> Self {
        Self { cfg, active: None }
    }

    pub fn state(&self) -> ChallengeState {
        match &self.active {
            None => ChallengeState::Idle,
            Some(a) if a.complete => ChallengeState::Complete,
            Some(a) => ChallengeState::InProgress {
                progress: a.progress,
            },
        }
    }

    pub fn active(&self) -> Option<&ChallengeDefinition> {
        self.active.as_ref().map(|a| &a.def)
    }

    /// Display progress in `[0, 100]`; 0 when idle.
    pub fn progress(&self) -> f32 {
        match &self.active {
            None => 0.0,
            Some(a) if a.complete => 100.0,
            Some(a) => a.progress,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state(), ChallengeState::Complete)
    }

    /// Start `def` from zero, replacing whatever was active.
    pub fn select(&mut self, def: ChallengeDefinition) {
        info!(challenge = def.id, title = def.title, "challenge selected");
        self.active = Some(ActiveChallenge {
            def,
            progress: 0.0,
            complete: false,
        });
    }

    pub fn deselect(&mut self) {
        if let Some(a) = self.active.take() {
            info!(challenge = a.def.id, "challenge deselected");
        }
    }

    /// Button semantics: pressing the active challenge turns it off, pressing
    /// any other challenge switches to it from zero.
    pub fn toggle(&mut self, def: ChallengeDefinition) -> ChallengeState {
        let same = self.active.as_ref().is_some_and(|a| a.def.id == def.id);
        self.deselect();
        if !same {
            self.select(def);
        }
        self.state()
    }

    /// One second of scoring against the live metrics.
    pub fn tick(&mut self, metrics: &MetricsState) -> ChallengeTick {
        let penalty = self.cfg.effective_penalty();
        let Some(a) = self.active.as_mut() else {
            return ChallengeTick::Inactive;
        };
        if a.complete {
            return ChallengeTick::Inactive;
        }
        if a.progress >= COMPLETION_THRESHOLD {
            a.complete = true;
            a.progress = 100.0;
            info!(challenge = a.def.id, "challenge complete");
            return ChallengeTick::Completed;
        }

        let live = metrics.target_value(a.def.metric);
        if live >= a.def.target_value {
            let step = 100.0 / a.def.target_duration_secs.max(1) as f32;
            a.progress = (a.progress + step).clamp(0.0, 100.0);
            ChallengeTick::Advanced {
                progress: a.progress,
            }
        } else {
            a.progress = (a.progress - penalty).clamp(0.0, 100.0);
            ChallengeTick::Decayed {
                progress: a.progress,
            }
        }
    }
}
