//! The owning container for all live state.
//!
//! `WellnessEngine` holds the one [`SimulationDriver`] (and with it the one
//! [`MetricsState`]) plus every state machine that reads it. Hosts drive it
//! with explicit clock values; nothing in here sleeps or spawns.

use crate::booking::BookingWizard;
use crate::catalog::{self, MeditationMode};
use crate::challenge::{ChallengeConfig, ChallengeEngine, ChallengeState, ChallengeTick};
use crate::insight::{InsightConfig, InsightError, InsightProvider, InsightSource, RefreshOutcome};
use crate::metrics::{MetricsState, TargetMetric};
use crate::music::Player;
use crate::prng::Prng;
use crate::session::{SessionError, SessionTimer};
use crate::simulation::{SimulationConfig, SimulationDriver};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unknown challenge: {0}")]
    UnknownChallenge(String),
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    pub simulation: SimulationConfig,
    pub insight: InsightConfig,
    pub challenge: ChallengeConfig,
    /// Neuro Center countdown length.
    pub session_secs: u32,
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            insight: InsightConfig::default(),
            challenge: ChallengeConfig::default(),
            session_secs: 300,
            seed: 0x5EED_B10E,
        }
    }
}

/// What one session second did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionTick {
    pub challenge: ChallengeTick,
    pub expired: bool,
}

#[derive(Debug)]
pub struct WellnessEngine {
    cfg: EngineConfig,
    sim: SimulationDriver,
    insight: InsightProvider,
    challenges: ChallengeEngine,
    session: SessionTimer,
    /// `None` until a meditation mode is picked; the countdown then runs
    /// the Neuro Center length from the config.
    mode: Option<&'static MeditationMode>,
    player: Player,
    booking: BookingWizard,
    rng: Prng,
    /// Bumped on every connect and disconnect so late async results can be
    /// recognised as stale.
    generation: u64,
}

impl WellnessEngine {
    pub fn new(cfg: EngineConfig) -> Self {
        let insight = InsightProvider::new(cfg.insight.clone());
        Self::build(cfg, insight)
    }

    pub fn with_insight_source(cfg: EngineConfig, source: Arc<dyn InsightSource>) -> Self {
        let insight = InsightProvider::with_source(cfg.insight.clone(), source);
        Self::build(cfg, insight)
    }

    fn build(cfg: EngineConfig, insight: InsightProvider) -> Self {
        Self {
            sim: SimulationDriver::new(cfg.simulation.clone()),
            insight,
            challenges: ChallengeEngine::new(cfg.challenge.clone()),
            session: SessionTimer::new(cfg.session_secs),
            mode: None,
            player: Player::default(),
            booking: BookingWizard::new(),
            rng: Prng::new(cfg.seed),
            generation: 0,
            cfg,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    pub fn metrics(&self) -> MetricsState {
        self.sim.metrics()
    }

    pub fn is_connected(&self) -> bool {
        self.sim.is_connected()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn simulation(&self) -> &SimulationDriver {
        &self.sim
    }

    pub fn insight(&self) -> &InsightProvider {
        &self.insight
    }

    pub fn challenges(&self) -> &ChallengeEngine {
        &self.challenges
    }

    pub fn session(&self) -> &SessionTimer {
        &self.session
    }

    pub fn mode(&self) -> Option<&'static MeditationMode> {
        self.mode
    }

    /// Metric the ambient tone follows: the mode's target, calm otherwise.
    pub fn ambient_target(&self) -> TargetMetric {
        self.mode.map_or(TargetMetric::Calm, |m| m.target)
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn booking(&self) -> &BookingWizard {
        &self.booking
    }

    pub fn booking_mut(&mut self) -> &mut BookingWizard {
        &mut self.booking
    }

    pub fn rng_mut(&mut self) -> &mut Prng {
        &mut self.rng
    }

    /// Link the headband. Reseeds metrics; a second connect restarts the walk.
    pub fn connect(&mut self) -> u64 {
        self.sim.connect();
        self.generation = self.generation.wrapping_add(1);
        info!(generation = self.generation, "headband connected");
        self.generation
    }

    /// Unlink. Stops the session; metrics are frozen where they are.
    pub fn disconnect(&mut self) {
        if !self.sim.is_connected() {
            return;
        }
        self.sim.disconnect();
        self.session.stop();
        self.generation = self.generation.wrapping_add(1);
        info!(generation = self.generation, "headband disconnected");
    }

    pub fn simulation_tick(&mut self) -> Option<MetricsState> {
        self.sim.tick(&mut self.rng)
    }

    pub fn insight_due(&self, now: Duration) -> bool {
        self.is_connected() && self.insight.is_due(now)
    }

    /// Synchronous refresh against the engine's own source.
    pub fn refresh_insight(&mut self, now: Duration) -> RefreshOutcome {
        if !self.is_connected() {
            return RefreshOutcome::Skipped;
        }
        let metrics = self.sim.metrics();
        self.insight.refresh(now, &metrics, &mut self.rng)
    }

    /// Commit an insight fetched elsewhere. Dropped if the connection it was
    /// started under has since ended.
    pub fn apply_insight(
        &mut self,
        generation: u64,
        now: Duration,
        result: Result<String, InsightError>,
    ) -> Option<RefreshOutcome> {
        if generation != self.generation || !self.is_connected() {
            return None;
        }
        Some(self.insight.apply(now, result))
    }

    pub fn toggle_challenge(&mut self, id: &str) -> Result<ChallengeState, EngineError> {
        let def =
            catalog::challenge(id).ok_or_else(|| EngineError::UnknownChallenge(id.to_string()))?;
        Ok(self.challenges.toggle(*def))
    }

    pub fn select_mode(&mut self, id: &str) -> Result<&'static MeditationMode, EngineError> {
        let mode =
            catalog::meditation_mode(id).ok_or_else(|| SessionError::UnknownMode(id.to_string()))?;
        self.session.set_duration(mode.duration_secs())?;
        self.mode = Some(mode);
        info!(mode = mode.id, minutes = mode.minutes, "meditation mode selected");
        Ok(mode)
    }

    pub fn start_session(&mut self) -> Result<(), EngineError> {
        if !self.is_connected() {
            return Err(SessionError::NotConnected.into());
        }
        self.session.start();
        info!(remaining = %self.session.formatted(), "session started");
        Ok(())
    }

    pub fn stop_session(&mut self) {
        if self.session.is_active() {
            info!(remaining = %self.session.formatted(), "session stopped");
        }
        self.session.stop();
    }

    /// One second of session time. Challenges only score while connected
    /// with the countdown running.
    pub fn session_tick(&mut self) -> SessionTick {
        if !self.is_connected() || !self.session.is_active() {
            return SessionTick {
                challenge: ChallengeTick::Inactive,
                expired: false,
            };
        }
        let metrics = self.sim.metrics();
        let challenge = self.challenges.tick(&metrics);
        let expired = self.session.tick();
        if expired {
            info!("session complete");
        }
        SessionTick { challenge, expired }
    }

    /// Everything back to startup state, configuration kept.
    pub fn reset(&mut self) {
        let generation = self.generation.wrapping_add(1);
        self.sim.reset();
        self.insight.reset();
        self.challenges.deselect();
        self.session = SessionTimer::new(self.cfg.session_secs);
        self.mode = None;
        self.player = Player::default();
        self.booking.reset();
        self.rng = Prng::new(self.cfg.seed);
        self.generation = generation;
        info!("engine reset");
    }
}
