//! Randomized walk over [`MetricsState`] while the headband is "connected".

use crate::metrics::{oxygenation_for, MetricsState, AQI_RANGE, BAND_RANGE, SCORE_RANGE};
use crate::prng::RandomSource;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationConfig {
    /// Wall-clock period between ticks.
    pub period_ms: u64,
    /// Amplitude of the focus/calm composite jitter.
    pub score_jitter: f32,
    /// Amplitude of the alpha/beta band jitter.
    pub band_jitter: f32,
    /// Amplitude of the air-quality jitter.
    pub aqi_jitter: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            period_ms: 2000,
            score_jitter: 2.0,
            band_jitter: 1.0,
            aqi_jitter: 3.0,
        }
    }
}

impl SimulationConfig {
    pub const MIN_PERIOD_MS: u64 = 100;

    pub fn with_period_ms(mut self, period_ms: u64) -> Self {
        self.period_ms = period_ms.max(Self::MIN_PERIOD_MS);
        self
    }
}

/// Sole writer of the metrics record.
#[derive(Debug, Clone)]
pub struct SimulationDriver {
    cfg: SimulationConfig,
    metrics: MetricsState,
    connected: bool,
    ticks: u64,
}

impl SimulationDriver {
    pub fn new(cfg: SimulationConfig) -> Self {
        Self {
            cfg,
            metrics: MetricsState::baseline(),
            connected: false,
            ticks: 0,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.cfg
    }

    pub fn metrics(&self) -> MetricsState {
        self.metrics
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Ticks applied since the last connect.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Start (or restart) the walk from baseline. Never resumes old values.
    pub fn connect(&mut self) {
        self.connected = true;
        self.ticks = 0;
        self.metrics = MetricsState::baseline();
    }

    /// Stop mutating. The last values stay readable.
    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    /// Back to startup state: disconnected, baseline values.
    pub fn reset(&mut self) {
        self.connected = false;
        self.ticks = 0;
        self.metrics = MetricsState::baseline();
    }

    /// Advance one tick. Returns the new snapshot, or `None` while disconnected.
    pub fn tick(&mut self, rng: &mut dyn RandomSource) -> Option<MetricsState> {
        if !self.connected {
            return None;
        }
        self.metrics = step(&self.metrics, &self.cfg, rng);
        self.ticks += 1;
        Some(self.metrics)
    }
}

/// Pure transition used by [`SimulationDriver::tick`].
///
/// Draw order is fixed (focus, calm, alpha, beta, aqi) so scripted sources
/// map onto fields predictably.
pub fn step(
    prev: &MetricsState,
    cfg: &SimulationConfig,
    rng: &mut dyn RandomSource,
) -> MetricsState {
    let focus_score = SCORE_RANGE.clamp(prev.focus_score + rng.jitter(cfg.score_jitter));
    let calm_score = SCORE_RANGE.clamp(prev.calm_score + rng.jitter(cfg.score_jitter));
    let alpha = BAND_RANGE.clamp(prev.alpha + rng.jitter(cfg.band_jitter));
    let beta = BAND_RANGE.clamp(prev.beta + rng.jitter(cfg.band_jitter));
    let aqi = AQI_RANGE.clamp(prev.aqi + rng.jitter(cfg.aqi_jitter));

    MetricsState {
        alpha,
        beta,
        theta: BAND_RANGE.clamp(prev.theta),
        delta: BAND_RANGE.clamp(prev.delta),
        focus_score,
        calm_score,
        aqi,
        oxygenation: oxygenation_for(aqi),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prng::{Prng, ScriptedSource};

    #[test]
    fn disconnected_driver_does_not_move() {
        let mut sim = SimulationDriver::new(SimulationConfig::default());
        let before = sim.metrics();
        let mut rng = Prng::new(1);
        assert!(sim.tick(&mut rng).is_none());
        assert_eq!(sim.metrics(), before);
    }

    #[test]
    fn fields_stay_in_range_over_many_ticks() {
        let mut sim = SimulationDriver::new(SimulationConfig::default());
        sim.connect();
        let mut rng = Prng::new(2024);
        for _ in 0..20_000 {
            let m = sim.tick(&mut rng).unwrap();
            assert!(m.in_range(), "out of range: {m:?}");
            assert_eq!(m, m.clamped());
        }
    }

    #[test]
    fn oxygenation_is_recomputed_from_aqi_each_tick() {
        let mut sim = SimulationDriver::new(SimulationConfig::default());
        sim.connect();
        let mut rng = Prng::new(5);
        for _ in 0..500 {
            let m = sim.tick(&mut rng).unwrap();
            assert_eq!(m.oxygenation, (95.0 - m.aqi / 10.0).clamp(0.0, 100.0));
        }
    }

    #[test]
    fn scripted_extremes_saturate_at_bounds() {
        let mut sim = SimulationDriver::new(SimulationConfig::default());
        sim.connect();
        let mut up = ScriptedSource::new(vec![0.999_999]);
        for _ in 0..200 {
            sim.tick(&mut up);
        }
        let m = sim.metrics();
        assert!(m.focus_score > 99.9 && m.focus_score <= 100.0);
        assert!(m.calm_score > 99.9 && m.calm_score <= 100.0);
        assert!(m.aqi > 199.9 && m.aqi <= 200.0);

        let mut down = ScriptedSource::new(vec![0.0]);
        for _ in 0..200 {
            sim.tick(&mut down);
        }
        let m = sim.metrics();
        assert_eq!(m.focus_score, 0.0);
        assert_eq!(m.alpha, 0.0);
        assert_eq!(m.aqi, 10.0);
        assert_eq!(m.oxygenation, 94.0);
    }

    #[test]
    fn theta_and_delta_are_not_perturbed() {
        let mut sim = SimulationDriver::new(SimulationConfig::default());
        sim.connect();
        let mut rng = Prng::new(11);
        for _ in 0..50 {
            sim.tick(&mut rng);
        }
        assert_eq!(sim.metrics().theta, 30.0);
        assert_eq!(sim.metrics().delta, 5.0);
    }

    #[test]
    fn reconnect_reseeds_baseline() {
        let mut sim = SimulationDriver::new(SimulationConfig::default());
        sim.connect();
        let mut rng = ScriptedSource::new(vec![0.9]);
        for _ in 0..10 {
            sim.tick(&mut rng);
        }
        assert_ne!(sim.metrics(), MetricsState::baseline());
        sim.disconnect();
        let frozen = sim.metrics();
        assert!(sim.tick(&mut rng).is_none());
        assert_eq!(sim.metrics(), frozen);

        sim.connect();
        assert_eq!(sim.metrics(), MetricsState::baseline());
        assert_eq!(sim.ticks(), 0);
    }

    #[test]
    fn period_has_a_floor() {
        let cfg = SimulationConfig::default().with_period_ms(5);
        assert_eq!(cfg.period_ms, SimulationConfig::MIN_PERIOD_MS);
    }
}
