//! The canonical record of simulated bio and environmental readings.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Inclusive value range for one metric field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// `min(max, max(min, value))`. NaN collapses to `min`.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

pub const BAND_RANGE: Range = Range::new(0.0, 100.0);
pub const SCORE_RANGE: Range = Range::new(0.0, 100.0);
pub const AQI_RANGE: Range = Range::new(10.0, 200.0);
pub const OXYGENATION_RANGE: Range = Range::new(0.0, 100.0);

/// Oxygenation is a one-way function of air quality: `95 - aqi / 10`.
#[inline]
pub fn oxygenation_for(aqi: f32) -> f32 {
    OXYGENATION_RANGE.clamp(95.0 - aqi / 10.0)
}

/// Which composite a goal or meditation mode is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TargetMetric {
    Focus,
    Calm,
    /// Focus/calm switching. Measured on the calm composite.
    Transition,
}

impl TargetMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetMetric::Focus => "focus",
            TargetMetric::Calm => "calm",
            TargetMetric::Transition => "transition",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MetricsState {
    /// Relaxation band.
    pub alpha: f32,
    /// Focus band.
    pub beta: f32,
    /// Meditation band.
    pub theta: f32,
    /// Deep-sleep band.
    pub delta: f32,
    pub focus_score: f32,
    pub calm_score: f32,
    pub aqi: f32,
    pub oxygenation: f32,
}

impl MetricsState {
    /// Values shown at startup and reseeded on every connect.
    pub fn baseline() -> Self {
        let aqi = 42.0;
        Self {
            alpha: 45.0,
            beta: 20.0,
            theta: 30.0,
            delta: 5.0,
            focus_score: 65.0,
            calm_score: 72.0,
            aqi,
            oxygenation: oxygenation_for(aqi),
        }
    }

    /// Copy with every field forced into its declared range.
    ///
    /// `oxygenation` is only clamped here; recomputing it from `aqi` is the
    /// simulation's job.
    pub fn clamped(&self) -> Self {
        Self {
            alpha: BAND_RANGE.clamp(self.alpha),
            beta: BAND_RANGE.clamp(self.beta),
            theta: BAND_RANGE.clamp(self.theta),
            delta: BAND_RANGE.clamp(self.delta),
            focus_score: SCORE_RANGE.clamp(self.focus_score),
            calm_score: SCORE_RANGE.clamp(self.calm_score),
            aqi: AQI_RANGE.clamp(self.aqi),
            oxygenation: OXYGENATION_RANGE.clamp(self.oxygenation),
        }
    }

    pub fn in_range(&self) -> bool {
        BAND_RANGE.contains(self.alpha)
            && BAND_RANGE.contains(self.beta)
            && BAND_RANGE.contains(self.theta)
            && BAND_RANGE.contains(self.delta)
            && SCORE_RANGE.contains(self.focus_score)
            && SCORE_RANGE.contains(self.calm_score)
            && AQI_RANGE.contains(self.aqi)
            && OXYGENATION_RANGE.contains(self.oxygenation)
    }

    /// Live value a challenge or meditation mode is scored on.
    pub fn target_value(&self, metric: TargetMetric) -> f32 {
        match metric {
            TargetMetric::Focus => self.focus_score,
            TargetMetric::Calm | TargetMetric::Transition => self.calm_score,
        }
    }
}

impl Default for MetricsState {
    fn default() -> Self {
        Self::baseline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_is_in_range() {
        let m = MetricsState::baseline();
        assert!(m.in_range());
        assert_eq!(m.oxygenation, 95.0 - 4.2);
    }

    #[test]
    fn clamp_is_idempotent() {
        let wild = MetricsState {
            alpha: -5.0,
            beta: 140.0,
            theta: 50.0,
            delta: f32::NAN,
            focus_score: 101.0,
            calm_score: -0.1,
            aqi: 3.0,
            oxygenation: 250.0,
        };
        let once = wild.clamped();
        assert!(once.in_range());
        assert_eq!(once, once.clamped());
        assert_eq!(once.delta, 0.0);
        assert_eq!(once.aqi, 10.0);
    }

    #[test]
    fn oxygenation_tracks_aqi_inversely() {
        assert_eq!(oxygenation_for(10.0), 94.0);
        assert_eq!(oxygenation_for(200.0), 75.0);
        assert!(oxygenation_for(50.0) > oxygenation_for(150.0));
    }

    #[test]
    fn transition_reads_calm() {
        let m = MetricsState {
            focus_score: 10.0,
            calm_score: 77.0,
            ..MetricsState::baseline()
        };
        assert_eq!(m.target_value(TargetMetric::Focus), 10.0);
        assert_eq!(m.target_value(TargetMetric::Transition), 77.0);
    }
}
