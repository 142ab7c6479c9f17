//! Threshold ladders that turn a metrics snapshot into display categories.
//!
//! Every ladder is evaluated high to low and the first matching band wins.
//! Nothing here keeps state; call it on each snapshot.

use crate::metrics::{MetricsState, TargetMetric};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Mood {
    Blissful,
    Gentle,
    Nurturing,
}

impl Mood {
    pub fn label(&self) -> &'static str {
        match self {
            Mood::Blissful => "Blissful",
            Mood::Gentle => "Gentle",
            Mood::Nurturing => "Nurturing",
        }
    }

    /// Garden banner text.
    pub fn banner(&self) -> &'static str {
        match self {
            Mood::Blissful => "Blissful Morning",
            Mood::Gentle => "Gentle Breeze",
            Mood::Nurturing => "Nurturing Rain",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AirTier {
    Pristine,
    Moderate,
    Hazy,
}

impl AirTier {
    pub fn label(&self) -> &'static str {
        match self {
            AirTier::Pristine => "Pristine",
            AirTier::Moderate => "Moderate",
            AirTier::Hazy => "Hazy",
        }
    }
}

/// Gradient used behind a meditation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AmbientTone {
    Radiant,
    Serene,
    Muted,
}

pub fn mood(metrics: &MetricsState) -> Mood {
    let calm = metrics.calm_score;
    if calm > 80.0 {
        Mood::Blissful
    } else if calm > 50.0 {
        Mood::Gentle
    } else {
        Mood::Nurturing
    }
}

pub fn air_tier(metrics: &MetricsState) -> AirTier {
    let aqi = metrics.aqi;
    if aqi <= 50.0 {
        AirTier::Pristine
    } else if aqi <= 100.0 {
        AirTier::Moderate
    } else {
        AirTier::Hazy
    }
}

/// Number of clouds drawn over the focus sky.
pub fn cloud_density(metrics: &MetricsState) -> u8 {
    let focus = metrics.focus_score;
    if focus > 90.0 {
        0
    } else if focus > 70.0 {
        2
    } else if focus > 50.0 {
        4
    } else {
        10
    }
}

pub fn ambient_tone(metrics: &MetricsState, target: TargetMetric) -> AmbientTone {
    let score = metrics.target_value(target);
    if score > 80.0 {
        AmbientTone::Radiant
    } else if score > 50.0 {
        AmbientTone::Serene
    } else {
        AmbientTone::Muted
    }
}

/// Every category a view needs, derived in one pass.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DerivedStatus {
    pub mood: Mood,
    pub air_tier: AirTier,
    pub cloud_density: u8,
    pub ambient_tone: AmbientTone,
    pub bright_sky: bool,
    pub sun_visible: bool,
    pub lotus_bloom: bool,
}

impl DerivedStatus {
    pub fn derive(metrics: &MetricsState, mode_target: TargetMetric) -> Self {
        Self {
            mood: mood(metrics),
            air_tier: air_tier(metrics),
            cloud_density: cloud_density(metrics),
            ambient_tone: ambient_tone(metrics, mode_target),
            bright_sky: metrics.focus_score > 70.0,
            sun_visible: metrics.focus_score > 80.0,
            lotus_bloom: metrics.calm_score > 75.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with(f: impl FnOnce(&mut MetricsState)) -> MetricsState {
        let mut m = MetricsState::baseline();
        f(&mut m);
        m
    }

    #[test]
    fn aqi_tiers() {
        assert_eq!(air_tier(&with(|m| m.aqi = 22.0)), AirTier::Pristine);
        assert_eq!(air_tier(&with(|m| m.aqi = 50.0)), AirTier::Pristine);
        assert_eq!(air_tier(&with(|m| m.aqi = 75.0)), AirTier::Moderate);
        assert_eq!(air_tier(&with(|m| m.aqi = 100.0)), AirTier::Moderate);
        assert_eq!(air_tier(&with(|m| m.aqi = 150.0)), AirTier::Hazy);
    }

    #[test]
    fn calm_moods() {
        assert_eq!(mood(&with(|m| m.calm_score = 90.0)), Mood::Blissful);
        assert_eq!(mood(&with(|m| m.calm_score = 80.0)), Mood::Gentle);
        assert_eq!(mood(&with(|m| m.calm_score = 60.0)), Mood::Gentle);
        assert_eq!(mood(&with(|m| m.calm_score = 50.0)), Mood::Nurturing);
        assert_eq!(mood(&with(|m| m.calm_score = 20.0)), Mood::Nurturing);
    }

    #[test]
    fn clouds_thin_out_as_focus_rises() {
        assert_eq!(cloud_density(&with(|m| m.focus_score = 95.0)), 0);
        assert_eq!(cloud_density(&with(|m| m.focus_score = 90.0)), 2);
        assert_eq!(cloud_density(&with(|m| m.focus_score = 71.0)), 2);
        assert_eq!(cloud_density(&with(|m| m.focus_score = 55.0)), 4);
        assert_eq!(cloud_density(&with(|m| m.focus_score = 50.0)), 10);
    }

    #[test]
    fn ambient_tone_follows_mode_target() {
        let m = with(|m| {
            m.calm_score = 85.0;
            m.focus_score = 30.0;
        });
        assert_eq!(ambient_tone(&m, TargetMetric::Calm), AmbientTone::Radiant);
        assert_eq!(ambient_tone(&m, TargetMetric::Focus), AmbientTone::Muted);
    }

    #[test]
    fn derive_does_not_touch_input() {
        let m = with(|m| m.focus_score = 85.0);
        let copy = m;
        let s = DerivedStatus::derive(&m, TargetMetric::Calm);
        assert_eq!(m, copy);
        assert!(s.bright_sky && s.sun_visible);
        assert_eq!(s, DerivedStatus::derive(&m, TargetMetric::Calm));
    }
}
