//! Cosmetic music parameters and the atmosphere picker state.

use crate::metrics::MetricsState;
use crate::prng::RandomSource;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MusicProfile {
    pub tempo: String,
    pub instrument: String,
    pub mood: String,
}

pub fn music_profile(metrics: &MetricsState) -> MusicProfile {
    let (tempo, instrument, mood) = if metrics.aqi < 50.0 {
        ("adagio", "ambient-piano", "serene")
    } else {
        ("slow", "cello", "grounded")
    };
    MusicProfile {
        tempo: tempo.to_string(),
        instrument: instrument.to_string(),
        mood: mood.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Atmosphere {
    #[default]
    Forest,
    Ocean,
    Celestial,
}

impl Atmosphere {
    pub fn label(&self) -> &'static str {
        match self {
            Atmosphere::Forest => "Forest Resonance",
            Atmosphere::Ocean => "Ocean Resonance",
            Atmosphere::Celestial => "Celestial Resonance",
        }
    }
}

pub const METER_BARS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Player {
    pub atmosphere: Atmosphere,
    pub muted: bool,
}

impl Player {
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Bar heights in percent: `20 + r * focus / 2`, flat at 4 when muted.
    pub fn level_meter(&self, focus_score: f32, rng: &mut dyn RandomSource) -> [f32; METER_BARS] {
        let mut bars = [4.0; METER_BARS];
        if self.muted {
            return bars;
        }
        for bar in bars.iter_mut() {
            *bar = 20.0 + rng.next_f32_01() * (focus_score.clamp(0.0, 100.0) / 2.0);
        }
        bars
    }
}
