//! Fixed content: focus challenges, meditation modes and the session library.

use crate::metrics::TargetMetric;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ChallengeDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub metric: TargetMetric,
    pub target_value: f32,
    pub target_duration_secs: u32,
}

pub const CHALLENGES: &[ChallengeDefinition] = &[
    ChallengeDefinition {
        id: "c1",
        title: "Ascent",
        description: "Maintain Focus > 80% for 2m.",
        metric: TargetMetric::Focus,
        target_value: 80.0,
        target_duration_secs: 120,
    },
    ChallengeDefinition {
        id: "c2",
        title: "Ripple",
        description: "Quick focus/calm transition.",
        metric: TargetMetric::Transition,
        target_value: 70.0,
        target_duration_secs: 30,
    },
    ChallengeDefinition {
        id: "c3",
        title: "Ocean",
        description: "Keep Calm > 90% for 1m.",
        metric: TargetMetric::Calm,
        target_value: 90.0,
        target_duration_secs: 60,
    },
];

pub fn challenge(id: &str) -> Option<&'static ChallengeDefinition> {
    CHALLENGES.iter().find(|c| c.id == id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MeditationMode {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub target: TargetMetric,
    pub minutes: u32,
}

impl MeditationMode {
    pub fn duration_secs(&self) -> u32 {
        self.minutes * 60
    }
}

pub const MEDITATION_MODES: &[MeditationMode] = &[
    MeditationMode {
        id: "m1",
        title: "Deep Presence",
        description: "High-alpha focus for profound stillness.",
        target: TargetMetric::Calm,
        minutes: 15,
    },
    MeditationMode {
        id: "m2",
        title: "Flow State",
        description: "Theta-wave synchronization for creative work.",
        target: TargetMetric::Focus,
        minutes: 20,
    },
    MeditationMode {
        id: "m3",
        title: "Rapid Reset",
        description: "Quick biometric stabilization.",
        target: TargetMetric::Calm,
        minutes: 5,
    },
];

pub fn meditation_mode(id: &str) -> Option<&'static MeditationMode> {
    MEDITATION_MODES.iter().find(|m| m.id == id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Intensity {
    Soft,
    Medium,
    Deep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct LibrarySession {
    pub id: &'static str,
    pub title: &'static str,
    pub duration: &'static str,
    pub category: &'static str,
    pub thumbnail: &'static str,
    pub audio_url: &'static str,
    pub intensity: Intensity,
}

pub const LIBRARY: &[LibrarySession] = &[
    LibrarySession {
        id: "1",
        title: "Morning Dew Whispers",
        duration: "10 min",
        category: "Focus",
        thumbnail: "https://picsum.photos/seed/med1/400/300",
        audio_url: "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-1.mp3",
        intensity: Intensity::Soft,
    },
    LibrarySession {
        id: "2",
        title: "The Infinite Shore",
        duration: "15 min",
        category: "Relaxation",
        thumbnail: "https://picsum.photos/seed/med2/400/300",
        audio_url: "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-2.mp3",
        intensity: Intensity::Medium,
    },
    LibrarySession {
        id: "3",
        title: "Neural Bloom",
        duration: "20 min",
        category: "Neuro-Sync",
        thumbnail: "https://picsum.photos/seed/med3/400/300",
        audio_url: "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-3.mp3",
        intensity: Intensity::Deep,
    },
    LibrarySession {
        id: "4",
        title: "Forest Canopy Bath",
        duration: "12 min",
        category: "Stress Relief",
        thumbnail: "https://picsum.photos/seed/med4/400/300",
        audio_url: "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-4.mp3",
        intensity: Intensity::Soft,
    },
    LibrarySession {
        id: "5",
        title: "Cosmic Drift",
        duration: "30 min",
        category: "Sleep",
        thumbnail: "https://picsum.photos/seed/med5/400/300",
        audio_url: "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-5.mp3",
        intensity: Intensity::Medium,
    },
];

/// Library filter; `"All"` (any case) or an empty category returns everything.
pub fn library_by_category(category: &str) -> Vec<&'static LibrarySession> {
    let category = category.trim();
    if category.is_empty() || category.eq_ignore_ascii_case("all") {
        return LIBRARY.iter().collect();
    }
    LIBRARY
        .iter()
        .filter(|s| s.category.eq_ignore_ascii_case(category))
        .collect()
}
