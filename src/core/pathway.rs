//! Goal-driven pathways: a short ordered plan of music, meditation and
//! breathing steps.

use crate::catalog::Intensity;
use crate::metrics::MetricsState;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathwayError {
    #[error("goal is empty")]
    EmptyGoal,
    #[error("malformed pathway: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StepKind {
    Music,
    Meditation,
    Breathing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathwayStep {
    pub id: String,
    pub kind: StepKind,
    pub title: String,
    pub duration_minutes: u32,
    pub intensity: Intensity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pathway {
    pub id: String,
    pub goal: String,
    pub name: String,
    pub steps: Vec<PathwayStep>,
}

impl Pathway {
    pub fn total_minutes(&self) -> u32 {
        self.steps.iter().map(|s| s.duration_minutes).sum()
    }

    /// Reject shapes a view could not render. Never partially accepted.
    pub fn validate(&self) -> Result<(), PathwayError> {
        if self.name.trim().is_empty() {
            return Err(PathwayError::Malformed("pathway has no name".to_string()));
        }
        if self.steps.is_empty() {
            return Err(PathwayError::Malformed("pathway has no steps".to_string()));
        }
        if let Some(s) = self.steps.iter().find(|s| s.duration_minutes == 0) {
            return Err(PathwayError::Malformed(format!(
                "step {} has zero duration",
                s.id
            )));
        }
        Ok(())
    }
}

fn step(id: &str, kind: StepKind, title: &str, minutes: u32, intensity: Intensity) -> PathwayStep {
    PathwayStep {
        id: id.to_string(),
        kind,
        title: title.to_string(),
        duration_minutes: minutes,
        intensity,
    }
}

/// Stable short id derived from the goal text (FNV-1a).
fn pathway_id(goal: &str) -> String {
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    for b in goal.bytes() {
        h ^= b as u64;
        h = h.wrapping_mul(0x0000_0100_0000_01b3);
    }
    format!("pw-{:08x}", (h >> 32) as u32)
}

/// Keyword rules over the goal. The built-in rules do not read the metrics.
pub fn generate_pathway(goal: &str, _metrics: &MetricsState) -> Result<Pathway, PathwayError> {
    let goal = goal.trim();
    if goal.is_empty() {
        return Err(PathwayError::EmptyGoal);
    }
    let normalized = goal.to_lowercase();

    let (name, steps) = if normalized.contains("sleep") || normalized.contains("night") {
        (
            "The Lunar Descent",
            vec![
                step("s1", StepKind::Music, "Celestial Resonance", 10, Intensity::Soft),
                step("s2", StepKind::Meditation, "Atmospheric Ease", 15, Intensity::Medium),
                step("s3", StepKind::Breathing, "4-7-8 Purifying Cycles", 5, Intensity::Soft),
            ],
        )
    } else {
        (
            "Environmental Alignment",
            vec![
                step("d1", StepKind::Breathing, "Centering Breath", 3, Intensity::Medium),
                step("d2", StepKind::Music, "Morning Dew", 7, Intensity::Soft),
                step("d3", StepKind::Meditation, "Oxygen Awareness", 5, Intensity::Medium),
            ],
        )
    };

    let pathway = Pathway {
        id: pathway_id(goal),
        goal: goal.to_string(),
        name: name.to_string(),
        steps,
    };
    pathway.validate()?;
    Ok(pathway)
}
