use crate::catalog::ChallengeDefinition;
use crate::challenge::ChallengeState;
use crate::engine::WellnessEngine;
use crate::metrics::MetricsState;
use crate::music::Player;
use crate::status::DerivedStatus;

#[cfg(feature = "serde")]
use serde::Serialize;

/// A read-only snapshot of everything a view renders.
///
/// Design intent:
/// - Views cannot mutate the engine through a snapshot.
/// - Derived categories are recomputed on every snapshot and never stored.
/// - When `connected` is false the metric values are stale and should be
///   shown as dashes.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DashboardSnapshot {
    pub connected: bool,
    pub generation: u64,
    pub metrics: MetricsState,
    pub status: DerivedStatus,
    pub insight: String,
    pub challenge: Option<ChallengeView>,
    pub session: SessionView,
    pub player: Player,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ChallengeView {
    pub definition: ChallengeDefinition,
    pub state: ChallengeState,
    pub progress: f32,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SessionView {
    pub active: bool,
    pub remaining_secs: u32,
    pub remaining: String,
    /// `None` while the Neuro Center countdown is in use.
    pub mode_id: Option<&'static str>,
    pub mode_title: Option<&'static str>,
}

pub struct EngineAdapter<'a> {
    engine: &'a WellnessEngine,
}

impl<'a> EngineAdapter<'a> {
    pub fn new(engine: &'a WellnessEngine) -> Self {
        Self { engine }
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let e = self.engine;
        let metrics = e.metrics();
        let mode = e.mode();

        DashboardSnapshot {
            connected: e.is_connected(),
            generation: e.generation(),
            metrics,
            status: DerivedStatus::derive(&metrics, e.ambient_target()),
            insight: e.insight().text().to_string(),
            challenge: challenge_view(e),
            session: SessionView {
                active: e.session().is_active(),
                remaining_secs: e.session().remaining_secs(),
                remaining: e.session().formatted(),
                mode_id: mode.map(|m| m.id),
                mode_title: mode.map(|m| m.title),
            },
            player: e.player().clone(),
        }
    }
}

fn challenge_view(e: &WellnessEngine) -> Option<ChallengeView> {
    let c = e.challenges();
    c.active().map(|def| ChallengeView {
        definition: *def,
        state: c.state(),
        progress: c.progress(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use crate::status::Mood;

    #[test]
    fn snapshot_reflects_engine() {
        let mut e = WellnessEngine::new(EngineConfig::default());
        let snap = EngineAdapter::new(&e).snapshot();
        assert!(!snap.connected);
        assert!(snap.challenge.is_none());
        assert_eq!(snap.status.mood, Mood::Gentle);

        e.connect();
        e.toggle_challenge("c3").unwrap();
        let snap = EngineAdapter::new(&e).snapshot();
        assert!(snap.connected);
        let ch = snap.challenge.unwrap();
        assert_eq!(ch.definition.id, "c3");
        assert_eq!(ch.progress, 0.0);
        assert_eq!(snap.session.remaining, "5:00");
        assert_eq!(snap.session.mode_id, None);
    }

    #[test]
    fn snapshot_countdown_follows_selected_mode() {
        let mut e = WellnessEngine::new(EngineConfig::default());
        e.select_mode("m1").unwrap();
        let snap = EngineAdapter::new(&e).snapshot();
        assert_eq!(snap.session.mode_id, Some("m1"));
        assert_eq!(snap.session.remaining_secs, 15 * 60);
        assert_eq!(snap.session.remaining, "15:00");

        e.reset();
        let snap = EngineAdapter::new(&e).snapshot();
        assert_eq!(snap.session.mode_id, None);
        assert_eq!(snap.session.remaining_secs, 300);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn snapshot_serializes() {
        let e = WellnessEngine::new(EngineConfig::default());
        let snap = EngineAdapter::new(&e).snapshot();
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["metrics"]["focus_score"], 65.0);
        assert_eq!(json["status"]["air_tier"], "Pristine");
    }
}
