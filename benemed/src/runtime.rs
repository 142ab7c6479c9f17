//! Shared daemon state and the timers that run while the headband is
//! connected.
//!
//! Three tasks share one [`CancellationToken`]: the simulation tick, the
//! insight poll and the one-second session tick. Each re-checks the
//! connection generation after taking the lock, so nothing lands after a
//! disconnect even if a task was already waiting on the lock.

use crate::settings::Settings;
use beneme::engine::WellnessEngine;
use beneme::insight::{InsightError, InsightSource};
use beneme::metrics::MetricsState;
use beneme::observer::{DashboardSnapshot, EngineAdapter};
use beneme::prng::Prng;
use beneme::simulation::SimulationConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub type SharedState = Arc<RwLock<DaemonState>>;

const INSIGHT_POLL: Duration = Duration::from_secs(1);
const SESSION_TICK: Duration = Duration::from_secs(1);

struct Timers {
    token: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

pub struct DaemonState {
    engine: WellnessEngine,
    settings: Settings,
    started: Instant,
    timers: Option<Timers>,
}

impl DaemonState {
    pub fn new(settings: Settings) -> Self {
        Self::with_engine(WellnessEngine::new(settings.engine.clone()), settings)
    }

    pub fn with_engine(engine: WellnessEngine, settings: Settings) -> Self {
        Self {
            engine,
            settings,
            started: Instant::now(),
            timers: None,
        }
    }

    pub fn into_shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }

    pub fn engine(&self) -> &WellnessEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut WellnessEngine {
        &mut self.engine
    }

    /// Engine clock: time since the daemon started.
    pub fn now(&self) -> Duration {
        self.started.elapsed()
    }

    #[allow(dead_code)]
    pub fn timers_running(&self) -> bool {
        self.timers.is_some()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        EngineAdapter::new(&self.engine).snapshot()
    }

    fn stop_timers(&mut self) {
        if let Some(timers) = self.timers.take() {
            timers.token.cancel();
            for h in timers.handles {
                h.abort();
            }
            debug!("timers cancelled");
        }
    }
}

/// Connect (or reconnect) and start the timers for the new generation.
pub async fn connect(state: &SharedState) -> u64 {
    let mut s = state.write().await;
    s.stop_timers();
    let generation = s.engine.connect();

    let token = CancellationToken::new();
    let period_ms = s.engine.simulation().config().period_ms;
    let period = Duration::from_millis(period_ms.max(SimulationConfig::MIN_PERIOD_MS));
    let timeout = s.settings.insight_timeout();
    let handles = vec![
        tokio::spawn(simulation_loop(
            Arc::clone(state),
            generation,
            period,
            token.clone(),
        )),
        tokio::spawn(insight_loop(
            Arc::clone(state),
            generation,
            timeout,
            token.clone(),
        )),
        tokio::spawn(session_loop(Arc::clone(state), generation, token.clone())),
    ];
    s.timers = Some(Timers { token, handles });
    generation
}

pub async fn disconnect(state: &SharedState) {
    let mut s = state.write().await;
    s.stop_timers();
    s.engine.disconnect();
}

/// Stop the timers and put the engine back to its startup state.
pub async fn reset(state: &SharedState) {
    let mut s = state.write().await;
    s.stop_timers();
    s.engine.reset();
}

fn ticker(period: Duration) -> time::Interval {
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

async fn simulation_loop(
    state: SharedState,
    generation: u64,
    period: Duration,
    token: CancellationToken,
) {
    let mut interval = ticker(period);
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = interval.tick() => {}
        }
        let mut s = state.write().await;
        if s.engine.generation() != generation {
            break;
        }
        if let Some(m) = s.engine.simulation_tick() {
            debug!(focus = m.focus_score, calm = m.calm_score, aqi = m.aqi, "metrics tick");
        }
    }
}

async fn session_loop(state: SharedState, generation: u64, token: CancellationToken) {
    let mut interval = ticker(SESSION_TICK);
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = interval.tick() => {}
        }
        let mut s = state.write().await;
        if s.engine.generation() != generation {
            break;
        }
        let tick = s.engine.session_tick();
        if tick.expired {
            info!(mode = ?s.engine.mode().map(|m| m.id), "session finished");
        }
    }
}

async fn insight_loop(
    state: SharedState,
    generation: u64,
    timeout: Duration,
    token: CancellationToken,
) {
    let mut interval = ticker(INSIGHT_POLL);
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = interval.tick() => {}
        }

        let (metrics, source, rng) = {
            let mut s = state.write().await;
            if s.engine.generation() != generation {
                break;
            }
            if !s.engine.insight_due(s.now()) {
                continue;
            }
            let metrics = s.engine.metrics();
            let source = s.engine.insight().source();
            let rng = s.engine.rng_mut().fork();
            (metrics, source, rng)
        };

        let result = tokio::select! {
            _ = token.cancelled() => break,
            r = fetch_insight(source, metrics, rng, timeout) => r,
        };

        let mut s = state.write().await;
        let now = s.now();
        match s.engine.apply_insight(generation, now, result) {
            Some(outcome) => debug!(?outcome, "insight refresh"),
            None => {
                debug!(generation, "discarding insight from an ended connection");
                break;
            }
        }
    }
}

/// Run the source off the async workers, bounded by `limit`.
pub async fn fetch_insight(
    source: Arc<dyn InsightSource>,
    metrics: MetricsState,
    mut rng: Prng,
    limit: Duration,
) -> Result<String, InsightError> {
    let task = tokio::task::spawn_blocking(move || source.insight(&metrics, &mut rng));
    match time::timeout(limit, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            warn!("insight task failed: {e}");
            Err(InsightError::Unavailable(e.to_string()))
        }
        Err(_) => Err(InsightError::TimedOut(limit)),
    }
}
