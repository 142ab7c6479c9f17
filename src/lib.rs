//! Simulated bio-feedback wellness core.
//!
//! Pseudo-biometric readings are generated as bounded random walks while a
//! (virtual) headband is connected, mapped to garden/atmosphere categories,
//! and consumed by focus challenges, session timers and a rate-limited
//! insight provider. [`engine::WellnessEngine`] owns all of it; hosts drive
//! it with explicit clock values.

#[path = "core/booking.rs"]
pub mod booking;

#[path = "core/catalog.rs"]
pub mod catalog;

#[path = "core/challenge.rs"]
pub mod challenge;

#[path = "core/engine.rs"]
pub mod engine;

#[path = "core/insight.rs"]
pub mod insight;

#[path = "core/metrics.rs"]
pub mod metrics;

#[path = "core/music.rs"]
pub mod music;

#[path = "core/pathway.rs"]
pub mod pathway;

#[path = "core/prng.rs"]
pub mod prng;

#[path = "core/session.rs"]
pub mod session;

#[path = "core/simulation.rs"]
pub mod simulation;

#[path = "core/status.rs"]
pub mod status;

pub mod observer;
