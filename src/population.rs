//! Population model: maps streak duration to a target bird count.
//!
//! The renderer is an external collaborator: the engine hands it one integer
//! and displays whatever population it reports back (the renderer may snap
//! to a grid). Clamping to rendering limits is the renderer's job, not ours.

use crate::common::Millis;
use crate::config;
use crate::store::EventStore;

/// Flock shown to a user who has never logged a session: a full month of
/// abstinence at ten birds per hour, as an onboarding treat.
pub const FULL_FLOCK: u32 = 7200;

/// Birds earned per hour of streak.
pub const BIRDS_PER_HOUR: f64 = 10.0;

/// Target population for the visualization at `now`.
///
/// Grows by [`BIRDS_PER_HOUR`] for every hour of the current streak, never
/// dropping below one bird. No upper bound is applied here.
pub fn target_population(store: &EventStore, now: Millis) -> u32 {
    let flock = &config::get_config().flock;

    if store.is_first_time() {
        return flock.full_flock;
    }

    let hours = store.current_duration(now) as f64 / 3_600_000.0;
    let birds = (1.0 + hours * flock.birds_per_hour).floor();
    (birds as u32).max(1)
}

/// Interface to the flocking-bird renderer.
///
/// The engine pushes a target population; the renderer reports the count it
/// actually draws, which the UI displays verbatim. The transition effect is
/// invoked once when a session is logged, then forgotten.
pub trait FlockRenderer {
    fn set_target_population(&mut self, target: u32);

    fn current_population(&self) -> u32;

    /// Purely cosmetic; `on_complete` runs when the effect finishes.
    fn trigger_transition(&mut self, on_complete: Box<dyn FnOnce()>);
}
