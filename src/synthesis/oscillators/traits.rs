//! Core trait definitions for oscillators.

use crate::Signal;

/// Periodic signals with an observable phase.
///
/// Texture modulation depends on the phase carrying over from one call to
/// the next; exposing it lets callers (and tests) check that nothing
/// resets between rendered blocks.
pub trait Oscillator: Signal {
    /// Current frequency in Hz.
    fn frequency(&self) -> f64;

    /// Current phase in cycles, within [0.0, 1.0).
    fn phase(&self) -> f64;
}
