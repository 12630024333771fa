//! Core signal processing types and traits.
//!
//! Every generator and processor in the crate is a [`Signal`]: something that
//! can be asked for its next sample. Generators that depend on time also
//! implement [`AudioSignal`], which pins their sample rate at the type level.

mod audio;
mod signal;

pub use audio::AudioSignal;
pub use signal::{ConstantSignal, Param, Signal};
