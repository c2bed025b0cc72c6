//! Phase state machine driving the overlay's two opacity channels.

pub(crate) mod controller;
pub(crate) mod durations;
pub(crate) mod phase;
