//! Startup-time collaborators: built-in assets, image decoding, audio staging, probing and
//! playback.
//!
//! Everything fallible lives here so the timeline and compositor never have to fail.

pub(crate) mod decode;
pub(crate) mod embedded;
pub(crate) mod media;
