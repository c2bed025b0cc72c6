//! Flashbang is a full-screen transient overlay.
//!
//! It flashes the screen white, fades an image in while an audio clip plays, holds the image
//! until the clip is about to end, fades everything out and exits.
//!
//! # Pipeline overview
//!
//! 1. **Prepare**: locate the audio clip or stage the built-in one ([`AudioSource`],
//!    [`DEFAULT_AUDIO`]), probe its length ([`probe_duration`]) and derive the phase table
//!    ([`FixedDurations::fit_to_audio`]). Decode the overlay image ([`load_image`], or
//!    [`decode_image`] on [`DEFAULT_IMAGE`]).
//! 2. **Advance**: once per tick, [`Timeline::advance`] maps monotonic elapsed time to a
//!    [`FrameState`] (phase + window opacity + image opacity).
//! 3. **Composite**: [`Compositor::render`] paints that state into a premultiplied RGBA8
//!    [`Surface`].
//! 4. **Present**: [`run_overlay`] drives steps 2 and 3 from a `winit` event loop and uploads the
//!    surface to a `wgpu` swapchain that composites premultiplied alpha.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Single source of truth**: opacities are a pure function of the phase and the time elapsed
//!   since the phase started. Nothing accumulates per-tick deltas.
//! - **No IO in the core**: [`Timeline`] and [`Compositor`] never fail and never touch the
//!   filesystem; every fallible step happens before the animation loop starts.
//! - **Premultiplied RGBA8** end-to-end.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;
mod overlay;
mod render;
mod timeline;

pub use assets::decode::{StaticImage, decode_image, load_image};
pub use assets::embedded::{DEFAULT_AUDIO, DEFAULT_IMAGE};
pub use assets::media::{
    AudioPlayback, AudioSource, FALLBACK_AUDIO_DURATION, probe_duration, probe_duration_or,
};
pub use foundation::core::{Rect, Rgba8Premul, Size};
pub use foundation::error::{FlashbangError, FlashbangResult};
pub use overlay::{OverlayOpts, TICK_INTERVAL, run_overlay};
pub use render::composite::{Compositor, fit_rect, over};
pub use render::surface::Surface;
pub use timeline::controller::{FrameState, Timeline, opacities};
pub use timeline::durations::{FixedDurations, PhaseDurations};
pub use timeline::phase::Phase;
