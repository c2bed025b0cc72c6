/// Overlay image used when no `--image` is given (PNG, 256x256, transparent corners).
pub const DEFAULT_IMAGE: &[u8] = include_bytes!("../../assets/flashbang.png");

/// Audio clip used when no `--audio` is given (WAV, 6 s).
///
/// Staged to a temp file through [`AudioSource::from_bytes`](crate::AudioSource::from_bytes).
pub const DEFAULT_AUDIO: &[u8] = include_bytes!("../../assets/flashbang.wav");

#[cfg(test)]
#[path = "../../tests/unit/assets/embedded.rs"]
mod tests;
