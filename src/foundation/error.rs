/// Convenience result type used across Flashbang.
pub type FlashbangResult<T> = Result<T, FlashbangError>;

/// Top-level error taxonomy.
///
/// Every variant is startup-fatal: the timeline and compositor never produce errors, so anything
/// reported here happens before the animation loop is entered.
#[derive(thiserror::Error, Debug)]
pub enum FlashbangError {
    /// Invalid user-provided data (buffer sizes, dimensions).
    #[error("validation error: {0}")]
    Validation(String),

    /// A media resource (audio clip, image file) could not be found or staged.
    #[error("media unavailable: {0}")]
    Media(String),

    /// Audio playback could not be started.
    #[error("playback error: {0}")]
    Playback(String),

    /// The overlay image could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The overlay window or its presentation surface could not be set up.
    #[error("window error: {0}")]
    Window(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlashbangError {
    /// Build a [`FlashbangError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FlashbangError::Media`] value.
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    /// Build a [`FlashbangError::Playback`] value.
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Build a [`FlashbangError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`FlashbangError::Window`] value.
    pub fn window(msg: impl Into<String>) -> Self {
        Self::Window(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
