/// One discrete stage of the overlay's lifecycle.
///
/// Phases are ordered and never repeat: `Waiting -> Flash -> FadeIn -> Show -> FadeOut -> Done`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// Audio has started but the overlay is still invisible.
    Waiting,
    /// Solid white, no image.
    Flash,
    /// Image fades in over the white layer.
    FadeIn,
    /// Image held at full opacity.
    Show,
    /// Window and image fade out together.
    FadeOut,
    /// Terminal; the driving loop must stop.
    Done,
}

impl Phase {
    /// All phases in lifecycle order.
    pub const ALL: [Phase; 6] = [
        Phase::Waiting,
        Phase::Flash,
        Phase::FadeIn,
        Phase::Show,
        Phase::FadeOut,
        Phase::Done,
    ];

    /// The phase that follows `self`. `Done` is its own successor.
    pub fn next(self) -> Self {
        match self {
            Self::Waiting => Self::Flash,
            Self::Flash => Self::FadeIn,
            Self::FadeIn => Self::Show,
            Self::Show => Self::FadeOut,
            Self::FadeOut | Self::Done => Self::Done,
        }
    }

    /// Return `true` for the terminal phase.
    pub fn is_terminal(self) -> bool {
        self == Self::Done
    }
}
