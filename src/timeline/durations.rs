use std::time::Duration;

use crate::timeline::phase::Phase;

/// The four phase lengths that do not depend on the audio clip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedDurations {
    /// Invisible lead-in before the flash.
    pub delay: Duration,
    /// Solid white flash.
    pub flash: Duration,
    /// Image fade-in.
    pub fade_in: Duration,
    /// Final fade-out of window and image.
    pub fade_out: Duration,
}

impl Default for FixedDurations {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(1000),
            flash: Duration::from_millis(300),
            fade_in: Duration::from_millis(1000),
            fade_out: Duration::from_millis(1000),
        }
    }
}

impl FixedDurations {
    /// Sum of the fixed phases, saturating instead of overflowing.
    pub fn total(&self) -> Duration {
        self.delay
            .saturating_add(self.flash)
            .saturating_add(self.fade_in)
            .saturating_add(self.fade_out)
    }

    /// Derive the full phase table for an audio clip of length `audio`.
    ///
    /// `show = max(0, audio - delay - flash - fade_in - fade_out)`. A clip shorter than the fixed
    /// phases yields a zero-length `Show`; the fixed phases are never shortened.
    pub fn fit_to_audio(self, audio: Duration) -> PhaseDurations {
        PhaseDurations {
            delay: self.delay,
            flash: self.flash,
            fade_in: self.fade_in,
            show: audio.saturating_sub(self.total()),
            fade_out: self.fade_out,
        }
    }
}

/// Complete, immutable phase table for one overlay run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseDurations {
    /// Length of [`Phase::Waiting`].
    pub delay: Duration,
    /// Length of [`Phase::Flash`].
    pub flash: Duration,
    /// Length of [`Phase::FadeIn`].
    pub fade_in: Duration,
    /// Length of [`Phase::Show`].
    pub show: Duration,
    /// Length of [`Phase::FadeOut`].
    pub fade_out: Duration,
}

impl PhaseDurations {
    /// How long `phase` lasts, or `None` for the terminal phase.
    pub fn of(&self, phase: Phase) -> Option<Duration> {
        match phase {
            Phase::Waiting => Some(self.delay),
            Phase::Flash => Some(self.flash),
            Phase::FadeIn => Some(self.fade_in),
            Phase::Show => Some(self.show),
            Phase::FadeOut => Some(self.fade_out),
            Phase::Done => None,
        }
    }

    /// End-to-end length of a run that is not cancelled.
    pub fn total(&self) -> Duration {
        Phase::ALL
            .iter()
            .filter_map(|p| self.of(*p))
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/durations.rs"]
mod tests;
