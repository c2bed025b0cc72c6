use std::time::{Duration, Instant};

use crate::timeline::{durations::PhaseDurations, phase::Phase};

/// Snapshot handed to the compositor and the driving loop after each tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameState {
    /// Active phase after this tick.
    pub phase: Phase,
    /// Opacity of the solid white layer, in `[0, 1]`.
    pub window_opacity: f32,
    /// Opacity of the image layer, in `[0, 1]`.
    pub image_opacity: f32,
    /// `true` once the timeline reached [`Phase::Done`]; the loop must stop ticking.
    pub finished: bool,
}

/// Overlay timeline: a phase, the instant it started, and the opacities derived from both.
///
/// Opacities are recomputed from absolute elapsed time on every [`Timeline::advance`], so
/// irregular or late ticks never cause drift. Each call performs at most one phase transition,
/// so no phase is ever skipped, and the opacities it reports always belong to the phase it
/// reports.
#[derive(Clone, Debug)]
pub struct Timeline {
    phase: Phase,
    phase_start: Instant,
    window_opacity: f32,
    image_opacity: f32,
    durations: PhaseDurations,
}

impl Timeline {
    /// Start a timeline in [`Phase::Waiting`] at `now`.
    pub fn new(durations: PhaseDurations, now: Instant) -> Self {
        Self {
            phase: Phase::Waiting,
            phase_start: now,
            window_opacity: 0.0,
            image_opacity: 0.0,
            durations,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Phase table this timeline was built with.
    pub fn durations(&self) -> &PhaseDurations {
        &self.durations
    }

    /// Latest state without advancing.
    pub fn state(&self) -> FrameState {
        FrameState {
            phase: self.phase,
            window_opacity: self.window_opacity,
            image_opacity: self.image_opacity,
            finished: self.phase.is_terminal(),
        }
    }

    /// Advance to `now` and return the resulting state.
    ///
    /// When the current phase has run its course the timeline moves to the next phase, anchoring
    /// the new phase at the exact boundary (`phase_start + duration`) rather than at `now`.
    /// Zero-length phases therefore end on the call after they are entered.
    pub fn advance(&mut self, now: Instant) -> FrameState {
        if self.phase.is_terminal() {
            return self.state();
        }

        let elapsed = now.saturating_duration_since(self.phase_start);
        if let Some(limit) = self.durations.of(self.phase)
            && elapsed >= limit
        {
            let from = self.phase;
            self.phase = from.next();
            self.phase_start += limit;
            tracing::debug!(
                ?from,
                to = ?self.phase,
                overshoot_ms = (elapsed - limit).as_millis() as u64,
                "phase transition"
            );
        }

        let elapsed = now.saturating_duration_since(self.phase_start);
        let (window_opacity, image_opacity) = opacities(self.phase, elapsed, &self.durations);
        self.window_opacity = window_opacity;
        self.image_opacity = image_opacity;
        self.state()
    }

    /// Force [`Phase::Done`] without running the remaining phases.
    ///
    /// The next [`Timeline::advance`] reports `finished`.
    pub fn cancel(&mut self) {
        if !self.phase.is_terminal() {
            tracing::info!(from = ?self.phase, "overlay dismissed");
        }
        self.phase = Phase::Done;
        self.window_opacity = 0.0;
        self.image_opacity = 0.0;
    }
}

/// `(window_opacity, image_opacity)` for `phase` after `elapsed` time in it.
///
/// Pure function of its inputs; results are always clamped to `[0, 1]`.
pub fn opacities(phase: Phase, elapsed: Duration, durations: &PhaseDurations) -> (f32, f32) {
    match phase {
        Phase::Waiting | Phase::Done => (0.0, 0.0),
        Phase::Flash => (1.0, 0.0),
        Phase::FadeIn => (1.0, progress(elapsed, durations.fade_in)),
        Phase::Show => (1.0, 1.0),
        Phase::FadeOut => {
            let fade = 1.0 - progress(elapsed, durations.fade_out);
            (fade, fade)
        }
    }
}

// Zero-length spans count as complete.
fn progress(elapsed: Duration, span: Duration) -> f32 {
    if span.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / span.as_secs_f64()).clamp(0.0, 1.0) as f32
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/controller.rs"]
mod tests;
