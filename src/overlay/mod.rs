//! Window driver: one `winit` event loop ticks the timeline and presents composited frames.

mod present;

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Fullscreen, Window, WindowId, WindowLevel},
};

use self::present::Presenter;
use crate::{
    assets::decode::StaticImage,
    foundation::error::{FlashbangError, FlashbangResult},
    render::{composite::Compositor, surface::Surface},
    timeline::{
        controller::{FrameState, Timeline},
        durations::PhaseDurations,
        phase::Phase,
    },
};

/// Interval between timeline ticks (~60 Hz).
pub const TICK_INTERVAL: Duration = Duration::from_millis(16);

/// Options for [`run_overlay`].
#[derive(Clone, Debug)]
pub struct OverlayOpts {
    /// Phase table for this run.
    pub durations: PhaseDurations,
    /// Window title (not normally visible; the window is undecorated).
    pub title: String,
    /// Interval between ticks.
    pub tick: Duration,
}

impl OverlayOpts {
    /// Default options for `durations`.
    pub fn new(durations: PhaseDurations) -> Self {
        Self {
            durations,
            title: "Flashbang".to_string(),
            tick: TICK_INTERVAL,
        }
    }
}

/// Open the overlay window and run the timeline to completion.
///
/// Blocks until the timeline reaches [`Phase::Done`], either naturally or because the user
/// dismissed the overlay (Escape, or a close request). The timeline starts when the window is
/// created, so start audio playback right before calling this.
pub fn run_overlay(image: StaticImage, opts: OverlayOpts) -> FlashbangResult<()> {
    let event_loop = EventLoop::new()
        .map_err(|e| FlashbangError::window(format!("failed to create event loop: {e}")))?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = OverlayApp::new(image, opts);
    event_loop
        .run_app(&mut app)
        .map_err(|e| FlashbangError::window(format!("event loop failed: {e}")))?;

    match app.failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct OverlayApp {
    opts: OverlayOpts,
    compositor: Compositor,
    frame: Surface,
    presenter: Option<Presenter>,
    timeline: Option<Timeline>,
    state: Option<FrameState>,
    next_tick: Instant,
    shown: bool,
    failure: Option<FlashbangError>,
}

impl OverlayApp {
    fn new(image: StaticImage, opts: OverlayOpts) -> Self {
        Self {
            opts,
            compositor: Compositor::new(image),
            frame: Surface::new(0, 0),
            presenter: None,
            timeline: None,
            state: None,
            next_tick: Instant::now(),
            shown: false,
            failure: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> FlashbangResult<()> {
        // Transparent frames keep the screen untouched during the delay; platforms that honor
        // visibility also keep the window unmapped until the flash.
        let attrs = Window::default_attributes()
            .with_title(self.opts.title.clone())
            .with_decorations(false)
            .with_transparent(true)
            .with_window_level(WindowLevel::AlwaysOnTop)
            .with_fullscreen(Some(Fullscreen::Borderless(None)))
            .with_visible(false);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| FlashbangError::window(format!("failed to create window: {e}")))?,
        );
        window.set_cursor_visible(false);

        self.presenter = Some(Presenter::new(window)?);

        let now = Instant::now();
        let timeline = Timeline::new(self.opts.durations, now);
        tracing::info!(
            total_ms = timeline.durations().total().as_millis() as u64,
            show_ms = timeline.durations().show.as_millis() as u64,
            "overlay started"
        );
        self.state = Some(timeline.state());
        self.timeline = Some(timeline);
        self.next_tick = now;
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: FlashbangError) {
        tracing::error!(%err, "overlay failed");
        self.failure.get_or_insert(err);
        event_loop.exit();
    }

    fn dismiss(&mut self) {
        if let Some(timeline) = self.timeline.as_mut() {
            timeline.cancel();
        }
        // Observe the cancel on the very next tick.
        self.next_tick = Instant::now();
    }

    fn tick(&mut self, event_loop: &ActiveEventLoop) {
        let Some(timeline) = self.timeline.as_mut() else {
            return;
        };

        let now = Instant::now();
        if now < self.next_tick {
            event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_tick));
            return;
        }

        let state = timeline.advance(now);
        self.state = Some(state);
        if state.finished {
            tracing::info!("overlay finished");
            event_loop.exit();
            return;
        }

        if let Some(presenter) = self.presenter.as_ref() {
            if !self.shown && state.phase != Phase::Waiting {
                presenter.window().set_visible(true);
                self.shown = true;
            }
            presenter.window().request_redraw();
        }

        self.next_tick = now + self.opts.tick;
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_tick));
    }

    fn redraw(&mut self) -> FlashbangResult<()> {
        let (Some(presenter), Some(state)) = (self.presenter.as_mut(), self.state) else {
            return Ok(());
        };

        let size = presenter.window().inner_size();
        self.frame.resize(size.width, size.height);
        if self.frame.is_empty() {
            return Ok(());
        }
        self.compositor.render(&mut self.frame, &state);
        presenter.present(&self.frame)
    }
}

impl ApplicationHandler for OverlayApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.presenter.is_some() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => self.dismiss(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => self.dismiss(),
            WindowEvent::Resized(_) => {
                if let Some(presenter) = self.presenter.as_ref() {
                    presenter.window().request_redraw();
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw() {
                    self.fail(event_loop, err);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.failure.is_none() {
            self.tick(event_loop);
        }
    }
}
