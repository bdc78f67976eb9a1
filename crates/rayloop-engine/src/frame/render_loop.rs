use anyhow::Result;

use crate::coords::{CameraPosition, SurfaceSize};
use crate::input::InputState;
use crate::render::PixelSurface;
use crate::time::{FrameClock, FrameRate, DEFAULT_NOTIFY_INTERVAL_MS};

use super::renderer::{FrameRenderer, RenderRequest};
use super::scheduler::{ManualScheduler, Scheduler};
use super::sink::DisplaySink;

/// Render loop configuration.
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Minimum milliseconds between two frame-rate publications.
    pub notify_interval_ms: f64,

    /// Drawing surface size handed to the renderer every tick.
    pub surface: SurfaceSize,

    /// Timestamp the first tick's delta is measured from.
    pub start_time: f64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            notify_interval_ms: DEFAULT_NOTIFY_INTERVAL_MS,
            surface: SurfaceSize::default(),
            start_time: 0.0,
        }
    }
}

/// What one tick did.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TickOutcome {
    /// Whether the renderer was called.
    pub rendered: bool,

    /// Rate published to the display sink during this tick.
    pub published: Option<FrameRate>,

    /// Camera position after input was applied.
    pub position: CameraPosition,
}

/// Per-tick orchestration between input, timing and the external renderer.
///
/// The loop owns its clock, input state and camera position. It is cooperative: each
/// tick does a bounded amount of work and re-arms itself through the scheduler, and the
/// host delivers input events between ticks via [`input_mut`](Self::input_mut).
pub struct RenderLoop<R, D, S> {
    config: LoopConfig,
    clock: FrameClock,
    input: InputState,
    position: CameraPosition,

    renderer: R,
    sink: D,
    scheduler: S,

    running: bool,
    ticks: u64,
}

impl<R, D, S> RenderLoop<R, D, S>
where
    R: FrameRenderer,
    D: DisplaySink,
    S: Scheduler,
{
    /// Creates the loop and arms its first tick.
    pub fn new(config: LoopConfig, renderer: R, sink: D, scheduler: S) -> Self {
        Self::with_input(config, InputState::default(), renderer, sink, scheduler)
    }

    /// Like [`new`](Self::new) with caller-provided input state (custom bindings or
    /// release policy).
    pub fn with_input(
        config: LoopConfig,
        input: InputState,
        renderer: R,
        sink: D,
        mut scheduler: S,
    ) -> Self {
        log::debug!(
            "render loop: {}x{} surface, fps every {}ms",
            config.surface.width,
            config.surface.height,
            config.notify_interval_ms
        );

        let clock = FrameClock::new(config.notify_interval_ms, config.start_time);
        scheduler.schedule_next();

        Self {
            config,
            clock,
            input,
            position: CameraPosition::default(),
            renderer,
            sink,
            scheduler,
            running: true,
            ticks: 0,
        }
    }

    /// Runs one tick at timestamp `now` (milliseconds).
    ///
    /// Advances the clock (publishing to the sink when due), applies the direction
    /// flags to the camera position, calls the renderer if it is ready, then re-arms.
    ///
    /// A renderer error is fatal: scheduling is cancelled, the loop stops and the error
    /// is returned. Ticking a stopped loop is an error.
    pub fn tick(&mut self, now: f64, surface: &mut PixelSurface) -> Result<TickOutcome> {
        anyhow::ensure!(self.running, "render loop is stopped");

        let published = self.clock.tick(now);
        if let Some(rate) = &published {
            self.sink.show(rate);
        }

        self.position.step(self.input.flags());

        let rendered = if self.renderer.is_ready() {
            let request = RenderRequest::new(self.position, now, self.config.surface);
            if let Err(e) = self.renderer.render(&request, surface) {
                self.halt();
                return Err(e.context(format!("renderer failed on tick {}", self.ticks)));
            }
            true
        } else {
            log::trace!("renderer not ready; skipping tick {}", self.ticks);
            false
        };

        self.ticks += 1;
        self.scheduler.schedule_next();

        Ok(TickOutcome {
            rendered,
            published,
            position: self.position,
        })
    }

    /// Stops the loop without an error (host teardown).
    pub fn stop(&mut self) {
        if self.running {
            log::debug!("render loop stopped after {} ticks", self.ticks);
        }
        self.halt();
    }

    fn halt(&mut self) {
        self.running = false;
        self.scheduler.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Completed ticks.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn position(&self) -> CameraPosition {
        self.position
    }

    pub fn surface_size(&self) -> SurfaceSize {
        self.config.surface
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Input state for event delivery between ticks.
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

/// Runs armed ticks back to back until none is pending or `max_ticks` have run.
///
/// `now` maps the index of the tick about to run to its timestamp. Returns the number
/// of ticks executed; a renderer failure is returned as the error.
pub fn drive_headless<R, D, F>(
    render_loop: &mut RenderLoop<R, D, ManualScheduler>,
    surface: &mut PixelSurface,
    max_ticks: u64,
    mut now: F,
) -> Result<u64>
where
    R: FrameRenderer,
    D: DisplaySink,
    F: FnMut(u64) -> f64,
{
    let mut ran = 0;
    while ran < max_ticks && render_loop.scheduler_mut().take_pending() {
        render_loop.tick(now(ran), surface)?;
        ran += 1;
    }
    Ok(ran)
}
