use std::cell::Cell;
use std::rc::Rc;

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::coords::SurfaceSize;
use crate::device::{Gpu, GpuInit, SurfaceErrorAction};
use crate::frame::{DisplaySink, FrameRenderer, RenderLoop, Scheduler};
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputEvent, Key, KeyState};
use crate::render::{PixelSurface, RenderCtx, RenderTarget, SurfacePresenter};
use crate::time::MonotonicClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,

    /// Initial window size as a multiple of the loop's surface size.
    pub scale: u32,

    /// Append the latest published frame rate to the window title.
    pub fps_in_title: bool,

    /// Stop the loop and close the window when Escape is pressed.
    pub exit_on_escape: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "rayloop".to_string(),
            scale: 1,
            fps_in_title: true,
            exit_on_escape: true,
        }
    }
}

#[derive(Debug, Default)]
struct RedrawState {
    armed: Cell<bool>,
    cancelled: Cell<bool>,
}

/// Scheduler that re-arms the loop for the window's next redraw.
///
/// Clones share state: the loop owns one and the runtime polls another.
#[derive(Debug, Clone, Default)]
pub struct RedrawScheduler {
    state: Rc<RedrawState>,
}

impl RedrawScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.state.armed.get()
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.get()
    }

    /// Consumes the armed tick, if any.
    fn take_armed(&self) -> bool {
        self.state.armed.replace(false)
    }
}

impl Scheduler for RedrawScheduler {
    fn schedule_next(&mut self) {
        if !self.state.cancelled.get() {
            self.state.armed.set(true);
        }
    }

    fn cancel(&mut self) {
        self.state.armed.set(false);
        self.state.cancelled.set(true);
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Hosts `render_loop` in a window until it stops, the window closes, or a fatal
    /// error occurs. Renderer failures are returned.
    pub fn run<R, D>(
        config: RuntimeConfig,
        gpu_init: GpuInit,
        render_loop: RenderLoop<R, D, RedrawScheduler>,
    ) -> Result<()>
    where
        R: FrameRenderer,
        D: DisplaySink,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = HostState::new(config, gpu_init, render_loop);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Window size for `size` scaled by `scale` (at least 1), saturating at `u32::MAX`.
fn initial_inner_size(size: SurfaceSize, scale: u32) -> LogicalSize<f64> {
    let scale = scale.max(1);
    LogicalSize::new(
        f64::from(size.width.saturating_mul(scale)),
        f64::from(size.height.saturating_mul(scale)),
    )
}

#[self_referencing]
struct WindowEntry {
    surface: PixelSurface,
    presenter: SurfacePresenter,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct HostState<R, D> {
    config: RuntimeConfig,
    gpu_init: GpuInit,

    render_loop: RenderLoop<R, D, RedrawScheduler>,
    redraw: RedrawScheduler,
    clock: MonotonicClock,

    entry: Option<WindowEntry>,
    failure: Option<anyhow::Error>,
    exit_requested: bool,
}

impl<R, D> HostState<R, D>
where
    R: FrameRenderer,
    D: DisplaySink,
{
    fn new(
        config: RuntimeConfig,
        gpu_init: GpuInit,
        render_loop: RenderLoop<R, D, RedrawScheduler>,
    ) -> Self {
        let redraw = render_loop.scheduler().clone();
        Self {
            config,
            gpu_init,
            render_loop,
            redraw,
            clock: MonotonicClock::new(),
            entry: None,
            failure: None,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.render_loop.stop();
        self.exit_requested = true;
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure.get_or_insert(err);
        self.request_exit(event_loop);
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let size = self.render_loop.surface_size();
        anyhow::ensure!(size.is_valid(), "surface size {}x{} is empty", size.width, size.height);

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(initial_inner_size(size, self.config.scale));

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            surface: PixelSurface::new(size),
            presenter: SurfacePresenter::new(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        self.entry = Some(entry);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (render_loop, sched, clock, config) =
            (&mut self.render_loop, &self.redraw, &self.clock, &self.config);
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        let mut failure = None;

        entry.with_mut(|fields| {
            if sched.take_armed() {
                match render_loop.tick(clock.now_ms(), fields.surface) {
                    Ok(outcome) => {
                        if let (Some(rate), true) = (outcome.published, config.fps_in_title) {
                            fields.window.set_title(&format!("{} | {rate}", config.title));
                        }
                    }
                    Err(e) => {
                        failure = Some(e);
                        return;
                    }
                }
            }

            let mut frame = match fields.gpu.begin_frame() {
                Ok(f) => f,
                Err(err) => {
                    let msg = err.to_string();
                    log::debug!("surface error: {msg}");
                    if fields.gpu.handle_surface_error(err) == SurfaceErrorAction::Fatal {
                        failure = Some(anyhow::anyhow!("surface presentation failed: {msg}"));
                    }
                    return;
                }
            };

            let ctx = RenderCtx::new(
                fields.gpu.device(),
                fields.gpu.queue(),
                fields.gpu.surface_format(),
            );

            // RenderTarget borrows frame.encoder; dropped before submit() takes frame.
            {
                let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
                fields.presenter.present(&ctx, &mut target, &*fields.surface);
            }

            fields.window.pre_present_notify();
            fields.gpu.submit(frame);
        });

        if let Some(e) = failure {
            self.fail(event_loop, e);
        }
    }
}

impl<R, D> ApplicationHandler for HostState<R, D>
where
    R: FrameRenderer,
    D: DisplaySink,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        if let Err(e) = self.create_window_entry(event_loop) {
            self.fail(event_loop, e.context("failed to create initial window"));
            return;
        }

        log::info!("window ready; render loop running");

        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // An armed tick runs on the next redraw.
        if self.redraw.is_armed() {
            if let Some(entry) = &self.entry {
                entry.with_window(|w| w.request_redraw());
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if let Some(ev) = translate_window_event(&event) {
            let escape = matches!(
                ev,
                InputEvent::Key {
                    key: Key::Escape,
                    state: KeyState::Pressed,
                    ..
                }
            );
            self.render_loop.input_mut().apply_event(&ev);

            if escape && self.config.exit_on_escape {
                log::info!("escape pressed; exiting");
                self.request_exit(event_loop);
                return;
            }
        }

        match &event {
            WindowEvent::CloseRequested => {
                log::info!("window closed after {} ticks", self.render_loop.ticks());
                self.entry = None;
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.entry.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_armed_state() {
        let mut sched = RedrawScheduler::new();
        let host = sched.clone();
        assert!(!host.is_armed());

        sched.schedule_next();
        assert!(host.is_armed());
        assert!(host.take_armed());
        assert!(!sched.is_armed());
    }

    #[test]
    fn inner_size_scales_and_saturates() {
        let s = initial_inner_size(SurfaceSize::new(640, 480), 2);
        assert_eq!((s.width, s.height), (1280.0, 960.0));

        let s = initial_inner_size(SurfaceSize::new(640, 480), 0);
        assert_eq!((s.width, s.height), (640.0, 480.0));

        let s = initial_inner_size(SurfaceSize::new(u32::MAX, 3), 4_000_000_000);
        assert_eq!(s.width, f64::from(u32::MAX));
        assert_eq!(s.height, f64::from(u32::MAX));
    }

    #[test]
    fn cancelled_scheduler_never_rearms() {
        let mut sched = RedrawScheduler::new();
        let host = sched.clone();
        sched.schedule_next();
        sched.cancel();
        assert!(host.is_cancelled());
        assert!(!host.is_armed());

        sched.schedule_next();
        assert!(!host.take_armed());
    }
}
