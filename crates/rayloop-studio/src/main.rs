mod demo;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use rayloop_engine::coords::SurfaceSize;
use rayloop_engine::device::GpuInit;
use rayloop_engine::frame::{drive_headless, LogSink, LoopConfig, ManualScheduler, RenderLoop};
use rayloop_engine::input::{InputState, Key, KeyBindings, ReleasePolicy};
use rayloop_engine::logging::{init_logging, LoggingConfig};
use rayloop_engine::render::PixelSurface;
use rayloop_engine::time::DEFAULT_NOTIFY_INTERVAL_MS;
use rayloop_engine::window::{RedrawScheduler, Runtime, RuntimeConfig};

use demo::DemoRenderer;

/// Simulated display refresh of headless runs (60 Hz).
const HEADLESS_FRAME_MS: f64 = 1000.0 / 60.0;

/// Extra time granted to the demo renderer's load before headless ticks start.
const HEADLESS_LOAD_GRACE: Duration = Duration::from_secs(5);

/// Interactive frame loop: arrows / WASD / ZQSD move the camera, Escape quits.
#[derive(Debug, Parser)]
#[command(name = "rayloop", version)]
struct Args {
    /// Surface width in pixels.
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Surface height in pixels.
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Milliseconds between frame-rate publications.
    #[arg(long, default_value_t = DEFAULT_NOTIFY_INTERVAL_MS)]
    interval: f64,

    /// Initial window size as a multiple of the surface size.
    #[arg(long, default_value_t = 1)]
    scale: u32,

    #[arg(long, default_value = "rayloop")]
    title: String,

    /// Log filter, env_logger syntax (overrides RUST_LOG).
    #[arg(long)]
    log: Option<String>,

    /// Present without waiting for vertical sync.
    #[arg(long)]
    no_vsync: bool,

    /// Keep a direction held while any of its keys is still down.
    #[arg(long)]
    counted_release: bool,

    /// Simulated load time of the demo renderer.
    #[arg(long, default_value_t = 200)]
    load_delay_ms: u64,

    /// Palette seed of the demo renderer.
    #[arg(long, default_value_t = 123)]
    seed: u64,

    /// Run without a window, holding "right", for `--frames` ticks at a simulated 60 Hz.
    #[arg(long)]
    headless: bool,

    /// Tick budget in headless mode.
    #[arg(long, default_value_t = 600)]
    frames: u64,
}

impl Args {
    fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            notify_interval_ms: self.interval,
            surface: SurfaceSize::new(self.width, self.height),
            start_time: 0.0,
        }
    }

    fn input_state(&self) -> InputState {
        let policy = if self.counted_release {
            ReleasePolicy::Counted
        } else {
            ReleasePolicy::Lossy
        };
        InputState::new(KeyBindings::default(), policy)
    }

    fn renderer(&self) -> DemoRenderer {
        DemoRenderer::spawn(self.seed, Duration::from_millis(self.load_delay_ms))
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(LoggingConfig {
        env_filter: args.log.clone(),
        ..LoggingConfig::default()
    });

    anyhow::ensure!(
        args.width > 0 && args.height > 0,
        "surface must be at least 1x1, got {}x{}",
        args.width,
        args.height
    );

    if args.headless {
        run_headless(&args)?.log_summary();
        Ok(())
    } else {
        run_windowed(&args)
    }
}

fn run_windowed(args: &Args) -> Result<()> {
    let render_loop = RenderLoop::with_input(
        args.loop_config(),
        args.input_state(),
        args.renderer(),
        LogSink,
        RedrawScheduler::new(),
    );

    let config = RuntimeConfig {
        title: args.title.clone(),
        scale: args.scale,
        ..RuntimeConfig::default()
    };
    let gpu_init = if args.no_vsync {
        GpuInit::without_vsync()
    } else {
        GpuInit::default()
    };

    Runtime::run(config, gpu_init, render_loop)
}

/// State left behind by a headless run.
struct HeadlessRun {
    render_loop: RenderLoop<DemoRenderer, LogSink, ManualScheduler>,
    surface: PixelSurface,
}

impl HeadlessRun {
    fn log_summary(&self) {
        let position = self.render_loop.position();
        let size = self.surface.size();
        log::info!(
            "headless run finished: {} ticks on a {}x{} surface, camera at ({}, {}), last rate {}",
            self.render_loop.ticks(),
            size.width,
            size.height,
            position.x,
            position.y,
            self.render_loop
                .clock()
                .last_published()
                .map_or_else(|| "n/a".to_string(), |r| r.to_string())
        );
    }
}

fn run_headless(args: &Args) -> Result<HeadlessRun> {
    let config = args.loop_config();
    let mut surface = PixelSurface::new(config.surface);
    let mut render_loop = RenderLoop::with_input(
        config,
        args.input_state(),
        args.renderer(),
        LogSink,
        ManualScheduler::new(),
    );
    render_loop.input_mut().on_key_down(Key::ArrowRight);

    let load_budget =
        Duration::from_millis(args.load_delay_ms).saturating_add(HEADLESS_LOAD_GRACE);
    if !render_loop.renderer_mut().wait_ready(load_budget) {
        log::warn!("demo renderer not ready after {load_budget:?}; ticks will skip rendering");
    }

    // Timestamps are synthetic so the run covers simulated display time, not wall time.
    let ran = drive_headless(&mut render_loop, &mut surface, args.frames, |i| {
        (i + 1) as f64 * HEADLESS_FRAME_MS
    })?;

    log::debug!("headless loop ran {ran} ticks");

    Ok(HeadlessRun {
        render_loop,
        surface,
    })
}
