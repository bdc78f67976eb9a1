//! Procedural demo renderer.
//!
//! Stands in for an externally loaded frame module: its palette is "loaded" on a
//! background thread, and until that finishes the renderer reports itself not ready.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::Duration;

use anyhow::Result;

use rayloop_engine::frame::{FrameRenderer, RenderRequest};
use rayloop_engine::render::PixelSurface;

const PALETTE_LEN: usize = 256;

/// Scroll speed of the pattern, in palette steps per second.
const PHASE_PER_SECOND: f64 = 60.0;

type Palette = Vec<[u8; 4]>;

pub struct DemoRenderer {
    loader: Option<Receiver<Palette>>,
    palette: Option<Palette>,
}

impl DemoRenderer {
    /// Starts loading the palette for `seed`; readiness follows after `load_delay`.
    pub fn spawn(seed: u64, load_delay: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            thread::sleep(load_delay);
            // The receiver may be gone if the loop already stopped.
            let _ = tx.send(build_palette(seed));
        });

        Self {
            loader: Some(rx),
            palette: None,
        }
    }

    /// Blocks up to `timeout` for the palette. Returns whether the renderer is ready.
    pub fn wait_ready(&mut self, timeout: Duration) -> bool {
        if self.palette.is_some() {
            return true;
        }
        let Some(rx) = self.loader.as_ref() else {
            return false;
        };

        match rx.recv_timeout(timeout) {
            Ok(palette) => {
                self.install(palette);
                true
            }
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => {
                self.loader_lost();
                false
            }
        }
    }

    fn install(&mut self, palette: Palette) {
        log::info!("demo renderer ready ({} colors)", palette.len());
        self.palette = Some(palette);
        self.loader = None;
    }

    fn loader_lost(&mut self) {
        log::warn!("demo palette loader exited without a palette");
        self.loader = None;
    }

    /// A renderer that is ready immediately.
    #[cfg(test)]
    fn loaded(seed: u64) -> Self {
        Self {
            loader: None,
            palette: Some(build_palette(seed)),
        }
    }
}

impl FrameRenderer for DemoRenderer {
    fn is_ready(&mut self) -> bool {
        if self.palette.is_some() {
            return true;
        }
        let Some(rx) = self.loader.as_ref() else {
            return false;
        };

        match rx.try_recv() {
            Ok(palette) => {
                self.install(palette);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                self.loader_lost();
                false
            }
        }
    }

    fn render(&mut self, req: &RenderRequest, surface: &mut PixelSurface) -> Result<()> {
        let Some(palette) = self.palette.as_ref() else {
            anyhow::bail!("render called before the palette was loaded");
        };

        let phase = (req.timestamp / 1000.0 * PHASE_PER_SECOND) as i64;
        let width = i64::from(req.width);
        let height = i64::from(req.height);

        for py in 0..height {
            let wy = py + i64::from(req.y);
            for px in 0..width {
                let wx = px + i64::from(req.x);
                let v = ((wx ^ wy).wrapping_add(phase)).rem_euclid(PALETTE_LEN as i64);
                surface.put(px, py, palette[v as usize]);
            }
        }

        Ok(())
    }
}

/// Deterministic palette from a xorshift stream.
fn build_palette(seed: u64) -> Palette {
    let mut state = seed.max(1);
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    let base = next();
    (0..PALETTE_LEN)
        .map(|i| {
            let t = i as f64 / PALETTE_LEN as f64 * std::f64::consts::TAU;
            let channel = |shift: u32| {
                let offset = ((base >> shift) & 0xff) as f64 / 255.0 * std::f64::consts::TAU;
                (127.5 + 127.5 * (t + offset).sin()) as u8
            };
            [channel(0), channel(8), channel(16), 255]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayloop_engine::coords::{CameraPosition, SurfaceSize};

    #[test]
    fn palette_is_deterministic_per_seed() {
        assert_eq!(build_palette(123), build_palette(123));
        assert_ne!(build_palette(123), build_palette(124));
        assert_eq!(build_palette(7).len(), PALETTE_LEN);
    }

    #[test]
    fn spawned_renderer_becomes_ready() {
        let mut r = DemoRenderer::spawn(123, Duration::ZERO);
        let mut ready = false;
        for _ in 0..200 {
            if r.is_ready() {
                ready = true;
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert!(ready);
    }

    #[test]
    fn wait_ready_blocks_until_the_palette_arrives() {
        let mut r = DemoRenderer::spawn(123, Duration::from_millis(20));
        assert!(r.wait_ready(Duration::from_secs(5)));
        assert!(r.is_ready());
    }

    #[test]
    fn wait_ready_times_out_on_slow_loads() {
        let mut r = DemoRenderer::spawn(123, Duration::from_secs(30));
        assert!(!r.wait_ready(Duration::from_millis(10)));
        assert!(!r.is_ready());
    }

    #[test]
    fn camera_offset_scrolls_the_pattern() {
        let size = SurfaceSize::new(16, 8);
        let mut r = DemoRenderer::loaded(123);

        let mut a = PixelSurface::new(size);
        r.render(&RenderRequest::new(CameraPosition::new(0, 0), 0.0, size), &mut a)
            .unwrap();

        let mut b = PixelSurface::new(size);
        r.render(&RenderRequest::new(CameraPosition::new(1, 0), 0.0, size), &mut b)
            .unwrap();

        // Moving right by one shows what was one pixel to the right.
        for y in 0..8 {
            for x in 0..15 {
                assert_eq!(b.get(x, y), a.get(x + 1, y));
            }
        }
    }
}
