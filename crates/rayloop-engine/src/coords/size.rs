/// Drawing surface dimensions in pixels, fixed at loop construction.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Number of pixels covered by the surface.
    #[inline]
    pub fn area(self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for SurfaceSize {
    fn default() -> Self {
        Self::new(640, 480)
    }
}
