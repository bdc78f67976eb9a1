use crate::coords::SurfaceSize;

/// Bytes per RGBA8 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

const OPAQUE_BLACK: [u8; 4] = [0, 0, 0, 255];

/// CPU-side RGBA8 drawing surface.
///
/// Rows are tightly packed, top row first. The size never changes after construction.
#[derive(Debug, Clone)]
pub struct PixelSurface {
    size: SurfaceSize,
    pixels: Vec<[u8; 4]>,
}

impl PixelSurface {
    /// Creates an opaque black surface.
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            pixels: vec![OPAQUE_BLACK; size.area()],
        }
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Raw RGBA8 bytes, ready for a texture upload.
    pub fn pixels(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(&mut self.pixels)
    }

    /// Bytes in one row.
    pub fn stride(&self) -> usize {
        self.size.width as usize * BYTES_PER_PIXEL
    }

    pub fn fill(&mut self, rgba: [u8; 4]) {
        self.pixels.fill(rgba);
    }

    /// Writes one pixel. Out-of-bounds coordinates are ignored.
    pub fn put(&mut self, x: i64, y: i64, rgba: [u8; 4]) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = rgba;
        }
    }

    pub fn get(&self, x: i64, y: i64) -> Option<[u8; 4]> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.size.width) || y >= i64::from(self.size.height) {
            return None;
        }
        Some(y as usize * self.size.width as usize + x as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_surface_is_opaque_black() {
        let s = PixelSurface::new(SurfaceSize::new(3, 2));
        assert_eq!(s.pixels().len(), 3 * 2 * 4);
        assert_eq!(s.stride(), 12);
        assert!(s.pixels().chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
    }

    #[test]
    fn put_then_get() {
        let mut s = PixelSurface::new(SurfaceSize::new(4, 4));
        s.put(2, 3, [1, 2, 3, 4]);
        assert_eq!(s.get(2, 3), Some([1, 2, 3, 4]));
        assert_eq!(&s.pixels()[(3 * 4 + 2) * 4..(3 * 4 + 3) * 4], &[1, 2, 3, 4]);
    }

    #[test]
    fn raw_bytes_write_through() {
        let mut s = PixelSurface::new(SurfaceSize::new(2, 1));
        s.pixels_mut()[4..8].copy_from_slice(&[10, 20, 30, 40]);
        assert_eq!(s.get(1, 0), Some([10, 20, 30, 40]));
        assert_eq!(s.get(0, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut s = PixelSurface::new(SurfaceSize::new(2, 2));
        let before = s.pixels().to_vec();
        s.put(-1, 0, [9; 4]);
        s.put(0, -1, [9; 4]);
        s.put(2, 0, [9; 4]);
        s.put(0, 2, [9; 4]);
        assert_eq!(s.pixels(), &before[..]);
        assert_eq!(s.get(2, 0), None);
    }
}
