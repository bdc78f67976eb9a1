use crate::input::DirectionFlags;

/// Integer camera/cursor position handed to the renderer.
///
/// Origin is the loop start; +X right, +Y down.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct CameraPosition {
    pub x: i32,
    pub y: i32,
}

impl CameraPosition {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Moves one unit per held direction, applied up, right, down, left.
    ///
    /// Opposite directions cancel and diagonals are not normalized. There is no
    /// bound; coordinates wrap at the integer limits.
    pub fn step(&mut self, flags: DirectionFlags) {
        if flags.up {
            self.y = self.y.wrapping_sub(1);
        }
        if flags.right {
            self.x = self.x.wrapping_add(1);
        }
        if flags.down {
            self.y = self.y.wrapping_add(1);
        }
        if flags.left {
            self.x = self.x.wrapping_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(up: bool, right: bool, down: bool, left: bool) -> DirectionFlags {
        DirectionFlags { up, right, down, left }
    }

    #[test]
    fn single_directions() {
        let mut p = CameraPosition::default();
        p.step(flags(true, false, false, false));
        assert_eq!(p, CameraPosition::new(0, -1));
        p.step(flags(false, true, false, false));
        assert_eq!(p, CameraPosition::new(1, -1));
        p.step(flags(false, false, true, false));
        assert_eq!(p, CameraPosition::new(1, 0));
        p.step(flags(false, false, false, true));
        assert_eq!(p, CameraPosition::new(0, 0));
    }

    #[test]
    fn diagonal_is_two_unit_steps() {
        let mut p = CameraPosition::default();
        p.step(flags(true, true, false, false));
        assert_eq!(p, CameraPosition::new(1, -1));
    }

    #[test]
    fn opposite_directions_cancel() {
        let mut p = CameraPosition::new(5, 5);
        p.step(flags(true, true, true, true));
        assert_eq!(p, CameraPosition::new(5, 5));
    }

    #[test]
    fn no_clamping_at_integer_limits() {
        let mut p = CameraPosition::new(i32::MAX, i32::MIN);
        p.step(flags(true, true, false, false));
        assert_eq!(p, CameraPosition::new(i32::MIN, i32::MAX));
    }
}
