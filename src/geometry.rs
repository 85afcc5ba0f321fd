//! Pixel geometry shared by the layout engine, renderer and canvas
//!
//! Bilevel e-paper controllers pack eight horizontal pixels per RAM byte, so a
//! partial-update window must start and end on a byte boundary. [`Rect`]
//! carries that rule: [`Rect::aligned`] widens an arbitrary box outwards to the
//! nearest 8-pixel columns, and [`Rect::is_window_for`] checks that a rectangle
//! can be handed to the panel as a partial window.
//!
//! ## Example
//!
//! ```
//! use inkclock::{Point, Rect};
//!
//! let raw = Rect::new(13, 5, 20, 10);
//! let window = raw.aligned();
//! assert_eq!(window, Rect::new(8, 5, 32, 10));
//! assert!(window.contains_rect(raw));
//! assert!(window.contains(Point::new(32, 14)));
//! ```

/// A pixel position, in screen coordinates
///
/// Signed because text cursors can sit left of or above the screen edge when a
/// string is wider than the panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl Point {
    /// Create a new point
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Rectangular screen region in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// X coordinate in pixels (multiple of 8 for partial windows)
    pub x: u16,
    /// Y coordinate in pixels
    pub y: u16,
    /// Width in pixels (multiple of 8 for partial windows)
    pub w: u16,
    /// Height in pixels
    pub h: u16,
}

impl Rect {
    /// Create a new rectangle
    #[allow(clippy::many_single_char_names)]
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    /// One past the rightmost column
    pub const fn right(&self) -> u32 {
        self.x as u32 + self.w as u32
    }

    /// One past the bottom row
    pub const fn bottom(&self) -> u32 {
        self.y as u32 + self.h as u32
    }

    /// Whether x and width both sit on 8-pixel byte boundaries
    pub const fn is_byte_aligned(&self) -> bool {
        self.x % 8 == 0 && self.w % 8 == 0
    }

    /// Whether this rectangle lies fully inside a `width` x `height` screen
    pub const fn fits_within(&self, width: u16, height: u16) -> bool {
        self.right() <= width as u32 && self.bottom() <= height as u32
    }

    /// Whether this rectangle is usable as a partial-update window
    ///
    /// Requires a non-empty area, byte alignment, and containment in the screen.
    pub const fn is_window_for(&self, width: u16, height: u16) -> bool {
        self.w > 0 && self.h > 0 && self.is_byte_aligned() && self.fits_within(width, height)
    }

    /// Widen outwards to 8-pixel column boundaries
    ///
    /// `x` is floored to a multiple of 8 and the width grows so the original
    /// right edge is still covered, then rounded up to a multiple of 8.
    pub const fn aligned(&self) -> Self {
        let x = self.x - self.x % 8;
        let span = self.right() - x as u32;
        let w = span.div_ceil(8) * 8;
        Self {
            x,
            y: self.y,
            w: if w > u16::MAX as u32 {
                u16::MAX - u16::MAX % 8
            } else {
                w as u16
            },
            h: self.h,
        }
    }

    /// Whether the pixel lies inside this rectangle
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.x as i32
            && point.y >= self.y as i32
            && (point.x as i64) < self.right() as i64
            && (point.y as i64) < self.bottom() as i64
    }

    /// Whether `other` lies fully inside this rectangle
    pub const fn contains_rect(&self, other: Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Calculate the packed 1-bpp buffer size in bytes for this rectangle
    pub const fn buffer_size(&self) -> usize {
        (self.w as usize).div_ceil(8) * self.h as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aligned_floors_x_and_keeps_right_edge() {
        let r = Rect::new(13, 7, 20, 9).aligned();
        assert_eq!(r.x, 8);
        assert_eq!(r.w, 32);
        assert!(r.right() >= 33);
        assert_eq!((r.y, r.h), (7, 9));
    }

    #[test]
    fn test_aligned_is_identity_for_aligned_rect() {
        let r = Rect::new(16, 3, 64, 20);
        assert_eq!(r.aligned(), r);
    }

    #[test]
    fn test_aligned_zero_width_stays_zero() {
        let r = Rect::new(8, 0, 0, 4).aligned();
        assert_eq!(r.w, 0);
    }

    #[test]
    fn test_is_window_for_rejects_unaligned() {
        assert!(!Rect::new(4, 0, 16, 16).is_window_for(400, 300));
        assert!(!Rect::new(8, 0, 12, 16).is_window_for(400, 300));
        assert!(Rect::new(8, 0, 16, 16).is_window_for(400, 300));
    }

    #[test]
    fn test_is_window_for_rejects_out_of_bounds_and_empty() {
        assert!(!Rect::new(392, 0, 16, 16).is_window_for(400, 300));
        assert!(!Rect::new(0, 290, 16, 16).is_window_for(400, 300));
        assert!(!Rect::new(0, 0, 0, 16).is_window_for(400, 300));
        assert!(!Rect::new(0, 0, 8, 0).is_window_for(400, 300));
    }

    #[test]
    fn test_contains_edges() {
        let r = Rect::new(8, 8, 16, 4);
        assert!(r.contains(Point::new(8, 8)));
        assert!(r.contains(Point::new(23, 11)));
        assert!(!r.contains(Point::new(24, 11)));
        assert!(!r.contains(Point::new(8, 12)));
        assert!(!r.contains(Point::new(-1, 9)));
    }

    #[test]
    fn test_buffer_size() {
        assert_eq!(Rect::new(0, 0, 80, 80).buffer_size(), 800);
        assert_eq!(Rect::new(0, 0, 9, 2).buffer_size(), 4);
    }
}
