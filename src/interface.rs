//! Display boundary abstraction
//!
//! This module provides the [`PanelInterface`] trait, the only way the renderer
//! touches the screen. Every update is a scoped sequence:
//!
//! 1. `begin_full_window()` or `begin_partial_window(rect)`
//! 2. any number of `clear_rect`, `draw_text`, `draw_bitmap` calls
//! 3. exactly one `commit_and_advance()`, even if nothing was drawn
//!
//! The panel's physical repaint protocol (bus timing, waveforms, busy-pin
//! polling) stays behind the implementation. With the `graphics` feature,
//! [`GraphicCanvas`](crate::graphics::GraphicCanvas) implements this trait on
//! top of a 1-bpp framebuffer.
//!
//! ## Implementing
//!
//! ```rust
//! use inkclock::{PanelInterface, Point, Rect, Window};
//! use core::convert::Infallible;
//!
//! /// Counts commits and ignores drawing
//! struct Counter {
//!     commits: u32,
//! }
//!
//! impl PanelInterface for Counter {
//!     type Error = Infallible;
//!     type Font = ();
//!
//!     fn begin_full_window(&mut self) -> Result<(), Self::Error> { Ok(()) }
//!     fn begin_partial_window(&mut self, _rect: Rect) -> Result<(), Self::Error> { Ok(()) }
//!     fn clear_rect(&mut self, _rect: Rect) -> Result<(), Self::Error> { Ok(()) }
//!     fn draw_text(&mut self, _at: Point, _text: &str, _font: ()) -> Result<(), Self::Error> {
//!         Ok(())
//!     }
//!     fn draw_bitmap(
//!         &mut self,
//!         _at: Point,
//!         _bitmap: &[u8],
//!         _width: u16,
//!         _height: u16,
//!     ) -> Result<(), Self::Error> {
//!         Ok(())
//!     }
//!     fn commit_and_advance(&mut self) -> Result<(), Self::Error> {
//!         self.commits += 1;
//!         Ok(())
//!     }
//! }
//!
//! let mut panel = Counter { commits: 0 };
//! let _ = panel.begin_partial_window(Rect::new(8, 0, 16, 16));
//! let _ = panel.commit_and_advance();
//! assert_eq!(panel.commits, 1);
//! let _ = Window::Full;
//! ```

use core::fmt::Debug;

use crate::geometry::{Point, Rect};

/// Region covered by one committed update
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Window {
    /// Whole screen, refreshed with a full waveform
    Full,
    /// Byte-aligned region, refreshed with a partial waveform
    Partial(Rect),
}

/// Trait for the e-paper display boundary
///
/// Coordinates are screen pixels. Text is drawn with its baseline origin at
/// `at`; bitmaps are 1-bpp, MSB first, rows padded to whole bytes, with a set
/// bit drawn black.
pub trait PanelInterface {
    /// Error type for display operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Font handle accepted by [`draw_text`](Self::draw_text)
    type Font: Copy;

    /// Start an update covering the whole screen
    ///
    /// The frame is cleared to white.
    ///
    /// # Errors
    ///
    /// Returns an error if the display cannot start an update.
    fn begin_full_window(&mut self) -> Result<(), Self::Error>;

    /// Start an update limited to `rect`
    ///
    /// `rect` must satisfy `x % 8 == 0`, `w % 8 == 0` and lie inside the
    /// screen. Drawing outside it is not shown by this update.
    ///
    /// # Errors
    ///
    /// Returns an error if the window is invalid or the display is not ready.
    fn begin_partial_window(&mut self, rect: Rect) -> Result<(), Self::Error>;

    /// Fill `rect` with white
    fn clear_rect(&mut self, rect: Rect) -> Result<(), Self::Error>;

    /// Draw `text` with its baseline origin at `at`
    fn draw_text(&mut self, at: Point, text: &str, font: Self::Font) -> Result<(), Self::Error>;

    /// Draw a packed 1-bpp bitmap with its top-left corner at `at`
    fn draw_bitmap(
        &mut self,
        at: Point,
        bitmap: &[u8],
        width: u16,
        height: u16,
    ) -> Result<(), Self::Error>;

    /// Push the open update to the glass and prepare for the next one
    ///
    /// Called exactly once per begin.
    ///
    /// # Errors
    ///
    /// Returns an error if no update is open or the transfer fails.
    fn commit_and_advance(&mut self) -> Result<(), Self::Error>;
}
