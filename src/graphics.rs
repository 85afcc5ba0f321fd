//! Framebuffer canvas via embedded-graphics
//!
//! This module provides [`GraphicCanvas`], a 1-bpp framebuffer that implements
//! both [`PanelInterface`] (so the renderer can drive it) and the
//! [`DrawTarget`] trait from the embedded-graphics ecosystem. Committed
//! updates are handed to a [`FrameSink`], the adapter to the actual panel
//! driver, together with the [`Window`] they cover.
//!
//! While a partial window is open, drawing is clipped to it, so nothing
//! outside the declared region changes in the framebuffer.
//!
//! [`MonoMetrics`] measures embedded-graphics mono fonts for the layout
//! engine, using the same alphabetic baseline the canvas draws with.
//!
//! ## Example
//!
//! ```rust
//! use core::convert::Infallible;
//! use embedded_graphics::mono_font::iso_8859_1::FONT_10X20;
//! use inkclock::{Dimensions, Frame, FrameSink, GraphicCanvas, PanelInterface, Point, Rect, Window};
//!
//! struct Glass;
//!
//! impl FrameSink for Glass {
//!     type Error = Infallible;
//!
//!     fn push(&mut self, window: Window, frame: &Frame<'_>) -> Result<(), Self::Error> {
//!         if let Window::Partial(rect) = window {
//!             for row in 0..rect.h {
//!                 let _bytes = frame.row_bytes(rect, row);
//!             }
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let dims = match Dimensions::new(400, 300) {
//!     Ok(dims) => dims,
//!     Err(_) => return,
//! };
//! let mut canvas = match GraphicCanvas::try_new(Glass, [0u8; 400 / 8 * 300], dims) {
//!     Ok(canvas) => canvas,
//!     Err(_) => return,
//! };
//!
//! let window = Rect::new(120, 100, 160, 40);
//! let _ = canvas.begin_partial_window(window);
//! let _ = canvas.clear_rect(window);
//! let _ = canvas.draw_text(Point::new(150, 130), "12:34", &FONT_10X20);
//! let _ = canvas.commit_and_advance();
//! ```

use core::convert::Infallible;
use core::fmt::Debug;

use embedded_graphics::Drawable;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::text::renderer::TextRenderer;
use embedded_graphics::text::{Baseline, Text};
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point as EgPoint, Size},
    prelude::Pixel,
};

use crate::color::Color;
use crate::config::Dimensions;
use crate::geometry::{Point, Rect};
use crate::interface::{PanelInterface, Window};
use crate::layout::{TextBounds, TextMetrics};

/// Receiver of committed frames, typically a panel driver
pub trait FrameSink {
    /// Error type for transfers
    type Error: Debug;

    /// Transfer `frame` to the glass and refresh `window`
    ///
    /// For [`Window::Partial`] only the bytes inside the window changed since
    /// the previous push.
    fn push(&mut self, window: Window, frame: &Frame<'_>) -> Result<(), Self::Error>;
}

/// Read-only view of a packed 1-bpp framebuffer
///
/// Bytes are row-major, MSB first; a set bit is white.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    data: &'a [u8],
    width: u16,
    height: u16,
}

impl<'a> Frame<'a> {
    /// Whole framebuffer
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Color of one pixel, `None` outside the frame
    pub fn pixel(&self, x: u16, y: u16) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let (index, bit) = bit_position(x, y, self.width);
        self.data.get(index).map(|byte| Color::from_bit(byte & bit != 0))
    }

    /// Bytes of row `row` of a byte-aligned `window`
    ///
    /// Returns `None` if the window is unaligned, the row is past its height,
    /// or the window leaves the frame.
    pub fn row_bytes(&self, window: Rect, row: u16) -> Option<&'a [u8]> {
        if row >= window.h || !window.is_window_for(self.width, self.height) {
            return None;
        }
        let stride = usize::from(self.width) / 8;
        let start = (usize::from(window.y) + usize::from(row)) * stride + usize::from(window.x) / 8;
        self.data.get(start..start + usize::from(window.w) / 8)
    }
}

/// Errors reported by [`GraphicCanvas`]
#[derive(Debug, PartialEq, Eq)]
pub enum CanvasError<E> {
    /// The sink failed to transfer a frame
    Sink(E),
    /// Partial window is unaligned, empty, or off screen
    InvalidWindow(Rect),
    /// Drawing or commit without an open window
    NotBegun,
    /// A window was begun while another is still open
    AlreadyBegun,
    /// Framebuffer too small for the configured dimensions
    BufferTooSmall {
        /// Required size in bytes
        required: usize,
        /// Provided size in bytes
        provided: usize,
    },
}

impl<E: Debug> core::fmt::Display for CanvasError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Sink(e) => write!(f, "Frame sink error: {e:?}"),
            Self::InvalidWindow(rect) => write!(f, "Invalid partial window: {rect:?}"),
            Self::NotBegun => write!(f, "No window is open"),
            Self::AlreadyBegun => write!(f, "A window is already open"),
            Self::BufferTooSmall { required, provided } => write!(
                f,
                "Buffer too small: required {required} bytes, provided {provided}"
            ),
        }
    }
}

impl<E: Debug> core::error::Error for CanvasError<E> {}

/// Framebuffer implementing the display boundary
///
/// ## Type Parameters
///
/// * `S` - Sink receiving committed frames, implementing [`FrameSink`]
/// * `B` - Buffer type implementing `AsMut<[u8]>` and `AsRef<[u8]>`
pub struct GraphicCanvas<S, B> {
    sink: S,
    buffer: B,
    dims: Dimensions,
    window: Option<Window>,
}

impl<S, B> GraphicCanvas<S, B>
where
    S: FrameSink,
    B: AsMut<[u8]> + AsRef<[u8]>,
{
    /// Create a canvas over `buffer`, initially white
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::BufferTooSmall`] if `buffer` holds fewer than
    /// `dims.buffer_size()` bytes.
    pub fn try_new(sink: S, mut buffer: B, dims: Dimensions) -> Result<Self, CanvasError<S::Error>> {
        let required = dims.buffer_size();
        let provided = buffer.as_mut().len();
        if provided < required {
            return Err(CanvasError::BufferTooSmall { required, provided });
        }
        buffer.as_mut().fill(Color::White.fill_byte());
        Ok(Self {
            sink,
            buffer,
            dims,
            window: None,
        })
    }

    /// Current framebuffer contents
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            data: &self.buffer.as_ref()[..self.dims.buffer_size()],
            width: self.dims.width,
            height: self.dims.height,
        }
    }

    /// The open window, if any
    pub fn window(&self) -> Option<Window> {
        self.window
    }

    /// Access the sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Access the sink mutably
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn open(&mut self, window: Window) -> Result<(), CanvasError<S::Error>> {
        if self.window.is_some() {
            return Err(CanvasError::AlreadyBegun);
        }
        self.window = Some(window);
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), CanvasError<S::Error>> {
        if self.window.is_none() {
            return Err(CanvasError::NotBegun);
        }
        Ok(())
    }

    /// Pixel area currently writable
    fn clip(&self) -> Rect {
        match self.window {
            Some(Window::Partial(rect)) => rect,
            _ => Rect::new(0, 0, self.dims.width, self.dims.height),
        }
    }

    fn set_pixel(&mut self, x: u16, y: u16, color: Color) {
        let (index, bit) = bit_position(x, y, self.dims.width);
        let Some(byte) = self.buffer.as_mut().get_mut(index) else {
            return;
        };
        match color {
            Color::Black => *byte &= !bit,
            Color::White => *byte |= bit,
        }
    }
}

impl<S, B> PanelInterface for GraphicCanvas<S, B>
where
    S: FrameSink,
    B: AsMut<[u8]> + AsRef<[u8]>,
{
    type Error = CanvasError<S::Error>;
    type Font = &'static MonoFont<'static>;

    fn begin_full_window(&mut self) -> Result<(), Self::Error> {
        self.open(Window::Full)?;
        let size = self.dims.buffer_size();
        self.buffer.as_mut()[..size].fill(Color::White.fill_byte());
        Ok(())
    }

    fn begin_partial_window(&mut self, rect: Rect) -> Result<(), Self::Error> {
        if !rect.is_window_for(self.dims.width, self.dims.height) {
            return Err(CanvasError::InvalidWindow(rect));
        }
        self.open(Window::Partial(rect))
    }

    fn clear_rect(&mut self, rect: Rect) -> Result<(), Self::Error> {
        self.ensure_open()?;
        let clip = self.clip();
        let x0 = rect.x.max(clip.x);
        let y0 = rect.y.max(clip.y);
        let x1 = rect.right().min(clip.right()) as u16;
        let y1 = rect.bottom().min(clip.bottom()) as u16;
        for y in y0..y1 {
            for x in x0..x1 {
                self.set_pixel(x, y, Color::White);
            }
        }
        Ok(())
    }

    fn draw_text(&mut self, at: Point, text: &str, font: Self::Font) -> Result<(), Self::Error> {
        self.ensure_open()?;
        let style = MonoTextStyle::new(font, Color::Black);
        let Ok(_) = Text::with_baseline(text, EgPoint::new(at.x, at.y), style, Baseline::Alphabetic)
            .draw(self);
        Ok(())
    }

    fn draw_bitmap(
        &mut self,
        at: Point,
        bitmap: &[u8],
        width: u16,
        height: u16,
    ) -> Result<(), Self::Error> {
        self.ensure_open()?;
        let stride = usize::from(width).div_ceil(8);
        let pixels = (0..height).flat_map(|row| {
            (0..width).filter_map(move |col| {
                let byte = bitmap.get(usize::from(row) * stride + usize::from(col) / 8)?;
                (byte & (0x80 >> (col % 8)) != 0).then(|| {
                    Pixel(
                        EgPoint::new(at.x + i32::from(col), at.y + i32::from(row)),
                        Color::Black,
                    )
                })
            })
        });
        let Ok(()) = self.draw_iter(pixels);
        Ok(())
    }

    fn commit_and_advance(&mut self) -> Result<(), Self::Error> {
        let window = self.window.take().ok_or(CanvasError::NotBegun)?;
        let frame = Frame {
            data: &self.buffer.as_ref()[..self.dims.buffer_size()],
            width: self.dims.width,
            height: self.dims.height,
        };
        self.sink.push(window, &frame).map_err(CanvasError::Sink)
    }
}

impl<S, B> DrawTarget for GraphicCanvas<S, B>
where
    S: FrameSink,
    B: AsMut<[u8]> + AsRef<[u8]>,
{
    type Color = Color;
    type Error = Infallible;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let clip = self.clip();

        for Pixel(EgPoint { x, y }, color) in pixels {
            if !clip.contains(Point::new(x, y)) {
                continue;
            }
            self.set_pixel(x as u16, y as u16, color);
        }

        Ok(())
    }
}

impl<S, B> OriginDimensions for GraphicCanvas<S, B> {
    fn size(&self) -> Size {
        Size::new(u32::from(self.dims.width), u32::from(self.dims.height))
    }
}

/// [`TextMetrics`] for embedded-graphics mono fonts
///
/// Bounds are measured relative to an alphabetic baseline, matching how
/// [`GraphicCanvas`] draws text.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonoMetrics;

impl TextMetrics for MonoMetrics {
    type Font = &'static MonoFont<'static>;

    fn text_bounds(&self, text: &str, font: Self::Font) -> TextBounds {
        let style = MonoTextStyle::new(font, Color::Black);
        let bbox = style
            .measure_string(text, EgPoint::zero(), Baseline::Alphabetic)
            .bounding_box;
        TextBounds::new(
            bbox.top_left.x,
            bbox.top_left.y,
            bbox.size.width,
            bbox.size.height,
        )
    }
}

fn bit_position(x: u16, y: u16, width: u16) -> (usize, u8) {
    let index = usize::from(x) / 8 + (usize::from(width) / 8) * usize::from(y);
    (index, 0x80 >> (x % 8))
}
