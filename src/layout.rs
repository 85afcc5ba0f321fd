//! Layout engine
//!
//! Positions the three text fields (time, date, weather) once, from worst-case
//! sample strings rather than live content, so the partial-update windows never
//! move while the panel runs. Each field gets a [`LayoutSlot`]: the baseline
//! cursor where its text is drawn and the byte-aligned rectangle cleared before
//! drawing.
//!
//! Text is measured through [`TextMetrics`], which hides glyph rasterisation.
//! With the `graphics` feature, [`MonoMetrics`](crate::graphics::MonoMetrics)
//! measures embedded-graphics mono fonts.
//!
//! ## Example
//!
//! ```
//! use inkclock::{compute_layout, Dimensions, Fonts, LayoutParams, TextBounds, TextMetrics};
//!
//! // 12 px per character, 20 px tall, 16 px above the baseline
//! struct Fixed;
//!
//! impl TextMetrics for Fixed {
//!     type Font = ();
//!
//!     fn text_bounds(&self, text: &str, _font: ()) -> TextBounds {
//!         TextBounds::new(0, -16, 12 * text.chars().count() as u32, 20)
//!     }
//! }
//!
//! let dims = match Dimensions::new(400, 300) {
//!     Ok(dims) => dims,
//!     Err(_) => return,
//! };
//! let fonts = Fonts::uniform(());
//! let layout = compute_layout(&Fixed, dims, &fonts, &LayoutParams::default());
//!
//! for slot in layout.slots() {
//!     assert_eq!(slot.bounds.x % 8, 0);
//!     assert_eq!(slot.bounds.w % 8, 0);
//! }
//! assert_eq!(layout.time.cursor.y, 140);
//! ```

use crate::clock::{SAMPLE_DATE, SAMPLE_TIME};
use crate::config::{Dimensions, LayoutParams};
use crate::geometry::{Point, Rect};
use crate::weather::SAMPLE_WEATHER;

/// Bounding box of rendered text, relative to the drawing cursor
///
/// `x`/`y` locate the top-left corner relative to the baseline origin, so `y`
/// is usually negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBounds {
    /// Left edge offset from the cursor
    pub x: i32,
    /// Top edge offset from the baseline
    pub y: i32,
    /// Width in pixels
    pub w: u32,
    /// Height in pixels
    pub h: u32,
}

impl TextBounds {
    /// Create new text bounds
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

/// Measures strings for a given font
pub trait TextMetrics {
    /// Font handle
    type Font: Copy;

    /// Bounding box of `text` drawn with `font` at the origin
    fn text_bounds(&self, text: &str, font: Self::Font) -> TextBounds;
}

/// Font assignment for each field
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fonts<F> {
    /// Large time font
    pub time: F,
    /// Date font
    pub date: F,
    /// Temperature font
    pub weather: F,
}

impl<F: Copy> Fonts<F> {
    /// Use the same font for every field
    pub const fn uniform(font: F) -> Self {
        Self {
            time: font,
            date: font,
            weather: font,
        }
    }
}

/// Fixed position of one field
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayoutSlot {
    /// Baseline origin for drawing the text
    pub cursor: Point,
    /// Byte-aligned region cleared before each redraw
    pub bounds: Rect,
}

/// Slot geometry for the whole screen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Layout {
    /// Time field
    pub time: LayoutSlot,
    /// Date field
    pub date: LayoutSlot,
    /// Weather field: icon plus temperature
    pub weather: LayoutSlot,
    /// Top-left corner of the weather icon
    pub weather_icon: Point,
}

impl Layout {
    /// All three slots, time first
    pub fn slots(&self) -> [LayoutSlot; 3] {
        [self.time, self.date, self.weather]
    }
}

/// Compute slot geometry for a screen
///
/// Pure: the result depends only on the measured sample strings, the
/// dimensions and `params`. Degenerate metrics still yield byte-aligned,
/// non-empty, on-screen bounds.
pub fn compute_layout<M: TextMetrics>(
    metrics: &M,
    dims: Dimensions,
    fonts: &Fonts<M::Font>,
    params: &LayoutParams,
) -> Layout {
    let mid_x = dims.mid_x();
    let anchor = params.anchor_for(dims.height);
    let margin = i64::from(params.margin);

    let time = centred_slot(
        metrics.text_bounds(SAMPLE_TIME, fonts.time),
        mid_x,
        anchor,
        margin,
        dims,
    );
    let date = centred_slot(
        metrics.text_bounds(SAMPLE_DATE, fonts.date),
        mid_x,
        anchor + params.date_gap,
        margin,
        dims,
    );

    // Icon, gap and text are centred together as one box
    let text = union_bounds(metrics, fonts.weather, &SAMPLE_WEATHER);
    let baseline = anchor + params.weather_gap;
    let icon = i64::from(params.icon_size);
    let total_w = icon + i64::from(params.icon_gap) + i64::from(text.w);
    let left = i64::from(mid_x) - total_w / 2;
    let text_top = i64::from(baseline) + i64::from(text.y);
    let icon_top = text_top + (i64::from(text.h) - icon) / 2;
    let top = text_top.min(icon_top);
    let bottom = (text_top + i64::from(text.h)).max(icon_top + icon);

    let weather = LayoutSlot {
        cursor: Point::new(
            saturate(left + icon + i64::from(params.icon_gap) - i64::from(text.x)),
            baseline,
        ),
        bounds: window_rect(left, top, total_w, bottom - top, margin, dims),
    };

    Layout {
        time,
        date,
        weather,
        weather_icon: Point::new(saturate(left), saturate(icon_top)),
    }
}

/// Smallest box, relative to the cursor, covering every string in `texts`
fn union_bounds<M: TextMetrics>(metrics: &M, font: M::Font, texts: &[&str]) -> TextBounds {
    let mut boxes = texts.iter().map(|text| metrics.text_bounds(text, font));
    let Some(first) = boxes.next() else {
        return TextBounds::default();
    };

    let right = |b: &TextBounds| i64::from(b.x) + i64::from(b.w);
    let bottom = |b: &TextBounds| i64::from(b.y) + i64::from(b.h);
    let (x0, y0, x1, y1) = boxes.fold(
        (first.x, first.y, right(&first), bottom(&first)),
        |(x0, y0, x1, y1), b| {
            (
                x0.min(b.x),
                y0.min(b.y),
                x1.max(right(&b)),
                y1.max(bottom(&b)),
            )
        },
    );

    TextBounds::new(
        x0,
        y0,
        (x1 - i64::from(x0)).clamp(0, i64::from(u32::MAX)) as u32,
        (y1 - i64::from(y0)).clamp(0, i64::from(u32::MAX)) as u32,
    )
}

fn centred_slot(
    text: TextBounds,
    mid_x: i32,
    baseline: i32,
    margin: i64,
    dims: Dimensions,
) -> LayoutSlot {
    let w = i64::from(text.w);
    let left = i64::from(mid_x) - w / 2;
    let top = i64::from(baseline) + i64::from(text.y);

    LayoutSlot {
        cursor: Point::new(saturate(left - i64::from(text.x)), baseline),
        bounds: window_rect(left, top, w, i64::from(text.h), margin, dims),
    }
}

/// Pad a footprint, clamp it to the screen and widen to byte columns
fn window_rect(left: i64, top: i64, w: i64, h: i64, margin: i64, dims: Dimensions) -> Rect {
    let width = i64::from(dims.width);
    let height = i64::from(dims.height);

    let mut x0 = (left - margin).clamp(0, width);
    let mut y0 = (top - margin).clamp(0, height);
    let x1 = (left + w + margin).clamp(0, width);
    let y1 = (top + h + margin).clamp(0, height);

    let mut rw = x1 - x0;
    let mut rh = y1 - y0;
    if rw <= 0 {
        rw = 8;
        x0 = x0.min(width - 8);
    }
    if rh <= 0 {
        rh = 1;
        y0 = y0.min(height - 1);
    }

    // Screen width is a multiple of 8, so widening never leaves the screen
    Rect::new(x0 as u16, y0 as u16, rw as u16, rh as u16).aligned()
}

fn saturate(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
