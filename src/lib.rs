//! Clock and weather panel for bilevel e-paper displays
//!
//! An incremental refresh scheduler and layout engine for an e-paper panel
//! showing time, date, and current weather. The crate decides *when* and *how
//! much* of the screen to repaint: full refreshes on a fixed cadence and at
//! local midnight, byte-aligned partial windows in between, and weather
//! updates in their own window.
//!
//! ## Features
//!
//! - `no_std` compatible
//! - `embedded-hal` v1.0 delays for loop pacing and bounded time sync
//! - Layout computed once from worst-case strings, so windows never move
//! - Day boundaries on local day of year, immune to DST shifts
//! - Weather failures keep the last good reading
//! - POSIX timezone rules via `jiff` (with `tz` feature)
//! - `embedded-graphics` framebuffer canvas and font metrics (with `graphics` feature)
//!
//! ## Usage
//!
//! ```rust
//! use inkclock::{Builder, Dimensions, LocalTimeSample, Location, Repaint, RefreshScheduler};
//! use inkclock::{FetchError, WeatherReading, WeatherSource};
//!
//! struct Offline;
//!
//! impl WeatherSource for Offline {
//!     fn fetch_current(&mut self, _location: Location) -> Result<WeatherReading, FetchError> {
//!         Err(FetchError::Network)
//!     }
//! }
//!
//! let dims = match Dimensions::new(400, 300) {
//!     Ok(dims) => dims,
//!     Err(_) => return,
//! };
//! let config = match Builder::new().dimensions(dims).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//! let mut scheduler = RefreshScheduler::new(&config);
//!
//! let tick = LocalTimeSample { hour: 9, minute: 17, ..LocalTimeSample::default() };
//! let plan = scheduler.on_tick(&tick, 1_792_393_200, &mut Offline);
//! assert_eq!(plan.map(|p| p.repaint), Some(Repaint::TimePartial));
//!
//! // Same second again: nothing to do
//! assert_eq!(scheduler.on_tick(&tick, 1_792_393_200, &mut Offline), None);
//! ```

#![no_std]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

/// Clock source abstraction and time formatting
pub mod clock;
/// Panel configuration types and builder
pub mod config;
/// Error types for the panel
pub mod error;
/// Pixel geometry
pub mod geometry;
/// Weather condition icons
pub mod icons;
/// Display boundary abstraction
pub mod interface;
/// Layout engine
pub mod layout;
/// Panel context and polling loop
pub mod panel;
/// Stateless renderer
pub mod render;
/// Refresh and weather cadence state machine
pub mod scheduler;
/// Weather source abstraction
pub mod weather;

/// Bilevel color type (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod color;
/// Framebuffer canvas via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

#[cfg(feature = "tz")]
pub use clock::ZonedClock;
pub use clock::{
    ClockSource, FixedOffsetClock, LocalTimeSample, Rtc, TimeSync, format_date, format_time,
    sync_clock,
};
pub use config::{Builder, Config, Dimensions, LayoutParams, Location};
pub use error::{BuilderError, ClockError, Error, FetchError};
pub use geometry::{Point, Rect};
pub use icons::IconClass;
pub use interface::{PanelInterface, Window};
pub use layout::{Fonts, Layout, LayoutSlot, TextBounds, TextMetrics, compute_layout};
pub use panel::{Panel, TickReport};
pub use render::{render_full, render_time_partial, render_weather_partial};
pub use scheduler::{RefreshScheduler, Repaint, SchedulerState, TickPlan, WeatherOutcome};
pub use weather::{WeatherReading, WeatherSource, WeatherState};

#[cfg(feature = "graphics")]
pub use color::Color;
#[cfg(feature = "graphics")]
pub use graphics::{CanvasError, Frame, FrameSink, GraphicCanvas, MonoMetrics};
