//! Panel context
//!
//! [`Panel`] owns every collaborator: the clock, the weather source, the
//! display boundary, the text metrics and fonts, the layout and the
//! scheduler. There is no global state; the firmware's main loop is
//! [`Panel::boot`] followed by [`Panel::run_once`] forever.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_graphics::mono_font::iso_8859_1::{FONT_10X20, FONT_6X10};
//! use inkclock::{
//!     Builder, Dimensions, FetchError, FixedOffsetClock, Fonts, Frame, FrameSink,
//!     GraphicCanvas, Location, MonoMetrics, Panel, Rtc, WeatherReading, WeatherSource, Window,
//! };
//! # use core::convert::Infallible;
//! # use embedded_hal::delay::DelayNs;
//! # struct MockRtc;
//! # impl Rtc for MockRtc {
//! #     type Error = Infallible;
//! #     fn read_utc(&mut self) -> Result<i64, Self::Error> { Ok(1_792_393_200) }
//! #     fn write_utc(&mut self, _utc: i64) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct Glass;
//! # impl FrameSink for Glass {
//! #     type Error = Infallible;
//! #     fn push(&mut self, _window: Window, _frame: &Frame<'_>) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct Http;
//! # impl WeatherSource for Http {
//! #     fn fetch_current(&mut self, _location: Location) -> Result<WeatherReading, FetchError> {
//! #         Err(FetchError::Network)
//! #     }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! let dims = match Dimensions::new(400, 300) {
//!     Ok(dims) => dims,
//!     Err(_) => return,
//! };
//! let config = match Builder::new()
//!     .dimensions(dims)
//!     .location(Location::new(37.77, -122.42))
//!     .build()
//! {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//! let canvas = match GraphicCanvas::try_new(Glass, [0u8; 400 / 8 * 300], dims) {
//!     Ok(canvas) => canvas,
//!     Err(_) => return,
//! };
//! let fonts = Fonts {
//!     time: &FONT_10X20,
//!     date: &FONT_6X10,
//!     weather: &FONT_10X20,
//! };
//! let clock = FixedOffsetClock::new(MockRtc, -7 * 3600);
//! let mut panel = Panel::new(clock, Http, canvas, MonoMetrics, fonts, config);
//! let mut delay = MockDelay;
//!
//! let _ = panel.boot();
//! loop {
//!     let _ = panel.run_once(&mut delay);
//! }
//! ```

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::clock::{ClockError, ClockSource, LocalTimeSample, TimeSync, sync_clock};
use crate::config::Config;
use crate::error::Error;
use crate::interface::PanelInterface;
use crate::layout::{Fonts, Layout, TextMetrics, compute_layout};
use crate::render::{render_full, render_time_partial, render_weather_partial};
use crate::scheduler::{RefreshScheduler, Repaint, TickPlan};
use crate::weather::{WeatherSource, WeatherState};

/// What one call to [`Panel::poll`] observed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickReport {
    /// The clock could not be read; nothing changed
    ClockUnavailable(ClockError),
    /// Same second as the previous poll
    Duplicate,
    /// A new second was processed
    Ticked(TickPlan),
}

/// Clock and weather panel
///
/// ## Type Parameters
///
/// * `C` - Clock implementing [`ClockSource`]
/// * `W` - Weather provider implementing [`WeatherSource`]
/// * `D` - Display implementing [`PanelInterface`]
/// * `M` - Text measurement implementing [`TextMetrics`] for the display's fonts
pub struct Panel<C, W, D, M>
where
    D: PanelInterface,
{
    clock: C,
    weather_source: W,
    display: D,
    metrics: M,
    fonts: Fonts<D::Font>,
    config: Config,
    layout: Layout,
    scheduler: RefreshScheduler,
}

type PanelResult<T, E> = core::result::Result<T, Error<E>>;

impl<C, W, D, M> Panel<C, W, D, M>
where
    C: ClockSource,
    W: WeatherSource,
    D: PanelInterface,
    M: TextMetrics<Font = D::Font>,
{
    /// Create a panel; the layout is computed immediately
    pub fn new(
        clock: C,
        weather_source: W,
        display: D,
        metrics: M,
        fonts: Fonts<D::Font>,
        config: Config,
    ) -> Self {
        let layout = compute_layout(&metrics, config.dimensions, &fonts, &config.layout);
        let scheduler = RefreshScheduler::new(&config);
        Self {
            clock,
            weather_source,
            display,
            metrics,
            fonts,
            config,
            layout,
            scheduler,
        }
    }

    /// Boot sequence without network time
    ///
    /// Recomputes the layout, makes a best-effort weather fetch, then draws
    /// a full frame if the clock is readable. Clock and weather failures are
    /// logged and do not fail boot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Display`] if the full repaint fails.
    pub fn boot(&mut self) -> PanelResult<(), D::Error> {
        self.relayout();

        let sample = self.clock.read_local();
        let utc_now = self.clock.now_utc_seconds();
        self.scheduler.fetch_weather(&mut self.weather_source, utc_now);

        match sample {
            Ok(sample) => {
                self.draw_full(&sample)?;
                self.scheduler.seed(&sample);
                info!("Boot complete");
            }
            Err(e) => warn!("Clock unreadable at boot, first frame deferred: {e}"),
        }
        Ok(())
    }

    /// Boot sequence with network time sync into the clock
    ///
    /// A sync timeout is logged and boot continues with whatever the clock
    /// holds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Display`] if the full repaint fails.
    pub fn boot_with_time_sync<T: TimeSync, DL: DelayNs>(
        &mut self,
        sync: &mut T,
        delay: &mut DL,
    ) -> PanelResult<(), D::Error> {
        if let Err(e) = sync_clock(
            sync,
            &mut self.clock,
            delay,
            self.config.time_sync_timeout_ms,
            self.config.time_sync_poll_ms,
        ) {
            warn!("Continuing boot without network time: {e}");
        }
        self.boot()
    }

    /// Process one clock sample
    ///
    /// A clock failure is reported as [`TickReport::ClockUnavailable`], not
    /// an error. When both a time repaint and a weather repaint are due they
    /// are issued as separate windows, and a failure of the first does not
    /// prevent the second.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Display`] if a repaint fails. Scheduler state has
    /// already advanced.
    pub fn poll(&mut self) -> PanelResult<TickReport, D::Error> {
        let sample = match self.clock.read_local() {
            Ok(sample) => sample,
            Err(e) => {
                warn!("Clock read failed, skipping tick: {e}");
                return Ok(TickReport::ClockUnavailable(e));
            }
        };
        let utc_now = self.clock.now_utc_seconds();

        let Some(plan) = self
            .scheduler
            .on_tick(&sample, utc_now, &mut self.weather_source)
        else {
            return Ok(TickReport::Duplicate);
        };

        let repainted = match plan.repaint {
            Repaint::Full => {
                info!("Full repaint");
                render_full(
                    &mut self.display,
                    &sample,
                    self.scheduler.weather(),
                    &self.layout,
                    &self.fonts,
                )
            }
            Repaint::TimePartial => {
                debug!(
                    "Time partial {} since full",
                    self.scheduler.state().partial_refresh_count
                );
                render_time_partial(&mut self.display, &sample, &self.layout.time, self.fonts.time)
            }
            Repaint::None => Ok(()),
        };

        let weather_repainted = if plan.needs_weather_partial() {
            debug!("Weather partial");
            render_weather_partial(
                &mut self.display,
                self.scheduler.weather(),
                &self.layout,
                self.fonts.weather,
            )
        } else {
            Ok(())
        };

        repainted.and(weather_repainted).map_err(Error::Display)?;
        Ok(TickReport::Ticked(plan))
    }

    /// Poll once, then sleep
    ///
    /// Sleeps `poll_interval_ms`, or `clock_retry_ms` after a clock failure.
    /// Display errors are logged and returned after the sleep; the loop can
    /// keep calling.
    pub fn run_once<DL: DelayNs>(&mut self, delay: &mut DL) -> PanelResult<TickReport, D::Error> {
        let result = self.poll();
        let pause_ms = match &result {
            Ok(TickReport::ClockUnavailable(_)) => self.config.clock_retry_ms,
            Ok(_) => self.config.poll_interval_ms,
            Err(e) => {
                warn!("Display update failed: {e}");
                self.config.poll_interval_ms
            }
        };
        delay.delay_ms(pause_ms);
        result
    }

    /// Redraw everything now, outside the regular cadence
    ///
    /// # Errors
    ///
    /// Returns [`Error::Clock`] if the clock is unreadable, or
    /// [`Error::Display`] if the repaint fails.
    pub fn redraw_full(&mut self) -> PanelResult<(), D::Error> {
        let sample = self.clock.read_local()?;
        self.draw_full(&sample)
    }

    /// Replace the fonts and recompute the layout
    pub fn set_fonts(&mut self, fonts: Fonts<D::Font>) {
        self.fonts = fonts;
        self.relayout();
    }

    /// Current slot geometry
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Scheduler state and cadence
    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    /// Last good weather
    pub fn weather(&self) -> &WeatherState {
        self.scheduler.weather()
    }

    /// Panel configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Access the display
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Access the display mutably
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Access the clock mutably
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Access the weather source mutably
    pub fn weather_source_mut(&mut self) -> &mut W {
        &mut self.weather_source
    }

    fn relayout(&mut self) {
        self.layout = compute_layout(
            &self.metrics,
            self.config.dimensions,
            &self.fonts,
            &self.config.layout,
        );
        debug!(
            "Layout: time {:?}, date {:?}, weather {:?}",
            self.layout.time.bounds, self.layout.date.bounds, self.layout.weather.bounds
        );
    }

    fn draw_full(&mut self, sample: &LocalTimeSample) -> PanelResult<(), D::Error> {
        let drawn = render_full(
            &mut self.display,
            sample,
            self.scheduler.weather(),
            &self.layout,
            &self.fonts,
        );
        self.scheduler.note_full_repaint();
        drawn.map_err(Error::Display)
    }
}
