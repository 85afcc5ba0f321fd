//! Refresh scheduler
//!
//! Decides, once per clock sample, whether the panel needs a full repaint, a
//! time-only partial repaint, or nothing, and whether weather is due.
//!
//! # Cadence
//!
//! - A repeated second is ignored entirely ([`RefreshScheduler::on_tick`]
//!   returns `None` and nothing is mutated)
//! - Repaints are only decided at `second == 0`
//! - Full repaint when the local day changed or `minute % full_refresh_period_min == 0`,
//!   otherwise a time partial
//! - Weather is fetched at `minute == 0`, `hour % weather_period_hr == 0`, once
//!   the interval (less a small guard) has elapsed since the last good fetch
//! - Until a first reading exists, weather is also retried every
//!   `weather_retry_min` minutes
//!
//! Day changes compare the local day of year, so DST transitions never create
//! or hide a day boundary. A day change seen on a non-zero second (a stalled
//! loop) is held until the next `second == 0`.

use core::num::NonZeroU8;

use log::{debug, info, warn};

use crate::clock::LocalTimeSample;
use crate::icons::IconClass;
use crate::config::{
    Config, DEFAULT_FULL_REFRESH_PERIOD_MIN, DEFAULT_WEATHER_PERIOD_HR, Location,
};
use crate::weather::{FetchError, WeatherSource, WeatherState};

/// Repaint requested for a tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Repaint {
    /// Nothing to draw
    #[default]
    None,
    /// Redraw every field through a full-window update
    Full,
    /// Redraw only the time slot
    TimePartial,
}

/// Result of the weather cadence for a tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WeatherOutcome {
    /// No fetch was attempted
    #[default]
    NotDue,
    /// A fetch succeeded and the weather slot must be redrawn
    Updated,
    /// A fetch failed; the previous reading is kept
    Failed(FetchError),
}

/// Actions for one newly observed second
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickPlan {
    /// Repaint to perform
    pub repaint: Repaint,
    /// Weather fetch result
    pub weather: WeatherOutcome,
    /// Local day of year differs from the previous tick
    pub day_changed: bool,
}

impl TickPlan {
    /// Whether the weather slot needs its own partial repaint
    ///
    /// A full repaint already redraws weather.
    pub fn needs_weather_partial(&self) -> bool {
        self.weather == WeatherOutcome::Updated && self.repaint != Repaint::Full
    }
}

/// Tick bookkeeping
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchedulerState {
    /// Second of the last processed tick, `None` before the first
    pub last_second: Option<u8>,
    /// Local day of year of the last processed tick
    pub last_year_day: Option<u16>,
    /// Partial repaints since the last full repaint
    pub partial_refresh_count: u32,
    /// Day change waiting for the next minute boundary
    pub pending_day_change: bool,
}

/// Refresh and weather cadence state machine
#[derive(Clone, Debug)]
pub struct RefreshScheduler {
    state: SchedulerState,
    weather: WeatherState,
    full_refresh_period_min: NonZeroU8,
    weather_period_hr: NonZeroU8,
    weather_min_elapsed: i64,
    weather_retry_min: Option<NonZeroU8>,
    location: Location,
}

const FALLBACK_FULL_REFRESH: NonZeroU8 = match NonZeroU8::new(DEFAULT_FULL_REFRESH_PERIOD_MIN) {
    Some(period) => period,
    None => NonZeroU8::MIN,
};
const FALLBACK_WEATHER_PERIOD: NonZeroU8 = match NonZeroU8::new(DEFAULT_WEATHER_PERIOD_HR) {
    Some(period) => period,
    None => NonZeroU8::MIN,
};

fn nonzero_or(value: u8, fallback: NonZeroU8, name: &str) -> NonZeroU8 {
    NonZeroU8::new(value).unwrap_or_else(|| {
        warn!("Zero {name} replaced with {fallback}");
        fallback
    })
}

impl RefreshScheduler {
    /// Create a scheduler with cadences taken from `config`
    ///
    /// A zero period in a hand-built config falls back to the default
    /// cadence, and a zero retry period disables boot retries.
    pub fn new(config: &Config) -> Self {
        let full_refresh_period_min = nonzero_or(
            config.full_refresh_period_min,
            FALLBACK_FULL_REFRESH,
            "full refresh period",
        );
        let weather_period_hr = nonzero_or(
            config.weather_period_hr,
            FALLBACK_WEATHER_PERIOD,
            "weather period",
        );
        let interval_secs = i64::from(weather_period_hr.get()) * 3600;

        Self {
            state: SchedulerState::default(),
            weather: WeatherState::new(),
            full_refresh_period_min,
            weather_period_hr,
            weather_min_elapsed: interval_secs - i64::from(config.weather_guard_secs),
            weather_retry_min: config.weather_retry_min.and_then(NonZeroU8::new),
            location: config.location,
        }
    }

    /// Current tick bookkeeping
    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    /// Last good weather
    pub fn weather(&self) -> &WeatherState {
        &self.weather
    }

    /// Process one clock sample
    ///
    /// Returns `None` if `sample` falls in the same second as the previous
    /// tick. Weather is fetched through `source` when due.
    pub fn on_tick<W: WeatherSource>(
        &mut self,
        sample: &LocalTimeSample,
        utc_now: i64,
        source: &mut W,
    ) -> Option<TickPlan> {
        if self.state.last_second == Some(sample.second) {
            return None;
        }
        self.state.last_second = Some(sample.second);

        let day_changed = self
            .state
            .last_year_day
            .is_some_and(|day| day != sample.year_day);
        self.state.last_year_day = Some(sample.year_day);
        if day_changed {
            debug!("Local day changed to {}", sample.year_day);
            self.state.pending_day_change = true;
        }

        if sample.second != 0 {
            return Some(TickPlan {
                day_changed,
                ..TickPlan::default()
            });
        }

        let repaint = self.decide_repaint(sample);
        let weather = if self.weather_due(sample, utc_now) {
            self.fetch_weather(source, utc_now)
        } else {
            WeatherOutcome::NotDue
        };

        Some(TickPlan {
            repaint,
            weather,
            day_changed,
        })
    }

    /// Fetch weather now, regardless of cadence
    ///
    /// Used at boot. On failure the previous reading is left untouched.
    pub fn fetch_weather<W: WeatherSource>(
        &mut self,
        source: &mut W,
        utc_now: i64,
    ) -> WeatherOutcome {
        match source.fetch_current(self.location) {
            Ok(reading) => {
                info!(
                    "Weather updated: {}F, {} (code {})",
                    reading.temperature_f,
                    IconClass::from_wmo_code(reading.condition_code).label(),
                    reading.condition_code
                );
                self.weather.record_success(reading, utc_now);
                WeatherOutcome::Updated
            }
            Err(e) => {
                warn!("Weather fetch failed: {e}");
                WeatherOutcome::Failed(e)
            }
        }
    }

    /// Record `sample` as already observed, without deciding anything
    ///
    /// Used after the boot repaint so the same second is not drawn twice.
    pub fn seed(&mut self, sample: &LocalTimeSample) {
        self.state.last_second = Some(sample.second);
        self.state.last_year_day = Some(sample.year_day);
    }

    /// Mark a full repaint performed outside the tick cadence
    pub fn note_full_repaint(&mut self) {
        self.state.partial_refresh_count = 0;
        self.state.pending_day_change = false;
    }

    fn decide_repaint(&mut self, sample: &LocalTimeSample) -> Repaint {
        let full = self.state.pending_day_change
            || sample.minute % self.full_refresh_period_min == 0;

        if full {
            debug!(
                "Full repaint at {:02}:{:02} after {} partials",
                sample.hour, sample.minute, self.state.partial_refresh_count
            );
            self.note_full_repaint();
            Repaint::Full
        } else {
            self.state.partial_refresh_count = self.state.partial_refresh_count.saturating_add(1);
            Repaint::TimePartial
        }
    }

    fn weather_due(&self, sample: &LocalTimeSample, utc_now: i64) -> bool {
        let scheduled = sample.minute == 0
            && sample.hour % self.weather_period_hr == 0
            && utc_now.saturating_sub(self.weather.last_fetch_utc()) >= self.weather_min_elapsed;

        let retry = !self.weather.has_value()
            && self
                .weather_retry_min
                .is_some_and(|period| sample.minute % period == 0);

        if scheduled || retry {
            debug!(
                "Weather due at {:02}:{:02} (retry: {})",
                sample.hour,
                sample.minute,
                !scheduled
            );
        }
        scheduled || retry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use alloc::vec;
    use alloc::vec::Vec;

    use crate::config::{Builder, Dimensions};
    use crate::weather::WeatherReading;

    const T0: i64 = 1_792_393_200;

    struct ScriptedWeather {
        results: Vec<Result<WeatherReading, FetchError>>,
        calls: usize,
    }

    impl ScriptedWeather {
        fn new(results: Vec<Result<WeatherReading, FetchError>>) -> Self {
            Self { results, calls: 0 }
        }

        fn failing() -> Self {
            Self::new(Vec::new())
        }
    }

    impl WeatherSource for ScriptedWeather {
        fn fetch_current(&mut self, _location: Location) -> Result<WeatherReading, FetchError> {
            let result = self
                .results
                .get(self.calls)
                .copied()
                .unwrap_or(Err(FetchError::Network));
            self.calls += 1;
            result
        }
    }

    fn reading(temperature_f: f32, condition_code: u16) -> WeatherReading {
        WeatherReading {
            temperature_f,
            condition_code,
        }
    }

    fn scheduler(retry: Option<u8>) -> RefreshScheduler {
        let config = Builder::new()
            .dimensions(Dimensions::new(400, 300).unwrap())
            .weather_retry_min(retry)
            .build()
            .unwrap();
        RefreshScheduler::new(&config)
    }

    fn at(year_day: u16, hour: u8, minute: u8, second: u8) -> LocalTimeSample {
        LocalTimeSample {
            year: 2026,
            month: 10,
            day: 19,
            hour,
            minute,
            second,
            weekday: 1,
            year_day,
        }
    }

    /// Feed every second of one minute, returning the plan for second 0
    fn run_minute(
        s: &mut RefreshScheduler,
        w: &mut ScriptedWeather,
        hour: u8,
        minute: u8,
    ) -> TickPlan {
        let plan = s.on_tick(&at(100, hour, minute, 0), T0, w).unwrap();
        for second in 1..60 {
            let idle = s.on_tick(&at(100, hour, minute, second), T0, w).unwrap();
            assert_eq!(idle.repaint, Repaint::None);
        }
        plan
    }

    #[test]
    fn test_same_second_is_ignored() {
        let mut s = scheduler(None);
        let mut w = ScriptedWeather::failing();
        let sample = at(100, 9, 17, 0);

        assert!(s.on_tick(&sample, T0, &mut w).is_some());
        let before = *s.state();
        assert_eq!(s.on_tick(&sample, T0, &mut w), None);
        assert_eq!(*s.state(), before);
    }

    #[test]
    fn test_seed_suppresses_same_second() {
        let mut s = scheduler(None);
        let mut w = ScriptedWeather::failing();
        let sample = at(100, 9, 0, 0);
        s.seed(&sample);
        assert_eq!(s.on_tick(&sample, T0, &mut w), None);
        assert_eq!(w.calls, 0);
    }

    #[test]
    fn test_nonzero_second_updates_only_last_second() {
        let mut s = scheduler(None);
        let mut w = ScriptedWeather::failing();
        let plan = s.on_tick(&at(100, 9, 17, 12), T0, &mut w).unwrap();
        assert_eq!(plan, TickPlan::default());
        assert_eq!(s.state().last_second, Some(12));
        assert_eq!(s.state().last_year_day, Some(100));
        assert_eq!(s.state().partial_refresh_count, 0);
    }

    #[test]
    fn test_thirty_minute_ticks() {
        let mut s = scheduler(None);
        let mut w = ScriptedWeather::failing();
        s.on_tick(&at(100, 9, 0, 59), T0, &mut w);

        for minute in 1..30 {
            let plan = run_minute(&mut s, &mut w, 9, minute);
            assert_eq!(plan.repaint, Repaint::TimePartial, "minute {minute}");
            assert_eq!(s.state().partial_refresh_count, u32::from(minute));
        }
        let plan = run_minute(&mut s, &mut w, 9, 30);
        assert_eq!(plan.repaint, Repaint::Full);
        assert_eq!(s.state().partial_refresh_count, 0);
        assert_eq!(w.calls, 0);
    }

    #[test]
    fn test_midnight_forces_full_repaint() {
        let mut s = scheduler(None);
        let mut w = ScriptedWeather::failing();
        s.on_tick(&at(290, 23, 58, 0), T0, &mut w);
        s.on_tick(&at(290, 23, 58, 30), T0, &mut w);
        s.on_tick(&at(290, 23, 59, 0), T0, &mut w);
        s.on_tick(&at(290, 23, 59, 59), T0, &mut w);
        assert_eq!(s.state().partial_refresh_count, 2);

        let plan = s.on_tick(&at(291, 0, 0, 0), T0, &mut w).unwrap();
        assert!(plan.day_changed);
        assert_eq!(plan.repaint, Repaint::Full);
        assert_eq!(s.state().partial_refresh_count, 0);
        assert_eq!(s.state().last_year_day, Some(291));
    }

    #[test]
    fn test_day_change_held_until_minute_boundary() {
        let mut s = scheduler(None);
        let mut w = ScriptedWeather::failing();
        s.on_tick(&at(290, 23, 59, 50), T0, &mut w);

        // Loop stalled across midnight
        let plan = s.on_tick(&at(291, 0, 0, 30), T0, &mut w).unwrap();
        assert!(plan.day_changed);
        assert_eq!(plan.repaint, Repaint::None);

        let plan = s.on_tick(&at(291, 0, 1, 0), T0, &mut w).unwrap();
        assert!(!plan.day_changed);
        assert_eq!(plan.repaint, Repaint::Full);

        s.on_tick(&at(291, 0, 1, 1), T0, &mut w);
        let plan = s.on_tick(&at(291, 0, 2, 0), T0, &mut w).unwrap();
        assert_eq!(plan.repaint, Repaint::TimePartial);
    }

    #[test]
    fn test_dst_spring_forward_is_not_a_day_change() {
        let mut s = scheduler(None);
        let mut w = ScriptedWeather::failing();
        s.on_tick(&at(66, 1, 58, 0), T0, &mut w);
        s.on_tick(&at(66, 1, 58, 30), T0, &mut w);
        let plan = s.on_tick(&at(66, 1, 59, 0), T0, &mut w).unwrap();
        assert_eq!(plan.repaint, Repaint::TimePartial);
        s.on_tick(&at(66, 1, 59, 59), T0, &mut w);

        let plan = s.on_tick(&at(66, 3, 0, 0), T0, &mut w).unwrap();
        assert!(!plan.day_changed);
        assert!(!s.state().pending_day_change);

        s.on_tick(&at(66, 3, 0, 1), T0, &mut w);
        let plan = s.on_tick(&at(66, 3, 1, 0), T0, &mut w).unwrap();
        assert_eq!(plan.repaint, Repaint::TimePartial);
    }

    #[test]
    fn test_weather_fetched_on_period_boundary() {
        let mut s = scheduler(None);
        let mut w = ScriptedWeather::new(vec![Ok(reading(64.2, 61)), Ok(reading(66.0, 0))]);

        let plan = s.on_tick(&at(100, 10, 0, 0), T0, &mut w).unwrap();
        assert_eq!(plan.weather, WeatherOutcome::Updated);
        assert!(!plan.needs_weather_partial());
        assert_eq!(s.weather().last_fetch_utc(), T0);

        // Odd hour is not a boundary for a 2 h period
        s.on_tick(&at(100, 11, 0, 59), T0 + 3599, &mut w);
        let plan = s.on_tick(&at(100, 11, 0, 0), T0 + 3600, &mut w).unwrap();
        assert_eq!(plan.weather, WeatherOutcome::NotDue);
        assert_eq!(w.calls, 1);
    }

    #[test]
    fn test_weather_guard_tolerates_early_boundary() {
        let mut early = scheduler(None);
        let mut w = ScriptedWeather::new(vec![Ok(reading(64.0, 1))]);
        early.fetch_weather(&mut w, T0);
        let mut on_time = early.clone();

        // 11 s short of the interval: too early
        let plan = early.on_tick(&at(100, 12, 0, 0), T0 + 7189, &mut w).unwrap();
        assert_eq!(plan.weather, WeatherOutcome::NotDue);

        // 10 s short is within the guard
        let mut w = ScriptedWeather::new(vec![Ok(reading(65.0, 1))]);
        let plan = on_time.on_tick(&at(100, 12, 0, 0), T0 + 7190, &mut w).unwrap();
        assert_eq!(plan.weather, WeatherOutcome::Updated);
        assert_eq!(on_time.weather().last_fetch_utc(), T0 + 7190);
    }

    #[test]
    fn test_failed_fetch_keeps_previous_reading() {
        let mut s = scheduler(None);
        let mut w = ScriptedWeather::new(vec![Ok(reading(72.0, 3)), Err(FetchError::HttpStatus(503))]);
        s.fetch_weather(&mut w, T0);
        let before = *s.weather();

        let plan = s.on_tick(&at(100, 12, 0, 0), T0 + 7200, &mut w).unwrap();
        assert_eq!(plan.weather, WeatherOutcome::Failed(FetchError::HttpStatus(503)));
        assert!(!plan.needs_weather_partial());
        assert_eq!(*s.weather(), before);
        assert!(s.weather().has_value());
        assert_eq!(s.weather().temperature_text().as_str(), "72°F");
    }

    #[test]
    fn test_boot_retry_until_first_value() {
        let mut s = scheduler(Some(5));
        let mut w = ScriptedWeather::new(vec![Err(FetchError::Timeout), Ok(reading(58.0, 95))]);

        let plan = s.on_tick(&at(100, 9, 5, 0), T0, &mut w).unwrap();
        assert_eq!(plan.weather, WeatherOutcome::Failed(FetchError::Timeout));

        s.on_tick(&at(100, 9, 5, 1), T0, &mut w);
        let plan = s.on_tick(&at(100, 9, 7, 0), T0, &mut w).unwrap();
        assert_eq!(plan.weather, WeatherOutcome::NotDue);

        s.on_tick(&at(100, 9, 7, 1), T0, &mut w);
        let plan = s.on_tick(&at(100, 9, 10, 0), T0 + 300, &mut w).unwrap();
        assert_eq!(plan.weather, WeatherOutcome::Updated);
        assert_eq!(plan.repaint, Repaint::TimePartial);
        assert!(plan.needs_weather_partial());

        // Retries stop once a value exists
        s.on_tick(&at(100, 9, 10, 1), T0 + 301, &mut w);
        let plan = s.on_tick(&at(100, 9, 15, 0), T0 + 600, &mut w).unwrap();
        assert_eq!(plan.weather, WeatherOutcome::NotDue);
        assert_eq!(w.calls, 2);
    }

    #[test]
    fn test_zero_periods_in_hand_built_config() {
        let mut config = Builder::new()
            .dimensions(Dimensions::new(400, 300).unwrap())
            .build()
            .unwrap();
        config.full_refresh_period_min = 0;
        config.weather_period_hr = 0;
        config.weather_retry_min = Some(0);
        let mut s = RefreshScheduler::new(&config);
        let mut w = ScriptedWeather::failing();

        let plan = s.on_tick(&at(100, 9, 17, 0), T0, &mut w).unwrap();
        assert_eq!(plan.repaint, Repaint::TimePartial);
        assert_eq!(plan.weather, WeatherOutcome::NotDue);

        // Falls back to the 30 min and 2 h defaults
        s.on_tick(&at(100, 9, 17, 1), T0, &mut w);
        let plan = s.on_tick(&at(100, 10, 0, 0), T0 + 7200, &mut w).unwrap();
        assert_eq!(plan.repaint, Repaint::Full);
        assert_eq!(plan.weather, WeatherOutcome::Failed(FetchError::Network));
        assert_eq!(w.calls, 1);
    }

    #[test]
    fn test_without_retry_waits_for_boundary() {
        let mut s = scheduler(None);
        let mut w = ScriptedWeather::failing();
        for minute in [5, 10, 15] {
            s.on_tick(&at(100, 9, minute, 0), T0, &mut w);
            s.on_tick(&at(100, 9, minute, 1), T0, &mut w);
        }
        assert_eq!(w.calls, 0);
    }
}
