//! Clock source abstraction
//!
//! The scheduler consumes one [`LocalTimeSample`] per poll from a
//! [`ClockSource`]. The source is backed by a battery-backed [`Rtc`] holding
//! UTC, corrected once at boot from network time with [`sync_clock`], and
//! decomposed into local civil time by a timezone rule.
//!
//! Two adapters are provided:
//!
//! - [`FixedOffsetClock`] - constant UTC offset, no allocation
//! - [`ZonedClock`] - POSIX timezone rule with DST (requires the `tz` feature)
//!
//! ## Example
//!
//! ```
//! use inkclock::{LocalTimeSample, clock::format_time, clock::format_date};
//!
//! // 2026-10-19 07:00:00 UTC seen from UTC-7
//! let sample = match LocalTimeSample::from_local_seconds(1_792_393_200 - 7 * 3600) {
//!     Ok(sample) => sample,
//!     Err(_) => return,
//! };
//! assert_eq!((sample.hour, sample.minute, sample.second), (0, 0, 0));
//! assert_eq!(format_time(&sample).as_str(), "00:00");
//! assert_eq!(format_date(&sample).as_str(), "Monday, October 19 2026");
//! ```

use core::fmt::Write;

use embedded_hal::delay::DelayNs;
use jiff::Timestamp;
use jiff::civil::DateTime;
use jiff::tz::Offset;
use log::{debug, info, warn};

pub use crate::error::ClockError;

/// Network time earlier than this is treated as not yet acquired (Nov 2023)
pub const MIN_PLAUSIBLE_UTC: i64 = 1_700_000_000;

/// Representative widest time string
pub const SAMPLE_TIME: &str = "23:59";
/// Representative widest date string
pub const SAMPLE_DATE: &str = "Wednesday, September 30 2026";

/// Formatted `HH:MM`
pub type TimeText = heapless::String<8>;
/// Formatted `Weekday, Month D YYYY`
pub type DateText = heapless::String<40>;

const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Local civil time, decomposed once per tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LocalTimeSample {
    /// Full year
    pub year: i16,
    /// Month, 1-12
    pub month: u8,
    /// Day of month, 1-31
    pub day: u8,
    /// Hour, 0-23
    pub hour: u8,
    /// Minute, 0-59
    pub minute: u8,
    /// Second, 0-59
    pub second: u8,
    /// Day of week, 0-6 with Sunday = 0
    pub weekday: u8,
    /// Day of year, 0-365 with January 1 = 0
    pub year_day: u16,
}

impl LocalTimeSample {
    /// Decompose seconds since 1970-01-01T00:00:00 *local* time
    ///
    /// Used by fixed-offset clocks, and for an RTC that was never set (the
    /// epoch itself decomposes to Thursday, January 1 1970).
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::OutOfRange`] if the instant is outside the range
    /// `jiff` supports.
    pub fn from_local_seconds(secs: i64) -> Result<Self, ClockError> {
        Self::from_utc_with_offset(secs, 0)
    }

    /// Decompose UTC seconds seen from `offset_secs` east of UTC
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::OutOfRange`] if the instant or the offset is
    /// outside the range `jiff` supports.
    pub fn from_utc_with_offset(utc: i64, offset_secs: i32) -> Result<Self, ClockError> {
        let ts = Timestamp::from_second(utc).map_err(|_| ClockError::OutOfRange)?;
        let offset = Offset::from_seconds(offset_secs).map_err(|_| ClockError::OutOfRange)?;
        Ok(Self::from_datetime(offset.to_datetime(ts)))
    }

    fn from_datetime(dt: DateTime) -> Self {
        Self {
            year: dt.year(),
            month: dt.month() as u8,
            day: dt.day() as u8,
            hour: dt.hour() as u8,
            minute: dt.minute() as u8,
            second: dt.second() as u8,
            weekday: dt.weekday().to_sunday_zero_offset() as u8,
            year_day: (dt.day_of_year() - 1) as u16,
        }
    }
}

/// Provider of local time for the scheduler
pub trait ClockSource {
    /// Read the current local time
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::Unavailable`] if the peripheral cannot be read. The
    /// caller skips the tick and retries on the next poll.
    fn read_local(&mut self) -> Result<LocalTimeSample, ClockError>;

    /// UTC seconds of the most recent successful read
    fn now_utc_seconds(&self) -> i64;

    /// Store a corrected UTC instant into the backing peripheral
    fn store_utc(&mut self, utc: i64) -> Result<(), ClockError>;
}

/// Battery-backed real-time clock holding UTC seconds
pub trait Rtc {
    /// Peripheral error type
    type Error: core::fmt::Debug;

    /// Read UTC seconds since the Unix epoch
    fn read_utc(&mut self) -> Result<i64, Self::Error>;

    /// Write UTC seconds since the Unix epoch
    fn write_utc(&mut self, utc: i64) -> Result<(), Self::Error>;
}

/// Network time provider polled during boot
pub trait TimeSync {
    /// Latest network UTC seconds, or `None` until time has been acquired
    fn poll_utc(&mut self) -> Option<i64>;
}

/// Wait for network time and store it in the clock (with timeout)
///
/// Polls `sync` every `poll_ms` until it reports an instant at or after
/// [`MIN_PLAUSIBLE_UTC`], then writes it through [`ClockSource::store_utc`].
///
/// # Errors
///
/// Returns [`ClockError::TimeSyncTimeout`] if no plausible time arrives within
/// `timeout_ms`, or the clock's error if storing fails. Either way the clock
/// keeps whatever it already held.
pub fn sync_clock<T, C, D>(
    sync: &mut T,
    clock: &mut C,
    delay: &mut D,
    timeout_ms: u32,
    poll_ms: u32,
) -> Result<i64, ClockError>
where
    T: TimeSync,
    C: ClockSource,
    D: DelayNs,
{
    let mut waited_ms = 0u32;

    loop {
        if let Some(utc) = sync.poll_utc()
            && utc >= MIN_PLAUSIBLE_UTC
        {
            clock.store_utc(utc)?;
            info!("Clock adjusted from network time: {utc}");
            return Ok(utc);
        }

        if waited_ms >= timeout_ms {
            warn!("Network time not acquired within {timeout_ms}ms");
            return Err(ClockError::TimeSyncTimeout);
        }

        delay.delay_ms(poll_ms);
        waited_ms = waited_ms.saturating_add(poll_ms);
    }
}

/// Clock with a constant offset from UTC
pub struct FixedOffsetClock<R> {
    rtc: R,
    offset_secs: i32,
    last_utc: i64,
}

impl<R: Rtc> FixedOffsetClock<R> {
    /// Create a clock `offset_secs` east of UTC
    pub fn new(rtc: R, offset_secs: i32) -> Self {
        Self {
            rtc,
            offset_secs,
            last_utc: 0,
        }
    }

    /// Access the underlying RTC
    pub fn rtc_mut(&mut self) -> &mut R {
        &mut self.rtc
    }
}

impl<R: Rtc> ClockSource for FixedOffsetClock<R> {
    fn read_local(&mut self) -> Result<LocalTimeSample, ClockError> {
        let utc = read_rtc(&mut self.rtc)?;
        let sample = LocalTimeSample::from_utc_with_offset(utc, self.offset_secs)?;
        self.last_utc = utc;
        Ok(sample)
    }

    fn now_utc_seconds(&self) -> i64 {
        self.last_utc
    }

    fn store_utc(&mut self, utc: i64) -> Result<(), ClockError> {
        write_rtc(&mut self.rtc, utc)?;
        self.last_utc = utc;
        Ok(())
    }
}

/// Clock applying a POSIX timezone rule such as `PST8PDT,M3.2.0/2,M11.1.0/2`
#[cfg(feature = "tz")]
pub struct ZonedClock<R> {
    rtc: R,
    tz: jiff::tz::TimeZone,
    last_utc: i64,
}

#[cfg(feature = "tz")]
impl<R: Rtc> ZonedClock<R> {
    /// Create a clock from a POSIX TZ rule string
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidTimeZone`] if the rule does not parse.
    pub fn new(rtc: R, rule: &str) -> Result<Self, ClockError> {
        let tz = jiff::tz::TimeZone::posix(rule).map_err(|e| {
            warn!("Rejected timezone rule {rule:?}: {e}");
            ClockError::InvalidTimeZone
        })?;
        Ok(Self {
            rtc,
            tz,
            last_utc: 0,
        })
    }

    /// Access the underlying RTC
    pub fn rtc_mut(&mut self) -> &mut R {
        &mut self.rtc
    }
}

#[cfg(feature = "tz")]
impl<R: Rtc> ClockSource for ZonedClock<R> {
    fn read_local(&mut self) -> Result<LocalTimeSample, ClockError> {
        let utc = read_rtc(&mut self.rtc)?;
        let zoned = Timestamp::from_second(utc)
            .map_err(|_| ClockError::OutOfRange)?
            .to_zoned(self.tz.clone());
        self.last_utc = utc;
        Ok(LocalTimeSample::from_datetime(zoned.datetime()))
    }

    fn now_utc_seconds(&self) -> i64 {
        self.last_utc
    }

    fn store_utc(&mut self, utc: i64) -> Result<(), ClockError> {
        write_rtc(&mut self.rtc, utc)?;
        self.last_utc = utc;
        Ok(())
    }
}

fn read_rtc<R: Rtc>(rtc: &mut R) -> Result<i64, ClockError> {
    rtc.read_utc().map_err(|e| {
        debug!("RTC read failed: {e:?}");
        ClockError::Unavailable
    })
}

fn write_rtc<R: Rtc>(rtc: &mut R, utc: i64) -> Result<(), ClockError> {
    rtc.write_utc(utc).map_err(|e| {
        warn!("RTC write failed: {e:?}");
        ClockError::Unavailable
    })
}

/// English weekday name, Sunday = 0
pub fn weekday_name(weekday: u8) -> &'static str {
    WEEKDAYS[weekday as usize % 7]
}

/// English month name, January = 1
pub fn month_name(month: u8) -> &'static str {
    match month {
        1..=12 => MONTHS[month as usize - 1],
        _ => "Month?",
    }
}

/// Format the time field as 24-hour `HH:MM`
pub fn format_time(sample: &LocalTimeSample) -> TimeText {
    let mut text = TimeText::new();
    let _ = write!(text, "{:02}:{:02}", sample.hour, sample.minute);
    text
}

/// Format the date field as `Weekday, Month D YYYY`
pub fn format_date(sample: &LocalTimeSample) -> DateText {
    let mut text = DateText::new();
    let _ = write!(
        text,
        "{}, {} {} {}",
        weekday_name(sample.weekday),
        month_name(sample.month),
        sample.day,
        sample.year
    );
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct MockRtc {
        utc: Option<i64>,
        written: Option<i64>,
    }

    impl Rtc for MockRtc {
        type Error = ();

        fn read_utc(&mut self) -> Result<i64, Self::Error> {
            self.utc.ok_or(())
        }

        fn write_utc(&mut self, utc: i64) -> Result<(), Self::Error> {
            self.written = Some(utc);
            self.utc = Some(utc);
            Ok(())
        }
    }

    struct MockDelay {
        total_ms: u64,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ms += u64::from(ns / 1_000_000);
        }
    }

    struct ScriptedSync {
        polls: u32,
        ready_after: Option<u32>,
        utc: i64,
    }

    impl TimeSync for ScriptedSync {
        fn poll_utc(&mut self) -> Option<i64> {
            self.polls += 1;
            match self.ready_after {
                Some(n) if self.polls > n => Some(self.utc),
                _ => Some(0),
            }
        }
    }

    #[test]
    fn test_epoch_decomposes_to_thursday() {
        let s = LocalTimeSample::from_local_seconds(0).unwrap();
        assert_eq!((s.year, s.month, s.day), (1970, 1, 1));
        assert_eq!((s.hour, s.minute, s.second), (0, 0, 0));
        assert_eq!(s.weekday, 4);
        assert_eq!(s.year_day, 0);
    }

    #[test]
    fn test_leap_day() {
        // 2024-02-29T12:00:00Z
        let s = LocalTimeSample::from_local_seconds(1_709_208_000).unwrap();
        assert_eq!((s.year, s.month, s.day, s.hour), (2024, 2, 29, 12));
        assert_eq!(s.weekday, 4);
        assert_eq!(s.year_day, 59);
    }

    #[test]
    fn test_last_second_of_year() {
        // 2026-12-31T23:59:59Z
        let s = LocalTimeSample::from_local_seconds(1_798_761_599).unwrap();
        assert_eq!((s.year, s.month, s.day), (2026, 12, 31));
        assert_eq!((s.hour, s.minute, s.second), (23, 59, 59));
        assert_eq!(s.year_day, 364);
        let next = LocalTimeSample::from_local_seconds(1_798_761_600).unwrap();
        assert_eq!((next.year, next.year_day), (2027, 0));
    }

    #[test]
    fn test_negative_seconds_before_epoch() {
        let s = LocalTimeSample::from_local_seconds(-1).unwrap();
        assert_eq!((s.year, s.month, s.day), (1969, 12, 31));
        assert_eq!((s.hour, s.minute, s.second), (23, 59, 59));
        assert_eq!(s.weekday, 3);
    }

    #[test]
    fn test_out_of_range_year() {
        assert_eq!(
            LocalTimeSample::from_local_seconds(i64::MAX / 2),
            Err(ClockError::OutOfRange)
        );
    }

    #[test]
    fn test_offset_crosses_day_boundary() {
        // 2026-10-19T03:00:00Z is still Oct 18 at UTC-7
        let s = LocalTimeSample::from_utc_with_offset(1_792_378_800, -7 * 3600).unwrap();
        assert_eq!((s.month, s.day, s.hour), (10, 18, 20));
        assert_eq!(s.weekday, 0);
        assert_eq!(s.year_day, 290);
    }

    #[test]
    fn test_offset_out_of_range() {
        assert_eq!(
            LocalTimeSample::from_utc_with_offset(0, 26 * 3600),
            Err(ClockError::OutOfRange)
        );
    }

    #[test]
    fn test_format_time_pads() {
        let s = LocalTimeSample {
            hour: 7,
            minute: 5,
            ..LocalTimeSample::default()
        };
        assert_eq!(format_time(&s).as_str(), "07:05");
    }

    #[test]
    fn test_format_date_and_names() {
        let s = LocalTimeSample {
            year: 2026,
            month: 2,
            day: 15,
            weekday: 0,
            ..LocalTimeSample::default()
        };
        assert_eq!(format_date(&s).as_str(), "Sunday, February 15 2026");
        assert_eq!(month_name(0), "Month?");
        assert_eq!(month_name(13), "Month?");
        assert_eq!(weekday_name(9), "Tuesday");
    }

    #[test]
    fn test_sample_date_is_longest_by_chars() {
        let longest_weekday = WEEKDAYS.iter().map(|w| w.len()).max().unwrap();
        let longest_month = MONTHS.iter().map(|m| m.len()).max().unwrap();
        assert_eq!(SAMPLE_DATE.len(), longest_weekday + longest_month + 2 + 1 + 2 + 1 + 4);
    }

    #[test]
    fn test_fixed_offset_clock_reads_local() {
        // 2026-10-19T07:00:00Z is midnight at UTC-7
        let rtc = MockRtc {
            utc: Some(1_792_393_200),
            written: None,
        };
        let mut clock = FixedOffsetClock::new(rtc, -7 * 3600);
        let s = clock.read_local().unwrap();
        assert_eq!((s.month, s.day, s.hour, s.minute), (10, 19, 0, 0));
        assert_eq!(s.year_day, 291);
        assert_eq!(clock.now_utc_seconds(), 1_792_393_200);
    }

    #[test]
    fn test_fixed_offset_clock_unavailable() {
        let rtc = MockRtc {
            utc: None,
            written: None,
        };
        let mut clock = FixedOffsetClock::new(rtc, 0);
        assert_eq!(clock.read_local(), Err(ClockError::Unavailable));
        assert_eq!(clock.now_utc_seconds(), 0);
    }

    #[test]
    fn test_sync_clock_stores_plausible_time() {
        let mut clock = FixedOffsetClock::new(
            MockRtc {
                utc: Some(0),
                written: None,
            },
            0,
        );
        let mut sync = ScriptedSync {
            polls: 0,
            ready_after: Some(3),
            utc: 1_792_393_200,
        };
        let mut delay = MockDelay { total_ms: 0 };

        let result = sync_clock(&mut sync, &mut clock, &mut delay, 15_000, 250);
        assert_eq!(result, Ok(1_792_393_200));
        assert_eq!(clock.rtc_mut().written, Some(1_792_393_200));
        assert_eq!(sync.polls, 4);
        assert_eq!(delay.total_ms, 750);
    }

    #[test]
    fn test_sync_clock_times_out_and_keeps_rtc() {
        let mut clock = FixedOffsetClock::new(
            MockRtc {
                utc: Some(1_000),
                written: None,
            },
            0,
        );
        let mut sync = ScriptedSync {
            polls: 0,
            ready_after: None,
            utc: 0,
        };
        let mut delay = MockDelay { total_ms: 0 };

        let result = sync_clock(&mut sync, &mut clock, &mut delay, 15_000, 250);
        assert_eq!(result, Err(ClockError::TimeSyncTimeout));
        assert_eq!(clock.rtc_mut().written, None);
        assert_eq!(sync.polls, 61);
        assert_eq!(delay.total_ms, 15_000);
    }

    #[cfg(feature = "tz")]
    #[test]
    fn test_zoned_clock_spring_forward_keeps_year_day() {
        let mut clock = ZonedClock::new(
            MockRtc {
                // 2026-03-08T09:59:00Z = 01:59 PST
                utc: Some(1_772_963_940),
                written: None,
            },
            crate::config::DEFAULT_TIMEZONE,
        )
        .unwrap();
        let before = clock.read_local().unwrap();
        assert_eq!((before.hour, before.minute), (1, 59));

        // One minute later the wall clock jumps to 03:00 PDT
        clock.rtc_mut().utc = Some(1_772_964_000);
        let after = clock.read_local().unwrap();
        assert_eq!((after.hour, after.minute), (3, 0));
        assert_eq!(before.year_day, after.year_day);
        assert_eq!(after.year_day, 66);
        assert_eq!(after.weekday, 0);
    }

    #[cfg(feature = "tz")]
    #[test]
    fn test_zoned_clock_local_midnight() {
        let mut clock = ZonedClock::new(
            MockRtc {
                // 2026-10-19T06:59:59Z = 23:59:59 PDT on Oct 18
                utc: Some(1_792_393_199),
                written: None,
            },
            crate::config::DEFAULT_TIMEZONE,
        )
        .unwrap();
        let before = clock.read_local().unwrap();
        assert_eq!((before.day, before.hour, before.minute, before.second), (18, 23, 59, 59));

        clock.rtc_mut().utc = Some(1_792_393_200);
        let after = clock.read_local().unwrap();
        assert_eq!((after.day, after.hour, after.minute, after.second), (19, 0, 0, 0));
        assert_eq!(after.year_day, before.year_day + 1);
    }

    #[cfg(feature = "tz")]
    #[test]
    fn test_zoned_clock_rejects_bad_rule() {
        let rtc = MockRtc {
            utc: Some(0),
            written: None,
        };
        assert!(matches!(
            ZonedClock::new(rtc, "not a rule"),
            Err(ClockError::InvalidTimeZone)
        ));
    }
}
