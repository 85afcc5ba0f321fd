//! Error types for the panel
//!
//! This module defines error types for configuration building ([`BuilderError`]),
//! the clock collaborator ([`ClockError`]), the weather collaborator
//! ([`FetchError`]) and panel operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Invalid static configuration, rejected once at startup
//! - [`ClockError`] - RTC or time-sync failures; a failed read only skips a tick
//! - [`FetchError`] - Weather lookup failures; the last good reading is kept
//! - [`Error`] - Display boundary failures surfaced by [`Panel`](crate::Panel)
//!
//! ## Example
//!
//! ```
//! use inkclock::{Builder, BuilderError, Dimensions};
//!
//! // Missing dimensions
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingDimensions)));
//!
//! // Width must be byte-aligned
//! let result = Dimensions::new(398, 300);
//! assert!(result.is_err());
//! ```

/// Errors that can occur while the panel is running
///
/// Generic over the display boundary's error type so callers can match on the
/// underlying hardware error.
#[derive(Debug)]
pub enum Error<E> {
    /// The display boundary rejected a window, draw or commit
    Display(E),
    /// Clock failure during a step that cannot be skipped
    Clock(ClockError),
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Display(e) => write!(f, "Display error: {e:?}"),
            Self::Clock(e) => write!(f, "Clock error: {e}"),
        }
    }
}

impl<E: core::fmt::Debug> core::error::Error for Error<E> {}

impl<E> From<ClockError> for Error<E> {
    fn from(e: ClockError) -> Self {
        Self::Clock(e)
    }
}

/// Errors reported by the clock collaborators
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockError {
    /// RTC peripheral not detected or the read failed
    Unavailable,
    /// Network time was not acquired within the configured bound
    TimeSyncTimeout,
    /// The timezone rule string could not be parsed
    InvalidTimeZone,
    /// The RTC holds an instant that cannot be represented as civil time
    OutOfRange,
}

impl core::fmt::Display for ClockError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "Clock unavailable"),
            Self::TimeSyncTimeout => write!(f, "Timed out waiting for network time"),
            Self::InvalidTimeZone => write!(f, "Invalid timezone rule"),
            Self::OutOfRange => write!(f, "Clock instant out of range"),
        }
    }
}

impl core::error::Error for ClockError {}

/// Errors reported by a [`WeatherSource`](crate::WeatherSource)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchError {
    /// Network not joined or the connection failed
    Network,
    /// The request exceeded its client timeout
    Timeout,
    /// The server answered with a status other than 200
    HttpStatus(u16),
    /// The response body could not be decoded
    Decode,
}

impl core::fmt::Display for FetchError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Network => write!(f, "Network unavailable"),
            Self::Timeout => write!(f, "Weather request timed out"),
            Self::HttpStatus(status) => write!(f, "Unexpected HTTP status {status}"),
            Self::Decode => write!(f, "Weather response could not be decoded"),
        }
    }
}

impl core::error::Error for FetchError {}

/// Errors that can occur when building configuration
///
/// These are reported once, before the panel is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BuilderError {
    /// Dimensions were not specified
    ///
    /// [`Builder::dimensions()`](crate::config::Builder::dimensions) must be called before building.
    MissingDimensions,
    /// Invalid dimensions provided
    ///
    /// See [`Dimensions::new()`](crate::config::Dimensions::new) for constraints.
    InvalidDimensions {
        /// Width requested
        width: u16,
        /// Height requested
        height: u16,
    },
    /// Full refresh period must be within 1..=60 minutes
    InvalidRefreshPeriod(u8),
    /// Weather period must be within 1..=24 hours
    InvalidWeatherPeriod(u8),
    /// Guard must be shorter than the weather interval
    InvalidWeatherGuard {
        /// Guard seconds requested
        guard_secs: u32,
        /// Weather interval in seconds
        interval_secs: u32,
    },
    /// Weather retry interval must be within 1..=59 minutes
    InvalidRetryPeriod(u8),
    /// Latitude or longitude outside the valid range
    InvalidLocation {
        /// Latitude requested
        lat: f32,
        /// Longitude requested
        lon: f32,
    },
    /// A loop pacing or time-sync interval was zero
    ZeroInterval,
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingDimensions => write!(f, "Dimensions must be specified"),
            Self::InvalidDimensions { width, height } => write!(
                f,
                "Invalid dimensions {width}x{height} (both non-zero, width must be multiple of 8)"
            ),
            Self::InvalidRefreshPeriod(min) => {
                write!(f, "Invalid full refresh period: {min} min (1..=60)")
            }
            Self::InvalidWeatherPeriod(hr) => {
                write!(f, "Invalid weather period: {hr} h (1..=24)")
            }
            Self::InvalidWeatherGuard {
                guard_secs,
                interval_secs,
            } => write!(
                f,
                "Weather guard {guard_secs}s must be shorter than the {interval_secs}s interval"
            ),
            Self::InvalidRetryPeriod(min) => {
                write!(f, "Invalid weather retry period: {min} min (1..=59)")
            }
            Self::InvalidLocation { lat, lon } => {
                write!(f, "Invalid location: lat={lat}, lon={lon}")
            }
            Self::ZeroInterval => write!(f, "Poll and sync intervals must be non-zero"),
        }
    }
}

impl core::error::Error for BuilderError {}
