//! Weather source abstraction and last-known state
//!
//! The panel never displays a half-updated reading: a [`WeatherSource`] returns
//! a complete [`WeatherReading`] or a [`FetchError`], and [`WeatherState`] only
//! changes on success. Once a value has been shown it stays until a newer one
//! replaces it.

use core::fmt::Write;

use crate::config::Location;
use crate::icons::IconClass;

pub use crate::error::FetchError;

/// Placeholder shown before the first successful fetch
pub const PLACEHOLDER: &str = "--";
/// Candidates for the widest temperature text, measured together
///
/// Which one is widest depends on the font: a minus sign is narrower than a
/// digit in most proportional faces.
pub const SAMPLE_WEATHER: [&str; 3] = ["-99°F", "199°F", PLACEHOLDER];

const MIN_DISPLAY_F: i32 = -99;
const MAX_DISPLAY_F: i32 = 199;

/// Formatted temperature, e.g. `72°F`
pub type TemperatureText = heapless::String<8>;

/// Decoded current conditions
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeatherReading {
    /// Temperature in degrees Fahrenheit
    pub temperature_f: f32,
    /// WMO weather interpretation code
    pub condition_code: u16,
}

/// Provider of current conditions, typically an HTTP client
pub trait WeatherSource {
    /// Fetch current conditions for `location`
    ///
    /// Implementations must bound the call with their own timeout and report
    /// it as [`FetchError::Timeout`].
    fn fetch_current(&mut self, location: Location) -> Result<WeatherReading, FetchError>;
}

/// Last good weather reading and when it was fetched
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WeatherState {
    reading: Option<WeatherReading>,
    last_fetch_utc: i64,
}

impl WeatherState {
    /// Create an empty state
    pub const fn new() -> Self {
        Self {
            reading: None,
            last_fetch_utc: 0,
        }
    }

    /// Whether a reading was ever fetched
    pub fn has_value(&self) -> bool {
        self.reading.is_some()
    }

    /// Last good reading
    pub fn reading(&self) -> Option<WeatherReading> {
        self.reading
    }

    /// UTC seconds of the last successful fetch, 0 if none
    pub fn last_fetch_utc(&self) -> i64 {
        self.last_fetch_utc
    }

    /// Replace the reading after a successful fetch
    pub fn record_success(&mut self, reading: WeatherReading, utc_now: i64) {
        self.reading = Some(reading);
        self.last_fetch_utc = utc_now;
    }

    /// Icon for the current reading
    pub fn icon(&self) -> Option<IconClass> {
        self.reading
            .map(|reading| IconClass::from_wmo_code(reading.condition_code))
    }

    /// Temperature text, or [`PLACEHOLDER`] without a value
    pub fn temperature_text(&self) -> TemperatureText {
        match self.reading {
            Some(reading) => format_temperature(reading.temperature_f),
            None => placeholder(),
        }
    }
}

/// Format a temperature as a whole number of degrees Fahrenheit
///
/// Rounds half away from zero and clamps to the range the layout reserves
/// room for. Non-finite values render as the placeholder.
pub fn format_temperature(temperature_f: f32) -> TemperatureText {
    if !temperature_f.is_finite() {
        return placeholder();
    }

    let rounded = if temperature_f < 0.0 {
        temperature_f - 0.5
    } else {
        temperature_f + 0.5
    };
    let degrees = (rounded as i32).clamp(MIN_DISPLAY_F, MAX_DISPLAY_F);

    let mut text = TemperatureText::new();
    let _ = write!(text, "{degrees}°F");
    text
}

fn placeholder() -> TemperatureText {
    let mut text = TemperatureText::new();
    let _ = text.push_str(PLACEHOLDER);
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_state_shows_placeholder() {
        let state = WeatherState::new();
        assert!(!state.has_value());
        assert_eq!(state.temperature_text().as_str(), "--");
        assert_eq!(state.icon(), None);
        assert_eq!(state.last_fetch_utc(), 0);
    }

    #[test]
    fn test_record_success() {
        let mut state = WeatherState::new();
        state.record_success(
            WeatherReading {
                temperature_f: 72.0,
                condition_code: 3,
            },
            1_792_393_200,
        );
        assert!(state.has_value());
        assert_eq!(state.temperature_text().as_str(), "72°F");
        assert_eq!(state.icon(), Some(IconClass::Cloud));
        assert_eq!(state.last_fetch_utc(), 1_792_393_200);
    }

    #[test]
    fn test_temperature_rounding() {
        assert_eq!(format_temperature(71.5).as_str(), "72°F");
        assert_eq!(format_temperature(71.49).as_str(), "71°F");
        assert_eq!(format_temperature(-0.4).as_str(), "0°F");
        assert_eq!(format_temperature(-3.5).as_str(), "-4°F");
    }

    #[test]
    fn test_temperature_clamped() {
        assert_eq!(format_temperature(-140.0).as_str(), SAMPLE_WEATHER[0]);
        assert_eq!(format_temperature(250.0).as_str(), SAMPLE_WEATHER[1]);
        assert_eq!(format_temperature(f32::NAN).as_str(), SAMPLE_WEATHER[2]);
    }
}
