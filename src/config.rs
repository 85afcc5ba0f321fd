//! Panel configuration types and builder
//!
//! Every cadence, margin and gap the panel uses lives in [`Config`], validated
//! once by [`Builder::build`]. Nothing is reconfigured at runtime.

pub use crate::error::BuilderError;

/// Default full-refresh cadence in minutes
pub const DEFAULT_FULL_REFRESH_PERIOD_MIN: u8 = 30;
/// Default weather cadence in hours
pub const DEFAULT_WEATHER_PERIOD_HR: u8 = 2;
/// Default tolerance subtracted from the weather interval
pub const DEFAULT_WEATHER_GUARD_SECS: u32 = 10;
/// Default timezone rule (US Pacific)
pub const DEFAULT_TIMEZONE: &str = "PST8PDT,M3.2.0/2,M11.1.0/2";

/// Display dimensions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    /// Width in pixels
    pub width: u16,
    /// Height in pixels
    pub height: u16,
}

impl Dimensions {
    /// Create new dimensions with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if:
    /// - width or height is zero
    /// - width % 8 != 0 (must be byte-aligned for memory)
    pub fn new(width: u16, height: u16) -> Result<Self, BuilderError> {
        if width == 0 || height == 0 || !width.is_multiple_of(8) {
            return Err(BuilderError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Calculate required 1-bpp frame buffer size in bytes
    pub fn buffer_size(&self) -> usize {
        (self.width as usize / 8) * self.height as usize
    }

    /// Horizontal midpoint
    pub fn mid_x(&self) -> i32 {
        i32::from(self.width) / 2
    }
}

/// Geographic position handed to the weather source
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Location {
    /// Latitude in degrees
    pub lat: f32,
    /// Longitude in degrees
    pub lon: f32,
}

impl Location {
    /// Create a new location
    pub const fn new(lat: f32, lon: f32) -> Self {
        Self { lat, lon }
    }

    fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Fixed offsets used by the layout engine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutParams {
    /// Time baseline; `None` places it 10 px above the vertical centre
    pub anchor_y: Option<i32>,
    /// Date baseline offset from the anchor
    pub date_gap: i32,
    /// Weather baseline offset from the anchor
    pub weather_gap: i32,
    /// Padding added around each text box before alignment
    pub margin: u16,
    /// Space between the weather icon and the temperature text
    pub icon_gap: u16,
    /// Side length of the square weather icon
    pub icon_size: u16,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            anchor_y: None,
            date_gap: 45,
            weather_gap: 95,
            margin: 10,
            icon_gap: 8,
            icon_size: crate::icons::ICON_SIZE,
        }
    }
}

impl LayoutParams {
    /// Resolve the anchor baseline for a screen of `height` pixels
    pub fn anchor_for(&self, height: u16) -> i32 {
        self.anchor_y.unwrap_or(i32::from(height) / 2 - 10)
    }
}

/// Panel configuration
///
/// Use [`Builder`] to create a Config.
#[derive(Clone, Debug)]
pub struct Config {
    /// Display dimensions
    pub dimensions: Dimensions,
    /// Minutes between full repaints (`minute % period == 0`)
    pub full_refresh_period_min: u8,
    /// Hours between weather fetches (`hour % period == 0`)
    pub weather_period_hr: u8,
    /// Seconds of jitter tolerated before the weather interval has elapsed
    pub weather_guard_secs: u32,
    /// Retry cadence in minutes while no weather reading was ever fetched
    pub weather_retry_min: Option<u8>,
    /// Position for weather lookups
    pub location: Location,
    /// POSIX timezone rule applied by the clock collaborator
    pub timezone: &'static str,
    /// Layout offsets
    pub layout: LayoutParams,
    /// Sleep between polls of the clock
    pub poll_interval_ms: u32,
    /// Sleep after a failed clock read
    pub clock_retry_ms: u32,
    /// Upper bound on waiting for network time at boot
    pub time_sync_timeout_ms: u32,
    /// Interval between network time polls at boot
    pub time_sync_poll_ms: u32,
}

impl Config {
    /// Weather interval in seconds
    pub fn weather_interval_secs(&self) -> u32 {
        u32::from(self.weather_period_hr) * 3600
    }
}

/// Builder for constructing panel configuration
///
/// # Example
///
/// ```
/// use inkclock::{Builder, Dimensions, Location};
///
/// let dims = match Dimensions::new(400, 300) {
///     Ok(dims) => dims,
///     Err(_) => return,
/// };
/// let config = match Builder::new()
///     .dimensions(dims)
///     .location(Location::new(37.77, -122.42))
///     .full_refresh_period_min(15)
///     .build()
/// {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.weather_period_hr, 2);
/// ```
#[must_use]
#[derive(Clone, Debug)]
pub struct Builder {
    dimensions: Option<Dimensions>,
    full_refresh_period_min: u8,
    weather_period_hr: u8,
    weather_guard_secs: u32,
    weather_retry_min: Option<u8>,
    location: Location,
    timezone: &'static str,
    layout: LayoutParams,
    poll_interval_ms: u32,
    clock_retry_ms: u32,
    time_sync_timeout_ms: u32,
    time_sync_poll_ms: u32,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            dimensions: None,
            full_refresh_period_min: DEFAULT_FULL_REFRESH_PERIOD_MIN,
            weather_period_hr: DEFAULT_WEATHER_PERIOD_HR,
            weather_guard_secs: DEFAULT_WEATHER_GUARD_SECS,
            weather_retry_min: Some(5),
            location: Location::default(),
            timezone: DEFAULT_TIMEZONE,
            layout: LayoutParams::default(),
            // Clock is 1 Hz; 50 ms keeps the minute flip prompt
            poll_interval_ms: 50,
            clock_retry_ms: 100,
            // 60 polls of 250 ms
            time_sync_timeout_ms: 15_000,
            time_sync_poll_ms: 250,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set display dimensions (required)
    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        self.dimensions = Some(dims);
        self
    }

    /// Set the full refresh cadence in minutes
    pub fn full_refresh_period_min(mut self, minutes: u8) -> Self {
        self.full_refresh_period_min = minutes;
        self
    }

    /// Set the weather cadence in hours
    pub fn weather_period_hr(mut self, hours: u8) -> Self {
        self.weather_period_hr = hours;
        self
    }

    /// Set the weather interval guard in seconds
    pub fn weather_guard_secs(mut self, secs: u32) -> Self {
        self.weather_guard_secs = secs;
        self
    }

    /// Set the retry cadence used until the first weather fetch succeeds
    ///
    /// `None` waits for the next scheduled weather boundary instead.
    pub fn weather_retry_min(mut self, minutes: Option<u8>) -> Self {
        self.weather_retry_min = minutes;
        self
    }

    /// Set the weather location
    pub fn location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Set the POSIX timezone rule
    pub fn timezone(mut self, rule: &'static str) -> Self {
        self.timezone = rule;
        self
    }

    /// Set layout offsets
    pub fn layout(mut self, layout: LayoutParams) -> Self {
        self.layout = layout;
        self
    }

    /// Set the sleep between clock polls
    pub fn poll_interval_ms(mut self, ms: u32) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Set the sleep after a failed clock read
    pub fn clock_retry_ms(mut self, ms: u32) -> Self {
        self.clock_retry_ms = ms;
        self
    }

    /// Set the bound and poll interval for boot-time network time sync
    pub fn time_sync(mut self, timeout_ms: u32, poll_ms: u32) -> Self {
        self.time_sync_timeout_ms = timeout_ms;
        self.time_sync_poll_ms = poll_ms;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingDimensions` if dimensions were not set, or
    /// the matching variant for any out-of-range cadence, location or interval.
    pub fn build(self) -> Result<Config, BuilderError> {
        let dimensions = self.dimensions.ok_or(BuilderError::MissingDimensions)?;

        if self.full_refresh_period_min == 0 || self.full_refresh_period_min > 60 {
            return Err(BuilderError::InvalidRefreshPeriod(
                self.full_refresh_period_min,
            ));
        }
        if self.weather_period_hr == 0 || self.weather_period_hr > 24 {
            return Err(BuilderError::InvalidWeatherPeriod(self.weather_period_hr));
        }
        let interval_secs = u32::from(self.weather_period_hr) * 3600;
        if self.weather_guard_secs >= interval_secs {
            return Err(BuilderError::InvalidWeatherGuard {
                guard_secs: self.weather_guard_secs,
                interval_secs,
            });
        }
        if let Some(retry) = self.weather_retry_min
            && (retry == 0 || retry > 59)
        {
            return Err(BuilderError::InvalidRetryPeriod(retry));
        }
        if !self.location.is_valid() {
            return Err(BuilderError::InvalidLocation {
                lat: self.location.lat,
                lon: self.location.lon,
            });
        }
        if self.poll_interval_ms == 0
            || self.clock_retry_ms == 0
            || self.time_sync_poll_ms == 0
        {
            return Err(BuilderError::ZeroInterval);
        }

        Ok(Config {
            dimensions,
            full_refresh_period_min: self.full_refresh_period_min,
            weather_period_hr: self.weather_period_hr,
            weather_guard_secs: self.weather_guard_secs,
            weather_retry_min: self.weather_retry_min,
            location: self.location,
            timezone: self.timezone,
            layout: self.layout,
            poll_interval_ms: self.poll_interval_ms,
            clock_retry_ms: self.clock_retry_ms,
            time_sync_timeout_ms: self.time_sync_timeout_ms,
            time_sync_poll_ms: self.time_sync_poll_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims() -> Dimensions {
        Dimensions::new(400, 300).unwrap()
    }

    #[test]
    fn test_dimensions_reject_unaligned_width() {
        assert!(matches!(
            Dimensions::new(401, 300),
            Err(BuilderError::InvalidDimensions {
                width: 401,
                height: 300
            })
        ));
    }

    #[test]
    fn test_dimensions_reject_zero() {
        assert!(Dimensions::new(0, 300).is_err());
        assert!(Dimensions::new(400, 0).is_err());
    }

    #[test]
    fn test_dimensions_buffer_size() {
        assert_eq!(dims().buffer_size(), 400 / 8 * 300);
    }

    #[test]
    fn test_builder_defaults() {
        let config = Builder::new().dimensions(dims()).build().unwrap();
        assert_eq!(config.full_refresh_period_min, 30);
        assert_eq!(config.weather_period_hr, 2);
        assert_eq!(config.weather_guard_secs, 10);
        assert_eq!(config.weather_retry_min, Some(5));
        assert_eq!(config.weather_interval_secs(), 7200);
        assert_eq!(config.layout.margin, 10);
        assert_eq!(config.timezone, DEFAULT_TIMEZONE);
    }

    #[test]
    fn test_builder_missing_dimensions() {
        assert!(matches!(
            Builder::new().build(),
            Err(BuilderError::MissingDimensions)
        ));
    }

    #[test]
    fn test_builder_rejects_zero_refresh_period() {
        let result = Builder::new()
            .dimensions(dims())
            .full_refresh_period_min(0)
            .build();
        assert!(matches!(result, Err(BuilderError::InvalidRefreshPeriod(0))));
    }

    #[test]
    fn test_builder_rejects_zero_weather_period() {
        let result = Builder::new().dimensions(dims()).weather_period_hr(0).build();
        assert!(matches!(result, Err(BuilderError::InvalidWeatherPeriod(0))));
    }

    #[test]
    fn test_builder_rejects_guard_longer_than_interval() {
        let result = Builder::new()
            .dimensions(dims())
            .weather_period_hr(1)
            .weather_guard_secs(3600)
            .build();
        assert!(matches!(
            result,
            Err(BuilderError::InvalidWeatherGuard {
                guard_secs: 3600,
                interval_secs: 3600
            })
        ));
    }

    #[test]
    fn test_builder_rejects_bad_retry_period() {
        let result = Builder::new()
            .dimensions(dims())
            .weather_retry_min(Some(0))
            .build();
        assert!(matches!(result, Err(BuilderError::InvalidRetryPeriod(0))));

        let result = Builder::new()
            .dimensions(dims())
            .weather_retry_min(None)
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_builder_rejects_bad_location() {
        let result = Builder::new()
            .dimensions(dims())
            .location(Location::new(91.0, 0.0))
            .build();
        assert!(matches!(result, Err(BuilderError::InvalidLocation { .. })));
    }

    #[test]
    fn test_builder_rejects_zero_poll_interval() {
        let result = Builder::new().dimensions(dims()).poll_interval_ms(0).build();
        assert!(matches!(result, Err(BuilderError::ZeroInterval)));
    }

    #[test]
    fn test_anchor_defaults_to_centre_minus_ten() {
        let params = LayoutParams::default();
        assert_eq!(params.anchor_for(300), 140);
        let params = LayoutParams {
            anchor_y: Some(60),
            ..LayoutParams::default()
        };
        assert_eq!(params.anchor_for(300), 60);
    }
}
