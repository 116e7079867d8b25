use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// Default market timezone. Capture windows and calendar dates are judged
/// in this zone, not in UTC.
pub const DEFAULT_MARKET_TZ: Tz = chrono_tz::Asia::Taipei;

/// Wall-clock source, injectable so capture policy can be tested.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Tz>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Converts a UTC instant to the market-local time.
///
/// This is the single source of truth for deriving a "business date" from
/// a timestamp.
pub fn market_time_from_utc(instant: DateTime<Utc>, tz: Tz) -> DateTime<Tz> {
    instant.with_timezone(&tz)
}

/// The real clock, reporting time in a fixed market timezone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(DEFAULT_MARKET_TZ)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Tz> {
        market_time_from_utc(Utc::now(), self.tz)
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Tz>);

impl FixedClock {
    /// Builds a clock at the given market-local wall time.
    /// Returns None for wall times that do not exist in the zone.
    pub fn at(tz: Tz, year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Option<Self> {
        tz.with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .map(FixedClock)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Tz> {
        self.0
    }
}

/// Parses an IANA timezone name, falling back to the default market zone.
pub fn parse_market_tz(name: &str) -> Tz {
    name.parse::<Tz>().unwrap_or_else(|_| {
        log::warn!(
            "Unknown timezone '{}', falling back to {}",
            name,
            DEFAULT_MARKET_TZ
        );
        DEFAULT_MARKET_TZ
    })
}
