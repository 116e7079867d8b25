pub mod decimal_utils;
pub mod time_utils;

pub use time_utils::{Clock, FixedClock, SystemClock, DEFAULT_MARKET_TZ};
