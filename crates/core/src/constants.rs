use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Loan-to-cost ratio applied to exchange margin purchases of local equities.
pub const MARGIN_LOAN_RATIO: Decimal = dec!(0.6);

/// Margin calls trigger once market value falls to 130% of the loan.
pub const LIQUIDATION_THRESHOLD: Decimal = dec!(1.30);

/// Maintenance rate (%) below which a margin position is flagged.
pub const DANGER_MAINTENANCE_RATE: Decimal = dec!(140);

/// Distance to liquidation (%) below which a position is flagged.
pub const DANGER_LIQUIDATION_DISTANCE: Decimal = dec!(10);

/// Display value for saturated leverage (non-positive equity with open exposure).
pub const LEVERAGE_SENTINEL: Decimal = dec!(999);

/// Maximum number of intraday snapshots kept for the current date.
pub const MAX_INTRADAY_SNAPSHOTS: usize = 5;

/// Snapshots are captured at or after this hour (after market close).
pub const CAPTURE_AFTER_HOUR: u32 = 16;

/// Snapshots are captured before this hour (pre-market).
pub const CAPTURE_BEFORE_HOUR: u32 = 9;

/// Decimal precision for stored aggregates
pub const DECIMAL_PRECISION: u32 = 6;
