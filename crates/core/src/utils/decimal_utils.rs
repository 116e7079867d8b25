//! Overflow-safe decimal arithmetic.
//!
//! `Decimal`'s operators panic past roughly 7.9e28. Holdings are accepted as
//! entered, so every aggregate in the core goes through these helpers
//! instead: overflow saturates at the representable bound and is logged.

use log::warn;
use rust_decimal::Decimal;

pub fn add(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or_else(|| {
        warn!("Decimal overflow in {} + {}, saturating", a, b);
        a.saturating_add(b)
    })
}

pub fn sub(a: Decimal, b: Decimal) -> Decimal {
    a.checked_sub(b).unwrap_or_else(|| {
        warn!("Decimal overflow in {} - {}, saturating", a, b);
        a.saturating_sub(b)
    })
}

pub fn mul(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b).unwrap_or_else(|| {
        warn!("Decimal overflow in {} * {}, saturating", a, b);
        a.saturating_mul(b)
    })
}

/// `a / b`, or None on a zero divisor or an unrepresentable quotient.
pub fn div(a: Decimal, b: Decimal) -> Option<Decimal> {
    if b.is_zero() {
        return None;
    }
    let quotient = a.checked_div(b);
    if quotient.is_none() {
        warn!("Decimal overflow in {} / {}", a, b);
    }
    quotient
}

/// Saturating sum.
pub fn sum<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().fold(Decimal::ZERO, add)
}
