use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Gateways speak integer minor units (paise, cents); the ledger keeps major units.
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

const MINOR_UNIT_SCALE: u32 = 2;

pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    (amount * Decimal::from(MINOR_UNITS_PER_MAJOR))
        .round()
        .to_i64()
}

pub fn from_minor_units(amount_minor: i64) -> Decimal {
    Decimal::new(amount_minor, MINOR_UNIT_SCALE)
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
