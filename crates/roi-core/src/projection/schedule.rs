//! Per-year policy functions of the projection.
//!
//! Each function is a pure mapping from the year being projected (and the
//! scenario constants) to a single ledger amount, so the engine can stay a
//! straight-line loop and each rule can be tested in isolation.

use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;

use super::scenario::{DecayOffset, RoundingPrecision};
use crate::types::{Money, Percent, Rate};

/// Premium over the base rate for every year up to and including completion.
pub const PRE_COMPLETION_PREMIUM: Rate = dec!(0.05);
/// Reduction of the appreciation rate per year after completion.
pub const ANNUAL_DECAY: Rate = dec!(0.01);
/// Gross rent per month as a fraction of the current property value.
pub const MONTHLY_GROSS_YIELD: Rate = dec!(0.01);
pub const MONTHS_PER_YEAR: u32 = 12;
/// Year-on-year growth factor of maintenance costs after completion.
pub const MAINTENANCE_ESCALATION: Decimal = dec!(1.15);
/// The financed balance is budgeted as this many post-completion instalments.
pub const INSTALMENT_COUNT: u32 = 2;

/// Round a currency amount half-up to the configured precision.
pub fn round_money(value: Money, precision: RoundingPrecision) -> Money {
    value.round_dp_with_strategy(
        precision.decimal_places(),
        RoundingStrategy::MidpointAwayFromZero,
    )
}

/// Round a reported percentage half-up to one decimal place.
pub fn round_percent(value: Percent) -> Percent {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Appreciation rate applied in `year`.
///
/// Up to and including the completion year the base rate carries a premium;
/// afterwards it decays one point per elapsed year and never goes negative.
pub fn appreciation_rate(
    base_rate: Rate,
    year: u32,
    completion_year: u32,
    offset: DecayOffset,
) -> Rate {
    if year <= completion_year {
        return base_rate + PRE_COMPLETION_PREMIUM;
    }

    let elapsed = (year - completion_year).saturating_sub(offset.years());
    (base_rate - ANNUAL_DECAY * Decimal::from(elapsed)).max(Decimal::ZERO)
}

/// Gross rental income for `year`, earned on the already appreciated value.
pub fn rental_income(
    property_value: Money,
    year: u32,
    completion_year: u32,
    precision: RoundingPrecision,
) -> Money {
    if year < completion_year {
        return Decimal::ZERO;
    }
    round_money(
        property_value * MONTHLY_GROSS_YIELD * Decimal::from(MONTHS_PER_YEAR),
        precision,
    )
}

/// Rental agent fee taken from the gross rent.
pub fn management_fee(
    rental_income: Money,
    rate: Option<Rate>,
    precision: RoundingPrecision,
) -> Money {
    match rate {
        Some(rate) => round_money(rental_income * rate, precision),
        None => Decimal::ZERO,
    }
}

/// Maintenance expense for `year`.
///
/// Recomputed from the base cost each year rather than compounded from the
/// previous rounded figure, so the result does not depend on rounding history.
pub fn maintenance_expense(
    base_cost: Money,
    year: u32,
    completion_year: u32,
    precision: RoundingPrecision,
) -> Money {
    if year < completion_year {
        return Decimal::ZERO;
    }
    let years_since_completion = u64::from(year - completion_year);
    round_money(
        base_cost * MAINTENANCE_ESCALATION.powu(years_since_completion),
        precision,
    )
}

/// Instalment paid this year: the fixed cap, or whatever is left if less.
pub fn instalment_payment(instalment: Money, remaining_debt: Money) -> Money {
    if remaining_debt <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    instalment.min(remaining_debt)
}
