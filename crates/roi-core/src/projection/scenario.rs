use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::schedule::{self, INSTALMENT_COUNT};
use crate::error::RoiError;
use crate::types::{Money, Rate};
use crate::RoiResult;

// ---------------------------------------------------------------------------
// Financing split
// ---------------------------------------------------------------------------

/// Share of the acquisition cost paid in cash at purchase.
pub const DEPOSIT_SHARE: Rate = dec!(0.35);
/// Share of the acquisition cost financed by the developer.
pub const FINANCED_SHARE: Rate = dec!(0.65);
/// Nominal budget for the post-completion instalments.
pub const POST_COMPLETION_SHARE: Rate = dec!(0.30);

// ---------------------------------------------------------------------------
// Input bounds
// ---------------------------------------------------------------------------

pub const MIN_PROPERTY_PRICE: Money = dec!(10000);
pub const MAX_PROPERTY_PRICE: Money = dec!(500000);
pub const MAX_APPRECIATION_RATE: Rate = dec!(0.65);
pub const MIN_HOLDING_PERIOD_YEARS: u32 = 1;
pub const MAX_HOLDING_PERIOD_YEARS: u32 = 10;
pub const MIN_MONTHS_TO_COMPLETION: u32 = 1;
pub const MAX_MONTHS_TO_COMPLETION: u32 = 36;
/// Ceiling for the flat maintenance and solicitor amounts.
pub const MAX_FLAT_COST: Money = dec!(500000);

// ---------------------------------------------------------------------------
// Configuration variants
// ---------------------------------------------------------------------------

/// Granularity every currency amount is rounded to, at every step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingPrecision {
    /// Nearest whole currency unit
    #[default]
    WholeUnits,
    /// One decimal place
    OneDecimal,
}

impl RoundingPrecision {
    pub fn decimal_places(self) -> u32 {
        match self {
            RoundingPrecision::WholeUnits => 0,
            RoundingPrecision::OneDecimal => 1,
        }
    }
}

/// Which year the post-completion appreciation decay counts from.
///
/// Both conventions exist in the field. With `FromCompletion` the first year
/// after completion is already one point below the base rate; with
/// `AfterFirstPostCompletionYear` that year runs at the base rate and the
/// decay starts the year after.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecayOffset {
    /// rate = base - 0.01 * (year - completion_year)
    #[default]
    FromCompletion,
    /// rate = base - 0.01 * (year - completion_year - 1)
    AfterFirstPostCompletionYear,
}

impl DecayOffset {
    /// Years subtracted from the elapsed post-completion years before decay.
    pub fn years(self) -> u32 {
        match self {
            DecayOffset::FromCompletion => 0,
            DecayOffset::AfterFirstPostCompletionYear => 1,
        }
    }
}

/// Whether transaction costs are grossed up into the financed purchase price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeTreatment {
    /// Fees, taxes, VAT and solicitor fees are added to the price before the
    /// deposit / financed split.
    #[default]
    RollIntoPrice,
    /// The split is taken on the bare property price.
    Excluded,
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

/// Assumptions for a single projection. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioInput {
    /// Contract price of the unit
    pub property_price: Money,
    /// Base annual appreciation rate before the completion premium / decay
    pub annual_appreciation_rate: Rate,
    /// Number of projection years after purchase
    pub holding_period_years: u32,
    /// Agent / purchase fees as a fraction of price
    #[serde(default)]
    pub purchase_fees_rate: Rate,
    /// Title deed transfer tax as a fraction of price
    #[serde(default)]
    pub transfer_tax_rate: Rate,
    /// VAT as a fraction of price
    #[serde(default)]
    pub vat_rate: Rate,
    /// Maintenance cost in the completion year, before escalation
    #[serde(default)]
    pub annual_maintenance_cost: Money,
    /// Months from purchase until the unit can be let
    pub months_to_completion: u32,
    /// Rental agent fee as a fraction of gross rent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_fees_rate: Option<Rate>,
    /// Flat solicitor fee, rolled into the acquisition cost with the other fees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solicitor_fees: Option<Money>,
    #[serde(default)]
    pub rounding: RoundingPrecision,
    #[serde(default)]
    pub decay_offset: DecayOffset,
    #[serde(default)]
    pub fee_treatment: FeeTreatment,
}

impl ScenarioInput {
    /// Check every field against its documented domain.
    pub fn validate(&self) -> RoiResult<()> {
        if self.property_price < MIN_PROPERTY_PRICE || self.property_price > MAX_PROPERTY_PRICE {
            return Err(RoiError::invalid(
                "property_price",
                format!(
                    "Property price must be between {MIN_PROPERTY_PRICE} and {MAX_PROPERTY_PRICE}"
                ),
            ));
        }

        if self.annual_appreciation_rate < Decimal::ZERO
            || self.annual_appreciation_rate > MAX_APPRECIATION_RATE
        {
            return Err(RoiError::invalid(
                "annual_appreciation_rate",
                format!("Appreciation rate must be between 0 and {MAX_APPRECIATION_RATE}"),
            ));
        }

        if !(MIN_HOLDING_PERIOD_YEARS..=MAX_HOLDING_PERIOD_YEARS)
            .contains(&self.holding_period_years)
        {
            return Err(RoiError::invalid(
                "holding_period_years",
                format!(
                    "Holding period must be between {MIN_HOLDING_PERIOD_YEARS} and \
                     {MAX_HOLDING_PERIOD_YEARS} years"
                ),
            ));
        }

        if !(MIN_MONTHS_TO_COMPLETION..=MAX_MONTHS_TO_COMPLETION)
            .contains(&self.months_to_completion)
        {
            return Err(RoiError::invalid(
                "months_to_completion",
                format!(
                    "Months to completion must be between {MIN_MONTHS_TO_COMPLETION} and \
                     {MAX_MONTHS_TO_COMPLETION}"
                ),
            ));
        }

        validate_fraction("purchase_fees_rate", self.purchase_fees_rate)?;
        validate_fraction("transfer_tax_rate", self.transfer_tax_rate)?;
        validate_fraction("vat_rate", self.vat_rate)?;
        if let Some(rate) = self.management_fees_rate {
            validate_fraction("management_fees_rate", rate)?;
        }

        if self.annual_maintenance_cost < Decimal::ZERO
            || self.annual_maintenance_cost > MAX_FLAT_COST
        {
            return Err(RoiError::invalid(
                "annual_maintenance_cost",
                format!("Maintenance cost must be between 0 and {MAX_FLAT_COST}"),
            ));
        }

        if let Some(fees) = self.solicitor_fees {
            if fees < Decimal::ZERO || fees > MAX_FLAT_COST {
                return Err(RoiError::invalid(
                    "solicitor_fees",
                    format!("Solicitor fees must be between 0 and {MAX_FLAT_COST}"),
                ));
            }
        }

        Ok(())
    }

    /// First projection year in which the unit is complete and can be let.
    pub fn completion_year(&self) -> u32 {
        self.months_to_completion / 12 + 1
    }

    /// Price plus transaction costs, depending on the fee treatment.
    pub fn acquisition_cost(&self) -> Money {
        match self.fee_treatment {
            FeeTreatment::Excluded => self.property_price,
            FeeTreatment::RollIntoPrice => {
                let fee_rate = self.purchase_fees_rate + self.transfer_tax_rate + self.vat_rate;
                self.property_price * (Decimal::ONE + fee_rate)
                    + self.solicitor_fees.unwrap_or(Decimal::ZERO)
            }
        }
    }
}

fn validate_fraction(field: &str, value: Rate) -> RoiResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(RoiError::invalid(field, "Rate must be between 0 and 1"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Derived once per projection
// ---------------------------------------------------------------------------

/// Quantities fixed at purchase, derived from a validated scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Acquisition {
    pub completion_year: u32,
    pub acquisition_cost: Money,
    pub transaction_costs: Money,
    /// Cash due at purchase
    pub initial_investment: Money,
    /// Balance owed to the developer after the deposit
    pub financed_balance: Money,
    /// Budget for the post-completion instalments
    pub post_completion_payment: Money,
    /// Cap on a single annual instalment
    pub instalment: Money,
}

impl Acquisition {
    pub fn from_scenario(input: &ScenarioInput) -> Self {
        let precision = input.rounding;
        let cost = schedule::round_money(input.acquisition_cost(), precision);
        let post_completion_payment = schedule::round_money(cost * POST_COMPLETION_SHARE, precision);

        Acquisition {
            completion_year: input.completion_year(),
            acquisition_cost: cost,
            transaction_costs: cost - input.property_price,
            initial_investment: schedule::round_money(cost * DEPOSIT_SHARE, precision),
            financed_balance: schedule::round_money(cost * FINANCED_SHARE, precision),
            post_completion_payment,
            instalment: schedule::round_money(
                post_completion_payment / Decimal::from(INSTALMENT_COUNT),
                precision,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> ScenarioInput {
        ScenarioInput {
            property_price: dec!(165000),
            annual_appreciation_rate: dec!(0.08),
            holding_period_years: 7,
            purchase_fees_rate: dec!(0.06),
            transfer_tax_rate: dec!(0.06),
            vat_rate: dec!(0.05),
            annual_maintenance_cost: dec!(1000),
            months_to_completion: 30,
            management_fees_rate: None,
            solicitor_fees: None,
            rounding: RoundingPrecision::WholeUnits,
            decay_offset: DecayOffset::FromCompletion,
            fee_treatment: FeeTreatment::RollIntoPrice,
        }
    }

    fn invalid_field(input: &ScenarioInput) -> String {
        match input.validate() {
            Err(RoiError::InvalidInput { field, .. }) => field,
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_sample_is_valid() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_completion_year() {
        let mut input = sample();
        assert_eq!(input.completion_year(), 3);
        input.months_to_completion = 12;
        assert_eq!(input.completion_year(), 2);
        input.months_to_completion = 11;
        assert_eq!(input.completion_year(), 1);
        input.months_to_completion = 36;
        assert_eq!(input.completion_year(), 4);
    }

    #[test]
    fn test_acquisition_without_fees() {
        let mut input = sample();
        input.fee_treatment = FeeTreatment::Excluded;
        let acq = Acquisition::from_scenario(&input);

        assert_eq!(acq.acquisition_cost, dec!(165000));
        assert_eq!(acq.transaction_costs, dec!(0));
        assert_eq!(acq.initial_investment, dec!(57750));
        assert_eq!(acq.financed_balance, dec!(107250));
        assert_eq!(acq.post_completion_payment, dec!(49500));
        assert_eq!(acq.instalment, dec!(24750));
    }

    #[test]
    fn test_acquisition_rolls_fees_into_price() {
        let acq = Acquisition::from_scenario(&sample());

        // 165000 * 1.17 = 193050
        assert_eq!(acq.acquisition_cost, dec!(193050));
        assert_eq!(acq.transaction_costs, dec!(28050));
        // 67567.5 and 125482.5 round half-up
        assert_eq!(acq.initial_investment, dec!(67568));
        assert_eq!(acq.financed_balance, dec!(125483));
        assert_eq!(acq.post_completion_payment, dec!(57915));
        assert_eq!(acq.instalment, dec!(28958));
    }

    #[test]
    fn test_solicitor_fees_added_to_cost() {
        let mut input = sample();
        input.solicitor_fees = Some(dec!(1950));
        assert_eq!(input.acquisition_cost(), dec!(195000));

        input.fee_treatment = FeeTreatment::Excluded;
        assert_eq!(input.acquisition_cost(), dec!(165000));
    }

    #[test]
    fn test_rejects_zero_holding_period() {
        let mut input = sample();
        input.holding_period_years = 0;
        assert_eq!(invalid_field(&input), "holding_period_years");
    }

    #[test]
    fn test_rejects_holding_period_above_ten() {
        let mut input = sample();
        input.holding_period_years = 11;
        assert_eq!(invalid_field(&input), "holding_period_years");
    }

    #[test]
    fn test_rejects_zero_and_negative_price() {
        let mut input = sample();
        input.property_price = dec!(0);
        assert_eq!(invalid_field(&input), "property_price");
        input.property_price = dec!(-165000);
        assert_eq!(invalid_field(&input), "property_price");
        input.property_price = dec!(500001);
        assert_eq!(invalid_field(&input), "property_price");
    }

    #[test]
    fn test_rejects_out_of_range_rates() {
        let mut input = sample();
        input.annual_appreciation_rate = dec!(-0.01);
        assert_eq!(invalid_field(&input), "annual_appreciation_rate");

        let mut input = sample();
        input.annual_appreciation_rate = dec!(0.66);
        assert_eq!(invalid_field(&input), "annual_appreciation_rate");

        let mut input = sample();
        input.vat_rate = dec!(-0.05);
        assert_eq!(invalid_field(&input), "vat_rate");

        let mut input = sample();
        input.management_fees_rate = Some(dec!(1.5));
        assert_eq!(invalid_field(&input), "management_fees_rate");
    }

    #[test]
    fn test_rejects_months_to_completion_bounds() {
        let mut input = sample();
        input.months_to_completion = 0;
        assert_eq!(invalid_field(&input), "months_to_completion");
        input.months_to_completion = 37;
        assert_eq!(invalid_field(&input), "months_to_completion");
    }

    #[test]
    fn test_rejects_negative_costs() {
        let mut input = sample();
        input.annual_maintenance_cost = dec!(-1);
        assert_eq!(invalid_field(&input), "annual_maintenance_cost");

        let mut input = sample();
        input.solicitor_fees = Some(dec!(-100));
        assert_eq!(invalid_field(&input), "solicitor_fees");
    }

    #[test]
    fn test_rejects_flat_costs_above_ceiling() {
        let mut input = sample();
        input.annual_maintenance_cost = Decimal::MAX;
        assert_eq!(invalid_field(&input), "annual_maintenance_cost");

        let mut input = sample();
        input.solicitor_fees = Some(MAX_FLAT_COST + dec!(1));
        assert_eq!(invalid_field(&input), "solicitor_fees");

        let mut input = sample();
        input.annual_maintenance_cost = MAX_FLAT_COST;
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_options_default_when_missing_from_json() {
        let json = r#"{
            "property_price": "165000",
            "annual_appreciation_rate": "0.08",
            "holding_period_years": 7,
            "months_to_completion": 30
        }"#;
        let input: ScenarioInput = serde_json::from_str(json).unwrap();

        assert_eq!(input.rounding, RoundingPrecision::WholeUnits);
        assert_eq!(input.decay_offset, DecayOffset::FromCompletion);
        assert_eq!(input.fee_treatment, FeeTreatment::RollIntoPrice);
        assert_eq!(input.management_fees_rate, None);
        assert_eq!(input.annual_maintenance_cost, dec!(0));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_options_parse_snake_case() {
        let json = r#"{
            "property_price": 165000,
            "annual_appreciation_rate": 0.08,
            "holding_period_years": 7,
            "months_to_completion": 30,
            "rounding": "one_decimal",
            "decay_offset": "after_first_post_completion_year",
            "fee_treatment": "excluded"
        }"#;
        let input: ScenarioInput = serde_json::from_str(json).unwrap();

        assert_eq!(input.rounding, RoundingPrecision::OneDecimal);
        assert_eq!(input.decay_offset, DecayOffset::AfterFirstPostCompletionYear);
        assert_eq!(input.fee_treatment, FeeTreatment::Excluded);
    }
}
