use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::info;

use roi_core::projection::{
    self, DecayOffset, FeeTreatment, RoundingPrecision, ScenarioInput,
};

use crate::input;

/// Arguments for an ROI projection.
///
/// Flag defaults reproduce the reference scenario: a 165,000 unit bought
/// off-plan 30 months before completion and held for seven years.
#[derive(Args)]
pub struct ProjectArgs {
    /// Path to JSON scenario file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Property price
    #[arg(long, default_value = "165000")]
    pub price: Decimal,

    /// Base annual appreciation rate as a decimal (0.08 = 8%)
    #[arg(long, default_value = "0.08")]
    pub appreciation: Decimal,

    /// Holding period in years
    #[arg(long, default_value_t = 7)]
    pub years: u32,

    /// Purchase fees as a decimal of price
    #[arg(long, default_value = "0.06")]
    pub purchase_fees: Decimal,

    /// Transfer tax as a decimal of price
    #[arg(long, default_value = "0.06")]
    pub transfer_tax: Decimal,

    /// VAT as a decimal of price
    #[arg(long, default_value = "0.05")]
    pub vat: Decimal,

    /// Annual maintenance cost in the completion year
    #[arg(long, default_value = "1000")]
    pub maintenance: Decimal,

    /// Months from purchase to completion
    #[arg(long, default_value_t = 30)]
    pub months_to_completion: u32,

    /// Rental agent fee as a decimal of gross rent
    #[arg(long)]
    pub management_fees: Option<Decimal>,

    /// Flat solicitor fee added to the acquisition cost
    #[arg(long)]
    pub solicitor_fees: Option<Decimal>,

    /// Currency rounding applied at every step
    #[arg(long, default_value = "whole-units")]
    pub rounding: RoundingArg,

    /// Year the post-completion appreciation decay counts from
    #[arg(long, default_value = "from-completion")]
    pub decay_offset: DecayOffsetArg,

    /// Take the deposit / financing split on the bare price instead of price plus fees
    #[arg(long)]
    pub exclude_fees: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoundingArg {
    WholeUnits,
    OneDecimal,
}

impl From<RoundingArg> for RoundingPrecision {
    fn from(arg: RoundingArg) -> Self {
        match arg {
            RoundingArg::WholeUnits => RoundingPrecision::WholeUnits,
            RoundingArg::OneDecimal => RoundingPrecision::OneDecimal,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DecayOffsetArg {
    FromCompletion,
    AfterFirstPostCompletionYear,
}

impl From<DecayOffsetArg> for DecayOffset {
    fn from(arg: DecayOffsetArg) -> Self {
        match arg {
            DecayOffsetArg::FromCompletion => DecayOffset::FromCompletion,
            DecayOffsetArg::AfterFirstPostCompletionYear => {
                DecayOffset::AfterFirstPostCompletionYear
            }
        }
    }
}

impl ProjectArgs {
    fn to_scenario(&self) -> ScenarioInput {
        ScenarioInput {
            property_price: self.price,
            annual_appreciation_rate: self.appreciation,
            holding_period_years: self.years,
            purchase_fees_rate: self.purchase_fees,
            transfer_tax_rate: self.transfer_tax,
            vat_rate: self.vat,
            annual_maintenance_cost: self.maintenance,
            months_to_completion: self.months_to_completion,
            management_fees_rate: self.management_fees,
            solicitor_fees: self.solicitor_fees,
            rounding: self.rounding.into(),
            decay_offset: self.decay_offset.into(),
            fee_treatment: if self.exclude_fees {
                FeeTreatment::Excluded
            } else {
                FeeTreatment::RollIntoPrice
            },
        }
    }
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario: ScenarioInput = match input::load_document(args.input.as_deref())? {
        Some(doc) => doc,
        None => args.to_scenario(),
    };

    let result = projection::project_roi(&scenario)?;
    info!(
        global_roi = %result.result.global_roi,
        global_profit = %result.result.global_profit,
        "projection complete"
    );
    Ok(serde_json::to_value(result)?)
}
