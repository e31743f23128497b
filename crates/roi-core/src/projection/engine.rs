use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::scenario::{Acquisition, ScenarioInput};
use super::schedule;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::RoiResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One row of the annual ledger. Year 0 is the purchase itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    pub year: u32,
    /// Value at the end of the year, after appreciation
    pub property_value: Money,
    /// Rate applied this year (fraction)
    pub appreciation_rate: Rate,
    pub appreciation_amount: Money,
    /// Gross rent before the management fee
    pub rental_income: Money,
    pub management_fee: Money,
    pub maintenance_expense: Money,
    pub instalment_payment: Money,
    pub net_profit: Money,
    /// Balance still owed at the end of the year
    pub remaining_debt: Money,
}

/// Aggregate row appended after the last projection year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// Final year's property value
    pub property_value: Money,
    pub appreciation_amount: Money,
    pub rental_income: Money,
    pub management_fee: Money,
    pub maintenance_expense: Money,
    pub instalment_payment: Money,
    /// Includes the year-0 deposit outflow
    pub net_profit: Money,
    /// Final year's remaining debt
    pub remaining_debt: Money,
}

/// Full projection: ledger, totals and headline figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub completion_year: u32,
    pub acquisition_cost: Money,
    pub transaction_costs: Money,
    pub initial_investment: Money,
    pub financed_balance: Money,
    /// Years 0 through the end of the holding period
    pub years: Vec<YearRecord>,
    pub totals: SummaryRow,
    /// Deposit plus every instalment paid
    pub cumulative_investment: Money,
    pub global_profit: Money,
    /// Percentage, one decimal place
    pub global_roi: Percent,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Project the annual cash flows and headline ROI of a leveraged off-plan
/// purchase.
///
/// The scenario is validated before any computation; an out-of-domain field
/// yields `RoiError::InvalidInput` and no partial ledger.
pub fn project_roi(input: &ScenarioInput) -> RoiResult<ComputationOutput<ProjectionResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.validate()?;

    let result = compute_projection(input, &mut warnings);

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Leveraged Off-Plan Property ROI Projection",
        input,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Recurrence
// ---------------------------------------------------------------------------

#[derive(Default)]
struct RunningTotals {
    appreciation: Money,
    rental_income: Money,
    management_fee: Money,
    maintenance: Money,
    instalments: Money,
    net_profit: Money,
}

fn compute_projection(input: &ScenarioInput, warnings: &mut Vec<String>) -> ProjectionResult {
    let precision = input.rounding;
    let acq = Acquisition::from_scenario(input);
    let completion_year = acq.completion_year;

    debug!(
        completion_year,
        acquisition_cost = %acq.acquisition_cost,
        initial_investment = %acq.initial_investment,
        financed_balance = %acq.financed_balance,
        "starting projection"
    );

    let opening_value = schedule::round_money(input.property_price, precision);

    let mut years = Vec::with_capacity(input.holding_period_years as usize + 1);
    years.push(YearRecord {
        year: 0,
        property_value: opening_value,
        appreciation_rate: Decimal::ZERO,
        appreciation_amount: Decimal::ZERO,
        rental_income: Decimal::ZERO,
        management_fee: Decimal::ZERO,
        maintenance_expense: Decimal::ZERO,
        instalment_payment: Decimal::ZERO,
        net_profit: -acq.initial_investment,
        remaining_debt: acq.financed_balance,
    });

    let mut totals = RunningTotals {
        net_profit: -acq.initial_investment,
        ..RunningTotals::default()
    };
    let mut property_value = opening_value;
    let mut remaining_debt = acq.financed_balance;
    let mut zero_rate_year: Option<u32> = None;

    for year in 1..=input.holding_period_years {
        let rate = schedule::appreciation_rate(
            input.annual_appreciation_rate,
            year,
            completion_year,
            input.decay_offset,
        );
        if rate.is_zero() && zero_rate_year.is_none() && year > completion_year {
            zero_rate_year = Some(year);
        }

        let appreciation_amount = schedule::round_money(property_value * rate, precision);
        property_value += appreciation_amount;

        let rental_income =
            schedule::rental_income(property_value, year, completion_year, precision);
        let management_fee =
            schedule::management_fee(rental_income, input.management_fees_rate, precision);
        let maintenance_expense = schedule::maintenance_expense(
            input.annual_maintenance_cost,
            year,
            completion_year,
            precision,
        );

        let instalment_payment = schedule::instalment_payment(acq.instalment, remaining_debt);
        remaining_debt = (remaining_debt - instalment_payment).max(Decimal::ZERO);

        let net_profit = schedule::round_money(
            appreciation_amount + rental_income
                - maintenance_expense
                - management_fee
                - instalment_payment,
            precision,
        );

        totals.appreciation += appreciation_amount;
        totals.rental_income += rental_income;
        totals.management_fee += management_fee;
        totals.maintenance += maintenance_expense;
        totals.instalments += instalment_payment;
        totals.net_profit += net_profit;

        debug!(
            year,
            property_value = %property_value,
            rate = %rate,
            net_profit = %net_profit,
            remaining_debt = %remaining_debt,
            "projected year"
        );

        years.push(YearRecord {
            year,
            property_value,
            appreciation_rate: rate,
            appreciation_amount,
            rental_income,
            management_fee,
            maintenance_expense,
            instalment_payment,
            net_profit,
            remaining_debt,
        });
    }

    // --- Warnings for partial horizons ---
    if input.holding_period_years < completion_year {
        warnings.push(format!(
            "Holding period of {} years ends before completion in year {completion_year}; \
             no rental income or maintenance is projected",
            input.holding_period_years
        ));
    }
    if remaining_debt > Decimal::ZERO {
        warnings.push(format!(
            "Financed balance not fully repaid within the holding period: {remaining_debt} outstanding"
        ));
    }
    if let Some(year) = zero_rate_year {
        warnings.push(format!("Appreciation rate decays to 0% from year {year}"));
    }

    let cumulative_investment = acq.initial_investment + totals.instalments;
    let global_profit = totals.net_profit + totals.appreciation;
    let global_roi = global_roi(global_profit, cumulative_investment);

    ProjectionResult {
        completion_year,
        acquisition_cost: acq.acquisition_cost,
        transaction_costs: acq.transaction_costs,
        initial_investment: acq.initial_investment,
        financed_balance: acq.financed_balance,
        years,
        totals: SummaryRow {
            property_value,
            appreciation_amount: totals.appreciation,
            rental_income: totals.rental_income,
            management_fee: totals.management_fee,
            maintenance_expense: totals.maintenance,
            instalment_payment: totals.instalments,
            net_profit: totals.net_profit,
            remaining_debt,
        },
        cumulative_investment,
        global_profit,
        global_roi,
    }
}

/// Profit over cash invested as a percentage; zero investment reports 0.
pub(crate) fn global_roi(profit: Money, investment: Money) -> Percent {
    if investment.is_zero() {
        return Decimal::ZERO;
    }
    schedule::round_percent(profit / investment * dec!(100))
}
