use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::warn;

use crate::error::RoiError;
use crate::projection::{project_roi, ProjectionResult, ScenarioInput};
use crate::types::*;
use crate::RoiResult;

/// Largest number of values a single sweep variable may expand to.
pub const MAX_SWEEP_POINTS: usize = 101;

/// Headline figure read off each re-run projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMetric {
    #[default]
    GlobalRoi,
    GlobalProfit,
    FinalPropertyValue,
}

impl OutputMetric {
    fn read(self, result: &ProjectionResult) -> Decimal {
        match self {
            OutputMetric::GlobalRoi => result.global_roi,
            OutputMetric::GlobalProfit => result.global_profit,
            OutputMetric::FinalPropertyValue => result.totals.property_value,
        }
    }
}

/// Scenario fields a sensitivity variable may sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioField {
    PropertyPrice,
    AnnualAppreciationRate,
    HoldingPeriodYears,
    MonthsToCompletion,
    AnnualMaintenanceCost,
    ManagementFeesRate,
}

impl ScenarioField {
    pub fn parse(name: &str) -> RoiResult<Self> {
        match name {
            "property_price" => Ok(ScenarioField::PropertyPrice),
            "annual_appreciation_rate" => Ok(ScenarioField::AnnualAppreciationRate),
            "holding_period_years" => Ok(ScenarioField::HoldingPeriodYears),
            "months_to_completion" => Ok(ScenarioField::MonthsToCompletion),
            "annual_maintenance_cost" => Ok(ScenarioField::AnnualMaintenanceCost),
            "management_fees_rate" => Ok(ScenarioField::ManagementFeesRate),
            other => Err(RoiError::InvalidInput {
                field: format!("variable:{other}"),
                reason: "Not a sweepable scenario field".into(),
            }),
        }
    }

    fn read(self, input: &ScenarioInput) -> Decimal {
        match self {
            ScenarioField::PropertyPrice => input.property_price,
            ScenarioField::AnnualAppreciationRate => input.annual_appreciation_rate,
            ScenarioField::HoldingPeriodYears => Decimal::from(input.holding_period_years),
            ScenarioField::MonthsToCompletion => Decimal::from(input.months_to_completion),
            ScenarioField::AnnualMaintenanceCost => input.annual_maintenance_cost,
            ScenarioField::ManagementFeesRate => {
                input.management_fees_rate.unwrap_or(Decimal::ZERO)
            }
        }
    }

    fn apply(self, input: &mut ScenarioInput, value: Decimal) -> RoiResult<()> {
        match self {
            ScenarioField::PropertyPrice => input.property_price = value,
            ScenarioField::AnnualAppreciationRate => input.annual_appreciation_rate = value,
            ScenarioField::HoldingPeriodYears => {
                input.holding_period_years = whole_number("holding_period_years", value)?
            }
            ScenarioField::MonthsToCompletion => {
                input.months_to_completion = whole_number("months_to_completion", value)?
            }
            ScenarioField::AnnualMaintenanceCost => input.annual_maintenance_cost = value,
            ScenarioField::ManagementFeesRate => input.management_fees_rate = Some(value),
        }
        Ok(())
    }
}

fn whole_number(field: &str, value: Decimal) -> RoiResult<u32> {
    if !value.fract().is_zero() {
        return Err(RoiError::InvalidInput {
            field: field.into(),
            reason: format!("{value} is not a whole number"),
        });
    }
    value.to_u32().ok_or_else(|| RoiError::InvalidInput {
        field: field.into(),
        reason: format!("{value} is out of range"),
    })
}

/// Input for a one- or two-way sensitivity sweep around a base scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityInput {
    /// Base case scenario
    pub base: ScenarioInput,
    /// First variable to sweep (rows)
    pub variable_1: SensitivityVariable,
    /// Optional second variable to sweep (columns)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_2: Option<SensitivityVariable>,
    #[serde(default)]
    pub output_metric: OutputMetric,
}

/// Output of a sensitivity sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityOutput {
    pub variable_1_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_2_name: Option<String>,
    pub variable_1_values: Vec<Decimal>,
    /// Empty for a one-way sweep
    pub variable_2_values: Vec<Decimal>,
    pub output_metric: OutputMetric,
    /// Matrix[i][j] = output when variable_1 = variable_1_values[i], variable_2 = variable_2_values[j].
    /// One-way sweeps have a single column.
    pub matrix: Vec<Vec<Decimal>>,
    /// Output of the unmodified base scenario
    pub base_case_value: Decimal,
    /// Grid point closest to the base scenario (row, col)
    pub base_case_position: (usize, usize),
}

/// Generate the sweep values for a sensitivity variable from min to max with step.
fn generate_sweep_values(var: &SensitivityVariable) -> RoiResult<Vec<Decimal>> {
    if var.step <= Decimal::ZERO {
        return Err(RoiError::InvalidInput {
            field: format!("variable:{}", var.name),
            reason: "Step must be positive".into(),
        });
    }
    if var.min > var.max {
        return Err(RoiError::InvalidInput {
            field: format!("variable:{}", var.name),
            reason: "Min must be <= max".into(),
        });
    }

    let too_many = || RoiError::InvalidInput {
        field: format!("variable:{}", var.name),
        reason: format!("Sweep must produce at most {MAX_SWEEP_POINTS} values"),
    };
    let steps = var
        .max
        .checked_sub(var.min)
        .and_then(|span| span.checked_div(var.step))
        .ok_or_else(too_many)?;
    if steps.ceil() >= Decimal::from(MAX_SWEEP_POINTS) {
        return Err(too_many());
    }

    let mut values = Vec::with_capacity(MAX_SWEEP_POINTS);
    let mut current = var.min;
    while current <= var.max {
        values.push(current);
        match current.checked_add(var.step) {
            Some(next) => current = next,
            None => break,
        }
    }
    if let Some(&last) = values.last() {
        if last < var.max {
            values.push(var.max);
        }
    }

    Ok(values)
}

/// Find the closest index to a target value.
fn closest_index(values: &[Decimal], target: Decimal) -> usize {
    values
        .iter()
        .enumerate()
        .min_by_key(|(_, v)| (**v - target).abs())
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Re-run the projection at every grid point and collect the chosen metric.
///
/// Grid points whose scenario fails validation are reported as warnings and
/// recorded as zero; only a malformed sweep definition is an error.
pub fn run_sensitivity(
    input: &SensitivityInput,
) -> RoiResult<ComputationOutput<SensitivityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let field_1 = ScenarioField::parse(&input.variable_1.name)?;
    let field_2 = input
        .variable_2
        .as_ref()
        .map(|v| ScenarioField::parse(&v.name))
        .transpose()?;
    if field_2 == Some(field_1) {
        return Err(RoiError::InvalidInput {
            field: "variable_2".into(),
            reason: "Second variable must differ from the first".into(),
        });
    }

    let base_case_value = input.output_metric.read(&project_roi(&input.base)?.result);

    let v1_values = generate_sweep_values(&input.variable_1)?;
    let v2_values = match &input.variable_2 {
        Some(var) => generate_sweep_values(var)?,
        None => Vec::new(),
    };

    let evaluate = |v1: Decimal, v2: Option<Decimal>| -> RoiResult<Decimal> {
        let mut scenario = input.base.clone();
        field_1.apply(&mut scenario, v1)?;
        if let (Some(field), Some(value)) = (field_2, v2) {
            field.apply(&mut scenario, value)?;
        }
        Ok(input.output_metric.read(&project_roi(&scenario)?.result))
    };

    let columns: Vec<Option<Decimal>> = if v2_values.is_empty() {
        vec![None]
    } else {
        v2_values.iter().copied().map(Some).collect()
    };

    let mut matrix = Vec::with_capacity(v1_values.len());
    for v1 in &v1_values {
        let mut row = Vec::with_capacity(columns.len());
        for v2 in &columns {
            match evaluate(*v1, *v2) {
                Ok(val) => row.push(val),
                Err(e) => {
                    let point = match v2 {
                        Some(v2) => format!("({v1}, {v2})"),
                        None => format!("({v1})"),
                    };
                    warn!(%point, error = %e, "sensitivity grid point skipped");
                    warnings.push(format!("Evaluation failed at {point}: {e}"));
                    row.push(Decimal::ZERO);
                }
            }
        }
        matrix.push(row);
    }

    let base_row = closest_index(&v1_values, field_1.read(&input.base));
    let base_col = field_2
        .map(|f| closest_index(&v2_values, f.read(&input.base)))
        .unwrap_or(0);

    let output = SensitivityOutput {
        variable_1_name: input.variable_1.name.clone(),
        variable_2_name: input.variable_2.as_ref().map(|v| v.name.clone()),
        variable_1_values: v1_values,
        variable_2_values: v2_values,
        output_metric: input.output_metric,
        matrix,
        base_case_value,
        base_case_position: (base_row, base_col),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "ROI Projection Sensitivity Sweep",
        &serde_json::json!({
            "variable_1": input.variable_1.name,
            "variable_2": input.variable_2.as_ref().map(|v| &v.name),
            "output_metric": input.output_metric,
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{DecayOffset, FeeTreatment, RoundingPrecision};
    use rust_decimal_macros::dec;

    fn base_scenario() -> ScenarioInput {
        ScenarioInput {
            property_price: dec!(165000),
            annual_appreciation_rate: dec!(0.08),
            holding_period_years: 7,
            purchase_fees_rate: dec!(0),
            transfer_tax_rate: dec!(0),
            vat_rate: dec!(0),
            annual_maintenance_cost: dec!(1000),
            months_to_completion: 30,
            management_fees_rate: None,
            solicitor_fees: None,
            rounding: RoundingPrecision::WholeUnits,
            decay_offset: DecayOffset::FromCompletion,
            fee_treatment: FeeTreatment::RollIntoPrice,
        }
    }

    fn variable(name: &str, min: Decimal, max: Decimal, step: Decimal) -> SensitivityVariable {
        SensitivityVariable {
            name: name.into(),
            min,
            max,
            step,
        }
    }

    #[test]
    fn test_one_way_appreciation_sweep() {
        let input = SensitivityInput {
            base: base_scenario(),
            variable_1: variable("annual_appreciation_rate", dec!(0.06), dec!(0.10), dec!(0.02)),
            variable_2: None,
            output_metric: OutputMetric::GlobalRoi,
        };
        let result = run_sensitivity(&input).unwrap();
        let out = &result.result;

        assert_eq!(out.variable_1_values, vec![dec!(0.06), dec!(0.08), dec!(0.10)]);
        assert!(out.variable_2_values.is_empty());
        assert_eq!(out.matrix.len(), 3);
        assert!(out.matrix.iter().all(|row| row.len() == 1));

        // Higher growth => higher ROI
        assert!(out.matrix[0][0] < out.matrix[1][0]);
        assert!(out.matrix[1][0] < out.matrix[2][0]);

        assert_eq!(out.base_case_value, dec!(150.9));
        assert_eq!(out.base_case_position, (1, 0));
        assert_eq!(out.matrix[1][0], out.base_case_value);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_two_way_grid_dimensions() {
        let input = SensitivityInput {
            base: base_scenario(),
            variable_1: variable("holding_period_years", dec!(5), dec!(7), dec!(1)),
            variable_2: Some(variable("months_to_completion", dec!(12), dec!(36), dec!(12))),
            output_metric: OutputMetric::FinalPropertyValue,
        };
        let result = run_sensitivity(&input).unwrap();
        let out = &result.result;

        assert_eq!(out.matrix.len(), 3);
        assert_eq!(out.matrix[0].len(), 3);
        // Longer holds never lower the final value
        for col in 0..3 {
            assert!(out.matrix[0][col] <= out.matrix[1][col]);
            assert!(out.matrix[1][col] <= out.matrix[2][col]);
        }
        // Base: 7 years, 30 months; 24 and 36 tie, the first one wins
        assert_eq!(out.base_case_position, (2, 1));
        assert_eq!(out.base_case_value, dec!(294873));
    }

    #[test]
    fn test_invalid_grid_points_become_warnings() {
        let input = SensitivityInput {
            base: base_scenario(),
            variable_1: variable("holding_period_years", dec!(9), dec!(12), dec!(1)),
            variable_2: None,
            output_metric: OutputMetric::GlobalProfit,
        };
        let result = run_sensitivity(&input).unwrap();
        let out = &result.result;

        assert_eq!(out.matrix.len(), 4);
        assert!(out.matrix[0][0] > Decimal::ZERO);
        assert_eq!(out.matrix[2][0], Decimal::ZERO);
        assert_eq!(out.matrix[3][0], Decimal::ZERO);
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn test_fractional_holding_period_is_rejected_per_point() {
        let input = SensitivityInput {
            base: base_scenario(),
            variable_1: variable("holding_period_years", dec!(5), dec!(6), dec!(0.5)),
            variable_2: None,
            output_metric: OutputMetric::GlobalRoi,
        };
        let result = run_sensitivity(&input).unwrap();
        assert_eq!(result.result.matrix.len(), 3);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("not a whole number"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let input = SensitivityInput {
            base: base_scenario(),
            variable_1: variable("language", dec!(0), dec!(1), dec!(1)),
            variable_2: None,
            output_metric: OutputMetric::GlobalRoi,
        };
        assert!(matches!(
            run_sensitivity(&input),
            Err(RoiError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_same_field_twice_rejected() {
        let var = variable("property_price", dec!(100000), dec!(200000), dec!(50000));
        let input = SensitivityInput {
            base: base_scenario(),
            variable_1: var.clone(),
            variable_2: Some(var),
            output_metric: OutputMetric::GlobalRoi,
        };
        assert!(run_sensitivity(&input).is_err());
    }

    #[test]
    fn test_invalid_base_scenario_is_error() {
        let mut base = base_scenario();
        base.holding_period_years = 0;
        let input = SensitivityInput {
            base,
            variable_1: variable("annual_appreciation_rate", dec!(0.06), dec!(0.10), dec!(0.02)),
            variable_2: None,
            output_metric: OutputMetric::GlobalRoi,
        };
        assert!(run_sensitivity(&input).is_err());
    }

    #[test]
    fn test_sweep_with_non_exact_step() {
        let vals = generate_sweep_values(&variable("test", dec!(0), dec!(1), dec!(0.3))).unwrap();
        // 0, 0.3, 0.6, 0.9, 1.0 (max appended)
        assert_eq!(vals.len(), 5);
        assert_eq!(*vals.last().unwrap(), dec!(1));
    }

    #[test]
    fn test_sweep_near_decimal_max_stops_without_overflow() {
        let min = Decimal::MAX - dec!(10000000000000000000000000000);
        let step = dec!(30000000000000000000000000000);
        let vals = generate_sweep_values(&variable("edge", min, Decimal::MAX, step)).unwrap();
        assert_eq!(vals, vec![min, Decimal::MAX]);

        let input = SensitivityInput {
            base: base_scenario(),
            variable_1: variable("annual_maintenance_cost", min, Decimal::MAX, step),
            variable_2: None,
            output_metric: OutputMetric::GlobalRoi,
        };
        let result = run_sensitivity(&input).unwrap();
        assert_eq!(result.result.matrix, vec![vec![Decimal::ZERO], vec![Decimal::ZERO]]);
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn test_sweep_point_count_is_capped() {
        let fine = variable("property_price", dec!(10000), dec!(500000), dec!(0.0001));
        assert!(matches!(
            generate_sweep_values(&fine),
            Err(RoiError::InvalidInput { .. })
        ));

        // Span overflows before the step is considered
        let wide = variable("property_price", Decimal::MIN, Decimal::MAX, dec!(1));
        assert!(generate_sweep_values(&wide).is_err());

        // Exactly at the cap is allowed, one more step is not
        let at_cap = variable("property_price", dec!(0), dec!(100), dec!(1));
        assert_eq!(generate_sweep_values(&at_cap).unwrap().len(), MAX_SWEEP_POINTS);
        let over_cap = variable("property_price", dec!(0), dec!(101), dec!(1));
        assert!(generate_sweep_values(&over_cap).is_err());

        let input = SensitivityInput {
            base: base_scenario(),
            variable_1: fine,
            variable_2: None,
            output_metric: OutputMetric::GlobalRoi,
        };
        assert!(run_sensitivity(&input).is_err());
    }

    #[test]
    fn test_invalid_step() {
        assert!(generate_sweep_values(&variable("bad", dec!(0), dec!(1), dec!(0))).is_err());
        assert!(generate_sweep_values(&variable("bad", dec!(2), dec!(1), dec!(1))).is_err());
    }
}
