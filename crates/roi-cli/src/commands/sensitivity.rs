use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use roi_core::projection::ScenarioInput;
use roi_core::scenarios::sensitivity::{self, OutputMetric, SensitivityInput};
use roi_core::SensitivityVariable;

use crate::input;

/// Arguments for a sensitivity sweep
#[derive(Args)]
pub struct SensitivityArgs {
    /// Path to JSON file with the base scenario
    #[arg(long)]
    pub input: String,

    /// First sweep variable in format name:min:max:step
    /// (e.g. "annual_appreciation_rate:0.04:0.12:0.02")
    #[arg(long)]
    pub var1: String,

    /// Second sweep variable (optional, creates a 2D table)
    #[arg(long)]
    pub var2: Option<String>,

    /// Headline figure to tabulate
    #[arg(long, default_value = "global-roi")]
    pub metric: MetricArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MetricArg {
    GlobalRoi,
    GlobalProfit,
    FinalPropertyValue,
}

impl From<MetricArg> for OutputMetric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::GlobalRoi => OutputMetric::GlobalRoi,
            MetricArg::GlobalProfit => OutputMetric::GlobalProfit,
            MetricArg::FinalPropertyValue => OutputMetric::FinalPropertyValue,
        }
    }
}

fn parse_sens_var(definition: &str) -> Result<SensitivityVariable, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = definition.split(':').collect();
    if parts.len() != 4 {
        return Err(format!(
            "Sensitivity variable must be name:min:max:step, got '{}'",
            definition
        )
        .into());
    }
    Ok(SensitivityVariable {
        name: parts[0].to_string(),
        min: parts[1].parse::<Decimal>()?,
        max: parts[2].parse::<Decimal>()?,
        step: parts[3].parse::<Decimal>()?,
    })
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let base: ScenarioInput = input::file::read_json(&args.input)?;

    let sweep = SensitivityInput {
        base,
        variable_1: parse_sens_var(&args.var1)?,
        variable_2: args.var2.as_deref().map(parse_sens_var).transpose()?,
        output_metric: args.metric.into(),
    };

    let result = sensitivity::run_sensitivity(&sweep)?;
    Ok(serde_json::to_value(result)?)
}
