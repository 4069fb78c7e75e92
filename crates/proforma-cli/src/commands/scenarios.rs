use clap::{Args, ValueEnum};
use serde_json::Value;
use std::time::Instant;

use proforma_core::assumptions::ScenarioKnob;
use proforma_core::scenarios::comparison::compare_scenario;
use proforma_core::scenarios::sensitivity::sweep_scenario;
use proforma_core::types::with_metadata;
use proforma_core::validation::validate_assumptions;

use crate::commands::assumptions::InputArgs;
use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KnobArg {
    SalePrice,
    HardCost,
    InterestRate,
    TotalMonths,
}

impl From<KnobArg> for ScenarioKnob {
    fn from(knob: KnobArg) -> Self {
        match knob {
            KnobArg::SalePrice => ScenarioKnob::SalePrice,
            KnobArg::HardCost => ScenarioKnob::HardCost,
            KnobArg::InterestRate => ScenarioKnob::InterestRate,
            KnobArg::TotalMonths => ScenarioKnob::TotalMonths,
        }
    }
}

/// Arguments for a one-knob scenario sweep
#[derive(Args)]
pub struct SweepArgs {
    /// Path to a JSON or YAML assumptions file (stdin if omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Scenario knob to sweep across its slider range
    #[arg(long, value_enum)]
    pub knob: KnobArg,
}

pub fn run_compare(args: InputArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let assumptions = input::read_assumptions(args.input.as_deref())?;
    validate_assumptions(&assumptions)?;

    let comparison = compare_scenario(&assumptions);
    let mut warnings = comparison.base.warnings.clone();
    warnings.extend(
        comparison
            .scenario
            .warnings
            .iter()
            .map(|w| format!("scenario: {w}")),
    );

    let elapsed = start.elapsed().as_micros() as u64;
    let result = with_metadata(
        "Development Pro Forma (Base vs Scenario)",
        &assumptions,
        warnings,
        elapsed,
        comparison,
    );
    Ok(serde_json::to_value(result)?)
}

pub fn run_sweep(args: SweepArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let assumptions = input::read_assumptions(args.input.as_deref())?;
    let result = sweep_scenario(&assumptions, args.knob.into())?;
    Ok(serde_json::to_value(result)?)
}
