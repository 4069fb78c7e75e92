use clap::Args;
use serde_json::Value;

use proforma_core::proforma::run_pro_forma;

use crate::input;

/// Arguments for a pro forma run
#[derive(Args)]
pub struct ComputeArgs {
    /// Path to a JSON or YAML assumptions file (stdin if omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Apply the document's scenario deltas
    #[arg(long)]
    pub apply_scenario: bool,
}

pub fn run_compute(args: ComputeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let assumptions = input::read_assumptions(args.input.as_deref())?;
    let result = run_pro_forma(&assumptions, args.apply_scenario)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_monthly(args: ComputeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let assumptions = input::read_assumptions(args.input.as_deref())?;
    let result = run_pro_forma(&assumptions, args.apply_scenario)?;
    Ok(serde_json::to_value(result.result.monthly.rows)?)
}
