use clap::Args;
use serde_json::{json, Value};

use proforma_core::assumptions::{Assumptions, ScenarioKnob};
use proforma_core::migration::migrate_legacy;
use proforma_core::validation::validate_assumptions;

use crate::input;

/// Arguments for commands that only need an assumptions document
#[derive(Args)]
pub struct InputArgs {
    /// Path to a JSON or YAML assumptions file (stdin if omitted)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for upgrading a stored document
#[derive(Args)]
pub struct MigrateArgs {
    /// Path to a legacy JSON or YAML assumptions file (stdin if omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Also run the range checks on the upgraded document
    #[arg(long)]
    pub validate: bool,
}

pub fn run_validate(args: InputArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let assumptions = input::read_assumptions(args.input.as_deref())?;
    validate_assumptions(&assumptions)?;
    Ok(json!({ "valid": true }))
}

pub fn run_migrate(args: MigrateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let document = input::read_document(args.input.as_deref())?;
    let assumptions = migrate_legacy(document)?;
    if args.validate {
        validate_assumptions(&assumptions)?;
    }
    Ok(serde_json::to_value(assumptions)?)
}

pub fn run_defaults() -> Result<Value, Box<dyn std::error::Error>> {
    let mut ranges = serde_json::Map::new();
    for knob in ScenarioKnob::ALL {
        ranges.insert(knob.field_name().to_string(), serde_json::to_value(knob.range())?);
    }

    Ok(json!({
        "assumptions": Assumptions::default(),
        "scenario_ranges": ranges,
    }))
}
