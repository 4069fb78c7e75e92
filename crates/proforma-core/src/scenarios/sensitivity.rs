use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::assumptions::{Assumptions, ScenarioKnob};
use crate::proforma::compute_pro_forma;
use crate::types::*;
use crate::validation::validate_assumptions;
use crate::ProFormaResult;

/// Headline metrics at one knob setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub value: Decimal,
    pub profit: Option<Money>,
    pub profit_margin_pct: Option<Pct>,
    pub equity_needed_peak: Option<Money>,
    pub equity_irr_pct: Option<Pct>,
    pub roi_pct: Option<Pct>,
}

/// Output of a one-knob scenario sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepOutput {
    pub knob: ScenarioKnob,
    pub field: String,
    pub values: Vec<Decimal>,
    pub points: Vec<SweepPoint>,
    /// Index of the step closest to the stored delta
    pub base_case_position: usize,
}

/// Find the closest index to a target value in a sorted list.
fn closest_index(values: &[Decimal], target: Decimal) -> usize {
    values
        .iter()
        .enumerate()
        .min_by_key(|(_, v)| (**v - target).abs())
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Step one scenario knob across its slider range, holding the other deltas
/// at their stored values, and project the scenario at every stop.
pub fn sweep_scenario(
    a: &Assumptions,
    knob: ScenarioKnob,
) -> ProFormaResult<ComputationOutput<SweepOutput>> {
    let start = Instant::now();
    validate_assumptions(a)?;
    let mut warnings: Vec<String> = Vec::new();

    let range = knob.range();
    let values = range.steps();

    let mut points = Vec::with_capacity(values.len());
    for value in &values {
        let mut stepped = a.clone();
        knob.set(&mut stepped.scenario, *value);
        let out = compute_pro_forma(&stepped, true);
        if out.totals.profit.is_none() {
            warnings.push(format!("Profit unavailable at {} = {value}", knob.field_name()));
        }
        points.push(SweepPoint {
            value: *value,
            profit: out.totals.profit,
            profit_margin_pct: out.totals.profit_margin_pct,
            equity_needed_peak: out.totals.equity_needed_peak,
            equity_irr_pct: out.totals.equity_irr_pct,
            roi_pct: out.totals.roi_pct,
        });
    }

    let base_case_position = closest_index(&values, knob.get(&a.scenario));

    let output = SweepOutput {
        knob,
        field: knob.field_name().to_string(),
        values,
        points,
        base_case_position,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Scenario Sensitivity Sweep",
        &serde_json::json!({
            "knob": knob,
            "min": range.min,
            "max": range.max,
            "step": range.step,
            "scenario": a.scenario,
        }),
        warnings,
        elapsed,
        output,
    ))
}
