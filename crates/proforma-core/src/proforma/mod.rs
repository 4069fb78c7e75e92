//! Development pro forma: scenario-adjusted inputs, cost and revenue stacks,
//! a monthly cashflow schedule with a construction loan, and equity returns.

pub mod cashflow;
pub mod costs;
pub mod equity;
pub mod financing;
pub mod revenue;
pub mod scenario;
pub mod totals;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::assumptions::{Assumptions, Monetization};
use crate::types::{with_metadata, ComputationOutput};
use crate::validation::validate_assumptions;
use crate::ProFormaResult;

use self::cashflow::{generate_monthly_cashflows, MonthlyCashflowRow};
use self::costs::{compute_costs, CostBreakdown};
use self::equity::compute_equity_metrics;
use self::financing::{compute_financing, FinancingBreakdown};
use self::revenue::{compute_revenue, RevenueBreakdown};
use self::scenario::{resolve_effective_values, EffectiveValues};
use self::totals::{compute_total_financing, compute_totals, Totals};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCashflows {
    pub rows: Vec<MonthlyCashflowRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProFormaFlags {
    /// False for monetization modes the engine does not project
    pub monetization_supported: bool,
}

/// Everything one projection produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProFormaOutputs {
    pub eff: EffectiveValues,
    pub revenue: RevenueBreakdown,
    pub costs: CostBreakdown,
    pub financing: FinancingBreakdown,
    pub totals: Totals,
    pub monthly: MonthlyCashflows,
    pub flags: ProFormaFlags,
    /// Schedule notices; never change any number
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl ProFormaOutputs {
    /// Null-filled placeholder for monetization modes that are not projected.
    pub fn unsupported() -> Self {
        ProFormaOutputs::default()
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Project a set of assumptions, optionally with their scenario deltas.
///
/// Pure: the same inputs always give the same outputs, nothing is shared
/// between calls, and missing inputs surface as nulls rather than errors.
pub fn compute_pro_forma(a: &Assumptions, apply_scenario: bool) -> ProFormaOutputs {
    if a.meta.monetization != Monetization::ForSale {
        debug!(monetization = ?a.meta.monetization, "monetization not projected");
        return ProFormaOutputs::unsupported();
    }

    let eff = resolve_effective_values(a, apply_scenario);
    let revenue = compute_revenue(a, &eff);
    let costs = compute_costs(a, &eff);
    let mut financing = compute_financing(a, &costs);

    let schedule = generate_monthly_cashflows(a, &eff, &costs, &financing, revenue.net_revenue);

    financing.total_interest = Some(schedule.rows.iter().map(|row| row.interest).sum());
    financing.total_financing = compute_total_financing(financing.lender_fee, financing.total_interest);

    let equity = compute_equity_metrics(&schedule.rows);
    let totals = compute_totals(&revenue, &costs, &financing, &equity);

    debug!(
        apply_scenario,
        months = schedule.rows.len(),
        profit = ?totals.profit,
        irr_pct = ?totals.equity_irr_pct,
        "pro forma computed"
    );

    ProFormaOutputs {
        eff,
        revenue,
        costs,
        financing,
        totals,
        monthly: MonthlyCashflows {
            rows: schedule.rows,
        },
        flags: ProFormaFlags {
            monetization_supported: true,
        },
        warnings: schedule.warnings,
    }
}

/// Validate, project and wrap the result in the standard output envelope.
pub fn run_pro_forma(
    a: &Assumptions,
    apply_scenario: bool,
) -> ProFormaResult<ComputationOutput<ProFormaOutputs>> {
    let start = Instant::now();
    validate_assumptions(a)?;

    let output = compute_pro_forma(a, apply_scenario);
    let mut warnings = output.warnings.clone();
    if !output.flags.monetization_supported {
        warnings.push(format!(
            "Monetization {:?} is not projected; all outputs are null",
            a.meta.monetization
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        if apply_scenario {
            "Development Pro Forma (Monthly Cashflow, Scenario Applied)"
        } else {
            "Development Pro Forma (Monthly Cashflow, Base Case)"
        },
        a,
        warnings,
        elapsed,
        output,
    ))
}

/// `scenario - base`, null if either side is.
pub fn compute_delta(base: Option<Decimal>, scenario: Option<Decimal>) -> Option<Decimal> {
    Some(scenario? - base?)
}
