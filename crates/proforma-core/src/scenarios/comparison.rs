use serde::{Deserialize, Serialize};

use crate::assumptions::Assumptions;
use crate::proforma::{compute_delta, compute_pro_forma, ProFormaOutputs};
use crate::types::{Money, Pct};

/// Scenario minus base for the headline numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDeltasOutput {
    pub profit_delta: Option<Money>,
    /// Percentage points
    pub profit_margin_delta_pct: Option<Pct>,
    pub equity_needed_delta: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub base: ProFormaOutputs,
    pub scenario: ProFormaOutputs,
    pub deltas: ScenarioDeltasOutput,
}

/// Run the same assumptions without and with their scenario deltas.
pub fn compare_scenario(a: &Assumptions) -> ScenarioComparison {
    let base = compute_pro_forma(a, false);
    let scenario = compute_pro_forma(a, true);

    let deltas = ScenarioDeltasOutput {
        profit_delta: compute_delta(base.totals.profit, scenario.totals.profit),
        profit_margin_delta_pct: compute_delta(
            base.totals.profit_margin_pct,
            scenario.totals.profit_margin_pct,
        ),
        equity_needed_delta: compute_delta(
            base.totals.equity_needed_peak,
            scenario.totals.equity_needed_peak,
        ),
    };

    ScenarioComparison {
        base,
        scenario,
        deltas,
    }
}
