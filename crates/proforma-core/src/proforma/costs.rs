use serde::{Deserialize, Serialize};

use crate::assumptions::Assumptions;
use crate::proforma::scenario::EffectiveValues;
use crate::types::{pct_of, sum_present, Money};

/// Project cost before financing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub land_closing: Option<Money>,
    /// Land price plus closing costs
    pub land_total: Option<Money>,
    pub hard: Option<Money>,
    pub soft: Option<Money>,
    pub contingency: Option<Money>,
    pub subtotal_before_dev_fee: Option<Money>,
    pub dev_fee: Option<Money>,
    pub subtotal_before_financing: Option<Money>,
}

/// Land, hard, soft, contingency and developer fee.
///
/// Each line propagates nulls from its own inputs. The subtotals treat
/// missing lines as zero and are null only when every line is null.
pub fn compute_costs(a: &Assumptions, eff: &EffectiveValues) -> CostBreakdown {
    let hard = match (a.program.saleable_area_sqft, eff.hard_cost_per_sqft) {
        (Some(area), Some(cost)) => Some(area * cost),
        _ => None,
    };
    let soft = pct_of(hard, a.costs.soft_cost_pct_of_hard);

    let contingency_hard = pct_of(hard, a.costs.contingency_pct_of_hard);
    let contingency_soft = pct_of(soft, a.costs.contingency_pct_of_soft);
    let contingency = sum_present(&[contingency_hard, contingency_soft]);

    let land_closing = pct_of(a.acquisition.land_price, a.acquisition.closing_costs_pct);
    let land_total = a
        .acquisition
        .land_price
        .map(|price| price + land_closing.unwrap_or_default());

    let subtotal_before_dev_fee = sum_present(&[land_total, hard, soft, contingency]);
    let dev_fee = pct_of(subtotal_before_dev_fee, a.costs.dev_fee_pct_of_cost);
    let subtotal_before_financing =
        subtotal_before_dev_fee.map(|subtotal| subtotal + dev_fee.unwrap_or_default());

    CostBreakdown {
        land_closing,
        land_total,
        hard,
        soft,
        contingency,
        subtotal_before_dev_fee,
        dev_fee,
        subtotal_before_financing,
    }
}
