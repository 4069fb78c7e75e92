use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assumptions::{Assumptions, ScenarioDeltas};
use crate::types::{Money, Pct};

/// Inputs after scenario deltas, recomputed on every run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectiveValues {
    pub sale_price_per_sqft: Option<Money>,
    pub hard_cost_per_sqft: Option<Money>,
    pub interest_rate_pct: Option<Pct>,
    pub total_months: Option<u32>,
    pub entitlement_months: Option<u32>,
    pub construction_months: Option<u32>,
    pub sales_lease_months: Option<u32>,
}

impl EffectiveValues {
    /// (entitlement, construction, sales) when all three are resolved.
    pub fn phase_months(&self) -> Option<(u32, u32, u32)> {
        Some((
            self.entitlement_months?,
            self.construction_months?,
            self.sales_lease_months?,
        ))
    }
}

/// Apply the scenario knobs to the base assumptions.
///
/// With `apply_scenario` false the stored deltas are ignored entirely.
pub fn resolve_effective_values(a: &Assumptions, apply_scenario: bool) -> EffectiveValues {
    let neutral = ScenarioDeltas::default();
    let deltas = if apply_scenario { &a.scenario } else { &neutral };

    let sale_price_per_sqft = a
        .revenue_sale
        .sale_price_per_sqft
        .map(|p| scale_by_pct(p, deltas.delta_sale_price_per_sqft_pct));
    let hard_cost_per_sqft = a
        .costs
        .hard_cost_per_sqft
        .map(|c| scale_by_pct(c, deltas.delta_hard_cost_per_sqft_pct));
    let interest_rate_pct = a
        .financing
        .interest_rate_pct
        .map(|r| (r + deltas.delta_interest_rate_pct).max(Decimal::ZERO));

    let base_sales = auto_sales_months(a).or(a.timeline.phases.sales_lease_months);
    let phases = match (
        a.timeline.phases.entitlement_months,
        a.timeline.phases.construction_months,
        base_sales,
    ) {
        (Some(e), Some(c), Some(s)) => Some(redistribute_months(e, c, s, deltas.delta_total_months)),
        _ => None,
    };

    EffectiveValues {
        sale_price_per_sqft,
        hard_cost_per_sqft,
        interest_rate_pct,
        total_months: phases.map(|(e, c, s)| e + c + s),
        entitlement_months: phases.map(|(e, _, _)| e),
        construction_months: phases.map(|(_, c, _)| c),
        sales_lease_months: phases.map(|(_, _, s)| s),
    }
}

/// `value * (1 + pct/100)`, floored at zero.
fn scale_by_pct(value: Money, pct: Pct) -> Money {
    (value * (Decimal::ONE + pct / Decimal::ONE_HUNDRED)).max(Decimal::ZERO)
}

/// ceil(units / units_per_month) when auto-calculation is on and both are positive.
fn auto_sales_months(a: &Assumptions) -> Option<u32> {
    if !a.timeline.auto_calc_sales_months {
        return None;
    }
    let units = a.program.units.filter(|u| *u > 0)?;
    let pace = a.absorption.units_per_month.filter(|r| *r > Decimal::ZERO)?;
    (Decimal::from(units) / pace).ceil().to_u32()
}

/// Apply a signed month delta to the total and push it back onto the phases.
///
/// Growth goes entirely to the sales phase. Shrinkage eats the back of the
/// schedule first: sales, then construction, then entitlement, each floored
/// at zero. The effective total never drops below one month.
fn redistribute_months(
    entitlement: u32,
    construction: u32,
    sales: u32,
    delta_total_months: i32,
) -> (u32, u32, u32) {
    let base_total = i64::from(entitlement) + i64::from(construction) + i64::from(sales);
    let eff_total = (base_total + i64::from(delta_total_months)).max(1);
    let total_delta = eff_total - base_total;

    if total_delta >= 0 {
        let grown = u32::try_from(i64::from(sales) + total_delta).unwrap_or(u32::MAX);
        return (entitlement, construction, grown);
    }

    let mut remaining = total_delta.unsigned_abs();
    let mut take = |phase: u32| -> u32 {
        let cut = remaining.min(u64::from(phase));
        remaining -= cut;
        phase - cut as u32
    };
    let sales = take(sales);
    let construction = take(construction);
    let entitlement = take(entitlement);

    (entitlement, construction, sales)
}
