use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::proforma::costs::CostBreakdown;
use crate::proforma::equity::EquityMetrics;
use crate::proforma::financing::FinancingBreakdown;
use crate::proforma::revenue::RevenueBreakdown;
use crate::types::{Money, Pct};

/// Headline returns for one projection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub total_cost: Option<Money>,
    pub profit: Option<Money>,
    /// profit / net revenue
    pub profit_margin_pct: Option<Pct>,
    pub equity_needed_peak: Option<Money>,
    pub equity_invested_total: Option<Money>,
    pub equity_multiple: Option<Decimal>,
    pub equity_irr_pct: Option<Pct>,
    /// profit / equity invested
    pub roi_pct: Option<Pct>,
}

/// Lender fee plus scheduled interest, null if either is.
pub fn compute_total_financing(
    lender_fee: Option<Money>,
    total_interest: Option<Money>,
) -> Option<Money> {
    Some(lender_fee? + total_interest?)
}

/// Combine the breakdowns into cost, profit, margin and returns.
///
/// `financing.total_financing` must already be set.
pub fn compute_totals(
    revenue: &RevenueBreakdown,
    costs: &CostBreakdown,
    financing: &FinancingBreakdown,
    equity: &EquityMetrics,
) -> Totals {
    let total_cost = match (costs.subtotal_before_financing, financing.total_financing) {
        (Some(subtotal), Some(financing)) => Some(subtotal + financing),
        _ => None,
    };

    let profit = match (revenue.net_revenue, total_cost) {
        (Some(net), Some(cost)) => Some(net - cost),
        _ => None,
    };
    let profit_margin_pct = ratio_pct(profit, revenue.net_revenue);
    let roi_pct = ratio_pct(profit, equity.equity_invested_total);

    Totals {
        total_cost,
        profit,
        profit_margin_pct,
        equity_needed_peak: equity.equity_needed_peak,
        equity_invested_total: equity.equity_invested_total,
        equity_multiple: equity.equity_multiple,
        equity_irr_pct: equity.equity_irr_pct,
        roi_pct,
    }
}

/// numerator / denominator x 100, null on a null or zero denominator or
/// when the ratio leaves Decimal range.
fn ratio_pct(numerator: Option<Money>, denominator: Option<Money>) -> Option<Pct> {
    let denominator = denominator.filter(|d| !d.is_zero())?;
    numerator?
        .checked_div(denominator)?
        .checked_mul(Decimal::ONE_HUNDRED)
}
