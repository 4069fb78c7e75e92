use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::proforma::cashflow::MonthlyCashflowRow;
use crate::time_value::{annualize_monthly, irr};
use crate::types::{Money, Pct};

/// Monthly IRR starting point
const MONTHLY_IRR_GUESS: Decimal = dec!(0.01);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquityMetrics {
    /// Sum of the magnitudes of negative monthly equity
    pub equity_invested_total: Option<Money>,
    /// Deepest point of the running equity balance
    pub equity_needed_peak: Option<Money>,
    pub equity_multiple: Option<Decimal>,
    /// Annualised, in percent
    pub equity_irr_pct: Option<Pct>,
}

/// Aggregate the monthly equity series, in month order.
pub fn compute_equity_metrics(rows: &[MonthlyCashflowRow]) -> EquityMetrics {
    if rows.is_empty() {
        return EquityMetrics::default();
    }

    let series: Vec<Money> = rows.iter().map(|row| row.equity).collect();

    let invested: Money = series
        .iter()
        .filter(|cf| **cf < Decimal::ZERO)
        .map(|cf| cf.abs())
        .sum();
    let returned: Money = series.iter().filter(|cf| **cf > Decimal::ZERO).sum();

    let mut cumulative = Decimal::ZERO;
    let mut peak = Decimal::ZERO;
    for cf in &series {
        cumulative += cf;
        peak = peak.min(cumulative);
    }

    let equity_invested_total = Some(invested).filter(|v| *v > Decimal::ZERO);
    let equity_multiple = equity_invested_total.and_then(|total| returned.checked_div(total));

    EquityMetrics {
        equity_invested_total,
        equity_needed_peak: Some(peak.abs()).filter(|v| *v > Decimal::ZERO),
        equity_multiple,
        equity_irr_pct: equity_irr_pct(&series),
    }
}

/// Annualised IRR of a monthly series as a percentage.
///
/// Null unless the series has both a negative and a positive flow, and null
/// when the solver does not converge.
pub fn equity_irr_pct(series: &[Money]) -> Option<Pct> {
    let has_negative = series.iter().any(|cf| *cf < Decimal::ZERO);
    let has_positive = series.iter().any(|cf| *cf > Decimal::ZERO);
    if !has_negative || !has_positive {
        return None;
    }

    let monthly = match irr(series, MONTHLY_IRR_GUESS) {
        Ok(rate) => rate,
        Err(e) => {
            warn!(error = %e, months = series.len(), "equity IRR unavailable");
            return None;
        }
    };

    annualize_monthly(monthly).map(|annual| annual * Decimal::ONE_HUNDRED)
}
