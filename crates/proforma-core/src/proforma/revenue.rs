use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assumptions::{Assumptions, Monetization};
use crate::proforma::scenario::EffectiveValues;
use crate::types::{pct_of, Money};

/// Sale revenue before and after commission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueBreakdown {
    pub gross_revenue: Option<Money>,
    pub sales_commission: Option<Money>,
    pub net_revenue: Option<Money>,
}

/// Gross = area x effective price + other revenue; net = gross - commission.
///
/// Only for-sale projects carry revenue; anything else yields nulls.
pub fn compute_revenue(a: &Assumptions, eff: &EffectiveValues) -> RevenueBreakdown {
    if a.meta.monetization != Monetization::ForSale {
        return RevenueBreakdown::default();
    }

    let gross_revenue = match (a.program.saleable_area_sqft, eff.sale_price_per_sqft) {
        (Some(area), Some(price)) => {
            Some(area * price + a.revenue_sale.other_revenue.unwrap_or(Decimal::ZERO))
        }
        _ => None,
    };
    let sales_commission = pct_of(gross_revenue, a.revenue_sale.sales_commission_pct);
    let net_revenue = match (gross_revenue, sales_commission) {
        (Some(gross), Some(commission)) => Some(gross - commission),
        _ => None,
    };

    RevenueBreakdown {
        gross_revenue,
        sales_commission,
        net_revenue,
    }
}
