use serde::{Deserialize, Serialize};

use crate::assumptions::Assumptions;
use crate::proforma::costs::CostBreakdown;
use crate::types::{pct_of, Money};

/// Construction loan sizing and cost.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancingBreakdown {
    pub max_loan_amount: Option<Money>,
    pub lender_fee: Option<Money>,
    /// Sum of monthly interest; set once the schedule has run
    pub total_interest: Option<Money>,
    /// Lender fee plus interest; set by the totals step
    pub total_financing: Option<Money>,
}

/// Loan ceiling from loan-to-cost, and the one-time lender fee on it.
pub fn compute_financing(a: &Assumptions, costs: &CostBreakdown) -> FinancingBreakdown {
    let max_loan_amount = pct_of(costs.subtotal_before_financing, a.financing.loan_to_cost_pct);
    let lender_fee = pct_of(max_loan_amount, a.financing.lender_fee_pct);

    FinancingBreakdown {
        max_loan_amount,
        lender_fee,
        total_interest: None,
        total_financing: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_loan_and_fee() {
        let mut a = Assumptions::default();
        a.financing.loan_to_cost_pct = Some(dec!(65));
        a.financing.lender_fee_pct = Some(dec!(1));
        let costs = CostBreakdown {
            subtotal_before_financing: Some(dec!(4000000)),
            ..CostBreakdown::default()
        };
        let f = compute_financing(&a, &costs);
        assert_eq!(f.max_loan_amount, Some(dec!(2600000)));
        assert_eq!(f.lender_fee, Some(dec!(26000)));
        assert_eq!(f.total_interest, None);
        assert_eq!(f.total_financing, None);
    }

    #[test]
    fn test_missing_ltc_nulls_loan_and_fee() {
        let mut a = Assumptions::default();
        a.financing.lender_fee_pct = Some(dec!(1));
        let costs = CostBreakdown {
            subtotal_before_financing: Some(dec!(4000000)),
            ..CostBreakdown::default()
        };
        let f = compute_financing(&a, &costs);
        assert_eq!(f.max_loan_amount, None);
        assert_eq!(f.lender_fee, None);
    }
}
