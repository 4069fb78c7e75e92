use pretty_assertions::assert_eq;
use proforma_core::assumptions::{Assumptions, Monetization};
use proforma_core::proforma::cashflow::Phase;
use proforma_core::scenarios::comparison::compare_scenario;
use proforma_core::{compute_pro_forma, run_pro_forma};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn townhomes() -> Assumptions {
    let mut a = Assumptions::default();
    a.program.units = Some(20);
    a.program.saleable_area_sqft = Some(dec!(20000));
    a.acquisition.land_price = Some(dec!(1000000));
    a.acquisition.closing_costs_pct = Some(dec!(2));
    a.revenue_sale.sale_price_per_sqft = Some(dec!(400));
    a.revenue_sale.sales_commission_pct = Some(dec!(5));
    a.costs.hard_cost_per_sqft = Some(dec!(150));
    a.costs.soft_cost_pct_of_hard = Some(dec!(20));
    a.financing.loan_to_cost_pct = Some(dec!(65));
    a.financing.interest_rate_pct = Some(dec!(8));
    a.financing.lender_fee_pct = Some(dec!(1));
    a.timeline.phases.entitlement_months = Some(6);
    a.timeline.phases.construction_months = Some(18);
    a.timeline.phases.sales_lease_months = Some(6);
    a.absorption.units_per_month = Some(dec!(4));
    a.timeline.auto_calc_sales_months = false;
    a
}

fn close(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() < dec!(0.0001)
}

// ===========================================================================
// End-to-end projection
// ===========================================================================

#[test]
fn test_townhome_projection() {
    let out = compute_pro_forma(&townhomes(), false);

    assert!(out.flags.monetization_supported);
    assert_eq!(out.revenue.gross_revenue, Some(dec!(8000000)));
    assert_eq!(out.revenue.net_revenue, Some(dec!(7600000)));
    assert_eq!(out.costs.subtotal_before_financing, Some(dec!(4620000)));
    assert_eq!(out.financing.max_loan_amount, Some(dec!(3003000)));
    assert_eq!(out.financing.lender_fee, Some(dec!(30030)));

    let rows = &out.monthly.rows;
    assert_eq!(rows.len(), 30);
    assert_eq!(rows[0].land, dec!(1020000));
    assert_eq!(rows[0].phase, Phase::Entitlement);
    assert_eq!(rows[29].phase, Phase::SalesLease);

    assert!(out.totals.profit.is_some());
    assert!(out.totals.equity_irr_pct.is_some());
    assert!(out.warnings.is_empty());
}

#[test]
fn test_totals_identities() {
    let out = compute_pro_forma(&townhomes(), false);
    let rows = &out.monthly.rows;

    let interest: Decimal = rows.iter().map(|r| r.interest).sum();
    assert_eq!(out.financing.total_interest, Some(interest));
    assert!(close(out.financing.total_financing.unwrap(), dec!(30030) + interest));

    let total_cost = out.totals.total_cost.unwrap();
    let subtotal = out.costs.subtotal_before_financing.unwrap();
    let lender_fee = out.financing.lender_fee.unwrap();
    assert_eq!(total_cost, subtotal + (lender_fee + interest));
    assert!(close(total_cost, dec!(4620000) + dec!(30030) + interest));
    assert_eq!(out.totals.profit, Some(dec!(7600000) - total_cost));

    let margin = out.totals.profit.unwrap() / dec!(7600000) * dec!(100);
    assert!(close(out.totals.profit_margin_pct.unwrap(), margin));
}

#[test]
fn test_schedule_places_every_dollar() {
    let out = compute_pro_forma(&townhomes(), false);
    let rows = &out.monthly.rows;

    let hard: Decimal = rows.iter().map(|r| r.hard).sum();
    let soft: Decimal = rows.iter().map(|r| r.soft).sum();
    let revenue: Decimal = rows.iter().map(|r| r.sales_revenue).sum();
    let non_interest: Decimal = rows.iter().map(|r| r.non_interest_uses()).sum();

    assert!(close(hard, dec!(3000000)));
    assert!(close(soft, dec!(600000)));
    assert!(close(revenue, dec!(7600000)));
    assert!(close(non_interest, dec!(4620000) + dec!(30030)));
}

#[test]
fn test_equity_plug_and_debt_path() {
    let out = compute_pro_forma(&townhomes(), false);
    let rows = &out.monthly.rows;

    for row in rows {
        assert!(close(row.equity, row.total_uses() - row.total_sources()));
    }
    for pair in rows.windows(2) {
        assert!(pair[1].debt_outstanding >= pair[0].debt_outstanding);
    }
    let draws: Decimal = rows.iter().map(|r| r.loan_draw).sum();
    assert!(close(draws, dec!(3003000)));
    assert!(close(rows[29].debt_outstanding, dec!(3003000)));
}

// ===========================================================================
// Determinism and scenarios
// ===========================================================================

#[test]
fn test_projection_is_idempotent() {
    let a = townhomes();
    assert_eq!(compute_pro_forma(&a, true), compute_pro_forma(&a, true));
}

#[test]
fn test_zero_deltas_are_neutral() {
    let a = townhomes();
    assert_eq!(compute_pro_forma(&a, true), compute_pro_forma(&a, false));
}

#[test]
fn test_unapplied_deltas_are_ignored() {
    let base = compute_pro_forma(&townhomes(), false);

    let mut a = townhomes();
    a.scenario.delta_sale_price_per_sqft_pct = dec!(-10);
    a.scenario.delta_hard_cost_per_sqft_pct = dec!(10);
    a.scenario.delta_interest_rate_pct = dec!(2);
    a.scenario.delta_total_months = -6;
    assert_eq!(compute_pro_forma(&a, false), base);
}

#[test]
fn test_shorter_schedule_reduces_interest() {
    let mut a = townhomes();
    a.scenario.delta_total_months = -2;
    let cmp = compare_scenario(&a);

    assert_eq!(cmp.scenario.eff.sales_lease_months, Some(4));
    assert_eq!(cmp.scenario.monthly.rows.len(), 28);
    assert!(
        cmp.scenario.financing.total_interest.unwrap() <= cmp.base.financing.total_interest.unwrap()
    );
    // Sales closing at 4 units/month cannot finish 20 units in 4 months
    assert_eq!(cmp.scenario.warnings.len(), 1);
}

// ===========================================================================
// Missing data and unsupported modes
// ===========================================================================

#[test]
fn test_missing_price_nulls_profit_only() {
    let mut a = townhomes();
    a.revenue_sale.sale_price_per_sqft = None;
    let out = compute_pro_forma(&a, false);

    assert_eq!(out.revenue.net_revenue, None);
    assert_eq!(out.totals.profit, None);
    assert_eq!(out.totals.profit_margin_pct, None);
    assert_eq!(out.totals.roi_pct, None);
    assert!(out.totals.total_cost.is_some());
    assert_eq!(out.monthly.rows.len(), 30);
    assert!(out.monthly.rows.iter().all(|r| r.sales_revenue.is_zero()));
}

#[test]
fn test_missing_area_nulls_cost_chain() {
    let mut a = townhomes();
    a.program.saleable_area_sqft = None;
    let out = compute_pro_forma(&a, false);

    assert_eq!(out.costs.hard, None);
    assert_eq!(out.costs.soft, None);
    assert_eq!(out.costs.contingency, None);
    assert_eq!(out.revenue.gross_revenue, None);
    // Land alone still carries the subtotal
    assert_eq!(out.costs.subtotal_before_financing, Some(dec!(1020000)));
}

#[test]
fn test_missing_land_keeps_subtotal() {
    let mut a = townhomes();
    a.acquisition.land_price = None;
    let out = compute_pro_forma(&a, false);

    assert_eq!(out.costs.land_total, None);
    assert_eq!(out.costs.subtotal_before_financing, Some(dec!(3600000)));
    assert_eq!(out.monthly.rows[0].land, Decimal::ZERO);
}

#[test]
fn test_missing_lender_fee_nulls_cost_not_interest() {
    let mut a = townhomes();
    a.financing.lender_fee_pct = None;
    let out = compute_pro_forma(&a, false);

    let interest: Decimal = out.monthly.rows.iter().map(|r| r.interest).sum();
    assert!(interest > Decimal::ZERO);
    assert_eq!(out.financing.total_interest, Some(interest));
    assert_eq!(out.financing.total_financing, None);
    assert_eq!(out.totals.total_cost, None);
    assert_eq!(out.totals.profit, None);
    assert_eq!(out.totals.profit_margin_pct, None);
    assert_eq!(out.totals.roi_pct, None);
}

#[test]
fn test_zero_lender_fee_keeps_interest_in_cost() {
    let mut a = townhomes();
    a.financing.lender_fee_pct = Some(Decimal::ZERO);
    let out = compute_pro_forma(&a, false);

    let interest = out.financing.total_interest.unwrap();
    let subtotal = out.costs.subtotal_before_financing.unwrap();
    assert!(interest > Decimal::ZERO);
    assert_eq!(out.totals.total_cost, Some(subtotal + (Decimal::ZERO + interest)));
}

#[test]
fn test_zero_rate_reports_zero_interest() {
    let mut a = townhomes();
    a.financing.interest_rate_pct = Some(Decimal::ZERO);
    let out = compute_pro_forma(&a, false);

    assert_eq!(out.financing.total_interest, Some(Decimal::ZERO));
    assert!(out.totals.total_cost.is_some());
}

#[test]
fn test_oversized_costs_are_rejected_not_computed() {
    let mut a = townhomes();
    a.program.saleable_area_sqft = Some(dec!(5000000));
    a.costs.hard_cost_per_sqft = Some(dec!(100000000000000000000000));

    let result = std::panic::catch_unwind(|| run_pro_forma(&a, false));
    let err = result.expect("run_pro_forma must not panic").unwrap_err();
    assert!(err.to_string().contains("costs.hard_cost_per_sqft"));
}

#[test]
fn test_largest_accepted_inputs_compute() {
    let mut a = townhomes();
    a.program.units = Some(50_000);
    a.program.saleable_area_sqft = Some(dec!(5000000));
    a.acquisition.land_price = Some(dec!(1000000000000));
    a.acquisition.closing_costs_pct = Some(dec!(100));
    a.revenue_sale.sale_price_per_sqft = Some(dec!(1000000));
    a.revenue_sale.other_revenue = Some(dec!(1000000000000));
    a.costs.hard_cost_per_sqft = Some(dec!(1000000));
    a.costs.soft_cost_pct_of_hard = Some(dec!(100));
    a.costs.contingency_pct_of_hard = Some(dec!(100));
    a.costs.contingency_pct_of_soft = Some(dec!(100));
    a.costs.dev_fee_pct_of_cost = Some(dec!(100));
    a.financing.loan_to_cost_pct = Some(dec!(100));
    a.financing.interest_rate_pct = Some(dec!(100));
    a.financing.lender_fee_pct = Some(dec!(100));
    a.timeline.phases.entitlement_months = Some(80);
    a.timeline.phases.construction_months = Some(80);
    a.timeline.phases.sales_lease_months = Some(80);
    a.timeline.total_months = Some(240);
    a.scenario.delta_sale_price_per_sqft_pct = dec!(10);
    a.scenario.delta_hard_cost_per_sqft_pct = dec!(10);
    a.scenario.delta_interest_rate_pct = dec!(2);

    let out = run_pro_forma(&a, true).unwrap();
    assert_eq!(out.result.monthly.rows.len(), 240);
    assert!(out.result.totals.total_cost.is_some());
    assert!(out.result.totals.profit.is_some());
}

#[test]
fn test_rental_is_flagged_placeholder() {
    let mut a = townhomes();
    a.meta.monetization = Monetization::ForRent;
    let out = compute_pro_forma(&a, false);

    assert!(!out.flags.monetization_supported);
    assert!(out.monthly.rows.is_empty());
    assert_eq!(out.totals.profit, None);
    assert_eq!(out.costs.subtotal_before_financing, None);
}

#[test]
fn test_envelope_serializes_snake_case() {
    let out = run_pro_forma(&townhomes(), false).unwrap();
    let json = serde_json::to_value(&out).unwrap();

    assert_eq!(json["result"]["monthly"]["rows"][0]["phase"], "ENTITLEMENT");
    assert_eq!(json["result"]["flags"]["monetization_supported"], true);
    assert_eq!(json["assumptions"]["meta"]["monetization"], "FOR_SALE");
    assert!(json["result"]["totals"]["profit"].is_string());
}
