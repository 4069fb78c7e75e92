use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::assumptions::{Assumptions, ScenarioKnob};
use crate::error::ProFormaError;
use crate::ProFormaResult;

const MAX_UNITS: u32 = 50_000;
const MAX_SALEABLE_AREA_SQFT: Decimal = dec!(5000000);
const MAX_PHASE_MONTHS: u32 = 120;
const MAX_TOTAL_MONTHS: u32 = 240;
const MIN_UNITS_PER_MONTH: Decimal = dec!(0.1);
const MAX_UNITS_PER_MONTH: Decimal = dec!(500);
/// Ceiling for lump-sum money inputs; keeps every derived sum far inside Decimal range
const MAX_MONEY: Decimal = dec!(1000000000000);
const MAX_PER_SQFT: Decimal = dec!(1000000);
const MAX_MONTHLY_RENT: Decimal = dec!(10000000);

/// Range checks applied at the boundary before assumptions reach the engine.
///
/// The engine itself only cares about null-ness; anything out of range here
/// is a caller error, not a projection edge case.
pub fn validate_assumptions(a: &Assumptions) -> ProFormaResult<()> {
    // --- Program ---
    if let Some(units) = a.program.units {
        if !(1..=MAX_UNITS).contains(&units) {
            return Err(invalid(
                "program.units",
                format!("Unit count must be between 1 and {MAX_UNITS}"),
            ));
        }
    }
    check_range(
        "program.saleable_area_sqft",
        a.program.saleable_area_sqft,
        Decimal::ONE,
        MAX_SALEABLE_AREA_SQFT,
    )?;
    check_range(
        "program.net_to_gross_pct",
        a.program.net_to_gross_pct,
        dec!(30),
        dec!(95),
    )?;

    // --- Money ---
    check_range(
        "acquisition.land_price",
        a.acquisition.land_price,
        Decimal::ZERO,
        MAX_MONEY,
    )?;
    check_range(
        "revenue_sale.sale_price_per_sqft",
        a.revenue_sale.sale_price_per_sqft,
        Decimal::ZERO,
        MAX_PER_SQFT,
    )?;
    check_range(
        "revenue_sale.other_revenue",
        a.revenue_sale.other_revenue,
        -MAX_MONEY,
        MAX_MONEY,
    )?;
    check_range(
        "revenue_rent.avg_rent_per_unit_monthly",
        a.revenue_rent.avg_rent_per_unit_monthly,
        Decimal::ZERO,
        MAX_MONTHLY_RENT,
    )?;
    check_range(
        "costs.hard_cost_per_sqft",
        a.costs.hard_cost_per_sqft,
        Decimal::ZERO,
        MAX_PER_SQFT,
    )?;

    // --- Percentages ---
    let pcts = [
        ("acquisition.closing_costs_pct", a.acquisition.closing_costs_pct),
        ("revenue_sale.sales_commission_pct", a.revenue_sale.sales_commission_pct),
        ("revenue_rent.vacancy_pct", a.revenue_rent.vacancy_pct),
        ("costs.soft_cost_pct_of_hard", a.costs.soft_cost_pct_of_hard),
        ("costs.contingency_pct_of_hard", a.costs.contingency_pct_of_hard),
        ("costs.contingency_pct_of_soft", a.costs.contingency_pct_of_soft),
        ("costs.dev_fee_pct_of_cost", a.costs.dev_fee_pct_of_cost),
        ("financing.loan_to_cost_pct", a.financing.loan_to_cost_pct),
        ("financing.interest_rate_pct", a.financing.interest_rate_pct),
        ("financing.lender_fee_pct", a.financing.lender_fee_pct),
    ];
    for (field, value) in pcts {
        check_range(field, value, Decimal::ZERO, Decimal::ONE_HUNDRED)?;
    }

    // --- Timeline ---
    let phases = [
        ("timeline.phases.entitlement_months", a.timeline.phases.entitlement_months),
        ("timeline.phases.construction_months", a.timeline.phases.construction_months),
        ("timeline.phases.sales_lease_months", a.timeline.phases.sales_lease_months),
    ];
    for (field, months) in phases {
        if matches!(months, Some(m) if m > MAX_PHASE_MONTHS) {
            return Err(invalid(
                field,
                format!("Phase duration cannot exceed {MAX_PHASE_MONTHS} months"),
            ));
        }
    }
    if let Some(total) = a.timeline.total_months {
        if !(1..=MAX_TOTAL_MONTHS).contains(&total) {
            return Err(invalid(
                "timeline.total_months",
                format!("Total duration must be between 1 and {MAX_TOTAL_MONTHS} months"),
            ));
        }
    }

    check_range(
        "absorption.units_per_month",
        a.absorption.units_per_month,
        MIN_UNITS_PER_MONTH,
        MAX_UNITS_PER_MONTH,
    )?;

    // --- Scenario sliders ---
    for knob in ScenarioKnob::ALL {
        let range = knob.range();
        let value = knob.get(&a.scenario);
        if !range.contains(value) {
            return Err(invalid(
                knob.field_name(),
                format!("Scenario delta must be between {} and {}", range.min, range.max),
            ));
        }
    }

    Ok(())
}

fn check_range(
    field: &str,
    value: Option<Decimal>,
    min: Decimal,
    max: Decimal,
) -> ProFormaResult<()> {
    match value {
        Some(v) if v < min || v > max => Err(invalid(
            field,
            format!("Value {v} must be between {min} and {max}"),
        )),
        _ => Ok(()),
    }
}

fn invalid(field: &str, reason: String) -> ProFormaError {
    ProFormaError::InvalidInput {
        field: field.into(),
        reason,
    }
}
