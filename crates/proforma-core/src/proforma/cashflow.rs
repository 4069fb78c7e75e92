use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::assumptions::Assumptions;
use crate::proforma::costs::CostBreakdown;
use crate::proforma::financing::FinancingBreakdown;
use crate::proforma::scenario::EffectiveValues;
use crate::types::{Money, Pct};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Development phase a month falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Entitlement,
    Construction,
    SalesLease,
}

/// One month of the projection: uses, sources, the equity plug and the
/// closing loan balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCashflowRow {
    /// 1-based
    pub month_index: u32,
    pub phase: Phase,
    // Uses
    pub land: Money,
    pub soft: Money,
    pub hard: Money,
    pub contingency: Money,
    pub dev_fee: Money,
    pub lender_fee: Money,
    pub interest: Money,
    // Sources
    pub sales_revenue: Money,
    pub loan_draw: Money,
    /// uses - sources for the month
    pub equity: Money,
    pub debt_outstanding: Money,
}

impl MonthlyCashflowRow {
    /// Every use of funds in the month, interest included.
    pub fn total_uses(&self) -> Money {
        self.non_interest_uses() + self.interest
    }

    pub fn non_interest_uses(&self) -> Money {
        self.land + self.soft + self.hard + self.contingency + self.dev_fee + self.lender_fee
    }

    pub fn total_sources(&self) -> Money {
        self.sales_revenue + self.loan_draw
    }
}

/// Rows plus notices about costs or revenue the schedule could not place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CashflowSchedule {
    pub rows: Vec<MonthlyCashflowRow>,
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// Schedule plan
// ---------------------------------------------------------------------------

const SOFT_SHARE_ENTITLEMENT: Decimal = dec!(0.6);
const SOFT_SHARE_CONSTRUCTION: Decimal = dec!(0.4);
const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Everything the month-by-month walk needs, resolved once up front.
/// Null cost totals are zero here; they only act as spreading bases.
#[derive(Debug, Clone)]
struct SchedulePlan {
    entitlement: u32,
    construction: u32,
    sales: u32,
    land_total: Money,
    soft_total: Money,
    hard_total: Money,
    contingency_total: Money,
    dev_fee_total: Money,
    lender_fee_total: Money,
    net_revenue: Option<Money>,
    /// (units, units closed per month), both positive
    absorption: Option<(Decimal, Decimal)>,
    subtotal_before_financing: Money,
    max_loan_amount: Option<Money>,
    interest_rate_pct: Option<Pct>,
}

/// Running state carried from one month to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct DrawState {
    debt_outstanding: Money,
    /// Cumulative non-interest uses paid so far
    cost_to_date: Money,
}

impl SchedulePlan {
    fn phase_of(&self, month: u32) -> Phase {
        if month <= self.entitlement {
            Phase::Entitlement
        } else if month <= self.entitlement + self.construction {
            Phase::Construction
        } else {
            Phase::SalesLease
        }
    }

    fn first_half_construction(&self) -> u32 {
        self.construction.div_ceil(2)
    }

    fn soft_for(&self, month: u32, phase: Phase) -> Money {
        match phase {
            Phase::Entitlement if self.entitlement > 0 => {
                self.soft_total * SOFT_SHARE_ENTITLEMENT / Decimal::from(self.entitlement)
            }
            Phase::Construction if self.construction > 0 => {
                let first_half = self.first_half_construction();
                if month - self.entitlement <= first_half {
                    self.soft_total * SOFT_SHARE_CONSTRUCTION / Decimal::from(first_half)
                } else {
                    Decimal::ZERO
                }
            }
            _ => Decimal::ZERO,
        }
    }

    /// Even share of a construction-phase total.
    fn construction_share(&self, total: Money, phase: Phase) -> Money {
        if phase == Phase::Construction && self.construction > 0 {
            total / Decimal::from(self.construction)
        } else {
            Decimal::ZERO
        }
    }

    fn revenue_for(&self, month: u32, phase: Phase) -> Money {
        let net_revenue = match self.net_revenue {
            Some(net) if phase == Phase::SalesLease && self.sales > 0 => net,
            _ => return Decimal::ZERO,
        };

        match self.absorption {
            Some((units, pace)) => {
                let month_in_sales = Decimal::from(month - self.entitlement - self.construction);
                let closed_so_far = ((month_in_sales - Decimal::ONE) * pace).min(units);
                let closing_now = pace.min(units - closed_so_far);
                closing_now * (net_revenue / units)
            }
            None => net_revenue / Decimal::from(self.sales),
        }
    }

    fn loan_draw(&self, state: &DrawState) -> Money {
        match self.max_loan_amount {
            Some(max_loan) if self.subtotal_before_financing > Decimal::ZERO => {
                let earned = state.cost_to_date / self.subtotal_before_financing * max_loan;
                let capacity = earned.min(max_loan);
                (capacity - state.debt_outstanding).max(Decimal::ZERO)
            }
            _ => Decimal::ZERO,
        }
    }

    /// Interest on the average of opening and closing balances.
    fn interest(&self, opening: Money, draw: Money) -> Money {
        match self.interest_rate_pct {
            Some(rate) if rate > Decimal::ZERO => {
                let average = (opening + (opening + draw)) / dec!(2);
                average * (rate / Decimal::ONE_HUNDRED) / MONTHS_PER_YEAR
            }
            _ => Decimal::ZERO,
        }
    }

    /// Project one month from the state at the start of it.
    fn simulate_month(&self, month: u32, state: DrawState) -> (MonthlyCashflowRow, DrawState) {
        let phase = self.phase_of(month);
        let first_month = month == 1;

        let land = if first_month { self.land_total } else { Decimal::ZERO };
        let lender_fee = if first_month {
            self.lender_fee_total
        } else {
            Decimal::ZERO
        };
        let soft = self.soft_for(month, phase);
        let hard = self.construction_share(self.hard_total, phase);
        let contingency = self.construction_share(self.contingency_total, phase);
        let dev_fee = self.construction_share(self.dev_fee_total, phase);
        let sales_revenue = self.revenue_for(month, phase);

        let state = DrawState {
            cost_to_date: state.cost_to_date + land + soft + hard + contingency + dev_fee + lender_fee,
            ..state
        };
        let loan_draw = self.loan_draw(&state);
        let interest = self.interest(state.debt_outstanding, loan_draw);
        let debt_outstanding = state.debt_outstanding + loan_draw;

        let uses = land + soft + hard + contingency + dev_fee + lender_fee + interest;
        let sources = sales_revenue + loan_draw;

        let row = MonthlyCashflowRow {
            month_index: month,
            phase,
            land,
            soft,
            hard,
            contingency,
            dev_fee,
            lender_fee,
            interest,
            sales_revenue,
            loan_draw,
            equity: uses - sources,
            debt_outstanding,
        };
        (
            row,
            DrawState {
                debt_outstanding,
                ..state
            },
        )
    }

    /// Amounts that have no month to land in given the phase lengths.
    fn unscheduled_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.construction == 0 {
            let stranded = self.hard_total
                + self.contingency_total
                + self.dev_fee_total
                + self.soft_total * SOFT_SHARE_CONSTRUCTION;
            if !stranded.is_zero() {
                warnings.push(format!(
                    "Construction phase is 0 months: {} of hard, contingency, developer fee \
                     and construction-phase soft costs is not scheduled in any month",
                    stranded.round_dp(2)
                ));
            }
        }

        if self.entitlement == 0 {
            let stranded = self.soft_total * SOFT_SHARE_ENTITLEMENT;
            if !stranded.is_zero() {
                warnings.push(format!(
                    "Entitlement phase is 0 months: {} of entitlement-phase soft costs is not \
                     scheduled in any month",
                    stranded.round_dp(2)
                ));
            }
        }

        if let Some(net) = self.net_revenue.filter(|n| !n.is_zero()) {
            if self.sales == 0 {
                warnings.push(format!(
                    "Sales phase is 0 months: net revenue of {} is not recognised in any month",
                    net.round_dp(2)
                ));
            } else if let Some((units, pace)) = self.absorption {
                let closable = (pace * Decimal::from(self.sales)).min(units);
                if closable < units {
                    warnings.push(format!(
                        "Absorption of {pace} units/month closes only {closable} of {units} units \
                         in a {}-month sales phase; revenue on the remainder is not recognised",
                        self.sales
                    ));
                }
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Walk months 1..=N spreading costs and revenue by phase, drawing the
/// construction loan against cost incurred and solving the equity plug.
///
/// Returns no rows unless all three phase lengths and the pre-financing
/// subtotal are known.
pub fn generate_monthly_cashflows(
    a: &Assumptions,
    eff: &EffectiveValues,
    costs: &CostBreakdown,
    financing: &FinancingBreakdown,
    net_revenue: Option<Money>,
) -> CashflowSchedule {
    let (Some((entitlement, construction, sales)), Some(subtotal)) =
        (eff.phase_months(), costs.subtotal_before_financing)
    else {
        return CashflowSchedule::default();
    };

    let absorption = match (a.program.units, a.absorption.units_per_month) {
        (Some(units), Some(pace)) if units > 0 && pace > Decimal::ZERO => {
            Some((Decimal::from(units), pace))
        }
        _ => None,
    };

    let plan = SchedulePlan {
        entitlement,
        construction,
        sales,
        land_total: costs.land_total.unwrap_or_default(),
        soft_total: costs.soft.unwrap_or_default(),
        hard_total: costs.hard.unwrap_or_default(),
        contingency_total: costs.contingency.unwrap_or_default(),
        dev_fee_total: costs.dev_fee.unwrap_or_default(),
        lender_fee_total: financing.lender_fee.unwrap_or_default(),
        net_revenue,
        absorption,
        subtotal_before_financing: subtotal,
        max_loan_amount: financing.max_loan_amount,
        interest_rate_pct: eff.interest_rate_pct,
    };

    let total_months = entitlement + construction + sales;
    let rows = (1..=total_months)
        .scan(DrawState::default(), |state, month| {
            let (row, next) = plan.simulate_month(month, *state);
            *state = next;
            Some(row)
        })
        .collect();

    let warnings = plan.unscheduled_warnings();
    for warning in &warnings {
        warn!(%warning, "monthly schedule");
    }

    CashflowSchedule { rows, warnings }
}
