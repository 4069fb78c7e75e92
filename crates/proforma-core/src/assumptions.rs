use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Pct};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Built form of the project. Informational only; no formula branches on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    #[default]
    Townhome,
    Multifamily,
}

/// How the finished product is monetised. Only `ForSale` is projected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Monetization {
    #[default]
    ForSale,
    ForRent,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub asset_type: AssetType,
    pub monetization: Monetization,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub units: Option<u32>,
    /// Saleable / gross floor area in square feet
    #[serde(default)]
    pub saleable_area_sqft: Option<Decimal>,
    /// Carried for multifamily modelling; not used by the projection
    #[serde(default)]
    pub net_to_gross_pct: Option<Pct>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Acquisition {
    #[serde(default)]
    pub land_price: Option<Money>,
    /// Legal, transfer taxes etc. as % of land price
    #[serde(default)]
    pub closing_costs_pct: Option<Pct>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueSale {
    #[serde(default)]
    pub sale_price_per_sqft: Option<Money>,
    /// Parking, storage and other flat revenue
    #[serde(default)]
    pub other_revenue: Option<Money>,
    #[serde(default)]
    pub sales_commission_pct: Option<Pct>,
}

/// Rental placeholder fields. Stored and validated, never projected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueRent {
    #[serde(default)]
    pub avg_rent_per_unit_monthly: Option<Money>,
    #[serde(default)]
    pub vacancy_pct: Option<Pct>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Costs {
    #[serde(default)]
    pub hard_cost_per_sqft: Option<Money>,
    #[serde(default)]
    pub soft_cost_pct_of_hard: Option<Pct>,
    #[serde(default)]
    pub contingency_pct_of_hard: Option<Pct>,
    #[serde(default)]
    pub contingency_pct_of_soft: Option<Pct>,
    /// % of land + hard + soft + contingency
    #[serde(default)]
    pub dev_fee_pct_of_cost: Option<Pct>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Financing {
    #[serde(default)]
    pub loan_to_cost_pct: Option<Pct>,
    /// Annual rate in percent
    #[serde(default)]
    pub interest_rate_pct: Option<Pct>,
    /// One-time fee as % of the maximum loan
    #[serde(default)]
    pub lender_fee_pct: Option<Pct>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Phases {
    #[serde(default)]
    pub entitlement_months: Option<u32>,
    #[serde(default)]
    pub construction_months: Option<u32>,
    #[serde(default)]
    pub sales_lease_months: Option<u32>,
}

impl Phases {
    /// Sum of the three phases, null unless all three are known.
    pub fn total(&self) -> Option<u32> {
        Some(self.entitlement_months? + self.construction_months? + self.sales_lease_months?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub phases: Phases,
    /// Derived from the phases on save
    #[serde(default)]
    pub total_months: Option<u32>,
    /// Derive the sales phase from units / absorption
    #[serde(default = "default_true")]
    pub auto_calc_sales_months: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Absorption {
    #[serde(default)]
    pub units_per_month: Option<Decimal>,
}

/// What-if knobs. Always present; zero means no change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDeltas {
    #[serde(default)]
    pub delta_sale_price_per_sqft_pct: Pct,
    #[serde(default)]
    pub delta_hard_cost_per_sqft_pct: Pct,
    /// Absolute percentage points
    #[serde(default)]
    pub delta_interest_rate_pct: Pct,
    /// Signed months applied to the total and redistributed to phases
    #[serde(default)]
    pub delta_total_months: i32,
}

/// Full set of project assumptions feeding one projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assumptions {
    pub meta: Meta,
    pub program: Program,
    pub acquisition: Acquisition,
    pub revenue_sale: RevenueSale,
    #[serde(default)]
    pub revenue_rent: RevenueRent,
    pub costs: Costs,
    pub financing: Financing,
    pub timeline: Timeline,
    pub absorption: Absorption,
    #[serde(default)]
    pub scenario: ScenarioDeltas,
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_ENTITLEMENT_MONTHS: u32 = 6;
pub const DEFAULT_CONSTRUCTION_MONTHS: u32 = 18;
pub const DEFAULT_SALES_LEASE_MONTHS: u32 = 6;
pub const DEFAULT_UNITS_PER_MONTH: Decimal = dec!(4);
pub const DEFAULT_NET_TO_GROSS_PCT: Decimal = dec!(80);

impl Default for Timeline {
    fn default() -> Self {
        Timeline {
            phases: Phases {
                entitlement_months: Some(DEFAULT_ENTITLEMENT_MONTHS),
                construction_months: Some(DEFAULT_CONSTRUCTION_MONTHS),
                sales_lease_months: Some(DEFAULT_SALES_LEASE_MONTHS),
            },
            total_months: Some(
                DEFAULT_ENTITLEMENT_MONTHS + DEFAULT_CONSTRUCTION_MONTHS + DEFAULT_SALES_LEASE_MONTHS,
            ),
            auto_calc_sales_months: true,
        }
    }
}

/// A fresh project: every monetary field unknown, a 6/18/6 month timeline,
/// sales months derived from a 4 units/month absorption, no scenario deltas.
impl Default for Assumptions {
    fn default() -> Self {
        Assumptions {
            meta: Meta::default(),
            program: Program {
                units: None,
                saleable_area_sqft: None,
                net_to_gross_pct: Some(DEFAULT_NET_TO_GROSS_PCT),
            },
            acquisition: Acquisition::default(),
            revenue_sale: RevenueSale::default(),
            revenue_rent: RevenueRent::default(),
            costs: Costs::default(),
            financing: Financing::default(),
            timeline: Timeline::default(),
            absorption: Absorption {
                units_per_month: Some(DEFAULT_UNITS_PER_MONTH),
            },
            scenario: ScenarioDeltas::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Scenario slider ranges
// ---------------------------------------------------------------------------

/// One of the four what-if knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKnob {
    SalePrice,
    HardCost,
    InterestRate,
    TotalMonths,
}

impl ScenarioKnob {
    pub const ALL: [ScenarioKnob; 4] = [
        ScenarioKnob::SalePrice,
        ScenarioKnob::HardCost,
        ScenarioKnob::InterestRate,
        ScenarioKnob::TotalMonths,
    ];

    pub fn field_name(self) -> &'static str {
        match self {
            ScenarioKnob::SalePrice => "scenario.delta_sale_price_per_sqft_pct",
            ScenarioKnob::HardCost => "scenario.delta_hard_cost_per_sqft_pct",
            ScenarioKnob::InterestRate => "scenario.delta_interest_rate_pct",
            ScenarioKnob::TotalMonths => "scenario.delta_total_months",
        }
    }

    /// Recommended slider range for this knob.
    pub fn range(self) -> KnobRange {
        match self {
            ScenarioKnob::SalePrice | ScenarioKnob::HardCost => KnobRange {
                min: dec!(-10),
                max: dec!(10),
                step: dec!(1),
            },
            ScenarioKnob::InterestRate => KnobRange {
                min: dec!(-2),
                max: dec!(2),
                step: dec!(0.1),
            },
            ScenarioKnob::TotalMonths => KnobRange {
                min: dec!(-6),
                max: dec!(6),
                step: dec!(1),
            },
        }
    }

    /// Current value of this knob in a set of deltas.
    pub fn get(self, deltas: &ScenarioDeltas) -> Decimal {
        match self {
            ScenarioKnob::SalePrice => deltas.delta_sale_price_per_sqft_pct,
            ScenarioKnob::HardCost => deltas.delta_hard_cost_per_sqft_pct,
            ScenarioKnob::InterestRate => deltas.delta_interest_rate_pct,
            ScenarioKnob::TotalMonths => Decimal::from(deltas.delta_total_months),
        }
    }

    /// Set this knob. Month deltas are truncated to whole months.
    pub fn set(self, deltas: &mut ScenarioDeltas, value: Decimal) {
        match self {
            ScenarioKnob::SalePrice => deltas.delta_sale_price_per_sqft_pct = value,
            ScenarioKnob::HardCost => deltas.delta_hard_cost_per_sqft_pct = value,
            ScenarioKnob::InterestRate => deltas.delta_interest_rate_pct = value,
            ScenarioKnob::TotalMonths => {
                deltas.delta_total_months = value.trunc().to_i32().unwrap_or(0)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KnobRange {
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
}

impl KnobRange {
    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min && value <= self.max
    }

    /// Every slider stop from min to max inclusive.
    pub fn steps(&self) -> Vec<Decimal> {
        let mut values = Vec::new();
        let mut current = self.min;
        while current <= self.max {
            values.push(current);
            current += self.step;
        }
        values
    }
}
