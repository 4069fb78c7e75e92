use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Percentages as entered on the assumptions form (5 = 5%).
pub type Pct = Decimal;

/// Periodic rates expressed as decimals (0.05 = 5%). Used by the IRR solver.
pub type Rate = Decimal;

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Percentage of a nullable base: `base * pct / 100`, null if either side is.
pub fn pct_of(base: Option<Money>, pct: Option<Pct>) -> Option<Money> {
    Some(base? * pct? / Decimal::ONE_HUNDRED)
}

/// Sum of nullable terms where missing terms count as zero, but the sum is
/// null when every term is null.
pub fn sum_present(terms: &[Option<Money>]) -> Option<Money> {
    if terms.iter().all(Option::is_none) {
        return None;
    }
    Some(terms.iter().flatten().copied().sum())
}
