pub mod assumptions;
pub mod error;
pub mod migration;
pub mod proforma;
pub mod scenarios;
pub mod time_value;
pub mod types;
pub mod validation;

#[cfg(feature = "repository")]
pub mod repository;

pub use assumptions::Assumptions;
pub use error::ProFormaError;
pub use proforma::{compute_delta, compute_pro_forma, run_pro_forma, ProFormaOutputs};
pub use types::*;

/// Standard result type for all pro forma operations
pub type ProFormaResult<T> = Result<T, ProFormaError>;
