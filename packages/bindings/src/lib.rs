use napi::Result as NapiResult;
use napi_derive::napi;

use proforma_core::assumptions::Assumptions;
use proforma_core::migration::migrate_legacy;
use proforma_core::proforma::run_pro_forma;
use proforma_core::scenarios::comparison::compare_scenario as compare;
use proforma_core::validation::validate_assumptions;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse an assumptions document, upgrading legacy layouts on the way in.
fn parse_assumptions(input_json: &str) -> NapiResult<Assumptions> {
    let document: serde_json::Value = serde_json::from_str(input_json).map_err(to_napi_error)?;
    migrate_legacy(document).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_pro_forma(input_json: String, apply_scenario: bool) -> NapiResult<String> {
    let assumptions = parse_assumptions(&input_json)?;
    let output = run_pro_forma(&assumptions, apply_scenario).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_scenario(input_json: String) -> NapiResult<String> {
    let assumptions = parse_assumptions(&input_json)?;
    validate_assumptions(&assumptions).map_err(to_napi_error)?;
    let comparison = compare(&assumptions);
    serde_json::to_string(&comparison).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Assumptions
// ---------------------------------------------------------------------------

#[napi]
pub fn migrate_assumptions(input_json: String) -> NapiResult<String> {
    let assumptions = parse_assumptions(&input_json)?;
    serde_json::to_string(&assumptions).map_err(to_napi_error)
}

#[napi]
pub fn default_assumptions() -> NapiResult<String> {
    serde_json::to_string(&Assumptions::default()).map_err(to_napi_error)
}
