//! Upgrades stored assumption documents written by older schema versions.

use serde_json::{json, Map, Value};

use crate::assumptions::{
    Assumptions, Timeline, DEFAULT_NET_TO_GROSS_PCT, DEFAULT_UNITS_PER_MONTH,
};
use crate::error::ProFormaError;
use crate::ProFormaResult;

/// Share of a legacy single duration given to entitlement, in percent
const LEGACY_ENTITLEMENT_SHARE: u64 = 25;
/// Share given to construction, in percent; sales takes the remainder
const LEGACY_CONSTRUCTION_SHARE: u64 = 60;

/// Bring a stored document up to the current schema and parse it.
///
/// Idempotent: a current document passes through unchanged.
pub fn migrate_legacy(doc: Value) -> ProFormaResult<Assumptions> {
    let upgraded = upgrade_document(doc)?;
    Ok(serde_json::from_value(upgraded)?)
}

/// The JSON-level rewrite behind [`migrate_legacy`].
pub fn upgrade_document(doc: Value) -> ProFormaResult<Value> {
    let Value::Object(mut doc) = doc else {
        return Err(ProFormaError::Serialization(
            "Pro forma assumptions must be a JSON object".into(),
        ));
    };

    split_legacy_duration(&mut doc);

    // revenue -> revenue_sale
    if !doc.contains_key("revenue_sale") {
        if let Some(revenue) = doc.remove("revenue") {
            doc.insert("revenue_sale".into(), revenue);
            doc.insert(
                "revenue_rent".into(),
                json!({ "avg_rent_per_unit_monthly": null, "vacancy_pct": null }),
            );
        }
    }

    if let Some(Value::Object(financing)) = doc.get_mut("financing") {
        financing.remove("interest_coverage_factor");
    }

    insert_if_missing(
        &mut doc,
        "meta",
        json!({ "asset_type": "TOWNHOME", "monetization": "FOR_SALE" }),
    );
    insert_if_missing(
        &mut doc,
        "absorption",
        json!({ "units_per_month": DEFAULT_UNITS_PER_MONTH }),
    );
    if let Some(Value::Object(program)) = doc.get_mut("program") {
        if !program.contains_key("net_to_gross_pct") {
            program.insert("net_to_gross_pct".into(), json!(DEFAULT_NET_TO_GROSS_PCT));
        }
    }
    insert_if_missing(&mut doc, "timeline", serde_json::to_value(Timeline::default())?);
    if let Some(Value::Object(timeline)) = doc.get_mut("timeline") {
        if !timeline.contains_key("auto_calc_sales_months") {
            timeline.insert("auto_calc_sales_months".into(), Value::Bool(true));
        }
    }
    insert_if_missing(
        &mut doc,
        "scenario",
        json!({
            "delta_sale_price_per_sqft_pct": 0,
            "delta_hard_cost_per_sqft_pct": 0,
            "delta_interest_rate_pct": 0,
            "delta_total_months": 0
        }),
    );

    Ok(Value::Object(doc))
}

/// A timeline with only `total_months` becomes three phases split 25/60/15.
fn split_legacy_duration(doc: &mut Map<String, Value>) {
    let Some(Value::Object(timeline)) = doc.get("timeline") else {
        return;
    };
    if timeline.contains_key("phases") {
        return;
    }
    let Some(total) = timeline
        .get("total_months")
        .and_then(Value::as_u64)
        .filter(|t| *t > 0)
    else {
        return;
    };

    let (entitlement, construction, sales) = legacy_phase_split(total);
    doc.insert(
        "timeline".into(),
        json!({
            "phases": {
                "entitlement_months": entitlement,
                "construction_months": construction,
                "sales_lease_months": sales
            },
            "total_months": total,
            "auto_calc_sales_months": false
        }),
    );
}

/// Round-half-up shares of `total`, with sales absorbing the remainder.
fn legacy_phase_split(total: u64) -> (u64, u64, u64) {
    let share = |pct: u64| (total * pct + 50) / 100;
    let entitlement = share(LEGACY_ENTITLEMENT_SHARE);
    let construction = share(LEGACY_CONSTRUCTION_SHARE);
    let sales = total.saturating_sub(entitlement + construction);
    (entitlement, construction, sales)
}

fn insert_if_missing(doc: &mut Map<String, Value>, key: &str, value: Value) {
    if matches!(doc.get(key), None | Some(Value::Null)) {
        doc.insert(key.into(), value);
    }
}
