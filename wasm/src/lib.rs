//! WebAssembly module for the Garment Workshop
//!
//! Provides client-side computation for:
//! - Material-requirement previews over a cached recipe and stock snapshot
//! - Material type listing and validation
//! - Stock lot value calculation

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

pub use shared::models::*;
pub use shared::stock::*;
pub use shared::validation::*;

fn log_error(message: &str) {
    web_sys::console::error_1(&JsValue::from_str(message));
}

fn to_js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    let message = format!("{}: {}", context, err);
    log_error(&message);
    JsValue::from_str(&message)
}

fn parse_formula(formula: &str) -> Result<AvailabilityFormula, String> {
    match formula {
        "" | "received" => Ok(AvailabilityFormula::Received),
        "remaining" => Ok(AvailabilityFormula::Remaining),
        other => Err(format!("unknown availability formula: {}", other)),
    }
}

fn preview(
    recipe_json: &str,
    lots_json: &str,
    count: i64,
    formula: &str,
) -> Result<String, String> {
    let formula = parse_formula(formula)?;
    let lines: Vec<RecipeLine> =
        serde_json::from_str(recipe_json).map_err(|e| format!("Invalid recipe JSON: {}", e))?;
    let lots: Vec<StockLot> =
        serde_json::from_str(lots_json).map_err(|e| format!("Invalid lots JSON: {}", e))?;

    let report = shared::calculate_from_snapshot(lines, &lots, count, formula)
        .map_err(|e| e.to_string())?;
    serde_json::to_string(&report).map_err(|e| e.to_string())
}

/// Compute the requirement report for `count` units from a recipe snapshot
/// and a list of stock lots, both as JSON. Returns the report as JSON.
#[wasm_bindgen]
pub fn calculate_requirements(
    recipe_json: &str,
    lots_json: &str,
    count: i64,
    formula: &str,
) -> Result<String, JsValue> {
    preview(recipe_json, lots_json, count, formula)
        .map_err(|e| to_js_error("Requirement calculation failed", e))
}

/// Wire names of all material types
#[wasm_bindgen]
pub fn material_types() -> js_sys::Array {
    MaterialType::ALL
        .iter()
        .map(|kind| JsValue::from_str(kind.as_str()))
        .collect()
}

#[wasm_bindgen]
pub fn is_valid_material_type(kind: &str) -> bool {
    kind.parse::<MaterialType>().is_ok()
}

/// Total value of a lot (`come_amount * price`), as a decimal string
#[wasm_bindgen]
pub fn lot_total_price(come_amount: &str, price: &str) -> Result<String, JsValue> {
    let come_amount: Decimal = come_amount
        .parse()
        .map_err(|e| to_js_error("Invalid come_amount", e))?;
    let price: Decimal = price.parse().map_err(|e| to_js_error("Invalid price", e))?;
    come_amount
        .checked_mul(price)
        .map(|total| total.to_string())
        .ok_or_else(|| to_js_error("Invalid lot", "total price overflows"))
}
