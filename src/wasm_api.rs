use crate::json;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Analyse a hand.
///
/// # Arguments
/// * `request` - JSON object: `{"tiles": [...], "discarded_tiles": [...], "indicator": {...}}`
///
/// # Returns
/// JSON string with the analysis, or `{"error": ...}`
#[wasm_bindgen]
pub fn analyze_hand(request: &str) -> String {
    json::analyze_hand(request)
}

/// Suggest the tile to discard; same request shape as `analyze_hand`
#[wasm_bindgen]
pub fn suggest_tile(request: &str) -> String {
    json::suggest_tile(request)
}

/// Rank discards by simulation; the request may carry `"trials"` (max 100)
#[wasm_bindgen]
pub fn simulate(request: &str) -> String {
    json::simulate(request)
}

/// Sample opponent hands from the unseen tiles; the request may carry `"seed"`
#[wasm_bindgen]
pub fn predict_opponents(request: &str) -> String {
    json::predict_opponents(request)
}
