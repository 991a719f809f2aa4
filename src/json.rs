//! JSON request/response boundary shared by the WASM exports and the CLI.
//!
//! Every operation takes the same request shape:
//! `{"tiles": [...], "discarded_tiles": [...], "indicator": {...}}`, where
//! `discarded_tiles` and `indicator` may be missing or null, and an empty
//! indicator object means "no indicator".

use crate::analysis::{self, AnalysisResult, OpponentPrediction, Suggestion};
use crate::simulation::{self, SimulationResult};
use crate::{Color, MAX_SIMULATIONS, Tile};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Indicator as sent by clients; `{}` is accepted and means absent
#[derive(Debug, Default, Deserialize)]
struct IndicatorJson {
    color: Option<Color>,
    number: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct RequestJson {
    #[serde(default)]
    tiles: Vec<Tile>,
    #[serde(default)]
    discarded_tiles: Option<Vec<Tile>>,
    #[serde(default)]
    indicator: Option<IndicatorJson>,
    #[serde(default)]
    trials: Option<usize>,
    #[serde(default)]
    seed: Option<u64>,
}

/// A validated request
#[derive(Debug, Clone, PartialEq)]
pub struct HandRequest {
    pub tiles: Vec<Tile>,
    pub discarded_tiles: Vec<Tile>,
    pub indicator: Option<Tile>,
    pub trials: usize,
    pub seed: u64,
}

/// Body returned for any failed request
#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn indicator_from_json(indicator: IndicatorJson) -> Result<Option<Tile>, String> {
    match (indicator.color, indicator.number) {
        (None, None) => Ok(None),
        (Some(Color::FakeOkey), _) => Err("Indicator cannot be a fake okey".to_string()),
        (Some(color), Some(number)) => {
            let tile = Tile {
                color,
                number,
                id: None,
                is_wildcard: false,
                original: None,
            };
            tile.validate().map_err(|e| format!("Invalid indicator: {}", e))?;
            Ok(Some(tile))
        }
        _ => Err("Indicator needs both color and number".to_string()),
    }
}

fn validate_tiles(tiles: &[Tile], field: &str) -> Result<(), String> {
    for (i, tile) in tiles.iter().enumerate() {
        tile.validate()
            .map_err(|e| format!("Invalid tile at {}[{}]: {}", field, i, e))?;
    }
    Ok(())
}

/// Parse and validate a request body
pub fn parse_request(body: &str) -> Result<HandRequest, String> {
    let request: RequestJson =
        serde_json::from_str(body).map_err(|e| format!("Invalid request JSON: {}", e))?;

    validate_tiles(&request.tiles, "tiles")?;
    let discarded_tiles = request.discarded_tiles.unwrap_or_default();
    validate_tiles(&discarded_tiles, "discarded_tiles")?;
    let indicator = indicator_from_json(request.indicator.unwrap_or_default())?;

    Ok(HandRequest {
        tiles: request.tiles,
        discarded_tiles,
        indicator,
        trials: request.trials.unwrap_or(MAX_SIMULATIONS),
        seed: request.seed.unwrap_or(0),
    })
}

pub fn analyze_internal(body: &str) -> Result<AnalysisResult, String> {
    let request = parse_request(body)?;
    Ok(analysis::analyze_hand(
        &request.tiles,
        &request.discarded_tiles,
        request.indicator.as_ref(),
    ))
}

pub fn suggest_internal(body: &str) -> Result<Suggestion, String> {
    let request = parse_request(body)?;
    Ok(analysis::suggest_best_tile(
        &request.tiles,
        &request.discarded_tiles,
        request.indicator.as_ref(),
    ))
}

pub fn simulate_internal(body: &str) -> Result<SimulationResult, String> {
    let request = parse_request(body)?;
    Ok(simulation::monte_carlo_simulation(
        &request.tiles,
        &request.discarded_tiles,
        request.indicator.as_ref(),
        request.trials,
    ))
}

pub fn predict_internal(body: &str) -> Result<OpponentPrediction, String> {
    let request = parse_request(body)?;
    let mut rng = StdRng::seed_from_u64(request.seed);
    Ok(analysis::predict_opponent_tiles(
        &request.tiles,
        &request.discarded_tiles,
        request.indicator.as_ref(),
        &mut rng,
    ))
}

/// Serialise a result, or its error as `{"error": ...}`
pub fn respond<T: Serialize>(result: Result<T, String>) -> String {
    let serialized = match result {
        Ok(value) => serde_json::to_string(&value),
        Err(error) => serde_json::to_string(&ErrorResponse { error }),
    };
    serialized.unwrap_or_else(|e| format!(r#"{{"error":"Serialization error: {}"}}"#, e))
}

/// Analyse a hand: arrangement, tile values, risks and recommendations
pub fn analyze_hand(body: &str) -> String {
    respond(analyze_internal(body))
}

/// Suggest the tile to discard
pub fn suggest_tile(body: &str) -> String {
    respond(suggest_internal(body))
}

/// Run the discard simulation
pub fn simulate(body: &str) -> String {
    respond(simulate_internal(body))
}

/// Deal the unseen tiles to three opponents using the request's seed
pub fn predict_opponents(body: &str) -> String {
    respond(predict_internal(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_optional_fields_default() {
        let request = parse_request(r#"{"tiles": [{"color": "kirmizi", "number": 1}]}"#).unwrap();
        assert_eq!(request.tiles, vec![Tile::new(Color::Red, 1)]);
        assert!(request.discarded_tiles.is_empty());
        assert_eq!(request.indicator, None);
        assert_eq!(request.trials, MAX_SIMULATIONS);

        let nulls = parse_request(r#"{"tiles": [], "discarded_tiles": null, "indicator": null}"#)
            .unwrap();
        assert!(nulls.discarded_tiles.is_empty());
        assert_eq!(nulls.indicator, None);
    }

    #[test]
    fn test_empty_indicator_is_absent() {
        let request = parse_request(r#"{"tiles": [], "indicator": {}}"#).unwrap();
        assert_eq!(request.indicator, None);
    }

    #[test]
    fn test_indicator_parsed() {
        let request =
            parse_request(r#"{"tiles": [], "indicator": {"color": "siyah", "number": 13}}"#)
                .unwrap();
        assert_eq!(request.indicator, Some(Tile::new(Color::Black, 13)));
    }

    #[test]
    fn test_invalid_requests() {
        assert!(parse_request("not json").is_err());
        assert!(parse_request(r#"{"tiles": [{"color": "kirmizi", "number": 14}]}"#).is_err());
        assert!(parse_request(r#"{"tiles": [{"color": "mor", "number": 3}]}"#).is_err());
        assert!(parse_request(r#"{"tiles": [{"color": "kirmizi"}]}"#).is_err());
        assert!(parse_request(r#"{"tiles": [], "indicator": {"color": "mavi"}}"#).is_err());
        assert!(
            parse_request(r#"{"tiles": [], "indicator": {"color": "sahte_okey", "number": 0}}"#)
                .is_err()
        );
        let bad_fake =
            r#"{"tiles": [], "discarded_tiles": [{"color": "sahte_okey", "number": 4}]}"#;
        assert!(parse_request(bad_fake).is_err());
    }

    #[test]
    fn test_analyze_response_shape() {
        let body = r#"{
            "tiles": [
                {"color": "kirmizi", "number": 1},
                {"color": "kirmizi", "number": 2},
                {"color": "kirmizi", "number": 3},
                {"color": "mavi", "number": 9}
            ],
            "indicator": {"color": "sari", "number": 4}
        }"#;
        let response: Value = serde_json::from_str(&analyze_hand(body)).unwrap();

        assert_eq!(response["best_arrangement"]["score"], 6);
        assert_eq!(response["best_arrangement"]["total_tiles_used"], 3);
        assert_eq!(response["best_arrangement"]["melds"][0]["type"], "run");
        assert_eq!(response["tile_values"]["mavi_9"], 11.0);
        assert_eq!(response["risk_analysis"]["mavi_9"], 2);
        assert_eq!(response["opponent_prediction"]["opponent1"], Value::Array(vec![]));
        assert_eq!(response["recommendations"][1], "Okey tile for this hand: sari 5");
    }

    #[test]
    fn test_error_response() {
        let response: Value = serde_json::from_str(&suggest_tile("{")).unwrap();
        assert!(
            response["error"]
                .as_str()
                .unwrap()
                .starts_with("Invalid request JSON")
        );
    }

    #[test]
    fn test_suggest_response() {
        let body = r#"{"tiles": [{"color": "kirmizi", "number": 1}], "discarded_tiles": []}"#;
        let response: Value = serde_json::from_str(&suggest_tile(body)).unwrap();
        assert_eq!(response["suggestion"], "Discard kirmizi 1");
        assert_eq!(response["tile"]["color"], "kirmizi");
        assert_eq!(response["risk_level"], 2);
    }

    #[test]
    fn test_simulate_response() {
        let body = r#"{"tiles": [{"color": "kirmizi", "number": 1}], "trials": 5}"#;
        let response: Value = serde_json::from_str(&simulate(body)).unwrap();
        assert_eq!(response["win_rate"], 0.0);
        assert_eq!(response["best_moves"][0]["move"], "kirmizi_1");
        assert_eq!(response["best_moves"][0]["win_rate"], 0.0);
    }

    #[test]
    fn test_predict_response_is_seeded() {
        let body = r#"{"tiles": [], "seed": 9}"#;
        assert_eq!(predict_opponents(body), predict_opponents(body));

        let response: Value = serde_json::from_str(&predict_opponents(body)).unwrap();
        assert_eq!(response["opponent3"].as_array().unwrap().len(), 13);
        assert_eq!(response["remaining_deck"].as_array().unwrap().len(), 106 - 39);
    }
}
