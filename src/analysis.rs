use crate::arrangement::{Arrangement, find_best_arrangement};
use crate::{Color, HAND_SIZE, OPEN_HAND_THRESHOLD, Tile, deck, wildcard_value};
use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Risk above which a discard is flagged as dangerous
const HIGH_RISK: u32 = 7;
/// Risk above which a discard is no longer low risk
const MEDIUM_RISK: u32 = 4;

/// Everything the advisor knows about a hand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub best_arrangement: Arrangement,
    /// Keep-value of each unused tile, by tile key
    pub tile_values: BTreeMap<String, f64>,
    pub opponent_prediction: OpponentPrediction,
    /// Discard risk of each unused tile, by tile key
    pub risk_analysis: BTreeMap<String, u32>,
    pub recommendations: Vec<String>,
}

/// Tiles dealt to the three opponents, plus what is left in the pile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpponentPrediction {
    pub opponent1: Vec<Tile>,
    pub opponent2: Vec<Tile>,
    pub opponent3: Vec<Tile>,
    pub remaining_deck: Vec<Tile>,
}

/// A single discard suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub suggestion: String,
    pub tile: Option<Tile>,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<u32>,
}

fn discarded_copies(tile: &Tile, discarded_tiles: &[Tile]) -> usize {
    discarded_tiles
        .iter()
        .filter(|d| d.identity() == tile.identity())
        .count()
}

/// How much a tile is worth keeping.
///
/// Okeys start at 50, everything else at its number. Each discarded copy
/// costs 5; each same-color hand tile one number away adds 3 and each
/// same-color tile with the same number adds 2.
pub fn tile_value(
    tile: &Tile,
    player_tiles: &[Tile],
    discarded_tiles: &[Tile],
    indicator: Option<&Tile>,
) -> f64 {
    let resolved;
    let tile = match indicator {
        Some(indicator) if tile.color == Color::FakeOkey => {
            resolved = wildcard_value(indicator);
            &resolved
        }
        _ => tile,
    };

    let mut value = if tile.is_wildcard {
        50.0
    } else {
        tile.number as f64
    };

    value -= 5.0 * discarded_copies(tile, discarded_tiles) as f64;

    for held in player_tiles.iter().filter(|t| t.color == tile.color) {
        if held.number.abs_diff(tile.number) == 1 {
            value += 3.0;
        } else if held.number == tile.number {
            value += 2.0;
        }
    }

    value
}

/// Risk of throwing this tile away: okeys 15, otherwise rising with the
/// number of copies already discarded (0 → 2, 1 → 5, 2+ → 10).
pub fn risk_score(tile: &Tile, discarded_tiles: &[Tile]) -> u32 {
    if tile.is_okey_like() {
        return 15;
    }
    match discarded_copies(tile, discarded_tiles) {
        0 => 2,
        1 => 5,
        _ => 10,
    }
}

/// Risk score of every unused tile in the arrangement
pub fn analyze_risks(
    arrangement: &Arrangement,
    discarded_tiles: &[Tile],
) -> BTreeMap<String, u32> {
    arrangement
        .unused_tiles
        .iter()
        .map(|tile| (tile.key(), risk_score(tile, discarded_tiles)))
        .collect()
}

/// The unused tile with the lowest value; the first one wins ties
fn lowest_value_tile<'a>(
    unused_tiles: &'a [Tile],
    tile_values: &BTreeMap<String, f64>,
) -> Option<(&'a Tile, f64)> {
    let mut best: Option<(&Tile, f64)> = None;
    for tile in unused_tiles {
        let value = tile_values.get(&tile.key()).copied().unwrap_or(0.0);
        if best.is_none_or(|(_, best_value)| value < best_value) {
            best = Some((tile, value));
        }
    }
    best
}

/// Human-readable advice for an analysed hand
pub fn generate_recommendations(
    arrangement: &Arrangement,
    tile_values: &BTreeMap<String, f64>,
    risk_analysis: &BTreeMap<String, u32>,
    indicator: Option<&Tile>,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if arrangement.score >= OPEN_HAND_THRESHOLD {
        recommendations.push(format!(
            "You can open your hand! Score: {}",
            arrangement.score
        ));
    } else {
        recommendations.push(format!(
            "You need {} more points to open your hand",
            OPEN_HAND_THRESHOLD - arrangement.score
        ));
    }

    if let Some(indicator) = indicator {
        let okey = wildcard_value(indicator);
        recommendations.push(format!(
            "Okey tile for this hand: {} {}",
            okey.color, okey.number
        ));
    }

    if let Some((tile, _)) = lowest_value_tile(&arrangement.unused_tiles, tile_values) {
        recommendations.push(format!(
            "Best tile to discard: {} {}",
            tile.color, tile.number
        ));
    }

    // Listed in the order the tiles were left unused
    let mut high_risk: Vec<String> = Vec::new();
    for tile in &arrangement.unused_tiles {
        let key = tile.key();
        let risky = risk_analysis.get(&key).is_some_and(|&risk| risk > HIGH_RISK);
        if risky && !high_risk.contains(&key) {
            high_risk.push(key);
        }
    }
    if !high_risk.is_empty() {
        recommendations.push(format!("High-risk tiles: {}", high_risk.join(", ")));
    }

    recommendations
}

/// Arrange the hand, value and risk-rate the leftovers, and produce advice.
///
/// Opponent hands are not sampled here; `opponent_prediction` is always empty.
/// See [`predict_opponent_tiles`] for a sampled deal.
pub fn analyze_hand(
    player_tiles: &[Tile],
    discarded_tiles: &[Tile],
    indicator: Option<&Tile>,
) -> AnalysisResult {
    let arrangement = find_best_arrangement(player_tiles, indicator);

    let tile_values: BTreeMap<String, f64> = arrangement
        .unused_tiles
        .iter()
        .map(|tile| {
            (
                tile.key(),
                tile_value(tile, player_tiles, discarded_tiles, indicator),
            )
        })
        .collect();

    let risk_analysis = analyze_risks(&arrangement, discarded_tiles);
    let recommendations =
        generate_recommendations(&arrangement, &tile_values, &risk_analysis, indicator);

    AnalysisResult {
        best_arrangement: arrangement,
        tile_values,
        opponent_prediction: OpponentPrediction::default(),
        risk_analysis,
        recommendations,
    }
}

/// Pick the tile to throw away, with the reasoning behind it
pub fn suggest_best_tile(
    player_tiles: &[Tile],
    discarded_tiles: &[Tile],
    indicator: Option<&Tile>,
) -> Suggestion {
    let analysis = analyze_hand(player_tiles, discarded_tiles, indicator);
    let unused_tiles = &analysis.best_arrangement.unused_tiles;

    let Some((tile, value)) = lowest_value_tile(unused_tiles, &analysis.tile_values) else {
        return Suggestion {
            suggestion: "All tiles are in use, you can open your hand!".to_string(),
            tile: None,
            reason: "Perfect arrangement".to_string(),
            risk_level: None,
        };
    };

    let risk = analysis.risk_analysis.get(&tile.key()).copied().unwrap_or(0);

    let mut reason = format!("Lowest-value tile (value: {:.1})", value);
    if tile.is_okey_like() {
        reason.push_str(", OKEY TILE - be very careful!");
    }
    if risk > HIGH_RISK {
        reason.push_str(&format!(", High risk ({})", risk));
    } else if risk > MEDIUM_RISK {
        reason.push_str(&format!(", Medium risk ({})", risk));
    } else {
        reason.push_str(&format!(", Low risk ({})", risk));
    }

    Suggestion {
        suggestion: format!("Discard {} {}", tile.color, tile.number),
        tile: Some(tile.clone()),
        reason,
        risk_level: Some(risk),
    }
}

/// Deal the unseen tiles at random to three opponents.
///
/// Every deck tile sharing an identity with a hand tile, a discard or the
/// okey value is treated as seen and left out.
pub fn predict_opponent_tiles<R: Rng + ?Sized>(
    player_tiles: &[Tile],
    discarded_tiles: &[Tile],
    indicator: Option<&Tile>,
    rng: &mut R,
) -> OpponentPrediction {
    let mut seen: Vec<(Color, u8)> = player_tiles
        .iter()
        .chain(discarded_tiles)
        .map(Tile::identity)
        .collect();
    if let Some(indicator) = indicator {
        seen.push(wildcard_value(indicator).identity());
    }

    let mut unseen: Vec<Tile> = deck()
        .iter()
        .filter(|t| !seen.contains(&t.identity()))
        .cloned()
        .collect();
    unseen.shuffle(rng);

    debug!("dealing {} unseen tiles to opponents", unseen.len());

    let mut rest = unseen.into_iter();
    let mut deal = || rest.by_ref().take(HAND_SIZE).collect::<Vec<_>>();
    let opponent1 = deal();
    let opponent2 = deal();
    let opponent3 = deal();

    OpponentPrediction {
        opponent1,
        opponent2,
        opponent3,
        remaining_deck: rest.collect(),
    }
}
