use crate::arrangement::find_best_arrangement;
use crate::{MAX_SIMULATIONS, OPEN_HAND_THRESHOLD, Tile};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate outcome of a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Share of trials whose hand could be opened
    pub win_rate: f64,
    pub avg_score: f64,
    /// Candidate discards, best average score first
    pub best_moves: Vec<MoveOutcome>,
    pub risk_assessment: BTreeMap<String, u32>,
}

/// How the hand scores after discarding one tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// Key of the discarded tile
    #[serde(rename = "move")]
    pub tile_key: String,
    pub avg_score: f64,
    /// Share of trials where the remaining hand still scored anything
    pub win_rate: f64,
}

/// One trial: the hand as-is, and the score left after each candidate discard
struct TrialOutcome {
    won: bool,
    score: u32,
    move_scores: Vec<(String, u32)>,
}

fn simulate_single_game(player_tiles: &[Tile], indicator: Option<&Tile>) -> TrialOutcome {
    let arrangement = find_best_arrangement(player_tiles, indicator);

    let move_scores = arrangement
        .unused_tiles
        .iter()
        .map(|tile| {
            let remaining: Vec<Tile> = player_tiles
                .iter()
                .filter(|t| *t != tile)
                .cloned()
                .collect();
            let score = find_best_arrangement(&remaining, indicator).score;
            trace!("discarding {} leaves score {}", tile, score);
            (tile.key(), score)
        })
        .collect();

    TrialOutcome {
        won: arrangement.score >= OPEN_HAND_THRESHOLD,
        score: arrangement.score,
        move_scores,
    }
}

/// Rank candidate discards by replaying the hand `trials` times (at most
/// [`MAX_SIMULATIONS`]).
///
/// Win rate and average score are taken over the requested `trials`, so a
/// capped request reports proportionally lower rates.
/// Trials draw nothing at random, so every trial reproduces the same
/// arrangement and the aggregates are fully determined by the input.
/// `discarded_tiles` does not influence any trial.
pub fn monte_carlo_simulation(
    player_tiles: &[Tile],
    _discarded_tiles: &[Tile],
    indicator: Option<&Tile>,
    trials: usize,
) -> SimulationResult {
    let runs = trials.min(MAX_SIMULATIONS);
    if runs < trials {
        warn!("capping {} requested trials at {}", trials, MAX_SIMULATIONS);
    }

    let mut wins = 0usize;
    let mut total_score = 0u64;
    let mut move_scores: BTreeMap<String, Vec<u32>> = BTreeMap::new();

    for _ in 0..runs {
        let trial = simulate_single_game(player_tiles, indicator);
        if trial.won {
            wins += 1;
        }
        total_score += trial.score as u64;
        for (key, score) in trial.move_scores {
            move_scores.entry(key).or_default().push(score);
        }
    }

    let (win_rate, avg_score) = if trials > 0 {
        (wins as f64 / trials as f64, total_score as f64 / trials as f64)
    } else {
        (0.0, 0.0)
    };

    let mut best_moves: Vec<MoveOutcome> = move_scores
        .into_iter()
        .filter(|(_, scores)| !scores.is_empty())
        .map(|(tile_key, scores)| {
            let count = scores.len() as f64;
            let avg_score = scores.iter().map(|&s| s as f64).sum::<f64>() / count;
            let scoring = scores.iter().filter(|&&s| s > 0).count() as f64;
            MoveOutcome {
                tile_key,
                avg_score,
                win_rate: scoring / count,
            }
        })
        .collect();
    best_moves.sort_by(|a, b| b.avg_score.total_cmp(&a.avg_score));

    debug!(
        "{} trials: win rate {:.2}, average score {:.1}, {} candidate moves",
        runs,
        win_rate,
        avg_score,
        best_moves.len()
    );

    SimulationResult {
        win_rate,
        avg_score,
        best_moves,
        risk_assessment: BTreeMap::new(),
    }
}
