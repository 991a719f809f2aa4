use crate::melds::find_melds_with_wildcard;
use crate::{Color, Meld, Tile, wildcard_value};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The melds chosen from a hand and what is left over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrangement {
    pub melds: Vec<Meld>,
    pub score: u32,
    pub unused_tiles: Vec<Tile>,
    pub total_tiles_used: usize,
}

/// Replace every fake okey with the okey value it stands for.
///
/// Without an indicator the tiles are returned unchanged.
pub fn resolve_fake_okeys(tiles: &[Tile], indicator: Option<&Tile>) -> Vec<Tile> {
    let Some(indicator) = indicator else {
        return tiles.to_vec();
    };

    let okey_value = wildcard_value(indicator);
    tiles
        .iter()
        .map(|tile| {
            if tile.color == Color::FakeOkey {
                Tile {
                    original: Some(Box::new(tile.clone())),
                    ..okey_value.clone()
                }
            } else {
                tile.clone()
            }
        })
        .collect()
}

/// Greedily pick the highest-scoring melds that share no tile identity.
///
/// Candidates are visited in descending score order; the sort is stable, so
/// equal scores keep the order the meld finder produced them in. This is a
/// single pass and can miss a better combination of lower-scoring melds.
pub fn find_best_arrangement(tiles: &[Tile], indicator: Option<&Tile>) -> Arrangement {
    let resolved = resolve_fake_okeys(tiles, indicator);
    let candidates = find_melds_with_wildcard(&resolved, indicator);

    if candidates.is_empty() {
        debug!("no melds among {} tiles", resolved.len());
        return Arrangement {
            melds: Vec::new(),
            score: 0,
            unused_tiles: resolved,
            total_tiles_used: 0,
        };
    }

    let mut scored: Vec<(Meld, u32)> = candidates
        .into_iter()
        .map(|meld| {
            let score = meld.score();
            (meld, score)
        })
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));

    let candidate_count = scored.len();
    let mut used: HashSet<(Color, u8)> = HashSet::new();
    let mut melds = Vec::new();
    let mut score = 0;

    for (meld, meld_score) in scored {
        let conflicts = meld.tiles.iter().any(|t| used.contains(&t.identity()));
        if conflicts {
            continue;
        }
        used.extend(meld.tiles.iter().map(Tile::identity));
        score += meld_score;
        melds.push(meld);
    }

    let unused_tiles: Vec<Tile> = resolved
        .iter()
        .filter(|t| !used.contains(&t.identity()))
        .cloned()
        .collect();
    let total_tiles_used = resolved.len() - unused_tiles.len();

    debug!(
        "selected {} of {} candidate melds, score {}, {} tiles unused",
        melds.len(),
        candidate_count,
        score,
        unused_tiles.len()
    );

    Arrangement {
        melds,
        score,
        unused_tiles,
        total_tiles_used,
    }
}
