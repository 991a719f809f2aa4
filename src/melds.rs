use crate::{Color, MAX_WILDCARD_POSITIONS, Meld, MeldType, Tile, wildcard_value};

/// Group items by key, keeping groups in order of first appearance
fn group_by<'a, K, F>(tiles: &'a [Tile], key: F) -> Vec<(K, Vec<&'a Tile>)>
where
    K: PartialEq,
    F: Fn(&Tile) -> K,
{
    let mut groups: Vec<(K, Vec<&Tile>)> = Vec::new();
    for tile in tiles {
        let k = key(tile);
        match groups.iter_mut().find(|(existing, _)| *existing == k) {
            Some((_, members)) => members.push(tile),
            None => groups.push((k, vec![tile])),
        }
    }
    groups
}

/// Work out which shape, if any, a group of tiles forms.
///
/// A run is one color with contiguous numbers; 12-13-1 never counts even
/// though 13 wraps to 1 when deriving the okey. A set is one number with
/// every color distinct.
pub fn classify_meld(tiles: &[Tile]) -> Option<MeldType> {
    if tiles.len() < 3 {
        return None;
    }

    let first = &tiles[0];
    if tiles.iter().all(|t| t.color == first.color) {
        let mut numbers: Vec<u8> = tiles.iter().map(|t| t.number).collect();
        numbers.sort_unstable();
        if numbers.contains(&12) && numbers.contains(&13) && numbers.contains(&1) {
            return None;
        }
        let contiguous = numbers.windows(2).all(|pair| pair[1] == pair[0] + 1);
        return contiguous.then_some(MeldType::Run);
    }

    if tiles.iter().all(|t| t.number == first.number) {
        let distinct_colors = tiles
            .iter()
            .enumerate()
            .all(|(i, t)| tiles[..i].iter().all(|other| other.color != t.color));
        return distinct_colors.then_some(MeldType::Set);
    }

    None
}

/// Check whether the tiles form a valid run or set
pub fn is_valid_meld(tiles: &[Tile]) -> bool {
    classify_meld(tiles).is_some()
}

/// Score a meld: runs sum their numbers, sets score number × size, anything else 0
pub fn meld_score(tiles: &[Tile]) -> u32 {
    match classify_meld(tiles) {
        Some(MeldType::Run) => tiles.iter().map(|t| t.number as u32).sum(),
        Some(MeldType::Set) => tiles[0].number as u32 * tiles.len() as u32,
        None => 0,
    }
}

/// Find every run of 3+ consecutive numbers within each color
pub fn find_runs(tiles: &[Tile]) -> Vec<Meld> {
    let mut melds = Vec::new();

    for (_, color_tiles) in group_by(tiles, |t| t.color) {
        let mut numbers: Vec<u8> = color_tiles.iter().map(|t| t.number).collect();
        numbers.sort_unstable();
        numbers.dedup();

        for start in 0..numbers.len() {
            for end in (start + 2)..numbers.len() {
                let window = &numbers[start..=end];
                // Numbers are distinct and sorted, so the window is gap-free
                // exactly when its span matches its length
                if (window[window.len() - 1] - window[0]) as usize != window.len() - 1 {
                    break;
                }

                // One representative tile per number
                let run: Vec<Tile> = window
                    .iter()
                    .filter_map(|&n| color_tiles.iter().find(|t| t.number == n))
                    .map(|&t| t.clone())
                    .collect();

                if is_valid_meld(&run) {
                    melds.push(Meld::new(MeldType::Run, run));
                }
            }
        }
    }

    melds
}

/// Find every set of 3 or 4 same-numbered tiles with distinct colors
pub fn find_sets(tiles: &[Tile]) -> Vec<Meld> {
    let mut melds = Vec::new();

    for (_, number_tiles) in group_by(tiles, |t| t.number) {
        if number_tiles.len() < 3 {
            continue;
        }
        for size in 3..=4 {
            if number_tiles.len() < size {
                continue;
            }
            let mut combination = Vec::with_capacity(size);
            generate_set_combinations(&number_tiles, size, 0, &mut combination, &mut melds);
        }
    }

    melds
}

/// Helper for generating set combinations, pruning as soon as a color repeats
fn generate_set_combinations<'a>(
    available: &[&'a Tile],
    size: usize,
    start: usize,
    combination: &mut Vec<&'a Tile>,
    melds: &mut Vec<Meld>,
) {
    if combination.len() == size {
        let tiles = combination.iter().map(|&t| t.clone()).collect();
        melds.push(Meld::new(MeldType::Set, tiles));
        return;
    }

    for i in start..available.len() {
        let tile = available[i];
        if combination.iter().any(|t| t.color == tile.color) {
            continue;
        }
        combination.push(tile);
        generate_set_combinations(available, size, i + 1, combination, melds);
        combination.pop();
    }
}

/// All runs followed by all sets
pub fn find_all_melds(tiles: &[Tile]) -> Vec<Meld> {
    let mut melds = find_runs(tiles);
    melds.extend(find_sets(tiles));
    melds
}

/// Positions where a single okey would complete something: the missing middle
/// of a same-color gap, or the third color of a number held in two colors.
/// Falls back to the okey's own value when nothing fits.
pub fn useful_wildcard_positions(normal_tiles: &[Tile], okey_value: &Tile) -> Vec<(Color, u8)> {
    let mut positions = Vec::new();

    for (color, color_tiles) in group_by(normal_tiles, |t| t.color) {
        let mut numbers: Vec<u8> = color_tiles.iter().map(|t| t.number).collect();
        numbers.sort_unstable();
        numbers.dedup();
        for pair in numbers.windows(2) {
            if pair[1] - pair[0] == 2 {
                positions.push((color, pair[0] + 1));
            }
        }
    }

    for (number, number_tiles) in group_by(normal_tiles, |t| t.number) {
        let mut colors: Vec<Color> = number_tiles.iter().map(|t| t.color).collect();
        colors.sort_unstable();
        colors.dedup();
        if colors.len() == 2 {
            for color in Color::SUITS {
                if !colors.contains(&color) {
                    positions.push((color, number));
                }
            }
        }
    }

    if positions.is_empty() {
        positions.push(okey_value.identity());
    }

    positions.truncate(MAX_WILDCARD_POSITIONS);
    positions
}

/// Find melds, letting each okey-like tile stand in at its useful positions.
///
/// Melds built around an okey contain the physical okey tile, not the tile it
/// replaced. The result can contain duplicates and overlapping melds; the
/// arrangement selector sorts that out.
pub fn find_melds_with_wildcard(tiles: &[Tile], indicator: Option<&Tile>) -> Vec<Meld> {
    let Some(indicator) = indicator else {
        return find_all_melds(tiles);
    };

    let (okey_tiles, normal_tiles): (Vec<Tile>, Vec<Tile>) =
        tiles.iter().cloned().partition(|t| t.is_okey_like());

    if okey_tiles.is_empty() {
        return find_all_melds(tiles);
    }

    let okey_value = wildcard_value(indicator);
    let positions = useful_wildcard_positions(&normal_tiles, &okey_value);
    let mut melds = Vec::new();

    for okey in &okey_tiles {
        for &(color, number) in &positions {
            let placeholder = Tile {
                color,
                number,
                id: None,
                is_wildcard: true,
                original: Some(Box::new(okey.clone())),
            };

            let mut candidate_tiles = normal_tiles.clone();
            candidate_tiles.push(placeholder);

            for meld in find_all_melds(&candidate_tiles) {
                if !meld.tiles.iter().any(|t| t.is_wildcard) {
                    continue;
                }
                let tiles = meld
                    .tiles
                    .into_iter()
                    .map(|t| if t.is_wildcard { okey.clone() } else { t })
                    .collect();
                melds.push(Meld::new(meld.meld_type, tiles));
            }
        }
    }

    melds.extend(find_all_melds(&normal_tiles));
    melds
}
