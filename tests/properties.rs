//! Property-based tests for meld scoring and hand arrangement.

use proptest::prelude::*;
use std::collections::HashSet;

use okey_advisor::arrangement::{find_best_arrangement, resolve_fake_okeys};
use okey_advisor::melds::{find_all_melds, is_valid_meld, meld_score};
use okey_advisor::simulation::monte_carlo_simulation;
use okey_advisor::{Color, Tile, wildcard_value};

fn color_strategy() -> impl Strategy<Value = Color> {
    prop::sample::select(Color::SUITS.to_vec())
}

/// Strategy: any tile of the physical set, fake okeys included.
fn tile_strategy() -> impl Strategy<Value = Tile> {
    prop_oneof![
        12 => (color_strategy(), 1..=13u8).prop_map(|(c, n)| Tile::new(c, n)),
        1 => Just(Tile::fake_okey()),
    ]
}

/// Strategy: a hand of up to 15 tiles.
fn hand_strategy() -> impl Strategy<Value = Vec<Tile>> {
    prop::collection::vec(tile_strategy(), 0..=15)
}

fn indicator_strategy() -> impl Strategy<Value = Option<Tile>> {
    prop::option::of((color_strategy(), 1..=13u8).prop_map(|(c, n)| Tile::new(c, n)))
}

proptest! {
    // 1. A run scores the sum of its numbers
    #[test]
    fn run_scores_sum(color in color_strategy(), start in 1..=11u8, len in 3..=13usize) {
        let end = (start as usize + len - 1).min(13) as u8;
        prop_assume!(end - start >= 2);
        let run: Vec<Tile> = (start..=end).map(|n| Tile::new(color, n)).collect();
        let expected: u32 = (start..=end).map(u32::from).sum();
        if run.len() == 13 {
            prop_assert_eq!(meld_score(&run), 0);
        } else {
            prop_assert_eq!(meld_score(&run), expected);
        }
    }

    // 2. A set scores number × size
    #[test]
    fn set_scores_number_times_size(number in 1..=13u8, size in 3..=4usize) {
        let set: Vec<Tile> = Color::SUITS[..size].iter().map(|&c| Tile::new(c, number)).collect();
        prop_assert!(is_valid_meld(&set));
        prop_assert_eq!(meld_score(&set), number as u32 * size as u32);
    }

    // 3. 12-13-1 is never a run, whatever else is around it
    #[test]
    fn wraparound_never_a_run(
        color in color_strategy(),
        extra in prop::collection::vec(2..=11u8, 0..5),
    ) {
        let mut tiles = vec![Tile::new(color, 12), Tile::new(color, 13), Tile::new(color, 1)];
        tiles.extend(extra.into_iter().map(|n| Tile::new(color, n)));
        prop_assert!(!is_valid_meld(&tiles));
        prop_assert_eq!(meld_score(&tiles), 0);
    }

    // 4. Okey value is the next number of the same color, 13 wrapping to 1
    #[test]
    fn wildcard_value_wraps(color in color_strategy(), number in 1..=13u8) {
        let value = wildcard_value(&Tile::new(color, number));
        prop_assert_eq!(value.color, color);
        let expected = if number == 13 { 1 } else { number + 1 };
        prop_assert_eq!(value.number, expected);
    }

    // 5. Every meld the finder emits is valid
    #[test]
    fn found_melds_are_valid(hand in hand_strategy()) {
        for meld in find_all_melds(&hand) {
            prop_assert!(is_valid_meld(&meld.tiles), "invalid meld {:?}", meld.tiles);
        }
    }

    // 6. No tile identity appears in two accepted melds
    #[test]
    fn arrangement_never_reuses_identity(
        hand in hand_strategy(),
        indicator in indicator_strategy(),
    ) {
        let arrangement = find_best_arrangement(&hand, indicator.as_ref());
        let mut seen = HashSet::new();
        for meld in &arrangement.melds {
            let identities: HashSet<_> = meld.tiles.iter().map(Tile::identity).collect();
            for identity in identities {
                prop_assert!(seen.insert(identity), "{:?} used twice", identity);
            }
        }
    }

    // 7. Unused plus used tiles account for the whole resolved hand
    #[test]
    fn arrangement_accounts_for_all_tiles(
        hand in hand_strategy(),
        indicator in indicator_strategy(),
    ) {
        let arrangement = find_best_arrangement(&hand, indicator.as_ref());
        let resolved = resolve_fake_okeys(&hand, indicator.as_ref());
        let accounted = arrangement.unused_tiles.len() + arrangement.total_tiles_used;
        prop_assert_eq!(accounted, resolved.len());
        let total: u32 = arrangement.melds.iter().map(|m| m.score()).sum();
        prop_assert_eq!(arrangement.score, total);
    }

    // 8. The simulation is deterministic for a fixed input
    #[test]
    fn simulation_deterministic(
        hand in prop::collection::vec(tile_strategy(), 0..=8),
        indicator in indicator_strategy(),
    ) {
        let first = monte_carlo_simulation(&hand, &[], indicator.as_ref(), 3);
        let second = monte_carlo_simulation(&hand, &[], indicator.as_ref(), 3);
        prop_assert_eq!(first.avg_score, second.avg_score);
        prop_assert_eq!(first.win_rate, second.win_rate);
    }
}
