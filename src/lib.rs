use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

pub mod analysis;
pub mod arrangement;
pub mod json;
pub mod melds;
pub mod simulation;
#[cfg(target_arch = "wasm32")]
pub mod wasm_api;

/// Score a hand must reach before it can be opened.
pub const OPEN_HAND_THRESHOLD: u32 = 101;
/// Hard cap on simulation trials per call.
pub const MAX_SIMULATIONS: usize = 100;
/// Maximum number of positions tried for each okey tile.
pub const MAX_WILDCARD_POSITIONS: usize = 10;
/// Tiles in a full Okey set.
pub const DECK_SIZE: usize = 106;
/// Tiles dealt to each opponent.
pub const HAND_SIZE: usize = 13;

/// Tile colors. The wire names are the Turkish color names used by the game UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "kirmizi")]
    Red,
    #[serde(rename = "sari")]
    Yellow,
    #[serde(rename = "mavi")]
    Blue,
    #[serde(rename = "siyah")]
    Black,
    /// The two printed "fake okey" tiles, which stand in for the okey value.
    #[serde(rename = "sahte_okey")]
    FakeOkey,
}

impl Color {
    /// The four suit colors in canonical order.
    pub const SUITS: [Color; 4] = [Color::Red, Color::Yellow, Color::Blue, Color::Black];

    pub fn name(&self) -> &'static str {
        match self {
            Color::Red => "kirmizi",
            Color::Yellow => "sari",
            Color::Blue => "mavi",
            Color::Black => "siyah",
            Color::FakeOkey => "sahte_okey",
        }
    }

    fn letter(&self) -> char {
        match self {
            Color::Red => 'r',
            Color::Yellow => 'y',
            Color::Blue => 'b',
            Color::Black => 'k',
            Color::FakeOkey => 'f',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single Okey tile.
///
/// Tiles compare by every field, but all game logic matches them by
/// [`Tile::identity`]: two physical copies of the same color and number are
/// interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub color: Color,
    /// 1-13, or 0 for a fake okey
    pub number: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Set on tiles acting as the okey (resolved fake okeys, or a caller-marked okey)
    #[serde(default, rename = "is_okey", skip_serializing_if = "std::ops::Not::not")]
    pub is_wildcard: bool,
    /// The physical tile this one was derived from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<Box<Tile>>,
}

impl Tile {
    /// Create a plain tile of a suit color and number (1-13)
    pub fn new(color: Color, number: u8) -> Self {
        assert!(color != Color::FakeOkey, "Use Tile::fake_okey for fake okeys");
        assert!((1..=13).contains(&number), "Number must be 1-13");
        Tile {
            color,
            number,
            id: None,
            is_wildcard: false,
            original: None,
        }
    }

    /// Create a fake okey tile
    pub fn fake_okey() -> Self {
        Tile {
            color: Color::FakeOkey,
            number: 0,
            id: None,
            is_wildcard: false,
            original: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn as_wildcard(mut self) -> Self {
        self.is_wildcard = true;
        self
    }

    /// The `(color, number)` pair every comparison in the game uses
    pub fn identity(&self) -> (Color, u8) {
        (self.color, self.number)
    }

    /// Map key for this tile, e.g. `kirmizi_7`
    pub fn key(&self) -> String {
        format!("{}_{}", self.color, self.number)
    }

    /// Whether this tile plays as the okey: either flagged or a fake okey
    pub fn is_okey_like(&self) -> bool {
        self.is_wildcard || self.color == Color::FakeOkey
    }

    /// Check that color and number agree with the physical tile set
    pub fn validate(&self) -> Result<(), String> {
        match self.color {
            Color::FakeOkey if self.number != 0 => Err(format!(
                "Fake okey must have number 0, got {}",
                self.number
            )),
            Color::FakeOkey => Ok(()),
            _ if !(1..=13).contains(&self.number) => Err(format!(
                "Number must be 1-13 for {}, got {}",
                self.color, self.number
            )),
            _ => Ok(()),
        }
    }

    /// Parse a tile from its short form
    /// Format: "r13" (red 13), "y1" (yellow 1), "b7" (blue 7), "k9" (black 9), "f" (fake okey).
    /// A trailing `*` marks the tile as the okey, e.g. "r8*".
    pub fn from_string(s: &str) -> Result<Self, String> {
        let (body, is_wildcard) = match s.strip_suffix('*') {
            Some(body) => (body, true),
            None => (s, false),
        };
        if body == "f" {
            let mut tile = Tile::fake_okey();
            tile.is_wildcard = is_wildcard;
            return Ok(tile);
        }
        if body.len() < 2 {
            return Err(format!("Invalid tile string: {}", s));
        }

        let color = match &body[0..1] {
            "r" => Color::Red,
            "y" => Color::Yellow,
            "b" => Color::Blue,
            "k" => Color::Black,
            _ => return Err(format!("Invalid color: {}", &body[0..1])),
        };

        let number: u8 = body[1..]
            .parse()
            .map_err(|_| format!("Invalid number: {}", &body[1..]))?;

        if !(1..=13).contains(&number) {
            return Err(format!("Number must be 1-13, got {}", number));
        }

        let mut tile = Tile::new(color, number);
        tile.is_wildcard = is_wildcard;
        Ok(tile)
    }
}

impl fmt::Display for Tile {
    /// Short form, the inverse of [`Tile::from_string`]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.color == Color::FakeOkey {
            write!(f, "f")?;
        } else {
            write!(f, "{}{}", self.color.letter(), self.number)?;
        }
        if self.is_wildcard {
            write!(f, "*")?;
        }
        Ok(())
    }
}

/// Parse a whitespace-separated list of short-form tiles
pub fn parse_tiles(input: &str) -> Result<Vec<Tile>, String> {
    input.split_whitespace().map(Tile::from_string).collect()
}

/// The okey value selected by an indicator: same color, next number, 13 wraps to 1.
pub fn wildcard_value(indicator: &Tile) -> Tile {
    let number = if indicator.number == 13 {
        1
    } else {
        indicator.number + 1
    };
    Tile {
        color: indicator.color,
        number,
        id: None,
        is_wildcard: true,
        original: None,
    }
}

static DECK: LazyLock<Vec<Tile>> = LazyLock::new(|| {
    let mut tiles = Vec::with_capacity(DECK_SIZE);
    for color in Color::SUITS {
        for number in 1..=13 {
            for copy in 0..2 {
                let id = format!("{}_{}_{}", color, number, copy);
                tiles.push(Tile::new(color, number).with_id(id));
            }
        }
    }
    for copy in 0..2 {
        tiles.push(Tile::fake_okey().with_id(format!("{}_{}", Color::FakeOkey, copy)));
    }
    tiles
});

/// The full 106-tile set: two of every suit tile plus two fake okeys
pub fn deck() -> &'static [Tile] {
    &DECK
}

/// How a meld was formed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeldType {
    /// Consecutive numbers, same color
    Run,
    /// Same number, distinct colors
    Set,
}

/// A group of tiles laid down together (a "per")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meld {
    #[serde(rename = "type")]
    pub meld_type: MeldType,
    pub tiles: Vec<Tile>,
}

impl Meld {
    pub fn new(meld_type: MeldType, tiles: Vec<Tile>) -> Self {
        Meld { meld_type, tiles }
    }

    /// Score of the tiles as held (see [`melds::meld_score`])
    pub fn score(&self) -> u32 {
        melds::meld_score(&self.tiles)
    }
}
