//! Melds: the three ways three or four tiles can be grouped into a
//! completed set.

use std::fmt;

use crate::tile::Tile;

/// A completed group of tiles taken out of the closed hand.
///
/// Tagged union rather than a single generic "group of tiles" type: each
/// variant has a distinct shape (a triplet/quad is identified by one tile
/// and a count, a sequence by its lowest tile) and distinct legality rules,
/// mirroring the teacher's `Meld` enum-of-variants design.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Meld {
    /// Three identical tiles.
    Triplet(Tile),
    /// Three consecutive tiles of one numeral suit, named by the lowest.
    Sequence(Tile),
    /// Four identical tiles, formed only by upgrading an existing triplet.
    Quad(Tile),
}

impl Meld {
    pub fn is_quad(self) -> bool {
        matches!(self, Meld::Quad(_))
    }

    pub fn is_triplet(self) -> bool {
        matches!(self, Meld::Triplet(_))
    }

    pub fn is_sequence(self) -> bool {
        matches!(self, Meld::Sequence(_))
    }

    /// The tile identifying this meld (the repeated tile for
    /// triplet/quad, the lowest tile for a sequence).
    pub fn key_tile(self) -> Tile {
        match self {
            Meld::Triplet(t) | Meld::Quad(t) | Meld::Sequence(t) => t,
        }
    }

    /// The tiles the meld is made of, low to high.
    pub fn tiles(self) -> Vec<Tile> {
        match self {
            Meld::Triplet(t) => vec![t, t, t],
            Meld::Quad(t) => vec![t, t, t, t],
            Meld::Sequence(t) => {
                let t1 = t.succ().expect("sequence base must have a successor");
                let t2 = t1.succ().expect("sequence base must have two successors");
                vec![t, t1, t2]
            }
        }
    }
}

impl fmt::Display for Meld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Meld::Triplet(t) => write!(f, "triplet({t})"),
            Meld::Sequence(t) => write!(f, "sequence({t}..)"),
            Meld::Quad(t) => write!(f, "quad({t})"),
        }
    }
}
