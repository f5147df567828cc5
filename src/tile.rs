//! Tiles: encoding, suits, ordering.
//!
//! 34 kinds of tile, each present 4 times in a full wall (136 total):
//! - Wan (characters), Tiao (bamboos), Tong (dots): ranks 1-9 each
//! - Feng (winds): 4 kinds
//! - Jian (dragons): 3 kinds
//!
//! Encoding mirrors the suit order used throughout this variant's source
//! material: Wan < Tiao < Tong < Feng < Jian, then by rank within a suit.
//! This total order is what canonicalization (sorting a hand before
//! decomposition) relies on.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Suit {
    Wan,
    Tiao,
    Tong,
    Feng,
    Jian,
}

impl Suit {
    const fn order(self) -> u8 {
        match self {
            Suit::Wan => 0,
            Suit::Tiao => 1,
            Suit::Tong => 2,
            Suit::Feng => 3,
            Suit::Jian => 4,
        }
    }

    pub const fn is_numeral(self) -> bool {
        matches!(self, Suit::Wan | Suit::Tiao | Suit::Tong)
    }

    pub const fn is_honor(self) -> bool {
        matches!(self, Suit::Feng | Suit::Jian)
    }

    const fn num_ranks(self) -> u8 {
        match self {
            Suit::Wan | Suit::Tiao | Suit::Tong => 9,
            Suit::Feng => 4,
            Suit::Jian => 3,
        }
    }
}

/// A single tile: a suit plus a 1-based rank within that suit.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct Tile {
    suit: Suit,
    rank: u8,
}

#[derive(Error, Debug)]
pub enum TileError {
    #[error("rank {0} out of range for suit {1:?}")]
    RankOutOfRange(u8, Suit),
    #[error("cannot parse tile from {0:?}")]
    ParseError(String),
}

impl Tile {
    pub const fn new(suit: Suit, rank: u8) -> Self {
        // const fn can't cleanly return Result; callers on the hot path
        // construct via try_new and unwrap in tests/const tables.
        Tile { suit, rank }
    }

    pub fn try_new(suit: Suit, rank: u8) -> Result<Self, TileError> {
        if rank == 0 || rank > suit.num_ranks() {
            return Err(TileError::RankOutOfRange(rank, suit));
        }
        Ok(Tile { suit, rank })
    }

    pub const fn suit(self) -> Suit {
        self.suit
    }

    pub const fn rank(self) -> u8 {
        self.rank
    }

    pub const fn is_numeral(self) -> bool {
        self.suit.is_numeral()
    }

    pub const fn is_honor(self) -> bool {
        self.suit.is_honor()
    }

    pub const fn is_terminal(self) -> bool {
        self.is_numeral() && (self.rank == 1 || self.rank == 9)
    }

    pub const fn is_simple(self) -> bool {
        self.is_numeral() && self.rank != 1 && self.rank != 9
    }

    pub const fn is_dragon(self) -> bool {
        matches!(self.suit, Suit::Jian)
    }

    /// The tile one rank higher in the same suit, if it exists.
    pub fn succ(self) -> Option<Tile> {
        Tile::try_new(self.suit, self.rank + 1).ok()
    }

    /// 0-based global encoding in 0..34, used for histogram indexing.
    pub const fn encoding(self) -> u8 {
        let base = match self.suit {
            Suit::Wan => 0,
            Suit::Tiao => 9,
            Suit::Tong => 18,
            Suit::Feng => 27,
            Suit::Jian => 31,
        };
        base + (self.rank - 1)
    }

    pub fn from_encoding(e: u8) -> Option<Tile> {
        let (suit, base) = match e {
            0..=8 => (Suit::Wan, 0),
            9..=17 => (Suit::Tiao, 9),
            18..=26 => (Suit::Tong, 18),
            27..=30 => (Suit::Feng, 27),
            31..=33 => (Suit::Jian, 31),
            _ => return None,
        };
        Some(Tile { suit, rank: e - base + 1 })
    }

    const fn ordering_key(self) -> u16 {
        (self.suit.order() as u16) * 16 + self.rank as u16
    }
}

impl Ord for Tile {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.ordering_key().cmp(&other.ordering_key())
    }
}

impl PartialOrd for Tile {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suit_char = match self.suit {
            Suit::Wan => 'm',
            Suit::Tiao => 's',
            Suit::Tong => 'p',
            Suit::Feng => 'f',
            Suit::Jian => 'j',
        };
        write!(f, "{}{}", self.rank, suit_char)
    }
}

impl FromStr for Tile {
    type Err = TileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let rank_char = chars.next().ok_or_else(|| TileError::ParseError(s.to_string()))?;
        let suit_char = chars.next().ok_or_else(|| TileError::ParseError(s.to_string()))?;
        if chars.next().is_some() {
            return Err(TileError::ParseError(s.to_string()));
        }
        let rank: u8 = rank_char
            .to_digit(10)
            .ok_or_else(|| TileError::ParseError(s.to_string()))? as u8;
        let suit = match suit_char {
            'm' => Suit::Wan,
            's' => Suit::Tiao,
            'p' => Suit::Tong,
            'f' => Suit::Feng,
            'j' => Suit::Jian,
            _ => return Err(TileError::ParseError(s.to_string())),
        };
        Tile::try_new(suit, rank)
    }
}

/// All 34 kinds, in canonical (sorted) order.
pub fn all_kinds() -> impl Iterator<Item = Tile> {
    (0..34).filter_map(Tile::from_encoding)
}
