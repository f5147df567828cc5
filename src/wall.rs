//! The 136-tile wall: shuffled construction and sequential draw.
//!
//! Unlike a button-relative static deal layout, this variant deals by
//! repeated draws from a shuffled deck and tracks remaining count with a
//! cursor, matching the table-top procedure in the original source.

use rand::Rng;

use crate::tile::{all_kinds, Tile};

pub const WALL_SIZE: usize = 136;

pub struct Wall {
    tiles: Vec<Tile>,
    cursor: usize,
}

impl Wall {
    /// Build a full 136-tile deck (34 kinds x 4 copies) and shuffle it with
    /// the given RNG. The caller owns the RNG so no global random state is
    /// ever touched (spec design note: "No global random state").
    pub fn shuffled(rng: &mut impl Rng) -> Self {
        let mut tiles: Vec<Tile> = all_kinds().flat_map(|t| std::iter::repeat(t).take(4)).collect();
        debug_assert_eq!(tiles.len(), WALL_SIZE);
        for i in (1..tiles.len()).rev() {
            let j = rng.gen_range(0..=i);
            tiles.swap(i, j);
        }
        Wall { tiles, cursor: 0 }
    }

    /// Draw the next tile from the head of the wall, or `None` if exhausted.
    pub fn draw(&mut self) -> Option<Tile> {
        let tile = self.tiles.get(self.cursor).copied();
        if tile.is_some() {
            self.cursor += 1;
        }
        tile
    }

    pub fn remaining(&self) -> usize {
        self.tiles.len() - self.cursor
    }
}
