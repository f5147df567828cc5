//! A player's hand: closed tiles plus declared melds.

use crate::error::HandError;
use crate::meld::Meld;
use crate::tile::Tile;

#[derive(Clone, Debug, Default)]
pub struct Hand {
    /// Closed (concealed, in-hand) tiles, kept sorted.
    closed: Vec<Tile>,
    /// Declared melds in declaration order.
    melds: Vec<Meld>,
    /// Which entries of `melds` are concealed (self-drawn quads), for the
    /// fan calculator's "concealed hand" bonus.
    concealed_melds: Vec<bool>,
}

impl Hand {
    pub fn new() -> Self {
        Hand::default()
    }

    pub fn closed_tiles(&self) -> &[Tile] {
        &self.closed
    }

    pub fn melds(&self) -> &[Meld] {
        &self.melds
    }

    pub fn is_meld_concealed(&self, index: usize) -> bool {
        self.concealed_melds[index]
    }

    /// Every tile counted toward the hand's 13/14-tile shape: closed tiles
    /// plus the tiles making up every declared meld. A quad still counts as
    /// a 3-tile group here, the same as the triplet it was upgraded from —
    /// its 4th tile is a bonus draw replacement, not part of the hand shape
    /// the decomposer or fan calculator reason about.
    pub fn all_tiles(&self) -> Vec<Tile> {
        let mut tiles = self.closed.clone();
        for meld in &self.melds {
            match meld {
                Meld::Quad(t) => tiles.extend([*t, *t, *t]),
                other => tiles.extend(other.tiles()),
            }
        }
        tiles
    }

    pub fn add_tile(&mut self, tile: Tile) {
        let pos = self.closed.partition_point(|&t| t < tile);
        self.closed.insert(pos, tile);
    }

    pub fn remove_tile(&mut self, tile: Tile) -> Result<(), HandError> {
        let pos = self.closed.iter().position(|&t| t == tile).ok_or(HandError::TileNotInHand(tile))?;
        self.closed.remove(pos);
        Ok(())
    }

    /// Declare a meld taken from the closed hand (self-drawn triplet/quad
    /// or an already-built sequence) or from a claimed discard. `concealed`
    /// marks it for the fan calculator's concealed-hand bonus.
    pub fn declare_meld(&mut self, meld: Meld, concealed: bool) {
        self.melds.push(meld);
        self.concealed_melds.push(concealed);
    }

    /// Upgrade an existing exposed or concealed triplet meld of `tile` to a
    /// quad, consuming the 4th tile from the closed hand if present there
    /// (self-draw/claim both call this after locating the 4th tile).
    pub fn upgrade_triplet_to_quad(&mut self, tile: Tile) -> Result<(), HandError> {
        let index = self
            .melds
            .iter()
            .position(|m| matches!(m, Meld::Triplet(t) if *t == tile))
            .ok_or(HandError::NoTripletToUpgrade(tile))?;
        self.melds[index] = Meld::Quad(tile);
        Ok(())
    }

    /// Can this hand claim `tile` from a discard to form a triplet?
    pub fn can_pong(&self, tile: Tile) -> bool {
        self.closed.iter().filter(|&&t| t == tile).count() >= 2
    }

    /// Index of a triplet meld that can be upgraded to a quad using `tile`
    /// (claimed from discard), if any.
    pub fn can_claim_quad(&self, tile: Tile) -> bool {
        self.melds.iter().any(|m| matches!(m, Meld::Triplet(t) if *t == tile))
    }

    /// Self-draw quad upgrade: do we hold a triplet meld whose 4th tile
    /// just got drawn?
    pub fn can_self_draw_quad(&self, tile: Tile) -> bool {
        self.can_claim_quad(tile) && self.closed.contains(&tile)
    }

    /// All possible sequence claims on `tile` (discarded by the previous
    /// seat only — enforced by the caller, not here; this predicate is
    /// purely about tile availability).
    pub fn possible_sequence_claims(&self, tile: Tile) -> Vec<Meld> {
        if !tile.is_numeral() {
            return vec![];
        }
        let mut out = Vec::new();
        let has = |t: Tile| self.closed.contains(&t);
        // discard as high tile of the sequence: (tile-2, tile-1, tile)
        if let (Some(m2), Some(m1)) = (pred(tile, 2), pred(tile, 1)) {
            if has(m2) && has(m1) {
                out.push(Meld::Sequence(m2));
            }
        }
        // discard as middle tile: (tile-1, tile, tile+1)
        if let (Some(m1), Some(p1)) = (pred(tile, 1), tile.succ()) {
            if has(m1) && has(p1) {
                out.push(Meld::Sequence(m1));
            }
        }
        // discard as low tile: (tile, tile+1, tile+2)
        if let (Some(p1), Some(p2)) = (tile.succ(), tile.succ().and_then(|t| t.succ())) {
            if has(p1) && has(p2) {
                out.push(Meld::Sequence(tile));
            }
        }
        out
    }
}

fn pred(tile: Tile, n: u8) -> Option<Tile> {
    let target_rank = tile.rank().checked_sub(n)?;
    crate::tile::Tile::try_new(tile.suit(), target_rank).ok()
}
