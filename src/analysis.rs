//! Hand analyzer: decomposes a tile multiset into four melds plus a pair.
//!
//! Mirrors the search order of the original winning-pattern check: try each
//! tile with at least two copies as the pair, then greedily consume the
//! lowest remaining tile as a triplet before a sequence, recursing until
//! four melds are found or the branch dead-ends.

use crate::error::AnalyzerError;
use crate::meld::Meld;
use crate::tile::Tile;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Decomposition {
    pub pair: Tile,
    pub melds: Vec<Meld>,
}

/// Decompose `tiles` into a pair plus four melds.
///
/// The input must be a complete hand snapshot (closed tiles plus the tiles
/// of any already-declared melds) of size 13 or 14; anything else is a
/// sizing bug upstream and is reported rather than silently handled, since a
/// masked invariant violation would quietly bias the statistics this
/// simulator exists to produce. A 13-tile hand can never actually satisfy
/// 4 melds + 1 pair (12 + 2 = 14), so passing one simply yields `Ok(None)`.
pub fn decompose(tiles: &[Tile]) -> Result<Option<Decomposition>, AnalyzerError> {
    let n = tiles.len();
    if n != 13 && n != 14 {
        return Err(AnalyzerError::WrongHandSize(n));
    }
    let mut sorted = tiles.to_vec();
    sorted.sort();

    let mut pair_candidates: Vec<Tile> = sorted.clone();
    pair_candidates.dedup();

    for pair_tile in pair_candidates {
        if sorted.iter().filter(|&&t| t == pair_tile).count() < 2 {
            continue;
        }
        let mut remaining = sorted.clone();
        remove_one(&mut remaining, pair_tile);
        remove_one(&mut remaining, pair_tile);
        if let Some(melds) = form_melds_recursive(&remaining, Vec::new()) {
            if melds.len() == 4 {
                return Ok(Some(Decomposition { pair: pair_tile, melds }));
            }
        }
    }
    Ok(None)
}

pub fn is_winning(tiles: &[Tile]) -> Result<bool, AnalyzerError> {
    Ok(decompose(tiles)?.is_some())
}

/// General recursive meld search, kept permissive (stops as soon as four
/// melds are collected, even with tiles left over) so it can be exercised
/// directly against crafted partial hands in tests without tripping the
/// strict size check on the public entry point above.
pub(crate) fn form_melds_recursive(tiles: &[Tile], current_melds: Vec<Meld>) -> Option<Vec<Meld>> {
    if current_melds.len() == 4 {
        return Some(current_melds);
    }
    if tiles.len() < 3 {
        return None;
    }

    let first = tiles[0];
    let count = tiles.iter().filter(|&&t| t == first).count();

    if count >= 3 {
        let mut remaining = tiles.to_vec();
        remove_one(&mut remaining, first);
        remove_one(&mut remaining, first);
        remove_one(&mut remaining, first);
        let mut melds = current_melds.clone();
        melds.push(Meld::Triplet(first));
        if let Some(result) = form_melds_recursive(&remaining, melds) {
            return Some(result);
        }
    }

    if first.is_numeral() {
        if let (Some(n1), Some(n2)) = (first.succ(), first.succ().and_then(|t| t.succ())) {
            if tiles.contains(&n1) && tiles.contains(&n2) {
                let mut remaining = tiles.to_vec();
                remove_one(&mut remaining, first);
                remove_one(&mut remaining, n1);
                remove_one(&mut remaining, n2);
                let mut melds = current_melds;
                melds.push(Meld::Sequence(first));
                if let Some(result) = form_melds_recursive(&remaining, melds) {
                    return Some(result);
                }
            }
        }
    }

    None
}

fn remove_one(tiles: &mut Vec<Tile>, tile: Tile) {
    if let Some(pos) = tiles.iter().position(|&t| t == tile) {
        tiles.remove(pos);
    }
}
