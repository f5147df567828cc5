//! Fan (score multiplier) catalog for a winning hand.

use crate::analysis::{decompose, Decomposition};
use crate::error::AnalyzerError;
use crate::hand::Hand;
use crate::meld::Meld;
use crate::tile::{Suit, Tile};

const MAX_FAN: u8 = 16;

/// Total fan for a winning hand, or `0` if the hand does not actually form
/// a valid four-melds-plus-pair decomposition (matching the source's
/// "invalid hand" return rather than an error, since callers are expected
/// to have already confirmed a win before pricing it).
pub fn calculate_fan(hand: &Hand, is_self_draw: bool) -> Result<u8, AnalyzerError> {
    let all_tiles = hand.all_tiles();
    let decomposition = match decompose(&all_tiles)? {
        Some(d) => d,
        None => return Ok(0),
    };

    let analysis = analyze_melds(hand, &decomposition);
    let mut fan: u16 = 0;

    if is_self_draw {
        fan += 1;
    }
    if hand.melds().is_empty() {
        fan += 1;
    }
    if is_all_simples(&all_tiles) {
        fan += 1;
    }
    if analysis.triplets.len() == 4 && analysis.sequences.is_empty() {
        fan += 2;
    }
    if has_mixed_triple_sequence(&analysis.sequences) {
        fan += 2;
    }
    fan += is_pure_flush(&all_tiles, hand.melds().is_empty());
    fan += is_little_dragons(hand, &decomposition);

    let quad_count = hand.melds().iter().filter(|m| m.is_quad()).count() as u16;
    fan += quad_count;

    if fan == 0 {
        fan = 1;
    }
    Ok(fan.min(MAX_FAN as u16) as u8)
}

struct MeldAnalysis {
    /// Deduplicated key tiles of every triplet-shaped meld (a quad's first
    /// three tiles count as a triplet here too, matching the source).
    triplets: Vec<Tile>,
    /// Base tile of every sequence meld (not deduplicated; grouping code
    /// below only cares about multiset membership per rank).
    sequences: Vec<Tile>,
}

fn analyze_melds(hand: &Hand, decomposition: &Decomposition) -> MeldAnalysis {
    let mut triplets = Vec::new();
    let mut sequences = Vec::new();

    for meld in hand.melds().iter().chain(decomposition.melds.iter()) {
        match meld {
            Meld::Triplet(t) | Meld::Quad(t) => {
                if !triplets.contains(t) {
                    triplets.push(*t);
                }
            }
            Meld::Sequence(t) => sequences.push(*t),
        }
    }

    MeldAnalysis { triplets, sequences }
}

fn is_all_simples(tiles: &[Tile]) -> bool {
    !tiles.is_empty() && tiles.iter().all(|t| t.is_simple())
}

fn has_mixed_triple_sequence(sequences: &[Tile]) -> bool {
    use std::collections::HashMap;
    let mut by_rank: HashMap<u8, Vec<Suit>> = HashMap::new();
    for &base in sequences {
        by_rank.entry(base.rank()).or_default().push(base.suit());
    }
    by_rank.values().any(|suits| {
        suits.contains(&Suit::Wan) && suits.contains(&Suit::Tiao) && suits.contains(&Suit::Tong)
    })
}

fn is_pure_flush(tiles: &[Tile], is_concealed: bool) -> u16 {
    if tiles.is_empty() || tiles.iter().any(|t| t.is_honor()) {
        return 0;
    }
    let first_suit = tiles[0].suit();
    let single_suit = tiles.iter().all(|t| t.suit() == first_suit);
    if single_suit {
        if is_concealed {
            6
        } else {
            4
        }
    } else {
        0
    }
}

/// Two dragon triplets plus a pair of the remaining dragon.
///
/// Matches the source exactly: this does **not** additionally require the
/// hand's fourth meld to be a non-dragon group (Open Question #2, see
/// DESIGN.md) — a hand of three dragon triplets plus a dragon pair still
/// qualifies, which a stricter reading of "little dragons" would reject.
fn is_little_dragons(hand: &Hand, decomposition: &Decomposition) -> u16 {
    let dragon_triplets: Vec<Tile> = hand
        .melds()
        .iter()
        .chain(decomposition.melds.iter())
        .filter_map(|m| match m {
            Meld::Triplet(t) | Meld::Quad(t) if t.is_dragon() => Some(*t),
            _ => None,
        })
        .collect();

    let mut unique_dragon_triplets = dragon_triplets.clone();
    unique_dragon_triplets.sort();
    unique_dragon_triplets.dedup();

    if unique_dragon_triplets.len() != 2 {
        return 0;
    }
    if !decomposition.pair.is_dragon() {
        return 0;
    }
    if unique_dragon_triplets.contains(&decomposition.pair) {
        return 0;
    }

    if hand.melds().is_empty() {
        6
    } else {
        4
    }
}
