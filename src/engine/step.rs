//! The round state machine: draw, self-draw resolution, discard, claim
//! window, advance.
//!
//! Grounded on `original_source/mahjong_sim/real_mc.py::RealMCSimulation`'s
//! `simulate_round` (draw -> self-draw win check -> quad-upgrade chain ->
//! self-draw triplet formation -> discard -> claim window) combined with
//! the teacher's mutate-in-place engine step style. One deliberate
//! deviation from the source: priority-3 sequence (chi) claims are
//! strictly limited to the next seat clockwise from the discarder, rather
//! than falling through to any of the three checked seats the way the
//! source's `elif` chain does — see DESIGN.md's Open Question notes.

use std::collections::HashMap;

use crate::engine::state::{RoundOutcome, RoundState};
use crate::hand::Hand;
use crate::meld::Meld;
use crate::policy::{ClaimChoice, ClaimOptions, Policy, TableState};
use crate::seat::{other_seats_after, Seat};
use crate::tile::Tile;

enum ClaimResult {
    Terminal(RoundOutcome),
    /// A claim was taken and the claimant has already drawn, resolved any
    /// self-draw chain, and discarded; `state.current_seat`/`state.turn`
    /// are already updated.
    Handled,
    NotClaimed,
}

pub fn run_round(state: &mut RoundState, policies: &[&dyn Policy; 4]) -> RoundOutcome {
    state.deal_opening_hands();

    loop {
        if state.wall.remaining() == 0 || state.turn >= state.max_turns {
            let outcome = RoundOutcome::Draw;
            state.outcome = Some(outcome.clone());
            return outcome;
        }

        let seat = state.current_seat;
        let tile = match state.wall.draw() {
            Some(t) => t,
            None => {
                let outcome = RoundOutcome::Draw;
                state.outcome = Some(outcome.clone());
                return outcome;
            }
        };
        state.hand_mut(seat).add_tile(tile);

        if let Some(outcome) = post_draw_phase(state, policies, seat) {
            state.outcome = Some(outcome.clone());
            return outcome;
        }
    }
}

fn table_state<'a>(state: &'a RoundState, seat: Seat, last_discard: Option<(Seat, Tile)>) -> TableState<'a> {
    let discard_count: usize = state.discards.iter().map(Vec::len).sum();
    let wall_remaining = state.wall.remaining();
    let risk = discard_count as f64 / (wall_remaining as f64 + discard_count as f64).max(state.risk_floor);
    TableState {
        seat,
        hand: state.hand(seat),
        discards: &state.discards,
        wall_remaining,
        turn: state.turn,
        max_turns: state.max_turns,
        last_discard,
        risk,
        fan_min: state.fan_min,
        t_fan_threshold: state.t_fan_threshold,
    }
}

/// A discard that gets claimed (pong/gong/chi/win) leaves the discarder's
/// pile the instant it's taken, matching the spec's "grows monotonically
/// except that a tile is removed from the tail when claimed" rule. Always
/// called immediately after the claim is decided, so the claimed tile is
/// always still the pile's tail.
fn remove_claimed_discard(state: &mut RoundState, discarder: Seat, tile: Tile) {
    let pile = &mut state.discards[discarder.to_usize()];
    debug_assert_eq!(pile.last(), Some(&tile), "claimed tile must be the discard pile's tail");
    pile.pop();
}

fn winning_fan(hand: &Hand, is_self_draw: bool) -> Option<u8> {
    match crate::fan::calculate_fan(hand, is_self_draw) {
        Ok(fan) if fan > 0 => Some(fan),
        _ => None,
    }
}

fn winning_fan_on_claim(hand: &Hand, claimed: Tile) -> Option<u8> {
    let mut probe = hand.clone();
    probe.add_tile(claimed);
    winning_fan(&probe, false)
}

/// Everything that happens to `seat` after a tile lands in its hand,
/// whether from a normal draw or from drawing a kan replacement: self-draw
/// win check, quad-upgrade chain, self-draw triplet formation, discard,
/// claim window. Returns the round's outcome if it ended here.
fn post_draw_phase(state: &mut RoundState, policies: &[&dyn Policy; 4], seat: Seat) -> Option<RoundOutcome> {
    if let Some(fan) = winning_fan(state.hand(seat), true) {
        let ts = table_state(state, seat, None);
        if policies[seat.to_usize()].should_hu(&ts, fan) {
            return Some(RoundOutcome::Win { winner: seat, is_self_draw: true, fan, deal_in_seat: None });
        }
        state.missed_hu[seat.to_usize()] += 1;
    }

    if let Some(outcome) = quad_upgrade_loop(state, policies, seat) {
        return Some(outcome);
    }

    form_self_draw_triplet(state, seat);

    let ts = table_state(state, seat, None);
    let discard_tile = policies[seat.to_usize()].choose_discard(&ts);
    state
        .hand_mut(seat)
        .remove_tile(discard_tile)
        .expect("a policy must choose a tile it actually holds");
    state.discards[seat.to_usize()].push(discard_tile);

    match run_claim_window(state, policies, seat, discard_tile) {
        ClaimResult::Terminal(outcome) => Some(outcome),
        ClaimResult::Handled => None,
        ClaimResult::NotClaimed => {
            state.current_seat = seat.wrapping_add(1);
            state.turn += 1;
            None
        }
    }
}

/// Repeatedly upgrade a self-drawn triplet to a quad and draw its
/// replacement, checking for a win after each draw, until no triplet can be
/// upgraded further or the wall runs out.
fn quad_upgrade_loop(state: &mut RoundState, policies: &[&dyn Policy; 4], seat: Seat) -> Option<RoundOutcome> {
    loop {
        let tile = find_self_draw_quad_tile(state.hand(seat))?;
        state.hand_mut(seat).remove_tile(tile).expect("self-draw quad tile must be in the closed hand");
        state.hand_mut(seat).upgrade_triplet_to_quad(tile).expect("a matching triplet meld must exist");

        match state.wall.draw() {
            Some(replacement) => state.hand_mut(seat).add_tile(replacement),
            None => return Some(RoundOutcome::Draw),
        }

        if let Some(fan) = winning_fan(state.hand(seat), true) {
            let ts = table_state(state, seat, None);
            if policies[seat.to_usize()].should_hu(&ts, fan) {
                return Some(RoundOutcome::Win { winner: seat, is_self_draw: true, fan, deal_in_seat: None });
            }
            state.missed_hu[seat.to_usize()] += 1;
        }
    }
}

fn find_self_draw_quad_tile(hand: &Hand) -> Option<Tile> {
    hand.melds().iter().find_map(|m| match m {
        Meld::Triplet(t) if hand.closed_tiles().contains(t) => Some(*t),
        _ => None,
    })
}

/// If the closed hand holds three or more copies of some tile, declare the
/// lowest such tile as a concealed triplet meld. Deterministic (no policy
/// hook for this): the source always forms the triplet once available.
fn form_self_draw_triplet(state: &mut RoundState, seat: Seat) {
    let mut counts: HashMap<Tile, u32> = HashMap::new();
    for &t in state.hand(seat).closed_tiles() {
        *counts.entry(t).or_insert(0) += 1;
    }
    let tile = counts
        .iter()
        .filter(|&(_, &count)| count >= 3)
        .map(|(&t, _)| t)
        .min();

    if let Some(tile) = tile {
        let hand = state.hand_mut(seat);
        for _ in 0..3 {
            hand.remove_tile(tile).expect("counted at least 3 copies above");
        }
        hand.declare_meld(Meld::Triplet(tile), true);
    }
}

/// Priority 1 (win) then priority 2 (quad upgrade) then priority 3
/// (pong, then chi) over the three other seats in clockwise claim order.
/// The first seat in order that wants to act at a given priority level
/// takes it; ties at the same priority never happen because evaluation
/// stops at the first taker.
fn run_claim_window(
    state: &mut RoundState,
    policies: &[&dyn Policy; 4],
    discarder: Seat,
    discard_tile: Tile,
) -> ClaimResult {
    let claim_order = other_seats_after(discarder);

    for &seat in &claim_order {
        if let Some(fan) = winning_fan_on_claim(state.hand(seat), discard_tile) {
            let ts = table_state(state, seat, Some((discarder, discard_tile)));
            if policies[seat.to_usize()].should_hu(&ts, fan) {
                remove_claimed_discard(state, discarder, discard_tile);
                return ClaimResult::Terminal(RoundOutcome::Win {
                    winner: seat,
                    is_self_draw: false,
                    fan,
                    deal_in_seat: Some(discarder),
                });
            }
            state.missed_hu[seat.to_usize()] += 1;
        }
    }

    for &seat in &claim_order {
        if !state.hand(seat).can_claim_quad(discard_tile) {
            continue;
        }
        let options = ClaimOptions { can_quad: true, ..Default::default() };
        let ts = table_state(state, seat, Some((discarder, discard_tile)));
        if let Some(ClaimChoice::Quad) = policies[seat.to_usize()].decide_claim(&ts, &options) {
            remove_claimed_discard(state, discarder, discard_tile);
            state
                .hand_mut(seat)
                .upgrade_triplet_to_quad(discard_tile)
                .expect("can_claim_quad confirmed a matching triplet");

            let replacement = match state.wall.draw() {
                Some(t) => t,
                None => return ClaimResult::Terminal(RoundOutcome::Draw),
            };
            state.hand_mut(seat).add_tile(replacement);
            state.current_seat = seat;

            return match post_draw_phase(state, policies, seat) {
                Some(outcome) => ClaimResult::Terminal(outcome),
                None => ClaimResult::Handled,
            };
        }
    }

    // Priority 3: pong first, then chi (sequence claims are only ever
    // offered to the next seat, enforced when `options.sequences` is built
    // below), matching the source's per-seat pong-before-chow check.
    let next_seat = claim_order[0];
    for &seat in &claim_order {
        let can_pong = state.hand(seat).can_pong(discard_tile);
        let sequences = if seat == next_seat {
            state.hand(seat).possible_sequence_claims(discard_tile)
        } else {
            Vec::new()
        };
        if !can_pong && sequences.is_empty() {
            continue;
        }

        let options = ClaimOptions { can_pong, sequences: sequences.clone(), ..Default::default() };
        let ts = table_state(state, seat, Some((discarder, discard_tile)));
        match policies[seat.to_usize()].decide_claim(&ts, &options) {
            Some(ClaimChoice::Pong) if can_pong => {
                remove_claimed_discard(state, discarder, discard_tile);
                let hand = state.hand_mut(seat);
                hand.remove_tile(discard_tile).expect("can_pong confirmed two copies");
                hand.remove_tile(discard_tile).expect("can_pong confirmed two copies");
                hand.declare_meld(Meld::Triplet(discard_tile), false);
                state.current_seat = seat;

                return match post_draw_discardless_turn(state, policies, seat) {
                    Some(outcome) => ClaimResult::Terminal(outcome),
                    None => ClaimResult::Handled,
                };
            }
            Some(ClaimChoice::Chi(meld)) if seat == next_seat && sequences.contains(&meld) => {
                remove_claimed_discard(state, discarder, discard_tile);
                claim_sequence(state.hand_mut(seat), meld, discard_tile);
                state.current_seat = seat;

                return match post_draw_discardless_turn(state, policies, seat) {
                    Some(outcome) => ClaimResult::Terminal(outcome),
                    None => ClaimResult::Handled,
                };
            }
            _ => continue,
        }
    }

    ClaimResult::NotClaimed
}

/// Remove the two tiles from the closed hand that, with `claimed`, complete
/// `meld`, then declare the exposed sequence.
fn claim_sequence(hand: &mut Hand, meld: Meld, claimed: Tile) {
    for tile in meld.tiles() {
        if tile == claimed {
            continue;
        }
        hand.remove_tile(tile).expect("possible_sequence_claims confirmed this tile is held");
    }
    hand.declare_meld(meld, false);
}

/// A claimed pong/chi skips straight to choosing a discard (no new tile is
/// drawn for an exposed meld claim), but still passes back through the
/// claim window for its own discard.
fn post_draw_discardless_turn(state: &mut RoundState, policies: &[&dyn Policy; 4], seat: Seat) -> Option<RoundOutcome> {
    form_self_draw_triplet(state, seat);

    let ts = table_state(state, seat, None);
    let discard_tile = policies[seat.to_usize()].choose_discard(&ts);
    state
        .hand_mut(seat)
        .remove_tile(discard_tile)
        .expect("a policy must choose a tile it actually holds");
    state.discards[seat.to_usize()].push(discard_tile);

    match run_claim_window(state, policies, seat, discard_tile) {
        ClaimResult::Terminal(outcome) => Some(outcome),
        ClaimResult::Handled => None,
        ClaimResult::NotClaimed => {
            state.current_seat = seat.wrapping_add(1);
            state.turn += 1;
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seat::SEAT_0;
    use crate::wall::Wall;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Always takes any win, never claims, discards its lowest tile.
    struct PassivePolicy;

    impl Policy for PassivePolicy {
        fn name(&self) -> &'static str {
            "PASSIVE"
        }

        fn should_hu(&self, _state: &TableState, _fan: u8) -> bool {
            true
        }

        fn decide_claim(&self, _state: &TableState, _options: &ClaimOptions) -> Option<ClaimChoice> {
            None
        }

        fn choose_discard(&self, state: &TableState) -> Tile {
            *state.hand.closed_tiles().iter().min().expect("hand must hold a tile to discard")
        }
    }

    #[test]
    fn a_full_round_terminates_with_win_or_draw() {
        for seed in 0..20u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let wall = Wall::shuffled(&mut rng);
            let mut state = RoundState::new(wall, SEAT_0, 100, 100.0, 1, 3);
            let policy = PassivePolicy;
            let policies: [&dyn Policy; 4] = [&policy, &policy, &policy, &policy];
            let outcome = run_round(&mut state, &policies);
            match outcome {
                RoundOutcome::Win { fan, .. } => assert!(fan >= 1),
                RoundOutcome::Draw => {}
            }
            assert!(state.is_over());
        }
    }

    /// Declines every win, takes pong whenever legal, takes chi whenever
    /// offered the option (regardless of seat) so a claim-window bug that
    /// leaks chi eligibility to a non-next seat would actually be exercised.
    struct EagerClaimerPolicy;

    impl Policy for EagerClaimerPolicy {
        fn name(&self) -> &'static str {
            "EAGER_CLAIMER_TEST_STUB"
        }

        fn should_hu(&self, _state: &TableState, _fan: u8) -> bool {
            false
        }

        fn decide_claim(&self, _state: &TableState, options: &ClaimOptions) -> Option<ClaimChoice> {
            if options.can_pong {
                Some(ClaimChoice::Pong)
            } else if let Some(&meld) = options.sequences.first() {
                Some(ClaimChoice::Chi(meld))
            } else {
                None
            }
        }

        fn choose_discard(&self, state: &TableState) -> Tile {
            *state.hand.closed_tiles().iter().min().expect("hand must hold a tile to discard")
        }
    }

    fn blank_state() -> RoundState {
        let wall = Wall::shuffled(&mut StdRng::seed_from_u64(1));
        RoundState::new(wall, SEAT_0, 100, 100.0, 1, 3)
    }

    /// B2: a seat across the table from the discarder holds tiles that would
    /// geometrically complete a sequence with the discard, but only the next
    /// seat is ever allowed to chi. With no pong or win available either,
    /// the claim window must report `NotClaimed`.
    #[test]
    fn chi_is_never_offered_to_a_non_next_seat() {
        use crate::seat::SEAT_2;

        let mut state = blank_state();
        for &s in &["4s", "6s"] {
            state.hand_mut(SEAT_2).add_tile(s.parse().unwrap());
        }

        let policy = EagerClaimerPolicy;
        let policies: [&dyn Policy; 4] = [&policy, &policy, &policy, &policy];
        let discard: Tile = "5s".parse().unwrap();
        state.discards[SEAT_0.to_usize()].push(discard);

        match run_claim_window(&mut state, &policies, SEAT_0, discard) {
            ClaimResult::NotClaimed => {}
            _ => panic!("the across seat must never be offered a chi"),
        }
        assert!(!state.hand(SEAT_2).melds().iter().any(|m| m.is_sequence()));
    }

    /// B3: when a discard completes both a winning hand for one seat and a
    /// gong upgrade for another, the win is taken and the gong never fires,
    /// because the win-priority loop runs to completion before gong claims
    /// are even considered.
    #[test]
    fn win_claim_outranks_a_simultaneous_gong_claim() {
        use crate::seat::{SEAT_2, SEAT_3};

        let mut state = blank_state();
        let discard: Tile = "2s".parse().unwrap();
        state.discards[SEAT_0.to_usize()].push(discard);

        // Seat 2 (across) holds an existing triplet of the discard tile and
        // would gladly upgrade it to a quad.
        state.hand_mut(SEAT_2).declare_meld(Meld::Triplet(discard), false);

        // Seat 3 (previous) is one tile from a complete hand, waiting on the
        // discard to complete the pair.
        for &s in &["1m", "2m", "3m", "4m", "5m", "6m", "7m", "8m", "9m", "1s", "1s", "1s", "2s"] {
            state.hand_mut(SEAT_3).add_tile(s.parse().unwrap());
        }

        struct AlwaysWinAlwaysQuad;
        impl Policy for AlwaysWinAlwaysQuad {
            fn name(&self) -> &'static str {
                "ALWAYS_WIN_ALWAYS_QUAD_TEST_STUB"
            }
            fn should_hu(&self, _state: &TableState, _fan: u8) -> bool {
                true
            }
            fn decide_claim(&self, _state: &TableState, options: &ClaimOptions) -> Option<ClaimChoice> {
                if options.can_quad {
                    Some(ClaimChoice::Quad)
                } else {
                    None
                }
            }
            fn choose_discard(&self, state: &TableState) -> Tile {
                *state.hand.closed_tiles().iter().min().expect("hand must hold a tile to discard")
            }
        }

        let policy = AlwaysWinAlwaysQuad;
        let policies: [&dyn Policy; 4] = [&policy, &policy, &policy, &policy];

        match run_claim_window(&mut state, &policies, SEAT_0, discard) {
            ClaimResult::Terminal(RoundOutcome::Win { winner, is_self_draw, .. }) => {
                assert_eq!(winner, SEAT_3);
                assert!(!is_self_draw);
            }
            other => panic!("expected seat 3's win claim to win arbitration, got a different result: {}", matches_name(&other)),
        }
        // Seat 2's triplet must still be a triplet: the gong claim never executed.
        assert_eq!(state.hand(SEAT_2).melds(), &[Meld::Triplet(discard)]);
    }

    /// I3: a discard claimed via pong must leave the discarder's pile; the
    /// pile only grows monotonically for discards nobody claims.
    #[test]
    fn a_claimed_discard_is_removed_from_the_discard_pile() {
        use crate::seat::SEAT_1;

        let mut state = blank_state();
        let discard: Tile = "9m".parse().unwrap();
        state.discards[SEAT_0.to_usize()].push(discard);
        state.hand_mut(SEAT_1).add_tile(discard);
        state.hand_mut(SEAT_1).add_tile(discard);

        let policy = EagerClaimerPolicy;
        let policies: [&dyn Policy; 4] = [&policy, &policy, &policy, &policy];

        match run_claim_window(&mut state, &policies, SEAT_0, discard) {
            ClaimResult::Terminal(_) | ClaimResult::Handled => {}
            ClaimResult::NotClaimed => panic!("seat 1 holds a pair and must take the pong"),
        }
        assert!(!state.discards[SEAT_0.to_usize()].contains(&discard));
    }

    fn matches_name(result: &ClaimResult) -> &'static str {
        match result {
            ClaimResult::Terminal(_) => "Terminal",
            ClaimResult::Handled => "Handled",
            ClaimResult::NotClaimed => "NotClaimed",
        }
    }

    /// B1: drawing the fourth copy of a tile already held as a triplet
    /// upgrades that meld to a quad and draws a replacement, on the
    /// self-draw path, without the policy being consulted at all (quad
    /// formation is deterministic once a win is declined).
    #[test]
    fn self_drawn_fourth_copy_upgrades_the_triplet_to_a_quad() {
        let mut state = blank_state();
        let seat = state.current_seat;
        let quad_tile: Tile = "9m".parse().unwrap();

        state.hand_mut(seat).declare_meld(Meld::Triplet(quad_tile), true);
        state.hand_mut(seat).add_tile(quad_tile);
        state.hand_mut(seat).add_tile("1m".parse().unwrap());

        let wall_before = state.wall.remaining();

        struct DeclineEverything;
        impl Policy for DeclineEverything {
            fn name(&self) -> &'static str {
                "DECLINE_EVERYTHING_TEST_STUB"
            }
            fn should_hu(&self, _state: &TableState, _fan: u8) -> bool {
                false
            }
            fn decide_claim(&self, _state: &TableState, _options: &ClaimOptions) -> Option<ClaimChoice> {
                None
            }
            fn choose_discard(&self, state: &TableState) -> Tile {
                *state.hand.closed_tiles().iter().min().expect("hand must hold a tile to discard")
            }
        }

        let policy = DeclineEverything;
        let policies: [&dyn Policy; 4] = [&policy, &policy, &policy, &policy];

        let outcome = quad_upgrade_loop(&mut state, &policies, seat);

        assert!(outcome.is_none(), "this hand is never actually winning, so the loop must run out of quads, not terminate");
        assert_eq!(state.hand(seat).melds(), &[Meld::Quad(quad_tile)]);
        assert!(!state.hand(seat).closed_tiles().contains(&quad_tile));
        assert_eq!(state.wall.remaining(), wall_before - 1, "exactly one replacement tile must have been drawn");
    }
}
