/// Property-based tests for pairing and elimination invariants using proptest
///
/// These tests verify that random pairing draws never violate the round's
/// bookkeeping across a wide range of entrant fields and play orders.
use std::collections::{HashMap, HashSet};

use knockout::{DynamicElimination, Pairing, RoundInspection, RoundManagement};
use proptest::prelude::*;

// Strategy to generate a field of unique entrant names
fn field_strategy(min: usize, max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set("[a-z]{3,8}", min..=max)
        .prop_map(|set| set.into_iter().collect())
}

fn seeded_round(entrants: &[String], seed: u64) -> DynamicElimination<String> {
    let mut round = DynamicElimination::with_seed(seed);
    for entrant in entrants {
        round.add_entrant(entrant.clone()).unwrap();
    }
    round
}

#[test]
fn test_first_draw_selects_entrants_with_equal_frequency() {
    const TRIALS: usize = 10_000;
    let names = ["a", "b", "c", "d"];

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for trial in 0..TRIALS {
        let mut round = DynamicElimination::with_seed(trial as u64);
        for &name in &names {
            round.add_entrant(name).unwrap();
        }

        let pairing = round.next_pairing().unwrap();
        *counts.entry(*pairing.first()).or_default() += 1;
        *counts.entry(*pairing.second()).or_default() += 1;
    }

    // Each of the four entrants lands in the two-member pairing half of
    // the time.
    let expected = TRIALS / 2;
    for (name, count) in counts {
        let deviation = count.abs_diff(expected) as f64 / expected as f64;
        assert!(deviation < 0.1, "{name} drawn off-frequency by {deviation}");
    }
}

proptest! {
    #[test]
    fn test_pairing_equality_ignores_order(
        a in "[a-z]{3,8}",
        b in "[A-Z]{3,8}",
    ) {
        let forward = Pairing::new(a.clone(), b.clone());
        let backward = Pairing::new(b.clone(), a.clone());
        prop_assert_eq!(&forward, &backward);

        let mut set = HashSet::new();
        set.insert(forward);
        prop_assert!(set.contains(&backward));
    }

    #[test]
    fn test_drawn_pairings_never_overlap(
        entrants in field_strategy(4, 24),
        seed in any::<u64>(),
    ) {
        let mut round = seeded_round(&entrants, seed);

        let mut seen = HashSet::new();
        while let Ok(pairing) = round.next_pairing() {
            // No entrant plays in two pairings at once.
            prop_assert!(seen.insert(pairing.first().clone()));
            prop_assert!(seen.insert(pairing.second().clone()));
            prop_assert!(!round.is_pending(pairing.first()));
            prop_assert!(!round.is_pending(pairing.second()));
        }

        // At most one entrant can be left over.
        prop_assert!(entrants.len() - seen.len() <= 1);
    }

    #[test]
    fn test_entrants_are_conserved_through_play(
        entrants in field_strategy(4, 24),
        seed in any::<u64>(),
    ) {
        let mut round = seeded_round(&entrants, seed);

        while let Ok(pairing) = round.next_pairing() {
            let winner = pairing.first().clone();
            round.declare_pairing_winner(&winner, &pairing).unwrap();

            // Every entrant is pending, paired, or decided at all times.
            let accounted = round.pending_entrants().len()
                + round.active_pairings().len() * 2
                + round.advanced_entrants().len()
                + round.eliminated_entrants().len();
            prop_assert_eq!(accounted, entrants.len());
        }

        prop_assert_eq!(
            round.advanced_entrants().len() + round.eliminated_entrants().len()
                + round.pending_entrants().len(),
            entrants.len()
        );
        // A pairing produces exactly one winner and one loser.
        prop_assert_eq!(
            round.advanced_entrants().len(),
            round.eliminated_entrants().len()
        );
    }

    #[test]
    fn test_same_seed_reproduces_the_draw(
        entrants in field_strategy(4, 16),
        seed in any::<u64>(),
    ) {
        let mut left = seeded_round(&entrants, seed);
        let mut right = seeded_round(&entrants, seed);

        loop {
            match (left.next_pairing(), right.next_pairing()) {
                (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
                (Err(a), Err(b)) => {
                    prop_assert_eq!(a, b);
                    break;
                }
                (a, b) => prop_assert!(false, "draws diverged: {:?} vs {:?}", a, b),
            }
        }
    }

    #[test]
    fn test_replay_restores_the_pre_result_state(
        entrants in field_strategy(4, 16),
        seed in any::<u64>(),
        winner_first in any::<bool>(),
    ) {
        let mut round = seeded_round(&entrants, seed);

        let pairing = round.next_pairing().unwrap();
        let winner = if winner_first {
            pairing.first().clone()
        } else {
            pairing.second().clone()
        };
        round.declare_winner(&winner).unwrap();
        prop_assert!(round.has_result(&winner));

        prop_assert_eq!(round.replay_pairing(&pairing), Ok(true));

        // Both entrants are back in an undecided active pairing.
        prop_assert!(!round.has_result(pairing.first()));
        prop_assert!(!round.has_result(pairing.second()));
        prop_assert!(round.is_paired(pairing.first()));
        prop_assert!(round.is_paired(pairing.second()));
        prop_assert!(round.finished_pairings().is_empty());
    }

    #[test]
    fn test_reset_returns_paired_entrants_to_pending(
        entrants in field_strategy(4, 16),
        seed in any::<u64>(),
    ) {
        let mut round = seeded_round(&entrants, seed);

        let pairing = round.next_pairing().unwrap();
        let reset = pairing.first().clone();
        prop_assert_eq!(round.reset_entrant(&reset), Ok(true));

        // The reset entrant goes back to pending, the opponent too.
        prop_assert!(round.is_pending(&reset));
        prop_assert!(round.is_pending(pairing.second()));
        prop_assert!(round.active_pairings().is_empty());
    }

    #[test]
    fn test_removal_and_readmission_is_lossless(
        entrants in field_strategy(4, 16),
        seed in any::<u64>(),
    ) {
        let mut round = seeded_round(&entrants, seed);

        let pairing = round.next_pairing().unwrap();
        let winner = pairing.first().clone();
        round.declare_winner(&winner).unwrap();

        let before = round.advanced_entrants();
        prop_assert!(round.remove_entrant(&winner));
        prop_assert_eq!(round.add_entrant(winner), Ok(true));
        prop_assert_eq!(round.advanced_entrants(), before);
        prop_assert_eq!(round.entrants().len(), entrants.len());
    }
}
