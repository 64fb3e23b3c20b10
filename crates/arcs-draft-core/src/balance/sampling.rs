// Random pool sampling under a tier constraint.

use std::collections::BTreeMap;

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use serde::Deserialize;

use crate::card::{Card, Tier};

/// How the tiers of a sampled pool relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierConstraint {
    /// No restriction.
    #[default]
    Any,
    /// Every sampled card shares one tier.
    Same,
    /// Every sampled card comes from a different tier.
    Unique,
}

impl TierConstraint {
    pub fn label(&self) -> &'static str {
        match self {
            TierConstraint::Any => "any",
            TierConstraint::Same => "same",
            TierConstraint::Unique => "unique",
        }
    }
}

/// Indices into `cards`, grouped by tier, each group in list order.
fn group_by_tier(cards: &[Card]) -> BTreeMap<Tier, Vec<usize>> {
    let mut groups: BTreeMap<Tier, Vec<usize>> = BTreeMap::new();
    for (idx, card) in cards.iter().enumerate() {
        groups.entry(card.tier).or_default().push(idx);
    }
    groups
}

/// Draw `count` cards from `cards` honoring `constraint`.
///
/// The selection is random but the returned cards keep their relative order
/// in `cards`, so rescoring a drawn pool ranks ties within a tier the way the
/// source list does.
///
/// Returns `None` when the constraint cannot be met: fewer than `count`
/// cards overall, no single tier with `count` members (`Same`), or fewer
/// than `count` distinct tiers (`Unique`).
pub fn pick_with_constraint<R: Rng + ?Sized>(
    cards: &[Card],
    count: usize,
    constraint: TierConstraint,
    rng: &mut R,
) -> Option<Vec<Card>> {
    if cards.len() < count {
        return None;
    }

    let mut chosen: Vec<usize> = match constraint {
        TierConstraint::Any => {
            let mut indices: Vec<usize> = (0..cards.len()).collect();
            indices.shuffle(rng);
            indices.truncate(count);
            indices
        }
        TierConstraint::Same => {
            let groups = group_by_tier(cards);
            let eligible: Vec<&Vec<usize>> =
                groups.values().filter(|g| g.len() >= count).collect();
            let mut indices = (*eligible.choose(rng)?).clone();
            indices.shuffle(rng);
            indices.truncate(count);
            indices
        }
        TierConstraint::Unique => {
            let groups = group_by_tier(cards);
            if groups.len() < count {
                return None;
            }
            let mut tiers: Vec<Tier> = groups.keys().copied().collect();
            tiers.shuffle(rng);
            tiers
                .into_iter()
                .take(count)
                .map(|tier| groups[&tier].choose(rng).copied())
                .collect::<Option<Vec<usize>>>()?
        }
    };

    chosen.sort_unstable();
    Some(chosen.into_iter().map(|idx| cards[idx].clone()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn cards() -> Vec<Card> {
        vec![
            Card::new("a1", Tier::A),
            Card::new("a2", Tier::A),
            Card::new("a3", Tier::A),
            Card::new("b1", Tier::B),
            Card::new("b2", Tier::B),
            Card::new("c1", Tier::C),
            Card::new("s1", Tier::S),
        ]
    }

    #[test]
    fn any_draws_distinct_cards() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let drawn = pick_with_constraint(&cards(), 4, TierConstraint::Any, &mut rng).unwrap();
            assert_eq!(drawn.len(), 4);
            let names: HashSet<_> = drawn.iter().map(|c| c.name.clone()).collect();
            assert_eq!(names.len(), 4);
        }
    }

    #[test]
    fn same_draws_from_one_tier() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let drawn = pick_with_constraint(&cards(), 2, TierConstraint::Same, &mut rng).unwrap();
            assert_eq!(drawn.len(), 2);
            assert!(drawn.iter().all(|c| c.tier == drawn[0].tier));
            assert!(drawn[0].tier == Tier::A || drawn[0].tier == Tier::B);
        }
        // Only tier A has three cards.
        let drawn = pick_with_constraint(&cards(), 3, TierConstraint::Same, &mut rng).unwrap();
        assert!(drawn.iter().all(|c| c.tier == Tier::A));
    }

    #[test]
    fn unique_draws_distinct_tiers() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let drawn =
                pick_with_constraint(&cards(), 4, TierConstraint::Unique, &mut rng).unwrap();
            let tiers: HashSet<Tier> = drawn.iter().map(|c| c.tier).collect();
            assert_eq!(tiers.len(), 4);
        }
    }

    #[test]
    fn infeasible_constraints_return_none() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(pick_with_constraint(&cards(), 8, TierConstraint::Any, &mut rng).is_none());
        assert!(pick_with_constraint(&cards(), 4, TierConstraint::Same, &mut rng).is_none());
        assert!(pick_with_constraint(&cards(), 5, TierConstraint::Unique, &mut rng).is_none());
    }

    #[test]
    fn drawn_cards_keep_list_order() {
        let source = cards();
        let position = |name: &str| source.iter().position(|c| c.name == name).unwrap();
        let mut rng = StdRng::seed_from_u64(21);
        for constraint in [TierConstraint::Any, TierConstraint::Same, TierConstraint::Unique] {
            for _ in 0..20 {
                let drawn = pick_with_constraint(&source, 2, constraint, &mut rng).unwrap();
                assert!(
                    position(&drawn[0].name) < position(&drawn[1].name),
                    "{constraint:?}: {} before {}",
                    drawn[0].name,
                    drawn[1].name
                );
            }
        }
    }
}
