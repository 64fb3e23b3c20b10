// Tier scoring: turn discrete tier labels into numeric card values.
//
// Each tier has a fixed base score. In "varied" mode cards sharing a tier are
// spread symmetrically around that base by their position in the pool, so the
// first-listed card of a tier scores highest.

use serde::Deserialize;

use crate::card::{Card, TIER_ORDER};

/// Total width of the within-tier spread in varied mode (±0.25).
pub const VARIED_SPREAD: f64 = 0.5;

/// How card values are derived from tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierScoring {
    /// Every card in a tier gets exactly the tier's base score.
    Same,
    /// Cards in a tier are spread around the base score by pool position.
    #[default]
    Varied,
}

impl TierScoring {
    pub fn spread(&self) -> f64 {
        match self {
            TierScoring::Same => 0.0,
            TierScoring::Varied => VARIED_SPREAD,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TierScoring::Same => "same",
            TierScoring::Varied => "varied",
        }
    }
}

/// Offset from the tier base for the card at `idx` of a tier holding `n`
/// cards. Zero for single-card tiers.
fn sub_offset(idx: usize, n: usize, spread: f64) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    let n = n as f64;
    let i = idx as f64;
    ((n - 1.0 - 2.0 * i) / (2.0 * (n - 1.0))) * spread
}

/// Compute values for `cards` without mutating them. The result is parallel
/// to the input slice.
pub fn scored_values(cards: &[Card], scoring: TierScoring) -> Vec<f64> {
    let spread = scoring.spread();
    let mut values = vec![0.0; cards.len()];

    for &tier in TIER_ORDER {
        let members: Vec<usize> = cards
            .iter()
            .enumerate()
            .filter(|(_, c)| c.tier == tier)
            .map(|(i, _)| i)
            .collect();
        let n = members.len();
        for (rank, &card_idx) in members.iter().enumerate() {
            let value = tier.base_score() + sub_offset(rank, n, spread);
            values[card_idx] = value.max(0.0);
        }
    }

    values
}

/// Assign a value to every card in a single pool (all leaders, or all lore).
pub fn assign_values(cards: &mut [Card], scoring: TierScoring) {
    let values = scored_values(cards, scoring);
    for (card, value) in cards.iter_mut().zip(values) {
        card.value = value;
    }
}
