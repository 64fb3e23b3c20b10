// Individual pick representation: history records and recommendations.

use serde::Serialize;
use std::fmt;

use crate::card::{Card, Category};

/// A single pick in the draft history. Holds everything needed to reverse it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickRecord {
    /// Turn pointer value when the pick was made.
    pub pick_index: usize,
    /// 0-based index of the player who received the card.
    pub player_idx: usize,
    pub category: Category,
    /// Index the card occupied in its available pool before the pick.
    pub pool_position: usize,
    pub card: Card,
}

impl PickRecord {
    /// 1-based seat number, as shown to players.
    pub fn seat(&self) -> usize {
        self.player_idx + 1
    }
}

/// The engine's suggested pick for the player on the clock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub category: Category,
    pub name: String,
    /// Weighted score of the recommended card.
    pub card_score: f64,
    /// Value above the expected replacement; may be negative.
    pub opportunity_cost: f64,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): score {:.2}, value above replacement {:+.2}",
            self.name, self.category, self.card_score, self.opportunity_cost
        )
    }
}
