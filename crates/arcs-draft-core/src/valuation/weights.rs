// Weighted scoring: scale tier values by a per-category multiplier so leader
// and lore picks can be compared on one axis.

use serde::Serialize;

use crate::card::{Card, Category};
use crate::config::DraftSettings;
use crate::draft::state::Player;

/// Weighted score of a single card drafted as `category`.
pub fn weighted_score(card: &Card, category: Category, settings: &DraftSettings) -> f64 {
    card.value * settings.weight(category)
}

/// Leader score plus all lore scores for one player.
pub fn player_total_score(player: &Player, settings: &DraftSettings) -> f64 {
    score_breakdown(player, settings).total
}

/// Per-player score split by category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub leader: f64,
    pub lore: f64,
    pub total: f64,
}

pub fn score_breakdown(player: &Player, settings: &DraftSettings) -> ScoreBreakdown {
    let leader = player
        .leader
        .as_ref()
        .map(|c| weighted_score(c, Category::Leader, settings))
        .unwrap_or(0.0);
    let lore: f64 = player
        .lore
        .iter()
        .map(|c| weighted_score(c, Category::Lore, settings))
        .sum();
    ScoreBreakdown {
        leader,
        lore,
        total: leader + lore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Tier;

    fn scored(name: &str, value: f64) -> Card {
        Card {
            name: name.into(),
            tier: Tier::A,
            value,
        }
    }

    #[test]
    fn weights_apply_per_category() {
        let settings = DraftSettings {
            leader_weight: 3.0,
            lore_weight: 1.5,
            ..DraftSettings::default()
        };
        let card = scored("Elder", 4.0);
        assert!((weighted_score(&card, Category::Leader, &settings) - 12.0).abs() < 1e-9);
        assert!((weighted_score(&card, Category::Lore, &settings) - 6.0).abs() < 1e-9);
    }

    #[test]
    fn player_total_sums_leader_and_lore() {
        let settings = DraftSettings::default(); // 3x leader, 1x lore
        let player = Player {
            leader: Some(scored("Noble", 5.0)),
            lore: vec![scored("Living Structures", 4.0), scored("Repair Drones", 3.0)],
        };
        let breakdown = score_breakdown(&player, &settings);
        assert!((breakdown.leader - 15.0).abs() < 1e-9);
        assert!((breakdown.lore - 7.0).abs() < 1e-9);
        assert!((player_total_score(&player, &settings) - 22.0).abs() < 1e-9);
    }

    #[test]
    fn empty_player_scores_zero() {
        let player = Player::default();
        assert_eq!(player_total_score(&player, &DraftSettings::default()), 0.0);
    }
}
