// Value Above Replacement (VAR) pick recommendation.
//
// Scores every legal pick for the player on the clock by how much weighted
// value they would lose if the card were gone by their next turn. The
// "replacement" is the card left at the top of the same pool after every
// competing opponent has taken one card from it.

use std::cmp::Ordering;

use serde::Serialize;

use crate::card::{Card, Category};
use crate::config::DraftSettings;
use crate::draft::pick::Recommendation;
use crate::draft::state::Player;
use crate::valuation::weights::weighted_score;

/// Read-only view of the draft needed to score candidates.
#[derive(Debug, Clone, Copy)]
pub struct PickContext<'a> {
    pub settings: &'a DraftSettings,
    pub players: &'a [Player],
    pub leaders: &'a [Card],
    pub lore: &'a [Card],
}

impl<'a> PickContext<'a> {
    fn pool(&self, category: Category) -> &'a [Card] {
        match category {
            Category::Leader => self.leaders,
            Category::Lore => self.lore,
        }
    }
}

/// Scoring detail for a single legal pick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateScore {
    pub category: Category,
    pub name: String,
    pub card_score: f64,
    /// Weighted score of the expected replacement, if the pool is deep enough.
    pub replacement_score: Option<f64>,
    /// `card_score - replacement_score`, or `card_score` when there is no
    /// replacement. Not clamped: negative means "can wait".
    pub opportunity_cost: f64,
}

impl CandidateScore {
    fn into_recommendation(self) -> Recommendation {
        Recommendation {
            category: self.category,
            name: self.name,
            card_score: self.card_score,
            opportunity_cost: self.opportunity_cost,
        }
    }
}

// ---------------------------------------------------------------------------
// Building blocks
// ---------------------------------------------------------------------------

/// Number of players other than `player_idx` still needing `category`.
pub fn competitors(ctx: &PickContext<'_>, player_idx: usize, category: Category) -> usize {
    ctx.players
        .iter()
        .enumerate()
        .filter(|(i, p)| *i != player_idx && p.needs(category, ctx.settings.lore_per_player))
        .count()
}

/// Weighted score of the card at rank `taken_before` (0-based) once the pool
/// is sorted by value descending. `None` when the pool is too shallow.
pub fn replacement_score(
    ctx: &PickContext<'_>,
    category: Category,
    taken_before: usize,
) -> Option<f64> {
    let mut scores: Vec<f64> = ctx
        .pool(category)
        .iter()
        .map(|c| weighted_score(c, category, ctx.settings))
        .collect();
    scores.sort_by(|a, b| b.total_cmp(a));
    scores.get(taken_before).copied()
}

/// Tie-break ordering: higher cost wins, then lexically smaller name, then
/// leader before lore.
fn rank(a: &CandidateScore, b: &CandidateScore) -> Ordering {
    a.opportunity_cost
        .total_cmp(&b.opportunity_cost)
        .then_with(|| b.name.cmp(&a.name))
        .then_with(|| match (a.category, b.category) {
            (Category::Leader, Category::Lore) => Ordering::Greater,
            (Category::Lore, Category::Leader) => Ordering::Less,
            _ => Ordering::Equal,
        })
}

// ---------------------------------------------------------------------------
// Pipeline entry points
// ---------------------------------------------------------------------------

/// Score every legal pick for `player_idx`, leaders first, each pool in its
/// current order. Empty when the player needs nothing or the index is out of
/// range.
pub fn score_candidates(ctx: &PickContext<'_>, player_idx: usize) -> Vec<CandidateScore> {
    let Some(player) = ctx.players.get(player_idx) else {
        return Vec::new();
    };

    // Every other seat picks exactly once before this one comes around again.
    let picks_before_my_next_turn = ctx.settings.num_players.saturating_sub(1);
    let mut scored = Vec::new();

    for category in [Category::Leader, Category::Lore] {
        if !player.needs(category, ctx.settings.lore_per_player) {
            continue;
        }

        let taken_before = competitors(ctx, player_idx, category).min(picks_before_my_next_turn);
        let replacement = replacement_score(ctx, category, taken_before);

        for card in ctx.pool(category) {
            let card_score = weighted_score(card, category, ctx.settings);
            let opportunity_cost = match replacement {
                Some(repl) => card_score - repl,
                None => card_score,
            };
            scored.push(CandidateScore {
                category,
                name: card.name.clone(),
                card_score,
                replacement_score: replacement,
                opportunity_cost,
            });
        }
    }

    scored
}

/// Recommend the single best pick for `player_idx`, or `None` when there is
/// no legal candidate.
pub fn best_pick(ctx: &PickContext<'_>, player_idx: usize) -> Option<Recommendation> {
    score_candidates(ctx, player_idx)
        .into_iter()
        .max_by(rank)
        .map(CandidateScore::into_recommendation)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
