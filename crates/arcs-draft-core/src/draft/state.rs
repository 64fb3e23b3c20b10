// Draft state: players, available pools, turn pointer, and undo history.

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use super::order::{build_draft_order, drafter_at};
use super::pick::{PickRecord, Recommendation};
use crate::balance::BalancedDraft;
use crate::card::{Card, Category};
use crate::config::{ConfigError, DraftSettings};
use crate::valuation::replacement::{best_pick, PickContext};
use crate::valuation::tiers::assign_values;
use crate::valuation::weights::{score_breakdown, ScoreBreakdown};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("invalid draft settings: {0}")]
    InvalidSettings(#[from] ConfigError),

    #[error("duplicate {category} card '{name}' in pool")]
    DuplicateCard { category: Category, name: String },

    #[error("the draft is not active")]
    Inactive,

    #[error("player {seat} cannot take another {category}")]
    SlotFull { seat: usize, category: Category },

    #[error("{category} card '{name}' is not available")]
    NotAvailable { category: Category, name: String },

    #[error("no player at index {0}")]
    NoSuchPlayer(usize),
}

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

/// One drafting seat: at most one leader and a bounded list of lore.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Player {
    pub leader: Option<Card>,
    pub lore: Vec<Card>,
}

impl Player {
    /// Whether this player still has an open slot of `category`.
    pub fn needs(&self, category: Category, lore_per_player: usize) -> bool {
        match category {
            Category::Leader => self.leader.is_none(),
            Category::Lore => self.lore.len() < lore_per_player,
        }
    }

    /// Whether every slot is filled.
    pub fn is_done(&self, lore_per_player: usize) -> bool {
        !self.needs(Category::Leader, lore_per_player)
            && !self.needs(Category::Lore, lore_per_player)
    }
}

// ---------------------------------------------------------------------------
// Draft state
// ---------------------------------------------------------------------------

/// The complete state of one draft, from start to the last pick.
///
/// Every card lives in exactly one place: an available pool or one player's
/// slots. Cards move between them by value, never copied.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftState {
    settings: DraftSettings,
    /// Base turn sequence of 1-based seat numbers, repeated cyclically.
    order: Vec<usize>,
    /// Turn pointer into `order` (unbounded, taken modulo its length).
    pick_index: usize,
    players: Vec<Player>,
    available_leaders: Vec<Card>,
    available_lore: Vec<Card>,
    history: Vec<PickRecord>,
    active: bool,
}

impl DraftState {
    /// Start a draft over the given pools.
    ///
    /// Both pools are scored here with the configured tier scoring, so card
    /// values always reflect this exact pool membership.
    pub fn new(
        settings: DraftSettings,
        mut leaders: Vec<Card>,
        mut lore: Vec<Card>,
    ) -> Result<Self, DraftError> {
        settings.validate()?;
        check_unique(&leaders, Category::Leader)?;
        check_unique(&lore, Category::Lore)?;

        assign_values(&mut leaders, settings.tier_scoring);
        assign_values(&mut lore, settings.tier_scoring);

        let order = build_draft_order(settings.num_players, settings.draft_order);
        let players = vec![Player::default(); settings.num_players];

        let mut state = DraftState {
            settings,
            order,
            pick_index: 0,
            players,
            available_leaders: leaders,
            available_lore: lore,
            history: Vec::new(),
            active: true,
        };
        state.active = !state.is_complete();

        info!(
            "Draft started: {} players, {} lore each, {} leaders / {} lore in pool, {} order",
            state.settings.num_players,
            state.settings.lore_per_player,
            state.available_leaders.len(),
            state.available_lore.len(),
            state.settings.draft_order.label()
        );

        Ok(state)
    }

    /// Start a draft on a balanced pool and apply its assignment as recorded
    /// picks, player by player (leader, then lore). The result is inactive
    /// but every assignment can be undone.
    pub fn from_balanced(
        settings: DraftSettings,
        balanced: &BalancedDraft,
    ) -> Result<Self, DraftError> {
        let mut state = DraftState::new(
            settings,
            balanced.leader_pool.clone(),
            balanced.lore_pool.clone(),
        )?;
        let assignment = &balanced.assignment;
        for (p, leader) in assignment.leaders.iter().enumerate() {
            state.assign(p, Category::Leader, &leader.name)?;
            for card in assignment.lore.get(p).into_iter().flatten() {
                state.assign(p, Category::Lore, &card.name)?;
            }
        }
        state.active = false;
        info!(
            "Balanced draft applied: {} picks, spread {:.3}",
            state.history.len(),
            assignment.spread
        );
        Ok(state)
    }

    // --- Accessors ---

    pub fn settings(&self) -> &DraftSettings {
        &self.settings
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn pick_index(&self) -> usize {
        self.pick_index
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Cards of `category` still available, in pool order.
    pub fn available(&self, category: Category) -> &[Card] {
        match category {
            Category::Leader => &self.available_leaders,
            Category::Lore => &self.available_lore,
        }
    }

    pub fn history(&self) -> &[PickRecord] {
        &self.history
    }

    /// Whether picks are still being taken.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether every player's slots are full.
    pub fn is_complete(&self) -> bool {
        let lpp = self.settings.lore_per_player;
        self.players.iter().all(|p| p.is_done(lpp))
    }

    /// 1-based seat number on the clock.
    pub fn current_drafter(&self) -> Option<usize> {
        drafter_at(&self.order, self.pick_index)
    }

    fn current_player_idx(&self) -> Option<usize> {
        self.current_drafter().map(|seat| seat - 1)
    }

    /// Read-only view handed to the recommendation engine.
    pub fn pick_context(&self) -> PickContext<'_> {
        PickContext {
            settings: &self.settings,
            players: &self.players,
            leaders: &self.available_leaders,
            lore: &self.available_lore,
        }
    }

    /// Every card `player_idx` may legally take right now.
    pub fn pickable(&self, player_idx: usize) -> Vec<(Category, &Card)> {
        let Some(player) = self.players.get(player_idx) else {
            return Vec::new();
        };
        let mut cards = Vec::new();
        for category in [Category::Leader, Category::Lore] {
            if player.needs(category, self.settings.lore_per_player) {
                cards.extend(self.available(category).iter().map(|c| (category, c)));
            }
        }
        cards
    }

    /// Best pick for the player on the clock.
    pub fn recommend(&self) -> Option<Recommendation> {
        if !self.active {
            return None;
        }
        best_pick(&self.pick_context(), self.current_player_idx()?)
    }

    /// Weighted score breakdown per player, in seat order.
    pub fn player_scores(&self) -> Vec<ScoreBreakdown> {
        self.players
            .iter()
            .map(|p| score_breakdown(p, &self.settings))
            .collect()
    }

    // --- Mutation ---

    /// Give `name` from the `category` pool to the player on the clock, then
    /// advance the turn pointer past players who are already done.
    pub fn make_pick(&mut self, category: Category, name: &str) -> Result<PickRecord, DraftError> {
        if !self.active {
            return Err(DraftError::Inactive);
        }
        let player_idx = self.current_player_idx().ok_or(DraftError::Inactive)?;
        let record = self.assign(player_idx, category, name)?;

        if self.is_complete() {
            self.active = false;
            info!("Draft complete after {} picks", self.history.len());
        } else {
            self.advance_drafter();
        }

        Ok(record)
    }

    /// Move a card into a player's slot without consulting the draft order.
    /// Records history and bumps the turn pointer so undo stays exact.
    fn assign(
        &mut self,
        player_idx: usize,
        category: Category,
        name: &str,
    ) -> Result<PickRecord, DraftError> {
        let lpp = self.settings.lore_per_player;
        let player = self
            .players
            .get(player_idx)
            .ok_or(DraftError::NoSuchPlayer(player_idx))?;
        if !player.needs(category, lpp) {
            return Err(DraftError::SlotFull {
                seat: player_idx + 1,
                category,
            });
        }

        let pool = match category {
            Category::Leader => &mut self.available_leaders,
            Category::Lore => &mut self.available_lore,
        };
        let pool_position = pool
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| DraftError::NotAvailable {
                category,
                name: name.to_string(),
            })?;
        let card = pool.remove(pool_position);

        let record = PickRecord {
            pick_index: self.pick_index,
            player_idx,
            category,
            pool_position,
            card: card.clone(),
        };

        let player = &mut self.players[player_idx];
        match category {
            Category::Leader => player.leader = Some(card),
            Category::Lore => player.lore.push(card),
        }

        debug!(
            "Pick {}: seat {} takes {} '{}'",
            self.history.len() + 1,
            player_idx + 1,
            category,
            record.card.name
        );

        self.history.push(record.clone());
        self.pick_index += 1;
        Ok(record)
    }

    /// Step the turn pointer to the next seat that still needs a card. One
    /// full cycle of the order visits every seat, so if nobody is found the
    /// draft is over.
    fn advance_drafter(&mut self) {
        let lpp = self.settings.lore_per_player;
        // `assign` already moved the pointer one step.
        for _ in 0..self.order.len() {
            if let Some(idx) = self.current_player_idx() {
                if !self.players[idx].is_done(lpp) {
                    return;
                }
            }
            self.pick_index += 1;
        }
        self.active = false;
    }

    /// Pick the recommended card for whoever is on the clock until the draft
    /// ends. Returns the picks made.
    pub fn auto_draft(&mut self) -> Vec<PickRecord> {
        let mut made = Vec::new();
        let limit = self.settings.total_picks() + 1;
        while self.active && made.len() < limit {
            let Some(rec) = self.recommend() else {
                break;
            };
            match self.make_pick(rec.category, &rec.name) {
                Ok(record) => made.push(record),
                Err(e) => {
                    debug!("auto-draft stopped: {}", e);
                    break;
                }
            }
        }
        made
    }

    /// Reverse the most recent pick exactly. Returns `None` (and changes
    /// nothing) when there is no history.
    pub fn undo(&mut self) -> Option<PickRecord> {
        let record = self.history.pop()?;
        let player = &mut self.players[record.player_idx];
        let card = match record.category {
            Category::Leader => player.leader.take(),
            Category::Lore => player.lore.pop(),
        };
        // History and slots move in lockstep, so the slot holds this card.
        let card = card.unwrap_or_else(|| record.card.clone());

        let pool = match record.category {
            Category::Leader => &mut self.available_leaders,
            Category::Lore => &mut self.available_lore,
        };
        let position = record.pool_position.min(pool.len());
        pool.insert(position, card);

        self.pick_index = record.pick_index;
        self.active = true;

        debug!(
            "Undo: '{}' returned to the {} pool",
            record.card.name, record.category
        );
        Some(record)
    }

    /// Undo every pick, returning to the state right after start.
    pub fn reset(&mut self) {
        while self.undo().is_some() {}
        self.active = !self.is_complete();
    }
}

fn check_unique(cards: &[Card], category: Category) -> Result<(), DraftError> {
    let mut seen = HashSet::new();
    for card in cards {
        if !seen.insert(card.name.as_str()) {
            return Err(DraftError::DuplicateCard {
                category,
                name: card.name.clone(),
            });
        }
    }
    Ok(())
}
