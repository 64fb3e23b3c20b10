// Draft order: which seat picks on each turn.

use serde::Deserialize;

/// Turn-order policy for a pick-by-pick draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftOrderPolicy {
    /// Last seat first, every round: N, N-1, ..., 1.
    #[default]
    Descending,
    /// N..1 then 1..N, repeating.
    Snake,
}

impl DraftOrderPolicy {
    pub fn label(&self) -> &'static str {
        match self {
            DraftOrderPolicy::Descending => "descending",
            DraftOrderPolicy::Snake => "snake",
        }
    }
}

/// Build the base turn sequence of 1-based player numbers. The sequence
/// repeats cyclically for as long as the draft runs.
pub fn build_draft_order(num_players: usize, policy: DraftOrderPolicy) -> Vec<usize> {
    let descending = (1..=num_players).rev();
    match policy {
        DraftOrderPolicy::Descending => descending.collect(),
        DraftOrderPolicy::Snake => descending.chain(1..=num_players).collect(),
    }
}

/// Player number on turn `pick_index`, or `None` for an empty order.
pub fn drafter_at(order: &[usize], pick_index: usize) -> Option<usize> {
    if order.is_empty() {
        return None;
    }
    Some(order[pick_index % order.len()])
}
