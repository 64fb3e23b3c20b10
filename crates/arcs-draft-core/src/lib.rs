// Library root: the Arcs draft engine. Tier scoring, draft order, pick
// recommendation, the undo-capable draft state, and the balanced-draft search.

pub mod balance;
pub mod card;
pub mod config;
pub mod draft;
pub mod simulate;
pub mod sources;
pub mod valuation;
