// Valuation engine: tier scores, weighted scores, value above replacement.

pub mod replacement;
pub mod tiers;
pub mod weights;
