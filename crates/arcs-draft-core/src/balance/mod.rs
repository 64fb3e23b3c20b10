// Balanced-draft generator: pool sampling under tier constraints and the
// exhaustive leader-assignment search.

pub mod combinatorics;
pub mod sampling;
pub mod search;

pub use search::{generate_balanced_draft, BalanceError, BalanceOptions, BalancedDraft};
