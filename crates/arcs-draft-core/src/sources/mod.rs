// Tier sources: turn external tier data (hand-made tier lists, win rates)
// into scored leader and lore lists.

pub mod tier_csv;
pub mod tier_list;
pub mod winrate;

pub use tier_list::TierList;

/// Errors raised while reading tier data.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}
