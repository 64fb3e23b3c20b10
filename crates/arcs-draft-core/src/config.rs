// Configuration loading and parsing (config/draft.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::balance::sampling::TierConstraint;
use crate::card::Category;
use crate::draft::order::DraftOrderPolicy;
use crate::valuation::tiers::TierScoring;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub draft: DraftSettings,
    pub pool: PoolConfig,
    pub balance: BalanceConfig,
    pub data_paths: DataPaths,
}

// ---------------------------------------------------------------------------
// draft.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire draft.toml file.
#[derive(Debug, Clone, Deserialize)]
struct DraftFile {
    draft: DraftSettings,
    pool: PoolConfig,
    #[serde(default)]
    balance: BalanceConfig,
    data: DataPaths,
}

/// Settings fixed when a draft starts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DraftSettings {
    pub num_players: usize,
    pub lore_per_player: usize,
    pub leader_weight: f64,
    pub lore_weight: f64,
    #[serde(default)]
    pub tier_scoring: TierScoring,
    #[serde(default)]
    pub draft_order: DraftOrderPolicy,
}

impl Default for DraftSettings {
    fn default() -> Self {
        DraftSettings {
            num_players: 3,
            lore_per_player: 1,
            leader_weight: 3.0,
            lore_weight: 1.0,
            tier_scoring: TierScoring::Varied,
            draft_order: DraftOrderPolicy::Descending,
        }
    }
}

impl DraftSettings {
    /// Score multiplier for a category.
    pub fn weight(&self, category: Category) -> f64 {
        match category {
            Category::Leader => self.leader_weight,
            Category::Lore => self.lore_weight,
        }
    }

    /// Number of cards of `category` the whole table needs.
    pub fn cards_needed(&self, category: Category) -> usize {
        self.num_players * category.slot_limit(self.lore_per_player)
    }

    /// Total picks in a full draft.
    pub fn total_picks(&self) -> usize {
        self.cards_needed(Category::Leader) + self.cards_needed(Category::Lore)
    }

    /// Check the settings on their own (no pool sizes involved).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_players == 0 {
            return Err(ConfigError::ValidationError {
                field: "draft.num_players".into(),
                message: "must be greater than 0".into(),
            });
        }

        let weight_fields: &[(&str, f64)] = &[
            ("draft.leader_weight", self.leader_weight),
            ("draft.lore_weight", self.lore_weight),
        ];
        for (name, val) in weight_fields {
            if !val.is_finite() || *val <= 0.0 {
                return Err(ConfigError::ValidationError {
                    field: name.to_string(),
                    message: format!("must be a finite number > 0, got {val}"),
                });
            }
        }

        Ok(())
    }
}

/// Pool sizes and tier constraints used when sampling a draft pool.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PoolConfig {
    pub leader_pool_size: usize,
    pub lore_pool_size: usize,
    #[serde(default)]
    pub leader_tier_constraint: TierConstraint,
    #[serde(default)]
    pub lore_tier_constraint: TierConstraint,
}

impl PoolConfig {
    /// One spare card per category beyond what the table needs.
    pub fn for_settings(settings: &DraftSettings) -> Self {
        PoolConfig {
            leader_pool_size: settings.cards_needed(Category::Leader) + 1,
            lore_pool_size: settings.cards_needed(Category::Lore) + 1,
            leader_tier_constraint: TierConstraint::Any,
            lore_tier_constraint: TierConstraint::Any,
        }
    }

    pub fn size(&self, category: Category) -> usize {
        match category {
            Category::Leader => self.leader_pool_size,
            Category::Lore => self.lore_pool_size,
        }
    }

    pub fn constraint(&self, category: Category) -> TierConstraint {
        match category {
            Category::Leader => self.leader_tier_constraint,
            Category::Lore => self.lore_tier_constraint,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BalanceConfig {
    pub attempts: usize,
    pub max_players: usize,
    /// Largest leader pool the exhaustive search accepts.
    #[serde(default = "default_max_leader_pool")]
    pub max_leader_pool: usize,
}

fn default_max_leader_pool() -> usize {
    10
}

impl Default for BalanceConfig {
    fn default() -> Self {
        BalanceConfig {
            attempts: 200,
            max_players: 5,
            max_leader_pool: default_max_leader_pool(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub tier_list: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/draft.toml` relative to the
/// given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let draft_path = base_dir.join("config").join("draft.toml");
    let text = read_file(&draft_path)?;
    let config = parse_config(&text).map_err(|e| ConfigError::ParseError {
        path: draft_path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Parse draft.toml text without validating it.
fn parse_config(text: &str) -> Result<Config, toml::de::Error> {
    let file: DraftFile = toml::from_str(text)?;
    Ok(Config {
        draft: file.draft,
        pool: file.pool,
        balance: file.balance,
        data_paths: file.data,
    })
}

/// Copy every file in `defaults/` into `config/` unless a file of that name
/// is already there. Returns the paths that were written.
///
/// A base directory with neither `defaults/` nor `config/` is an error; one
/// with only `config/` is left alone.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.is_dir() {
        if config_dir.is_dir() {
            return Ok(Vec::new());
        }
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no defaults/ or config/ directory under {}",
                base_dir.display()
            ),
        });
    }

    let copy_err = |what: String, e: std::io::Error| ConfigError::DefaultsCopyError {
        message: format!("{what}: {e}"),
    };

    std::fs::create_dir_all(&config_dir)
        .map_err(|e| copy_err(format!("cannot create {}", config_dir.display()), e))?;
    let entries = std::fs::read_dir(&defaults_dir)
        .map_err(|e| copy_err(format!("cannot list {}", defaults_dir.display()), e))?;

    let mut copied = Vec::new();
    for entry in entries {
        let source = entry
            .map_err(|e| copy_err("cannot read defaults entry".into(), e))?
            .path();
        let Some(file_name) = source.file_name().filter(|_| source.is_file()) else {
            continue;
        };
        let target = config_dir.join(file_name);
        if copy_if_missing(&source, &target)
            .map_err(|e| copy_err(format!("cannot copy to {}", target.display()), e))?
        {
            copied.push(target);
        }
    }

    Ok(copied)
}

/// Create `target` with the contents of `source` only if it does not exist.
/// `create_new` makes the existence check and the creation one step. The
/// source is read up front and a partly written target is removed, so a
/// failed copy never leaves a file that later runs would keep.
fn copy_if_missing(source: &Path, target: &Path) -> std::io::Result<bool> {
    use std::io::Write;

    if target.exists() {
        return Ok(false);
    }
    let contents = std::fs::read(source)?;

    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(e),
    };
    if let Err(e) = dest.write_all(&contents).and_then(|()| dest.sync_all()) {
        drop(dest);
        let _ = std::fs::remove_file(target);
        return Err(e);
    }
    Ok(true)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    config.draft.validate()?;

    let pool_fields: &[(&str, usize, usize)] = &[
        (
            "pool.leader_pool_size",
            config.pool.leader_pool_size,
            config.draft.cards_needed(Category::Leader),
        ),
        (
            "pool.lore_pool_size",
            config.pool.lore_pool_size,
            config.draft.cards_needed(Category::Lore),
        ),
    ];
    for (name, size, needed) in pool_fields {
        if size < needed {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be at least {needed} to fill every player, got {size}"),
            });
        }
    }

    if config.balance.attempts == 0 {
        return Err(ConfigError::ValidationError {
            field: "balance.attempts".into(),
            message: "must be > 0".into(),
        });
    }

    if config.balance.max_players == 0 {
        return Err(ConfigError::ValidationError {
            field: "balance.max_players".into(),
            message: "must be > 0".into(),
        });
    }

    if config.balance.max_leader_pool < config.balance.max_players {
        return Err(ConfigError::ValidationError {
            field: "balance.max_leader_pool".into(),
            message: format!(
                "must be at least balance.max_players ({})",
                config.balance.max_players
            ),
        });
    }

    if config.data_paths.tier_list.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.tier_list".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
