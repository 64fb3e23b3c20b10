// Draftable cards: tiers, categories, and the scored card record.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

// ---------------------------------------------------------------------------
// Tiers
// ---------------------------------------------------------------------------

/// Tier labels from best to worst. The derive order is the ranking order,
/// so `Tier::SS < Tier::D` under `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    SS,
    S,
    A,
    B,
    C,
    D,
}

/// Every tier, best first.
pub const TIER_ORDER: &[Tier] = &[Tier::SS, Tier::S, Tier::A, Tier::B, Tier::C, Tier::D];

impl Tier {
    /// Parse a tier label. Case-insensitive, surrounding whitespace ignored.
    /// Returns `None` for anything outside SS..D.
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "SS" => Some(Tier::SS),
            "S" => Some(Tier::S),
            "A" => Some(Tier::A),
            "B" => Some(Tier::B),
            "C" => Some(Tier::C),
            "D" => Some(Tier::D),
            _ => None,
        }
    }

    /// Parse a tier label, falling back to the lowest tier for unknown or
    /// empty labels.
    pub fn from_label_or_lowest(s: &str) -> Self {
        Tier::from_label(s).unwrap_or_else(|| {
            warn!("unknown tier label '{}', treating as D", s.trim());
            Tier::D
        })
    }

    /// Fixed base score for this tier.
    pub fn base_score(&self) -> f64 {
        match self {
            Tier::SS => 6.0,
            Tier::S => 5.0,
            Tier::A => 4.0,
            Tier::B => 3.0,
            Tier::C => 2.0,
            Tier::D => 1.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::SS => "SS",
            Tier::S => "S",
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
            Tier::D => "D",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Which pool a card is drafted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Leader,
    Lore,
}

impl Category {
    /// Parse a category name ("leader" / "lore", case-insensitive).
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "leader" | "leaders" => Some(Category::Leader),
            "lore" => Some(Category::Lore),
            _ => None,
        }
    }

    /// How many cards of this category a single player may hold.
    pub fn slot_limit(&self, lore_per_player: usize) -> usize {
        match self {
            Category::Leader => 1,
            Category::Lore => lore_per_player,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Leader => "leader",
            Category::Lore => "lore",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

/// A draftable leader or lore card.
///
/// `value` is derived by tier scoring and only meaningful once the owning
/// pool has been scored; owners recompute it whenever the scoring mode or
/// pool membership changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    pub tier: Tier,
    #[serde(default)]
    pub value: f64,
}

impl Card {
    /// Create an unscored card.
    pub fn new(name: impl Into<String>, tier: Tier) -> Self {
        Card {
            name: name.into(),
            tier,
            value: 0.0,
        }
    }
}
