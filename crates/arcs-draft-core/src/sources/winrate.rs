// Win-rate percentile tiers: rank cards by observed win rate and bucket them
// into tiers by position.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use super::{SourceError, TierList};
use crate::card::{Card, Category, Tier};
use crate::valuation::tiers::TierScoring;

/// Tier for the card at `idx` of `len` cards sorted best first.
/// Percentile cut-offs: top 10% S, next 20% A, middle 40% B, next 20% C,
/// the rest D.
pub fn tier_for_rank(idx: usize, len: usize) -> Tier {
    if len == 0 {
        return Tier::D;
    }
    let pct = (idx * 100) as f64 / len as f64;
    if pct <= 10.0 {
        Tier::S
    } else if pct <= 30.0 {
        Tier::A
    } else if pct <= 70.0 {
        Tier::B
    } else if pct <= 90.0 {
        Tier::C
    } else {
        Tier::D
    }
}

/// Turn `(name, win_rate)` pairs into tiered cards, best win rate first.
/// Equal win rates keep their input order.
pub fn tiers_from_win_rates(entries: &[(String, f64)]) -> Vec<Card> {
    let mut sorted: Vec<&(String, f64)> = entries.iter().collect();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1));
    let len = sorted.len();
    sorted
        .into_iter()
        .enumerate()
        .map(|(idx, (name, _))| Card::new(name.clone(), tier_for_rank(idx, len)))
        .collect()
}

// ---------------------------------------------------------------------------
// CSV loading
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawWinRate {
    name: String,
    category: String,
    win_rate: String,
}

/// Parse `"47"`, `"47.5%"`, `" 47 % "`.
fn parse_win_rate(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().trim_end_matches('%').trim().parse().ok()?;
    value.is_finite().then_some(value)
}

#[derive(Debug, Default)]
struct WinRates {
    leaders: Vec<(String, f64)>,
    lore: Vec<(String, f64)>,
}

fn win_rates_from_reader<R: Read>(rdr: R) -> Result<WinRates, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(rdr);
    let mut rates = WinRates::default();

    for result in reader.deserialize::<RawWinRate>() {
        match result {
            Ok(raw) => {
                let name = raw.name.trim();
                if name.is_empty() {
                    continue;
                }
                let Some(category) = Category::from_label(&raw.category) else {
                    warn!("skipping '{}': unknown category '{}'", name, raw.category);
                    continue;
                };
                let Some(win_rate) = parse_win_rate(&raw.win_rate) else {
                    warn!("skipping '{}': unreadable win rate '{}'", name, raw.win_rate);
                    continue;
                };
                let entry = (name.to_string(), win_rate);
                match category {
                    Category::Leader => rates.leaders.push(entry),
                    Category::Lore => rates.lore.push(entry),
                }
            }
            Err(e) => {
                warn!("skipping malformed win-rate row: {}", e);
            }
        }
    }

    Ok(rates)
}

/// Load a `name,category,win_rate` CSV and tier each category by percentile.
pub fn load_win_rate_csv(path: &Path, scoring: TierScoring) -> Result<TierList, SourceError> {
    let file = std::fs::File::open(path).map_err(|e| SourceError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let rates = win_rates_from_reader(file).map_err(|e| SourceError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;

    if rates.leaders.is_empty() && rates.lore.is_empty() {
        return Err(SourceError::Validation(format!(
            "win-rate file {} produced zero valid rows",
            path.display()
        )));
    }

    debug!(
        "Loaded win rates {}: {} leaders, {} lore",
        path.display(),
        rates.leaders.len(),
        rates.lore.len()
    );
    TierList::new(
        tiers_from_win_rates(&rates.leaders),
        tiers_from_win_rates(&rates.lore),
        scoring,
    )
}
