// Hand-made tier list CSV loading.
//
// Layout: `name,tier` rows, leaders first. An optional header row whose first
// cell is `name` is skipped. The first blank row after at least one leader
// starts the lore section. Rows missing a name or a tier are skipped.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, warn};

use super::{SourceError, TierList};
use crate::card::{Card, Tier};
use crate::valuation::tiers::TierScoring;

/// Unscored leader and lore lists as read from a file.
#[derive(Debug, Default)]
struct TierRows {
    leaders: Vec<Card>,
    lore: Vec<Card>,
}

fn cell<'r>(record: &'r StringRecord, idx: usize) -> &'r str {
    record.get(idx).map(str::trim).unwrap_or("")
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|c| c.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Reader-based loader
// ---------------------------------------------------------------------------

/// The csv reader drops empty lines, so a section break shows up either as a
/// row of empty cells (`,`) or as a jump in the starting line number between
/// consecutive records.
fn tiers_from_reader<R: Read>(rdr: R) -> Result<TierRows, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(rdr);

    let mut rows = TierRows::default();
    let mut in_lore = false;
    let mut header_checked = false;
    let mut last_line: Option<u64> = None;
    let mut record = StringRecord::new();

    while reader.read_record(&mut record)? {
        let line = record.position().map(|p| p.line());
        let gap = matches!((last_line, line), (Some(prev), Some(cur)) if cur > prev + 1);
        last_line = line;

        if (gap || is_blank(&record)) && !rows.leaders.is_empty() && !in_lore {
            debug!("tier CSV: lore section starts at line {:?}", line);
            in_lore = true;
        }
        if is_blank(&record) {
            continue;
        }

        let name = cell(&record, 0);
        let tier = cell(&record, 1);

        if !header_checked {
            header_checked = true;
            if name.eq_ignore_ascii_case("name") {
                continue;
            }
        }

        if name.is_empty() || tier.is_empty() {
            warn!("skipping tier row {:?}: missing name or tier", line);
            continue;
        }

        let card = Card::new(name, Tier::from_label_or_lowest(tier));
        if in_lore {
            rows.lore.push(card);
        } else {
            rows.leaders.push(card);
        }
    }

    Ok(rows)
}

// ---------------------------------------------------------------------------
// Public path-based loader
// ---------------------------------------------------------------------------

/// Load a tier list CSV and score it with `scoring`.
pub fn load_tier_csv(path: &Path, scoring: TierScoring) -> Result<TierList, SourceError> {
    let file = std::fs::File::open(path).map_err(|e| SourceError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let rows = tiers_from_reader(file).map_err(|e| SourceError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;

    if rows.leaders.is_empty() && rows.lore.is_empty() {
        return Err(SourceError::Validation(format!(
            "tier list {} produced zero valid rows",
            path.display()
        )));
    }

    debug!(
        "Loaded tier list {}: {} leaders, {} lore",
        path.display(),
        rows.leaders.len(),
        rows.lore.len()
    );
    TierList::new(rows.leaders, rows.lore, scoring)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
