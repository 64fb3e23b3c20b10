// Draft simulation: run many auto-drafts on random pools and measure how
// each seat fares under each turn-order policy.

use std::collections::BTreeMap;
use std::io::Write;

use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::balance::sampling::{pick_with_constraint, TierConstraint};
use crate::card::{Card, Category};
use crate::config::{ConfigError, DraftSettings, PoolConfig};
use crate::draft::order::DraftOrderPolicy;
use crate::draft::state::{DraftError, DraftState};
use crate::sources::TierList;

/// Incomplete drafts tolerated per order policy before giving up.
const MAX_STALLED_DRAFTS: usize = 100;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid draft settings: {0}")]
    InvalidSettings(#[from] ConfigError),

    #[error("{category} pool needs {required} cards, tier list has {available}")]
    PoolTooSmall {
        category: Category,
        available: usize,
        required: usize,
    },

    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error("{stalled} {order} drafts ended with empty slots")]
    Stalled {
        order: &'static str,
        stalled: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOptions {
    /// Completed drafts per order policy.
    pub runs: usize,
    pub orders: Vec<DraftOrderPolicy>,
    pub leader_pool_size: usize,
    pub lore_pool_size: usize,
}

impl SimulationOptions {
    /// Both order policies, pool sizes taken from the pool config.
    pub fn new(runs: usize, pool: &PoolConfig) -> Self {
        SimulationOptions {
            runs,
            orders: vec![DraftOrderPolicy::Descending, DraftOrderPolicy::Snake],
            leader_pool_size: pool.leader_pool_size,
            lore_pool_size: pool.lore_pool_size,
        }
    }
}

/// One player's result in one simulated draft. Serializes to the CSV header
/// `sim,draftOrder,player,leader,leaderScore,lore,loreScore,totalScore`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRow {
    pub sim: usize,
    pub draft_order: String,
    /// 1-based seat.
    pub player: usize,
    pub leader: String,
    pub leader_score: f64,
    /// Lore names joined with `;`.
    pub lore: String,
    pub lore_score: f64,
    pub total_score: f64,
}

// ---------------------------------------------------------------------------
// Running
// ---------------------------------------------------------------------------

fn check_pool_size(
    tier_list: &TierList,
    category: Category,
    pool_size: usize,
    settings: &DraftSettings,
) -> Result<(), SimulationError> {
    let available = tier_list.cards(category).len();
    let required = pool_size.max(settings.cards_needed(category));
    if available < required {
        return Err(SimulationError::PoolTooSmall {
            category,
            available,
            required,
        });
    }
    Ok(())
}

fn draw_pool<R: Rng + ?Sized>(
    tier_list: &TierList,
    category: Category,
    pool_size: usize,
    rng: &mut R,
) -> Result<Vec<Card>, SimulationError> {
    let cards = tier_list.cards(category);
    pick_with_constraint(cards, pool_size, TierConstraint::Any, rng).ok_or(
        SimulationError::PoolTooSmall {
            category,
            available: cards.len(),
            required: pool_size,
        },
    )
}

/// Auto-draft `options.runs` random pools per order policy and record every
/// player's outcome.
pub fn simulate<R: Rng + ?Sized>(
    tier_list: &TierList,
    settings: &DraftSettings,
    options: &SimulationOptions,
    rng: &mut R,
) -> Result<Vec<SimulationRow>, SimulationError> {
    settings.validate()?;
    let leader_pool_size = options.leader_pool_size.max(settings.cards_needed(Category::Leader));
    let lore_pool_size = options.lore_pool_size.max(settings.cards_needed(Category::Lore));
    check_pool_size(tier_list, Category::Leader, leader_pool_size, settings)?;
    check_pool_size(tier_list, Category::Lore, lore_pool_size, settings)?;

    let mut rows = Vec::with_capacity(options.runs * options.orders.len() * settings.num_players);

    for &order in &options.orders {
        let order_settings = DraftSettings {
            draft_order: order,
            ..settings.clone()
        };
        let mut sim = 0;
        let mut stalled = 0;

        while sim < options.runs {
            let leaders = draw_pool(tier_list, Category::Leader, leader_pool_size, rng)?;
            let lore = draw_pool(tier_list, Category::Lore, lore_pool_size, rng)?;

            let mut state = DraftState::new(order_settings.clone(), leaders, lore)?;
            state.auto_draft();

            if !state.is_complete() {
                stalled += 1;
                warn!("{} simulation left empty slots, retrying", order.label());
                if stalled >= MAX_STALLED_DRAFTS {
                    return Err(SimulationError::Stalled {
                        order: order.label(),
                        stalled,
                    });
                }
                continue;
            }

            sim += 1;
            let scores = state.player_scores();
            for (idx, (player, score)) in state.players().iter().zip(scores).enumerate() {
                rows.push(SimulationRow {
                    sim,
                    draft_order: order.label().to_string(),
                    player: idx + 1,
                    leader: player
                        .leader
                        .as_ref()
                        .map(|c| c.name.clone())
                        .unwrap_or_default(),
                    leader_score: score.leader,
                    lore: player
                        .lore
                        .iter()
                        .map(|c| c.name.as_str())
                        .collect::<Vec<_>>()
                        .join(";"),
                    lore_score: score.lore,
                    total_score: score.total,
                });
            }
        }

        info!("Simulated {} {} drafts", sim, order.label());
    }

    Ok(rows)
}

/// Write rows as CSV with a header line.
pub fn write_csv<W: Write>(rows: &[SimulationRow], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Descriptive statistics over a set of total scores. `std_dev` is the
/// sample standard deviation (0 for a single score).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl ScoreStats {
    pub fn from_scores(scores: &[f64]) -> Option<Self> {
        if scores.is_empty() {
            return None;
        }
        let count = scores.len();
        let mean = scores.iter().sum::<f64>() / count as f64;
        let std_dev = if count > 1 {
            let var = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            var.sqrt()
        } else {
            0.0
        };
        Some(ScoreStats {
            count,
            mean,
            std_dev,
            min: scores.iter().copied().fold(f64::INFINITY, f64::min),
            max: scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeatSummary {
    pub draft_order: String,
    pub player: usize,
    pub stats: ScoreStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSummary {
    pub draft_order: String,
    pub stats: ScoreStats,
    pub seats: Vec<SeatSummary>,
}

/// Group rows by order policy (first-seen order) and seat.
pub fn summarize(rows: &[SimulationRow]) -> Vec<OrderSummary> {
    let mut orders: Vec<String> = Vec::new();
    for row in rows {
        if !orders.contains(&row.draft_order) {
            orders.push(row.draft_order.clone());
        }
    }

    let mut summaries = Vec::new();
    for order in orders {
        let mut all = Vec::new();
        let mut by_seat: BTreeMap<usize, Vec<f64>> = BTreeMap::new();
        for row in rows.iter().filter(|r| r.draft_order == order) {
            all.push(row.total_score);
            by_seat.entry(row.player).or_default().push(row.total_score);
        }

        let seats = by_seat
            .into_iter()
            .filter_map(|(player, scores)| {
                ScoreStats::from_scores(&scores).map(|stats| SeatSummary {
                    draft_order: order.clone(),
                    player,
                    stats,
                })
            })
            .collect();

        if let Some(stats) = ScoreStats::from_scores(&all) {
            summaries.push(OrderSummary {
                draft_order: order,
                stats,
                seats,
            });
        }
    }
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Tier;
    use crate::valuation::tiers::TierScoring;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn tier_list() -> TierList {
        let leaders = ["Noble", "Archivist", "Quartermaster", "Elder", "Rebel"];
        let lore = [
            "Living Structures",
            "Sprinter Drives",
            "Repair Drones",
            "Mirror Plating",
            "Gate Ports",
        ];
        let tiers = [Tier::S, Tier::A, Tier::A, Tier::B, Tier::D];
        TierList::new(
            leaders.iter().zip(tiers).map(|(n, t)| Card::new(*n, t)).collect(),
            lore.iter().zip(tiers).map(|(n, t)| Card::new(*n, t)).collect(),
            TierScoring::Varied,
        )
        .unwrap()
    }

    #[test]
    fn failed_draw_names_its_category() {
        let mut rng = StdRng::seed_from_u64(5);
        let list = tier_list();
        assert_eq!(draw_pool(&list, Category::Leader, 5, &mut rng).unwrap().len(), 5);

        let err = draw_pool(&list, Category::Lore, 6, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::PoolTooSmall {
                category: Category::Lore,
                available: 5,
                required: 6,
            }
        ));
    }

    fn row(order: &str, player: usize, total: f64) -> SimulationRow {
        SimulationRow {
            sim: 1,
            draft_order: order.into(),
            player,
            leader: String::new(),
            leader_score: total,
            lore: String::new(),
            lore_score: 0.0,
            total_score: total,
        }
    }

    #[test]
    fn simulate_produces_row_per_player_per_run() {
        let settings = DraftSettings::default(); // 3 players, 1 lore
        let options = SimulationOptions {
            runs: 4,
            orders: vec![DraftOrderPolicy::Descending, DraftOrderPolicy::Snake],
            leader_pool_size: 4,
            lore_pool_size: 4,
        };
        let mut rng = StdRng::seed_from_u64(5);
        let rows = simulate(&tier_list(), &settings, &options, &mut rng).unwrap();

        assert_eq!(rows.len(), 4 * 2 * 3);
        assert!(rows.iter().all(|r| !r.leader.is_empty() && !r.lore.is_empty()));
        assert!(rows
            .iter()
            .all(|r| approx_eq(r.total_score, r.leader_score + r.lore_score)));
        assert_eq!(rows[0].draft_order, "descending");
        assert_eq!(rows.last().unwrap().draft_order, "snake");
        assert_eq!(rows.last().unwrap().sim, 4);
    }

    #[test]
    fn simulate_rejects_short_tier_list() {
        let settings = DraftSettings {
            num_players: 6,
            ..DraftSettings::default()
        };
        let options = SimulationOptions {
            runs: 1,
            orders: vec![DraftOrderPolicy::Descending],
            leader_pool_size: 6,
            lore_pool_size: 6,
        };
        let mut rng = StdRng::seed_from_u64(5);
        assert!(matches!(
            simulate(&tier_list(), &settings, &options, &mut rng),
            Err(SimulationError::PoolTooSmall {
                category: Category::Leader,
                ..
            })
        ));
    }

    #[test]
    fn csv_has_expected_header() {
        let mut out = Vec::new();
        let mut r = row("snake", 2, 17.5);
        r.leader = "Noble".into();
        r.lore = "Gate Ports;Mirror Plating".into();
        write_csv(&[r], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("sim,draftOrder,player,leader,leaderScore,lore,loreScore,totalScore")
        );
        assert_eq!(
            lines.next(),
            Some("1,snake,2,Noble,17.5,Gate Ports;Mirror Plating,0.0,17.5")
        );
    }

    #[test]
    fn summary_groups_by_order_and_seat() {
        let rows = vec![
            row("descending", 1, 10.0),
            row("descending", 2, 20.0),
            row("descending", 1, 14.0),
            row("descending", 2, 20.0),
            row("snake", 1, 5.0),
        ];
        let summary = summarize(&rows);
        assert_eq!(summary.len(), 2);

        let desc = &summary[0];
        assert_eq!(desc.draft_order, "descending");
        assert_eq!(desc.stats.count, 4);
        assert!(approx_eq(desc.stats.mean, 16.0));
        assert_eq!(desc.seats.len(), 2);
        let seat1 = &desc.seats[0].stats;
        assert!(approx_eq(seat1.mean, 12.0));
        assert!(approx_eq(seat1.min, 10.0));
        assert!(approx_eq(seat1.max, 14.0));
        assert!(approx_eq(seat1.std_dev, 8.0_f64.sqrt()));

        let snake = &summary[1];
        assert_eq!(snake.stats.count, 1);
        assert!(approx_eq(snake.stats.std_dev, 0.0));
    }

    #[test]
    fn stats_of_nothing_is_none() {
        assert!(ScoreStats::from_scores(&[]).is_none());
    }
}
