// Balanced-draft search: sample pools, then find the leader assignment and
// greedy lore split with the smallest gap between the best and worst player.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use rand::Rng;

use super::combinatorics::{combinations_of, permutations_of};
use super::sampling::pick_with_constraint;
use crate::card::{Card, Category};
use crate::config::{Config, ConfigError, DraftSettings, PoolConfig};
use crate::sources::TierList;
use crate::valuation::tiers::assign_values;
use crate::valuation::weights::weighted_score;

/// Sampling attempts when nothing else is configured.
pub const DEFAULT_ATTEMPTS: usize = 200;

/// Largest table the exhaustive leader search is allowed to run for. The
/// search visits C(pool, N) x N! leader assignments per attempt.
pub const DEFAULT_MAX_PLAYERS: usize = 5;

/// Largest leader pool the search is allowed to enumerate. With the default
/// player ceiling this bounds one attempt at C(10, 5) x 5! = 30240
/// assignments.
pub const DEFAULT_MAX_LEADER_POOL: usize = 10;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum BalanceError {
    #[error("invalid draft settings: {0}")]
    InvalidSettings(#[from] ConfigError),

    #[error("balanced search supports at most {max} players, got {players}")]
    TooManyPlayers { players: usize, max: usize },

    #[error("{category} pool needs at least {required} cards, only {available} available")]
    PoolTooSmall {
        category: Category,
        available: usize,
        required: usize,
    },

    #[error("leader pool of {size} exceeds the search limit of {max}")]
    PoolTooLarge { size: usize, max: usize },

    #[error("no feasible pool found in {attempts} attempts")]
    Infeasible { attempts: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BalanceOptions {
    pub attempts: usize,
    pub max_players: usize,
    /// Cap on `pool.leader_pool_size`; the search cost grows as
    /// C(pool, N) x N! per attempt.
    pub max_leader_pool: usize,
    pub pool: PoolConfig,
}

impl BalanceOptions {
    /// Default attempts and ceiling, with one spare card per category.
    pub fn for_settings(settings: &DraftSettings) -> Self {
        BalanceOptions {
            attempts: DEFAULT_ATTEMPTS,
            max_players: DEFAULT_MAX_PLAYERS,
            max_leader_pool: DEFAULT_MAX_LEADER_POOL,
            pool: PoolConfig::for_settings(settings),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        BalanceOptions {
            attempts: config.balance.attempts,
            max_players: config.balance.max_players,
            max_leader_pool: config.balance.max_leader_pool,
            pool: config.pool.clone(),
        }
    }
}

/// One player-by-player split of a pool. Index `p` of every vector belongs to
/// player `p` (0-based).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub leaders: Vec<Card>,
    pub lore: Vec<Vec<Card>>,
    /// Weighted total per player.
    pub scores: Vec<f64>,
    /// Highest minus lowest total.
    pub spread: f64,
}

/// The chosen pools together with their best assignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalancedDraft {
    pub leader_pool: Vec<Card>,
    pub lore_pool: Vec<Card>,
    pub assignment: Assignment,
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

fn spread_of(scores: &[f64]) -> f64 {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    if scores.is_empty() {
        0.0
    } else {
        max - min
    }
}

/// Hand out lore highest value first, each card to the lowest-scoring player
/// that still has room (first such player on ties). `None` when the lore
/// runs out before every slot is filled.
fn distribute_lore(
    leaders: &[Card],
    lore_by_value: &[Card],
    settings: &DraftSettings,
) -> Option<Assignment> {
    let lpp = settings.lore_per_player;
    let target = leaders.len() * lpp;

    let mut scores: Vec<f64> = leaders
        .iter()
        .map(|c| weighted_score(c, Category::Leader, settings))
        .collect();
    let mut lore: Vec<Vec<Card>> = vec![Vec::new(); leaders.len()];
    let mut assigned = 0;

    for card in lore_by_value {
        if assigned >= target {
            break;
        }
        let mut lowest: Option<usize> = None;
        for p in 0..leaders.len() {
            if lore[p].len() >= lpp {
                continue;
            }
            if lowest.map_or(true, |l| scores[p] < scores[l]) {
                lowest = Some(p);
            }
        }
        let Some(p) = lowest else {
            break;
        };
        scores[p] += weighted_score(card, Category::Lore, settings);
        lore[p].push(card.clone());
        assigned += 1;
    }

    if assigned < target {
        return None;
    }

    let spread = spread_of(&scores);
    Some(Assignment {
        leaders: leaders.to_vec(),
        lore,
        scores,
        spread,
    })
}

/// Try every choice and ordering of `num_players` leaders from the pool and
/// keep the assignment with the smallest spread (first found on ties).
///
/// Cost is C(leaders, N) x N! greedy passes over the lore, so this is only
/// practical for small tables.
pub fn find_best_assignment(
    leaders: &[Card],
    lore: &[Card],
    settings: &DraftSettings,
) -> Option<Assignment> {
    let mut lore_by_value = lore.to_vec();
    lore_by_value.sort_by(|a, b| b.value.total_cmp(&a.value));

    let mut best: Option<Assignment> = None;
    for combo in combinations_of(leaders, settings.num_players) {
        for perm in permutations_of(&combo) {
            let Some(candidate) = distribute_lore(&perm, &lore_by_value, settings) else {
                continue;
            };
            if best.as_ref().map_or(true, |b| candidate.spread < b.spread) {
                best = Some(candidate);
            }
        }
    }
    best
}

fn check_pool(
    category: Category,
    pool_size: usize,
    list_len: usize,
    needed: usize,
) -> Result<(), BalanceError> {
    if pool_size < needed {
        return Err(BalanceError::PoolTooSmall {
            category,
            available: pool_size,
            required: needed,
        });
    }
    if list_len < pool_size {
        return Err(BalanceError::PoolTooSmall {
            category,
            available: list_len,
            required: pool_size,
        });
    }
    Ok(())
}

/// Sample pools from `tier_list` `options.attempts` times and return the one
/// whose best assignment has the smallest spread.
///
/// Each sampled pool is rescored on its own before the search, so the values
/// carried in the result are exactly what a draft started on that pool sees.
pub fn generate_balanced_draft<R: Rng + ?Sized>(
    tier_list: &TierList,
    settings: &DraftSettings,
    options: &BalanceOptions,
    rng: &mut R,
) -> Result<BalancedDraft, BalanceError> {
    settings.validate()?;

    if settings.num_players > options.max_players {
        return Err(BalanceError::TooManyPlayers {
            players: settings.num_players,
            max: options.max_players,
        });
    }

    if options.pool.leader_pool_size > options.max_leader_pool {
        return Err(BalanceError::PoolTooLarge {
            size: options.pool.leader_pool_size,
            max: options.max_leader_pool,
        });
    }

    for category in [Category::Leader, Category::Lore] {
        check_pool(
            category,
            options.pool.size(category),
            tier_list.cards(category).len(),
            settings.cards_needed(category),
        )?;
    }

    let mut best: Option<BalancedDraft> = None;

    for attempt in 0..options.attempts {
        let Some(mut leader_pool) = pick_with_constraint(
            tier_list.leaders(),
            options.pool.leader_pool_size,
            options.pool.leader_tier_constraint,
            rng,
        ) else {
            continue;
        };
        let Some(mut lore_pool) = pick_with_constraint(
            tier_list.lore(),
            options.pool.lore_pool_size,
            options.pool.lore_tier_constraint,
            rng,
        ) else {
            continue;
        };

        assign_values(&mut leader_pool, settings.tier_scoring);
        assign_values(&mut lore_pool, settings.tier_scoring);

        let Some(assignment) = find_best_assignment(&leader_pool, &lore_pool, settings) else {
            continue;
        };

        if best
            .as_ref()
            .map_or(true, |b| assignment.spread < b.assignment.spread)
        {
            debug!("attempt {}: new best spread {:.3}", attempt, assignment.spread);
            best = Some(BalancedDraft {
                leader_pool,
                lore_pool,
                assignment,
            });
        }
    }

    match best {
        Some(draft) => {
            info!(
                "Balanced draft found: spread {:.3} over {} players",
                draft.assignment.spread, settings.num_players
            );
            Ok(draft)
        }
        None => Err(BalanceError::Infeasible {
            attempts: options.attempts,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Tier;
    use crate::balance::sampling::TierConstraint;
    use crate::valuation::tiers::TierScoring;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn settings(num_players: usize, lore_per_player: usize) -> DraftSettings {
        DraftSettings {
            num_players,
            lore_per_player,
            leader_weight: 3.0,
            lore_weight: 1.0,
            tier_scoring: TierScoring::Same,
            ..DraftSettings::default()
        }
    }

    fn scored(entries: &[(&str, Tier)]) -> Vec<Card> {
        let mut cards: Vec<Card> = entries.iter().map(|(n, t)| Card::new(*n, *t)).collect();
        assign_values(&mut cards, TierScoring::Same);
        cards
    }

    fn tier_list() -> TierList {
        TierList::new(
            scored(&[
                ("Noble", Tier::S),
                ("Archivist", Tier::A),
                ("Quartermaster", Tier::B),
                ("Elder", Tier::C),
                ("Rebel", Tier::D),
            ]),
            scored(&[
                ("Living Structures", Tier::S),
                ("Sprinter Drives", Tier::A),
                ("Repair Drones", Tier::A),
                ("Mirror Plating", Tier::B),
                ("Gas Harvesters", Tier::C),
                ("Tycoon's Charm", Tier::D),
            ]),
            TierScoring::Same,
        )
        .unwrap()
    }

    #[test]
    fn finds_zero_spread_assignment() {
        let s = DraftSettings {
            leader_weight: 1.0,
            ..settings(2, 1)
        };
        let leaders = scored(&[("LS", Tier::S), ("LB", Tier::B), ("LD", Tier::D)]);
        let lore = scored(&[("XS", Tier::S), ("XD", Tier::D)]);

        let best = find_best_assignment(&leaders, &lore, &s).expect("assignment exists");
        assert!(approx_eq(best.spread, 0.0));
        let names: Vec<&str> = best.leaders.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["LS", "LD"]);
        assert_eq!(best.lore[0][0].name, "XD");
        assert_eq!(best.lore[1][0].name, "XS");
        assert!(approx_eq(best.scores[0], 6.0));
        assert!(approx_eq(best.scores[1], 6.0));
    }

    #[test]
    fn greedy_lore_goes_to_lowest_player() {
        let s = settings(2, 2);
        let leaders = scored(&[("High", Tier::S), ("Low", Tier::C)]);
        let lore = scored(&[("w", Tier::D), ("x", Tier::S), ("y", Tier::A), ("z", Tier::B)]);
        let assignment = distribute_lore(&leaders, &scored_sorted(&lore), &s).unwrap();
        // High = 15, Low = 6. Low takes 5 and 4, High takes 3 and 1.
        let low: Vec<&str> = assignment.lore[1].iter().map(|c| c.name.as_str()).collect();
        assert_eq!(low, vec!["x", "y"]);
        assert!(approx_eq(assignment.scores[0], 19.0));
        assert!(approx_eq(assignment.scores[1], 15.0));
        assert!(approx_eq(assignment.spread, 4.0));
    }

    fn scored_sorted(cards: &[Card]) -> Vec<Card> {
        let mut sorted = cards.to_vec();
        sorted.sort_by(|a, b| b.value.total_cmp(&a.value));
        sorted
    }

    #[test]
    fn too_little_lore_is_not_an_assignment() {
        let s = settings(2, 2);
        let leaders = scored(&[("A", Tier::S), ("B", Tier::A)]);
        let lore = scored(&[("x", Tier::S), ("y", Tier::A), ("z", Tier::B)]);
        assert!(find_best_assignment(&leaders, &lore, &s).is_none());
    }

    #[test]
    fn generated_draft_fills_every_player() {
        let s = settings(3, 1);
        let options = BalanceOptions::for_settings(&s);
        let mut rng = StdRng::seed_from_u64(42);
        let draft = generate_balanced_draft(&tier_list(), &s, &options, &mut rng).unwrap();

        assert_eq!(draft.leader_pool.len(), 4);
        assert_eq!(draft.lore_pool.len(), 4);
        assert_eq!(draft.assignment.leaders.len(), 3);
        assert!(draft.assignment.lore.iter().all(|l| l.len() == 1));

        let max = draft.assignment.scores.iter().cloned().fold(f64::MIN, f64::max);
        let min = draft.assignment.scores.iter().cloned().fold(f64::MAX, f64::min);
        assert!(approx_eq(draft.assignment.spread, max - min));
        for leader in &draft.assignment.leaders {
            assert!(draft.leader_pool.iter().any(|c| c.name == leader.name));
        }
    }

    #[test]
    fn same_seed_is_reproducible() {
        let s = settings(2, 2);
        let options = BalanceOptions::for_settings(&s);
        let a = generate_balanced_draft(&tier_list(), &s, &options, &mut StdRng::seed_from_u64(9))
            .unwrap();
        let b = generate_balanced_draft(&tier_list(), &s, &options, &mut StdRng::seed_from_u64(9))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn too_many_players_is_rejected() {
        let s = settings(6, 0);
        let options = BalanceOptions::for_settings(&s);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            generate_balanced_draft(&tier_list(), &s, &options, &mut rng),
            Err(BalanceError::TooManyPlayers { players: 6, max: 5 })
        ));
    }

    #[test]
    fn oversized_leader_pool_is_rejected() {
        let s = settings(3, 1);
        let mut options = BalanceOptions::for_settings(&s);
        options.pool.leader_pool_size = DEFAULT_MAX_LEADER_POOL + 1;
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            generate_balanced_draft(&tier_list(), &s, &options, &mut rng),
            Err(BalanceError::PoolTooLarge { size: 11, max: 10 })
        ));

        options.max_leader_pool = 4;
        options.pool.leader_pool_size = 5;
        assert!(matches!(
            generate_balanced_draft(&tier_list(), &s, &options, &mut rng),
            Err(BalanceError::PoolTooLarge { size: 5, max: 4 })
        ));
    }

    #[test]
    fn small_pools_are_rejected() {
        let s = settings(3, 1);
        let mut options = BalanceOptions::for_settings(&s);
        options.pool.leader_pool_size = 2;
        let mut rng = StdRng::seed_from_u64(1);
        match generate_balanced_draft(&tier_list(), &s, &options, &mut rng) {
            Err(BalanceError::PoolTooSmall {
                category,
                available,
                required,
            }) => {
                assert_eq!(category, Category::Leader);
                assert_eq!(available, 2);
                assert_eq!(required, 3);
            }
            other => panic!("expected PoolTooSmall, got {other:?}"),
        }

        options.pool.leader_pool_size = 3;
        options.pool.lore_pool_size = 7;
        assert!(matches!(
            generate_balanced_draft(&tier_list(), &s, &options, &mut rng),
            Err(BalanceError::PoolTooSmall {
                category: Category::Lore,
                available: 6,
                required: 7
            })
        ));
    }

    #[test]
    fn impossible_constraint_is_infeasible() {
        // Every leader has its own tier, so no two share one.
        let s = settings(2, 1);
        let mut options = BalanceOptions::for_settings(&s);
        options.attempts = 5;
        options.pool.leader_tier_constraint = TierConstraint::Same;
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            generate_balanced_draft(&tier_list(), &s, &options, &mut rng),
            Err(BalanceError::Infeasible { attempts: 5 })
        ));
    }
}
