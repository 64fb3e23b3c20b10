// Subcommand implementations. Results go to stdout; diagnostics go to the log.

use std::path::Path;

use anyhow::{bail, Context};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use arcs_draft_core::balance::sampling::pick_with_constraint;
use arcs_draft_core::balance::{generate_balanced_draft, BalanceOptions};
use arcs_draft_core::card::{Card, Category};
use arcs_draft_core::config::{Config, DraftSettings};
use arcs_draft_core::draft::order::{build_draft_order, DraftOrderPolicy};
use arcs_draft_core::draft::state::DraftState;
use arcs_draft_core::simulate::{self, SimulationOptions};
use arcs_draft_core::sources::{tier_csv, winrate, TierList};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Load the configured tier list, or build one from win rates when given.
pub fn load_tier_list(
    base_dir: &Path,
    config: &Config,
    win_rates: Option<&Path>,
) -> anyhow::Result<TierList> {
    let scoring = config.draft.tier_scoring;
    let list = match win_rates {
        Some(path) => winrate::load_win_rate_csv(path, scoring)
            .with_context(|| format!("failed to load win rates from {}", path.display()))?,
        None => {
            let path = base_dir.join(&config.data_paths.tier_list);
            tier_csv::load_tier_csv(&path, scoring)
                .with_context(|| format!("failed to load tier list from {}", path.display()))?
        }
    };
    info!(
        "Tier list ready: {} leaders, {} lore",
        list.leaders().len(),
        list.lore().len()
    );
    Ok(list)
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn print_cards(title: &str, cards: &[Card]) {
    println!("{title}");
    for card in cards {
        println!("  {:<24} {:<3} {:>5.2}", card.name, card.tier.label(), card.value);
    }
}

fn print_boards(state: &DraftState) {
    let scores = state.player_scores();
    println!();
    for (idx, (player, score)) in state.players().iter().zip(&scores).enumerate() {
        let leader = player.leader.as_ref().map_or("-", |c| c.name.as_str());
        let lore: Vec<&str> = player.lore.iter().map(|c| c.name.as_str()).collect();
        println!(
            "Player {}: {} | {} | leader {:.2} + lore {:.2} = {:.2}",
            idx + 1,
            leader,
            if lore.is_empty() { "-".to_string() } else { lore.join(", ") },
            score.leader,
            score.lore,
            score.total
        );
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

pub fn tiers(tier_list: &TierList) -> anyhow::Result<()> {
    println!("Scoring: {}", tier_list.scoring().label());
    print_cards("Leaders:", tier_list.leaders());
    print_cards("Lore:", tier_list.lore());
    Ok(())
}

pub fn order(
    config: &Config,
    players: Option<usize>,
    policy: Option<DraftOrderPolicy>,
) -> anyhow::Result<()> {
    let players = players.unwrap_or(config.draft.num_players);
    if players == 0 {
        bail!("number of players must be at least 1");
    }
    let policy = policy.unwrap_or(config.draft.draft_order);
    let order = build_draft_order(players, policy);
    let seats: Vec<String> = order.iter().map(|s| s.to_string()).collect();
    println!("{} order for {} players: {}", policy.label(), players, seats.join(" "));
    Ok(())
}

pub fn auto(
    config: &Config,
    tier_list: &TierList,
    seed: Option<u64>,
    order: Option<DraftOrderPolicy>,
) -> anyhow::Result<()> {
    let settings = DraftSettings {
        draft_order: order.unwrap_or(config.draft.draft_order),
        ..config.draft.clone()
    };
    let mut rng = make_rng(seed);

    let mut pools = Vec::new();
    for category in [Category::Leader, Category::Lore] {
        let Some(pool) = pick_with_constraint(
            tier_list.cards(category),
            config.pool.size(category),
            config.pool.constraint(category),
            &mut rng,
        ) else {
            bail!(
                "cannot draw {} {} cards with the '{}' constraint",
                config.pool.size(category),
                category,
                config.pool.constraint(category).label()
            );
        };
        pools.push(pool);
    }
    let lore = pools.pop().unwrap_or_default();
    let leaders = pools.pop().unwrap_or_default();

    let mut state = DraftState::new(settings, leaders, lore).context("failed to start draft")?;
    print_cards("Leader pool:", state.available(Category::Leader));
    print_cards("Lore pool:", state.available(Category::Lore));
    println!();

    let limit = state.settings().total_picks();
    for pick_no in 1..=limit {
        let (Some(seat), Some(rec)) = (state.current_drafter(), state.recommend()) else {
            break;
        };
        state
            .make_pick(rec.category, &rec.name)
            .with_context(|| format!("pick {pick_no} failed"))?;
        println!("#{pick_no:<2} player {seat}: {rec}");
    }

    if !state.is_complete() {
        bail!("draft ended with empty slots");
    }
    print_boards(&state);
    Ok(())
}

pub fn balance(
    config: &Config,
    tier_list: &TierList,
    seed: Option<u64>,
    json: bool,
) -> anyhow::Result<()> {
    let options = BalanceOptions::from_config(config);
    let mut rng = make_rng(seed);
    let balanced = generate_balanced_draft(tier_list, &config.draft, &options, &mut rng)
        .context("balanced draft search failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&balanced)?);
        return Ok(());
    }

    let state = DraftState::from_balanced(config.draft.clone(), &balanced)
        .context("failed to apply balanced draft")?;
    print_cards("Leader pool:", &balanced.leader_pool);
    print_cards("Lore pool:", &balanced.lore_pool);
    print_boards(&state);
    println!("\nSpread: {:.2}", balanced.assignment.spread);
    Ok(())
}

pub fn simulate(
    config: &Config,
    tier_list: &TierList,
    runs: usize,
    out: Option<&Path>,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let options = SimulationOptions::new(runs, &config.pool);
    let mut rng = make_rng(seed);
    let rows = simulate::simulate(tier_list, &config.draft, &options, &mut rng)
        .context("simulation failed")?;

    if let Some(path) = out {
        let file = std::fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        simulate::write_csv(&rows, file)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Wrote {} rows to {}", rows.len(), path.display());
    }

    for summary in simulate::summarize(&rows) {
        let s = &summary.stats;
        println!(
            "\n{} ({} results): mean {:.2}, std {:.2}, min {:.2}, max {:.2}",
            summary.draft_order, s.count, s.mean, s.std_dev, s.min, s.max
        );
        for seat in &summary.seats {
            let st = &seat.stats;
            println!(
                "  player {}: mean {:.2}, std {:.2}, min {:.2}, max {:.2}",
                seat.player, st.mean, st.std_dev, st.min, st.max
            );
        }
    }
    Ok(())
}
