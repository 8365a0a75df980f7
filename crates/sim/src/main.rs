//! Headless encounter simulator.
//!
//! Loads the rule content, spawns a party and a pack of enemies, then lets
//! a simple policy play the party until one side falls. Every stamped event
//! is printed as it is published.
//!
//! ```bash
//! RUST_LOG=runtime::combat=debug cargo run -p tactics-sim -- --seed 7 --floor 2 --enemies goblin,orc
//! ```

mod policy;

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tactics_content::{Content, ContentFactory, bundled};
use tactics_core::{CombatEvent, EntityId, Position, TurnProgress};
use tactics_runtime::{
    ActionResponse, CombatAction, CombatOrchestrator, RuntimeConfig, StampedEvent, Topic,
};
use tokio::sync::broadcast::{self, error::TryRecvError};

/// Runs one auto-played encounter and prints its event log.
#[derive(Parser)]
#[command(name = "tactics-sim")]
#[command(about = "Simulate a tactical encounter", long_about = None)]
#[command(version)]
struct Cli {
    /// Dice seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Dungeon floor; deeper floors add to initiative rolls
    #[arg(long)]
    floor: Option<u32>,

    /// Data directory; the embedded tables are used when omitted
    #[arg(long)]
    data: Option<PathBuf>,

    /// Party templates to recruit
    #[arg(long, value_delimiter = ',', default_value = "fighter,rogue")]
    party: Vec<String>,

    /// Bestiary templates to fight
    #[arg(long, value_delimiter = ',', default_value = "goblin,skeleton")]
    enemies: Vec<String>,

    /// Party actions before the encounter is abandoned
    #[arg(long, default_value_t = 200)]
    max_actions: u32,

    /// Print events as JSON lines
    #[arg(long)]
    json: bool,
}

type Receivers = HashMap<Topic, broadcast::Receiver<StampedEvent>>;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let content = load_content(&cli)?;

    let mut config = RuntimeConfig {
        rng_seed: cli.seed,
        ..RuntimeConfig::default()
    };
    if let Some(floor) = cli.floor {
        let mut combat = content.config.clone();
        combat.current_floor = floor.max(1);
        config.combat = Some(combat);
    }
    let mut orchestrator = CombatOrchestrator::new(content, config);
    let mut receivers = orchestrator.bus().subscribe_multiple(&Topic::ALL);

    for (row, key) in cli.party.iter().enumerate() {
        orchestrator.recruit(key, Position::new(0, row as i32))?;
    }
    let mut enemies = Vec::with_capacity(cli.enemies.len());
    for (row, key) in cli.enemies.iter().enumerate() {
        enemies.push(orchestrator.spawn_enemy(key, Position::new(4, row as i32))?);
    }

    let names: HashMap<EntityId, String> = orchestrator
        .roster()
        .iter()
        .map(|e| (e.id, e.name.clone()))
        .chain(enemies.iter().map(|e| (e.id, e.name.clone())))
        .collect();

    let mut progress = orchestrator.start_combat(enemies)?;
    print_events(&mut receivers, &names, cli.json)?;

    let mut actions = 0;
    while let TurnProgress::AwaitingPlayer(actor) = progress {
        if actions >= cli.max_actions {
            tracing::warn!(actions, "action limit reached, abandoning the encounter");
            let summary = orchestrator.end_combat(false)?;
            progress = TurnProgress::Ended(summary);
            print_events(&mut receivers, &names, cli.json)?;
            break;
        }
        actions += 1;

        let action = policy::choose(orchestrator.content(), orchestrator.roster(), actor);
        let ends_turn = matches!(action, CombatAction::EndTurn { .. });
        progress = match orchestrator.handle_action(action) {
            Ok(ActionResponse::SkillUsed {
                progress: Some(progress),
                ..
            }) => progress,
            Ok(ActionResponse::TurnEnded { progress }) => progress,
            Ok(_) => TurnProgress::AwaitingPlayer(actor),
            Err(e) if !ends_turn => {
                tracing::debug!(error = %e, "policy pick rejected, ending turn");
                orchestrator.end_turn(actor)?
            }
            Err(e) => return Err(e.into()),
        };
        print_events(&mut receivers, &names, cli.json)?;
    }

    if let TurnProgress::Ended(summary) = progress {
        tracing::info!(
            outcome = ?summary.outcome,
            rounds = summary.rounds,
            survivors = summary.players_alive,
            actions,
            "encounter finished"
        );
    }
    Ok(())
}

fn load_content(cli: &Cli) -> Result<Content> {
    match &cli.data {
        Some(dir) => ContentFactory::new(dir.clone())
            .load_all()
            .with_context(|| format!("loading content from {}", dir.display())),
        None => bundled::load().context("loading embedded content"),
    }
}

fn print_events(
    receivers: &mut Receivers,
    names: &HashMap<EntityId, String>,
    json: bool,
) -> Result<()> {
    let mut events = Vec::new();
    for (topic, rx) in receivers.iter_mut() {
        loop {
            match rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(?topic, skipped, "event log fell behind");
                }
                Err(_) => break,
            }
        }
    }
    events.sort_by_key(|e| e.sequence);

    for stamped in events {
        if json {
            println!("{}", serde_json::to_string(&stamped)?);
        } else {
            println!(
                "[r{:>2} #{:>4}] {}",
                stamped.round,
                stamped.sequence,
                describe(&stamped.event, names)
            );
        }
    }
    Ok(())
}

fn describe(event: &CombatEvent, names: &HashMap<EntityId, String>) -> String {
    let name = |id: &EntityId| names.get(id).cloned().unwrap_or_else(|| id.to_string());
    match event {
        CombatEvent::AbilityUsed {
            entity,
            ability,
            target,
            effects,
            ..
        } => {
            let on = target.as_ref().map(|t| format!(" on {}", name(t))).unwrap_or_default();
            let summary: Vec<String> = effects
                .iter()
                .map(|d| format!("{:?} {:.0}", d.effect, d.amount))
                .collect();
            format!("{} used {}{} [{}]", name(entity), ability, on, summary.join(", "))
        }
        CombatEvent::AbilityFailed {
            entity,
            ability,
            roll,
            success_rate,
            ..
        } => format!(
            "{} failed {} (rolled {:.1} vs {:.1}%)",
            name(entity),
            ability,
            roll,
            success_rate
        ),
        CombatEvent::EntityDied { entity, killer } => match killer {
            Some(killer) => format!("{} was slain by {}", name(entity), name(killer)),
            None => format!("{} died", name(entity)),
        },
        CombatEvent::SkillGained {
            entity,
            skill,
            new_level,
            ..
        } => format!("{} reached {} {}", name(entity), skill, new_level),
        CombatEvent::TurnStarted {
            entity,
            action_points,
            ..
        } => format!("{}'s turn ({} AP)", name(entity), action_points),
        CombatEvent::TurnEnded { entity, .. } => format!("{} ends turn", name(entity)),
        CombatEvent::CombatStarted { order } => {
            let order: Vec<String> = order
                .iter()
                .map(|(id, initiative)| format!("{} ({})", name(id), initiative))
                .collect();
            format!("combat begins: {}", order.join(" > "))
        }
        CombatEvent::CombatEnded { outcome, .. } => format!("combat over: {outcome:?}"),
        CombatEvent::StatusApplied {
            entity,
            status,
            stacks,
            remaining,
        } => format!(
            "{} is {} x{} for {} turns",
            name(entity),
            status,
            stacks,
            remaining
        ),
        CombatEvent::StatusTicked {
            entity,
            status,
            damage,
        } => format!("{} takes {} from {}", name(entity), damage, status),
        CombatEvent::EnemyAttacked {
            entity,
            target,
            damage,
        } => format!("{} hits {} for {}", name(entity), name(target), damage),
        CombatEvent::EnemyMoved { entity, to, .. } => {
            format!("{} moves to ({}, {})", name(entity), to.x, to.y)
        }
    }
}
