//! MAPPO Timeline CLI
//!
//! Resolve, play back, and export the interstate resource-conflict timeline.

use clap::Parser;
use mappo_core::{resource_history, Phase, Snapshot, SnapshotMetrics, StrategyBook, MAX_CYCLE};
use mappo_env::{SimClock, TokioClock};
use mappo_sim::scenarios::ScenarioId;
use mappo_sim::{
    CoordinatorConfig, CycleCoordinator, PlaybackReport, PlaybackRunner, SimError, TimelineExport,
    VirtualClock,
};
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Rows of resource history shown for a selected region
const HISTORY_TAIL: usize = 5;

/// MAPPO interstate resource-conflict timeline
#[derive(Parser, Debug)]
#[command(name = "mappo-sim")]
#[command(about = "Resolve and play back the interstate resource-conflict timeline", long_about = None)]
struct Args {
    /// Cycle to resolve (or to start playback from)
    #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
    cycle: i64,

    /// Play from --cycle until the last cycle or --until
    #[arg(short, long)]
    play: bool,

    /// Pause playback at this cycle
    #[arg(long)]
    until: Option<u32>,

    /// Playback speed multiplier (1-5)
    #[arg(long, default_value = "1")]
    speed: u32,

    /// Sleep on the wall clock instead of the virtual clock
    #[arg(long)]
    realtime: bool,

    /// Quick scenario to apply (name, number, or keywords)
    #[arg(short = 'S', long)]
    scenario: Option<String>,

    /// Jump to a scripted event's cycle
    #[arg(short, long)]
    event: Option<String>,

    /// Region to select and describe
    #[arg(long)]
    select: Option<String>,

    /// Strategy phase for the selected region (early, late)
    #[arg(long, default_value = "late")]
    phase: Phase,

    /// Export every cycle to a JSON file
    #[arg(long)]
    export: Option<String>,

    /// Check the registries and rule table, then exit
    #[arg(long)]
    validate: bool,

    /// JSON output
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Seed for resource history jitter
    #[arg(short, long, default_value = "42")]
    seed: u64,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    if let Err(e) = run(args).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), SimError> {
    let config = CoordinatorConfig::default().with_speed_value(args.speed)?;
    let mut coordinator = CycleCoordinator::new(config);
    let clock = VirtualClock::shared(args.seed);

    if args.validate {
        let report = coordinator.timeline().validate();
        if args.json {
            let issues: Vec<String> = report.issues.iter().map(|i| i.to_string()).collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "clean": report.is_clean(),
                    "issues": issues,
                }))?
            );
        } else if report.is_clean() {
            info!("✓ Registries and rule table are consistent");
            for regime in coordinator.timeline().rules().regimes() {
                info!("  {} {}: {} rules", regime.id.name(), regime.window, regime.rule_count());
            }
        } else {
            error!("{}", report);
        }
        return report.into_result().map_err(SimError::from);
    }

    coordinator.jump_to(args.cycle);

    let scenario = args
        .scenario
        .as_deref()
        .map(|query| {
            query
                .parse::<ScenarioId>()
                .map_err(|_| SimError::UnknownScenario(query.to_string()))
        })
        .transpose()?;

    if let Some(scenario) = scenario {
        coordinator.apply_scenario(scenario);
        if !args.json {
            info!(
                "{}: {} ({})",
                scenario.title(),
                scenario.description(),
                scenario.resource_impact()
            );
        }
    }

    if let Some(event) = &args.event {
        coordinator.jump_to_event(event)?;
    }

    if let Some(id) = &args.select {
        coordinator.select(id)?;
    }

    if let Some(path) = &args.export {
        let mut export = match scenario {
            Some(scenario) => TimelineExport::for_scenario(scenario, clock.seed()),
            None => TimelineExport::new("timeline", clock.seed()),
        };
        export.capture(coordinator.timeline(), 0, MAX_CYCLE);
        export.finalize(coordinator.timeline());
        export.write_to_file(path)?;
        info!("Exported {} frames to {}", export.frames.len(), path);
        return Ok(());
    }

    if args.play {
        let report = if args.realtime {
            play(TokioClock::shared(), args.until, &mut coordinator).await
        } else {
            play(clock.clone(), args.until, &mut coordinator).await
        };

        if args.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "start_cycle": report.start_cycle,
                    "end_cycle": report.end_cycle,
                    "ticks": report.ticks,
                    "elapsed_secs": report.elapsed.as_secs_f64(),
                    "events_surfaced": report.events_surfaced,
                    "finished": report.finished,
                    "seed": report.seed,
                }))?
            );
            return Ok(());
        }
    }

    let snapshot = coordinator.snapshot();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_summary(&snapshot);
        if let Some(id) = coordinator.selected() {
            print_selection(&coordinator, &snapshot, id, args.phase, clock.seed());
        }
    }

    Ok(())
}

async fn play<C: SimClock>(
    clock: Arc<C>,
    until: Option<u32>,
    coordinator: &mut CycleCoordinator,
) -> PlaybackReport {
    let mut runner = PlaybackRunner::new(clock);
    if let Some(stop) = until {
        runner = runner.with_stop_at(stop);
    }
    runner.run(coordinator, |_| {}).await
}

fn print_summary(snapshot: &Snapshot) {
    let metrics = SnapshotMetrics::from_snapshot(snapshot);

    println!("Cycle {}: {}", snapshot.cycle, metrics.system_status.name());
    println!(
        "  regions: {} stable, {} stressed, {} critical, {} collapsed",
        metrics.stable, metrics.stressed, metrics.critical, metrics.collapsed
    );

    let regimes: Vec<&str> = snapshot.active_regimes.iter().map(|r| r.name()).collect();
    println!("  regimes: {}", regimes.join(", "));

    let broken: Vec<String> = snapshot.broken_links().map(|r| r.key()).collect();
    if !broken.is_empty() {
        println!("  broken links: {}", broken.join(", "));
    }

    if let Some(pair) = &metrics.hottest_pair {
        println!(
            "  hottest pair: {} ({:.0}%), {} hotspots",
            pair,
            metrics.hottest_probability * 100.0,
            metrics.hotspots
        );
    }

    println!("  events:");
    for event in &snapshot.events {
        println!("    [{:>3}] {} ({})", event.cycle, event.description, event.kind.name());
    }

    if let Some(case) = &snapshot.case_study {
        println!("  case study: {}", case);
    }
}

fn print_selection(
    coordinator: &CycleCoordinator,
    snapshot: &Snapshot,
    id: &str,
    phase: Phase,
    seed: u64,
) {
    let Some(entity) = snapshot.entity(id) else {
        return;
    };

    println!();
    println!("{} ({}): {}", entity.name, entity.id, entity.status);
    println!(
        "  water {}%, power {}%, agriculture {}%",
        entity.resources.water, entity.resources.power, entity.resources.agriculture
    );

    let broken: Vec<String> = snapshot.broken_links().map(|r| r.key()).collect();
    let links: Vec<String> = coordinator
        .timeline()
        .registry()
        .links_of(id)
        .map(|r| {
            let key = r.key();
            let suffix = if broken.contains(&key) { " (broken)" } else { "" };
            format!("{}{}", key, suffix)
        })
        .collect();
    if !links.is_empty() {
        println!("  links: {}", links.join(", "));
    }

    let events: Vec<&str> = snapshot
        .events
        .iter()
        .filter(|e| e.involves(id))
        .map(|e| e.description.as_str())
        .collect();
    if !events.is_empty() {
        println!("  events:");
        for description in events {
            println!("    {}", description);
        }
    }

    let book = StrategyBook::india();
    if let Some(profile) = book.strategy(id) {
        println!("  strategies ({:?}):", phase);
        for (name, frequency) in profile.ranked(phase) {
            println!("    {:>3}%  {}", frequency, name);
        }
    }
    if let Some(attention) = book.attention(id) {
        println!("  attention ({}):", attention.agent);
        for weight in attention.ranked() {
            println!("    {:.2}  {}", weight.weight, weight.target);
        }
    }

    let history = resource_history(id, seed);
    println!("  history (last {} cycles):", HISTORY_TAIL);
    for sample in history.iter().skip(history.len().saturating_sub(HISTORY_TAIL)) {
        println!(
            "    t{:>2}  groundwater {:5.1}  reservoir {:5.1}  yield {:5.1}",
            sample.cycle, sample.groundwater, sample.reservoir, sample.crop_yield
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_defaults_to_learned_table() {
        let args = Args::parse_from(["mappo-sim"]);
        assert_eq!(args.phase, Phase::Late);
        assert_eq!(args.speed, 1);
    }

    #[tokio::test]
    async fn test_out_of_range_speed_is_rejected() {
        let args = Args::parse_from(["mappo-sim", "--speed", "9"]);
        assert!(matches!(run(args).await, Err(SimError::Env(_))));
    }
}
