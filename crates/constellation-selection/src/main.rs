//! Constellation selection simulator
//!
//! Runs every scenario fixture through the selection service, then compares
//! priority-weight presets on the new-user fixture.
//!
//! ```text
//! constellation-sim [--json] [--metrics] [--snapshot <path>]
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use prometheus::{Encoder, Registry, TextEncoder};
use serde_json::json;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use constellation_common::VERSION;
use constellation_selection::{
    scenarios::{self, Scenario},
    InMemorySnapshotProvider, SelectionConfig, SelectionContext, SelectionMetrics,
    SelectionReport, SelectionService, Snapshot, StarState,
};

#[derive(Debug, Parser)]
#[command(name = "constellation-sim", version)]
#[command(about = "Run the selection engine over the built-in scenario fixtures")]
struct Cli {
    /// Print reports as JSON
    #[arg(long)]
    json: bool,

    /// Dump Prometheus metrics to stderr after the run
    #[arg(long)]
    metrics: bool,

    /// Extra snapshot (JSON) to run alongside the fixtures
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

fn print_report(scenario: &Scenario, report: &SelectionReport) {
    println!("\n{}", "=".repeat(60));
    println!("SCENARIO: {}", scenario.name);
    println!("{}", "=".repeat(60));

    let profile = &scenario.snapshot.profile;
    println!(
        "Stress: {:?}  Active: {}  Completion: {:.0}%  Minutes: {}",
        profile.stress,
        profile.active_count,
        profile.completion_rate * 100.0,
        profile.available_minutes
    );
    for star in &scenario.snapshot.stars {
        println!(
            "  - {}: brightness={:.2}, state={}, days_since={}",
            star.name,
            star.brightness,
            StarState::classify(star),
            star.days_since_action
        );
    }
    for edge in &scenario.snapshot.relationships {
        println!("  {} --[{:?}]--> {}", edge.source, edge.kind, edge.target);
    }

    println!("Selected {} of {} candidate(s):", report.admitted.len(), report.generated);
    for (rank, experiment) in report.admitted.iter().enumerate() {
        println!("  #{}: {}", rank + 1, experiment);
    }
    if !report.blocked.is_empty() {
        let blocked: Vec<_> = report.blocked.iter().map(|id| id.as_str()).collect();
        println!("Blocked: {}", blocked.join(", "));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting Constellation selection simulator v{}", VERSION);

    let cli = Cli::parse();
    let config = SelectionConfig::load()?;
    info!("Loaded configuration: {:?}", config);

    let registry = Registry::new();
    let metrics = SelectionMetrics::new()?;
    metrics.register(&registry)?;

    let mut fixtures = scenarios::all();
    if let Some(path) = &cli.snapshot {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        fixtures.push(Scenario {
            name: "Custom Snapshot",
            snapshot: Snapshot::from_json(&raw)?,
        });
    }

    let provider = Arc::new(InMemorySnapshotProvider::new());
    let users: Vec<Uuid> = fixtures
        .iter()
        .map(|scenario| {
            let user_id = Uuid::new_v4();
            provider.insert(user_id, scenario.snapshot.clone());
            user_id
        })
        .collect();

    let service = SelectionService::new(provider, config, metrics)?;
    let now = scenarios::reference_time();
    let results = service.select_for_users(&users, now).await;

    let base = SelectionContext::new(scenarios::new_user().snapshot)?;
    let sensitivity = scenarios::sensitivity_analysis(service.config(), &base, now)?;

    if cli.json {
        let mut runs = Vec::with_capacity(results.len());
        for (scenario, (_, result)) in fixtures.iter().zip(results) {
            let report = result?;
            runs.push(json!({ "scenario": scenario.name, "report": report }));
        }
        let output = json!({ "scenarios": runs, "sensitivity": sensitivity });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for (scenario, (_, result)) in fixtures.iter().zip(results) {
            print_report(scenario, &result?);
        }

        println!("\n{}", "=".repeat(60));
        println!("SENSITIVITY ANALYSIS");
        println!("{}", "=".repeat(60));
        for run in &sensitivity {
            let w = run.preset.weights;
            println!(
                "\n--- {} ({:.2}/{:.2}/{:.2}) ---",
                run.preset.name, w.urgency, w.capacity, w.success
            );
            for (rank, experiment) in run.selected.iter().enumerate() {
                println!("  #{}: {} - priority={:.3}", rank + 1, experiment.star_name, experiment.priority);
            }
        }
    }

    if cli.metrics {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
        eprintln!("{}", String::from_utf8(buffer)?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from(["constellation-sim", "--json", "--snapshot", "user.json"]).unwrap();
        assert!(cli.json);
        assert!(!cli.metrics);
        assert_eq!(cli.snapshot, Some(PathBuf::from("user.json")));
    }

    #[test]
    fn test_cli_rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["constellation-sim", "--verbose"]).is_err());
        assert!(Cli::try_parse_from(["constellation-sim", "--snapshot"]).is_err());
    }
}
