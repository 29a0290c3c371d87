//! `formgate` command line: simulator, session replay, config check and
//! the tabular chart flow.

mod replay;
mod terminal;

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use formgate_core::prelude::*;
use formgate_core::test_harness::{run_simulator, SimulatorConfig};
use formgate_tabular::{ChartKind, DataLoader, Row, StatusKind};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("formgate")
        .version(formgate_core::VERSION)
        .about("Sequential form validation gate")
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .help("Log filter, e.g. info or formgate_core=debug (overrides RUST_LOG)"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("simulate")
                .about("Run the randomized invariant simulator")
                .arg(
                    Arg::new("operations")
                        .long("ops")
                        .default_value("10000")
                        .value_parser(value_parser!(u64))
                        .help("Number of events to simulate"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .default_value("42")
                        .value_parser(value_parser!(u64))
                        .help("Random seed for reproducibility"),
                )
                .arg(
                    Arg::new("stop-on-violation")
                        .long("stop-on-violation")
                        .action(ArgAction::SetTrue)
                        .help("Stop simulation on first violation"),
                )
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("replay")
                .about("Play a JSON event script against a live session")
                .arg(
                    Arg::new("script")
                        .long("script")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Path to the event script"),
                )
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("check-config")
                .about("Validate a form configuration file")
                .arg(
                    Arg::new("path")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML, YAML or JSON form configuration"),
                ),
        )
        .subcommand(
            Command::new("chart")
                .about("Show a table and chart for parsed rows")
                .arg(
                    Arg::new("rows")
                        .long("rows")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON array of row objects"),
                )
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .default_value("bar")
                        .value_parser(["line", "pie", "bar"])
                        .help("Chart type"),
                ),
        )
}

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .value_parser(value_parser!(PathBuf))
        .help("Form configuration file (defaults to the contact form)")
}

fn init_tracing(matches: &ArgMatches) -> Result<()> {
    let filter = match matches.get_one::<String>("log-level") {
        Some(level) => EnvFilter::try_new(level).context("invalid --log-level")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if matches.get_flag("log-json") {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

fn form_config(args: &ArgMatches) -> Result<FormConfig> {
    match args.get_one::<PathBuf>("config") {
        Some(path) => {
            FormConfig::load(path).with_context(|| format!("loading {}", path.display()))
        }
        None => Ok(FormConfig::contact_form()),
    }
}

fn simulate(args: &ArgMatches) -> Result<bool> {
    let form = form_config(args)?;
    let config = SimulatorConfig {
        seed: *args.get_one::<u64>("seed").unwrap_or(&42),
        operations: *args.get_one::<u64>("operations").unwrap_or(&10_000),
        stop_on_first_violation: args.get_flag("stop-on-violation"),
    };
    info!(seed = config.seed, operations = config.operations, fields = form.fields.len(), "Running simulator");

    let report = run_simulator(&form, config)?;
    println!("{}", report.generate_text());
    Ok(report.passed())
}

async fn run_replay(args: &ArgMatches) -> Result<bool> {
    let form = form_config(args)?;
    let Some(script) = args.get_one::<PathBuf>("script") else {
        bail!("--script is required");
    };
    let steps = replay::load_script(script)?;
    let snapshot = replay::replay(&form, &steps).await?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(true)
}

fn check_config(path: &Path) -> Result<bool> {
    let form = FormConfig::load(path).with_context(|| format!("loading {}", path.display()))?;
    let registry = form.build()?;

    println!("Fields: {}", registry.len());
    for (i, field) in registry.ordered().enumerate() {
        println!(
            "  {}. {} ({}): {}",
            i + 1,
            field.id,
            field.display_name(),
            serde_json::to_string(&field.rule)?
        );
    }
    let submission = &form.submission;
    println!(
        "Submission: step {}%, tick {:?}, {} ticks, finalize after {:?}",
        submission.step_percent,
        submission.tick_period(),
        submission.ticks_to_complete(),
        submission.finalize_delay()
    );
    Ok(true)
}

fn chart(args: &ArgMatches) -> Result<bool> {
    let Some(path) = args.get_one::<PathBuf>("rows") else {
        bail!("--rows is required");
    };
    let kind: ChartKind = args
        .get_one::<String>("kind")
        .map_or("bar", String::as_str)
        .parse()?;

    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let rows: Vec<Row> =
        serde_json::from_str(&text).with_context(|| format!("parsing rows in {}", path.display()))?;

    let mut loader = DataLoader::without_parser(terminal::TextTable, terminal::TextChart::default());
    let status = loader.ingest(rows, &path.display().to_string()).clone();
    info!(status = %status.message, "Rows ingested");
    if status.kind == StatusKind::Error {
        eprintln!("{}", status.message);
        return Ok(false);
    }

    loader.chart(kind);
    let status = loader.status();
    println!("{}", status.message);
    Ok(status.kind != StatusKind::Error)
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(&matches)?;

    let passed = match matches.subcommand() {
        Some(("simulate", args)) => simulate(args)?,
        Some(("replay", args)) => run_replay(args).await?,
        Some(("check-config", args)) => match args.get_one::<PathBuf>("path") {
            Some(path) => check_config(path)?,
            None => bail!("a configuration path is required"),
        },
        Some(("chart", args)) => chart(args)?,
        _ => true,
    };

    if !passed {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn parses_simulate_flags() {
        let matches = cli()
            .try_get_matches_from(["formgate", "--log-level", "debug", "simulate", "--ops", "50", "--stop-on-violation"])
            .unwrap();
        assert_eq!(matches.get_one::<String>("log-level").map(String::as_str), Some("debug"));
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "simulate");
        assert_eq!(args.get_one::<u64>("operations"), Some(&50));
        assert_eq!(args.get_one::<u64>("seed"), Some(&42));
        assert!(args.get_flag("stop-on-violation"));
    }

    #[test]
    fn rejects_unknown_chart_kind() {
        let result = cli().try_get_matches_from(["formgate", "chart", "--rows", "r.json", "--kind", "radar"]);
        assert!(result.is_err());
    }

    #[test]
    fn simulate_contact_form_passes() {
        let matches = cli()
            .try_get_matches_from(["formgate", "simulate", "--ops", "500", "--seed", "7"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert!(simulate(args).unwrap());
    }
}
