//! Salesdash CLI
//!
//! Entry point for the `salesdash` command-line tool.

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use salesdash_charts::chart::{ChartDefaults, ChartKind, ChartSpec, Preset};
use salesdash_charts::config::{default_host_path, load_settings_file, EffectiveConfig};
use salesdash_charts::settings::{merge_layers, parse_assignment, SettingsTree};
use salesdash_charts::{demo, logging};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "salesdash")]
#[command(about = "Chart configuration for the sales dashboard", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project config file (default: ./salesdash.toml)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Override a config value, e.g. --set currency.symbol=USD
    #[arg(long = "set", value_name = "PATH=VALUE", global = true)]
    set: Vec<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge settings files (JSON or TOML), later files taking precedence
    Merge {
        /// Default settings file
        default: PathBuf,

        /// Override files, applied in order
        #[arg(required = true)]
        overrides: Vec<PathBuf>,
    },

    /// Print effective options for a chart kind
    Options {
        /// Chart kind: bar, line, doughnut (or pie)
        kind: String,

        /// Option override, e.g. -o plugins.legend.display=false
        #[arg(long = "option", short = 'o', value_name = "PATH=VALUE")]
        options: Vec<String>,

        /// File of option overrides (JSON or TOML)
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Build a preset chart from a JSON input file
    Preset {
        /// sales-trend, product-performance, customer-segmentation,
        /// monthly-comparison or dashboard-sales
        name: String,

        /// JSON input document
        #[arg(long, short = 'i')]
        input: PathBuf,

        /// Print formatted labels instead of the chart JSON
        #[arg(long)]
        text: bool,
    },

    /// Print the demo charts
    Demo {
        /// Seed for reproducible demo data
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show the effective configuration
    Config {
        /// Include schema, timestamp and contributing sources
        #[arg(long)]
        show_sources: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match &cli.command {
        Commands::Merge { default, overrides } => run_merge(default, overrides),
        Commands::Options { kind, options, file } => {
            run_options(&cli, kind, options, file.as_deref())
        }
        Commands::Preset { name, input, text } => run_preset(&cli, name, input, *text),
        Commands::Demo { seed } => run_demo(&cli, *seed),
        Commands::Config { show_sources } => run_config(&cli, *show_sources),
    }
}

fn fail(context: &str, err: impl Display) -> ! {
    eprintln!("{}: {}", context, err);
    process::exit(1);
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => fail("Error serializing output", e),
    }
}

fn parse_assignments(items: &[String]) -> Result<SettingsTree, String> {
    let mut tree = SettingsTree::new();
    for item in items {
        let (path, value) = parse_assignment(item).map_err(|e| e.to_string())?;
        tree.set_path(&path, value).map_err(|e| e.to_string())?;
    }
    Ok(tree)
}

fn load_config(cli: &Cli) -> Result<EffectiveConfig, String> {
    let overrides = if cli.set.is_empty() {
        None
    } else {
        Some(parse_assignments(&cli.set)?)
    };

    match &cli.config {
        Some(path) => {
            if !path.exists() {
                return Err(format!("config file not found: {}", path.display()));
            }
            EffectiveConfig::build(default_host_path().as_deref(), Some(path), overrides)
                .map_err(|e| e.to_string())
        }
        None => EffectiveConfig::load_default(overrides).map_err(|e| e.to_string()),
    }
}

fn chart_defaults(cli: &Cli) -> ChartDefaults {
    match load_config(cli) {
        Ok(config) => ChartDefaults::from_config(&config),
        Err(e) => fail("Error loading config", e),
    }
}

fn run_merge(default: &Path, overrides: &[PathBuf]) {
    let mut layers = Vec::with_capacity(overrides.len() + 1);
    for path in std::iter::once(default).chain(overrides.iter().map(PathBuf::as_path)) {
        match load_settings_file(path) {
            Ok((tree, digest)) => {
                tracing::debug!(path = %path.display(), %digest, "loaded settings layer");
                layers.push(tree);
            }
            Err(e) => fail("Error loading settings", e),
        }
    }
    print_json(&merge_layers(&layers));
}

fn run_options(cli: &Cli, kind: &str, options: &[String], file: Option<&Path>) {
    let kind: ChartKind = match kind.parse() {
        Ok(k) => k,
        Err(e) => fail("Error", e),
    };

    let mut layers = Vec::new();
    if let Some(path) = file {
        match load_settings_file(path) {
            Ok((tree, _)) => layers.push(tree),
            Err(e) => fail("Error loading options file", e),
        }
    }
    match parse_assignments(options) {
        Ok(tree) => layers.push(tree),
        Err(e) => fail("Error parsing option", e),
    }

    let defaults = chart_defaults(cli);
    print_json(&defaults.resolve(kind, &merge_layers(&layers)));
}

fn run_preset(cli: &Cli, name: &str, input: &Path, text: bool) {
    let preset: Preset = match name.parse() {
        Ok(p) => p,
        Err(e) => fail("Error", e),
    };

    let raw = match fs::read_to_string(input) {
        Ok(raw) => raw,
        Err(e) => fail(&format!("Error reading {}", input.display()), e),
    };
    let document: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(v) => v,
        Err(e) => fail(&format!("Error parsing {}", input.display()), e),
    };

    let defaults = chart_defaults(cli);
    let spec = match preset.build(&defaults, document) {
        Ok(spec) => spec,
        Err(e) => fail("Error building chart", e),
    };

    if text {
        print_labels(&spec, &defaults);
    } else {
        print_json(&spec);
    }
}

fn print_labels(spec: &ChartSpec, defaults: &ChartDefaults) {
    println!("{} chart, {} labels", spec.kind, spec.data.labels.len());
    if let Some(max) = max_value(spec) {
        for axis in ["x", "y"] {
            if let Some(tick) = spec.tick_label(axis, max, &defaults.currency) {
                println!("  {} axis max tick: {}", axis, tick);
            }
        }
    }
    for (d, dataset) in spec.data.datasets.iter().enumerate() {
        println!();
        println!("  {}", dataset.label.as_deref().unwrap_or("(unlabelled)"));
        for i in 0..dataset.data.len() {
            if let Some(label) = spec.tooltip_label(d, i, &defaults.currency) {
                println!("    {}", label);
            }
        }
    }
}

/// Largest finite data point across all datasets.
fn max_value(spec: &ChartSpec) -> Option<f64> {
    spec.data
        .datasets
        .iter()
        .flat_map(|d| d.data.iter().copied())
        .filter(|v| v.is_finite())
        .fold(None, |max: Option<f64>, v| Some(max.map_or(v, |m| m.max(v))))
}

fn run_demo(cli: &Cli, seed: Option<u64>) {
    let defaults = chart_defaults(cli);
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let registry = match demo::demo_charts(&defaults, &mut rng) {
        Ok(r) => r,
        Err(e) => fail("Error building demo charts", e),
    };

    let charts: serde_json::Map<String, serde_json::Value> = registry
        .iter()
        .filter_map(|(id, spec)| match spec.to_value() {
            Ok(value) => Some((id.to_string(), value)),
            Err(e) => {
                tracing::warn!(chart = id, error = %e, "skipping chart that failed to serialize");
                None
            }
        })
        .collect();
    print_json(&charts);
}

fn run_config(cli: &Cli, show_sources: bool) {
    let config = match load_config(cli) {
        Ok(c) => c,
        Err(e) => fail("Error loading config", e),
    };

    if show_sources {
        match config.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => fail("Error serializing output", e),
        }
    } else {
        print_json(&config.config);
    }
}
