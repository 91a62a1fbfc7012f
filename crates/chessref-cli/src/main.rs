//! chessref CLI: run table pipelines and build opening move trees.

use clap::{Parser, Subcommand};
use chessref_core::config::Config;
use chessref_core::table::Table;
use chessref_io::{write_json, CsvReader};
use chessref_operators::Filter;
use chessref_pipeline::{parse_yaml_pipeline, validate_pipeline, Engine, PipelineConfig};
use chessref_trie::{tokenize, MoveTree};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "chessref")]
#[command(about = "Reference-table statistics and opening move trees for chess data", long_about = None)]
struct Cli {
    /// Log filter (e.g. `info`, `chessref_operators=debug`); overrides CHESSREF_LOG
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a pipeline from a YAML file
    Run {
        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,

        /// Directory that relative source and sink paths are resolved against
        #[arg(long)]
        base_dir: Option<PathBuf>,

        /// Write a UTF-8 byte-order mark in front of CSV output (overrides config)
        #[arg(long)]
        write_bom: Option<bool>,

        /// Parse numeric CSV cells as numbers (overrides config)
        #[arg(long)]
        infer_types: Option<bool>,
    },

    /// Validate a pipeline YAML file (syntax and table names)
    Validate {
        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,
    },

    /// Show the steps a pipeline would execute
    Explain {
        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,
    },

    /// Build an opening move tree from a games CSV and write it as JSON
    MoveTree {
        /// Games CSV with one move list per row
        #[arg(short, long)]
        input: PathBuf,

        /// Destination JSON file
        #[arg(short, long)]
        output: PathBuf,

        /// Column holding the move list (overrides config)
        #[arg(long)]
        moves_column: Option<String>,

        /// Number of moves inserted per game (overrides config)
        #[arg(long)]
        max_depth: Option<usize>,

        /// Only keep games matching a predicate such as "opening_name == Reti Opening"
        #[arg(long)]
        filter: Option<String>,

        /// Drop nodes visited fewer times than this (overrides config)
        #[arg(long)]
        min_count: Option<u64>,
    },
}

fn main() {
    let cli = Cli::parse();
    initialize_logging(cli.log.as_deref());

    match cli.command {
        Commands::Run {
            pipeline,
            base_dir,
            write_bom,
            infer_types,
        } => {
            let overrides = Overrides {
                write_bom,
                infer_types,
                ..Overrides::default()
            };
            if let Err(e) = run_pipeline(&pipeline, base_dir, &overrides) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Validate { pipeline } => {
            if let Err(e) = check_pipeline(&pipeline) {
                eprintln!("Validation failed: {}", e);
                std::process::exit(1);
            }
            println!("✓ Pipeline is valid");
        }
        Commands::Explain { pipeline } => {
            if let Err(e) = explain_pipeline(&pipeline) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::MoveTree {
            input,
            output,
            moves_column,
            max_depth,
            filter,
            min_count,
        } => {
            let overrides = Overrides {
                moves_column,
                trie_max_depth: max_depth,
                trie_min_count: min_count,
                ..Overrides::default()
            };
            if let Err(e) = run_move_tree(&input, &output, filter.as_deref(), &overrides) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

/// Log level comes from `--log`, then `CHESSREF_LOG`, then defaults to `warn`.
fn initialize_logging(filter: Option<&str>) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(log::LevelFilter::Warn);
    builder.parse_env("CHESSREF_LOG");
    if let Some(filter) = filter {
        builder.parse_filters(filter);
    }
    builder.init();
}

/// Settings given on the command line. They take priority over the
/// pipeline's `config:` block, which takes priority over the environment.
#[derive(Debug, Default)]
struct Overrides {
    write_bom: Option<bool>,
    infer_types: Option<bool>,
    moves_column: Option<String>,
    trie_max_depth: Option<usize>,
    trie_min_count: Option<u64>,
}

fn layered_config(
    mut cfg: Config,
    doc: Option<&PipelineConfig>,
    overrides: &Overrides,
) -> Result<Config, Box<dyn std::error::Error>> {
    if let Some(doc) = doc {
        doc.apply_to(&mut cfg)?;
    }
    if let Some(v) = overrides.write_bom {
        cfg.write_bom = v;
    }
    if let Some(v) = overrides.infer_types {
        cfg.infer_types = v;
    }
    if let Some(column) = &overrides.moves_column {
        cfg.moves_column = column.clone();
    }
    if let Some(depth) = overrides.trie_max_depth {
        cfg.trie_max_depth = depth;
    }
    if let Some(min) = overrides.trie_min_count {
        cfg.trie_min_count = min;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn run_pipeline(
    pipeline_path: &Path,
    base_dir: Option<PathBuf>,
    overrides: &Overrides,
) -> Result<(), Box<dyn std::error::Error>> {
    let yaml_content = fs::read_to_string(pipeline_path)?;
    let mut parsed = parse_yaml_pipeline(&yaml_content)?;

    // The config block is folded in here so that flags win over it.
    let doc = parsed.config.take();
    let config = layered_config(Config::from_env(), doc.as_ref(), overrides)?;

    let mut engine = Engine::new(config)?;
    if let Some(dir) = base_dir {
        engine = engine.with_base_dir(dir);
    }
    let report = engine.run(&parsed)?;

    println!("✓ Pipeline executed successfully");
    for (name, rows) in &report.sources {
        println!("  source {}: {} rows", name, rows);
    }
    for step in &report.steps {
        println!("  step {} ({}): {} -> {} rows", step.index, step.op, step.output, step.rows);
    }
    for sink in &report.sinks {
        println!(
            "  sink {} -> {} ({} rows)",
            sink.table,
            sink.destination.display(),
            sink.rows
        );
    }
    Ok(())
}

fn check_pipeline(pipeline_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let yaml_content = fs::read_to_string(pipeline_path)?;
    let parsed = parse_yaml_pipeline(&yaml_content)?;
    validate_pipeline(&parsed, [])?;
    Ok(())
}

fn explain_pipeline(pipeline_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let yaml_content = fs::read_to_string(pipeline_path)?;
    let parsed = parse_yaml_pipeline(&yaml_content)?;
    validate_pipeline(&parsed, [])?;

    println!("Pipeline Execution Plan");
    println!("======================");
    println!();
    println!("Sources:");
    for source in &parsed.sources {
        println!("  {} <- {}", source.name, source.path);
    }
    println!();
    println!("Steps:");
    for (i, step) in parsed.steps.iter().enumerate() {
        println!("  {}. {}", i + 1, step.describe());
    }
    println!();
    println!("Sinks:");
    for sink in &parsed.sinks {
        println!("  {} -> {} ({:?})", sink.table, sink.destination, sink.format);
    }
    Ok(())
}

/// Insert the move list of every game in `games` into a fresh tree.
/// Games with an empty or missing move list only count at the root.
fn build_move_tree(
    games: &Table,
    moves_column: &str,
    max_depth: usize,
) -> Result<MoveTree, Box<dyn std::error::Error>> {
    games.require(moves_column)?;
    let mut tree = MoveTree::new();
    for game in games {
        let moves = game.try_get(moves_column)?.to_string();
        tree.insert(tokenize(&moves), max_depth);
    }
    log::info!(
        "move tree built from {} games: {} nodes, depth {}",
        games.len(),
        tree.len(),
        tree.depth()
    );
    Ok(tree)
}

fn run_move_tree(
    input: &Path,
    output: &Path,
    filter: Option<&str>,
    overrides: &Overrides,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = layered_config(Config::from_env(), None, overrides)?;

    let mut games = CsvReader::from_config(&config).read_path(input)?;
    if let Some(expr) = filter {
        games = Filter::new(expr).apply(&games)?;
    }

    let tree = build_move_tree(&games, &config.moves_column, config.trie_max_depth)?;
    let nodes = tree.pruned(config.trie_min_count);
    write_json(&nodes, output)?;

    println!(
        "✓ Move tree written to {} ({} games, {} nodes)",
        output.display(),
        games.len(),
        nodes.len()
    );
    Ok(())
}
