//! lexdawg CLI: build lexicon graphs and list plays for a board row.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use env_logger::Builder;
use log::{info, warn, LevelFilter};

use lexdawg::dawg::{build_dawg_from_file, cross_check, read_word_list, Dawg};
use lexdawg::game::{GameConfig, Language, MoveGenerator, Rack, Row, DEFAULT_LEFT_LIMIT};

/// Build minimal word graphs and enumerate word-game plays
#[derive(Parser, Debug)]
#[command(name = "lexdawg")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct LexdawgArgs {
    /// Verbosity level (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

impl LexdawgArgs {
    fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a graph from a sorted word list and save it
    Build(BuildArgs),
    /// Check whether words are in a saved graph
    Lookup(LookupArgs),
    /// List the plays through an anchor square, best first
    Moves(MovesArgs),
    /// Print node, edge and word counts of a saved graph
    Stats(StatsArgs),
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Word list, one word per line, sorted
    wordlist: PathBuf,
    /// Output graph file
    output: PathBuf,
    /// Cross-check the graph against an unminimized trie of the word list
    #[arg(long)]
    check: bool,
}

#[derive(Args, Debug)]
struct LookupArgs {
    /// Graph file written by `build`
    graph: PathBuf,
    /// Words to look up
    #[arg(required = true)]
    words: Vec<String>,
}

#[derive(Args, Debug)]
struct MovesArgs {
    /// Graph file written by `build`
    graph: PathBuf,
    /// Row in text notation, e.g. "H......." ('.' marks an empty square)
    #[arg(long)]
    row: String,
    /// Anchor square index within the row
    #[arg(long, default_value_t = 0)]
    anchor: usize,
    /// Rack tiles, e.g. "ESTO"
    #[arg(long)]
    rack: String,
    /// Built-in letter values (en or fr)
    #[arg(long, default_value = "en", conflicts_with = "config")]
    language: Language,
    /// JSON game config with custom letter values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Maximum number of tiles placed left of the anchor
    #[arg(long, default_value_t = DEFAULT_LEFT_LIMIT)]
    left_limit: usize,
}

#[derive(Args, Debug)]
struct StatsArgs {
    /// Graph file written by `build`
    graph: PathBuf,
}

fn main() {
    let args = LexdawgArgs::parse();

    let log_level = match args.verbosity() {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    if let Err(e) = execute_command(args.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn execute_command(command: Command) -> Result<()> {
    match command {
        Command::Build(args) => build(args),
        Command::Lookup(args) => lookup(args),
        Command::Moves(args) => moves(args),
        Command::Stats(args) => stats(args),
    }
}

fn load_graph(path: &Path) -> Result<Dawg<char>> {
    Dawg::load_from_file(path).with_context(|| format!("failed to load {}", path.display()))
}

fn build(args: BuildArgs) -> Result<()> {
    let dawg = build_dawg_from_file(&args.wordlist)
        .with_context(|| format!("failed to build from {}", args.wordlist.display()))?;
    info!(
        "{} words -> {} nodes, {} edges",
        dawg.word_count(),
        dawg.node_count(),
        dawg.edge_count()
    );

    if args.check {
        let file = File::open(&args.wordlist)
            .with_context(|| format!("failed to reopen {}", args.wordlist.display()))?;
        let words = read_word_list(BufReader::new(file))?;
        let trie = cross_check(&dawg, &words).context("graph failed the trie cross-check")?;
        info!(
            "cross-check passed: trie has {} nodes, graph {}",
            trie.node_count(),
            dawg.node_count()
        );
    }

    dawg.save_to_file(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!(
        "{}: {} words, {} nodes",
        args.output.display(),
        dawg.word_count(),
        dawg.node_count()
    );
    Ok(())
}

fn lookup(args: LookupArgs) -> Result<()> {
    let dawg = load_graph(&args.graph)?;
    for word in &args.words {
        let word = word.to_uppercase();
        let answer = if dawg.contains(&word) { "yes" } else { "no" };
        println!("{word}: {answer}");
    }
    Ok(())
}

fn moves(args: MovesArgs) -> Result<()> {
    let dawg = load_graph(&args.graph)?;
    let config = match &args.config {
        Some(path) => GameConfig::from_file(path)?,
        None => args.language.config(),
    };
    let row: Row = args.row.parse().context("invalid --row")?;
    let rack: Rack = args.rack.parse().context("invalid --rack")?;
    let Some(anchor) = row.get(args.anchor) else {
        bail!("anchor {} is outside a row of {} squares", args.anchor, row.len());
    };
    let bag = config.tile_bag();
    if bag.total() > 0 && !bag.permits(&rack) {
        warn!("rack {rack} holds more of a letter than the tile bag");
    }

    let plays = MoveGenerator::new(&dawg, &config.points)
        .with_left_limit(args.left_limit)
        .generate(anchor, &rack);
    for (word, score) in plays.ranked() {
        println!("{word} {score}");
    }
    for err in plays.errors() {
        eprintln!("warning: {err}");
    }
    Ok(())
}

fn stats(args: StatsArgs) -> Result<()> {
    let dawg = load_graph(&args.graph)?;
    println!("words: {}", dawg.word_count());
    println!("nodes: {}", dawg.node_count());
    println!("edges: {}", dawg.edge_count());
    Ok(())
}
