//! doctree - Normalize mdast trees and extract their outlines

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use doctree::outline::PublicOutlineItem;
use doctree::{Config, PageSummary, Pipeline, SearchEntry, TreeNode};

#[derive(Parser)]
#[command(name = "doctree")]
#[command(version, about = "Normalize mdast trees and extract their outlines", long_about = None)]
#[command(after_help = "EXAMPLES:
    doctree normalize page.json             Print the normalized tree
    doctree outline page.json --page /api   Print outline, summary and search entries
    cat page.json | doctree outline         Read the tree from stdin")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// TOML configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log pass statistics and recovered problems
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print the normalized tree as mdast JSON
    Normalize(Input),
    /// Print the outline, page summary and search entries as JSON
    Outline(Input),
}

#[derive(Args)]
struct Input {
    /// mdast JSON file (stdin when omitted)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// URL path of the page
    #[arg(short, long, default_value = "/")]
    page: String,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Serialize)]
struct OutlineOutput<'a> {
    outline: Vec<PublicOutlineItem<'a>>,
    summary: &'a PageSummary,
    search: &'a [SearchEntry],
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> doctree::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let pipeline = Pipeline::new(config)?;

    let json = match &cli.command {
        Command::Normalize(input) => {
            let processed = pipeline.process(&read_tree(input)?, &input.page)?;
            to_json(&processed.tree, input.pretty)?
        }
        Command::Outline(input) => {
            let processed = pipeline.process(&read_tree(input)?, &input.page)?;
            let output = OutlineOutput {
                outline: processed.outline.iter().map(|item| item.public()).collect(),
                summary: &processed.summary,
                search: &processed.search,
            };
            to_json(&output, input.pretty)?
        }
    };
    println!("{json}");
    Ok(())
}

fn read_tree(input: &Input) -> doctree::Result<TreeNode> {
    let source = match &input.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            source
        }
    };
    TreeNode::from_json(&source)
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> doctree::Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
