//! Saleseer CLI - natural-language product search

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use saleseer::render::{self, OutputFormat};
use saleseer::{Catalog, Config, CriteriaExtractor, Recommender, SearchHistory, SearchOutcome, Validator};

#[derive(Parser)]
#[command(name = "saleseer")]
#[command(about = "Find products using natural language")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Products JSON file (defaults to SALESEER_CATALOG, then the bundled inventory)
    #[arg(short, long, global = true)]
    catalog: Option<PathBuf>,

    /// Skip the completion API and use keyword parsing only
    #[arg(long, global = true)]
    offline: bool,

    /// Completion model id (defaults to SALESEER_MODEL, then openai/gpt-3.5-turbo)
    #[arg(short, long, global = true)]
    model: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog with a natural-language query
    Search {
        /// e.g. "Show me red dresses under $200"
        query: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Show at most this many products
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Interactive search session with recent-search history
    Shell {
        /// Output format for results
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Show at most this many products per search
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show inventory statistics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check criteria extraction against built-in queries
    Validate {
        /// Path to save validation report (JSON)
        #[arg(short, long, default_value = "./validation_report.json")]
        report: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(level))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let recommender = build_recommender(&cli)?;

    match cli.command {
        Commands::Search { query, format, limit } => {
            let outcome = search_with_spinner(&recommender, &query);
            print_outcome(&outcome, format, limit)?;
        }

        Commands::Shell { format, limit } => {
            run_shell(&recommender, format, limit)?;
        }

        Commands::Stats { json } => {
            let stats = recommender.catalog().stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print!("{}", render::inventory_overview(&stats));
            }
        }

        Commands::Validate { report } => {
            let validator = Validator::new();
            let result = validator.run(recommender.extractor());
            validator.save_report(&result, &report)?;

            if result.accuracy >= 90.0 {
                println!("\nExtraction is performing well.");
            } else if result.accuracy >= 70.0 {
                println!("\nGood accuracy, but some queries are misread.");
            } else {
                println!("\nAccuracy below target. Review the failed cases in the report.");
            }
        }
    }

    Ok(())
}

fn build_recommender(cli: &Cli) -> Result<Recommender> {
    let mut config = Config::from_env()?;
    if let Some(ref model) = cli.model {
        config = config.with_model(model.clone());
    }
    if let Some(ref path) = cli.catalog {
        config = config.with_catalog(path.clone());
    }
    if cli.offline {
        config = config.offline();
    } else if config.api_key.is_none() {
        tracing::warn!("OPENROUTER_API_KEY not set (environment or .env); using keyword parsing only");
    }

    let catalog = match config.catalog_path {
        Some(ref path) => Catalog::load(path)?,
        None => Catalog::builtin()?,
    };
    let extractor = CriteriaExtractor::from_config(&config)?;
    if extractor.is_remote() {
        tracing::debug!("Using model {} at {}", config.model, config.base_url);
    }

    Ok(Recommender::new(catalog, extractor))
}

fn search_with_spinner(recommender: &Recommender, query: &str) -> SearchOutcome {
    if !recommender.extractor().is_remote() {
        return recommender.search(query);
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message("Understanding your request and finding products...");
    pb.enable_steady_tick(Duration::from_millis(100));

    let outcome = recommender.search(query);
    pb.finish_and_clear();
    outcome
}

fn print_outcome(outcome: &SearchOutcome, format: OutputFormat, limit: Option<usize>) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(outcome)?),
        _ => print!("{}", render::search_report(outcome, format, limit)),
    }
    Ok(())
}

fn run_shell(recommender: &Recommender, format: OutputFormat, limit: Option<usize>) -> Result<()> {
    let mut history = SearchHistory::new();
    let stdin = io::stdin();
    let mut line = String::new();

    println!("{}", "Saleseer - find products using natural language".bold());
    println!("Try queries like: 'Show me red dresses under $200' or 'I want blue jeans'");
    println!("Commands: :history, :N (re-run entry N), :stats, :quit\n");

    loop {
        print!("{} ", "search>".cyan().bold());
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            break;
        }

        let query = match line.trim() {
            "" => continue,
            ":quit" | ":q" | ":exit" => break,
            ":history" => {
                print_history(&history);
                continue;
            }
            ":stats" => {
                print!("{}", render::inventory_overview(&recommender.catalog().stats()));
                continue;
            }
            cmd if cmd.starts_with(':') => {
                match cmd[1..].parse::<usize>().ok().and_then(|n| history.get(n)) {
                    Some(previous) => previous.to_string(),
                    None => {
                        eprintln!("{} {}", "Unknown command or history entry:".yellow(), cmd);
                        continue;
                    }
                }
            }
            query => query.to_string(),
        };

        let outcome = search_with_spinner(recommender, &query);
        history.record(&query);
        print_outcome(&outcome, format, limit)?;
        println!();
    }

    Ok(())
}

fn print_history(history: &SearchHistory) {
    if history.is_empty() {
        println!("No recent searches.");
        return;
    }
    println!("{}", "Recent Searches".bold());
    for (i, query) in history.iter().enumerate() {
        println!("  :{}  {}", i + 1, query);
    }
}
