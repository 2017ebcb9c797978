//! # keyword-scan CLI (`kws`)
//!
//! ## Usage
//!
//! ```bash
//! kws --config ./config/kws.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `kws init` | Create the SQLite database and keyword schema |
//! | `kws keyword add <text> --category <c>` | Register a keyword |
//! | `kws keyword list` | List registered keywords |
//! | `kws keyword remove <id>` | Remove a keyword |
//! | `kws keyword import <file>` | Bulk-add keywords from JSON |
//! | `kws keyword export` | Dump keywords as JSON |
//! | `kws scan <path>` | Scan a document and print matches |
//! | `kws stats` | Database overview |
//! | `kws serve` | Start the HTTP server |

use clap::{Parser, Subcommand};
use keyword_scan::scan::{OutputFormat, ScanOverrides};
use keyword_scan::{config, export, keywords, migrate, scan, server, stats};
use keyword_scan_core::models::{Category, SearchMode};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// keyword-scan: find positive and negative keywords in documents.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/kws.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "kws",
    about = "Scan PDFs and documents for positive/negative keywords",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/kws.toml")]
    config: PathBuf,

    /// Log debug detail to stderr. `RUST_LOG` overrides this.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema. Safe to run repeatedly.
    Init,

    /// Manage the keyword registry.
    Keyword {
        #[command(subcommand)]
        action: KeywordAction,
    },

    /// Scan a document for registered keywords.
    Scan {
        /// Document to scan (pdf, pptx, docx, txt).
        path: PathBuf,

        /// Override the content type inferred from the file extension.
        #[arg(long)]
        content_type: Option<String>,

        /// `first-per-line` or `all-occurrences`.
        #[arg(long)]
        mode: Option<SearchMode>,

        /// Characters of context on each side of a match.
        #[arg(long)]
        radius: Option<usize>,

        /// Stop after this many pages.
        #[arg(long)]
        max_pages: Option<usize>,

        /// Only search keywords of this category.
        #[arg(long)]
        category: Option<Category>,

        /// `text`, `json`, or `lines`.
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Highlight style for text output: auto, plain, ansi, markdown, html.
        #[arg(long)]
        markup: Option<String>,
    },

    /// Show database statistics.
    Stats,

    /// Start the HTTP JSON API.
    Serve,
}

#[derive(Subcommand)]
enum KeywordAction {
    Add {
        text: String,
        /// `positive` or `negative`.
        #[arg(long, short)]
        category: Category,
    },
    List {
        #[arg(long, short)]
        category: Option<Category>,
    },
    Remove {
        id: i64,
    },
    /// Add keywords from a JSON array of `{text, category}` objects.
    Import {
        path: PathBuf,
    },
    Export {
        /// Write to this file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Keyword { action } => match action {
            KeywordAction::Add { text, category } => {
                keywords::run_add(&cfg, &text, category).await?;
            }
            KeywordAction::List { category } => {
                keywords::run_list(&cfg, category).await?;
            }
            KeywordAction::Remove { id } => {
                keywords::run_remove(&cfg, id).await?;
            }
            KeywordAction::Import { path } => {
                export::run_import(&cfg, &path).await?;
            }
            KeywordAction::Export { output } => {
                export::run_export(&cfg, output.as_deref()).await?;
            }
        },
        Commands::Scan {
            path,
            content_type,
            mode,
            radius,
            max_pages,
            category,
            format,
            markup,
        } => {
            let overrides = ScanOverrides {
                mode,
                context_radius: radius,
                max_pages,
                category,
                markup,
            };
            scan::run_scan(&cfg, &path, content_type.as_deref(), &overrides, format).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
