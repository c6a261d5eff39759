//! Command-line interface for gist.
//!
//! Provides commands for extracting URLs, browsing and filtering the
//! library, deleting entries and exporting them as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};

use crate::adapters::ExtractionClient;
use crate::config;
use crate::core::{query, BulkExport, ContentStore, CopyPayload, Extractor, RecordExport};
use crate::core::export::write_document;
use crate::domain::{ContentRecord, DateRange, DomainFilter, FilterCriteria, SortBy, SortOrder};
use crate::storage::JsonFileStorage;

pub mod render;

/// gist - Summarize web pages and keep a searchable library of the results
#[derive(Parser, Debug)]
#[command(name = "gist")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract and summarize a URL, adding it to the library
    Extract {
        /// URL to extract (http or https)
        url: String,

        /// Print the stored record as JSON instead of a card
        #[arg(long)]
        json: bool,
    },

    /// List library items, filtered and sorted
    List {
        /// Case-insensitive text to look for in summary, key points, URL and domain
        #[arg(short, long)]
        search: Option<String>,

        /// Only show this exact domain
        #[arg(short, long)]
        domain: Option<String>,

        /// Time window
        #[arg(short, long, value_enum, default_value = "all")]
        range: RangeArg,

        /// Sort key
        #[arg(long, value_enum, default_value = "date")]
        sort: SortArg,

        /// Sort direction
        #[arg(long, value_enum, default_value = "desc")]
        order: OrderArg,

        /// Maximum number of items to show
        #[arg(short, long)]
        limit: Option<usize>,

        /// Show full cards instead of a table
        #[arg(short, long)]
        full: bool,
    },

    /// List the domains present in the library
    Domains,

    /// Show one library item
    Show {
        /// Content ID (or a unique prefix)
        content_id: String,

        /// Show the whole summary and every key point
        #[arg(short, long)]
        full: bool,

        /// Print the summary and key points as JSON (for copying)
        #[arg(long)]
        json: bool,
    },

    /// Delete one library item
    Delete {
        /// Content ID (or a unique prefix)
        content_id: String,
    },

    /// Delete every library item
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// Export the library (or one item) as JSON
    Export {
        /// Export only this item
        #[arg(long)]
        id: Option<String>,

        /// Output directory (defaults to the configured export directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Date range for CLI (maps to DateRange)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RangeArg {
    All,
    Today,
    Week,
    Month,
}

impl From<RangeArg> for DateRange {
    fn from(r: RangeArg) -> Self {
        match r {
            RangeArg::All => DateRange::All,
            RangeArg::Today => DateRange::Today,
            RangeArg::Week => DateRange::Week,
            RangeArg::Month => DateRange::Month,
        }
    }
}

/// Sort key for CLI (maps to SortBy)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Date,
    Domain,
    /// Summary length
    Length,
}

impl From<SortArg> for SortBy {
    fn from(s: SortArg) -> Self {
        match s {
            SortArg::Date => SortBy::Date,
            SortArg::Domain => SortBy::Domain,
            SortArg::Length => SortBy::Length,
        }
    }
}

/// Sort direction for CLI (maps to SortOrder)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for SortOrder {
    fn from(o: OrderArg) -> Self {
        match o {
            OrderArg::Asc => SortOrder::Asc,
            OrderArg::Desc => SortOrder::Desc,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Extract { url, json } => extract(&url, json).await,
            Commands::List {
                search,
                domain,
                range,
                sort,
                order,
                limit,
                full,
            } => {
                let criteria = FilterCriteria::new()
                    .with_search(search.unwrap_or_default())
                    .with_domain(DomainFilter::from_value(domain.as_deref().unwrap_or("all")))
                    .with_date_range(range.into())
                    .sorted(sort.into(), order.into());
                list(&criteria, limit, full)
            }
            Commands::Domains => list_domains(),
            Commands::Show {
                content_id,
                full,
                json,
            } => show(&content_id, full, json),
            Commands::Delete { content_id } => delete(&content_id),
            Commands::Clear { yes } => clear(yes),
            Commands::Export { id, output } => export(id.as_deref(), output).await,
            Commands::Config => show_config(),
        }
    }
}

/// Open the content store at the configured slot
fn open_store() -> Result<ContentStore> {
    let storage = JsonFileStorage::open_default()?;
    tracing::debug!(slot = %storage.path().display(), "Opening content store");
    Ok(ContentStore::open(storage))
}

/// Resolve a user-supplied ID or prefix to a stored record
fn find<'a>(store: &'a ContentStore, content_id: &str) -> Result<&'a ContentRecord> {
    Ok(store.find_by_prefix(content_id.trim())?)
}

/// Extract a URL and add it to the library
async fn extract(url: &str, json: bool) -> Result<()> {
    let url = url.trim();
    let cfg = config::config()?;
    let client = ExtractionClient::from_config(cfg)?;
    let mut extractor = Extractor::new(Arc::new(client), open_store()?);

    eprintln!("📥 Extracting: {}", url);

    match extractor.extract(url).await {
        Ok(record) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                println!("{}", render::card(&record, true));
            }
            eprintln!(
                "✅ Saved as {} ({} items in library)",
                record.id,
                extractor.store().len()
            );
            Ok(())
        }
        Err(err) => {
            eprintln!("❌ {}", err);
            std::process::exit(1);
        }
    }
}

/// List library items through the query engine
fn list(criteria: &FilterCriteria, limit: Option<usize>, full: bool) -> Result<()> {
    let store = open_store()?;
    let view = query::view(store.snapshot(), criteria);

    if view.items.is_empty() {
        if let Some(message) = render::empty_state(!store.is_empty(), view.filtered) {
            println!("{}", message);
        }
        return Ok(());
    }

    let take = limit.unwrap_or(usize::MAX);

    if full {
        for record in view.items.iter().take(take) {
            println!("{}", render::card(record, false));
        }
    } else {
        println!("{:<15} {:<28} {:<50}", "ID", "DOMAIN", "SUMMARY");
        println!("{}", "-".repeat(93));
        for record in view.items.iter().take(take) {
            println!("{}", render::row(record));
        }
    }

    println!("\n{}", render::counts(&view, limit));
    Ok(())
}

/// List distinct domains
fn list_domains() -> Result<()> {
    let store = open_store()?;
    let domains = query::available_domains(store.snapshot());

    if domains.is_empty() {
        println!("Library is empty. Use 'gist extract <url>' to add content.");
        return Ok(());
    }

    for domain in domains {
        let count = store
            .snapshot()
            .iter()
            .filter(|r| r.domain == domain)
            .count();
        println!("{:<40} {}", domain, count);
    }

    Ok(())
}

/// Show one item
fn show(content_id: &str, full: bool, json: bool) -> Result<()> {
    let store = open_store()?;
    let record = find(&store, content_id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&CopyPayload::from(record))?);
    } else {
        println!("{}", render::card(record, full));
        if !full {
            println!("Use --full to show the whole summary and all key points");
        }
    }

    Ok(())
}

/// Delete one item
fn delete(content_id: &str) -> Result<()> {
    let mut store = open_store()?;
    let record = find(&store, content_id)?.clone();

    store
        .remove(&record.id)
        .with_context(|| format!("Failed to delete {}", record.id))?;

    eprintln!("🗑️ Deleted {} ({})", record.id, record.url);
    Ok(())
}

/// Delete everything
fn clear(confirmed: bool) -> Result<()> {
    let mut store = open_store()?;

    if store.is_empty() {
        println!("Library is already empty.");
        return Ok(());
    }

    if !confirmed {
        anyhow::bail!(
            "Refusing to delete {} items without --yes",
            store.len()
        );
    }

    let count = store.len();
    store.clear_all().context("Failed to clear library")?;

    eprintln!("🗑️ Deleted {} items", count);
    Ok(())
}

/// Export the library or a single item
async fn export(content_id: Option<&str>, output: Option<PathBuf>) -> Result<()> {
    let store = open_store()?;
    let dir = match output {
        Some(dir) => dir,
        None => config::config()?.export_dir.clone(),
    };
    let now = Utc::now();

    let path = match content_id {
        Some(content_id) => {
            let record = find(&store, content_id)?;
            let file_name = RecordExport::file_name(&record.domain, now);
            write_document(&dir, &file_name, &RecordExport::new(record)).await?
        }
        None => {
            if store.is_empty() {
                println!("Library is empty. Nothing to export.");
                return Ok(());
            }
            let document = BulkExport::new(store.snapshot(), now);
            write_document(&dir, &document.file_name(), &document).await?
        }
    };

    eprintln!("📦 Exported to {}", path.display());
    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("gist configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Home:     {}", cfg.home.display());
    println!("  Storage:  {}", cfg.storage_path().display());
    println!("  Exports:  {}", cfg.export_dir.display());
    println!();
    println!("API:");
    match &cfg.api_url {
        Some(url) => println!("  Base URL: {}", url),
        None => println!("  Base URL: (not set - use GIST_API_URL or api.base_url)"),
    }

    Ok(())
}
