//! junksweep — scan for and delete development build/cache artifacts.
//!
//! Thin binary entry point. All scanning and cleaning logic lives in the
//! `junksweep-core` crate; this file only parses arguments, renders
//! progress and tables, and asks for confirmation before real deletions.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use junksweep_core::dto::{CleanResultDto, JunkKindDto, ScanResultDto};
use junksweep_core::model::size::{format_count, format_size};
use junksweep_core::scanner::progress::ScanProgress;
use junksweep_core::{
    clean, start_scan, CleanTarget, JunkCatalog, ScanOptions, ScanResult,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "junksweep")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan directories for development junk
    Scan {
        /// Paths to scan (defaults to the current directory)
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Maximum directory depth below each root
        #[arg(short, long)]
        max_depth: Option<usize>,

        /// Descend into hidden directories
        #[arg(long)]
        include_hidden: bool,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Delete development junk directories found under the given paths
    Clean {
        /// Paths to scan and clean
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Show what would be deleted without touching the filesystem
        #[arg(long)]
        dry_run: bool,

        /// Maximum directory depth below each root
        #[arg(short, long)]
        max_depth: Option<usize>,

        /// Only clean these junk kinds (id or id fragment; repeatable)
        #[arg(long)]
        kind: Vec<String>,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List supported junk directory types
    Types,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            paths,
            max_depth,
            include_hidden,
            json,
        } => {
            let catalog = Arc::new(JunkCatalog::default_catalog());
            let options = build_options(max_depth, include_hidden);
            let result = run_scan_with_progress(catalog.clone(), paths, options, !json)?;

            if json {
                let dto = ScanResultDto::from_result(&result, &catalog);
                println!("{}", serde_json::to_string_pretty(&dto)?);
            } else {
                print_scan_table(&result, &catalog);
            }
        }

        Commands::Clean {
            paths,
            dry_run,
            max_depth,
            kind,
            yes,
        } => {
            let catalog = Arc::new(filtered_catalog(&kind)?);
            let options = build_options(max_depth, false);
            let result = run_scan_with_progress(catalog.clone(), paths, options, true)?;

            if result.items.is_empty() {
                println!("No junk directories found.");
                return Ok(());
            }
            print_scan_table(&result, &catalog);

            if !yes && !dry_run {
                println!(
                    "This will delete {} directories ({}).",
                    result.item_count(),
                    format_size(result.total_size_bytes())
                );
                print!("Continue? [y/N] ");
                std::io::stdout().flush()?;
                let mut input = String::new();
                std::io::stdin().read_line(&mut input)?;
                if !input.trim().eq_ignore_ascii_case("y") {
                    println!("Aborted.");
                    return Ok(());
                }
            }

            let targets: Vec<CleanTarget> = result.items.iter().map(CleanTarget::from).collect();
            let clean_result = clean(&targets, dry_run);
            print_clean_result(&CleanResultDto::from(&clean_result));
        }

        Commands::Types => {
            let catalog = JunkCatalog::default_catalog();
            print_junk_types(&catalog);
        }
    }

    Ok(())
}

fn build_options(max_depth: Option<usize>, include_hidden: bool) -> ScanOptions {
    let mut options = ScanOptions::default().with_hidden(include_hidden);
    if let Some(depth) = max_depth {
        options = options.with_max_depth(depth);
    }
    options
}

/// Restrict the catalog to the requested kinds, or keep all of them when no
/// filter was given.
fn filtered_catalog(kind_filters: &[String]) -> Result<JunkCatalog> {
    let full = JunkCatalog::default_catalog();
    if kind_filters.is_empty() {
        return Ok(full);
    }
    let kinds: Vec<_> = full
        .kinds()
        .iter()
        .filter(|k| {
            kind_filters
                .iter()
                .any(|f| k.id.contains(f.to_lowercase().as_str()))
        })
        .cloned()
        .collect();
    if kinds.is_empty() {
        bail!(
            "no junk kinds match {:?}; run `junksweep types` to list them",
            kind_filters
        );
    }
    Ok(JunkCatalog::new(kinds)?)
}

/// Run a scan on a background thread, rendering progress on stderr.
fn run_scan_with_progress(
    catalog: Arc<JunkCatalog>,
    roots: Vec<PathBuf>,
    options: ScanOptions,
    show_progress: bool,
) -> Result<ScanResult> {
    let handle = start_scan(catalog, roots, options);

    for msg in handle.progress_rx.iter() {
        match msg {
            ScanProgress::Update {
                current_path,
                items_found,
                dirs_scanned,
            } if show_progress => {
                eprint!(
                    "\r\x1b[2KScanned {} directories, found {} — {}",
                    format_count(dirs_scanned),
                    items_found,
                    truncate_path(&current_path, 50)
                );
            }
            ScanProgress::Complete { .. }
            | ScanProgress::Cancelled
            | ScanProgress::Failed { .. } => break,
            _ => {}
        }
    }
    if show_progress {
        eprint!("\r\x1b[2K");
    }

    Ok(handle.join()?)
}

fn truncate_path(path: &str, max: usize) -> String {
    let count = path.chars().count();
    if count <= max {
        return path.to_string();
    }
    // Keep the tail; char-based so multi-byte paths never split mid-char.
    let tail: String = path
        .chars()
        .skip(count - (max - 3))
        .collect();
    format!("...{tail}")
}

fn print_scan_table(result: &ScanResult, catalog: &JunkCatalog) {
    if result.items.is_empty() {
        println!("No junk directories found.");
        return;
    }

    let mut sorted = result.clone();
    sorted.sort_by_size();

    println!();
    println!("{:<60} {:<15} {:>12} {:>10}", "Path", "Type", "Size", "Files");
    println!("{}", "-".repeat(100));

    for item in &sorted.items {
        let display = catalog
            .get(&item.kind)
            .map(|k| k.display_name.as_str())
            .unwrap_or(item.kind.as_str());
        println!(
            "{:<60} {:<15} {:>12} {:>10}",
            truncate_path(&item.path.display().to_string(), 58),
            display,
            format_size(item.size_bytes),
            format_count(item.file_count)
        );
    }

    println!("{}", "-".repeat(100));
    println!(
        "Total: {} directories, {}, {} files",
        sorted.item_count(),
        format_size(sorted.total_size_bytes()),
        format_count(sorted.total_file_count())
    );
    if !sorted.skipped.is_empty() {
        println!(
            "({} unreadable or invalid paths skipped)",
            sorted.skipped.len()
        );
    }
    println!();
}

fn print_clean_result(result: &CleanResultDto) {
    println!();
    if result.was_dry_run {
        println!("Dry run — nothing was deleted.");
    }

    if result.deleted_count > 0 {
        let action = if result.was_dry_run {
            "Would delete"
        } else {
            "Deleted"
        };
        println!(
            "{action}: {} directories ({})",
            result.deleted_count, result.bytes_freed_display
        );
    }

    if result.failed_count > 0 {
        println!("Failed to delete {} directories:", result.failed_count);
        for failure in &result.failed {
            println!("  {} - {}", failure.path, failure.error);
        }
    }
    println!();
}

fn print_junk_types(catalog: &JunkCatalog) {
    println!();
    println!("{:<16} {:<16} {}", "Id", "Name", "Patterns");
    println!("{}", "-".repeat(60));
    for kind in catalog.kinds() {
        let dto = JunkKindDto::from(kind);
        println!(
            "{:<16} {:<16} {}",
            dto.id,
            dto.display_name,
            dto.patterns.join(", ")
        );
    }
    println!();
}
