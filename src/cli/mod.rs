//! # CLI Module
//!
//! Command-line interface for the takeout consolidator.
//!
//! ## Usage
//! ```bash
//! # Consolidate an extracted export into ~/Pictures/consolidated
//! takeout-consolidate run ~/Takeout --output ~/Pictures/consolidated
//!
//! # Keep album folders as full copies, bucket by month
//! takeout-consolidate run ~/Takeout -o out --albums duplicate-copy --divide-dates month
//!
//! # Leave the source tree untouched
//! takeout-consolidate run ~/Takeout -o out --copy
//!
//! # JSON summary for scripting
//! takeout-consolidate run ~/Takeout -o out --format json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::thread;
use std::time::Instant;
use takeout_consolidator::core::{
    AlbumBehavior, CopyMode, DateDivision, IngestConfig, MediaEntityCollection, MediaIngestor,
    MediaMover, MoveReport, MovingContext,
};
use takeout_consolidator::error::Result;
use takeout_consolidator::events::{
    channel, Event, GroupEvent, MergeEvent, PlaceEvent, RunEvent, RunPhase, RunSummary,
};

/// Takeout Consolidator - one photo, one place
#[derive(Parser, Debug)]
#[command(name = "takeout-consolidate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Consolidate extracted export trees into one organized output
    Run {
        /// Extracted export directories to consolidate
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// How album folders are materialized
        #[arg(long, default_value = "shortcut")]
        albums: AlbumMode,

        /// How ALL_PHOTOS is subdivided by capture date
        #[arg(long, default_value = "year")]
        divide_dates: DateMode,

        /// Copy files instead of moving them (source stays intact)
        #[arg(long)]
        copy: bool,

        /// Include hidden files and directories
        #[arg(long)]
        include_hidden: bool,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        format: OutputFormat,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AlbumMode {
    /// Symlink per album, one physical file (default)
    Shortcut,
    /// Full physical copy per album
    DuplicateCopy,
    /// Album folders own the files, ALL_PHOTOS links back
    ReverseShortcut,
    /// No album folders; membership written to albums-info.json
    Json,
    /// Discard album associations
    Nothing,
}

impl From<AlbumMode> for AlbumBehavior {
    fn from(mode: AlbumMode) -> Self {
        match mode {
            AlbumMode::Shortcut => AlbumBehavior::Shortcut,
            AlbumMode::DuplicateCopy => AlbumBehavior::DuplicateCopy,
            AlbumMode::ReverseShortcut => AlbumBehavior::ReverseShortcut,
            AlbumMode::Json => AlbumBehavior::Json,
            AlbumMode::Nothing => AlbumBehavior::Nothing,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DateMode {
    /// One flat folder
    None,
    /// Per-year folders (default)
    Year,
    /// Year/month folders
    Month,
    /// Year/month/day folders
    Day,
}

impl From<DateMode> for DateDivision {
    fn from(mode: DateMode) -> Self {
        match mode {
            DateMode::None => DateDivision::None,
            DateMode::Year => DateDivision::Year,
            DateMode::Month => DateDivision::Month,
            DateMode::Day => DateDivision::Day,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (failed operations only)
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            inputs,
            output,
            albums,
            divide_dates,
            copy,
            include_hidden,
            format,
            verbose,
        } => {
            let context = MovingContext::new(output)
                .album_behavior(albums.into())
                .date_division(divide_dates.into())
                .copy_mode(if copy { CopyMode::Copy } else { CopyMode::Move })
                .verbose(verbose);
            run_consolidate(inputs, context, include_hidden, format, verbose)
        }
    }
}

fn run_consolidate(
    inputs: Vec<PathBuf>,
    context: MovingContext,
    include_hidden: bool,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let term = Term::stderr();
    let start = Instant::now();

    if matches!(format, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Takeout Consolidator").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let (sender, receiver) = channel();

    // Progress bar for pretty output
    let progress = if matches!(format, OutputFormat::Pretty) {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();
    let verbose_clone = verbose;

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            match event {
                Event::Run(RunEvent::PhaseChanged { phase }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_position(0);
                        pb.set_message(format!("{}", phase));
                    }
                }
                Event::Group(GroupEvent::Started { total_files }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_length(total_files as u64);
                    }
                }
                Event::Merge(MergeEvent::Started { .. }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_message(format!("{}", RunPhase::Merging));
                    }
                }
                Event::Place(PlaceEvent::Finalizing) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_message(format!("{}", RunPhase::Finalizing));
                    }
                }
                Event::Group(GroupEvent::SizeProgress { completed, .. }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_position(completed as u64);
                    }
                }
                Event::Group(GroupEvent::HashProgress {
                    completed,
                    total,
                    current_path,
                }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_length(total as u64);
                        pb.set_position(completed as u64);
                        if verbose_clone {
                            pb.set_message(format!(
                                "hashing {}",
                                current_path
                                    .file_name()
                                    .unwrap_or_default()
                                    .to_string_lossy()
                            ));
                        }
                    }
                }
                Event::Place(PlaceEvent::Started { total_entities }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_length(total_entities as u64);
                        pb.set_position(0);
                    }
                }
                Event::Place(PlaceEvent::EntityStarted { index, path }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_position(index as u64);
                        if verbose_clone {
                            pb.set_message(format!(
                                "placing {}",
                                path.file_name().unwrap_or_default().to_string_lossy()
                            ));
                        }
                    }
                }
                Event::Run(RunEvent::Completed { .. }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.finish_and_clear();
                    }
                }
                _ => {}
            }
        }
    });

    sender.send(Event::Run(RunEvent::Started));

    // Ingest
    sender.phase(RunPhase::Ingesting);
    let ingestor = MediaIngestor::new(IngestConfig {
        include_hidden,
        ..IngestConfig::default()
    });
    let report = ingestor.ingest_all(&inputs)?;
    let mut collection = report.entities;
    let ingest_errors = report.errors;

    // Content grouping + album detection. Merging must see the album
    // copies, so it runs before anything discards duplicates; the merge
    // itself is what collapses them.
    sender.phase(RunPhase::Grouping);
    let before_merge = collection.len();
    collection.find_albums_with_events(&sender);
    let duplicates_removed = before_merge - collection.len();
    let albums_found = count_albums(&collection);

    // Placement
    sender.phase(RunPhase::Placing);
    let mover = MediaMover::new(context);
    let move_report = match mover.run_with_events(&mut collection, &sender) {
        Ok(report) => report,
        Err(error) => {
            sender.send(Event::Run(RunEvent::Error {
                message: error.to_string(),
            }));
            drop(sender);
            event_thread.join().ok();
            return Err(error);
        }
    };

    let summary = RunSummary {
        total_entities: collection.len(),
        duplicates_removed,
        albums_found,
        placement: move_report.summary.clone(),
        duration_ms: start.elapsed().as_millis() as u64,
    };
    sender.send(Event::Run(RunEvent::Completed {
        summary: summary.clone(),
    }));

    drop(sender);
    event_thread.join().ok();

    match format {
        OutputFormat::Pretty => {
            print_pretty_summary(&term, &summary, &move_report, &ingest_errors, verbose)
        }
        OutputFormat::Json => print_json_summary(&summary, &move_report),
        OutputFormat::Minimal => print_minimal_summary(&move_report),
    }

    Ok(())
}

fn count_albums(collection: &MediaEntityCollection) -> usize {
    let mut names = std::collections::BTreeSet::new();
    for entity in collection.iter() {
        for name in entity.album_names() {
            names.insert(name);
        }
    }
    names.len()
}

fn print_pretty_summary(
    term: &Term,
    summary: &RunSummary,
    report: &MoveReport,
    ingest_errors: &[takeout_consolidator::error::IngestError],
    verbose: bool,
) {
    term.write_line("").ok();
    term.write_line(&format!(
        "{} Consolidation Complete",
        style("✓").green().bold()
    ))
    .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} entities placed in {:.1}s",
        style(summary.total_entities).cyan(),
        summary.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!(
        "  {} exact duplicates removed",
        style(summary.duplicates_removed).cyan()
    ))
    .ok();
    term.write_line(&format!(
        "  {} albums found",
        style(summary.albums_found).cyan()
    ))
    .ok();
    term.write_line(&format!(
        "  {} moves, {} copies, {} links",
        style(summary.placement.moves).cyan(),
        style(summary.placement.copies).cyan(),
        style(summary.placement.symlinks).cyan()
    ))
    .ok();

    for error in ingest_errors {
        term.write_line(&format!("  {} {}", style("!").yellow().bold(), error))
            .ok();
    }

    if report.has_failures() {
        term.write_line("").ok();
        term.write_line(&format!(
            "{} {} operation(s) failed; the affected source files were left in place:",
            style("✗").red().bold(),
            summary.placement.failed_operations
        ))
        .ok();
        for failure in report.failures() {
            term.write_line(&format!(
                "  {} {} ({})",
                style("✗").red(),
                failure.operation.source.display(),
                failure.error.as_deref().unwrap_or("unknown error")
            ))
            .ok();
        }
    } else if verbose {
        term.write_line("").ok();
        term.write_line(&format!(
            "  {} every operation succeeded",
            style("★").green()
        ))
        .ok();
    }

    term.write_line("").ok();
}

fn print_json_summary(summary: &RunSummary, report: &MoveReport) {
    let output = serde_json::json!({
        "summary": summary,
        "failures": report.failures().collect::<Vec<_>>(),
    });
    // Serialization of plain data types does not fail
    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

fn print_minimal_summary(report: &MoveReport) {
    for failure in report.failures() {
        println!("{}", failure.operation.source.display());
    }
}
