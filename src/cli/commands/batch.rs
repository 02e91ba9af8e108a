//! `batchbot batch` command - Direct record store lookups
//!
//! These bypass the NLU layer and read the store the same way the pipeline
//! does, which makes them handy for checking what an answer should say.

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{load_config, open_store, or_dash, print_structured, styled_status};
use crate::cli::GlobalOpts;
use crate::core::store::{
    Batch, BatchStatus, CurrentLocation, RecordStore, SqliteStore, DB_DATE_FORMAT,
};
use crate::pipeline::payload::DISPLAY_TIMESTAMP_FORMAT;

#[derive(Subcommand, Debug)]
pub enum BatchCommands {
    /// Show a batch with its current location
    Show {
        /// Batch code (e.g. VDT-052025-A)
        code: String,
    },

    /// Show the tracking history of a batch, oldest first
    History {
        /// Batch code (e.g. VDT-052025-A)
        code: String,
    },

    /// List batches whose latest status matches
    Status {
        /// manufactured, in transit or delivered
        status: String,
    },

    /// Show batch counts per status
    Stats,
}

/// A batch together with its latest tracking event
#[derive(Debug, Serialize)]
struct BatchDetails {
    #[serde(flatten)]
    batch: Batch,
    current: Option<CurrentLocation>,
}

pub fn run(cmd: BatchCommands, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let store = open_store(&config)?;

    match cmd {
        BatchCommands::Show { code } => run_show(&store, &normalize_code(&code), global),
        BatchCommands::History { code } => run_history(&store, &normalize_code(&code), global),
        BatchCommands::Status { status } => {
            let status: BatchStatus = status.parse().map_err(|e| miette::miette!("{}", e))?;
            run_status(&store, status, global)
        }
        BatchCommands::Stats => run_stats(&store, global),
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

fn lookup_error(e: impl std::fmt::Display) -> miette::Report {
    miette::miette!("Record store lookup failed: {}", e)
}

fn find_batch(store: &SqliteStore, code: &str) -> Result<Batch> {
    store
        .get_batch_by_code(code)
        .map_err(lookup_error)?
        .ok_or_else(|| miette::miette!("Batch not found: {}", code))
}

fn run_show(store: &SqliteStore, code: &str, global: &GlobalOpts) -> Result<()> {
    let batch = find_batch(store, code)?;
    let current = store
        .get_current_batch_location(code)
        .map_err(lookup_error)?;

    let details = BatchDetails { batch, current };
    if print_structured(&details, global.format)? {
        return Ok(());
    }

    let batch = &details.batch;
    println!("{}", style(&batch.batch_code).bold());
    println!("{}", style("─".repeat(40)).dim());
    println!("  Product:       {}", or_dash(batch.product_name.as_deref()));
    println!("  Quantity:      {}", or_dash(batch.quantity));
    println!(
        "  Manufactured:  {}",
        or_dash(batch.manufactured_date.map(|d| d.format(DB_DATE_FORMAT)))
    );
    println!(
        "  Expires:       {}",
        or_dash(batch.expiry_date.map(|d| d.format(DB_DATE_FORMAT)))
    );

    match &details.current {
        Some(current) => {
            println!("  Status:        {}", styled_status(current.status));
            println!("  Location:      {}", current.location);
            println!("  Handler:       {}", or_dash(current.handler.as_deref()));
            println!(
                "  Last update:   {}",
                current.timestamp.format(DISPLAY_TIMESTAMP_FORMAT)
            );
        }
        None => println!("  Status:        {}", style("untracked").dim()),
    }

    Ok(())
}

fn run_history(store: &SqliteStore, code: &str, global: &GlobalOpts) -> Result<()> {
    let batch = find_batch(store, code)?;
    let history = store.get_batch_tracking(batch.id).map_err(lookup_error)?;

    if print_structured(&history, global.format)? {
        return Ok(());
    }

    if history.is_empty() {
        println!("No tracking records found.");
        return Ok(());
    }

    let mut table = Builder::default();
    table.push_record(["Timestamp", "Status", "Location", "Handler"]);
    for event in &history {
        table.push_record([
            event.timestamp.format(DISPLAY_TIMESTAMP_FORMAT).to_string(),
            event.status.label().to_string(),
            event.location.clone(),
            or_dash(event.handler.as_deref()),
        ]);
    }
    println!("{}", table.build().with(Style::rounded()));

    if !global.quiet {
        println!(
            "{} {} event(s) for {}",
            style("→").blue(),
            history.len(),
            style(&batch.batch_code).cyan()
        );
    }

    Ok(())
}

fn run_status(store: &SqliteStore, status: BatchStatus, global: &GlobalOpts) -> Result<()> {
    let batches = store
        .get_batches_by_status(status)
        .map_err(lookup_error)?;

    if print_structured(&batches, global.format)? {
        return Ok(());
    }

    if batches.is_empty() {
        println!("No batches found.");
        return Ok(());
    }

    let mut table = Builder::default();
    table.push_record(["Batch", "Product", "Location", "Handler"]);
    for summary in &batches {
        table.push_record([
            summary.batch_code.clone(),
            or_dash(summary.product_name.as_deref()),
            summary.location.clone(),
            or_dash(summary.handler.as_deref()),
        ]);
    }
    println!("{}", table.build().with(Style::rounded()));

    if !global.quiet {
        println!(
            "{} {} batch(es) {}",
            style("→").blue(),
            batches.len(),
            styled_status(status)
        );
    }

    Ok(())
}

fn run_stats(store: &SqliteStore, global: &GlobalOpts) -> Result<()> {
    let stats = store.get_batch_statistics().map_err(lookup_error)?;

    if print_structured(&stats, global.format)? {
        return Ok(());
    }

    println!("{}", style("Batch Statistics").bold());
    println!("{}", style("─".repeat(40)).dim());
    println!("  Total batches:  {}", style(stats.total_batches).cyan());
    for status in BatchStatus::all() {
        println!(
            "  {:<15} {}",
            format!("{}:", status.label()),
            stats.count_for(*status)
        );
    }
    println!("  {:<15} {}", "Untracked:", stats.untracked_batches);

    Ok(())
}
