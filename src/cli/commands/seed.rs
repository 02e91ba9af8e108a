//! `batchbot seed` command - Load sample batches

use console::style;
use miette::Result;

use crate::cli::helpers::{load_config, open_store, print_structured};
use crate::cli::GlobalOpts;

pub fn run(global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let mut store = open_store(&config)?;

    let stats = store.seed_sample_data().map_err(|e| {
        miette::miette!(
            "Failed to seed {}: {} (is the store already seeded?)",
            config.database_path().display(),
            e
        )
    })?;

    if print_structured(&stats, global.format)? || global.quiet {
        return Ok(());
    }

    println!(
        "{} Seeded {}",
        style("✓").green(),
        config.database_path().display()
    );
    println!("  Products:        {}", stats.products);
    println!("  Employees:       {}", stats.employees);
    println!("  Batches:         {}", stats.batches);
    println!("  Tracking events: {}", stats.tracking_events);

    Ok(())
}
