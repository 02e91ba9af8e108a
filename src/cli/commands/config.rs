//! `batchbot config` command - Configuration inspection

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{load_config, print_structured};
use crate::cli::GlobalOpts;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration (API key redacted)
    Show,

    /// Show paths to configuration files
    Path,
}

pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show => run_show(global),
        ConfigCommands::Path => run_path(),
    }
}

fn run_show(global: &GlobalOpts) -> Result<()> {
    let config = load_config(global).redacted();

    if print_structured(&config, global.format)? {
        return Ok(());
    }

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();
    print_config_value("database", Some(&config.database_path().display().to_string()));
    print_config_value("gemini_api_key", config.gemini_api_key.as_deref());
    print_config_value("genai_model", Some(config.genai_model()));
    print_config_value("temperature", Some(&config.temperature().to_string()));
    print_config_value(
        "fallback_timeout_secs",
        Some(&config.fallback_timeout().as_secs().to_string()),
    );

    println!();
    println!("{}", style("Config Sources (in priority order):").dim());
    println!("  1. --db flag");
    println!("  2. Environment variables (BATCHBOT_DATABASE, GEMINI_API_KEY, GENAI_MODEL, BATCHBOT_FALLBACK_TIMEOUT)");
    println!("  3. Local config (./batchbot.yaml)");
    println!("  4. Global config (~/.config/batchbot/config.yaml)");

    Ok(())
}

fn run_path() -> Result<()> {
    let global_path = Config::global_config_path()
        .ok_or_else(|| miette::miette!("Could not determine config directory"))?;

    println!("{}", style("Configuration file paths:").bold());
    println!();
    println!("  {} {}", style("Global:").cyan(), global_path.display());
    println!("  {} batchbot.yaml", style("Local:").cyan());

    Ok(())
}

fn print_config_value(key: &str, value: Option<&str>) {
    match value {
        Some(v) => println!("  {} = {}", style(key).cyan(), v),
        None => println!("  {} = {}", style(key).cyan(), style("(not set)").dim()),
    }
}
