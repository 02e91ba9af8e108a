//! `batchbot chat` command - Interactive question loop
//!
//! Every line is an independent query; no state carries between turns.

use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use miette::Result;

use crate::cli::commands::ask::{build_pipeline, print_response};
use crate::cli::GlobalOpts;
use crate::nlu::Intent;

/// Words that end the session without going through the pipeline
const EXIT_WORDS: &[&str] = &["exit", "quit"];

pub fn run(global: &GlobalOpts) -> Result<()> {
    let pipeline = build_pipeline(global)?;
    let theme = ColorfulTheme::default();

    // Structured output stays machine-readable
    if !global.quiet && !global.format.is_structured() {
        println!(
            "{} Ask about a batch, e.g. {}. Type {} to leave.",
            style("→").blue(),
            style("\"Where is batch VDT-052025-A?\"").cyan(),
            style("exit").yellow()
        );
    }

    loop {
        let line = match Input::<String>::with_theme(&theme)
            .with_prompt("You")
            .allow_empty(true)
            .interact_text()
        {
            Ok(line) => line,
            // Closed input ends the session
            Err(_) => break,
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if is_exit_word(line) {
            break;
        }

        let response = pipeline.process(line);
        print_response(&response, global)?;

        if response.intent == Intent::Farewell {
            break;
        }
    }

    Ok(())
}

fn is_exit_word(line: &str) -> bool {
    EXIT_WORDS.iter().any(|w| line.eq_ignore_ascii_case(w))
}
