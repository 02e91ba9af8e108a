//! `batchbot ask` command - Answer a single question

use miette::Result;

use crate::cli::helpers::{load_config, open_store, print_structured};
use crate::cli::GlobalOpts;
use crate::core::store::SqliteStore;
use crate::fallback::{self, FallbackModel};
use crate::pipeline::{Pipeline, ResponseEnvelope};

#[derive(clap::Args, Debug)]
pub struct AskArgs {
    /// The question, e.g. "Where is batch VDT-052025-A?"
    #[arg(required = true, num_args = 1..)]
    pub words: Vec<String>,
}

impl AskArgs {
    pub fn query(&self) -> String {
        self.words.join(" ")
    }
}

/// Pipeline wired to the configured store and fallback model
pub type CliPipeline = Pipeline<SqliteStore, Box<dyn FallbackModel>>;

pub fn build_pipeline(global: &GlobalOpts) -> Result<CliPipeline> {
    let config = load_config(global);
    let store = open_store(&config)?;
    let model = fallback::from_config(&config);
    Pipeline::new(store, model).map_err(|e| miette::miette!("Failed to load templates: {}", e))
}

pub fn run(args: AskArgs, global: &GlobalOpts) -> Result<()> {
    let pipeline = build_pipeline(global)?;
    let response = pipeline.process(&args.query());
    print_response(&response, global)
}

/// Print a response envelope in the requested format
pub(crate) fn print_response(response: &ResponseEnvelope, global: &GlobalOpts) -> Result<()> {
    if print_structured(response, global.format)? {
        return Ok(());
    }
    println!("{}", response.message);
    Ok(())
}
