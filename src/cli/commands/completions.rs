//! `batchbot completions` command - Shell completion scripts
//!
//! `source <(batchbot completions bash)` enables them for the current shell;
//! `--output` writes the script to a file instead.

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::cli::{Cli, GlobalOpts};

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write the script to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: CompletionsArgs, global: &GlobalOpts) -> Result<()> {
    match args.output {
        Some(path) => {
            let mut file = File::create(&path).into_diagnostic()?;
            write_script(args.shell, &mut file)?;
            if !global.quiet {
                println!(
                    "{} Wrote {} completions to {}",
                    style("✓").green(),
                    args.shell,
                    path.display()
                );
            }
            Ok(())
        }
        None => write_script(args.shell, &mut io::stdout()),
    }
}

/// Generate the completion script for `shell` into `out`
fn write_script(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, out);
    out.flush().into_diagnostic()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_covers_subcommands() {
        let mut buf = Vec::new();
        write_script(Shell::Bash, &mut buf).unwrap();
        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("batchbot"));
        assert!(script.contains("ask"));
        assert!(script.contains("seed"));
    }

    #[test]
    fn test_output_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("batchbot.fish");
        let global = GlobalOpts {
            format: crate::cli::OutputFormat::Auto,
            quiet: true,
            verbose: false,
            db: None,
        };

        run(
            CompletionsArgs {
                shell: Shell::Fish,
                output: Some(path.clone()),
            },
            &global,
        )
        .unwrap();

        assert!(std::fs::read_to_string(&path).unwrap().contains("batchbot"));
    }
}
