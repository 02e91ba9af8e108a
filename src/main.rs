use batchbot::cli::{Cli, Commands, GlobalOpts};
use clap::Parser;
use miette::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_tracing(&global);

    match cli.command {
        Commands::Ask(args) => batchbot::cli::commands::ask::run(args, &global),
        Commands::Chat => batchbot::cli::commands::chat::run(&global),
        Commands::Seed => batchbot::cli::commands::seed::run(&global),
        Commands::Batch(cmd) => batchbot::cli::commands::batch::run(cmd, &global),
        Commands::Config(cmd) => batchbot::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => batchbot::cli::commands::completions::run(args, &global),
    }
}

/// Log to stderr; RUST_LOG wins, otherwise warn (debug with --verbose)
fn init_tracing(global: &GlobalOpts) {
    let default_level = if global.verbose { "batchbot=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
