use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, EnvFilter};

use mindful::cli::args::{Cli, Commands};
use mindful::cli::commands::{self, Context};
use mindful::config::Paths;
use mindful::error::MindfulError;

const LOG_ENV: &str = "MINDFUL_LOG";

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        let code = e.downcast_ref::<MindfulError>().map_or(1, MindfulError::exit_code);
        std::process::exit(code);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("mindful=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let ctx = Context::load(Paths::new()?, cli.output).context("Failed to load configuration")?;

    let output = match cli.command {
        Commands::Techniques => commands::techniques(&ctx)?,
        Commands::Breathe { technique } => commands::breathe(&ctx, technique.as_deref())?,
        Commands::Simulate { technique, seconds } => {
            commands::simulate(&ctx, technique.as_deref(), seconds)?
        }
        Commands::History { limit, technique } => {
            commands::history(&ctx, limit, technique.as_deref())?
        }
        Commands::Report { period } => commands::report(&ctx, &period)?,
        Commands::Clear { force } => commands::clear(&ctx, force)?,
        Commands::Journal(args) => commands::journal(&ctx, args.command)?,
        Commands::Config(args) => commands::config(&ctx, args.command)?,
        Commands::Completions { shell } => commands::completions(shell)?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
