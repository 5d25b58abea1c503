use clap::Parser;

mod cli;
mod commands;
mod run_lock;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("hearth error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let config = match cli.config.as_deref() {
        Some(path) => hearth_config::HearthConfig::load_with_file(path)?,
        None => hearth_config::HearthConfig::load_with_dotenv()?,
    };
    config.store.validate()?;

    // both jobs write to the store; never let two runs overlap
    let lock = run_lock::acquire().await?;
    let result = match &cli.command {
        cli::Commands::Rollover { now } => commands::rollover(&config, now.as_deref()).await,
        cli::Commands::Review { now } => commands::review(&config, now.as_deref()).await,
    };
    drop(lock);
    result
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("HEARTH_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
