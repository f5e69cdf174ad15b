use clap::Parser;
use tracing_subscriber::EnvFilter;

use fuzzweight::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let config = cli.matching_config()?;

    // Trace channels emit at debug and trace level; verbosity raises the rest
    let filter = if config.trace.any() {
        EnvFilter::new("fuzzweight=trace,info")
    } else if cli.verbose {
        EnvFilter::new("fuzzweight=debug,info")
    } else {
        EnvFilter::new("fuzzweight=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Score(args) => {
            cli::score::run(args, config, cli.format, cli.verbose)?;
        }
        cli::Commands::Rank(args) => {
            cli::rank::run(args, config, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
