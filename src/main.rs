//! PageSentinel - Web page change detection tool
//!
//! Checks a page for changes and announces them in a chat channel, either
//! once per invocation or on a fixed interval.

use anyhow::Result;
use pagesentinel::cli::{
    Cli, Commands, OutputFormat,
    check, watch, status, forget,
    print_config, print_outcome_json, print_outcome_text,
    print_records_json, print_records_text,
};
use pagesentinel::Config;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Setup logging (stderr, so JSON output stays clean)
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Load configuration once for the whole process
    let mut config = Config::load(cli.config.as_deref())?;

    // Execute command
    match cli.command {
        Commands::Check(args) => {
            if let Some(uri) = args.uri {
                config.webpage_uri = uri;
            }

            let outcome = check(&config).await?;

            match cli.format {
                OutputFormat::Json => print_outcome_json(&outcome)?,
                OutputFormat::Text => print_outcome_text(&outcome),
            }
        }

        Commands::Watch(args) => {
            let json = cli.format == OutputFormat::Json;
            watch(&config, Duration::from_secs(args.interval), json).await?;
        }

        Commands::Status(args) => {
            let records = status(&config, args.all)?;

            match cli.format {
                OutputFormat::Json => print_records_json(&records)?,
                OutputFormat::Text => print_records_text(&records),
            }
        }

        Commands::Forget(args) => {
            if forget(&config, args.uri.as_deref())? {
                println!("✓ Fingerprint removed; the next check will notify");
            } else {
                println!("No fingerprint stored");
            }
        }

        Commands::Config => {
            print_config(&config);
        }
    }

    Ok(())
}
