//! # Scratch Reveal
//!
//! Replays a scripted rub over a scratch mask and reports what happened.

use clap::Parser;
use scratch_cli::{export_png, run, CliArgs, DriverConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scratch_cli=debug,scratch_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    let config = DriverConfig::from_args(args)?;

    tracing::info!(
        "Surface {}x{}, pattern {:?}, threshold {}",
        config.width,
        config.height,
        config.pattern,
        config.engine.win_threshold
    );

    let (session, report) = run(&config)?;

    if let Some(ref path) = config.out {
        export_png(&session.frame()?, path)?;
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
