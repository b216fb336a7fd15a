use anyhow::{Context, Result};
use clap::Parser;

use lexvar_cli::args::CliArgs;
use lexvar_cli::{commands, tracing_config};

fn main() -> Result<()> {
    // Initialize tracing if LEXVAR_LOG or RUST_LOG is set (zero cost otherwise).
    // Supports LEXVAR_LOG_FORMAT=tree|json|text (see tracing_config.rs).
    tracing_config::init_tracing();

    let args = CliArgs::parse();
    let value = commands::run(&args)?;
    let text = serde_json::to_string_pretty(&value).context("failed to render result")?;
    println!("{text}");
    Ok(())
}
