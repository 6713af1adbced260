//! `viewer-session` resumes the visitor's session against the API, visits a
//! location and prints the resulting screen as JSON.
//!
//! ```bash
//! viewer-session --config ./config.yaml /user/5d378db94e84753160e08b55
//! viewer-session "/stripe?code=ac_123"
//! viewer-session --print-schema
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use viewer_session::config::{config_schema, load_config};
use viewer_session::startup::{self, StartupError};
use viewer_session::utils::logger::init_logging;

#[derive(Parser)]
#[command(name = "viewer-session")]
#[command(author, version, about = "Resume the viewer session and render a location")]
struct Cli {
    /// Path to the YAML configuration
    #[arg(short, long, default_value = "./config.yaml")]
    config: PathBuf,

    /// Print the JSON schema of the configuration and exit
    #[arg(long)]
    print_schema: bool,

    /// Location to visit, e.g. `/stripe?code=...`
    #[arg(default_value = "/")]
    location: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.print_schema {
        println!("{}", config_schema());
        return;
    }

    if let Err(e) = run(cli).await {
        tracing::error!(
            event_name = "startup.failed",
            event_domain = "startup",
            "{e}"
        );
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), StartupError> {
    let config = load_config(&cli.config)?;
    init_logging(&config.logging)?;

    let visit = startup::run(Arc::new(config), &cli.location).await?;
    println!("{}", serde_json::to_string_pretty(&visit)?);
    Ok(())
}
