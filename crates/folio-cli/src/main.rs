mod commands;
mod config;
mod inspire;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use config::SiteConfig;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Maintenance tooling for the site's publication and presentation data")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Site root
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Configuration file (default: <root>/Folio.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse both data files and print record counts
    Check,

    /// Write a standalone HTML preview of the rendered sections
    Render {
        /// Output HTML file
        #[arg(short, long, default_value = "preview.html")]
        output: PathBuf,
    },

    /// Generate sitemap.xml
    Sitemap {
        /// Site base URL (overrides base_url in the configuration)
        #[arg(long)]
        base_url: Option<String>,

        /// Output file (default: [sitemap] output, relative to the root)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Citation counts from INSPIRE-HEP
    Citations {
        #[command(subcommand)]
        action: CitationsAction,
    },
}

#[derive(Subcommand)]
enum CitationsAction {
    /// Look up every publication and write the merged metadata back
    Update {
        /// Don't copy the original file to <file>.bak
        #[arg(long)]
        no_backup: bool,

        /// Pause between publications (milliseconds)
        #[arg(long, default_value = "2000")]
        delay_ms: u64,
    },

    /// Print citation statistics
    Report,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(error) = run(Cli::parse()) {
        eprintln!("Error: {error:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = SiteConfig::load(&cli.root, cli.config.as_deref())?;

    match cli.command {
        Commands::Check => {
            commands::check::run(&cli.root, &config)?;
        }

        Commands::Render { output } => {
            commands::render::run(&cli.root, &config, &output)?;
        }

        Commands::Sitemap { base_url, output } => {
            commands::sitemap::run(&cli.root, &config, base_url.as_deref(), output.as_deref())?;
        }

        Commands::Citations { action } => match action {
            CitationsAction::Update { no_backup, delay_ms } => {
                let rt = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
                rt.block_on(commands::citations::update(&cli.root, &config, !no_backup, delay_ms))?;
            }
            CitationsAction::Report => {
                commands::citations::report(&cli.root, &config)?;
            }
        },
    }

    Ok(())
}
