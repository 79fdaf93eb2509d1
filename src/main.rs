use album_ingest::{config, output, pipeline};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "album-ingest")]
#[command(about = "Incremental ingest of downloaded album archives")]
#[command(long_about = "\
Incremental ingest of downloaded album archives

Archives in the downloads directory are extracted into one flat directory per
album, every image is resized and re-encoded as AVIF, and the results are
merged into a JSON catalog keyed by album name.

Directory layout (defaults, relative to the working directory):

  timeliner_repo/
  ├── downloaded_albums/           # Input archives (*.zip)
  ├── extracted_albums/
  │   └── Trip2020/                # One directory per album, images only
  └── processed/downloaded/
      └── Trip2020/                # Normalized outputs (*.avif)
  index.json                       # Catalog: album → list of output paths

Re-running is safe: archives whose album directory exists and images whose
output exists are skipped. Use --extract / --force to redo those stages.

Logging goes to stderr and follows RUST_LOG (default: warn,album_ingest=info).

Run 'album-ingest gen-config' to generate a documented album-ingest.toml.")]
#[command(version)]
struct Cli {
    /// Config file (missing file = stock defaults)
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract archives, normalize images, and merge the catalog
    Run {
        /// Re-transcode images whose output already exists
        #[arg(short, long)]
        force: bool,
        /// Re-extract archives whose album directory already exists
        #[arg(short, long)]
        extract: bool,
    },
    /// Validate the catalog and report entries missing on disk
    Check,
    /// Print a stock album-ingest.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,album_ingest=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Run { force, extract } => {
            let config = config::load_config(&cli.config)?;
            let summary = pipeline::run(
                &config,
                pipeline::RunOptions {
                    force_extract: extract,
                    force_reprocess: force,
                },
            )?;
            output::print_run_summary(&summary, &config.paths.catalog);
        }
        Command::Check => {
            let config = config::load_config(&cli.config)?;
            let report = pipeline::check(&config)?;
            output::print_check_report(&report);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
