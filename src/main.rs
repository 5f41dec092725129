mod config;
mod display;
mod export;
mod gauge;
mod report;
mod resolver;
mod roi_cmd;
mod utils;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use config::{ColorMode, Config, OutputFormat};
use resolver::LinkSource;
use roi_cmd::RoiCommand;

#[derive(Parser)]
#[command(
    name = "roi-report",
    version,
    about = "Render ROI impact reports from report links"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (default: ~/.config/roi-report/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Colour output
    #[arg(long, value_enum, global = true)]
    color: Option<ColorMode>,
}

#[derive(Args, Debug, Clone)]
struct SourceArgs {
    /// Report link: full URL or query string (?client=...&roi=...)
    #[arg(conflicts_with_all = ["file", "stdin"])]
    link: Option<String>,

    /// Read the report link from a file
    #[arg(long, conflicts_with = "stdin")]
    file: Option<PathBuf>,

    /// Read the report link from stdin
    #[arg(long)]
    stdin: bool,
}

impl SourceArgs {
    fn into_source(self) -> LinkSource {
        match (self.link, self.file, self.stdin) {
            (Some(link), _, _) => LinkSource::Inline(link),
            (None, Some(path), _) => LinkSource::File(path),
            (None, None, true) => LinkSource::Stdin,
            (None, None, false) => LinkSource::Empty,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the ROI dashboard for a report link
    Show {
        #[command(flatten)]
        source: SourceArgs,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Save a printable HTML report
    Export {
        #[command(flatten)]
        source: SourceArgs,

        /// Output file
        #[arg(short, long, default_value = "roi-report.html")]
        output: PathBuf,
    },

    /// Show the built-in demo report
    Demo {
        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if cli.verbose > 0 {
        match cli.config.clone().or_else(Config::default_path) {
            Some(path) => eprintln!("Config: {}", path.display()),
            None => eprintln!("Config: defaults"),
        }
    }
    cli.color.unwrap_or(config.display.color).apply();

    let cmd = match cli.command {
        Commands::Show { source, format } => RoiCommand::Show {
            source: source.into_source(),
            format,
        },
        Commands::Export { source, output } => RoiCommand::Export {
            source: source.into_source(),
            output,
        },
        Commands::Demo { format } => RoiCommand::Demo { format },
    };

    roi_cmd::run(cmd, &config, cli.verbose)
}
