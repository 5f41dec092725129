use anyhow::{Context, Result};
use chrono::Local;
use std::path::PathBuf;

use crate::config::{Config, OutputFormat};
use crate::display::{format_dashboard, format_invalid_link, report_date};
use crate::export::{to_json, write_html, ReportDocument};
use crate::report::Report;
use crate::resolver::{resolve, InputOrigin, LinkSource, QueryParams, Resolution};

#[derive(Debug, Clone)]
pub enum RoiCommand {
    Show {
        source: LinkSource,
        format: Option<OutputFormat>,
    },
    Export {
        source: LinkSource,
        output: PathBuf,
    },
    Demo {
        format: Option<OutputFormat>,
    },
}

pub fn run(cmd: RoiCommand, config: &Config, verbose: u8) -> Result<()> {
    let generated_on = report_date(Local::now().date_naive());

    match cmd {
        RoiCommand::Show { source, format } => {
            let format = format.unwrap_or(config.display.format);
            let resolution = match load(&source, verbose) {
                Ok(resolution) => resolution,
                Err(err) => {
                    print_invalid_link(format, &err);
                    return Err(err.into());
                }
            };
            print_report(&resolution, config, format, &generated_on)
        }
        RoiCommand::Export { source, output } => {
            let resolution = match load(&source, verbose) {
                Ok(resolution) => resolution,
                Err(err) => {
                    print_invalid_link(OutputFormat::Text, &err);
                    return Err(err.into());
                }
            };
            let report = Report::new(resolution.record);
            write_html(&output, &report, &config.branding, &generated_on)?;
            println!("Report saved to {}", output.display());
            Ok(())
        }
        RoiCommand::Demo { format } => {
            let resolution = resolve(&QueryParams::default());
            print_report(
                &resolution,
                config,
                format.unwrap_or(config.display.format),
                &generated_on,
            )
        }
    }
}

fn load(source: &LinkSource, verbose: u8) -> Result<Resolution, crate::resolver::SourceError> {
    let params = source.read()?;
    let resolution = resolve(&params);

    if verbose > 0 && params.is_empty() {
        eprintln!("No link parameters supplied");
    }
    if verbose > 0 {
        let origin = match resolution.origin {
            InputOrigin::Demo => "demo dataset (no client or project in link)",
            InputOrigin::Supplied => "link parameters",
        };
        eprintln!("Input from {}: {}", source.describe(), origin);
        for field in &resolution.unparsed {
            eprintln!("⚠️  '{}' is not a number, using 0", field);
        }
    }
    if verbose > 1 {
        eprintln!("{:#?}", resolution.record);
    }

    Ok(resolution)
}

fn print_report(
    resolution: &Resolution,
    config: &Config,
    format: OutputFormat,
    generated_on: &str,
) -> Result<()> {
    let report = Report::new(resolution.record.clone());
    match format {
        OutputFormat::Json => {
            let document = ReportDocument::new(resolution, &report, generated_on);
            println!("{}", to_json(&document)?);
        }
        OutputFormat::Text => {
            println!(
                "{}",
                format_dashboard(&report, &config.branding, generated_on)
            );
        }
    }
    Ok(())
}

fn print_invalid_link(format: OutputFormat, err: &crate::resolver::SourceError) {
    match format {
        OutputFormat::Json => {
            let body = serde_json::json!({
                "error": "Invalid Dashboard Link",
                "detail": err.to_string(),
            });
            match serde_json::to_string_pretty(&body).context("Failed to serialize error") {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("{:#}", e),
            }
        }
        OutputFormat::Text => println!("{}", format_invalid_link()),
    }
}
