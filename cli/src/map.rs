//! letterloc-map - geocoding and map rendering of location counts

mod common;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;

use letterloc::geocode::{DEFAULT_ENDPOINT, DEFAULT_USER_AGENT};
use letterloc::pipeline::{self, MapSummary};
use letterloc::{table, GeocodeOptions, Geocoder};

use common::{exit_on_error, progress_bar, step, CliResult, CommonArgs};

#[derive(Parser)]
#[command(name = "letterloc-map")]
#[command(version)]
#[command(about = "Geocode location counts and render them as maps", long_about = None)]
struct Cli {
    /// Only render from an existing coordinate table (data/csv/loc_coordinates.csv)
    #[arg(short, long)]
    plot: bool,

    /// Frequency table to geocode [default: <data-dir>/csv/loc_count.csv]
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Nominatim base URL
    #[arg(long, value_name = "URL", env = "LETTERLOC_GEOCODER_URL", default_value = DEFAULT_ENDPOINT)]
    geocoder_url: String,

    /// User-Agent sent to the geocoder
    #[arg(long, env = "LETTERLOC_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Minimum delay between geocoder requests
    #[arg(long, value_name = "MS", default_value = "1000")]
    min_delay_ms: u64,

    /// Retries after a failed geocoder request
    #[arg(long, value_name = "N", default_value = "2")]
    max_retries: u32,

    /// Pause before each retry
    #[arg(long, value_name = "MS", default_value = "5000")]
    error_wait_ms: u64,

    /// GeoJSON land polygons drawn below the static scatters
    #[arg(long, value_name = "FILE", env = "LETTERLOC_BASEMAP")]
    basemap: Option<PathBuf>,

    /// Feature property selecting the European basemap
    #[arg(long, value_name = "KEY=VALUE", default_value = "continent=Europe")]
    basemap_filter: String,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    exit_on_error(run(&cli));
}

fn parse_filter(filter: &str) -> CliResult<Option<(String, String)>> {
    if filter.is_empty() {
        return Ok(None);
    }
    match filter.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok(Some((key.to_string(), value.to_string()))),
        _ => Err(format!("invalid basemap filter '{}': expected KEY=VALUE", filter).into()),
    }
}

fn run(cli: &Cli) -> CliResult<()> {
    let mut config = cli
        .common
        .config()
        .with_basemap_filter(parse_filter(&cli.basemap_filter)?);
    if let Some(basemap) = &cli.basemap {
        config = config.with_basemap(basemap);
    }

    let summary = if cli.plot {
        step(&format!(
            "Rendering from {}",
            config.coordinate_table().display()
        ));
        pipeline::plot(&config)?
    } else {
        let input = cli.file.clone().unwrap_or_else(|| config.frequency_table());
        let records = table::read_frequencies(&input)?;
        step(&format!(
            "Geocoding {} locations from {}",
            records.len(),
            input.display()
        ));

        let geocoder = GeocodeOptions::new()
            .with_endpoint(cli.geocoder_url.as_str())
            .with_user_agent(cli.user_agent.as_str())
            .with_min_delay(Duration::from_millis(cli.min_delay_ms))
            .with_retries(cli.max_retries, Duration::from_millis(cli.error_wait_ms))
            .with_error_mode(cli.common.error_mode());
        let error_mode = geocoder.error_mode;
        let geocoder = geocoder.build()?;

        let pb = progress_bar(records.len(), geocoder.name())?;
        let summary = pipeline::map(&config, &geocoder, &records, error_mode, |record, _| {
            pb.set_message(record.name.clone());
            pb.inc(1);
        })?;
        pb.finish_with_message(format!("{} resolved", summary.resolved));
        step(&format!(
            "Saved coordinates to {}",
            config.coordinate_table().display()
        ));
        summary
    };

    print_summary(&summary);
    cli.common.emit_summary(&summary)?;

    if summary.report.is_complete() {
        Ok(())
    } else {
        Err(format!("{} renderer(s) failed", summary.report.failures.len()).into())
    }
}

fn print_summary(summary: &MapSummary) {
    println!("\n{}", "Maps".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    if let Some(locations) = summary.locations {
        println!("{}: {}", "Locations".bold(), locations);
    }
    println!("{}: {}", "Resolved".bold(), summary.resolved);
    if !summary.unresolved.is_empty() {
        let names: Vec<&str> = summary.unresolved.iter().map(|r| r.name.as_str()).collect();
        println!("{}: {}", "Unresolved".bold(), names.join(", ").yellow());
    }
    println!("{}: {}", "Mentions on maps".bold(), summary.rendered_total);

    println!("\n{}", "Output files:".green().bold());
    let written = &summary.report.written;
    for (i, artifact) in written.iter().enumerate() {
        let branch = if i + 1 == written.len() { "└─" } else { "├─" };
        println!("  {} {}", branch.dimmed(), artifact.path.display());
    }
    for failure in &summary.report.failures {
        println!(
            "  {} {}: {}",
            "✗".red(),
            failure.renderer,
            failure.message.red()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter() {
        assert_eq!(
            parse_filter("continent=Europe").unwrap(),
            Some(("continent".to_string(), "Europe".to_string()))
        );
        assert_eq!(parse_filter("").unwrap(), None);
        assert!(parse_filter("continent").is_err());
        assert!(parse_filter("=Europe").is_err());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from(["letterloc-map", "-p", "--data-dir", "corpus"]).unwrap();
        assert!(cli.plot);
        assert_eq!(cli.common.data_dir, PathBuf::from("corpus"));
        assert_eq!(cli.min_delay_ms, 1000);
        assert_eq!(cli.max_retries, 2);
        assert_eq!(cli.error_wait_ms, 5000);
        assert!(cli.file.is_none());
    }
}
