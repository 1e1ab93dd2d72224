//! letterloc-extract - location extraction and counting for letter corpora

mod common;

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use log::debug;

use letterloc::pipeline::{self, PreprocessSummary};
use letterloc::{EntityTagger, ExtractOptions, GazetteerTagger, HttpTagger, NormalizeOptions};

use common::{exit_on_error, progress_bar, step, CliResult, CommonArgs};

#[derive(Parser)]
#[command(name = "letterloc-extract")]
#[command(version)]
#[command(about = "Extract, normalize and count location mentions in XML letters", long_about = None)]
struct Cli {
    /// Only recount from an existing entity table (data/csv/loc_exploded.csv)
    #[arg(short, long)]
    preprocess: bool,

    /// Place-name list for the gazetteer tagger, one name per line
    #[arg(long, value_name = "FILE", env = "LETTERLOC_GAZETTEER")]
    gazetteer: Option<PathBuf>,

    /// NER service endpoint, used instead of a gazetteer
    #[arg(long, value_name = "URL", env = "LETTERLOC_TAGGER_URL", conflicts_with = "gazetteer")]
    tagger_url: Option<String>,

    /// JSON file overriding the normalization vocabularies
    #[arg(long, value_name = "FILE", env = "LETTERLOC_NORMALIZE_CONFIG")]
    normalize_config: Option<PathBuf>,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    exit_on_error(run(&cli));
}

fn build_tagger(cli: &Cli) -> CliResult<Box<dyn EntityTagger>> {
    if let Some(url) = &cli.tagger_url {
        debug!("Using NER service at {}", url);
        return Ok(Box::new(HttpTagger::new(url.as_str())?));
    }
    match &cli.gazetteer {
        Some(path) => {
            let tagger = GazetteerTagger::from_file(path)?;
            debug!("Loaded {} gazetteer names from {}", tagger.len(), path.display());
            Ok(Box::new(tagger))
        }
        None => Err("a tagger is required: pass --gazetteer FILE or --tagger-url URL".into()),
    }
}

fn run(cli: &Cli) -> CliResult<()> {
    let normalize = match &cli.normalize_config {
        Some(path) => NormalizeOptions::from_json_file(path)?,
        None => NormalizeOptions::default(),
    };
    let config = cli
        .common
        .config()
        .with_extract_options(ExtractOptions::new().with_error_mode(cli.common.error_mode()))
        .with_normalize_options(normalize);

    let summary = if cli.preprocess {
        step(&format!(
            "Counting from {}",
            config.exploded_table().display()
        ));
        pipeline::recount(&config)?
    } else {
        let tagger = build_tagger(cli)?;

        step(&format!("Extracting text from {}", config.xml_dir().display()));
        let documents = pipeline::extract_corpus(&config)?;
        step(&format!(
            "Extracted {} documents to {}",
            documents.len(),
            config.txt_dir().display()
        ));

        let pb = progress_bar(documents.len(), "Tagging")?;
        let mentions = pipeline::tag_corpus(&config, tagger.as_ref(), &documents, |doc, _| {
            pb.set_message(doc.id.clone());
            pb.inc(1);
        })?;
        pb.finish_with_message(format!("{} mentions", mentions.len()));
        // release the model before counting
        drop(tagger);

        let (normalization, records) = pipeline::count_locations(&config, &mentions)?;
        PreprocessSummary::new(
            &config,
            Some(documents.len()),
            mentions.len(),
            normalization,
            &records,
        )
    };

    print_summary(&summary);
    cli.common.emit_summary(&summary)
}

fn print_summary(summary: &PreprocessSummary) {
    println!("\n{}", "Locations".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    if let Some(documents) = summary.documents {
        println!("{}: {}", "Documents".bold(), documents);
    }
    println!("{}: {}", "Mentions".bold(), summary.mentions);
    println!("{}: {}", "Dropped".bold(), summary.dropped);
    println!("{}: {}", "Corrections".bold(), summary.corrections.len());
    for c in &summary.corrections {
        println!(
            "  {} {} -> {} ({})",
            "├─".dimmed(),
            c.candidate,
            c.reference,
            c.score
        );
    }
    println!("{}: {}", "Distinct names".bold(), summary.locations);
    println!("{}: {}", "Total count".bold(), summary.total_count);
    println!(
        "\n{} {}",
        "Saved to".green(),
        summary.frequency_table.display()
    );
}
