//! drumgrid - MusicXML to Hydrogen drum pattern converter

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::path::{Path, PathBuf};

use drumgrid::{document_to_json, map_score, parse_file, Config, DrumPattern, PATTERN_LENGTH};

#[derive(Parser, Debug)]
#[command(name = "drumgrid")]
#[command(about = "Convert MusicXML scores into Hydrogen drum patterns", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the configuration file. The format is TOML; YAML configs
    /// (`config.yaml`) must be rewritten as TOML with the same keys
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Path to the MusicXML input file (overrides config)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Path for the output .h2pattern file (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the exported document as JSON to stdout
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let mut config = Config::load(&args.config)
        .with_context(|| format!("Failed to load config {}", args.config.display()))?;
    tracing::debug!(?config, "config loaded");

    if let Some(input) = args.input {
        config.input_file = Some(input);
    }
    if let Some(output) = args.output {
        config.output_file = Some(output);
    }

    let Some(input) = config.input_file.clone() else {
        Args::command().print_help()?;
        return Ok(());
    };
    let output = config
        .output_file
        .clone()
        .unwrap_or_else(|| default_output_path(&input));

    let score = parse_file(&input)
        .with_context(|| format!("Failed to parse MusicXML {}", input.display()))?;
    let notes = map_score(&score, &config);
    tracing::info!("Parsed {} notes from {}", notes.len(), input.display());

    let pattern = DrumPattern::from_notes(&notes, config.tempo, PATTERN_LENGTH);
    tracing::debug!(?pattern, "generated pattern");

    pattern
        .export_to_file(&output)
        .with_context(|| format!("Failed to export pattern to {}", output.display()))?;

    if args.json {
        println!("{}", document_to_json(&pattern.to_document())?);
    }

    tracing::info!("Pattern exported to {}", output.display());
    Ok(())
}

/// `<input-stem>.h2pattern` next to the working directory.
fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    PathBuf::from(format!("{stem}.h2pattern"))
}
