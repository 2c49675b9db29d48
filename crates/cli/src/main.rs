//! CLI tool for generating PowerPoint decks from JSON deck specifications.

use anyhow::{Context, Result};
use clap::Parser;
use deck_core::SpecNormalizer;
use deck_render::{Renderer, RendererConfig};
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Generate a PPTX deck from a JSON deck specification.
#[derive(Parser, Debug)]
#[command(name = "deck-generate")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Deck specification file, or "-" to read stdin
    #[arg(required_unless_present = "list_templates")]
    spec: Option<PathBuf>,

    /// Output directory when the deck does not name one
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Palette used when the deck brings none
    #[arg(long)]
    default_theme: Option<PathBuf>,

    /// Directory holding .pptx/.potx templates
    #[arg(long)]
    templates_dir: Option<PathBuf>,

    /// Code lines per slide before a code slide is split
    #[arg(short = 'l', long)]
    max_code_lines: Option<usize>,

    /// Reject unknown layout names instead of falling back
    #[arg(long)]
    strict_layouts: bool,

    /// List the available templates and exit
    #[arg(long)]
    list_templates: bool,

    /// Print compact JSON instead of pretty JSON
    #[arg(long)]
    compact: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let renderer = Renderer::new(build_config(&args))
        .with_normalizer(SpecNormalizer::new().with_strict_layouts(args.strict_layouts));

    if args.list_templates {
        print_json(&renderer.list_templates(), args.compact)?;
        return Ok(ExitCode::SUCCESS);
    }

    let spec_path = args
        .spec
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("A deck specification is required"))?;
    let spec = read_spec(spec_path)?;

    let result = renderer.generate_value(&spec);
    print_json(&result, args.compact)?;

    if result.ok {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Apply command-line overrides on top of the default configuration.
fn build_config(args: &Args) -> RendererConfig {
    let mut config = RendererConfig::new();
    if let Some(path) = &args.default_theme {
        config = config.with_default_theme_path(path);
    }
    if let Some(dir) = &args.templates_dir {
        config = config.with_templates_dir(dir);
    }
    if let Some(dir) = &args.output {
        config = config.with_output_dir(dir);
    }
    if let Some(lines) = args.max_code_lines {
        config = config.with_max_code_lines(lines);
    }
    config
}

/// Read and parse the deck specification.
fn read_spec(path: &Path) -> Result<Value> {
    let mut content = String::new();
    if path == Path::new("-") {
        io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read specification from stdin")?;
    } else {
        let file = File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        BufReader::new(file)
            .read_to_string(&mut content)
            .with_context(|| format!("Failed to read {}", path.display()))?;
    }

    serde_json::from_str(&content).context("Specification is not valid JSON")
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", json).context("Failed to write to stdout")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_reach_config() {
        let args = Args::parse_from([
            "deck-generate",
            "deck.json",
            "-o",
            "decks",
            "--templates-dir",
            "tpl",
            "-l",
            "0",
        ]);
        let config = build_config(&args);
        assert_eq!(config.default_output_dir, PathBuf::from("decks"));
        assert_eq!(config.templates_dir, PathBuf::from("tpl"));
        assert_eq!(config.max_code_lines_per_slide, 1);
        assert_eq!(config.default_theme_path, RendererConfig::new().default_theme_path);
    }

    #[test]
    fn test_spec_is_optional_when_listing() {
        let args = Args::parse_from(["deck-generate", "--list-templates"]);
        assert!(args.spec.is_none());
        assert!(Args::try_parse_from(["deck-generate"]).is_err());
    }
}
