// CLI Layer
// Parses arguments with clap and routes to the validation services.
// Collaborators (embeddings, classifier) are loaded once per process.

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::services::{
    load_document, render_result_page, segment_paragraphs, AppConfig, ConfigStore,
    LinearClassifier, ModelConfig, Normalizer, Validator, WordVectors,
};
use commands::{Commands, ConfigAction, SegmentArgs, ValidateArgs};

#[derive(Parser, Debug)]
#[command(
    name = "policyscan",
    version,
    about = "Flag problematic paragraphs in policy text and highlight them."
)]
pub struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let store = self.config_store()?;
        match self.command {
            Commands::Validate(args) => run_validate(&store, args),
            Commands::Segment(args) => run_segment(args),
            Commands::Config(args) => run_config(&store, args.action),
        }
    }

    fn config_store(&self) -> Result<ConfigStore> {
        match &self.config {
            Some(path) => Ok(ConfigStore::with_file(path.clone())),
            None => ConfigStore::default_config_dir()
                .map(ConfigStore::new)
                .context("no user config directory available; pass --config"),
        }
    }
}

fn load_config(store: &ConfigStore) -> Result<AppConfig> {
    store.load().map_err(anyhow::Error::msg)
}

/// Load the pretrained collaborators described by `model`.
pub fn load_validator(config: &AppConfig) -> Result<Validator> {
    let model: &ModelConfig = &config.model;

    let embeddings = WordVectors::load(
        &model.embeddings_path,
        model.embeddings_format,
        model.embeddings_limit,
        model.dimension,
    )
    .with_context(|| format!("loading embeddings from {}", model.embeddings_path.display()))?;

    let classifier = LinearClassifier::load(&model.classifier_path, model.dimension)
        .with_context(|| format!("loading classifier from {}", model.classifier_path.display()))?;

    Ok(Validator::from_config(
        &config.validation,
        Arc::new(embeddings),
        Arc::new(classifier),
    ))
}

fn run_validate(store: &ConfigStore, args: ValidateArgs) -> Result<()> {
    let mut config = load_config(store)?;
    if let Some(path) = args.embeddings {
        config.model.embeddings_path = path;
    }
    if let Some(format) = args.embeddings_format {
        config.model.embeddings_format = format.into();
    }
    if args.embeddings_limit.is_some() {
        config.model.embeddings_limit = args.embeddings_limit;
    }
    if let Some(path) = args.classifier {
        config.model.classifier_path = path;
    }
    if let Some(workers) = args.workers {
        config.validation.workers = workers;
    }

    let text = load_document(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let validator = load_validator(&config)?;

    let report = if config.validation.workers > 1 {
        validator.validate_parallel(&text, config.validation.workers)
    } else {
        validator.validate(&text)
    };

    if report.has_problems() {
        println!("{} problematic paragraph(s):", report.problems.len());
        for (i, problem) in report.problems.iter().enumerate() {
            println!("[{}] {}", i + 1, problem.replace('\n', " "));
        }
    } else {
        println!("No problematic paragraphs found.");
    }

    if let Some(path) = args.html {
        fs::write(&path, render_result_page(&report))
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "report.html_written");
    }
    if let Some(path) = args.json {
        fs::write(&path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "report.json_written");
    }

    Ok(())
}

fn run_segment(args: SegmentArgs) -> Result<()> {
    let text = load_document(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let normalizer = Normalizer::new();

    let paragraphs = segment_paragraphs(&text);
    println!("Paragraphs: {}", paragraphs.len());
    for (i, paragraph) in paragraphs.iter().enumerate() {
        println!("[P{:04}] {}", i, paragraph.replace('\n', " / "));
        if args.tokens {
            println!("        tokens: {:?}", normalizer.normalize(paragraph));
        }
    }
    Ok(())
}

fn run_config(store: &ConfigStore, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(store)?;
            println!("# {}", store.config_file().display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Init { force } => {
            if store.config_file().exists() && !force {
                anyhow::bail!(
                    "{} already exists; use --force to overwrite",
                    store.config_file().display()
                );
            }
            store.save(&AppConfig::default()).map_err(anyhow::Error::msg)?;
            println!("Wrote {}", store.config_file().display());
        }
    }
    Ok(())
}
