// CLI Commands and Arguments
// `validate`, `segment` and `config` subcommands

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::services::EmbeddingFormat;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a policy document and highlight problematic paragraphs
    Validate(ValidateArgs),

    /// Print the paragraphs a document is split into
    Segment(SegmentArgs),

    /// Show or initialize the configuration file
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Input document (.txt, .md, .docx or .pdf)
    pub file: PathBuf,

    /// Embedding artifact, overrides the configured path
    #[arg(long)]
    pub embeddings: Option<PathBuf>,

    /// Layout of the embedding artifact
    #[arg(long, value_enum)]
    pub embeddings_format: Option<FormatArg>,

    /// Read only the first N embedding vectors
    #[arg(long)]
    pub embeddings_limit: Option<usize>,

    /// Classifier artifact (JSON), overrides the configured path
    #[arg(long)]
    pub classifier: Option<PathBuf>,

    /// Classify paragraphs on this many threads
    #[arg(long)]
    pub workers: Option<usize>,

    /// Write the HTML result page here
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Write the JSON report here
    #[arg(long)]
    pub json: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SegmentArgs {
    /// Input document (.txt, .md, .docx or .pdf)
    pub file: PathBuf,

    /// Also print the normalized tokens of each paragraph
    #[arg(long)]
    pub tokens: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration as JSON
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file (a backup is kept)
        #[arg(long)]
        force: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum FormatArg {
    Binary,
    Text,
}

impl From<FormatArg> for EmbeddingFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Binary => EmbeddingFormat::Binary,
            FormatArg::Text => EmbeddingFormat::Text,
        }
    }
}
