// Detection Module
// Paragraph classification core organized into specialized submodules:
// - embeddings: embedding table, artifact loaders and the averaging aggregator
// - classifier: pretrained binary classifier adapter
// - highlight: whitespace-tolerant re-insertion of problem paragraphs
// - pipeline: segment -> normalize -> embed -> classify -> highlight

pub mod embeddings;
pub mod classifier;
pub mod highlight;
pub mod pipeline;

use thiserror::Error;

/// Failures while loading the pretrained artifacts.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid embedding header: {0}")]
    InvalidHeader(String),
    #[error("invalid embedding entry {index}: {message}")]
    InvalidEntry { index: usize, message: String },
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("classifier artifact must declare exactly two classes, found {0}")]
    InvalidClasses(usize),
}

pub use embeddings::{
    EmbeddingAggregator,
    EmbeddingFormat,
    EmbeddingTable,
    FeatureStats,
    OovPolicy,
    WordVectors,
};
pub use classifier::{Classifier, LinearClassifier};
pub use highlight::{highlight, Highlighter, DEFAULT_HIGHLIGHT_COLOR};
pub use pipeline::Validator;
