// PolicyScan Core Services

pub mod text_processor;
pub mod lexicon;
pub mod normalizer;
pub mod config_store;
pub mod document_loader;
pub mod report;
pub mod detection;

pub use text_processor::*;
pub use normalizer::{normalize, Normalizer};
pub use config_store::*;
pub use document_loader::{extract_text, load_document, DocumentError};
pub use report::render_result_page;

// Re-export detection module items
pub use detection::{
    highlight,
    Classifier,
    EmbeddingAggregator,
    EmbeddingFormat,
    EmbeddingTable,
    FeatureStats,
    Highlighter,
    LinearClassifier,
    ModelError,
    OovPolicy,
    Validator,
    WordVectors,
};
