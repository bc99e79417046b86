// Validation Pipeline
// Segmenter -> (Normalizer -> Aggregator -> Classifier) per paragraph -> Highlighter

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span};
use uuid::Uuid;

use super::classifier::Classifier;
use super::embeddings::{EmbeddingAggregator, EmbeddingTable};
use super::highlight::Highlighter;
use crate::models::{ParagraphVerdict, ValidationReport};
use crate::services::config_store::ValidationConfig;
use crate::services::normalizer::Normalizer;
use crate::services::text_processor::segment_paragraphs;

/// Classifies a document paragraph by paragraph.
///
/// The embedding table and classifier are injected read-only capabilities,
/// shared across calls and threads without locking.
#[derive(Clone)]
pub struct Validator {
    embeddings: Arc<dyn EmbeddingTable>,
    classifier: Arc<dyn Classifier>,
    normalizer: Normalizer,
    aggregator: EmbeddingAggregator,
    highlighter: Highlighter,
}

impl Validator {
    pub fn new(embeddings: Arc<dyn EmbeddingTable>, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            embeddings,
            classifier,
            normalizer: Normalizer::new(),
            aggregator: EmbeddingAggregator::default(),
            highlighter: Highlighter::default(),
        }
    }

    pub fn from_config(
        config: &ValidationConfig,
        embeddings: Arc<dyn EmbeddingTable>,
        classifier: Arc<dyn Classifier>,
    ) -> Self {
        let mut aggregator = EmbeddingAggregator::new(config.oov_policy);
        if let Some(seed) = config.random_seed {
            aggregator = aggregator.with_seed(seed);
        }
        Self::new(embeddings, classifier)
            .with_aggregator(aggregator)
            .with_highlighter(Highlighter::new(&config.highlight_color))
    }

    pub fn with_aggregator(mut self, aggregator: EmbeddingAggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    pub fn with_highlighter(mut self, highlighter: Highlighter) -> Self {
        self.highlighter = highlighter;
        self
    }

    /// Normalize, embed and classify one paragraph
    pub fn classify_paragraph(&self, index: usize, paragraph: &str) -> ParagraphVerdict {
        let tokens = self.normalizer.normalize(paragraph);
        let (features, stats) = self
            .aggregator
            .embed_with_stats(self.embeddings.as_ref(), &tokens);
        let label = self.classifier.predict(&features);

        debug!(
            index,
            tokens = stats.token_count,
            oov = stats.oov_count,
            label = ?label,
            "paragraph.classified"
        );

        ParagraphVerdict {
            index,
            text: paragraph.to_string(),
            label,
            token_count: stats.token_count,
            oov_count: stats.oov_count,
        }
    }

    /// Validate a document sequentially.
    pub fn validate(&self, document: &str) -> ValidationReport {
        let span = info_span!("validate", request_id = %Uuid::new_v4());
        let _enter = span.enter();
        let started = Instant::now();

        let verdicts: Vec<ParagraphVerdict> = segment_paragraphs(document)
            .iter()
            .enumerate()
            .map(|(i, p)| self.classify_paragraph(i, p))
            .collect();

        self.assemble(document, verdicts, started)
    }

    /// Validate a document classifying paragraphs on up to `workers` threads.
    /// Output is identical to [`Validator::validate`].
    pub fn validate_parallel(&self, document: &str, workers: usize) -> ValidationReport {
        let span = info_span!("validate", request_id = %Uuid::new_v4(), workers);
        let _enter = span.enter();
        let started = Instant::now();

        let paragraphs = segment_paragraphs(document);
        let workers = workers.max(1).min(paragraphs.len().max(1));
        let chunk_size = paragraphs.len().div_ceil(workers).max(1);

        let verdicts: Vec<ParagraphVerdict> = std::thread::scope(|scope| {
            let handles: Vec<_> = paragraphs
                .chunks(chunk_size)
                .enumerate()
                .map(|(chunk_idx, chunk)| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .enumerate()
                            .map(|(i, p)| self.classify_paragraph(chunk_idx * chunk_size + i, p))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            // join in spawn order to keep document order
            handles
                .into_iter()
                .flat_map(|h| match h.join() {
                    Ok(v) => v,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        });

        self.assemble(document, verdicts, started)
    }

    fn assemble(
        &self,
        document: &str,
        verdicts: Vec<ParagraphVerdict>,
        started: Instant,
    ) -> ValidationReport {
        let problems: Vec<String> = verdicts
            .iter()
            .filter(|v| v.label.is_problem())
            .map(|v| v.text.clone())
            .collect();

        // no problems: the document is returned untouched, without <br> rendering
        let rendered = if problems.is_empty() {
            document.to_string()
        } else {
            self.highlighter.highlight(document, &problems)
        };

        info!(
            paragraphs = verdicts.len(),
            problems = problems.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "validation.completed"
        );

        ValidationReport {
            rendered,
            problems,
            paragraphs: verdicts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Label;
    use crate::services::detection::embeddings::{OovPolicy, WordVectors};
    use crate::services::detection::highlight::DEFAULT_HIGHLIGHT_COLOR;

    const OPEN: &str = r#"<span style="background-color:#ff0000;">"#;

    /// Flags a paragraph when its first feature component is positive.
    struct FirstComponentClassifier;

    impl Classifier for FirstComponentClassifier {
        fn predict(&self, features: &[f32]) -> Label {
            if features[0] > 0.0 {
                Label::Problem
            } else {
                Label::Acceptable
            }
        }
    }

    struct ConstantClassifier(Label);

    impl Classifier for ConstantClassifier {
        fn predict(&self, _features: &[f32]) -> Label {
            self.0
        }
    }

    fn vector(first: f32) -> Vec<f32> {
        let mut v = vec![0.0; 300];
        v[0] = first;
        v
    }

    fn table() -> Arc<WordVectors> {
        Arc::new(
            WordVectors::from_pairs(
                300,
                vec![
                    ("collect", vector(1.0)),
                    ("track", vector(1.0)),
                    ("sell", vector(1.0)),
                    ("respect", vector(-1.0)),
                    ("privacy", vector(-1.0)),
                    ("never", vector(-1.0)),
                ],
            )
            .unwrap(),
        )
    }

    fn validator() -> Validator {
        Validator::new(table(), Arc::new(FirstComponentClassifier))
    }

    #[test]
    fn test_end_to_end_scenario() {
        let doc = "We collect your data.\n\nWe respect your privacy and never sell data.";
        let report = validator().validate(doc);

        assert_eq!(report.problems, vec!["We collect your data."]);
        assert_eq!(
            report.rendered,
            format!(
                "{}We collect your data.</span><br><br>We respect your privacy and never sell data.",
                OPEN
            )
        );
        assert_eq!(report.paragraphs.len(), 2);
        assert_eq!(report.paragraphs[1].label, Label::Acceptable);
    }

    #[test]
    fn test_no_problems_returns_document_unchanged() {
        let doc = "We respect your privacy.\n\nWe never sell anything.\r\n";
        let v = Validator::new(table(), Arc::new(ConstantClassifier(Label::Acceptable)));
        let report = v.validate(doc);
        assert!(report.problems.is_empty());
        assert_eq!(report.rendered, doc);
    }

    #[test]
    fn test_empty_document() {
        let report = validator().validate("   \n\n  ");
        assert!(report.problems.is_empty());
        assert!(report.paragraphs.is_empty());
        assert_eq!(report.rendered, "   \n\n  ");
    }

    #[test]
    fn test_stopword_only_paragraph_uses_zero_vector() {
        let v = Validator::new(table(), Arc::new(FirstComponentClassifier));
        let verdict = v.classify_paragraph(0, "It is what it is.");
        assert_eq!(verdict.token_count, 0);
        assert_eq!(verdict.label, Label::Acceptable);
    }

    #[test]
    fn test_wrapped_problem_is_highlighted_verbatim() {
        let doc = "Intro text here.\n\nWe  collect and\n   track your\tlocation.";
        let v = Validator::new(table(), Arc::new(FirstComponentClassifier));
        let report = v.validate(doc);
        assert_eq!(report.problems, vec!["We  collect and\n   track your\tlocation."]);
        assert!(report
            .rendered
            .contains(&format!("{}We  collect and<br>   track your\tlocation.</span>", OPEN)));
    }

    #[test]
    fn test_duplicate_problem_paragraphs_are_kept() {
        let doc = "We sell data.\n\nWe sell data.";
        let report = validator().validate(doc);
        assert_eq!(report.problems.len(), 2);
        assert_eq!(report.rendered.matches(OPEN).count(), 2);
    }

    #[test]
    fn test_oov_counts_reported() {
        let verdict = validator().classify_paragraph(3, "We collect biometric identifiers.");
        assert_eq!(verdict.index, 3);
        assert_eq!(verdict.token_count, 3);
        assert_eq!(verdict.oov_count, 2);
        assert_eq!(verdict.label, Label::Problem);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let doc = (0..17)
            .map(|i| {
                if i % 3 == 0 {
                    format!("Paragraph {} we collect and sell data.", i)
                } else {
                    format!("Paragraph {} we respect privacy.", i)
                }
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        let v = validator();
        let sequential = v.validate(&doc);
        for workers in [1, 2, 4, 64] {
            let parallel = v.validate_parallel(&doc, workers);
            assert_eq!(parallel.problems, sequential.problems);
            assert_eq!(parallel.rendered, sequential.rendered);
            let indices: Vec<usize> = parallel.paragraphs.iter().map(|p| p.index).collect();
            assert_eq!(indices, (0..17).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_from_config_uses_highlight_color() {
        let config = ValidationConfig {
            highlight_color: "#00ff00".to_string(),
            ..ValidationConfig::default()
        };
        assert_ne!(config.highlight_color, DEFAULT_HIGHLIGHT_COLOR);
        let v = Validator::from_config(&config, table(), Arc::new(ConstantClassifier(Label::Problem)));
        let report = v.validate("Anything at all.");
        assert_eq!(
            report.rendered,
            r#"<span style="background-color:#00ff00;">Anything at all.</span>"#
        );
    }

    #[test]
    fn test_from_config_applies_seeded_random_fill() {
        let doc = "Zorbleflux.";
        let zero = Validator::from_config(
            &ValidationConfig::default(),
            table(),
            Arc::new(FirstComponentClassifier),
        );
        let report = zero.validate(doc);
        assert!(!report.has_problems());
        assert_eq!(report.paragraphs[0].oov_count, 1);

        let config = ValidationConfig {
            oov_policy: OovPolicy::RandomFill,
            random_seed: Some(11),
            ..ValidationConfig::default()
        };
        let random = Validator::from_config(&config, table(), Arc::new(FirstComponentClassifier));
        let first = random.validate(doc);
        assert_eq!(first.problems, vec!["Zorbleflux."]);
        assert_eq!(first.paragraphs[0].label, Label::Problem);

        let again = Validator::from_config(&config, table(), Arc::new(FirstComponentClassifier));
        assert_eq!(again.validate(doc).rendered, first.rendered);
    }
}
