// Word Embeddings
// Pretrained embedding table, word2vec loaders and the averaging aggregator

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::Path;
use tracing::info;

use super::ModelError;

/// Largest vector width accepted from an artifact header.
const MAX_DIMENSION: usize = 1 << 16;
/// Floats preallocated up front; larger tables grow while reading.
const MAX_PREALLOCATED: usize = 1 << 24;

/// Read-only token -> vector capability.
pub trait EmbeddingTable: Send + Sync {
    fn dimension(&self) -> usize;

    fn lookup(&self, token: &str) -> Option<&[f32]>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// On-disk layout of a word2vec artifact
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingFormat {
    #[default]
    Binary,
    Text,
}

/// In-memory embedding table: one flat buffer indexed by word.
#[derive(Debug, Clone)]
pub struct WordVectors {
    dim: usize,
    word2idx: HashMap<String, usize>,
    vectors: Vec<f32>,
}

impl WordVectors {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            word2idx: HashMap::new(),
            vectors: Vec::new(),
        }
    }

    /// Build a table from (word, vector) pairs
    pub fn from_pairs<I, S>(dim: usize, pairs: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        let mut table = Self::new(dim);
        for (word, vector) in pairs {
            table.insert(word, &vector)?;
        }
        Ok(table)
    }

    /// Insert a vector. The first vector stored for a word wins.
    pub fn insert(&mut self, word: impl Into<String>, vector: &[f32]) -> Result<(), ModelError> {
        if vector.len() != self.dim {
            return Err(ModelError::DimensionMismatch {
                expected: self.dim,
                found: vector.len(),
            });
        }
        let word = word.into();
        if self.word2idx.contains_key(&word) {
            return Ok(());
        }
        self.word2idx.insert(word, self.word2idx.len());
        self.vectors.extend_from_slice(vector);
        Ok(())
    }

    /// Load a word2vec artifact from disk
    pub fn load(
        path: &Path,
        format: EmbeddingFormat,
        limit: Option<usize>,
        expected_dim: usize,
    ) -> Result<Self, ModelError> {
        let reader = BufReader::new(File::open(path)?);
        let table = match format {
            EmbeddingFormat::Binary => Self::read_binary(reader, limit)?,
            EmbeddingFormat::Text => Self::read_text(reader, limit)?,
        };

        if table.dim != expected_dim {
            return Err(ModelError::DimensionMismatch {
                expected: expected_dim,
                found: table.dim,
            });
        }

        info!(
            path = %path.display(),
            vocab = table.len(),
            dim = table.dim,
            "embeddings.loaded"
        );
        Ok(table)
    }

    /// Parse the binary word2vec layout: `"<vocab> <dim>\n"` followed by
    /// `word<space>` and `dim` little-endian f32 per entry.
    pub fn read_binary<R: BufRead>(mut reader: R, limit: Option<usize>) -> Result<Self, ModelError> {
        let (vocab_size, dim) = read_header(&mut reader)?;
        let count = limit.map_or(vocab_size, |l| l.min(vocab_size));

        let total = count.checked_mul(dim).ok_or_else(|| {
            ModelError::InvalidHeader(format!("{} vectors of dimension {} overflow", count, dim))
        })?;

        let mut table = Self::new(dim);
        table.vectors.reserve(total.min(MAX_PREALLOCATED));
        let mut raw = vec![0u8; dim * std::mem::size_of::<f32>()];
        let mut vector = vec![0f32; dim];

        for index in 0..count {
            let word = read_binary_word(&mut reader, index)?;
            reader.read_exact(&mut raw).map_err(|e| truncated(e, index))?;
            for (slot, bytes) in vector.iter_mut().zip(raw.chunks_exact(4)) {
                *slot = f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
            }
            table.insert(word, &vector)?;
        }

        Ok(table)
    }

    /// Parse the text word2vec layout: header line, then `word v1 .. vdim` per line.
    pub fn read_text<R: BufRead>(mut reader: R, limit: Option<usize>) -> Result<Self, ModelError> {
        let (vocab_size, dim) = read_header(&mut reader)?;
        let count = limit.map_or(vocab_size, |l| l.min(vocab_size));

        let mut table = Self::new(dim);
        let mut vector = Vec::with_capacity(dim);

        for (index, line) in reader.lines().take(count).enumerate() {
            let line = line?;
            let mut parts = line.split_whitespace();
            let word = parts.next().ok_or_else(|| ModelError::InvalidEntry {
                index,
                message: "empty line".to_string(),
            })?;

            vector.clear();
            for part in parts {
                let value: f32 = part.parse().map_err(|_| ModelError::InvalidEntry {
                    index,
                    message: format!("invalid component '{}'", part),
                })?;
                vector.push(value);
            }
            table.insert(word, &vector)?;
        }

        Ok(table)
    }
}

impl EmbeddingTable for WordVectors {
    fn dimension(&self) -> usize {
        self.dim
    }

    fn lookup(&self, token: &str) -> Option<&[f32]> {
        let idx = *self.word2idx.get(token)?;
        self.vectors.get(idx * self.dim..(idx + 1) * self.dim)
    }

    fn len(&self) -> usize {
        self.word2idx.len()
    }
}

fn read_header<R: BufRead>(reader: &mut R) -> Result<(usize, usize), ModelError> {
    let mut header = String::new();
    reader.read_line(&mut header)?;
    let parts: Vec<&str> = header.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(ModelError::InvalidHeader(header.trim().to_string()));
    }
    let vocab_size = parts[0]
        .parse()
        .map_err(|_| ModelError::InvalidHeader(format!("invalid vocab size '{}'", parts[0])))?;
    let dim: usize = parts[1]
        .parse()
        .map_err(|_| ModelError::InvalidHeader(format!("invalid dimension '{}'", parts[1])))?;
    if dim == 0 || dim > MAX_DIMENSION {
        return Err(ModelError::InvalidHeader(format!(
            "dimension {} outside 1..={}",
            dim, MAX_DIMENSION
        )));
    }
    Ok((vocab_size, dim))
}

fn read_binary_word<R: Read>(reader: &mut R, index: usize) -> Result<String, ModelError> {
    let mut bytes = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        reader.read_exact(&mut byte).map_err(|e| truncated(e, index))?;
        match byte[0] {
            b' ' => break,
            // entries may be separated by a newline after the vector
            b'\n' if bytes.is_empty() => continue,
            b => bytes.push(b),
        }
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn truncated(err: std::io::Error, index: usize) -> ModelError {
    if err.kind() == ErrorKind::UnexpectedEof {
        ModelError::InvalidEntry {
            index,
            message: "unexpected end of file".to_string(),
        }
    } else {
        ModelError::Io(err)
    }
}

/// How out-of-vocabulary tokens contribute to the average.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OovPolicy {
    /// Substitute the zero vector (serving default)
    #[default]
    ZeroFill,
    /// Substitute a vector of uniform [0, 1) components
    RandomFill,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureStats {
    pub token_count: usize,
    pub oov_count: usize,
}

/// Averages per-token vectors into one feature vector.
///
/// The divisor is the total token count, so OOV tokens dilute the average
/// toward zero instead of being excluded.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddingAggregator {
    policy: OovPolicy,
    seed: Option<u64>,
}

impl EmbeddingAggregator {
    pub fn new(policy: OovPolicy) -> Self {
        Self { policy, seed: None }
    }

    /// Seed the random fill so every call substitutes the same vectors.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn policy(&self) -> OovPolicy {
        self.policy
    }

    pub fn embed(&self, table: &dyn EmbeddingTable, tokens: &[String]) -> Vec<f32> {
        self.embed_with_stats(table, tokens).0
    }

    pub fn embed_with_stats(
        &self,
        table: &dyn EmbeddingTable,
        tokens: &[String],
    ) -> (Vec<f32>, FeatureStats) {
        let dim = table.dimension();
        let mut stats = FeatureStats {
            token_count: tokens.len(),
            oov_count: 0,
        };
        if tokens.is_empty() {
            return (vec![0.0; dim], stats);
        }

        let mut sums = vec![0f64; dim];
        let mut rng: Option<StdRng> = None;

        for token in tokens {
            match table.lookup(token) {
                Some(vector) => {
                    for (sum, value) in sums.iter_mut().zip(vector) {
                        *sum += f64::from(*value);
                    }
                }
                None => {
                    stats.oov_count += 1;
                    if self.policy == OovPolicy::RandomFill {
                        let rng = rng.get_or_insert_with(|| match self.seed {
                            Some(seed) => StdRng::seed_from_u64(seed),
                            None => StdRng::from_entropy(),
                        });
                        for sum in sums.iter_mut() {
                            *sum += f64::from(rng.gen::<f32>());
                        }
                    }
                }
            }
        }

        let n = tokens.len() as f64;
        let averaged = sums.into_iter().map(|s| (s / n) as f32).collect();
        (averaged, stats)
    }
}
