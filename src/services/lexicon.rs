// Linguistic Resources
// English stopword set and a rule-based noun lemmatizer (WordNet morphy style)

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

// Irregular plurals resolved before any suffix rule.
const NOUN_EXCEPTIONS: &[(&str, &str)] = &[
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("indices", "index"),
    ("appendices", "appendix"),
    ("analyses", "analysis"),
    ("crises", "crisis"),
    ("bases", "basis"),
    ("theses", "thesis"),
    ("gases", "gas"),
    ("lives", "life"),
    ("wives", "wife"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("halves", "half"),
    ("selves", "self"),
    ("caches", "cache"),
    ("niches", "niche"),
];

// Words ending in "s" that are already base forms.
const INVARIANT_NOUNS: &[&str] = &[
    "news", "series", "species", "means", "always", "perhaps", "sometimes", "towards",
    "afterwards", "onwards", "backwards", "forwards", "upwards", "downwards", "besides",
    "unless", "whereas", "overseas", "politics", "ethics", "economics", "physics",
    "mathematics", "analytics", "lens", "canvas", "alias", "atlas", "bias", "thanks",
];

fn stopword_set() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| ENGLISH_STOPWORDS.iter().copied().collect())
}

pub fn is_stopword(token: &str) -> bool {
    stopword_set().contains(token)
}

pub fn stopword_count() -> usize {
    stopword_set().len()
}

/// Noun lemmatizer: exception table, then the first matching suffix rule.
///
/// A lemma that would land in the stopword set is rejected and the surface
/// form kept, so lemmatizing twice gives the same result as lemmatizing once.
#[derive(Debug)]
pub struct Lemmatizer {
    exceptions: HashMap<&'static str, &'static str>,
    invariant: HashSet<&'static str>,
}

impl Lemmatizer {
    pub fn new() -> Self {
        Self {
            exceptions: NOUN_EXCEPTIONS.iter().copied().collect(),
            invariant: INVARIANT_NOUNS.iter().copied().collect(),
        }
    }

    /// Shared instance, built on first use
    pub fn shared() -> &'static Lemmatizer {
        static LEMMATIZER: OnceLock<Lemmatizer> = OnceLock::new();
        LEMMATIZER.get_or_init(Lemmatizer::new)
    }

    pub fn lemmatize(&self, word: &str) -> String {
        let lemma = self.noun_base(word);
        if lemma != word && is_stopword(&lemma) {
            return word.to_string();
        }
        lemma
    }

    fn noun_base(&self, word: &str) -> String {
        if let Some(base) = self.exceptions.get(word) {
            return (*base).to_string();
        }
        if self.invariant.contains(word) || word.chars().count() <= 3 || !word.ends_with('s') {
            return word.to_string();
        }
        if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
            return word.to_string();
        }

        if let Some(stem) = word.strip_suffix("ies") {
            if word.chars().count() > 4 {
                return format!("{}y", stem);
            }
            return word.trim_end_matches('s').to_string();
        }
        if let Some(stem) = word.strip_suffix("es") {
            // boxes, watches, wishes, addresses, statuses
            if stem.ends_with('x')
                || stem.ends_with("ch")
                || stem.ends_with("sh")
                || stem.ends_with("ss")
                || stem.ends_with("us")
            {
                return stem.to_string();
            }
        }

        word[..word.len() - 1].to_string()
    }
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopword_list() {
        assert_eq!(stopword_count(), 179);
        assert!(is_stopword("the"));
        assert!(is_stopword("don"));
        assert!(!is_stopword("privacy"));
    }

    #[test]
    fn test_regular_plurals() {
        let lem = Lemmatizer::new();
        assert_eq!(lem.lemmatize("policies"), "policy");
        assert_eq!(lem.lemmatize("users"), "user");
        assert_eq!(lem.lemmatize("purposes"), "purpose");
        assert_eq!(lem.lemmatize("addresses"), "address");
        assert_eq!(lem.lemmatize("boxes"), "box");
        assert_eq!(lem.lemmatize("watches"), "watch");
        assert_eq!(lem.lemmatize("ties"), "tie");
    }

    #[test]
    fn test_guards_and_exceptions() {
        let lem = Lemmatizer::new();
        assert_eq!(lem.lemmatize("process"), "process");
        assert_eq!(lem.lemmatize("status"), "status");
        assert_eq!(lem.lemmatize("analysis"), "analysis");
        assert_eq!(lem.lemmatize("news"), "news");
        assert_eq!(lem.lemmatize("children"), "child");
        assert_eq!(lem.lemmatize("data"), "data");
        assert_eq!(lem.lemmatize("gas"), "gas");
    }

    #[test]
    fn test_lemma_never_becomes_stopword() {
        let lem = Lemmatizer::new();
        assert_eq!(lem.lemmatize("others"), "others");
    }

    #[test]
    fn test_lemmatize_is_idempotent() {
        let lem = Lemmatizer::new();
        for word in [
            "policies", "addresses", "cookies", "statuses", "lenses", "sizes", "children",
            "analyses", "classes", "others", "businesses", "services",
        ] {
            let once = lem.lemmatize(word);
            assert_eq!(lem.lemmatize(&once), once, "word: {}", word);
        }
    }
}
