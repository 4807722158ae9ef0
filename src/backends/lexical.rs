//! Local lexical sentiment backend.
//!
//! Scores text in-process from a word lexicon, with no network access.
//! Each lexicon word carries a polarity in `[-1, 1]` and a subjectivity in
//! `[0, 1]`. A text's polarity and subjectivity are the means over the
//! sentiment words it contains, after applying modifiers:
//!
//! - an intensifier ("very", "really", ...) scales the word right after it
//! - a negation ("not", "never", "don't", ...) flips and halves the polarity
//!   of the word right after it
//!
//! A modifier followed by another modifier stacks ("not very good"). Any
//! other word, or clause punctuation, cancels it.
//!
//! The backend reports polarity as `score` and subjectivity as `magnitude`.
//!
//! A supplementary lexicon file (JSON) can extend or override the built-in
//! table:
//!
//! ```json
//! {
//!   "words": { "sick": { "polarity": 0.6, "subjectivity": 0.8 } },
//!   "intensifiers": { "hella": 1.5 },
//!   "negations": ["aint"]
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use super::traits::SentimentBackend;
use crate::types::{RawScore, Thresholds};
use crate::{Result, SentimeterError};

/// Multiplier applied to a negated word's polarity.
const NEGATION_FACTOR: f64 = -0.5;

/// Punctuation that ends a clause; modifiers never carry across it.
const CLAUSE_BOUNDARIES: &[char] = &[',', '.', '!', '?', ';', ':'];

/// Polarity and subjectivity of a single lexicon word.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LexiconEntry {
    pub polarity: f64,
    pub subjectivity: f64,
}

/// Output of lexical analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LexicalSentiment {
    /// Mean polarity, clamped to `[-1, 1]`.
    pub polarity: f64,
    /// Mean subjectivity, clamped to `[0, 1]`.
    pub subjectivity: f64,
    /// Number of sentiment-bearing words found.
    pub matched_words: usize,
}

/// Word lexicon with negations and intensifiers.
#[derive(Debug, Clone)]
pub struct Lexicon {
    words: HashMap<String, LexiconEntry>,
    negations: HashSet<String>,
    intensifiers: HashMap<String, f64>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Lexicon {
    /// The built-in general-purpose lexicon.
    pub fn builtin() -> Self {
        let words = BUILTIN_WORDS
            .iter()
            .map(|&(word, polarity, subjectivity)| {
                (
                    word.to_string(),
                    LexiconEntry {
                        polarity,
                        subjectivity,
                    },
                )
            })
            .collect();

        let negations = BUILTIN_NEGATIONS.iter().map(|w| w.to_string()).collect();

        let intensifiers = BUILTIN_INTENSIFIERS
            .iter()
            .map(|&(word, mult)| (word.to_string(), mult))
            .collect();

        Self {
            words,
            negations,
            intensifiers,
        }
    }

    /// Built-in lexicon extended with the entries of a JSON lexicon file.
    ///
    /// File entries override built-in ones with the same word.
    pub fn builtin_with_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SentimeterError::Lexicon(format!("Failed to read lexicon file {path:?}: {e}"))
        })?;
        let file: LexiconFile = serde_json::from_str(&content).map_err(|e| {
            SentimeterError::Lexicon(format!("Failed to parse lexicon file {path:?}: {e}"))
        })?;

        let mut lexicon = Self::builtin();
        lexicon.merge(file)?;
        Ok(lexicon)
    }

    fn merge(&mut self, file: LexiconFile) -> Result<()> {
        for (word, entry) in file.words {
            if !(-1.0..=1.0).contains(&entry.polarity) || !(0.0..=1.0).contains(&entry.subjectivity)
            {
                return Err(SentimeterError::Lexicon(format!(
                    "entry '{word}' out of range (polarity {}, subjectivity {})",
                    entry.polarity, entry.subjectivity
                )));
            }
            self.words.insert(word.to_lowercase(), entry);
        }
        for (word, mult) in file.intensifiers {
            self.intensifiers.insert(word.to_lowercase(), mult);
        }
        for word in file.negations {
            self.negations.insert(word.to_lowercase());
        }
        Ok(())
    }

    /// Look up a (lowercase) word.
    pub fn entry(&self, word: &str) -> Option<&LexiconEntry> {
        self.words.get(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Compute polarity and subjectivity for a text.
    pub fn analyze(&self, text: &str) -> LexicalSentiment {
        let mut polarities = Vec::new();
        let mut subjectivities = Vec::new();

        for clause in text.split(CLAUSE_BOUNDARIES) {
            let mut negate_next = false;
            let mut intensifier = 1.0;

            for token in tokenize(clause) {
                if self.negations.contains(&token) {
                    negate_next = true;
                    continue;
                }

                if let Some(&mult) = self.intensifiers.get(&token) {
                    intensifier = mult;
                    continue;
                }

                if let Some(entry) = self.words.get(&token) {
                    let mut polarity = entry.polarity * intensifier;
                    if negate_next {
                        polarity *= NEGATION_FACTOR;
                    }
                    polarities.push(polarity.clamp(-1.0, 1.0));
                    subjectivities.push((entry.subjectivity * intensifier).clamp(0.0, 1.0));
                }

                // Modifiers reach only the word right after them.
                negate_next = false;
                intensifier = 1.0;
            }
        }

        LexicalSentiment {
            polarity: mean(&polarities).clamp(-1.0, 1.0),
            subjectivity: mean(&subjectivities).clamp(0.0, 1.0),
            matched_words: polarities.len(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct LexiconFile {
    #[serde(default)]
    words: HashMap<String, LexiconEntry>,
    #[serde(default)]
    intensifiers: HashMap<String, f64>,
    #[serde(default)]
    negations: Vec<String>,
}

/// Lowercase word tokens; apostrophes stay inside words ("don't").
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '’'))
        .map(|t| {
            t.trim_matches(|c: char| c == '\'' || c == '’')
                .to_lowercase()
                .replace('’', "'")
        })
        .filter(|t| !t.is_empty())
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Local lexical sentiment backend.
#[derive(Debug, Clone, Default)]
pub struct LexicalBackend {
    lexicon: Lexicon,
}

impl LexicalBackend {
    /// Backend over the built-in lexicon.
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend over the built-in lexicon plus an optional lexicon file.
    pub fn from_lexicon_path(path: Option<&Path>) -> Result<Self> {
        let lexicon = match path {
            Some(path) => Lexicon::builtin_with_file(path)?,
            None => Lexicon::builtin(),
        };
        Ok(Self { lexicon })
    }

    pub fn with_lexicon(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }
}

#[async_trait]
impl SentimentBackend for LexicalBackend {
    fn name(&self) -> &str {
        "lexical"
    }

    fn thresholds(&self) -> Thresholds {
        Thresholds::LEXICAL
    }

    async fn score(&self, text: &str) -> Result<RawScore> {
        if text.trim().is_empty() {
            return Err(SentimeterError::InvalidInput("empty text".to_string()));
        }
        let sentiment = self.lexicon.analyze(text);
        Ok(RawScore {
            score: sentiment.polarity,
            magnitude: sentiment.subjectivity,
        })
    }
}

// ============================================================================
// Built-in lexicon
// ============================================================================

/// (word, polarity, subjectivity)
const BUILTIN_WORDS: &[(&str, f64, f64)] = &[
    // positive
    ("love", 0.5, 0.6),
    ("loved", 0.7, 0.8),
    ("loving", 0.6, 0.95),
    ("lovely", 0.5, 0.75),
    ("like", 0.3, 0.4),
    ("liked", 0.4, 0.5),
    ("great", 0.8, 0.75),
    ("good", 0.7, 0.6),
    ("nice", 0.6, 1.0),
    ("awesome", 1.0, 1.0),
    ("amazing", 0.6, 0.9),
    ("excellent", 1.0, 1.0),
    ("fantastic", 0.4, 0.9),
    ("wonderful", 1.0, 1.0),
    ("brilliant", 0.9, 1.0),
    ("perfect", 1.0, 1.0),
    ("best", 1.0, 0.3),
    ("better", 0.5, 0.5),
    ("beautiful", 0.85, 1.0),
    ("happy", 0.8, 1.0),
    ("glad", 0.5, 1.0),
    ("thanks", 0.2, 0.2),
    ("thank", 0.2, 0.2),
    ("helpful", 0.6, 0.5),
    ("useful", 0.3, 0.1),
    ("informative", 0.5, 0.5),
    ("interesting", 0.5, 0.5),
    ("important", 0.4, 1.0),
    ("clear", 0.1, 0.4),
    ("cool", 0.35, 0.65),
    ("fun", 0.3, 0.2),
    ("funny", 0.25, 1.0),
    ("enjoy", 0.4, 0.5),
    ("enjoyed", 0.5, 0.6),
    ("safe", 0.5, 0.5),
    ("secure", 0.4, 0.6),
    ("well", 0.2, 0.3),
    ("agree", 0.3, 0.4),
    ("recommend", 0.4, 0.4),
    ("impressive", 1.0, 1.0),
    ("incredible", 0.9, 0.9),
    ("smart", 0.21, 0.64),
    ("correct", 0.3, 0.4),
    ("right", 0.29, 0.54),
    ("valuable", 0.5, 0.5),
    // negative
    ("hate", -0.8, 0.9),
    ("hated", -0.9, 0.7),
    ("bad", -0.7, 0.67),
    ("terrible", -1.0, 1.0),
    ("horrible", -1.0, 1.0),
    ("awful", -1.0, 1.0),
    ("worst", -1.0, 1.0),
    ("worse", -0.4, 0.6),
    ("poor", -0.4, 0.6),
    ("boring", -1.0, 1.0),
    ("stupid", -0.8, 1.0),
    ("dumb", -0.38, 0.5),
    ("wrong", -0.5, 0.9),
    ("sad", -0.5, 1.0),
    ("angry", -0.5, 1.0),
    ("annoying", -0.8, 0.9),
    ("disgusting", -1.0, 1.0),
    ("pathetic", -1.0, 1.0),
    ("useless", -0.5, 0.2),
    ("scary", -0.5, 1.0),
    ("creepy", -0.6, 0.8),
    ("dangerous", -0.6, 0.9),
    ("unsafe", -0.5, 0.5),
    ("fake", -0.5, 1.0),
    ("misleading", -0.6, 0.8),
    ("ridiculous", -0.33, 1.0),
    ("disappointing", -0.6, 0.7),
    ("disappointed", -0.75, 0.75),
    ("invasive", -0.5, 0.8),
    ("evil", -1.0, 1.0),
    ("sick", -0.71, 0.86),
    ("problem", -0.3, 0.4),
    ("scam", -0.9, 0.9),
    ("fraud", -0.9, 0.9),
    ("ugly", -0.7, 1.0),
    ("lame", -0.5, 0.75),
    ("unfortunately", -0.5, 1.0),
];

const BUILTIN_NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "nobody", "nothing", "none", "cannot", "can't",
    "cant", "don't", "dont", "doesn't", "doesnt", "didn't", "didnt", "won't", "wont",
    "wouldn't", "wouldnt", "shouldn't", "shouldnt", "couldn't", "couldnt", "isn't", "isnt",
    "aren't", "arent", "wasn't", "wasnt", "weren't", "werent", "hardly", "barely",
];

const BUILTIN_INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("so", 1.3),
    ("super", 1.4),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("absolutely", 1.5),
    ("totally", 1.4),
    ("highly", 1.4),
    ("pretty", 1.1),
    ("quite", 1.1),
    ("somewhat", 0.7),
    ("slightly", 0.5),
    ("kinda", 0.7),
];
