// src/sentiment.rs
//
// Polarity scoring for review text (VADER lexicon and rules via
// `vader_sentiment`), plus the label counts and word frequencies printed by
// `analyze`.
use std::{
    collections::{HashMap, HashSet},
    fmt,
    sync::LazyLock,
};

use serde::Serialize;

use crate::config::consts::SENTIMENT_HEADER;
use crate::store::DataSet;

/// Label cut-offs on the compound score.
pub const POSITIVE_THRESHOLD: f64 = 0.5;
pub const NEGATIVE_THRESHOLD: f64 = -0.5;

static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "a", "about", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at",
        "be", "because", "been", "before", "being", "but", "by", "can", "could", "did",
        "do", "does", "doing", "for", "from", "get", "got", "had", "has", "have", "having",
        "he", "her", "here", "him", "his", "how", "i", "if", "in", "into", "is", "it",
        "its", "just", "me", "my", "of", "on", "one", "only", "or", "other", "our", "out",
        "over", "s", "she", "so", "some", "than", "that", "the", "their", "them", "then",
        "there", "these", "they", "this", "those", "to", "too", "t", "up", "us", "was",
        "we", "were", "what", "when", "which", "while", "who", "will", "with", "would",
        "you", "your", "ve", "ll", "re", "d", "m",
    ])
});

/// Proportions of positive/negative/neutral weight plus the normalized compound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Polarity {
    pub pos: f64,
    pub neg: f64,
    pub neu: f64,
    pub compound: f64,
}

impl Polarity {
    pub fn label(&self) -> Sentiment {
        label(self.compound)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn label(compound: f64) -> Sentiment {
    if compound > POSITIVE_THRESHOLD {
        Sentiment::Positive
    } else if compound < NEGATIVE_THRESHOLD {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentCounts {
    pub fn add(&mut self, s: Sentiment) {
        match s {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::Neutral => self.neutral += 1,
        }
    }

    pub fn get(&self, s: Sentiment) -> usize {
        match s {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    /// (label, count) in Positive, Negative, Neutral order.
    pub fn iter(&self) -> impl Iterator<Item = (Sentiment, usize)> + '_ {
        Sentiment::ALL.into_iter().map(|s| (s, self.get(s)))
    }
}

impl FromIterator<Sentiment> for SentimentCounts {
    fn from_iter<I: IntoIterator<Item = Sentiment>>(iter: I) -> Self {
        let mut counts = SentimentCounts::default();
        for s in iter {
            counts.add(s);
        }
        counts
    }
}

/// VADER scorer. Stateless; the lexicon is loaded once by `vader_sentiment`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn polarity(&self, text: &str) -> Polarity {
        if text.trim().is_empty() {
            return Polarity::default();
        }
        let analyzer = vader_sentiment::SentimentIntensityAnalyzer::new();
        let scores = analyzer.polarity_scores(text);
        let get = |key: &str| scores.get(key).copied().unwrap_or(0.0);
        Polarity {
            pos: get("pos"),
            neg: get("neg"),
            neu: get("neu"),
            compound: get("compound").clamp(-1.0, 1.0),
        }
    }

    pub fn label(&self, text: &str) -> Sentiment {
        self.polarity(text).label()
    }

    /// Label every row's `col` and append the labels as a `Sentiments` column.
    pub fn score_dataset(&self, ds: &mut DataSet, col: usize) -> SentimentCounts {
        let labels: Vec<Sentiment> = (0..ds.len()).map(|i| self.label(ds.cell(i, col))).collect();
        let counts = labels.iter().copied().collect();
        ds.append_column(SENTIMENT_HEADER, labels.iter().map(|s| s!(s.as_str())).collect());
        logd!("scored {} rows in column {col}", ds.len());
        counts
    }
}

/// `SentimentAnalyzer::score_dataset` with the default analyzer.
pub fn score_dataset(ds: &mut DataSet, col: usize) -> SentimentCounts {
    SentimentAnalyzer::new().score_dataset(ds, col)
}

/// Most frequent lowercased words across `texts`, stopwords removed.
/// Ties are broken alphabetically.
pub fn word_frequencies<'a, I>(texts: I, top_n: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for text in texts {
        for word in text.split(|c: char| !c.is_alphabetic()) {
            if word.is_empty() {
                continue;
            }
            let word = word.to_lowercase();
            if STOPWORDS.contains(word.as_str()) {
                continue;
            }
            *counts.entry(word).or_insert(0) += 1;
        }
    }
    let mut freq: Vec<(String, usize)> = counts.into_iter().collect();
    freq.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    freq.truncate(top_n);
    freq
}
