//! Closed pronoun sets that make a token a critical pronoun.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Which closed set a critical pronoun belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PronounKind {
    /// Third person personal (er, sie, es, ...)
    Personal,
    /// D-pronoun (der, die, das, ...)
    DPronoun,
    /// Demonstrative (dieser, jener, ...)
    Demonstrative,
}

impl PronounKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::DPronoun => "d_pronoun",
            Self::Demonstrative => "demonstrative",
        }
    }
}

impl std::fmt::Display for PronounKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

const PERSONAL: &[&str] = &[
    "er", "sie", "es", "ihn", "ihm", "ihr", "ihnen", "ihrer", "seiner",
];
const D_PRONOUNS: &[&str] = &["der", "die", "das", "den", "dem", "dessen", "deren", "denen"];
const DEMONSTRATIVES: &[&str] = &[
    "dieser", "diese", "dieses", "diesen", "diesem", "jener", "jene", "jenes", "jenen", "jenem",
];

fn word_set(words: &[&str]) -> BTreeSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Surface forms of the critical pronouns, matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PronounLexicon {
    pub personal: BTreeSet<String>,
    pub d_pronouns: BTreeSet<String>,
    pub demonstratives: BTreeSet<String>,
}

impl Default for PronounLexicon {
    fn default() -> Self {
        Self {
            personal: word_set(PERSONAL),
            d_pronouns: word_set(D_PRONOUNS),
            demonstratives: word_set(DEMONSTRATIVES),
        }
    }
}

impl PronounLexicon {
    /// A lexicon with no entries, to be filled with `with_word`.
    pub fn empty() -> Self {
        Self {
            personal: BTreeSet::new(),
            d_pronouns: BTreeSet::new(),
            demonstratives: BTreeSet::new(),
        }
    }

    pub fn with_word(mut self, kind: PronounKind, word: &str) -> Self {
        let word = word.to_lowercase();
        match kind {
            PronounKind::Personal => self.personal.insert(word),
            PronounKind::DPronoun => self.d_pronouns.insert(word),
            PronounKind::Demonstrative => self.demonstratives.insert(word),
        };
        self
    }

    pub fn classify(&self, text: &str) -> Option<PronounKind> {
        let text = text.trim().to_lowercase();
        if self.personal.contains(&text) {
            Some(PronounKind::Personal)
        } else if self.d_pronouns.contains(&text) {
            Some(PronounKind::DPronoun)
        } else if self.demonstratives.contains(&text) {
            Some(PronounKind::Demonstrative)
        } else {
            None
        }
    }

    pub fn is_critical(&self, text: &str) -> bool {
        self.classify(text).is_some()
    }
}
