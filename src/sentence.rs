//! Sentence-level data model.

use serde::Serialize;

use crate::token::Token;

/// One sentence worth of tokens, opened by a `#Text=` marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentenceContext {
    /// File-local identifier, e.g. `sent_34`
    pub sentence_id: String,
    /// File-local sentence number (1-based)
    pub sentence_num: usize,
    /// Sentence number across all chapters of a run (1-based)
    pub global_sentence_num: usize,
    /// Literal sentence text from the marker line
    pub text: String,
    /// Tokens in file order
    pub tokens: Vec<Token>,
}

impl SentenceContext {
    pub fn new(sentence_num: usize, global_sentence_num: usize, text: impl Into<String>) -> Self {
        Self {
            sentence_id: format!("sent_{}", sentence_num),
            sentence_num,
            global_sentence_num,
            text: text.into(),
            tokens: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Surface text of tokens `start..end` (positions in `tokens`), space-joined.
    pub fn span_text(&self, start: usize, end: usize) -> String {
        self.tokens[start.min(self.tokens.len())..end.min(self.tokens.len())]
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Shifts applied to sentence and token numbering when a file is read as a
/// later chapter of a multi-file run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenOffsets {
    /// Sentences in all earlier chapters
    pub sentence: usize,
    /// Tokens in all earlier chapters
    pub token: usize,
}

impl TokenOffsets {
    pub fn new(sentence: usize, token: usize) -> Self {
        Self { sentence, token }
    }
}
