//! Grouping of coreference-annotated tokens into phrases.
//!
//! ```text
//! Sie  sah  den  alten  Mann  .
//! ╰─╯animate#115
//!           ╰──────────────╯animate#213
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use clause_mates::{ChainId, ChainKey, CorefLayer, RoleSlot, SentenceContext};

/// Contiguous tokens annotated as one mention of one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Phrase {
    pub layer: CorefLayer,
    pub chain: ChainId,
    pub link: Option<u32>,
    pub dp_type: Option<String>,
    /// First token position in the sentence
    pub start: usize,
    /// One past the last token position
    pub end: usize,
    pub text: String,
    pub global_start: usize,
    pub global_end: usize,
    /// First role found on the phrase's tokens
    pub role: RoleSlot,
}

impl Phrase {
    pub fn key(&self) -> ChainKey {
        ChainKey::new(self.layer, self.chain)
    }

    pub fn contains(&self, position: usize) -> bool {
        self.start <= position && position < self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_animate(&self) -> bool {
        self.layer.is_animate()
    }
}

struct OpenPhrase {
    link: Option<u32>,
    clause: Option<usize>,
    dp_type: Option<String>,
    start: usize,
    end: usize,
}

fn close(sentence: &SentenceContext, key: ChainKey, open: OpenPhrase) -> Phrase {
    let tokens = &sentence.tokens[open.start..open.end];
    let role = tokens
        .iter()
        .filter_map(|t| t.primary_role())
        .find(|r| r.grammatical.is_some() || r.thematic.is_some())
        .or_else(|| tokens.iter().filter_map(|t| t.primary_role()).next())
        .cloned()
        .unwrap_or_default();
    Phrase {
        layer: key.layer,
        chain: key.chain,
        link: open.link,
        dp_type: open.dp_type,
        start: open.start,
        end: open.end,
        text: sentence.span_text(open.start, open.end),
        global_start: tokens[0].global_index,
        global_end: tokens[tokens.len() - 1].global_index + 1,
        role,
    }
}

/// Segment a sentence's coreference annotations into phrases.
///
/// Tokens join one phrase while they are adjacent and agree on layer, chain,
/// link index and first clause index. A token with both an animate and an
/// inanimate pointer belongs to two phrases. Phrases are returned ordered by
/// start position, then layer, then chain.
pub fn segment_phrases(sentence: &SentenceContext) -> Vec<Phrase> {
    let mut open: BTreeMap<ChainKey, OpenPhrase> = BTreeMap::new();
    let mut phrases = Vec::new();

    for (position, token) in sentence.tokens.iter().enumerate() {
        let clause = token.clause();

        // Close phrases this token does not continue.
        let stale: Vec<ChainKey> = open
            .iter()
            .filter(|(key, phrase)| {
                !token.pointers.iter().any(|p| {
                    p.key() == **key && p.link == phrase.link && clause == phrase.clause
                })
            })
            .map(|(key, _)| *key)
            .collect();
        for key in stale {
            if let Some(finished) = open.remove(&key) {
                phrases.push(close(sentence, key, finished));
            }
        }

        for pointer in &token.pointers {
            match open.get_mut(&pointer.key()) {
                Some(phrase) => {
                    phrase.end = position + 1;
                    if phrase.dp_type.is_none() {
                        phrase.dp_type = pointer.dp_type.clone();
                    }
                }
                None => {
                    open.insert(
                        pointer.key(),
                        OpenPhrase {
                            link: pointer.link,
                            clause,
                            dp_type: pointer.dp_type.clone(),
                            start: position,
                            end: position + 1,
                        },
                    );
                }
            }
        }
    }

    for (key, finished) in open {
        phrases.push(close(sentence, key, finished));
    }

    phrases.sort_by(|a, b| (a.start, a.layer, a.chain).cmp(&(b.start, b.layer, b.chain)));
    phrases
}
