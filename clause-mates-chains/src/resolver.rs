//! Backward-only antecedent lookup over the mention history.

use std::collections::BTreeMap;

use clause_mates::{ChainKey, Diagnostic, Diagnostics, SentenceContext};
use clause_mates_relations::{
    AntecedentStatus, AntecedentSummary, ClauseMateRelationship, Phrase,
};

use crate::history::{ChainHistory, Mention};

/// Owns the mention history of one run and answers antecedent queries.
///
/// Sentences must be observed in document order; a relationship is resolved
/// after its own sentence has been observed, so earlier mentions in the same
/// sentence count as antecedents.
#[derive(Debug, Clone, Default)]
pub struct AntecedentResolver {
    history: ChainHistory,
    /// File-local chain to run-wide chain, set per chapter
    chain_map: BTreeMap<ChainKey, ChainKey>,
}

impl AntecedentResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &ChainHistory {
        &self.history
    }

    /// Install the chain mapping for the next file. Unmapped chains keep
    /// their own key.
    pub fn set_chain_map(&mut self, chain_map: BTreeMap<ChainKey, ChainKey>) {
        self.chain_map = chain_map;
    }

    pub fn global_key(&self, key: ChainKey) -> ChainKey {
        self.chain_map.get(&key).copied().unwrap_or(key)
    }

    /// Record every phrase of a sentence as a mention of its chain.
    pub fn observe(&mut self, sentence: &SentenceContext, phrases: &[Phrase]) {
        for phrase in phrases {
            let key = self.global_key(phrase.key());
            self.history.append(
                key,
                Mention {
                    global_index: phrase.global_start,
                    sentence: sentence.global_sentence_num,
                    text: phrase.text.clone(),
                    dp_type: phrase.dp_type.clone(),
                },
            );
        }
    }

    /// Fill in a relationship's antecedent summary.
    pub fn resolve(&self, relationship: &mut ClauseMateRelationship, diagnostics: &mut Diagnostics) {
        let key = match relationship.pronoun.primary_chain {
            Some(key) => self.global_key(key),
            None => {
                relationship.antecedent = AntecedentSummary::with_status(AntecedentStatus::NoPointer);
                return;
            }
        };
        let index = relationship.pronoun.global_index;
        let chain = self.history.chain(key);

        let (recent, first) = match chain.and_then(|c| Some((c.last_before(index)?, c.first_before(index)?))) {
            Some(found) => found,
            None => {
                log::debug!(
                    "{}: no antecedent for {:?} ({}) at {}",
                    relationship.sentence_id,
                    relationship.pronoun.text,
                    key,
                    index
                );
                relationship.antecedent = AntecedentSummary::with_status(AntecedentStatus::Unresolved);
                diagnostics.push(Diagnostic::UnresolvedAntecedent {
                    sentence_id: relationship.sentence_id.clone(),
                    pronoun: relationship.pronoun.text.clone(),
                    token: relationship.pronoun.token_index,
                });
                return;
            }
        };

        let choice_count = self
            .history
            .mentions_in_sentence(recent.sentence)
            .iter()
            .filter(|i| **i < index)
            .count();

        relationship.antecedent = AntecedentSummary {
            most_recent_text: Some(recent.text.clone()),
            most_recent_distance: Some(index - recent.global_index),
            most_recent_sentence: Some(recent.sentence),
            first_text: Some(first.text.clone()),
            first_distance: Some(index - first.global_index),
            first_sentence: Some(first.sentence),
            choice_count: Some(choice_count),
            status: AntecedentStatus::Resolved,
        };
    }
}
