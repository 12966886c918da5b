//! Per-sentence clause-mate extraction.
//!
//! ```text
//! Sie  sah  den  alten  Mann  .
//! ╰─╯critical pronoun (animate#115)
//!           ╰──────────────╯clause mate (animate#213, dirObj)
//! ```

use clause_mates::{SentenceContext, Token};

use crate::lexicon::{PronounKind, PronounLexicon};
use crate::phrase::{segment_phrases, Phrase};
use crate::relationship::{
    AntecedentStatus, AntecedentSummary, ClauseMateInfo, ClauseMateRelationship, PronounInfo,
};

/// Turns sentences into clause-mate relationship rows.
#[derive(Debug, Clone, Default)]
pub struct RelationshipExtractor {
    lexicon: PronounLexicon,
}

impl RelationshipExtractor {
    pub fn new(lexicon: PronounLexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &PronounLexicon {
        &self.lexicon
    }

    /// Segment the sentence and extract its relationships.
    pub fn extract(&self, sentence: &SentenceContext) -> Vec<ClauseMateRelationship> {
        let phrases = segment_phrases(sentence);
        self.extract_with_phrases(sentence, &phrases)
    }

    /// Positions of the critical pronouns in a sentence.
    ///
    /// A lexicon match that sits inside a multi-token phrase is a determiner
    /// (`den alten Mann`), not a pronoun.
    pub fn critical_pronouns(
        &self,
        sentence: &SentenceContext,
        phrases: &[Phrase],
    ) -> Vec<(usize, PronounKind)> {
        sentence
            .tokens
            .iter()
            .enumerate()
            .filter_map(|(position, token)| {
                let kind = self.lexicon.classify(&token.text)?;
                if phrases.iter().any(|p| p.len() > 1 && p.contains(position)) {
                    log::trace!(
                        "{}: {:?} at {} is part of a longer phrase",
                        sentence.sentence_id,
                        token.text,
                        token.id
                    );
                    return None;
                }
                Some((position, kind))
            })
            .collect()
    }

    /// Extract relationships using already segmented phrases.
    pub fn extract_with_phrases(
        &self,
        sentence: &SentenceContext,
        phrases: &[Phrase],
    ) -> Vec<ClauseMateRelationship> {
        let mut rows = Vec::new();

        for (position, kind) in self.critical_pronouns(sentence, phrases) {
            let token = &sentence.tokens[position];
            let pronoun = pronoun_info(token, kind);
            let status = if token.has_pointer() {
                AntecedentStatus::Pending
            } else {
                AntecedentStatus::NoPointer
            };

            let mates: Vec<&Phrase> = phrases.iter().filter(|p| !p.contains(position)).collect();
            let row = |clause_mate: Option<ClauseMateInfo>| ClauseMateRelationship {
                sentence_id: sentence.sentence_id.clone(),
                sentence_num: sentence.sentence_num,
                global_sentence_num: sentence.global_sentence_num,
                pronoun: pronoun.clone(),
                clause_mate,
                num_clause_mates: mates.len(),
                antecedent: AntecedentSummary::with_status(status),
            };

            if mates.is_empty() {
                rows.push(row(None));
            } else {
                for phrase in &mates {
                    rows.push(row(Some(clause_mate_info(sentence, phrase))));
                }
            }
        }

        rows
    }
}

fn pronoun_info(token: &Token, kind: PronounKind) -> PronounInfo {
    PronounInfo {
        text: token.text.clone(),
        kind,
        token_index: token.index(),
        global_index: token.global_index,
        grammatical_role: token.grammatical_role().map(str::to_string),
        thematic_role: token.thematic_role().map(str::to_string),
        clause: token.clause(),
        chains: token.pointers.iter().map(|p| p.key()).collect(),
        primary_chain: token.primary_pointer().map(|p| p.key()),
    }
}

fn clause_mate_info(sentence: &SentenceContext, phrase: &Phrase) -> ClauseMateInfo {
    ClauseMateInfo {
        text: phrase.text.clone(),
        layer: phrase.layer,
        chain: phrase.chain,
        dp_type: phrase.dp_type.clone(),
        start: sentence.tokens[phrase.start].index(),
        end: sentence.tokens[phrase.end - 1].index(),
        grammatical_role: phrase.role.grammatical.clone(),
        thematic_role: phrase.role.thematic.clone(),
        clause: phrase.role.clause,
        animate: phrase.is_animate(),
    }
}
