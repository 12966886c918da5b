use serde::Serialize;

use clause_mates::{ChainId, ChainKey, CorefLayer};

use crate::lexicon::PronounKind;

/// The critical pronoun side of a relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PronounInfo {
    pub text: String,
    pub kind: PronounKind,
    /// In-sentence token ordinal as written in the file
    pub token_index: usize,
    pub global_index: usize,
    pub grammatical_role: Option<String>,
    pub thematic_role: Option<String>,
    pub clause: Option<usize>,
    /// Every chain the pronoun's own pointers belong to
    pub chains: Vec<ChainKey>,
    /// The chain used for antecedent lookup
    pub primary_chain: Option<ChainKey>,
}

/// The clause-mate side of a relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClauseMateInfo {
    pub text: String,
    pub layer: CorefLayer,
    pub chain: ChainId,
    pub dp_type: Option<String>,
    /// Ordinal of the first token as written in the file
    pub start: usize,
    /// Ordinal of the last token as written in the file
    pub end: usize,
    pub grammatical_role: Option<String>,
    pub thematic_role: Option<String>,
    pub clause: Option<usize>,
    pub animate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AntecedentStatus {
    /// Not yet looked up
    Pending,
    Resolved,
    /// The pronoun's chain had no earlier mention
    Unresolved,
    /// The pronoun carries no coreference pointer
    NoPointer,
}

impl AntecedentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Resolved => "resolved",
            Self::Unresolved => "unresolved",
            Self::NoPointer => "no_pointer",
        }
    }
}

/// Most-recent and first antecedent of a pronoun's chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AntecedentSummary {
    pub most_recent_text: Option<String>,
    pub most_recent_distance: Option<usize>,
    pub most_recent_sentence: Option<usize>,
    pub first_text: Option<String>,
    pub first_distance: Option<usize>,
    pub first_sentence: Option<usize>,
    /// Mentions in the most recent antecedent's sentence that precede the pronoun
    pub choice_count: Option<usize>,
    pub status: AntecedentStatus,
}

impl AntecedentSummary {
    pub fn with_status(status: AntecedentStatus) -> Self {
        Self {
            most_recent_text: None,
            most_recent_distance: None,
            most_recent_sentence: None,
            first_text: None,
            first_distance: None,
            first_sentence: None,
            choice_count: None,
            status,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.status == AntecedentStatus::Resolved
    }
}

/// One pronoun / clause-mate pairing.
///
/// A pronoun without clause mates yields a single record with
/// `clause_mate: None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClauseMateRelationship {
    pub sentence_id: String,
    pub sentence_num: usize,
    pub global_sentence_num: usize,
    pub pronoun: PronounInfo,
    pub clause_mate: Option<ClauseMateInfo>,
    /// Clause-mate rows emitted for this pronoun
    pub num_clause_mates: usize,
    pub antecedent: AntecedentSummary,
}

impl ClauseMateRelationship {
    pub fn has_clause_mate(&self) -> bool {
        self.clause_mate.is_some()
    }
}
