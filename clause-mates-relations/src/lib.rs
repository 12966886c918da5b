#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/clause-mates/main/assets/clause-mates.svg",
    issue_tracker_base_url = "https://github.com/storyscript/clause-mates/issues/"
)]

mod extractor;
mod lexicon;
mod phrase;
mod relationship;

pub use extractor::RelationshipExtractor;
pub use lexicon::{PronounKind, PronounLexicon};
pub use phrase::{segment_phrases, Phrase};
pub use relationship::{
    AntecedentStatus, AntecedentSummary, ClauseMateInfo, ClauseMateRelationship, PronounInfo,
};
