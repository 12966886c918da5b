#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/clause-mates/main/assets/clause-mates.svg",
    issue_tracker_base_url = "https://github.com/storyscript/clause-mates/issues/"
)]
//! Schema-adaptive reading of WebAnno-style coreference annotation files.
//!
//! A file is opened with [`CorpusReader`], which detects its column layout,
//! and then streamed sentence by sentence:
//!
//! ```no_run
//! use clause_mates::{CorpusReader, SchemaConfig, TokenOffsets};
//!
//! # fn main() -> Result<(), clause_mates::ClauseMateError> {
//! let reader = CorpusReader::open("chapter1.tsv".as_ref(), &SchemaConfig::default())?;
//! println!("layout: {}", reader.layout().variant);
//! let mut sentences = reader.sentences(TokenOffsets::default());
//! for sentence in &mut sentences {
//!     println!("{}: {} tokens", sentence.sentence_id, sentence.len());
//! }
//! let diagnostics = sentences.finish()?;
//! println!("{}", diagnostics.summary());
//! # Ok(())
//! # }
//! ```

mod diagnostics;
mod display;
mod errors;
pub mod fixture;
pub mod parser;
pub mod schema;
mod sentence;
mod token;

pub use diagnostics::{Diagnostic, DiagnosticSummary, Diagnostics};
pub use display::SentenceDisplay;
pub use errors::{ClauseMateError, ClauseMateResult};
pub use parser::{CorpusReader, SentenceReader};
pub use schema::{
    detect_layout, ColumnMap, ColumnRole, ColumnRule, LayoutDescriptor, LayoutVariant, Preamble,
    SchemaConfig,
};
pub use sentence::{SentenceContext, TokenOffsets};
pub use token::{ChainId, ChainKey, CharSpan, CorefLayer, CorefPointer, RoleSlot, Token, TokenId};
