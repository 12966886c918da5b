#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/clause-mates/main/assets/clause-mates.svg",
    issue_tracker_base_url = "https://github.com/storyscript/clause-mates/issues/"
)]
//! Antecedent resolution over clause-mate relationships, for single files
//! and for chapters spread across several files.
//!
//! ```no_run
//! use clause_mates_chains::{AnalyzerConfig, Pipeline};
//!
//! # fn main() -> Result<(), clause_mates::ClauseMateError> {
//! let pipeline = Pipeline::new(AnalyzerConfig::default());
//! let report = pipeline.analyze_chapters(&["ch1.tsv".into(), "ch2.tsv".into()])?;
//! for row in &report.relationships {
//!     println!("{} {:?}", row.pronoun.text, row.antecedent.most_recent_text);
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod history;
mod inputs;
mod pipeline;
mod resolver;
mod unifier;

pub use config::{AnalyzerConfig, UnifierConfig};
pub use history::{Chain, ChainHistory, ChainState, Mention};
pub use inputs::collect_inputs;
pub use pipeline::{AnalysisReport, FileFailure, FileLayout, FileOutcome, Pipeline, RecordSink};
pub use resolver::AntecedentResolver;
pub use unifier::{chapter_offsets, ChainSummary, CrossFileUnifier, UnificationPlan};

#[cfg(test)]
mod tests {
    mod chapters;
    mod resolution;
}
