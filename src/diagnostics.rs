//! Per-file diagnostics for recoverable problems.

use serde::Serialize;

use crate::schema::LayoutVariant;

/// A recoverable issue found while processing a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A token row was malformed and skipped.
    RowParse { line: usize, reason: String },
    /// A critical pronoun's chain had no earlier mention.
    UnresolvedAntecedent {
        sentence_id: String,
        pronoun: String,
        token: usize,
    },
    /// The file had no preamble; the column map was guessed from the column count.
    DegradedLayout {
        column_count: usize,
        variant: LayoutVariant,
    },
    /// Preamble and data rows classify differently; the preamble was used.
    LayoutDisagreement {
        data_columns: usize,
        preamble_columns: usize,
    },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::RowParse { line, reason } => {
                write!(f, "line {}: skipped row: {}", line, reason)
            }
            Diagnostic::UnresolvedAntecedent {
                sentence_id,
                pronoun,
                token,
            } => write!(
                f,
                "{}: no antecedent for {:?} (token {})",
                sentence_id, pronoun, token
            ),
            Diagnostic::DegradedLayout {
                column_count,
                variant,
            } => write!(
                f,
                "no preamble; {} columns treated as {} layout",
                column_count, variant
            ),
            Diagnostic::LayoutDisagreement {
                data_columns,
                preamble_columns,
            } => write!(
                f,
                "data rows have {} columns but preamble declares {}; using preamble",
                data_columns, preamble_columns
            ),
        }
    }
}

/// Counts by diagnostic kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticSummary {
    pub skipped_rows: usize,
    pub unresolved_antecedents: usize,
    pub degraded: bool,
    pub layout_disagreements: usize,
}

/// Accumulated diagnostics for one file (or one chapter set).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    pub source_name: String,
    pub entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn summary(&self) -> DiagnosticSummary {
        let mut summary = DiagnosticSummary::default();
        for entry in &self.entries {
            match entry {
                Diagnostic::RowParse { .. } => summary.skipped_rows += 1,
                Diagnostic::UnresolvedAntecedent { .. } => summary.unresolved_antecedents += 1,
                Diagnostic::DegradedLayout { .. } => summary.degraded = true,
                Diagnostic::LayoutDisagreement { .. } => summary.layout_disagreements += 1,
            }
        }
        summary
    }
}

impl std::fmt::Display for DiagnosticSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} skipped rows, {} unresolved antecedents",
            self.skipped_rows, self.unresolved_antecedents
        )?;
        if self.degraded {
            f.write_str(", degraded layout")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_by_kind() {
        let mut diagnostics = Diagnostics::new("a.tsv");
        diagnostics.push(Diagnostic::RowParse {
            line: 4,
            reason: "bad span".into(),
        });
        diagnostics.push(Diagnostic::RowParse {
            line: 9,
            reason: "bad id".into(),
        });
        diagnostics.push(Diagnostic::UnresolvedAntecedent {
            sentence_id: "sent_2".into(),
            pronoun: "er".into(),
            token: 3,
        });

        let summary = diagnostics.summary();
        assert_eq!(summary.skipped_rows, 2);
        assert_eq!(summary.unresolved_antecedents, 1);
        assert!(!summary.degraded);
        assert_eq!(
            summary.to_string(),
            "2 skipped rows, 1 unresolved antecedents"
        );
    }
}
