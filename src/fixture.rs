//! Builders for small annotation documents in any known layout.
//!
//! ```
//! use clause_mates::fixture::{tok, DocumentBuilder};
//! use clause_mates::LayoutVariant;
//!
//! let tsv = DocumentBuilder::new(LayoutVariant::Standard)
//!     .sentence(vec![
//!         tok("Er").roles("SubjA[1]", "agent[1]").animate("*->127-1", "PersPron[127]"),
//!         tok("schläft").clause(1),
//!     ])
//!     .build();
//! assert!(tsv.contains("#Text=Er schläft"));
//! ```

use crate::schema::{ColumnRole, ColumnRules, LayoutDescriptor, LayoutVariant};
use crate::token::CorefLayer;

/// One token row to be rendered.
#[derive(Debug, Clone, Default)]
pub struct RowBuilder {
    text: String,
    roles: Option<(String, String)>,
    links: Vec<(CorefLayer, String, String)>,
    clause: Option<usize>,
    morphology: Vec<(String, String)>,
}

/// Start a token row.
pub fn tok(text: &str) -> RowBuilder {
    RowBuilder {
        text: text.to_string(),
        ..RowBuilder::default()
    }
}

impl RowBuilder {
    pub fn roles(mut self, grammatical: &str, thematic: &str) -> Self {
        self.roles = Some((grammatical.to_string(), thematic.to_string()));
        self
    }

    pub fn animate(mut self, link: &str, dp_type: &str) -> Self {
        self.links
            .push((CorefLayer::Animate, link.to_string(), dp_type.to_string()));
        self
    }

    pub fn inanimate(mut self, link: &str, dp_type: &str) -> Self {
        self.links
            .push((CorefLayer::Inanimate, link.to_string(), dp_type.to_string()));
        self
    }

    pub fn clause(mut self, clause: usize) -> Self {
        self.clause = Some(clause);
        self
    }

    pub fn morph(mut self, feature: &str, value: &str) -> Self {
        self.morphology.push((feature.to_string(), value.to_string()));
        self
    }
}

enum Line {
    Row(RowBuilder),
    Raw(String),
}

/// Renders a document in a chosen layout.
pub struct DocumentBuilder {
    variant: LayoutVariant,
    preamble: bool,
    sentences: Vec<Vec<Line>>,
}

impl DocumentBuilder {
    pub fn new(variant: LayoutVariant) -> Self {
        Self {
            variant,
            preamble: true,
            sentences: Vec::new(),
        }
    }

    /// Omit the header lines, leaving only sentences and rows.
    pub fn without_preamble(mut self) -> Self {
        self.preamble = false;
        self
    }

    pub fn sentence(mut self, rows: Vec<RowBuilder>) -> Self {
        self.sentences.push(rows.into_iter().map(Line::Row).collect());
        self
    }

    /// Append a literal line to the last sentence.
    pub fn raw(mut self, line: &str) -> Self {
        if self.sentences.is_empty() {
            self.sentences.push(Vec::new());
        }
        if let Some(last) = self.sentences.last_mut() {
            last.push(Line::Raw(line.to_string()));
        }
        self
    }

    pub fn build(&self) -> String {
        let width = self.variant.expected_columns();
        let layout = LayoutDescriptor::canonical(self.variant, width, &ColumnRules::default(), false);
        let map = &layout.column_map;

        let mut out = String::new();
        if self.preamble {
            out.push_str("#FORMAT=WebAnno TSV 3.3\n");
            for line in self.variant.canonical_header() {
                out.push_str(line);
                out.push('\n');
            }
        }

        let mut offset = 0;
        for (s, lines) in self.sentences.iter().enumerate() {
            let text = lines
                .iter()
                .filter_map(|line| match line {
                    Line::Row(row) => Some(row.text.as_str()),
                    Line::Raw(_) => None,
                })
                .collect::<Vec<_>>()
                .join(" ");
            out.push('\n');
            out.push_str("#Text=");
            out.push_str(&text);
            out.push('\n');

            let mut index = 0;
            for line in lines {
                let row = match line {
                    Line::Row(row) => row,
                    Line::Raw(raw) => {
                        out.push_str(raw);
                        out.push('\n');
                        continue;
                    }
                };
                index += 1;
                let end = offset + row.text.chars().count();

                let mut fields = vec!["_".to_string(); width];
                fields[0] = format!("{}-{}", s + 1, index);
                fields[1] = format!("{}-{}", offset, end);
                fields[2] = row.text.clone();
                offset = end + 1;

                let mut set = |role: ColumnRole, value: &str| {
                    if let Some(col) = map.column(role) {
                        fields[col] = value.to_string();
                    }
                };
                if let Some((gram, them)) = &row.roles {
                    set(ColumnRole::GrammaticalRole, gram);
                    set(ColumnRole::ThematicRole, them);
                }
                for (layer, link, dp_type) in &row.links {
                    set(ColumnRole::link(*layer), link);
                    set(ColumnRole::dp_type(*layer), dp_type);
                }
                if let Some(clause) = row.clause {
                    set(ColumnRole::Clause, &clause.to_string());
                }
                for (feature, value) in &row.morphology {
                    if let Some((_, col)) = map
                        .morphology_columns()
                        .iter()
                        .find(|(name, _)| name == feature)
                    {
                        fields[*col] = value.clone();
                    }
                }

                out.push_str(&fields.join("\t"));
                out.push('\n');
            }
        }
        out
    }
}
