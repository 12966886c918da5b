//! Adaptive schema detection.
//!
//! A file's preamble declares its annotation layers; each declared feature is
//! one data column. The detector turns the preamble (or, without one, the raw
//! column count) into a [`LayoutDescriptor`] holding the file's [`ColumnMap`].
//!
//! ```text
//! #T_SP=webanno.custom.GrammaticalRole|grammatical_role|thematic_role
//! #T_CH=webanno.custom.CoreferenceLink|referenceRelation|referenceType
//!        ╰──────────────┬──────────────╯╰───────────────┬──────────────╯
//!                     layer                   features → columns 5, 6
//! ```

mod column_map;
mod layout;
mod preamble;
mod rules;

pub use column_map::{is_absent, ColumnMap};
pub use layout::{LayoutDescriptor, LayoutVariant};
pub use preamble::{is_preamble_line, LayerDecl, LayerKind, Preamble, FIXED_COLUMNS};
pub use rules::{ColumnRole, ColumnRule, ColumnRules};

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::errors::{ClauseMateError, ClauseMateResult};

/// Settings for schema detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// When false, every file is read with the standard layout.
    pub adaptive: bool,
    /// Extra column rules, tried before the built-in ones.
    pub rules: Vec<ColumnRule>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            adaptive: true,
            rules: Vec::new(),
        }
    }
}

impl SchemaConfig {
    pub fn with_adaptive(mut self, adaptive: bool) -> Self {
        self.adaptive = adaptive;
        self
    }

    pub fn with_rule(mut self, rule: ColumnRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Built-in rules with the configured overrides in front.
    pub fn column_rules(&self) -> ColumnRules {
        ColumnRules::default().with_overrides(self.rules.clone())
    }
}

/// Where the first data row was found, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirstRow {
    pub line: usize,
    pub column_count: usize,
}

/// Classify a file into a layout and build its column map.
///
/// The preamble is authoritative: when it declares a morphology layer the
/// layout is `Extended`, and when preamble and data rows classify to
/// different variants the preamble's variant is used. Without a preamble the
/// variant comes from the column count alone and the result is marked
/// degraded.
pub fn detect_layout(
    source_name: &str,
    preamble: &Preamble,
    first_row: Option<FirstRow>,
    config: &SchemaConfig,
    diagnostics: &mut Diagnostics,
) -> ClauseMateResult<LayoutDescriptor> {
    let rules = config.column_rules();
    let preamble_columns = preamble.column_count();
    let (line, data_columns) = match first_row {
        Some(row) => (row.line, row.column_count),
        // A file without token rows is judged by its declared width.
        None => (0, preamble_columns),
    };

    if !config.adaptive {
        log::debug!("{}: adaptive detection disabled, using standard layout", source_name);
        return Ok(LayoutDescriptor::canonical(
            LayoutVariant::Standard,
            data_columns,
            &rules,
            false,
        ));
    }

    let classification_error = || ClauseMateError::SchemaClassification {
        source_name: source_name.to_string(),
        line,
        column_count: data_columns,
    };

    if preamble.has_layers() {
        let descriptor =
            LayoutDescriptor::from_preamble(LayoutVariant::Standard, data_columns, preamble, &rules, false);

        let variant = if descriptor.has_morphology {
            LayoutVariant::Extended
        } else {
            let by_data = LayoutVariant::classify(data_columns);
            let by_preamble = LayoutVariant::classify(preamble_columns);
            if by_data != by_preamble {
                log::debug!(
                    "{}: data rows have {} columns, preamble declares {}; preamble wins",
                    source_name,
                    data_columns,
                    preamble_columns
                );
                diagnostics.push(Diagnostic::LayoutDisagreement {
                    data_columns,
                    preamble_columns,
                });
            }
            by_preamble.or(by_data).ok_or_else(classification_error)?
        };

        log::debug!(
            "{}: {} layout from preamble ({} layers)",
            source_name,
            variant,
            preamble.layers.len()
        );
        return Ok(LayoutDescriptor {
            variant,
            ..descriptor
        });
    }

    let variant = LayoutVariant::classify(data_columns).ok_or_else(classification_error)?;
    log::warn!(
        "{}: no preamble, treating {} columns as {} layout",
        source_name,
        data_columns,
        variant
    );
    diagnostics.push(Diagnostic::DegradedLayout {
        column_count: data_columns,
        variant,
    });
    Ok(LayoutDescriptor::canonical(variant, data_columns, &rules, true))
}
