//! Known column layouts and layout classification.

use serde::{Deserialize, Serialize};

use super::column_map::ColumnMap;
use super::preamble::Preamble;
use super::rules::ColumnRules;

const NAMED_ENTITY: &str =
    "#T_SP=de.tudarmstadt.ukp.dkpro.core.api.ner.type.NamedEntity|identifier|value";
const GRAMMATICAL_ROLE: &str =
    "#T_SP=webanno.custom.GrammaticalRole|grammatical_role|thematic_role";
const REFERENTIALITY: &str = "#T_SP=webanno.custom.Referentiality|entity|referentiality";
const COREFERENCE: &str =
    "#T_CH=webanno.custom.CoreferenceLink|referenceRelation|referenceType";
const INANIMATE_COREFERENCE: &str =
    "#T_CH=webanno.custom.InanimateCoreferenceLink|referenceRelation|referenceType";
const SEGMENT: &str = "#T_SP=webanno.custom.Segment|clause_id";
const GIVENNESS: &str = "#T_SP=webanno.custom.Givenness|givenness";
const MORPHOLOGY: &str = "#T_SP=webanno.custom.Morphology|case|gender|number|person|tense|mood|voice|aspect|degree|definiteness|pronType|possessive|reflex|verbForm|polarity|animacy|numType|foreign|abbr|typo|style|lemma";

/// The documented column-layout variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutVariant {
    /// 12 columns, no grammatical-role layer
    Incomplete,
    /// 14 columns
    Legacy,
    /// 15 columns
    Standard,
    /// 37 columns, with morphology features
    Extended,
}

impl LayoutVariant {
    pub const ALL: [LayoutVariant; 4] = [
        LayoutVariant::Incomplete,
        LayoutVariant::Legacy,
        LayoutVariant::Standard,
        LayoutVariant::Extended,
    ];

    /// Column count of the canonical layout.
    pub fn expected_columns(&self) -> usize {
        match self {
            Self::Incomplete => 12,
            Self::Legacy => 14,
            Self::Standard => 15,
            Self::Extended => 37,
        }
    }

    /// Accepted column counts, including extra boundary columns.
    fn tolerance(&self) -> std::ops::RangeInclusive<usize> {
        match self {
            Self::Incomplete => 11..=12,
            Self::Legacy => 13..=14,
            Self::Standard => 15..=17,
            Self::Extended => 30..=40,
        }
    }

    /// Classify a raw column count; `None` when no variant matches.
    pub fn classify(column_count: usize) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.tolerance().contains(&column_count))
    }

    /// Header lines describing this layout's columns.
    pub fn canonical_header(&self) -> Vec<&'static str> {
        let mut lines = vec![NAMED_ENTITY];
        if *self != Self::Incomplete {
            lines.push(GRAMMATICAL_ROLE);
        }
        lines.extend_from_slice(&[REFERENTIALITY, COREFERENCE, INANIMATE_COREFERENCE, SEGMENT]);
        if matches!(self, Self::Standard | Self::Extended) {
            lines.push(GIVENNESS);
        }
        if *self == Self::Extended {
            lines.push(MORPHOLOGY);
        }
        lines
    }

    pub fn canonical_preamble(&self) -> Preamble {
        Preamble::parse(self.canonical_header())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Incomplete => "incomplete",
            Self::Legacy => "legacy",
            Self::Standard => "standard",
            Self::Extended => "extended",
        }
    }
}

impl std::fmt::Display for LayoutVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything the parser needs to know about one file's columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutDescriptor {
    pub variant: LayoutVariant,
    /// Column count of the data rows
    pub column_count: usize,
    pub column_map: ColumnMap,
    pub has_morphology: bool,
    /// Short names of the layers the column map was built from
    pub detected_layers: Vec<String>,
    /// True when the column map was guessed without a preamble
    pub degraded: bool,
}

impl LayoutDescriptor {
    /// Descriptor built from a variant's canonical header.
    pub fn canonical(
        variant: LayoutVariant,
        column_count: usize,
        rules: &ColumnRules,
        degraded: bool,
    ) -> Self {
        let preamble = variant.canonical_preamble();
        Self::from_preamble(variant, column_count, &preamble, rules, degraded)
    }

    pub fn from_preamble(
        variant: LayoutVariant,
        column_count: usize,
        preamble: &Preamble,
        rules: &ColumnRules,
        degraded: bool,
    ) -> Self {
        let column_map = ColumnMap::from_preamble(preamble, rules);
        Self {
            variant,
            column_count,
            has_morphology: column_map.has_morphology(),
            column_map,
            detected_layers: preamble.layer_names(),
            degraded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnRole;

    #[test]
    fn canonical_headers_match_expected_widths() {
        for variant in LayoutVariant::ALL.iter() {
            assert_eq!(
                variant.canonical_preamble().column_count(),
                variant.expected_columns(),
                "{}",
                variant
            );
        }
    }

    #[test]
    fn classification_by_count() {
        assert_eq!(LayoutVariant::classify(12), Some(LayoutVariant::Incomplete));
        assert_eq!(LayoutVariant::classify(14), Some(LayoutVariant::Legacy));
        assert_eq!(LayoutVariant::classify(15), Some(LayoutVariant::Standard));
        assert_eq!(LayoutVariant::classify(37), Some(LayoutVariant::Extended));
        assert_eq!(LayoutVariant::classify(9), None);
        assert_eq!(LayoutVariant::classify(22), None);
    }

    #[test]
    fn incomplete_layout_has_no_roles() {
        let descriptor = LayoutDescriptor::canonical(
            LayoutVariant::Incomplete,
            12,
            &ColumnRules::default(),
            true,
        );
        assert!(!descriptor.column_map.has_role(ColumnRole::GrammaticalRole));
        assert_eq!(descriptor.column_map.column(ColumnRole::AnimateLink), Some(7));
        assert_eq!(descriptor.column_map.column(ColumnRole::InanimateType), Some(10));
        assert_eq!(descriptor.column_map.column(ColumnRole::Clause), Some(11));
    }
}
