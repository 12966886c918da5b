//! Runtime column-to-meaning map, built once per file.

use std::collections::BTreeMap;

use serde::Serialize;

use super::preamble::{Preamble, FIXED_COLUMNS};
use super::rules::{ColumnRole, ColumnRules};

/// Values that mark an empty annotation cell.
const ABSENT_MARKERS: &[&str] = &["", "_", "*"];

/// Returns true if a cell holds no annotation.
pub fn is_absent(cell: &str) -> bool {
    ABSENT_MARKERS.contains(&cell.trim())
}

/// Immutable map from column roles to column indices.
///
/// Access is always guarded: a role missing from the map, a column beyond the
/// row's length, and an absent-marker cell all read as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnMap {
    roles: BTreeMap<ColumnRole, usize>,
    /// Morphology feature name and column, in declaration order
    morphology: Vec<(String, usize)>,
    /// Every declared column: (index, layer short name, feature)
    columns: Vec<(usize, String, String)>,
    width: usize,
}

impl ColumnMap {
    pub fn from_preamble(preamble: &Preamble, rules: &ColumnRules) -> Self {
        let mut map = Self {
            width: FIXED_COLUMNS,
            ..Self::default()
        };

        let mut column = FIXED_COLUMNS;
        for layer in &preamble.layers {
            for feature in &layer.features {
                match rules.role_for(&layer.name, feature) {
                    Some(ColumnRole::Morphology) => {
                        map.morphology.push((feature.clone(), column));
                    }
                    Some(role) => {
                        // First declaration wins for single-column roles.
                        map.roles.entry(role).or_insert(column);
                    }
                    None => {}
                }
                map.columns
                    .push((column, layer.short_name().to_string(), feature.clone()));
                column += 1;
            }
        }
        map.width = column;
        map
    }

    /// Number of columns the map describes.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn column(&self, role: ColumnRole) -> Option<usize> {
        self.roles.get(&role).copied()
    }

    pub fn has_role(&self, role: ColumnRole) -> bool {
        self.roles.contains_key(&role)
    }

    pub fn has_morphology(&self) -> bool {
        !self.morphology.is_empty()
    }

    pub fn morphology_columns(&self) -> &[(String, usize)] {
        &self.morphology
    }

    /// Guarded cell lookup for a role.
    pub fn cell<'a>(&self, fields: &[&'a str], role: ColumnRole) -> Option<&'a str> {
        let index = self.column(role)?;
        let value = fields.get(index)?;
        if is_absent(value) {
            None
        } else {
            Some(value.trim())
        }
    }

    /// Morphology features present on a row, as `(feature, value)`.
    pub fn morphology<'a>(&'a self, fields: &[&'a str]) -> Vec<(&'a str, &'a str)> {
        self.morphology
            .iter()
            .filter_map(|(name, index)| {
                let value = fields.get(*index)?;
                if is_absent(value) {
                    None
                } else {
                    Some((name.as_str(), value.trim()))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard_preamble() -> Preamble {
        Preamble::parse(vec![
            "#T_SP=webanno.custom.GrammaticalRole|grammatical_role|thematic_role",
            "#T_CH=webanno.custom.CoreferenceLink|referenceRelation|referenceType",
            "#T_CH=webanno.custom.InanimateCoreferenceLink|referenceRelation|referenceType",
        ])
    }

    #[test]
    fn maps_columns_in_declaration_order() {
        let map = ColumnMap::from_preamble(&standard_preamble(), &ColumnRules::default());
        assert_eq!(map.width(), 9);
        assert_eq!(map.column(ColumnRole::GrammaticalRole), Some(3));
        assert_eq!(map.column(ColumnRole::ThematicRole), Some(4));
        assert_eq!(map.column(ColumnRole::AnimateLink), Some(5));
        assert_eq!(map.column(ColumnRole::AnimateType), Some(6));
        assert_eq!(map.column(ColumnRole::InanimateLink), Some(7));
        assert_eq!(map.column(ColumnRole::InanimateType), Some(8));
        assert_eq!(map.column(ColumnRole::Clause), None);
    }

    #[test]
    fn cell_access_is_guarded() {
        let map = ColumnMap::from_preamble(&standard_preamble(), &ColumnRules::default());
        let short_row = vec!["1-1", "0-2", "er", "SubjA[1]", "_"];
        assert_eq!(map.cell(&short_row, ColumnRole::GrammaticalRole), Some("SubjA[1]"));
        assert_eq!(map.cell(&short_row, ColumnRole::ThematicRole), None);
        assert_eq!(map.cell(&short_row, ColumnRole::AnimateLink), None);
        assert_eq!(map.cell(&short_row, ColumnRole::Clause), None);
    }
}
