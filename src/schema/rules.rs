//! Feature-name rules that assign meaning to columns.
//!
//! Rules are plain data so new annotation layers can be mapped from a config
//! file without touching the detector.

use serde::{Deserialize, Serialize};

use crate::token::CorefLayer;

/// Meaning of a data column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    GrammaticalRole,
    ThematicRole,
    AnimateLink,
    AnimateType,
    InanimateLink,
    InanimateType,
    Clause,
    Morphology,
}

impl ColumnRole {
    /// The pointer column role for a coreference layer.
    pub fn link(layer: CorefLayer) -> Self {
        match layer {
            CorefLayer::Animate => Self::AnimateLink,
            CorefLayer::Inanimate => Self::InanimateLink,
        }
    }

    /// The DP-type column role for a coreference layer.
    pub fn dp_type(layer: CorefLayer) -> Self {
        match layer {
            CorefLayer::Animate => Self::AnimateType,
            CorefLayer::Inanimate => Self::InanimateType,
        }
    }
}

/// Maps a `(layer, feature)` pair to a role by case-insensitive substring.
///
/// An empty pattern matches anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRule {
    #[serde(default)]
    pub layer: String,
    #[serde(default)]
    pub feature: String,
    pub role: ColumnRole,
}

impl ColumnRule {
    pub fn new(layer: &str, feature: &str, role: ColumnRole) -> Self {
        Self {
            layer: layer.to_lowercase(),
            feature: feature.to_lowercase(),
            role,
        }
    }

    fn matches(&self, layer: &str, feature: &str) -> bool {
        let layer_ok = self.layer.is_empty() || layer.contains(&self.layer.to_lowercase());
        let feature_ok = self.feature.is_empty() || feature.contains(&self.feature.to_lowercase());
        layer_ok && feature_ok
    }
}

/// Ordered rule list; the first matching rule wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnRules(pub Vec<ColumnRule>);

impl Default for ColumnRules {
    fn default() -> Self {
        use ColumnRole::*;
        // Inanimate before animate: "InanimateCoreferenceLink" also contains "coreference".
        Self(vec![
            ColumnRule::new("inanimate", "referencerelation", InanimateLink),
            ColumnRule::new("inanimate", "referencetype", InanimateType),
            ColumnRule::new("coref", "referencerelation", AnimateLink),
            ColumnRule::new("coref", "referencetype", AnimateType),
            ColumnRule::new("morph", "", Morphology),
            ColumnRule::new("", "gramm", GrammaticalRole),
            ColumnRule::new("", "them", ThematicRole),
            ColumnRule::new("", "clause", Clause),
        ])
    }
}

impl ColumnRules {
    pub fn role_for(&self, layer: &str, feature: &str) -> Option<ColumnRole> {
        let layer = layer.to_lowercase();
        let feature = feature.to_lowercase();
        self.0
            .iter()
            .find(|rule| rule.matches(&layer, &feature))
            .map(|rule| rule.role)
    }

    /// Prepend rules so they take precedence over the defaults.
    pub fn with_overrides(mut self, overrides: Vec<ColumnRule>) -> Self {
        let mut rules = overrides;
        rules.append(&mut self.0);
        Self(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_separate_coreference_layers() {
        let rules = ColumnRules::default();
        assert_eq!(
            rules.role_for("webanno.custom.CoreferenceLink", "referenceRelation"),
            Some(ColumnRole::AnimateLink)
        );
        assert_eq!(
            rules.role_for("webanno.custom.InanimateCoreferenceLink", "referenceType"),
            Some(ColumnRole::InanimateType)
        );
        assert_eq!(
            rules.role_for("webanno.custom.GrammaticalRole", "thematic_role"),
            Some(ColumnRole::ThematicRole)
        );
        assert_eq!(
            rules.role_for("webanno.custom.Morphology", "case"),
            Some(ColumnRole::Morphology)
        );
        assert_eq!(rules.role_for("webanno.custom.Givenness", "givenness"), None);
    }

    #[test]
    fn overrides_take_precedence() {
        let rules = ColumnRules::default().with_overrides(vec![ColumnRule::new(
            "givenness",
            "",
            ColumnRole::Clause,
        )]);
        assert_eq!(
            rules.role_for("webanno.custom.Givenness", "givenness"),
            Some(ColumnRole::Clause)
        );
    }
}
