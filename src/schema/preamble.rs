//! Parsing of the `#FORMAT` / `#T_SP` / `#T_CH` / `#T_RL` header lines.

use serde::Serialize;

/// Kind of annotation layer, from the header prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LayerKind {
    /// `#T_SP=` span layer
    Span,
    /// `#T_CH=` chain layer
    Chain,
    /// `#T_RL=` relation layer
    Relation,
}

impl LayerKind {
    fn from_prefix(line: &str) -> Option<(Self, &str)> {
        if let Some(rest) = line.strip_prefix("#T_SP=") {
            Some((Self::Span, rest))
        } else if let Some(rest) = line.strip_prefix("#T_CH=") {
            Some((Self::Chain, rest))
        } else if let Some(rest) = line.strip_prefix("#T_RL=") {
            Some((Self::Relation, rest))
        } else {
            None
        }
    }
}

/// One declared annotation layer and its features.
///
/// Every feature occupies one data column, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerDecl {
    pub kind: LayerKind,
    /// Fully qualified layer name, e.g. `webanno.custom.CoreferenceLink`
    pub name: String,
    pub features: Vec<String>,
}

impl LayerDecl {
    /// Last dotted segment of the layer name.
    pub fn short_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// The metadata preamble of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Preamble {
    /// Value of the `#FORMAT=` line, if any
    pub format: Option<String>,
    pub layers: Vec<LayerDecl>,
}

/// Number of fixed columns before any layer feature: id, span, text.
pub const FIXED_COLUMNS: usize = 3;

impl Preamble {
    /// Parse a complete preamble from lines. Non-header lines are ignored.
    pub fn parse<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut preamble = Self::default();
        for line in lines {
            preamble.push_line(line);
        }
        preamble
    }

    /// Feed one line; returns true if it was a header line.
    pub fn push_line(&mut self, line: &str) -> bool {
        let line = line.trim_end();
        if let Some(format) = line.strip_prefix("#FORMAT=") {
            self.format = Some(format.trim().to_string());
            return true;
        }

        let (kind, body) = match LayerKind::from_prefix(line) {
            Some(found) => found,
            None => return false,
        };

        let mut parts = body.split('|');
        let name = parts.next().unwrap_or("").trim().to_string();
        let features = parts
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();

        self.layers.push(LayerDecl {
            kind,
            name,
            features,
        });
        true
    }

    /// Returns true when at least one layer was declared.
    pub fn has_layers(&self) -> bool {
        !self.layers.is_empty()
    }

    /// Column count implied by the declared layers.
    pub fn column_count(&self) -> usize {
        FIXED_COLUMNS + self.layers.iter().map(|l| l.features.len()).sum::<usize>()
    }

    /// Short names of the declared layers, in order.
    pub fn layer_names(&self) -> Vec<String> {
        self.layers.iter().map(|l| l.short_name().to_string()).collect()
    }
}

/// Returns true for header lines that belong to the preamble.
pub fn is_preamble_line(line: &str) -> bool {
    line.starts_with("#FORMAT=") || LayerKind::from_prefix(line).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_layers_and_features() {
        let preamble = Preamble::parse(vec![
            "#FORMAT=WebAnno TSV 3.3",
            "#T_SP=webanno.custom.GrammaticalRole|grammatical_role|thematic_role",
            "#T_CH=webanno.custom.CoreferenceLink|referenceRelation|referenceType",
            "#Text=Er kam .",
        ]);

        assert_eq!(preamble.format.as_deref(), Some("WebAnno TSV 3.3"));
        assert_eq!(preamble.layers.len(), 2);
        assert_eq!(preamble.layers[0].kind, LayerKind::Span);
        assert_eq!(preamble.layers[1].kind, LayerKind::Chain);
        assert_eq!(preamble.layers[1].short_name(), "CoreferenceLink");
        assert_eq!(preamble.column_count(), 7);
    }

    #[test]
    fn text_marker_is_not_preamble() {
        assert!(is_preamble_line("#T_RL=webanno.custom.Link|role|BT_webanno.custom.X"));
        assert!(!is_preamble_line("#Text=Sie sah ihn ."));
        assert!(!is_preamble_line("1-1\t0-3\tSie"));
    }

    #[test]
    fn empty_preamble_has_fixed_columns_only() {
        let preamble = Preamble::default();
        assert!(!preamble.has_layers());
        assert_eq!(preamble.column_count(), FIXED_COLUMNS);
    }
}
