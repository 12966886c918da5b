//! Analyzer configuration, loaded from TOML.
//!
//! ```toml
//! [schema]
//! adaptive = true
//!
//! [[schema.rules]]
//! layer = "segment"
//! feature = "satz"
//! role = "clause"
//!
//! [pronouns]
//! personal = ["er", "sie", "es"]
//!
//! [unifier]
//! min_similarity = 0.25
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use clause_mates::{ClauseMateError, ClauseMateResult, SchemaConfig};
use clause_mates_relations::PronounLexicon;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnifierConfig {
    /// Content-word Jaccard similarity needed to merge equal chain ids
    pub min_similarity: f64,
}

impl Default for UnifierConfig {
    fn default() -> Self {
        Self {
            min_similarity: 0.1,
        }
    }
}

/// Everything a [`crate::Pipeline`] can be configured with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub schema: SchemaConfig,
    pub pronouns: PronounLexicon,
    pub unifier: UnifierConfig,
}

impl AnalyzerConfig {
    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> ClauseMateResult<Self> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ClauseMateError::io(path, e))?;
        Self::from_toml(&content).map_err(|e| ClauseMateError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn with_adaptive(mut self, adaptive: bool) -> Self {
        self.schema.adaptive = adaptive;
        self
    }

    pub fn with_pronouns(mut self, pronouns: PronounLexicon) -> Self {
        self.pronouns = pronouns;
        self
    }

    pub fn with_min_similarity(mut self, min_similarity: f64) -> Self {
        self.unifier.min_similarity = min_similarity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clause_mates::ColumnRole;
    use std::io::Write;

    #[test]
    fn partial_files_keep_defaults() {
        let config = AnalyzerConfig::from_toml(
            r#"
            [unifier]
            min_similarity = 0.5

            [pronouns]
            personal = ["er"]
            "#,
        )
        .unwrap();
        assert_eq!(config.unifier.min_similarity, 0.5);
        assert!(config.schema.adaptive);
        assert!(config.pronouns.personal.contains("er"));
        assert!(!config.pronouns.personal.contains("sie"));
        assert!(config.pronouns.demonstratives.contains("dieser"));
    }

    #[test]
    fn column_rules_from_toml() {
        let config = AnalyzerConfig::from_toml(
            r#"
            [schema]
            adaptive = false

            [[schema.rules]]
            layer = "segment"
            feature = "satz"
            role = "clause"
            "#,
        )
        .unwrap();
        assert!(!config.schema.adaptive);
        assert_eq!(config.schema.rules[0].role, ColumnRole::Clause);
        assert_eq!(
            config.schema.column_rules().role_for("webanno.custom.Segment", "satz_id"),
            Some(ColumnRole::Clause)
        );
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert_eq!(AnalyzerConfig::load(&missing).unwrap(), AnalyzerConfig::default());

        let broken = dir.path().join("broken.toml");
        std::fs::File::create(&broken)
            .unwrap()
            .write_all(b"[unifier]\nmin_similarity = \"high\"\n")
            .unwrap();
        let err = AnalyzerConfig::load(&broken).unwrap_err();
        assert!(matches!(err, ClauseMateError::Config { .. }));
    }
}
