//! Token-level data model.

use serde::{Deserialize, Serialize};

/// Numeric coreference chain identifier as written in the annotation.
pub type ChainId = u32;

/// Sentence-local token identifier, written `s-t` in the data rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenId {
    /// Sentence number as written in the file (1-based)
    pub sentence: usize,
    /// Token ordinal within the sentence (1-based)
    pub index: usize,
}

impl TokenId {
    pub fn new(sentence: usize, index: usize) -> Self {
        Self { sentence, index }
    }

    /// Parse `s-t`. Sub-token ids such as `3-4.1` are rejected.
    pub fn parse(input: &str) -> Option<Self> {
        let (sentence, index) = input.split_once('-')?;
        Some(Self {
            sentence: sentence.trim().parse().ok()?,
            index: index.trim().parse().ok()?,
        })
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.sentence, self.index)
    }
}

/// Character offsets `begin-end` of a token in the document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharSpan {
    pub start: usize,
    pub end: usize,
}

impl CharSpan {
    pub fn parse(input: &str) -> Option<Self> {
        let (start, end) = input.split_once('-')?;
        let start: usize = start.trim().parse().ok()?;
        let end: usize = end.trim().parse().ok()?;
        if end < start {
            return None;
        }
        Some(Self { start, end })
    }
}

/// The coreference layer a pointer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorefLayer {
    Animate,
    Inanimate,
}

impl CorefLayer {
    pub const ALL: [CorefLayer; 2] = [CorefLayer::Animate, CorefLayer::Inanimate];

    /// Label used in output records.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Animate => "animate",
            Self::Inanimate => "inanimate",
        }
    }

    /// Animacy derived from the layer.
    pub fn is_animate(&self) -> bool {
        matches!(self, Self::Animate)
    }
}

impl std::fmt::Display for CorefLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One `(grammatical role, thematic role, clause index)` triple.
///
/// Role cells are pipe-delimited and index-aligned, so the n-th grammatical
/// label pairs with the n-th thematic label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSlot {
    pub grammatical: Option<String>,
    pub thematic: Option<String>,
    pub clause: Option<usize>,
}

/// An outgoing coreference pointer carried by a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorefPointer {
    pub layer: CorefLayer,
    pub chain: ChainId,
    /// Position of this mention in its chain (`127-4` → 4), when written
    pub link: Option<u32>,
    /// Explicit target token (`31-7->127-4`), when written
    pub target: Option<TokenId>,
    /// DP-type label from the type column (`PersPron[127]` → `PersPron`)
    pub dp_type: Option<String>,
}

impl CorefPointer {
    pub fn key(&self) -> ChainKey {
        ChainKey::new(self.layer, self.chain)
    }
}

/// A chain identity: chain ids are only unique within a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChainKey {
    pub layer: CorefLayer,
    pub chain: ChainId,
}

impl ChainKey {
    pub fn new(layer: CorefLayer, chain: ChainId) -> Self {
        Self { layer, chain }
    }
}

impl std::fmt::Display for ChainKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.layer, self.chain)
    }
}

/// A single annotated word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    /// Monotonic index over the whole document or chapter set (0-based)
    pub global_index: usize,
    pub char_span: CharSpan,
    pub text: String,
    pub roles: Vec<RoleSlot>,
    pub pointers: Vec<CorefPointer>,
    /// `(feature, value)` pairs from a morphology layer, when the file has one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub morphology: Vec<(String, String)>,
}

impl Token {
    /// In-sentence ordinal as written in the file.
    pub fn index(&self) -> usize {
        self.id.index
    }

    pub fn has_pointer(&self) -> bool {
        !self.pointers.is_empty()
    }

    pub fn pointers_in(&self, layer: CorefLayer) -> impl Iterator<Item = &CorefPointer> {
        self.pointers.iter().filter(move |p| p.layer == layer)
    }

    /// The pointer used for antecedent lookup: animate layer first, then inanimate.
    pub fn primary_pointer(&self) -> Option<&CorefPointer> {
        self.pointers_in(CorefLayer::Animate)
            .next()
            .or_else(|| self.pointers_in(CorefLayer::Inanimate).next())
    }

    /// First role slot, which carries the token's main clause.
    pub fn primary_role(&self) -> Option<&RoleSlot> {
        self.roles.first()
    }

    pub fn grammatical_role(&self) -> Option<&str> {
        self.primary_role().and_then(|r| r.grammatical.as_deref())
    }

    pub fn thematic_role(&self) -> Option<&str> {
        self.primary_role().and_then(|r| r.thematic.as_deref())
    }

    pub fn clause(&self) -> Option<usize> {
        self.primary_role().and_then(|r| r.clause)
    }

    pub fn morph(&self, feature: &str) -> Option<&str> {
        self.morphology
            .iter()
            .find(|(name, _)| name == feature)
            .map(|(_, value)| value.as_str())
    }
}
