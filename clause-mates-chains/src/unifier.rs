//! Merging of per-file chain ids into run-wide chains.
//!
//! ```text
//! chapter1.tsv  animate#7 {"Peter", "der Mann"}  ─┐
//! chapter2.tsv  animate#7 {"Peter"}               ─┴─ animate#7
//! chapter2.tsv  animate#9 {"die Stadt"}          ─┐
//! chapter3.tsv  animate#9 {"ein Hund"}            │   (texts disagree)
//!                                                 └─ animate#9, animate#10
//! ```

use std::collections::{BTreeMap, BTreeSet};

use pathfinding::undirected::connected_components::connected_components;
use unicode_segmentation::UnicodeSegmentation;

use clause_mates::{ChainId, ChainKey, CorefLayer, TokenOffsets};
use clause_mates_relations::PronounLexicon;

/// Mention texts of one chain in one file, gathered by a pre-pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSummary {
    /// Position of the file in the chapter list
    pub file: usize,
    pub key: ChainKey,
    pub texts: Vec<String>,
}

/// Run-wide chain keys for every file's chains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnificationPlan {
    chain_maps: BTreeMap<usize, BTreeMap<ChainKey, ChainKey>>,
    component_count: usize,
}

impl UnificationPlan {
    /// Chain mapping for one file; empty when the file had no chains.
    pub fn chain_map(&self, file: usize) -> BTreeMap<ChainKey, ChainKey> {
        self.chain_maps.get(&file).cloned().unwrap_or_default()
    }

    pub fn global_key(&self, file: usize, key: ChainKey) -> ChainKey {
        self.chain_maps
            .get(&file)
            .and_then(|map| map.get(&key))
            .copied()
            .unwrap_or(key)
    }

    /// Number of run-wide chains.
    pub fn component_count(&self) -> usize {
        self.component_count
    }
}

#[derive(Debug, Clone)]
pub struct CrossFileUnifier {
    min_similarity: f64,
    lexicon: PronounLexicon,
}

impl Default for CrossFileUnifier {
    fn default() -> Self {
        Self::new(0.1, PronounLexicon::default())
    }
}

impl CrossFileUnifier {
    pub fn new(min_similarity: f64, lexicon: PronounLexicon) -> Self {
        Self {
            min_similarity,
            lexicon,
        }
    }

    /// Lowercased words of the mention texts, without pronouns and articles.
    pub fn content_words(&self, texts: &[String]) -> BTreeSet<String> {
        texts
            .iter()
            .flat_map(|text| text.unicode_words())
            .map(str::to_lowercase)
            .filter(|word| !self.lexicon.is_critical(word))
            .collect()
    }

    fn compatible(&self, a: &BTreeSet<String>, b: &BTreeSet<String>) -> bool {
        if a.is_empty() || b.is_empty() {
            return true;
        }
        let shared = a.intersection(b).count();
        let total = a.union(b).count();
        shared as f64 / total as f64 >= self.min_similarity
    }

    /// Group equal chain ids across files into run-wide chains.
    ///
    /// Each group keeps its chain id, earliest file first. A group
    /// whose id was already claimed by an earlier group gets a fresh id above
    /// every id in use on its layer.
    pub fn plan(&self, summaries: &[ChainSummary]) -> UnificationPlan {
        let mut nodes: Vec<&ChainSummary> = summaries.iter().collect();
        nodes.sort_by_key(|s| (s.file, s.key));

        let words: Vec<BTreeSet<String>> = nodes.iter().map(|s| self.content_words(&s.texts)).collect();
        let neighbours: Vec<Vec<usize>> = (0..nodes.len())
            .map(|i| {
                (0..nodes.len())
                    .filter(|&j| {
                        j != i
                            && nodes[j].key == nodes[i].key
                            && nodes[j].file != nodes[i].file
                            && self.compatible(&words[i], &words[j])
                    })
                    .collect()
            })
            .collect();

        let starts: Vec<usize> = (0..nodes.len()).collect();
        let mut components: Vec<Vec<usize>> = connected_components(&starts, |&i| neighbours[i].clone())
            .into_iter()
            .map(|component| {
                let mut members: Vec<usize> = component.into_iter().collect();
                members.sort_unstable();
                members
            })
            .collect();
        components.sort_by_key(|members| members[0]);

        // `None` once a layer has used up the id range.
        let mut next_free: BTreeMap<CorefLayer, Option<ChainId>> = BTreeMap::new();
        for node in &nodes {
            let next = next_free.entry(node.key.layer).or_insert(Some(0));
            *next = match (*next, node.key.chain.checked_add(1)) {
                (Some(current), Some(after)) => Some(current.max(after)),
                _ => None,
            };
        }

        let mut claimed: BTreeSet<ChainKey> = BTreeSet::new();
        let mut plan = UnificationPlan {
            component_count: components.len(),
            ..UnificationPlan::default()
        };
        for members in &components {
            // Edges only join equal keys, so every member shares one.
            let wanted = nodes[members[0]].key;
            let file = nodes[members[0]].file;
            let global = if claimed.insert(wanted) {
                wanted
            } else {
                let fresh = next_free.get_mut(&wanted.layer).and_then(|next| {
                    let id = (*next)?;
                    *next = id.checked_add(1);
                    Some(ChainKey::new(wanted.layer, id))
                });
                match fresh {
                    Some(fresh) => {
                        log::debug!(
                            "{} in file {} does not match earlier chapters, renamed to {}",
                            wanted,
                            file,
                            fresh
                        );
                        claimed.insert(fresh);
                        fresh
                    }
                    None => {
                        log::warn!(
                            "no free chain id left on the {} layer, {} in file {} keeps its id",
                            wanted.layer,
                            wanted,
                            file
                        );
                        wanted
                    }
                }
            };
            for &i in members {
                plan.chain_maps
                    .entry(nodes[i].file)
                    .or_default()
                    .insert(nodes[i].key, global);
            }
        }
        plan
    }
}

/// Starting offsets for each chapter from its `(sentences, tokens)` size.
pub fn chapter_offsets(sizes: &[(usize, usize)]) -> Vec<TokenOffsets> {
    let mut running = TokenOffsets::default();
    sizes
        .iter()
        .map(|(sentences, tokens)| {
            let start = running;
            running = TokenOffsets::new(running.sentence + sentences, running.token + tokens);
            start
        })
        .collect()
}
