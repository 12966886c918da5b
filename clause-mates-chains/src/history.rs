//! Append-only mention history, keyed by chain.

use std::collections::BTreeMap;

use serde::Serialize;

use clause_mates::ChainKey;

/// One recorded mention of a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mention {
    /// Global index of the mention's first token
    pub global_index: usize,
    /// Global sentence number the mention occurs in
    pub sentence: usize,
    pub text: String,
    pub dp_type: Option<String>,
}

/// Per-chain lifecycle. Transitions happen only on append.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainState {
    Unseen,
    OneMention,
    MultiMention,
}

/// Mentions of one chain, strictly ascending by global index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Chain {
    mentions: Vec<Mention>,
}

impl Chain {
    pub fn mentions(&self) -> &[Mention] {
        &self.mentions
    }

    pub fn state(&self) -> ChainState {
        match self.mentions.len() {
            0 => ChainState::Unseen,
            1 => ChainState::OneMention,
            _ => ChainState::MultiMention,
        }
    }

    /// The mention with the largest global index strictly below `index`.
    pub fn last_before(&self, index: usize) -> Option<&Mention> {
        let end = self.mentions.partition_point(|m| m.global_index < index);
        end.checked_sub(1).map(|i| &self.mentions[i])
    }

    /// The chain's first mention, if it precedes `index`.
    pub fn first_before(&self, index: usize) -> Option<&Mention> {
        self.mentions.first().filter(|m| m.global_index < index)
    }
}

/// Mention history for every chain seen so far in a run.
#[derive(Debug, Clone, Default)]
pub struct ChainHistory {
    chains: BTreeMap<ChainKey, Chain>,
    /// Global sentence number to the global indices of its mentions
    by_sentence: BTreeMap<usize, Vec<usize>>,
    mention_count: usize,
}

impl ChainHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mention. Returns false, leaving the history unchanged, when
    /// the mention does not come after the chain's last one.
    pub fn append(&mut self, key: ChainKey, mention: Mention) -> bool {
        let chain = self.chains.entry(key).or_default();
        if let Some(last) = chain.mentions.last() {
            if mention.global_index <= last.global_index {
                log::warn!(
                    "{}: rejected out-of-order mention at {} (last at {})",
                    key,
                    mention.global_index,
                    last.global_index
                );
                return false;
            }
        }
        self.by_sentence
            .entry(mention.sentence)
            .or_default()
            .push(mention.global_index);
        chain.mentions.push(mention);
        self.mention_count += 1;
        true
    }

    pub fn chain(&self, key: ChainKey) -> Option<&Chain> {
        self.chains.get(&key)
    }

    pub fn state(&self, key: ChainKey) -> ChainState {
        self.chain(key).map_or(ChainState::Unseen, Chain::state)
    }

    pub fn chains(&self) -> impl Iterator<Item = (&ChainKey, &Chain)> {
        self.chains.iter()
    }

    /// Global indices of all mentions (any chain) recorded in a sentence.
    pub fn mentions_in_sentence(&self, sentence: usize) -> &[usize] {
        self.by_sentence
            .get(&sentence)
            .map_or(&[][..], |indices| indices.as_slice())
    }

    pub fn len(&self) -> usize {
        self.mention_count
    }

    pub fn is_empty(&self) -> bool {
        self.mention_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clause_mates::CorefLayer;

    fn mention(global_index: usize, sentence: usize) -> Mention {
        Mention {
            global_index,
            sentence,
            text: format!("m{}", global_index),
            dp_type: None,
        }
    }

    #[test]
    fn appends_are_strictly_ascending() {
        let key = ChainKey::new(CorefLayer::Animate, 7);
        let mut history = ChainHistory::new();
        assert_eq!(history.state(key), ChainState::Unseen);

        assert!(history.append(key, mention(4, 1)));
        assert_eq!(history.state(key), ChainState::OneMention);
        assert!(history.append(key, mention(9, 2)));
        assert_eq!(history.state(key), ChainState::MultiMention);

        assert!(!history.append(key, mention(9, 2)));
        assert!(!history.append(key, mention(2, 1)));
        assert_eq!(history.len(), 2);

        let indices: Vec<usize> = history
            .chain(key)
            .unwrap()
            .mentions()
            .iter()
            .map(|m| m.global_index)
            .collect();
        assert_eq!(indices, vec![4, 9]);
    }

    #[test]
    fn lookups_never_reach_the_query_index() {
        let key = ChainKey::new(CorefLayer::Inanimate, 3);
        let mut history = ChainHistory::new();
        for (index, sentence) in [(2, 1), (10, 2), (15, 3)].iter().copied() {
            history.append(key, mention(index, sentence));
        }
        let chain = history.chain(key).unwrap();

        for query in 0..20 {
            if let Some(found) = chain.last_before(query) {
                assert!(found.global_index < query);
            }
            if let Some(found) = chain.first_before(query) {
                assert!(found.global_index < query);
            }
        }
        assert_eq!(chain.last_before(10).map(|m| m.global_index), Some(2));
        assert_eq!(chain.last_before(11).map(|m| m.global_index), Some(10));
        assert_eq!(chain.first_before(2), None);
        assert_eq!(chain.first_before(16).map(|m| m.global_index), Some(2));
    }

    #[test]
    fn sentence_index_tracks_every_chain() {
        let mut history = ChainHistory::new();
        history.append(ChainKey::new(CorefLayer::Animate, 1), mention(3, 5));
        history.append(ChainKey::new(CorefLayer::Inanimate, 2), mention(3, 5));
        history.append(ChainKey::new(CorefLayer::Animate, 4), mention(6, 5));
        assert_eq!(history.mentions_in_sentence(5), &[3, 3, 6]);
        assert!(history.mentions_in_sentence(6).is_empty());
    }
}
