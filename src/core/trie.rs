// --- File: src/core/trie.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PhraseNode {
    children: HashMap<String, usize>,
    value: Option<String>,
}

impl PhraseNode {
    fn new() -> Self {
        Self { children: HashMap::new(), value: None }
    }
}

/// Word-level trie over lower-cased tokens.
/// Finds the longest phrase starting at a token position in O(phrase length).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhraseTrie {
    nodes: Vec<PhraseNode>,
    len: usize,
}

impl PhraseTrie {
    pub fn new() -> Self {
        Self { nodes: vec![PhraseNode::new()], len: 0 }
    }

    /// Inserts a phrase. The first value stored for a phrase is kept.
    /// O(k) complexity where k is the number of tokens.
    pub fn insert<'a>(&mut self, tokens: impl IntoIterator<Item = &'a str>, value: &str) {
        let mut node_idx = 0;
        let mut depth = 0;
        for token in tokens {
            let next_idx = if let Some(&id) = self.nodes[node_idx].children.get(token) {
                id
            } else {
                let new_node_id = self.nodes.len();
                self.nodes.push(PhraseNode::new());
                self.nodes[node_idx].children.insert(token.to_string(), new_node_id);
                new_node_id
            };
            node_idx = next_idx;
            depth += 1;
        }
        if depth == 0 {
            return;
        }
        let node = &mut self.nodes[node_idx];
        if node.value.is_none() {
            node.value = Some(value.to_string());
            self.len += 1;
        }
    }

    /// Longest stored phrase that is a prefix of `tokens`.
    /// Returns the number of tokens consumed and the stored value.
    pub fn longest_match<S: AsRef<str>>(&self, tokens: &[S]) -> Option<(usize, &str)> {
        let mut node_idx = 0;
        let mut best = None;
        for (i, token) in tokens.iter().enumerate() {
            match self.nodes[node_idx].children.get(token.as_ref()) {
                Some(&next_idx) => node_idx = next_idx,
                None => break,
            }
            if let Some(value) = &self.nodes[node_idx].value {
                best = Some((i + 1, value.as_str()));
            }
        }
        best
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for PhraseTrie {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_the_longest_phrase() {
        let mut trie = PhraseTrie::new();
        trie.insert(["thank"], "T");
        trie.insert(["thank", "you"], "TY");
        trie.insert(["thank", "you", "very", "much"], "TYVM");

        assert_eq!(trie.longest_match(&["thank", "you", "friend"]), Some((2, "TY")));
        assert_eq!(trie.longest_match(&["thank", "you", "very"]), Some((2, "TY")));
        assert_eq!(trie.longest_match(&["thank", "me"]), Some((1, "T")));
        assert_eq!(trie.longest_match(&["you"]), None);
        assert_eq!(trie.len(), 3);
    }

    #[test]
    fn first_value_wins_and_empty_phrases_are_ignored() {
        let mut trie = PhraseTrie::new();
        trie.insert(["bye"], "first");
        trie.insert(["bye"], "second");
        trie.insert(std::iter::empty(), "nothing");
        assert_eq!(trie.longest_match(&["bye"]), Some((1, "first")));
        assert_eq!(trie.len(), 1);
        assert!(PhraseTrie::new().is_empty());
    }
}
