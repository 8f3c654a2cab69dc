//! Node remapping.
//!
//! Solvers that treat numerals as domain elements search a space sized by
//! the largest numeral in the problem. Renumbering the referenced integers
//! to `0..n` keeps that space as small as the problem allows.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;

static INTEGER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+\b").expect("integer token pattern is valid"));

/// A bijection between referenced integers and their compact ranks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeMapping {
    forward: BTreeMap<u64, u64>,
    backward: BTreeMap<u64, u64>,
}

impl NodeMapping {
    /// Rank each id by its position in ascending order.
    pub fn new(ids: &BTreeSet<u64>) -> Self {
        let forward: BTreeMap<u64, u64> = ids.iter().zip(0u64..).map(|(&id, rank)| (id, rank)).collect();
        let backward = forward.iter().map(|(&id, &rank)| (rank, id)).collect();
        Self { forward, backward }
    }

    /// Compact number for an original id.
    pub fn compact(&self, original: u64) -> Option<u64> {
        self.forward.get(&original).copied()
    }

    /// Original id for a compact number.
    pub fn original(&self, compact: u64) -> Option<u64> {
        self.backward.get(&compact).copied()
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// The largest compact number in use.
    pub fn largest(&self) -> Option<u64> {
        self.backward.keys().next_back().copied()
    }
}

/// Replace every standalone integer token of `text` that appears in `ids`
/// with its rank in the sorted id set.
///
/// Integers not in `ids` and digits embedded in identifiers (`r35`) are left
/// alone.
pub fn remap_nodes(text: &str, ids: &BTreeSet<u64>) -> (String, NodeMapping) {
    let mapping = NodeMapping::new(ids);
    let remapped = INTEGER_TOKEN.replace_all(text, |caps: &regex::Captures<'_>| {
        let token = &caps[0];
        token
            .parse::<u64>()
            .ok()
            .and_then(|n| mapping.compact(n))
            .map(|n| n.to_string())
            .unwrap_or_else(|| token.to_string())
    });
    (remapped.into_owned(), mapping)
}
