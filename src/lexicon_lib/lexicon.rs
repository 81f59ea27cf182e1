//! Single lookup table with maximum-length and per-starter metadata.
//!
//! This module defines [`Lexicon`], the core table structure used by
//! **vietphrase-fmmseg** for fast phrase lookup during greedy longest-match
//! segmentation, plus the `key=value` line parser shared by all lexicon
//! sources.
//!
//! ## Overview
//!
//! `Lexicon` stores a mapping from keys (`Box<[char]>`) to translation
//! values (`Box<str>`), along with:
//!
//! - A **global maximum key length** (`max_len`) and minimum (`min_len`)
//! - **Per-starter maximum lengths** (`starter_cap`) for early rejection
//! - A **sorted key index** (`sorted_keys`) ordered by descending key
//!   length, then ascending lexicographic order
//!
//! The sorted index is always a permutation of the map's key set and is
//! regenerated by every load path. It drives the name pre-pass (where key
//! application order is observable) and makes the longest-match tie-break
//! deterministic rather than dependent on map iteration order.

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A key→value table with length metadata and a deterministic sorted key index.
///
/// Keys are stored as `Box<[char]>` so the segmentation loop can probe with a
/// borrowed `&[char]` slice and never allocate per candidate. Values may hold
/// multiple alternative translations separated by a caller-chosen separator
/// (typically `/`); the table itself does not interpret them.
///
/// # Duplicates
/// When built from line-oriented sources, the **last** occurrence of a key
/// wins, matching the overwrite semantics of the VietPhrase file format.
///
/// # Serialization
/// `map`, `max_len`, `min_len` and `starter_cap` are serialized; the sorted
/// key index is derived state and is rebuilt after deserialization.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct Lexicon {
    /// Key chars → translation value.
    pub map: FxHashMap<Box<[char]>, Box<str>>,

    /// Longest key length in chars across the table (`0` when empty).
    pub max_len: usize,

    /// Shortest key length in chars across the table (`0` when empty).
    pub min_len: usize,

    /// Longest key length per starting char, for pruning the probe loop.
    pub starter_cap: FxHashMap<char, u8>,

    /// All keys ordered by (descending char length, ascending lexicographic).
    ///
    /// Derived from `map`; rebuilt by [`rebuild_indexes`](Self::rebuild_indexes)
    /// and never mutated independently.
    #[serde(skip)]
    #[serde(default)]
    pub sorted_keys: Vec<Box<str>>,
}

impl Lexicon {
    /// Builds a table from `(key, value)` pairs, last occurrence winning on
    /// duplicate keys, then computes all derived metadata.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let it = pairs.into_iter();
        let (lower, _) = it.size_hint();

        let mut map: FxHashMap<Box<[char]>, Box<str>> = FxHashMap::default();
        if lower > 0 {
            map.reserve(lower);
        }

        for (k, v) in it {
            debug_assert!(!k.is_empty(), "lexicon key must not be empty");
            let chars: Box<[char]> = k.chars().collect::<Vec<_>>().into_boxed_slice();
            // Last-wins: a later line overwrites an earlier one with the same key.
            map.insert(chars, v.into_boxed_str());
        }

        let mut lexicon = Self {
            map,
            max_len: 0,
            min_len: 0,
            starter_cap: FxHashMap::default(),
            sorted_keys: Vec::new(),
        };
        lexicon.rebuild_indexes();
        lexicon
    }

    /// Parses line-oriented `key=value` content and builds a table from it.
    ///
    /// A line is trimmed, then ignored when empty or when it starts with
    /// `//`, `#` or `=`. The remainder is split on the **first** `=`: the
    /// left part is the key verbatim, the right part is trimmed of
    /// surrounding whitespace. Lines without `=` are skipped.
    pub fn from_lines(content: &str) -> Self {
        Self::from_pairs(parse_lines(content))
    }

    /// Recomputes `max_len`, `min_len`, `starter_cap` and the sorted key
    /// index from the current `map`.
    ///
    /// Must be called after every operation that replaces the map, including
    /// deserialization (the index is not persisted).
    pub fn rebuild_indexes(&mut self) {
        let mut global_max = 0usize;
        let mut global_min = usize::MAX;
        let mut starter_cap: FxHashMap<char, u8> = FxHashMap::default();
        starter_cap.reserve(self.map.len().min(0x10000));

        let mut keyed: Vec<(usize, Box<str>)> = Vec::with_capacity(self.map.len());

        for k in self.map.keys() {
            let len = k.len();
            global_max = global_max.max(len);
            global_min = global_min.min(len);

            let len_u8 = u8::try_from(len).unwrap_or(u8::MAX);
            if let Some(&c0) = k.first() {
                starter_cap
                    .entry(c0)
                    .and_modify(|m| *m = (*m).max(len_u8))
                    .or_insert(len_u8);
            }

            keyed.push((len, k.iter().collect::<String>().into_boxed_str()));
        }

        // Longest first; equal lengths break ties lexicographically ascending.
        keyed.par_sort_unstable_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

        self.max_len = global_max;
        self.min_len = if global_min == usize::MAX { 0 } else { global_min };
        self.starter_cap = starter_cap;
        self.sorted_keys = keyed.into_iter().map(|(_, k)| k).collect();

        debug_assert_eq!(self.sorted_keys.len(), self.map.len());
    }

    /// Looks up a candidate key given as a char slice, without allocating.
    #[inline]
    pub fn lookup(&self, candidate: &[char]) -> Option<&str> {
        self.map.get(candidate).map(|v| &**v)
    }

    /// Looks up a key given as `&str`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        let chars: Vec<char> = key.chars().collect();
        self.lookup(&chars)
    }

    /// Effective probe cap at a position whose text starts with `c0`:
    /// the longest key beginning with that char, or `0` when none exists.
    #[inline]
    pub fn cap_for(&self, c0: char) -> usize {
        self.starter_cap.get(&c0).copied().unwrap_or(0) as usize
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// `true` when the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Parses VietPhrase-format lines into `(key, value)` pairs, preserving
/// source order so that duplicate handling stays last-wins.
pub fn parse_lines(content: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for raw in content.lines() {
        let line = raw.trim();
        if line.is_empty()
            || line.starts_with("//")
            || line.starts_with('#')
            || line.starts_with('=')
        {
            continue;
        }
        match line.split_once('=') {
            Some((key, value)) => pairs.push((key.to_string(), value.trim().to_string())),
            None => continue,
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_comments_and_blanks() {
        let content = "// comment\n# another\n=orphan\n\n你好=xin chào\n";
        let pairs = parse_lines(content);
        assert_eq!(pairs, vec![("你好".to_string(), "xin chào".to_string())]);
    }

    #[test]
    fn parse_splits_on_first_equals_only() {
        let pairs = parse_lines("a=b=c\n");
        assert_eq!(pairs, vec![("a".to_string(), "b=c".to_string())]);
    }

    #[test]
    fn parse_trims_value_not_key() {
        let pairs = parse_lines("你好 =  xin chào  \n");
        assert_eq!(pairs, vec![("你好 ".to_string(), "xin chào".to_string())]);
    }

    #[test]
    fn duplicate_keys_last_wins() {
        let lexicon = Lexicon::from_lines("你=a\n你=b\n");
        assert_eq!(lexicon.len(), 1);
        assert_eq!(lexicon.get_str("你"), Some("b"));
    }

    #[test]
    fn sorted_keys_longest_first_then_lexicographic() {
        let lexicon = Lexicon::from_lines("b=2\n你好吗=3\na=1\n你好=4\n");
        let keys: Vec<&str> = lexicon.sorted_keys.iter().map(|k| &**k).collect();
        assert_eq!(keys, vec!["你好吗", "你好", "a", "b"]);
        assert_eq!(lexicon.max_len, 3);
        assert_eq!(lexicon.min_len, 1);
    }

    #[test]
    fn starter_cap_tracks_longest_key_per_first_char() {
        let lexicon = Lexicon::from_lines("你=1\n你好=2\n你好吗=3\n好=4\n");
        assert_eq!(lexicon.cap_for('你'), 3);
        assert_eq!(lexicon.cap_for('好'), 1);
        assert_eq!(lexicon.cap_for('吗'), 0);
    }

    #[test]
    fn empty_table_has_zero_bounds() {
        let lexicon = Lexicon::from_lines("");
        assert!(lexicon.is_empty());
        assert_eq!(lexicon.max_len, 0);
        assert_eq!(lexicon.min_len, 0);
        assert!(lexicon.sorted_keys.is_empty());
    }
}
