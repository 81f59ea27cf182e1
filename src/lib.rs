//! Chinese → Vietnamese conversion using greedy FMM (Forward Maximum
//! Matching) segmentation over VietPhrase dictionaries.
//!
//! The engine scans text left to right, always consuming the longest phrase
//! key matching at the current position, falling back to a phonetic reading
//! or a verbatim copy for unmatched characters. A proper-name pre-pass runs
//! before segmentation, and a small option set controls formatting.

use std::path::Path;

use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;

use crate::lexicon_lib::{LexiconKind, LexiconSet, LoadReport};

pub mod lexicon_lib;

/// Grammatical particles dropped instead of transliterated when
/// `drop_particles` is enabled and no phrase match consumed them.
const PARTICLES: [char; 3] = ['的', '了', '着'];

static SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(" +").unwrap());

/// Formatting and behavior settings read once per translation call.
///
/// Defaults match the VietPhrase conventions: no brackets, first meaning
/// only, `/` separator, particles dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Wrap each matched phrase value in `[` `]`.
    pub bracket_wrap: bool,
    /// Keep only the portion of a value before the first separator.
    pub first_meaning_only: bool,
    /// Separator between alternative meanings inside a value.
    pub meaning_separator: String,
    /// Silently drop 的/了/着 when no phrase match consumed them.
    pub drop_particles: bool,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            bracket_wrap: false,
            first_meaning_only: true,
            meaning_separator: "/".to_string(),
            drop_particles: true,
        }
    }
}

/// Dynamically-typed value for the name-based option setter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionValue {
    Bool(bool),
    Text(String),
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::Text(v.to_string())
    }
}

/// Entry counts of the three loaded lexicons.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LexiconStatus {
    pub phonetic_count: usize,
    pub phrase_count: usize,
    pub name_count: usize,
}

/// The translation facade: lexicons, live options, and the segmentation
/// engine behind `translate` / `transliterate`.
pub struct VietPhrase {
    pub lexicons: LexiconSet,
    options: TranslateOptions,
    is_parallel: bool,
}

impl VietPhrase {
    /// Creates a facade with empty lexicons and default options.
    pub fn new() -> Self {
        Self::from_lexicons(LexiconSet::default())
    }

    /// Wraps an already-built lexicon set.
    pub fn from_lexicons(lexicons: LexiconSet) -> Self {
        VietPhrase {
            lexicons,
            options: TranslateOptions::default(),
            is_parallel: true,
        }
    }

    /// Loads the three well-known source files from `dir`; degraded tables
    /// stay empty, and the report says which sources loaded.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> (Self, LoadReport) {
        let (lexicons, report) = LexiconSet::from_dir(dir);
        (Self::from_lexicons(lexicons), report)
    }

    /// Replaces one lexicon from a file on disk; `false` on load failure
    /// (the affected table becomes empty, the others are untouched).
    pub fn load_lexicon<P: AsRef<Path>>(&mut self, path: P, kind: LexiconKind) -> bool {
        self.lexicons.load_file(path, kind)
    }

    /// Translates using a snapshot of the live options.
    pub fn translate(&self, input: &str) -> String {
        self.translate_with(input, &self.options)
    }

    /// Translates with an explicit, immutable option snapshot, making
    /// concurrent calls independent of the live option set.
    pub fn translate_with(&self, input: &str, options: &TranslateOptions) -> String {
        let text = self.apply_names(input);

        let converted = if self.is_parallel {
            // Phrase keys come from line-oriented sources and never contain
            // '\n', so no match can cross a line boundary.
            let chunks: Vec<&str> = text.split_inclusive('\n').collect();
            chunks
                .par_iter()
                .map(|chunk| self.convert_chunk(chunk, options))
                .collect::<Vec<String>>()
                .concat()
        } else {
            self.convert_chunk(&text, options)
        };

        SPACE_RUNS.replace_all(&converted, " ").trim().to_string()
    }

    /// Phonetic-only transliteration: each char maps through the phonetic
    /// lexicon with a leading space, or is copied verbatim. Independent of
    /// the phrase lexicon and of all options; output is not normalized.
    pub fn transliterate(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        for c in input.chars() {
            if let Some(reading) = self.lexicons.phonetic.lookup(&[c]) {
                out.push(' ');
                out.push_str(reading);
            } else {
                out.push(c);
            }
        }
        out
    }

    /// Name pre-pass: for each name key in sorted-index order (longest
    /// first, ties lexicographic), replaces every occurrence in the current
    /// text with a leading space plus the mapped value.
    ///
    /// The rewrite is sequential and cumulative: a replacement inserted by a
    /// longer key is itself subject to later, shorter keys. This can change
    /// text length and alignment before segmentation begins, and is the
    /// historical VietPhrase behavior.
    fn apply_names(&self, input: &str) -> String {
        let names = &self.lexicons.names;
        if names.is_empty() {
            return input.to_string();
        }
        let mut text = input.to_string();
        for key in &names.sorted_keys {
            if !text.contains(&**key) {
                continue;
            }
            if let Some(value) = names.get_str(key) {
                text = text.replace(&**key, &format!(" {}", value));
            }
        }
        text
    }

    /// Greedy longest-match scan over one chunk. Runs even when the phrase
    /// or phonetic table is empty, degrading to phonetic-only conversion or
    /// plain pass-through.
    fn convert_chunk(&self, text: &str, options: &TranslateOptions) -> String {
        if text.is_empty() {
            return String::new();
        }

        let phrase = &self.lexicons.phrase;
        let phonetic = &self.lexicons.phonetic;
        let chars: Vec<char> = text.chars().collect();

        let mut out = String::with_capacity(text.len());
        let mut i = 0;
        while i < chars.len() {
            let c0 = chars[i];
            let cap = phrase.cap_for(c0).min(phrase.max_len).min(chars.len() - i);

            let mut matched = 0;
            for j in (1..=cap).rev() {
                if let Some(value) = phrase.lookup(&chars[i..i + j]) {
                    let meaning = if options.first_meaning_only {
                        first_meaning(value, &options.meaning_separator)
                    } else {
                        value
                    };
                    out.push(' ');
                    if options.bracket_wrap {
                        out.push('[');
                        out.push_str(meaning.trim());
                        out.push(']');
                    } else {
                        out.push_str(meaning);
                    }
                    matched = j;
                    break; // longest match wins, no backtracking
                }
            }
            if matched > 0 {
                i += matched;
                continue;
            }

            if options.drop_particles && PARTICLES.contains(&c0) {
                i += 1;
                continue;
            }

            if let Some(reading) = phonetic.lookup(&chars[i..i + 1]) {
                out.push(' ');
                out.push_str(reading);
            } else {
                // Verbatim copy, no leading space: keeps Latin letters,
                // digits and punctuation adjacent to their neighbors.
                out.push(c0);
            }
            i += 1;
        }
        out
    }

    /// Updates one named option; unrecognized names and type-mismatched
    /// values are rejected without altering any state.
    pub fn set_option(&mut self, name: &str, value: OptionValue) -> bool {
        match (name, value) {
            ("bracket_wrap", OptionValue::Bool(v)) => {
                self.options.bracket_wrap = v;
                true
            }
            ("first_meaning_only", OptionValue::Bool(v)) => {
                self.options.first_meaning_only = v;
                true
            }
            ("drop_particles", OptionValue::Bool(v)) => {
                self.options.drop_particles = v;
                true
            }
            ("meaning_separator", OptionValue::Text(v)) => {
                self.options.meaning_separator = v;
                true
            }
            _ => false,
        }
    }

    /// Returns an independent snapshot of the live options.
    pub fn options(&self) -> TranslateOptions {
        self.options.clone()
    }

    /// Replaces the live options wholesale.
    pub fn set_options(&mut self, options: TranslateOptions) {
        self.options = options;
    }

    /// Entry counts for the three lexicons.
    pub fn status(&self) -> LexiconStatus {
        LexiconStatus {
            phonetic_count: self.lexicons.phonetic.len(),
            phrase_count: self.lexicons.phrase.len(),
            name_count: self.lexicons.names.len(),
        }
    }

    pub fn set_parallel(&mut self, is_parallel: bool) {
        self.is_parallel = is_parallel;
    }

    pub fn get_parallel(&self) -> bool {
        self.is_parallel
    }
}

impl Default for VietPhrase {
    fn default() -> Self {
        Self::new()
    }
}

/// Portion of `value` before the first occurrence of `separator`; the whole
/// value when the separator is absent or empty.
#[inline]
fn first_meaning<'a>(value: &'a str, separator: &str) -> &'a str {
    if separator.is_empty() {
        return value;
    }
    match value.find(separator) {
        Some(idx) => &value[..idx],
        None => value,
    }
}
