//! Loading and managing the three VietPhrase lexicons.
//!
//! This module defines [`LexiconSet`], which holds the phonetic, phrase and
//! name tables used by the translation engine. Each table loads independently
//! from a line-oriented `key=value` source; a failure in one source leaves
//! that table empty and never blocks the others.
//!
//! Users generally interact with this indirectly via the `VietPhrase`
//! interface, but advanced users may access it for custom loading,
//! serialization, or building a compiled binary cache.

use serde::{Deserialize, Serialize};
use serde_cbor::{from_reader, from_slice};
use std::error::Error;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::Mutex;
use std::{fs, io};
use zstd::{Decoder, Encoder};

pub mod lexicon;

pub use lexicon::Lexicon;

// Define a global mutable variable to store the error message
static LAST_ERROR: Mutex<Option<String>> = Mutex::new(None);

/// Identifies which of the three tables an operation targets.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LexiconKind {
    /// Single-char keys → pinyin-derived phonetic reading.
    Phonetic,
    /// Phrase keys → Vietnamese rendering(s), possibly multi-valued.
    Phrase,
    /// Proper-name keys, applied as a pre-pass before segmentation.
    Names,
}

/// Per-source success flags from [`LexiconSet::from_dir`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub phonetic: bool,
    pub phrase: bool,
    pub names: bool,
}

/// The three lookup tables backing the translation engine.
///
/// All tables are built once at startup and treated as read-only afterwards;
/// reloading replaces a whole table (and its derived indexes) rather than
/// mutating it in place, so concurrent readers never observe a partially
/// rebuilt lexicon.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct LexiconSet {
    pub phonetic: Lexicon,
    pub phrase: Lexicon,
    pub names: Lexicon,
}

impl LexiconSet {
    /// Default phonetic source file name, as shipped by VietPhrase tooling.
    pub const PHONETIC_FILE: &'static str = "ChinesePhienAmWords.txt";
    /// Default phrase source file name.
    pub const PHRASE_FILE: &'static str = "vietphrase.txt";
    /// Default name source file name.
    pub const NAMES_FILE: &'static str = "Names.txt";

    /// Loads the three well-known source files from `dir`.
    ///
    /// Each source loads independently; a missing or unreadable file leaves
    /// its table empty and flips the corresponding report flag to `false`.
    /// The set is always returned, with whatever subset succeeded.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> (Self, LoadReport) {
        let dir = dir.as_ref();
        let mut set = Self::default();
        let report = LoadReport {
            phonetic: set.load_file(dir.join(Self::PHONETIC_FILE), LexiconKind::Phonetic),
            phrase: set.load_file(dir.join(Self::PHRASE_FILE), LexiconKind::Phrase),
            names: set.load_file(dir.join(Self::NAMES_FILE), LexiconKind::Names),
        };
        (set, report)
    }

    /// Replaces one table from a file on disk.
    ///
    /// On I/O or decoding failure the table becomes empty, the cause is
    /// recorded in the last-error slot, and `false` is returned.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P, kind: LexiconKind) -> bool {
        match fs::read_to_string(path.as_ref()) {
            Ok(content) => {
                self.load_str(&content, kind);
                true
            }
            Err(err) => {
                Self::set_last_error(&format!(
                    "Failed to read lexicon file {}: {}",
                    path.as_ref().to_string_lossy(),
                    err
                ));
                *self.table_mut(kind) = Lexicon::default();
                false
            }
        }
    }

    /// Replaces one table from already-decoded source text.
    pub fn load_str(&mut self, content: &str, kind: LexiconKind) {
        *self.table_mut(kind) = Lexicon::from_lines(content);
    }

    /// Borrow a table by kind.
    pub fn table(&self, kind: LexiconKind) -> &Lexicon {
        match kind {
            LexiconKind::Phonetic => &self.phonetic,
            LexiconKind::Phrase => &self.phrase,
            LexiconKind::Names => &self.names,
        }
    }

    fn table_mut(&mut self, kind: LexiconKind) -> &mut Lexicon {
        match kind {
            LexiconKind::Phonetic => &mut self.phonetic,
            LexiconKind::Phrase => &mut self.phrase,
            LexiconKind::Names => &mut self.names,
        }
    }

    /// Rebuilds derived indexes for all tables. Required after
    /// deserialization, since sorted key indexes are not persisted.
    pub fn rebuild_derived(&mut self) {
        self.phonetic.rebuild_indexes();
        self.phrase.rebuild_indexes();
        self.names.rebuild_indexes();
    }

    /// Serializes the set to a CBOR file.
    pub fn serialize_to_cbor<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn Error>> {
        match serde_cbor::to_vec(self) {
            Ok(cbor_data) => {
                if let Err(err) = fs::write(&path, cbor_data) {
                    Self::set_last_error(&format!("Failed to write CBOR file: {}", err));
                    return Err(Box::new(err));
                }
                Ok(())
            }
            Err(err) => {
                Self::set_last_error(&format!("Failed to serialize to CBOR: {}", err));
                Err(Box::new(err))
            }
        }
    }

    /// Deserializes the set from a CBOR file and rebuilds derived indexes.
    pub fn deserialize_from_cbor<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        match fs::read(&path) {
            Ok(cbor_data) => match from_slice::<LexiconSet>(&cbor_data) {
                Ok(mut set) => {
                    set.rebuild_derived();
                    Ok(set)
                }
                Err(err) => {
                    Self::set_last_error(&format!("Failed to deserialize CBOR: {}", err));
                    Err(Box::new(err))
                }
            },
            Err(err) => {
                Self::set_last_error(&format!("Failed to read CBOR file: {}", err));
                Err(Box::new(err))
            }
        }
    }

    /// Saves the set to a Zstd-compressed CBOR file on disk.
    pub fn save_compressed<P: AsRef<Path>>(&self, path: P) -> Result<(), LexiconError> {
        let file = File::create(path).map_err(|e| LexiconError::IoError(e.to_string()))?;
        let writer = BufWriter::new(file);
        let mut encoder =
            Encoder::new(writer, 19).map_err(|e| LexiconError::IoError(e.to_string()))?;
        serde_cbor::to_writer(&mut encoder, self)
            .map_err(|e| LexiconError::ParseError(e.to_string()))?;
        encoder
            .finish()
            .map_err(|e| LexiconError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Loads the set from a Zstd-compressed CBOR file on disk.
    pub fn load_compressed<P: AsRef<Path>>(path: P) -> Result<Self, LexiconError> {
        let file = File::open(path).map_err(|e| LexiconError::IoError(e.to_string()))?;
        let reader = BufReader::new(file);
        let mut decoder = Decoder::new(reader).map_err(|e| LexiconError::IoError(e.to_string()))?;
        let mut set: LexiconSet =
            from_reader(&mut decoder).map_err(|e| LexiconError::ParseError(e.to_string()))?;
        set.rebuild_derived();
        Ok(set)
    }

    /// Records the last error message encountered during lexicon operations.
    pub fn set_last_error(err_msg: &str) {
        let mut last_error = LAST_ERROR.lock().unwrap();
        *last_error = Some(err_msg.to_string());
    }

    /// Retrieves the last error message set during lexicon loading or saving.
    pub fn get_last_error() -> Option<String> {
        let last_error = LAST_ERROR.lock().unwrap();
        last_error.clone()
    }
}

/// Errors from lexicon loading, parsing, or serialization.
///
/// # Variants
/// - `IoError(String)` — file access, reading, or writing failed.
/// - `ParseError(String)` — CBOR or lexicon text could not be decoded.
#[derive(Debug)]
pub enum LexiconError {
    IoError(String),
    ParseError(String),
}

impl std::fmt::Display for LexiconError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexiconError::IoError(msg) => write!(f, "I/O Error: {}", msg),
            LexiconError::ParseError(msg) => write!(f, "Parse Error: {}", msg),
        }
    }
}

impl Error for LexiconError {}

impl From<io::Error> for LexiconError {
    fn from(err: io::Error) -> Self {
        LexiconError::IoError(err.to_string())
    }
}

impl From<serde_cbor::Error> for LexiconError {
    fn from(err: serde_cbor::Error) -> Self {
        LexiconError::ParseError(err.to_string())
    }
}
