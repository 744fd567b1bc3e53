//! Core, format-agnostic types for lockit.
//! Format handlers decode into these; engines operate on them.

use std::{
    collections::HashMap,
    fmt::Display,
    path::{Path, PathBuf},
    sync::{
        Arc, OnceLock,
        atomic::{AtomicBool, Ordering},
    },
};

use serde::{Deserialize, Serialize};
use unic_langid::LanguageIdentifier;

/// A single translatable unit: key, optional value, optional metadata.
///
/// `comment` carries a translator note and `source` the original-language
/// text where the format provides one; neither takes part in equality.
#[derive(Debug, Clone, Eq, Deserialize, Serialize)]
pub struct LocalizationEntry {
    /// Unique message identifier within a file. Uniqueness is checked by the
    /// `no-duplicate-keys` rule, not enforced structurally.
    pub key: String,

    /// The translated value. `None` means the format had no value at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub value: Option<String>,

    /// Optional comment for translators.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub comment: Option<String>,

    /// Optional original/source-language text.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub source: Option<String>,
}

impl LocalizationEntry {
    /// Creates an entry with just a key and value.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        LocalizationEntry {
            key: key.into(),
            value: Some(value.into()),
            comment: None,
            source: None,
        }
    }

    /// Creates an entry whose value is absent.
    pub fn without_value(key: impl Into<String>) -> Self {
        LocalizationEntry {
            key: key.into(),
            value: None,
            comment: None,
            source: None,
        }
    }

    /// Attaches a translator comment.
    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }

    /// Attaches the original-language text.
    pub fn with_source(mut self, source: Option<String>) -> Self {
        self.source = source;
        self
    }

    /// True when the value is absent, empty, or all-whitespace.
    pub fn is_empty(&self) -> bool {
        match &self.value {
            None => true,
            Some(v) => v.trim().is_empty(),
        }
    }

    /// The value as a `&str`, treating an absent value as empty.
    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

/// Two entries are equal iff key and value are equal; `comment` and
/// `source` are metadata and do not take part in identity.
impl PartialEq for LocalizationEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value == other.value
    }
}

impl Display for LocalizationEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {:?}", self.key, self.value)
    }
}

/// One parsed localization resource file in the canonical model.
#[derive(Debug, Deserialize, Serialize)]
pub struct LocalizationFile {
    /// The path the file was parsed from, as given.
    pub file_path: PathBuf,

    /// Locale identifier (e.g. "en", "en-US"); `None` means unknown locale.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub culture: Option<String>,

    /// Format identifier of the handler that produced this file.
    pub format: String,

    /// Ordered entries; order is preserved for faithful round-trip writing.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub entries: Vec<LocalizationEntry>,

    // Memoized key -> last entry position index, rebuilt on first access.
    #[serde(skip)]
    index: OnceLock<HashMap<String, usize>>,
}

impl LocalizationFile {
    pub fn new(
        file_path: impl Into<PathBuf>,
        culture: Option<String>,
        format: impl Into<String>,
        entries: Vec<LocalizationEntry>,
    ) -> Self {
        LocalizationFile {
            file_path: file_path.into(),
            culture,
            format: format.into(),
            entries,
            index: OnceLock::new(),
        }
    }

    /// Appends an entry and invalidates the memoized key index.
    pub fn push_entry(&mut self, entry: LocalizationEntry) {
        self.entries.push(entry);
        self.index = OnceLock::new();
    }

    fn key_index(&self) -> &HashMap<String, usize> {
        // Later duplicates overwrite earlier ones: the index is a lookup
        // view and never deduplicates `entries` itself.
        self.index.get_or_init(|| {
            self.entries
                .iter()
                .enumerate()
                .map(|(pos, entry)| (entry.key.clone(), pos))
                .collect()
        })
    }

    /// Looks up an entry by key; on duplicate keys the last occurrence wins.
    pub fn entry(&self, key: &str) -> Option<&LocalizationEntry> {
        self.key_index().get(key).map(|&pos| &self.entries[pos])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.key_index().contains_key(key)
    }

    /// All distinct keys, in unspecified order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.key_index().keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive culture comparison; `None` matches nothing.
    pub fn culture_matches(&self, culture: &str) -> bool {
        self.culture
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(culture))
    }

    pub fn file_name(&self) -> &str {
        self.file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

impl Clone for LocalizationFile {
    fn clone(&self) -> Self {
        LocalizationFile {
            file_path: self.file_path.clone(),
            culture: self.culture.clone(),
            format: self.format.clone(),
            entries: self.entries.clone(),
            index: OnceLock::new(),
        }
    }
}

impl PartialEq for LocalizationFile {
    fn eq(&self, other: &Self) -> bool {
        self.file_path == other.file_path
            && self.culture == other.culture
            && self.format == other.format
            && self.entries == other.entries
    }
}

impl Eq for LocalizationFile {}

impl Display for LocalizationFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{} / {}]: {} entries",
            self.file_path.display(),
            self.format,
            self.culture.as_deref().unwrap_or("?"),
            self.entries.len()
        )
    }
}

/// Validates a culture string into a locale identifier.
///
/// Returns `None` for anything that does not look like a locale, never an
/// error. `unic-langid` accepts any short alphabetic word as a language
/// subtag, so the primary subtag is additionally required to be 2-3 letters.
pub fn resolve_culture(candidate: &str) -> Option<LanguageIdentifier> {
    let parsed: LanguageIdentifier = candidate.parse().ok()?;
    let primary = parsed.language.as_str();
    if primary.len() < 2 || primary.len() > 3 {
        return None;
    }
    Some(parsed)
}

/// Cooperative cancellation signal for directory-scoped batch operations.
///
/// Checked between files only; a single file's parse or write is never
/// interrupted.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Helper shared by the path and discovery code.
pub(crate) fn path_file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}
