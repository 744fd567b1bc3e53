//! Quality checks over parsed localization files.
//!
//! Per-file rules run on every file; the cross-file rules (orphan keys and
//! placeholder consistency) need a base culture and at least two files.

use std::{
    collections::{HashMap, HashSet},
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    placeholder::{extract_placeholders, get_regex},
    registry::FormatRegistry,
    types::{CancelFlag, LocalizationFile},
};

/// How serious a violation is. Errors should fail a CI gate, warnings are
/// advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckRule {
    NoEmptyValues,
    NoDuplicateKeys,
    NoOrphanKeys,
    ConsistentPlaceholders,
    NoTrailingWhitespace,
}

impl CheckRule {
    pub fn id(&self) -> &'static str {
        match self {
            CheckRule::NoEmptyValues => "no-empty-values",
            CheckRule::NoDuplicateKeys => "no-duplicate-keys",
            CheckRule::NoOrphanKeys => "no-orphan-keys",
            CheckRule::ConsistentPlaceholders => "consistent-placeholders",
            CheckRule::NoTrailingWhitespace => "no-trailing-whitespace",
        }
    }

    pub fn all() -> Vec<CheckRule> {
        vec![
            CheckRule::NoEmptyValues,
            CheckRule::NoDuplicateKeys,
            CheckRule::NoOrphanKeys,
            CheckRule::ConsistentPlaceholders,
            CheckRule::NoTrailingWhitespace,
        ]
    }
}

impl fmt::Display for CheckRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for CheckRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CheckRule::all()
            .into_iter()
            .find(|rule| rule.id() == s)
            .ok_or_else(|| Error::Path(format!("unknown check rule: {}", s)))
    }
}

/// What to check and how. An empty rule list means all rules.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub rules: Vec<CheckRule>,
    pub base_culture: Option<String>,
    pub recursive: bool,
    pub placeholder_pattern: Option<String>,
    pub cancel: Option<CancelFlag>,
}

impl CheckOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(mut self, rules: Vec<CheckRule>) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_base_culture(mut self, culture: impl Into<String>) -> Self {
        self.base_culture = Some(culture.into());
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_placeholder_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.placeholder_pattern = Some(pattern.into());
        self
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn is_enabled(&self, rule: CheckRule) -> bool {
        self.rules.is_empty() || self.rules.contains(&rule)
    }
}

/// One finding, tied to a rule, a file and usually a key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckViolation {
    pub rule: String,
    pub file_path: PathBuf,
    pub key: Option<String>,
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckReport {
    pub violations: Vec<CheckViolation>,
}

impl CheckReport {
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    pub fn errors(&self) -> impl Iterator<Item = &CheckViolation> {
        self.violations
            .iter()
            .filter(|v| v.severity == Severity::Error)
    }

    fn push(
        &mut self,
        rule: CheckRule,
        file: &LocalizationFile,
        key: Option<&str>,
        message: String,
        severity: Severity,
    ) {
        self.violations.push(CheckViolation {
            rule: rule.id().to_string(),
            file_path: file.file_path.clone(),
            key: key.map(str::to_string),
            message,
            severity,
        });
    }
}

/// Run the per-file rules on a single file.
pub fn check_file(file: &LocalizationFile, options: &CheckOptions) -> CheckReport {
    let mut report = CheckReport::default();
    check_file_into(file, options, &mut report);
    report
}

fn check_file_into(file: &LocalizationFile, options: &CheckOptions, report: &mut CheckReport) {
    if options.is_enabled(CheckRule::NoEmptyValues) {
        for entry in &file.entries {
            if entry.is_empty() {
                report.push(
                    CheckRule::NoEmptyValues,
                    file,
                    Some(&entry.key),
                    format!("key '{}' has an empty value", entry.key),
                    Severity::Warning,
                );
            }
        }
    }

    if options.is_enabled(CheckRule::NoDuplicateKeys) {
        let mut seen = HashSet::new();
        for entry in &file.entries {
            // The first occurrence is fine, every repeat is flagged.
            if !seen.insert(entry.key.as_str()) {
                report.push(
                    CheckRule::NoDuplicateKeys,
                    file,
                    Some(&entry.key),
                    format!("key '{}' appears more than once", entry.key),
                    Severity::Error,
                );
            }
        }
    }

    if options.is_enabled(CheckRule::NoTrailingWhitespace) {
        for entry in &file.entries {
            if let Some(value) = &entry.value {
                if value != value.trim_end() {
                    report.push(
                        CheckRule::NoTrailingWhitespace,
                        file,
                        Some(&entry.key),
                        format!("value of '{}' has trailing whitespace", entry.key),
                        Severity::Warning,
                    );
                }
            }
        }
    }
}

/// Run all enabled rules over a set of files. Cross-file rules only fire when
/// a base culture is configured and more than one file is present.
pub fn check_files(
    files: &[LocalizationFile],
    options: &CheckOptions,
) -> Result<CheckReport, Error> {
    let mut report = CheckReport::default();

    for file in files {
        if let Some(cancel) = &options.cancel {
            if cancel.is_cancelled() {
                return Ok(report);
            }
        }
        check_file_into(file, options, &mut report);
    }

    let Some(base_culture) = &options.base_culture else {
        return Ok(report);
    };
    if files.len() < 2 {
        return Ok(report);
    }

    let base_files: Vec<&LocalizationFile> = files
        .iter()
        .filter(|file| file.culture_matches(base_culture))
        .collect();
    if base_files.is_empty() {
        return Ok(report);
    }

    if options.is_enabled(CheckRule::NoOrphanKeys) {
        let mut base_keys = HashSet::new();
        for file in &base_files {
            base_keys.extend(file.keys());
        }
        for file in files {
            if file.culture_matches(base_culture) {
                continue;
            }
            // An orphan is a translation whose key no longer exists in any
            // base file. Walking the file's entries keeps report order
            // deterministic.
            for entry in &file.entries {
                if !base_keys.contains(entry.key.as_str()) {
                    report.push(
                        CheckRule::NoOrphanKeys,
                        file,
                        Some(&entry.key),
                        format!(
                            "key '{}' in culture '{}' does not exist in base culture '{}'",
                            entry.key,
                            file.culture.as_deref().unwrap_or("?"),
                            base_culture
                        ),
                        Severity::Warning,
                    );
                }
            }
        }
    }

    if options.is_enabled(CheckRule::ConsistentPlaceholders) {
        let regex = get_regex(options.placeholder_pattern.as_deref())?;

        // Last base file wins when the same key shows up twice.
        let mut base_placeholders: HashMap<&str, Vec<String>> = HashMap::new();
        for file in &base_files {
            for entry in &file.entries {
                base_placeholders.insert(
                    entry.key.as_str(),
                    extract_placeholders(entry.value.as_deref(), &regex),
                );
            }
        }

        for file in files {
            if file.culture_matches(base_culture) {
                continue;
            }
            for entry in &file.entries {
                let Some(expected) = base_placeholders.get(entry.key.as_str()) else {
                    continue;
                };
                let found = extract_placeholders(entry.value.as_deref(), &regex);
                if &found != expected {
                    report.push(
                        CheckRule::ConsistentPlaceholders,
                        file,
                        Some(&entry.key),
                        format!(
                            "placeholders of '{}' differ from culture '{}': expected [{}], found [{}]",
                            entry.key,
                            base_culture,
                            expected.join(", "),
                            found.join(", ")
                        ),
                        Severity::Error,
                    );
                }
            }
        }
    }

    Ok(report)
}

/// Check a file or every supported file under a directory.
///
/// Files that fail to parse surface as errors; unsupported files in a
/// directory are skipped silently.
pub fn check_path(
    registry: &FormatRegistry,
    path: &Path,
    options: &CheckOptions,
) -> Result<CheckReport, Error> {
    if !path.exists() {
        return Err(Error::Path(format!(
            "check path does not exist: {}",
            path.display()
        )));
    }
    if path.is_file() {
        let handler = registry
            .handler_for_path(path)
            .ok_or_else(|| Error::UnknownFormat(path.display().to_string()))?;
        let file = handler.read_from(path)?;
        return check_files(std::slice::from_ref(&file), options);
    }

    let mut files = Vec::new();
    for candidate in registry.supported_files(path, options.recursive) {
        if let Some(cancel) = &options.cancel {
            if cancel.is_cancelled() {
                break;
            }
        }
        let Some(handler) = registry.handler_for_path(&candidate) else {
            continue;
        };
        // A directory sweep tolerates individual bad files.
        if let Ok(file) = handler.read_from(&candidate) {
            files.push(file);
        }
    }
    check_files(&files, options)
}
