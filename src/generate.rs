//! Scaffolding target-culture files from a base culture.
//!
//! Every key of the base file is carried over; missing translations get a
//! policy value. Existing target files are merged instead of clobbered unless
//! overwriting is requested.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    paths::{culture_from_path, generate_target_path},
    registry::FormatRegistry,
    types::{CancelFlag, LocalizationEntry, LocalizationFile},
};

/// Placeholder written for untranslated keys. `{value}` expands to the base
/// culture's value so translators see what they are translating.
pub const DEFAULT_MISSING_PLACEHOLDER: &str = "@@MISSING@@ {value}";

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub base_culture: String,
    pub target_culture: String,
    pub missing_placeholder: String,
    pub use_empty_value: bool,
    pub overwrite_existing: bool,
    pub recursive: bool,
    pub cancel: Option<CancelFlag>,
}

impl GenerateOptions {
    pub fn new(base_culture: impl Into<String>, target_culture: impl Into<String>) -> Self {
        Self {
            base_culture: base_culture.into(),
            target_culture: target_culture.into(),
            missing_placeholder: DEFAULT_MISSING_PLACEHOLDER.to_string(),
            use_empty_value: false,
            overwrite_existing: false,
            recursive: false,
            cancel: None,
        }
    }

    pub fn with_missing_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.missing_placeholder = placeholder.into();
        self
    }

    pub fn with_empty_value(mut self, use_empty_value: bool) -> Self {
        self.use_empty_value = use_empty_value;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite_existing = overwrite;
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn placeholder_value(&self, base_value: &str) -> String {
        if self.use_empty_value {
            String::new()
        } else {
            self.missing_placeholder.replace("{value}", base_value)
        }
    }
}

/// Outcome for one generated file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResult {
    pub file_path: std::path::PathBuf,
    pub created: bool,
    pub keys_added: usize,
    pub keys_skipped: usize,
    pub error_message: Option<String>,
}

impl GenerateResult {
    pub fn success(&self) -> bool {
        self.error_message.is_none()
    }

    fn failure(path: impl Into<std::path::PathBuf>, message: impl Into<String>) -> Self {
        Self {
            file_path: path.into(),
            created: false,
            keys_added: 0,
            keys_skipped: 0,
            error_message: Some(message.into()),
        }
    }
}

/// Generate target-culture files from `source` (a base-culture file or a
/// directory of localization files) into `output_dir`.
///
/// One result per processed file; a failing file never aborts the batch.
pub fn generate(
    registry: &FormatRegistry,
    source: &Path,
    output_dir: &Path,
    options: &GenerateOptions,
) -> Vec<GenerateResult> {
    if !source.exists() {
        return vec![GenerateResult::failure(
            source,
            format!("source path does not exist: {}", source.display()),
        )];
    }

    let base_files: Vec<std::path::PathBuf> = if source.is_file() {
        match culture_from_path(source) {
            Some(culture) if culture.eq_ignore_ascii_case(&options.base_culture) => {
                vec![source.to_path_buf()]
            }
            _ => return Vec::new(),
        }
    } else {
        registry
            .supported_files(source, options.recursive)
            .into_iter()
            .filter(|file| {
                culture_from_path(file)
                    .is_some_and(|c| c.eq_ignore_ascii_case(&options.base_culture))
            })
            .collect()
    };

    let mut results = Vec::new();
    for base_path in base_files {
        if let Some(cancel) = &options.cancel {
            if cancel.is_cancelled() {
                break;
            }
        }
        results.push(generate_one(registry, &base_path, source, output_dir, options));
    }
    results
}

fn generate_one(
    registry: &FormatRegistry,
    base_path: &Path,
    source_root: &Path,
    output_dir: &Path,
    options: &GenerateOptions,
) -> GenerateResult {
    let Some(handler) = registry.handler_for_path(base_path) else {
        return GenerateResult::failure(
            base_path,
            format!("no handler for {}", base_path.display()),
        );
    };

    let base = match handler.read_from(base_path) {
        Ok(file) => file,
        Err(err) => {
            return GenerateResult::failure(
                base_path,
                format!("failed to parse {}: {}", base_path.display(), err),
            );
        }
    };

    let target_path = match generate_target_path(
        base_path,
        source_root,
        output_dir,
        &options.base_culture,
        &options.target_culture,
    ) {
        Ok(path) => path,
        Err(err) => return GenerateResult::failure(base_path, err.to_string()),
    };

    let target_exists = target_path.exists();
    if target_exists && !options.overwrite_existing {
        // Merge: keep every existing translation, append what is missing.
        let mut target = match handler.read_from(&target_path) {
            Ok(file) => file,
            Err(err) => {
                return GenerateResult::failure(
                    &target_path,
                    format!("failed to parse {}: {}", target_path.display(), err),
                );
            }
        };

        let mut added = 0;
        let mut skipped = 0;
        for entry in &base.entries {
            if target.contains_key(&entry.key) {
                skipped += 1;
                continue;
            }
            target.push_entry(scaffold_entry(entry, options));
            added += 1;
        }

        return match handler.write_to(&target, &target_path) {
            Ok(_) => GenerateResult {
                file_path: target_path,
                created: false,
                keys_added: added,
                keys_skipped: skipped,
                error_message: None,
            },
            Err(err) => GenerateResult::failure(&target_path, err.to_string()),
        };
    }

    let entries: Vec<LocalizationEntry> =
        base.entries.iter().map(|e| scaffold_entry(e, options)).collect();
    let added = entries.len();
    let target = LocalizationFile::new(
        &target_path,
        Some(options.target_culture.clone()),
        base.format.clone(),
        entries,
    );

    match handler.write_to(&target, &target_path) {
        Ok(_) => GenerateResult {
            file_path: target_path,
            created: !target_exists,
            keys_added: added,
            keys_skipped: 0,
            error_message: None,
        },
        Err(err) => GenerateResult::failure(&target_path, err.to_string()),
    }
}

fn scaffold_entry(base: &LocalizationEntry, options: &GenerateOptions) -> LocalizationEntry {
    LocalizationEntry::new(&base.key, options.placeholder_value(base.value_str()))
        .with_comment(base.comment.clone())
        .with_source(base.value.clone())
}
