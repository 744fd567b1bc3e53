//! Converting localization files between formats.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    paths::split_extension,
    registry::FormatRegistry,
    types::{CancelFlag, path_file_name},
};

#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Source format id; when unset the source file's extension decides.
    pub from_format: Option<String>,
    /// Target format id or extension.
    pub to_format: String,
    /// Overwrite an existing destination file.
    pub force: bool,
    /// Override the culture carried into the destination file.
    pub culture: Option<String>,
    pub recursive: bool,
    pub cancel: Option<CancelFlag>,
}

impl ConvertOptions {
    pub fn new(to_format: impl Into<String>) -> Self {
        ConvertOptions {
            to_format: to_format.into(),
            ..Default::default()
        }
    }

    pub fn with_from_format(mut self, from_format: impl Into<String>) -> Self {
        self.from_format = Some(from_format.into());
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_culture(mut self, culture: impl Into<String>) -> Self {
        self.culture = Some(culture.into());
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
}

/// Outcome for one converted file. Warnings come from the target format's
/// writer (lossy representations, renamed keys and so on).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertResult {
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
    pub success: bool,
    pub error_message: Option<String>,
    pub warnings: Vec<String>,
}

impl ConvertResult {
    fn ok(source: &Path, destination: &Path, warnings: Vec<String>) -> Self {
        ConvertResult {
            source_path: source.to_path_buf(),
            destination_path: destination.to_path_buf(),
            success: true,
            error_message: None,
            warnings,
        }
    }

    fn failure(source: &Path, destination: &Path, message: impl Into<String>) -> Self {
        ConvertResult {
            source_path: source.to_path_buf(),
            destination_path: destination.to_path_buf(),
            success: false,
            error_message: Some(message.into()),
            warnings: Vec::new(),
        }
    }
}

/// Converts a single file to `destination`. Never returns `Err` for per-file
/// problems; those land in the result's `error_message`.
pub fn convert_file(
    registry: &FormatRegistry,
    source: &Path,
    destination: &Path,
    options: &ConvertOptions,
) -> ConvertResult {
    let source_handler = match &options.from_format {
        Some(id) => registry.handler_for_id(id),
        None => registry.handler_for_path(source),
    };
    let Some(source_handler) = source_handler else {
        return ConvertResult::failure(
            source,
            destination,
            format!("cannot determine format of {}", source.display()),
        );
    };

    let Some(target_handler) = registry.handler_for_id(&options.to_format) else {
        return ConvertResult::failure(
            source,
            destination,
            format!("unsupported target format: {}", options.to_format),
        );
    };

    if destination.exists() && !options.force {
        return ConvertResult::failure(
            source,
            destination,
            format!("destination already exists: {}", destination.display()),
        );
    }

    let mut file = match source_handler.read_from(source) {
        Ok(file) => file,
        Err(err) => return ConvertResult::failure(source, destination, err.to_string()),
    };
    if let Some(culture) = &options.culture {
        file.culture = Some(culture.clone());
    }
    file.format = target_handler.format_id().to_string();

    match target_handler.write_to(&file, destination) {
        Ok(warnings) => ConvertResult::ok(source, destination, warnings),
        Err(err) => ConvertResult::failure(source, destination, err.to_string()),
    }
}

/// Converts every supported file under `source_dir` into `output_dir`,
/// preserving the directory structure and swapping extensions for the target
/// format's primary extension.
pub fn convert_directory(
    registry: &FormatRegistry,
    source_dir: &Path,
    output_dir: &Path,
    options: &ConvertOptions,
) -> Vec<ConvertResult> {
    if !source_dir.is_dir() {
        return vec![ConvertResult::failure(
            source_dir,
            output_dir,
            format!("not a directory: {}", source_dir.display()),
        )];
    }

    let Some(target_handler) = registry.handler_for_id(&options.to_format) else {
        return vec![ConvertResult::failure(
            source_dir,
            output_dir,
            format!("unsupported target format: {}", options.to_format),
        )];
    };
    let target_extension = target_handler.extensions()[0];

    let mut results = Vec::new();
    for source in registry.supported_files(source_dir, options.recursive) {
        if let Some(cancel) = &options.cancel {
            if cancel.is_cancelled() {
                break;
            }
        }

        let relative_dir = source
            .parent()
            .and_then(|parent| parent.strip_prefix(source_dir).ok())
            .unwrap_or(Path::new(""));
        let (stem, _) = split_extension(path_file_name(&source));
        let destination = output_dir
            .join(relative_dir)
            .join(format!("{}{}", stem, target_extension));

        results.push(convert_file(registry, &source, &destination, options));
    }
    results
}
