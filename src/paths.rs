//! Path derivation helpers: multi-part extension handling, target-language
//! path generation, and filename-based culture inference.

use std::path::{Path, PathBuf};

use crate::{error::Error, types::path_file_name, types::resolve_culture};

/// Known multi-part extensions, checked as whole suffixes before the plain
/// last-dot extension. Longest first.
pub const MULTIPART_EXTENSIONS: &[&str] = &[".i18n.json"];

/// Splits a file name into `(name_without_extension, extension)`.
///
/// Multi-part extensions are matched case-insensitively as a unit, so
/// `"app.en.i18n.json"` splits into `("app.en", ".i18n.json")` rather than
/// `("app.en.i18n", ".json")`.
pub fn split_extension(file_name: &str) -> (&str, &str) {
    let lower = file_name.to_ascii_lowercase();
    for ext in MULTIPART_EXTENSIONS {
        if lower.ends_with(ext) && file_name.len() > ext.len() {
            let cut = file_name.len() - ext.len();
            return (&file_name[..cut], &file_name[cut..]);
        }
    }
    match file_name.rfind('.') {
        Some(pos) if pos > 0 => (&file_name[..pos], &file_name[pos..]),
        _ => (file_name, ""),
    }
}

/// Derives the output path for a target culture from a source file path.
///
/// The target file name is built from the source name:
/// - `app.en.json` with source `en` becomes `app.tr.json`
/// - `en.json` (bare culture name) becomes `tr.json`
/// - `app.json` (no culture suffix) becomes `app.tr.json`
///
/// When `input_path` is a directory, the source file's position relative to
/// it is preserved under `output_path`. Missing intermediate directories are
/// created as a side effect.
pub fn generate_target_path(
    source_file: &Path,
    input_path: &Path,
    output_path: &Path,
    source_culture: &str,
    target_culture: &str,
) -> Result<PathBuf, Error> {
    let file_name = path_file_name(source_file);
    if file_name.is_empty() {
        return Err(Error::Path(format!(
            "source path has no file name: {}",
            source_file.display()
        )));
    }

    let (stem, extension) = split_extension(file_name);
    let culture_suffix = format!(".{}", source_culture.to_ascii_lowercase());
    let stem_lower = stem.to_ascii_lowercase();

    let target_file_name = if stem_lower.ends_with(&culture_suffix) {
        let base = &stem[..stem.len() - culture_suffix.len()];
        format!("{}.{}{}", base, target_culture, extension)
    } else if stem_lower == source_culture.to_ascii_lowercase() {
        format!("{}{}", target_culture, extension)
    } else {
        format!("{}.{}{}", stem, target_culture, extension)
    };

    let relative = if input_path.is_dir() {
        source_file
            .parent()
            .and_then(|parent| parent.strip_prefix(input_path).ok())
            .unwrap_or(Path::new(""))
    } else {
        Path::new("")
    };

    let target = output_path.join(relative).join(target_file_name);
    if let Some(parent) = target.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(Error::Io)?;
    }
    Ok(target)
}

/// Infers a culture from a file name convention.
///
/// The last dot-segment of the extension-stripped stem (`app.en.json` ->
/// `en`), or the whole stem when it is itself a locale (`en.json`). Anything
/// that does not validate as a locale identifier yields `None`.
pub fn culture_from_file_name(file_name: &str) -> Option<String> {
    let (stem, _) = split_extension(file_name);
    let candidate = match stem.rfind('.') {
        Some(pos) => &stem[pos + 1..],
        None => stem,
    };
    resolve_culture(candidate).map(|_| candidate.to_string())
}

/// Infers a culture from the file name of a path.
pub fn culture_from_path(path: &Path) -> Option<String> {
    culture_from_file_name(path_file_name(path))
}
