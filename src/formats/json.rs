//! Flat JSON localization files: one object mapping keys to string values.
//!
//! Nested objects are deliberately rejected here; the `.i18n.json` dialect
//! in [`super::nested_json`] owns those.

use std::{io::Write, path::Path};

use serde_json::{Map, Value};

use crate::{
    error::Error,
    paths::culture_from_path,
    traits::FormatHandler,
    types::{LocalizationEntry, LocalizationFile},
};

pub struct Handler;

impl FormatHandler for Handler {
    fn format_id(&self) -> &'static str {
        "json"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".json"]
    }

    fn parse(&self, content: &str, path: &Path) -> Result<LocalizationFile, Error> {
        let map: Map<String, Value> = serde_json::from_str(content)?;

        let mut entries = Vec::with_capacity(map.len());
        for (key, value) in map {
            entries.push(entry_from_value(key, value)?);
        }

        Ok(LocalizationFile::new(
            path,
            culture_from_path(path),
            self.format_id(),
            entries,
        ))
    }

    fn write(
        &self,
        file: &LocalizationFile,
        writer: &mut dyn Write,
    ) -> Result<Vec<String>, Error> {
        let mut warnings = Vec::new();
        let mut map = Map::with_capacity(file.entries.len());
        let mut comments_dropped = 0usize;

        for entry in &file.entries {
            if entry.comment.is_some() {
                comments_dropped += 1;
            }
            let value = match &entry.value {
                Some(v) => Value::String(v.clone()),
                None => Value::Null,
            };
            map.insert(entry.key.clone(), value);
        }

        if map.len() != file.entries.len() {
            warnings.push(format!(
                "{} duplicate keys collapsed (JSON objects cannot repeat keys)",
                file.entries.len() - map.len()
            ));
        }
        if comments_dropped > 0 {
            warnings.push(format!(
                "{} comments dropped (flat JSON cannot represent comments)",
                comments_dropped
            ));
        }

        serde_json::to_writer_pretty(&mut *writer, &map)?;
        writer.write_all(b"\n").map_err(Error::Io)?;
        Ok(warnings)
    }
}

pub(crate) fn entry_from_value(key: String, value: Value) -> Result<LocalizationEntry, Error> {
    match value {
        Value::Null => Ok(LocalizationEntry::without_value(key)),
        Value::String(s) => Ok(LocalizationEntry::new(key, s)),
        Value::Bool(b) => Ok(LocalizationEntry::new(key, b.to_string())),
        Value::Number(n) => Ok(LocalizationEntry::new(key, n.to_string())),
        Value::Object(_) | Value::Array(_) => Err(Error::data_mismatch(format!(
            "value for key '{}' is not a scalar; nested resources belong in .i18n.json",
            key
        ))),
    }
}
