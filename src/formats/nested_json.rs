//! Nested i18n JSON dialect (`.i18n.json`): objects nest arbitrarily and
//! composite keys are flattened to dot-delimited strings in the canonical
//! model, then unflattened again on write.

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
        "i18n-json"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".i18n.json"]
    }

    fn parse(&self, content: &str, path: &Path) -> Result<LocalizationFile, Error> {
        let map: Map<String, Value> = serde_json::from_str(content)?;

        let mut entries = Vec::new();
        flatten_into("", &map, &mut entries)?;

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
        let mut root = Map::new();
        let mut comments_dropped = 0usize;

        for entry in &file.entries {
            if entry.comment.is_some() {
                comments_dropped += 1;
            }
            let value = match &entry.value {
                Some(v) => Value::String(v.clone()),
                None => Value::Null,
            };
            insert_nested(&mut root, &entry.key, value, &mut warnings);
        }

        if comments_dropped > 0 {
            warnings.push(format!(
                "{} comments dropped (i18n JSON cannot represent comments)",
                comments_dropped
            ));
        }

        serde_json::to_writer_pretty(&mut *writer, &root)?;
        writer.write_all(b"\n").map_err(Error::Io)?;
        Ok(warnings)
    }
}

fn flatten_into(
    prefix: &str,
    map: &Map<String, Value>,
    entries: &mut Vec<LocalizationEntry>,
) -> Result<(), Error> {
    for (key, value) in map {
        let composite = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::Object(inner) => flatten_into(&composite, inner, entries)?,
            Value::Array(_) => {
                return Err(Error::data_mismatch(format!(
                    "array value for key '{}' is not supported",
                    composite
                )));
            }
            other => entries.push(super::json::entry_from_value(composite, other.clone())?),
        }
    }
    Ok(())
}

fn insert_nested(root: &mut Map<String, Value>, key: &str, value: Value, warnings: &mut Vec<String>) {
    let mut parts = key.split('.').peekable();
    let mut current = root;

    while let Some(part) = parts.next() {
        if parts.peek().is_none() {
            if current.contains_key(part) {
                warnings.push(format!("key '{}' overwrote an earlier value", key));
            }
            current.insert(part.to_string(), value);
            return;
        }

        let slot = current
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            // A flat value sat where this composite key needs an object.
            warnings.push(format!(
                "key '{}' replaced a conflicting flat value at '{}'",
                key, part
            ));
            *slot = Value::Object(Map::new());
        }
        current = slot.as_object_mut().unwrap_or_else(|| unreachable!());
    }
}
