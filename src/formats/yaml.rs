//! YAML localization files. Nested mappings are flattened to dot-delimited
//! keys on parse; writing emits a flat mapping with the composite keys.

use std::{io::Write, path::Path};

use serde_yaml::{Mapping, Value};

use crate::{
    error::Error,
    paths::culture_from_path,
    traits::FormatHandler,
    types::{LocalizationEntry, LocalizationFile},
};

pub struct Handler;

impl FormatHandler for Handler {
    fn format_id(&self) -> &'static str {
        "yaml"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".yaml", ".yml"]
    }

    fn parse(&self, content: &str, path: &Path) -> Result<LocalizationFile, Error> {
        let mapping: Mapping = serde_yaml::from_str(content)?;

        let mut entries = Vec::new();
        flatten_into("", &mapping, &mut entries)?;

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
        let mut mapping = Mapping::with_capacity(file.entries.len());
        let mut comments_dropped = 0usize;

        for entry in &file.entries {
            if entry.comment.is_some() {
                comments_dropped += 1;
            }
            let value = match &entry.value {
                Some(v) => Value::String(v.clone()),
                None => Value::Null,
            };
            mapping.insert(Value::String(entry.key.clone()), value);
        }

        if mapping.len() != file.entries.len() {
            warnings.push(format!(
                "{} duplicate keys collapsed (YAML mappings cannot repeat keys)",
                file.entries.len() - mapping.len()
            ));
        }
        if comments_dropped > 0 {
            warnings.push(format!("{} comments dropped", comments_dropped));
        }

        serde_yaml::to_writer(writer, &mapping)?;
        Ok(warnings)
    }
}

fn flatten_into(
    prefix: &str,
    mapping: &Mapping,
    entries: &mut Vec<LocalizationEntry>,
) -> Result<(), Error> {
    for (key, value) in mapping {
        let Some(key) = key.as_str() else {
            return Err(Error::data_mismatch(format!(
                "non-string mapping key under '{}'",
                if prefix.is_empty() { "<root>" } else { prefix }
            )));
        };
        let composite = if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::Mapping(inner) => flatten_into(&composite, inner, entries)?,
            Value::Null => entries.push(LocalizationEntry::without_value(composite)),
            Value::String(s) => entries.push(LocalizationEntry::new(composite, s.clone())),
            Value::Bool(b) => entries.push(LocalizationEntry::new(composite, b.to_string())),
            Value::Number(n) => entries.push(LocalizationEntry::new(composite, n.to_string())),
            Value::Sequence(_) | Value::Tagged(_) => {
                return Err(Error::data_mismatch(format!(
                    "unsupported value for key '{}'",
                    composite
                )));
            }
        }
    }
    Ok(())
}
