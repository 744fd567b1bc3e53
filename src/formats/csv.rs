//! Headerless CSV: `key,value[,comment]` per record.

use std::{io::Write, path::Path};

use crate::{
    error::Error,
    paths::culture_from_path,
    traits::FormatHandler,
    types::{LocalizationEntry, LocalizationFile},
};

pub struct Handler;

impl FormatHandler for Handler {
    fn format_id(&self) -> &'static str {
        "csv"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".csv"]
    }

    fn parse(&self, content: &str, path: &Path) -> Result<LocalizationFile, Error> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut entries = Vec::new();
        for record in reader.records() {
            let record = record?;
            let key = match record.get(0) {
                Some(key) if !key.is_empty() => key.to_string(),
                _ => continue,
            };
            let value = record.get(1).map(str::to_string);
            let comment = record
                .get(2)
                .filter(|comment| !comment.is_empty())
                .map(str::to_string);
            entries.push(LocalizationEntry {
                key,
                value,
                comment,
                source: None,
            });
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
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(writer);

        let mut warnings = Vec::new();
        for entry in &file.entries {
            if entry.value.is_none() {
                warnings.push(format!(
                    "key '{}' has no value, wrote an empty field",
                    entry.key
                ));
            }
            match &entry.comment {
                Some(comment) => {
                    csv_writer.write_record([&entry.key, entry.value_str(), comment])?
                }
                None => csv_writer.write_record([&entry.key, entry.value_str()])?,
            }
        }
        csv_writer.flush().map_err(Error::Io)?;

        Ok(warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const SAMPLE: &str = indoc! {r#"
        Greeting,Hello,Shown on startup
        Farewell,Goodbye
        "Quoted,Key","value with ""quotes"""
    "#};

    #[test]
    fn test_parse_records() {
        let file = Handler.parse(SAMPLE, Path::new("app.en.csv")).unwrap();
        assert_eq!(file.culture.as_deref(), Some("en"));
        assert_eq!(file.len(), 3);

        let greeting = file.entry("Greeting").unwrap();
        assert_eq!(greeting.value_str(), "Hello");
        assert_eq!(greeting.comment.as_deref(), Some("Shown on startup"));

        assert!(file.entry("Farewell").unwrap().comment.is_none());
        assert_eq!(
            file.entry("Quoted,Key").unwrap().value_str(),
            r#"value with "quotes""#
        );
    }

    #[test]
    fn test_key_only_record_has_no_value() {
        let file = Handler.parse("Lonely\n", Path::new("x.csv")).unwrap();
        let entry = file.entry("Lonely").unwrap();
        assert_eq!(entry.value, None);
        assert!(entry.is_empty());
    }

    #[test]
    fn test_empty_key_records_are_skipped() {
        let file = Handler.parse(",orphan value\n", Path::new("x.csv")).unwrap();
        assert!(file.is_empty());
    }

    #[test]
    fn test_write_absent_value_warns() {
        let file = LocalizationFile::new(
            "x.csv",
            None,
            "csv",
            vec![
                LocalizationEntry::without_value("Lonely"),
                LocalizationEntry::new("Filled", "v"),
            ],
        );
        let mut out = Vec::new();
        let warnings = Handler.write(&file, &mut out).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Lonely"));

        // The absent value comes back as an empty string.
        let reparsed = Handler
            .parse(std::str::from_utf8(&out).unwrap(), Path::new("x.csv"))
            .unwrap();
        assert_eq!(reparsed.entry("Lonely").unwrap().value.as_deref(), Some(""));
    }

    #[test]
    fn test_write_round_trip() {
        let file = Handler.parse(SAMPLE, Path::new("app.csv")).unwrap();
        let mut out = Vec::new();
        Handler.write(&file, &mut out).unwrap();

        let reparsed = Handler
            .parse(std::str::from_utf8(&out).unwrap(), Path::new("app.csv"))
            .unwrap();
        assert_eq!(file.entries, reparsed.entries);
    }
}
