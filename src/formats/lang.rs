//! Legacy `.lang` key=value files (Minecraft-style). Read-only: conversions
//! out of this format are supported, conversions into it are not.

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
        "lang"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".lang"]
    }

    fn parse(&self, content: &str, path: &Path) -> Result<LocalizationFile, Error> {
        let mut entries = Vec::new();
        let mut pending_comment: Vec<String> = Vec::new();

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                pending_comment.clear();
                continue;
            }
            if let Some(comment) = trimmed.strip_prefix('#') {
                pending_comment.push(comment.trim().to_string());
                continue;
            }

            let Some((key, value)) = trimmed.split_once('=') else {
                // Lines without a separator carry no translation, skip them.
                pending_comment.clear();
                continue;
            };
            let comment = if pending_comment.is_empty() {
                None
            } else {
                Some(pending_comment.join("\n"))
            };
            pending_comment.clear();
            entries.push(LocalizationEntry {
                key: key.trim().to_string(),
                value: Some(value.trim().to_string()),
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
        _file: &LocalizationFile,
        _writer: &mut dyn Write,
    ) -> Result<Vec<String>, Error> {
        Err(Error::unsupported_format(
            "lang files are read-only, convert to another format instead",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const SAMPLE: &str = indoc! {"
        # Main menu
        menu.title=My Game
        menu.quit=Quit

        item.sword.name=Sword
        stray line without separator
    "};

    #[test]
    fn test_parse_key_values() {
        let file = Handler.parse(SAMPLE, Path::new("en_us.lang")).unwrap();
        assert_eq!(file.len(), 3);

        let title = file.entry("menu.title").unwrap();
        assert_eq!(title.value_str(), "My Game");
        assert_eq!(title.comment.as_deref(), Some("Main menu"));

        assert!(file.entry("menu.quit").unwrap().comment.is_none());
        assert_eq!(file.entry("item.sword.name").unwrap().value_str(), "Sword");
    }

    #[test]
    fn test_write_is_unsupported() {
        let file = Handler.parse(SAMPLE, Path::new("x.lang")).unwrap();
        let mut out = Vec::new();
        assert!(matches!(
            Handler.write(&file, &mut out),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_value_may_contain_equals() {
        let file = Handler.parse("formula=a = b\n", Path::new("x.lang")).unwrap();
        assert_eq!(file.entry("formula").unwrap().value_str(), "a = b");
    }
}
