//! SubRip subtitles.
//!
//! Each cue becomes one entry: the numeric cue index is the key, the timing
//! line is kept as the comment, and the text lines become the value. A
//! placeholder timing is written for entries that lost their comment.

use std::{io::Write, path::Path};

use crate::{
    error::Error,
    paths::culture_from_path,
    traits::FormatHandler,
    types::{LocalizationEntry, LocalizationFile},
};

const DEFAULT_TIMING: &str = "00:00:00,000 --> 00:00:00,000";

pub struct Handler;

impl FormatHandler for Handler {
    fn format_id(&self) -> &'static str {
        "srt"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".srt"]
    }

    fn parse(&self, content: &str, path: &Path) -> Result<LocalizationFile, Error> {
        let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
        let mut entries = Vec::new();

        for block in normalized.split("\n\n") {
            let lines: Vec<&str> = block.lines().map(str::trim_end).collect();
            let lines: Vec<&str> = lines
                .into_iter()
                .skip_while(|line| line.is_empty())
                .collect();
            if lines.is_empty() {
                continue;
            }

            let index = lines[0].trim();
            if index.is_empty() || !index.chars().all(|c| c.is_ascii_digit()) {
                return Err(Error::data_mismatch(format!(
                    "expected numeric cue index, found: {}",
                    lines[0]
                )));
            }

            let timing = lines.get(1).copied().unwrap_or_default();
            if !timing.contains("-->") {
                return Err(Error::data_mismatch(format!(
                    "cue {} is missing its timing line",
                    index
                )));
            }

            let text = lines[2..].join("\n");
            entries.push(
                LocalizationEntry::new(index, text).with_comment(Some(timing.to_string())),
            );
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

        for (i, entry) in file.entries.iter().enumerate() {
            if i > 0 {
                writer.write_all(b"\n").map_err(Error::Io)?;
            }
            let timing = match &entry.comment {
                Some(comment) if comment.contains("-->") => comment.as_str(),
                _ => {
                    warnings.push(format!(
                        "cue '{}' has no timing information, wrote a zero timing",
                        entry.key
                    ));
                    DEFAULT_TIMING
                }
            };
            writeln!(writer, "{}", entry.key).map_err(Error::Io)?;
            writeln!(writer, "{}", timing).map_err(Error::Io)?;
            writeln!(writer, "{}", entry.value_str()).map_err(Error::Io)?;
        }

        Ok(warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const SAMPLE: &str = indoc! {"
        1
        00:00:01,000 --> 00:00:04,000
        Hello there.

        2
        00:00:05,000 --> 00:00:08,000
        Two lines
        of dialogue.
    "};

    #[test]
    fn test_parse_cues() {
        let file = Handler.parse(SAMPLE, Path::new("movie.en.srt")).unwrap();
        assert_eq!(file.culture.as_deref(), Some("en"));
        assert_eq!(file.len(), 2);

        let first = file.entry("1").unwrap();
        assert_eq!(first.value_str(), "Hello there.");
        assert_eq!(
            first.comment.as_deref(),
            Some("00:00:01,000 --> 00:00:04,000")
        );

        assert_eq!(file.entry("2").unwrap().value_str(), "Two lines\nof dialogue.");
    }

    #[test]
    fn test_parse_crlf() {
        let crlf = SAMPLE.replace('\n', "\r\n");
        let file = Handler.parse(&crlf, Path::new("movie.srt")).unwrap();
        assert_eq!(file.len(), 2);
        assert_eq!(file.entry("1").unwrap().value_str(), "Hello there.");
    }

    #[test]
    fn test_non_numeric_index_is_rejected() {
        let content = "not-a-number\n00:00:01,000 --> 00:00:02,000\nText\n";
        assert!(Handler.parse(content, Path::new("x.srt")).is_err());
    }

    #[test]
    fn test_missing_timing_is_rejected() {
        let content = "1\nText without timing\n";
        assert!(Handler.parse(content, Path::new("x.srt")).is_err());
    }

    #[test]
    fn test_write_round_trip() {
        let file = Handler.parse(SAMPLE, Path::new("movie.srt")).unwrap();
        let mut out = Vec::new();
        let warnings = Handler.write(&file, &mut out).unwrap();
        assert!(warnings.is_empty());

        let reparsed = Handler
            .parse(std::str::from_utf8(&out).unwrap(), Path::new("movie.srt"))
            .unwrap();
        assert_eq!(file.entries, reparsed.entries);
    }

    #[test]
    fn test_write_without_timing_warns() {
        let file = LocalizationFile::new(
            "x.srt",
            None,
            "srt",
            vec![LocalizationEntry::new("1", "Hi")],
        );
        let mut out = Vec::new();
        let warnings = Handler.write(&file, &mut out).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(String::from_utf8(out).unwrap().contains(DEFAULT_TIMING));
    }
}
