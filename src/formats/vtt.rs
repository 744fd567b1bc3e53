//! WebVTT subtitles.
//!
//! Requires the `WEBVTT` signature. Cues keyed by their identifier line when
//! present, otherwise by ordinal position. NOTE, STYLE and REGION blocks are
//! skipped. Writing always emits an identifier line so keys survive a round
//! trip.

use std::{io::Write, path::Path};

use crate::{
    error::Error,
    paths::culture_from_path,
    traits::FormatHandler,
    types::{LocalizationEntry, LocalizationFile},
};

const DEFAULT_TIMING: &str = "00:00:00.000 --> 00:00:00.000";

pub struct Handler;

impl FormatHandler for Handler {
    fn format_id(&self) -> &'static str {
        "vtt"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".vtt"]
    }

    fn parse(&self, content: &str, path: &Path) -> Result<LocalizationFile, Error> {
        let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
        let mut blocks = normalized.split("\n\n");

        let header = blocks.next().unwrap_or_default();
        if !header.trim_start().starts_with("WEBVTT") {
            return Err(Error::data_mismatch("missing WEBVTT signature"));
        }

        let mut entries = Vec::new();
        let mut ordinal = 0usize;

        for block in blocks {
            let lines: Vec<&str> = block
                .lines()
                .map(str::trim_end)
                .skip_while(|line| line.is_empty())
                .collect();
            if lines.is_empty() {
                continue;
            }
            if ["NOTE", "STYLE", "REGION"]
                .iter()
                .any(|marker| lines[0].starts_with(marker))
            {
                continue;
            }

            ordinal += 1;
            let (key, timing_index) = if lines[0].contains("-->") {
                (ordinal.to_string(), 0)
            } else {
                (lines[0].trim().to_string(), 1)
            };

            let timing = lines.get(timing_index).copied().unwrap_or_default();
            if !timing.contains("-->") {
                return Err(Error::data_mismatch(format!(
                    "cue '{}' is missing its timing line",
                    key
                )));
            }

            let text = lines[timing_index + 1..].join("\n");
            entries.push(LocalizationEntry::new(key, text).with_comment(Some(timing.to_string())));
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
        writer.write_all(b"WEBVTT\n").map_err(Error::Io)?;
        let mut warnings = Vec::new();

        for entry in &file.entries {
            writer.write_all(b"\n").map_err(Error::Io)?;
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
        WEBVTT

        intro
        00:00:01.000 --> 00:00:04.000
        Hello there.

        NOTE this block is metadata
        and spans two lines

        00:00:05.000 --> 00:00:08.000
        Anonymous cue.
    "};

    #[test]
    fn test_parse_cues() {
        let file = Handler.parse(SAMPLE, Path::new("movie.en.vtt")).unwrap();
        assert_eq!(file.culture.as_deref(), Some("en"));
        assert_eq!(file.len(), 2);

        let intro = file.entry("intro").unwrap();
        assert_eq!(intro.value_str(), "Hello there.");
        assert_eq!(
            intro.comment.as_deref(),
            Some("00:00:01.000 --> 00:00:04.000")
        );

        // Anonymous cues get an ordinal key. NOTE blocks do not count.
        assert_eq!(file.entry("2").unwrap().value_str(), "Anonymous cue.");
    }

    #[test]
    fn test_missing_signature_is_rejected() {
        let content = "1\n00:00:01.000 --> 00:00:02.000\nText\n";
        assert!(Handler.parse(content, Path::new("x.vtt")).is_err());
    }

    #[test]
    fn test_missing_timing_is_rejected() {
        let content = "WEBVTT\n\nident\nText without timing\n";
        assert!(Handler.parse(content, Path::new("x.vtt")).is_err());
    }

    #[test]
    fn test_write_round_trip() {
        let file = Handler.parse(SAMPLE, Path::new("movie.vtt")).unwrap();
        let mut out = Vec::new();
        let warnings = Handler.write(&file, &mut out).unwrap();
        assert!(warnings.is_empty());

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("WEBVTT\n"));

        let reparsed = Handler.parse(&text, Path::new("movie.vtt")).unwrap();
        assert_eq!(file.entries, reparsed.entries);
    }
}
