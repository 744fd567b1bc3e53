//! Gettext PO catalogs.
//!
//! `msgid` is the entry key, `msgstr` the value. Translator comments (`#`)
//! and extracted comments (`#.`) are kept; references and flags are not.
//! The header entry (empty msgid) supplies the `Language:` culture and is
//! not emitted as an entry. Plural blocks carry only `msgstr[0]`.

use std::{io::Write, path::Path};

use indoc::formatdoc;

use crate::{
    error::Error,
    paths::culture_from_path,
    traits::FormatHandler,
    types::{LocalizationEntry, LocalizationFile},
};

pub struct Handler;

impl FormatHandler for Handler {
    fn format_id(&self) -> &'static str {
        "po"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".po", ".pot"]
    }

    fn parse(&self, content: &str, path: &Path) -> Result<LocalizationFile, Error> {
        let mut entries = Vec::new();
        let mut culture: Option<String> = None;
        let mut block = Block::default();
        let mut saw_keyword = false;

        for line in content.lines().chain(std::iter::once("")) {
            let trimmed = line.trim();

            if trimmed.is_empty() {
                block.finish(&mut entries, &mut culture);
                continue;
            }

            if let Some(comment) = trimmed.strip_prefix("#.") {
                block.push_comment(comment.trim());
            } else if let Some(comment) = trimmed.strip_prefix('#') {
                // Skip references (#:), flags (#,) and previous-string (#|)
                // markers; keep plain translator comments.
                if !comment.starts_with([':', ',', '|', '~']) {
                    block.push_comment(comment.trim());
                }
            } else if let Some(rest) = trimmed.strip_prefix("msgid_plural") {
                block.section = Section::Ignored;
                let _ = parse_po_string(rest.trim())?;
            } else if let Some(rest) = trimmed.strip_prefix("msgid") {
                saw_keyword = true;
                block.section = Section::Id;
                block.id.push_str(&parse_po_string(rest.trim())?);
            } else if let Some(rest) = trimmed.strip_prefix("msgstr[0]") {
                block.section = Section::PluralStr;
                block.plural_str.push_str(&parse_po_string(rest.trim())?);
            } else if trimmed.starts_with("msgstr[") {
                block.section = Section::Ignored;
            } else if let Some(rest) = trimmed.strip_prefix("msgstr") {
                saw_keyword = true;
                block.section = Section::Str;
                block.str.push_str(&parse_po_string(rest.trim())?);
                block.has_str = true;
            } else if let Some(rest) = trimmed.strip_prefix("msgctxt") {
                block.section = Section::Ignored;
                let _ = parse_po_string(rest.trim())?;
            } else if trimmed.starts_with('"') {
                let continued = parse_po_string(trimmed)?;
                match block.section {
                    Section::Id => block.id.push_str(&continued),
                    Section::Str => block.str.push_str(&continued),
                    Section::PluralStr => block.plural_str.push_str(&continued),
                    Section::Ignored | Section::None => {}
                }
            } else {
                return Err(Error::data_mismatch(format!(
                    "unrecognized PO line: {}",
                    trimmed
                )));
            }
        }

        if !saw_keyword && !content.trim().is_empty() {
            return Err(Error::data_mismatch("no msgid/msgstr found"));
        }

        let culture = culture.or_else(|| culture_from_path(path));
        Ok(LocalizationFile::new(
            path,
            culture,
            self.format_id(),
            entries,
        ))
    }

    fn write(
        &self,
        file: &LocalizationFile,
        writer: &mut dyn Write,
    ) -> Result<Vec<String>, Error> {
        let header = formatdoc! {r#"
            msgid ""
            msgstr ""
            "Content-Type: text/plain; charset=UTF-8\n"
            "Language: {language}\n"
        "#,
            language = file.culture.as_deref().unwrap_or("")
        };
        writer.write_all(header.as_bytes()).map_err(Error::Io)?;

        for entry in &file.entries {
            writer.write_all(b"\n").map_err(Error::Io)?;
            if let Some(comment) = &entry.comment {
                for line in comment.lines() {
                    writeln!(writer, "#. {}", line).map_err(Error::Io)?;
                }
            }
            writeln!(writer, "msgid \"{}\"", escape_po(&entry.key)).map_err(Error::Io)?;
            writeln!(writer, "msgstr \"{}\"", escape_po(entry.value_str())).map_err(Error::Io)?;
        }

        Ok(Vec::new())
    }
}

#[derive(Default, Clone, Copy, PartialEq)]
enum Section {
    #[default]
    None,
    Id,
    Str,
    PluralStr,
    Ignored,
}

#[derive(Default)]
struct Block {
    id: String,
    str: String,
    plural_str: String,
    has_str: bool,
    comments: Vec<String>,
    section: Section,
}

impl Block {
    fn push_comment(&mut self, comment: &str) {
        if !comment.is_empty() {
            self.comments.push(comment.to_string());
        }
    }

    fn finish(&mut self, entries: &mut Vec<LocalizationEntry>, culture: &mut Option<String>) {
        let block = std::mem::take(self);
        if block.section == Section::None && !block.has_str && block.id.is_empty() {
            return;
        }

        if block.id.is_empty() && entries.is_empty() {
            // Header entry: mine it for the Language: field.
            if culture.is_none() {
                *culture = block
                    .str
                    .lines()
                    .find_map(|line| line.strip_prefix("Language:"))
                    .map(|lang| lang.trim().to_string())
                    .filter(|lang| !lang.is_empty());
            }
            return;
        }

        let value = if block.has_str {
            block.str
        } else {
            block.plural_str
        };
        let comment = if block.comments.is_empty() {
            None
        } else {
            Some(block.comments.join("\n"))
        };
        entries.push(LocalizationEntry {
            key: block.id,
            value: Some(value),
            comment,
            source: None,
        });
    }
}

fn parse_po_string(raw: &str) -> Result<String, Error> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(String::new());
    }
    if !raw.starts_with('"') || !raw.ends_with('"') || raw.len() < 2 {
        return Err(Error::data_mismatch(format!(
            "malformed PO string: {}",
            raw
        )));
    }
    Ok(unescape_po(&raw[1..raw.len() - 1]))
}

fn unescape_po(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn escape_po(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\t', "\\t")
        .replace('\r', "\\r")
}
