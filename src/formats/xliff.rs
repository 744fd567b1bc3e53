//! XLIFF 1.2 translation interchange files.
//!
//! Each `<trans-unit>` becomes one entry: the `id` attribute is the key,
//! `<target>` is the value, `<source>` the original text, `<note>` the
//! comment. The culture comes from the `<file>` element's `target-language`
//! attribute (falling back to `source-language`, then the file name).

use std::{io::Write, path::Path};

use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::{
    error::Error,
    paths::culture_from_path,
    traits::FormatHandler,
    types::{LocalizationEntry, LocalizationFile},
};

pub struct Handler;

impl FormatHandler for Handler {
    fn format_id(&self) -> &'static str {
        "xliff"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".xlf", ".xliff"]
    }

    fn parse(&self, content: &str, path: &Path) -> Result<LocalizationFile, Error> {
        let mut reader = Reader::from_reader(content.as_bytes());
        reader.config_mut().trim_text(true);

        let mut entries = Vec::new();
        let mut source_language: Option<String> = None;
        let mut target_language: Option<String> = None;
        let mut saw_xliff_root = false;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) if e.name().as_ref() == b"trans-unit" => {
                    entries.push(parse_trans_unit(e, &mut reader)?);
                }
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                    b"xliff" => saw_xliff_root = true,
                    b"file" => {
                        for attr in e.attributes().with_checks(false) {
                            let attr = attr.map_err(|err| Error::data_mismatch(err.to_string()))?;
                            match attr.key.as_ref() {
                                b"source-language" => {
                                    source_language = Some(attr.unescape_value()?.to_string());
                                }
                                b"target-language" => {
                                    target_language = Some(attr.unescape_value()?.to_string());
                                }
                                _ => {}
                            }
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(Error::XmlParse(e)),
            }
            buf.clear();
        }

        if !saw_xliff_root {
            return Err(Error::data_mismatch("missing <xliff> root element"));
        }

        let culture = target_language
            .or(source_language)
            .or_else(|| culture_from_path(path));

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
        let culture = file.culture.as_deref().unwrap_or("");
        let mut xml = Writer::new_with_indent(&mut *writer, b' ', 2);

        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        let mut xliff = BytesStart::new("xliff");
        xliff.push_attribute(("version", "1.2"));
        xliff.push_attribute(("xmlns", "urn:oasis:names:tc:xliff:document:1.2"));
        xml.write_event(Event::Start(xliff))?;

        let mut file_elem = BytesStart::new("file");
        file_elem.push_attribute(("original", file.file_name()));
        file_elem.push_attribute(("source-language", culture));
        file_elem.push_attribute(("target-language", culture));
        file_elem.push_attribute(("datatype", "plaintext"));
        xml.write_event(Event::Start(file_elem))?;
        xml.write_event(Event::Start(BytesStart::new("body")))?;

        for entry in &file.entries {
            let mut unit = BytesStart::new("trans-unit");
            unit.push_attribute(("id", entry.key.as_str()));
            xml.write_event(Event::Start(unit))?;

            let source = entry.source.as_deref().unwrap_or(entry.value_str());
            xml.write_event(Event::Start(BytesStart::new("source")))?;
            xml.write_event(Event::Text(BytesText::new(source)))?;
            xml.write_event(Event::End(BytesEnd::new("source")))?;

            xml.write_event(Event::Start(BytesStart::new("target")))?;
            xml.write_event(Event::Text(BytesText::new(entry.value_str())))?;
            xml.write_event(Event::End(BytesEnd::new("target")))?;

            if let Some(note) = &entry.comment {
                xml.write_event(Event::Start(BytesStart::new("note")))?;
                xml.write_event(Event::Text(BytesText::new(note)))?;
                xml.write_event(Event::End(BytesEnd::new("note")))?;
            }

            xml.write_event(Event::End(BytesEnd::new("trans-unit")))?;
        }

        xml.write_event(Event::End(BytesEnd::new("body")))?;
        xml.write_event(Event::End(BytesEnd::new("file")))?;
        xml.write_event(Event::End(BytesEnd::new("xliff")))?;
        writer.write_all(b"\n").map_err(Error::Io)?;
        Ok(Vec::new())
    }
}

fn parse_trans_unit(
    start: &BytesStart,
    reader: &mut Reader<&[u8]>,
) -> Result<LocalizationEntry, Error> {
    let mut id = None;
    for attr in start.attributes().with_checks(false) {
        let attr = attr.map_err(|e| Error::data_mismatch(e.to_string()))?;
        if attr.key.as_ref() == b"id" {
            id = Some(attr.unescape_value()?.to_string());
        }
    }
    let id = id.ok_or_else(|| Error::data_mismatch("trans-unit missing 'id'"))?;

    let mut source: Option<String> = None;
    let mut target: Option<String> = None;
    let mut note: Option<String> = None;
    let mut current: Option<&'static str> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"source" => current = Some("source"),
                b"target" => current = Some("target"),
                b"note" => current = Some("note"),
                _ => current = None,
            },
            Ok(Event::Empty(ref e)) if e.name().as_ref() == b"target" => {
                target = Some(String::new());
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(Error::XmlParse)?.to_string();
                match current {
                    Some("source") => source = Some(text),
                    Some("target") => target = Some(text),
                    Some("note") => note = Some(text),
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"trans-unit" => break,
                b"target" => {
                    target.get_or_insert_with(String::new);
                    current = None;
                }
                _ => current = None,
            },
            Ok(Event::Eof) => {
                return Err(Error::data_mismatch("unexpected EOF inside trans-unit"));
            }
            Ok(_) => {}
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }

    Ok(LocalizationEntry {
        key: id,
        value: target,
        comment: note,
        source,
    })
}
