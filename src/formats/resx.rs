//! RESX-style XML resource files: `<data name="...">` elements carrying a
//! `<value>` and an optional `<comment>`.

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
        "resx"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".resx"]
    }

    fn parse(&self, content: &str, path: &Path) -> Result<LocalizationFile, Error> {
        let mut reader = Reader::from_reader(content.as_bytes());
        reader.config_mut().trim_text(true);

        let mut entries = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) if e.name().as_ref() == b"data" => {
                    if let Some(entry) = parse_data_element(e, &mut reader)? {
                        entries.push(entry);
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(Error::XmlParse(e)),
            }
            buf.clear();
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
        let mut xml = Writer::new_with_indent(&mut *writer, b' ', 2);

        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml.write_event(Event::Start(BytesStart::new("root")))?;

        for entry in &file.entries {
            let mut data = BytesStart::new("data");
            data.push_attribute(("name", entry.key.as_str()));
            data.push_attribute(("xml:space", "preserve"));
            xml.write_event(Event::Start(data))?;

            xml.write_event(Event::Start(BytesStart::new("value")))?;
            xml.write_event(Event::Text(BytesText::new(entry.value_str())))?;
            xml.write_event(Event::End(BytesEnd::new("value")))?;

            if let Some(comment) = &entry.comment {
                xml.write_event(Event::Start(BytesStart::new("comment")))?;
                xml.write_event(Event::Text(BytesText::new(comment)))?;
                xml.write_event(Event::End(BytesEnd::new("comment")))?;
            }

            xml.write_event(Event::End(BytesEnd::new("data")))?;
        }

        xml.write_event(Event::End(BytesEnd::new("root")))?;
        writer.write_all(b"\n").map_err(Error::Io)?;
        Ok(Vec::new())
    }
}

fn parse_data_element(
    start: &BytesStart,
    reader: &mut Reader<&[u8]>,
) -> Result<Option<LocalizationEntry>, Error> {
    let mut name = None;
    for attr in start.attributes().with_checks(false) {
        let attr = attr.map_err(|e| Error::data_mismatch(e.to_string()))?;
        if attr.key.as_ref() == b"name" {
            name = Some(attr.unescape_value()?.to_string());
        }
    }
    let name = name.ok_or_else(|| Error::data_mismatch("data element missing 'name'"))?;

    let mut value: Option<String> = None;
    let mut comment: Option<String> = None;
    let mut current: Option<&'static str> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"value" => current = Some("value"),
                b"comment" => current = Some("comment"),
                _ => current = None,
            },
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(Error::XmlParse)?.to_string();
                match current {
                    Some("value") => value = Some(text),
                    Some("comment") => comment = Some(text),
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"data" => break,
                b"value" => {
                    // An empty <value/> still counts as an empty string.
                    value.get_or_insert_with(String::new);
                    current = None;
                }
                _ => current = None,
            },
            Ok(Event::Empty(ref e)) if e.name().as_ref() == b"value" => {
                value = Some(String::new());
            }
            Ok(Event::Eof) => {
                return Err(Error::data_mismatch("unexpected EOF inside data element"));
            }
            Ok(_) => {}
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }

    // Designer metadata rows are not translatable entries.
    if name.starts_with(">>") {
        return Ok(None);
    }

    Ok(Some(LocalizationEntry {
        key: name,
        value,
        comment,
        source: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_resx() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
        <root>
          <data name="Greeting" xml:space="preserve">
            <value>Hello</value>
            <comment>Shown on startup</comment>
          </data>
          <data name="Farewell" xml:space="preserve">
            <value>Goodbye</value>
          </data>
        </root>"#;
        let file = Handler.parse(xml, Path::new("App.en.resx")).unwrap();
        assert_eq!(file.culture.as_deref(), Some("en"));
        assert_eq!(file.len(), 2);
        let greeting = file.entry("Greeting").unwrap();
        assert_eq!(greeting.value_str(), "Hello");
        assert_eq!(greeting.comment.as_deref(), Some("Shown on startup"));
        assert!(file.entry("Farewell").unwrap().comment.is_none());
    }

    #[test]
    fn test_designer_metadata_skipped() {
        let xml = r#"<root>
          <data name="&gt;&gt;Button1.Type"><value>System.Windows.Forms.Button</value></data>
          <data name="Real"><value>Yes</value></data>
        </root>"#;
        let file = Handler.parse(xml, Path::new("x.resx")).unwrap();
        assert_eq!(file.len(), 1);
        assert_eq!(file.entries[0].key, "Real");
    }

    #[test]
    fn test_empty_value_element() {
        let xml = r#"<root><data name="Empty"><value/></data></root>"#;
        let file = Handler.parse(xml, Path::new("x.resx")).unwrap();
        let entry = file.entry("Empty").unwrap();
        assert_eq!(entry.value.as_deref(), Some(""));
        assert!(entry.is_empty());
    }

    #[test]
    fn test_missing_name_is_error() {
        let xml = r#"<root><data><value>orphan</value></data></root>"#;
        let err = Handler.parse(xml, Path::new("x.resx")).unwrap_err();
        assert!(err.to_string().contains("missing 'name'"));
    }

    #[test]
    fn test_write_round_trip_with_comment() {
        let file = LocalizationFile::new(
            "x.resx",
            Some("tr".to_string()),
            "resx",
            vec![
                LocalizationEntry::new("A", "merhaba").with_comment(Some("greeting".to_string())),
                LocalizationEntry::new("B", "d\u{00fc}nya & <ötesi>"),
            ],
        );
        let mut out = Vec::new();
        let warnings = Handler.write(&file, &mut out).unwrap();
        assert!(warnings.is_empty());

        let reparsed = Handler
            .parse(std::str::from_utf8(&out).unwrap(), Path::new("x.resx"))
            .unwrap();
        assert_eq!(file.entries, reparsed.entries);
        assert_eq!(
            reparsed.entry("A").unwrap().comment.as_deref(),
            Some("greeting")
        );
    }
}
