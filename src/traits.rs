//! The format-handler contract every supported file format implements.

use std::{
    fs::File,
    io::{BufWriter, Read, Write},
    path::Path,
};

use crate::{error::Error, types::LocalizationFile, types::path_file_name};

/// A stateless handler for one localization file format.
///
/// Handlers parse into the canonical [`LocalizationFile`] model and write it
/// back out. They are selected by the
/// [`FormatRegistry`](crate::registry::FormatRegistry), so the trait is
/// object-safe and implementations carry no state.
pub trait FormatHandler: Send + Sync {
    /// Stable format identifier (e.g. `"json"`, `"xliff"`).
    fn format_id(&self) -> &'static str;

    /// Extensions this handler owns, lowercase with a leading dot, primary
    /// extension first. Multi-part extensions (`".i18n.json"`) are allowed
    /// and are matched as a whole.
    fn extensions(&self) -> &'static [&'static str];

    /// Fast extension test. The default suffix match is case-insensitive;
    /// handlers with ambiguous extensions may override this with a content
    /// probe.
    fn can_handle(&self, path: &Path) -> bool {
        let name = path_file_name(path).to_ascii_lowercase();
        self.extensions().iter().any(|ext| name.ends_with(ext))
    }

    /// Parses file content into the canonical model.
    ///
    /// `path` is carried into the result and used for filename-based culture
    /// inference. Fails with a parse-family error when the content is
    /// structurally invalid for this format.
    fn parse(&self, content: &str, path: &Path) -> Result<LocalizationFile, Error>;

    /// Serializes entries back out, returning human-readable notices for
    /// anything the format cannot represent losslessly. Read-only formats
    /// return [`Error::UnsupportedFormat`].
    fn write(&self, file: &LocalizationFile, writer: &mut dyn Write)
    -> Result<Vec<String>, Error>;

    /// Reads and parses a file, decoding a UTF-8/UTF-16 BOM when present.
    fn read_from(&self, path: &Path) -> Result<LocalizationFile, Error> {
        let file = File::open(path).map_err(Error::Io)?;
        let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .build(file);

        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded).map_err(Error::Io)?;

        self.parse(&decoded, path)
    }

    /// Writes a file, creating missing parent directories.
    fn write_to(&self, file: &LocalizationFile, path: &Path) -> Result<Vec<String>, Error> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(Error::Io)?;
        }
        let out = File::create(path).map_err(Error::Io)?;
        let mut writer = BufWriter::new(out);
        let warnings = self.write(file, &mut writer)?;
        writer.flush().map_err(Error::Io)?;
        Ok(warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LocalizationEntry;
    use std::path::PathBuf;

    struct Fake;

    impl FormatHandler for Fake {
        fn format_id(&self) -> &'static str {
            "fake"
        }

        fn extensions(&self) -> &'static [&'static str] {
            &[".fake", ".alt.fake"]
        }

        fn parse(&self, content: &str, path: &Path) -> Result<LocalizationFile, Error> {
            Ok(LocalizationFile::new(
                path,
                None,
                "fake",
                vec![LocalizationEntry::new("raw", content.trim())],
            ))
        }

        fn write(
            &self,
            file: &LocalizationFile,
            writer: &mut dyn Write,
        ) -> Result<Vec<String>, Error> {
            for entry in &file.entries {
                writeln!(writer, "{}", entry.value_str()).map_err(Error::Io)?;
            }
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_default_can_handle_is_case_insensitive_suffix_match() {
        let handler = Fake;
        assert!(handler.can_handle(&PathBuf::from("a/b/App.FAKE")));
        assert!(handler.can_handle(&PathBuf::from("x.alt.fake")));
        assert!(!handler.can_handle(&PathBuf::from("x.fake.txt")));
    }

    #[test]
    fn test_write_to_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("deep/nested/out.fake");
        let file = LocalizationFile::new(
            "in.fake",
            None,
            "fake",
            vec![LocalizationEntry::new("k", "v")],
        );
        Fake.write_to(&file, &target).unwrap();
        assert_eq!(std::fs::read_to_string(target).unwrap(), "v\n");
    }

    #[test]
    fn test_read_from_decodes_utf8_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bom.fake");
        std::fs::write(&path, b"\xEF\xBB\xBFhello").unwrap();
        let parsed = Fake.read_from(&path).unwrap();
        assert_eq!(parsed.entry("raw").unwrap().value_str(), "hello");
    }
}
