//! All error types for the lockit crate.
//!
//! These are returned from all fallible operations (parsing, serialization,
//! validation, conversion, etc.).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("CSV parse error: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid data: {0}")]
    DataMismatch(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid placeholder pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("path error: {0}")]
    Path(String),
}

impl Error {
    /// Creates a data-mismatch error for structurally invalid content.
    pub fn data_mismatch(message: impl Into<String>) -> Self {
        Error::DataMismatch(message.into())
    }

    /// Creates an unsupported-format error (read-only format, unknown target, ...).
    pub fn unsupported_format(message: impl Into<String>) -> Self {
        Error::UnsupportedFormat(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_unknown_format_error() {
        let error = Error::UnknownFormat("bogus".to_string());
        assert_eq!(error.to_string(), "unknown format `bogus`");
    }

    #[test]
    fn test_json_parse_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("{ nope }").unwrap_err();
        let error = Error::JsonParse(json_error);
        assert!(error.to_string().contains("JSON parse error"));
    }

    #[test]
    fn test_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error = Error::Io(io_error);
        assert!(error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_data_mismatch_error() {
        let error = Error::data_mismatch("bad block");
        assert_eq!(error.to_string(), "invalid data: bad block");
    }

    #[test]
    fn test_unsupported_format_error() {
        let error = Error::unsupported_format("lang is read-only");
        assert_eq!(error.to_string(), "unsupported format: lang is read-only");
    }

    #[test]
    fn test_invalid_pattern_error() {
        let regex_error = regex::Regex::new("(").unwrap_err();
        let error = Error::InvalidPattern(regex_error);
        assert!(error.to_string().contains("invalid placeholder pattern"));
    }
}
