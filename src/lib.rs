#![forbid(unsafe_code)]
//! Localization resource file toolkit.
//!
//! Parses, writes, converts, checks, and scaffolds localization files across
//! eleven formats (flat and nested JSON, YAML, RESX, gettext PO, XLIFF 1.2,
//! SRT, WebVTT, CSV, Fluent, and legacy `.lang`). All processing goes through
//! the unified [`LocalizationFile`] model.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use lockit::{ConvertOptions, FormatRegistry, convert_file};
//!
//! let registry = FormatRegistry::default_registry();
//!
//! // Convert a resource file to another format.
//! let result = convert_file(
//!     registry,
//!     Path::new("app.en.resx"),
//!     Path::new("app.en.json"),
//!     &ConvertOptions::new("json"),
//! );
//! assert!(result.success);
//!
//! // Or work with the unified model directly.
//! let handler = registry.handler_for_path(Path::new("app.en.json")).unwrap();
//! let file = handler.read_from(Path::new("app.en.json"))?;
//! for entry in &file.entries {
//!     println!("{} = {:?}", entry.key, entry.value);
//! }
//! # Ok::<(), lockit::Error>(())
//! ```
//!
//! # Engines
//!
//! - [`convert_file`] / [`convert_directory`]: format-to-format conversion
//! - [`check_file`] / [`check_files`] / [`check_path`]: quality rules
//!   (empty values, duplicate keys, orphan keys, placeholder consistency,
//!   trailing whitespace)
//! - [`generate`]: scaffold target-culture files from a base culture

pub mod check;
pub mod convert;
pub mod error;
pub mod formats;
pub mod generate;
pub mod paths;
pub mod placeholder;
pub mod registry;
pub mod traits;
pub mod types;

// Re-export the most used types for easy consumption
pub use crate::{
    check::{
        CheckOptions, CheckReport, CheckRule, CheckViolation, Severity, check_file, check_files,
        check_path,
    },
    convert::{ConvertOptions, ConvertResult, convert_directory, convert_file},
    error::Error,
    generate::{DEFAULT_MISSING_PLACEHOLDER, GenerateOptions, GenerateResult, generate},
    paths::{culture_from_file_name, culture_from_path, generate_target_path, split_extension},
    placeholder::{DEFAULT_PATTERN, extract_placeholders, get_regex},
    registry::FormatRegistry,
    traits::FormatHandler,
    types::{CancelFlag, LocalizationEntry, LocalizationFile},
};
