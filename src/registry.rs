//! Handler registry: maps file paths and format identifiers to handlers.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use lazy_static::lazy_static;
use walkdir::WalkDir;

use crate::{formats::builtin_handlers, traits::FormatHandler};

lazy_static! {
    static ref DEFAULT_REGISTRY: FormatRegistry = FormatRegistry::with_builtin_handlers();
}

/// Ordered collection of format handlers.
///
/// Handlers are probed in registration order, so more specific multi-part
/// extensions must be registered before their generic superstrings (the
/// builtin set registers `.i18n.json` before `.json`). The registry is
/// read-mostly: `register` takes `&mut self`, lookups take `&self`, so a
/// shared registry is safe for concurrent readers by construction.
pub struct FormatRegistry {
    handlers: Vec<Arc<dyn FormatHandler>>,
}

impl FormatRegistry {
    /// An empty registry for restricted or test scenarios.
    pub fn new() -> Self {
        FormatRegistry {
            handlers: Vec::new(),
        }
    }

    /// A registry pre-populated with every builtin handler.
    pub fn with_builtin_handlers() -> Self {
        FormatRegistry {
            handlers: builtin_handlers(),
        }
    }

    /// The process-wide default registry, constructed lazily and immutable
    /// after initialization.
    pub fn default_registry() -> &'static FormatRegistry {
        &DEFAULT_REGISTRY
    }

    /// Appends a handler. Registration is expected to finish before lookup
    /// traffic begins.
    pub fn register(&mut self, handler: Arc<dyn FormatHandler>) {
        self.handlers.push(handler);
    }

    pub fn handlers(&self) -> &[Arc<dyn FormatHandler>] {
        &self.handlers
    }

    /// Selects the handler for a file path, probing in registration order.
    pub fn handler_for_path(&self, path: &Path) -> Option<&Arc<dyn FormatHandler>> {
        self.handlers.iter().find(|h| h.can_handle(path))
    }

    /// Looks a handler up by format identifier or extension, case-insensitive
    /// and with the leading dot optional (`"yaml"`, `"yml"`, `".yml"` all
    /// find the YAML handler).
    pub fn handler_for_id(&self, id: &str) -> Option<&Arc<dyn FormatHandler>> {
        let wanted = id.trim().trim_start_matches('.').to_ascii_lowercase();
        if wanted.is_empty() {
            return None;
        }
        self.handlers.iter().find(|h| {
            h.format_id().eq_ignore_ascii_case(&wanted)
                || h.extensions()
                    .iter()
                    .any(|ext| ext.trim_start_matches('.') == wanted)
        })
    }

    pub fn is_supported(&self, path: &Path) -> bool {
        self.handler_for_path(path).is_some()
    }

    /// Enumerates supported files under a directory in deterministic sorted
    /// order. Unreadable entries are silently skipped; `recursive` bounds
    /// the walk to the top level when false.
    pub fn supported_files(&self, dir: &Path, recursive: bool) -> Vec<PathBuf> {
        let max_depth = if recursive { usize::MAX } else { 1 };
        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| self.is_supported(path))
            .collect();
        files.sort();
        files
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_builtin_handlers()
    }
}
