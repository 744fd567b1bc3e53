//! All supported localization file formats.
//!
//! Each submodule implements [`FormatHandler`] for one format. Handlers are
//! stateless unit structs; the registry owns the selection policy.

pub mod csv;
pub mod ftl;
pub mod json;
pub mod lang;
pub mod nested_json;
pub mod po;
pub mod resx;
pub mod srt;
pub mod vtt;
pub mod xliff;
pub mod yaml;

use std::sync::Arc;

use crate::traits::FormatHandler;

pub use csv::Handler as CsvHandler;
pub use ftl::Handler as FluentHandler;
pub use json::Handler as JsonHandler;
pub use lang::Handler as LangHandler;
pub use nested_json::Handler as NestedJsonHandler;
pub use po::Handler as PoHandler;
pub use resx::Handler as ResxHandler;
pub use srt::Handler as SrtHandler;
pub use vtt::Handler as VttHandler;
pub use xliff::Handler as XliffHandler;
pub use yaml::Handler as YamlHandler;

/// Builtin handlers in registration order.
///
/// The nested-JSON dialect owns `.i18n.json` and must come before the
/// generic `.json` handler; everything else has unambiguous extensions.
pub(crate) fn builtin_handlers() -> Vec<Arc<dyn FormatHandler>> {
    vec![
        Arc::new(NestedJsonHandler),
        Arc::new(JsonHandler),
        Arc::new(YamlHandler),
        Arc::new(ResxHandler),
        Arc::new(PoHandler),
        Arc::new(XliffHandler),
        Arc::new(SrtHandler),
        Arc::new(VttHandler),
        Arc::new(CsvHandler),
        Arc::new(FluentHandler),
        Arc::new(LangHandler),
    ]
}
