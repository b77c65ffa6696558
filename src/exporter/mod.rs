// file: src/exporter/mod.rs
// description: report export module exports
// reference: internal module structure

pub mod html;
pub mod json;

pub use html::HtmlRenderer;
pub use json::{ExportManifest, JsonExporter, to_json};
