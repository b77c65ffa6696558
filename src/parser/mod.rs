// file: src/parser/mod.rs
// description: document loading and line normalization module exports
// reference: internal module structure

pub mod document;
pub mod hyperlink;
pub mod normalizer;

pub use document::{HyperlinkRef, Paragraph, ParagraphId, WordDocument};
pub use hyperlink::{Hyperlink, HyperlinkResolver, clean_url};
pub use normalizer::{LineNormalizer, LineRecord};
