// file: src/assets/mod.rs
// description: input discovery and car image classification module exports
// reference: internal module structure

pub mod classifier;
pub mod scanner;

pub use classifier::ImageClassifier;
pub use scanner::{FileScanner, ScannedFile};
