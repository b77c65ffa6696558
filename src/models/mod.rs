// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod guide;
pub mod issue;

pub use guide::{IssueCategory, SpecCategory, SpecEntry, SpecTable, VehicleGuide, ViewName};
pub use issue::{Brand, Issue, Part};
