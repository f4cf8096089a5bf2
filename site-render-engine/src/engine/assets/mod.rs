//! Site content consumed by the narrative consumers.
//!
//! The engine only reads item counts and per-item text; content semantics
//! are never validated here.

/// Content manifest listing story chapters, showcase items and locations.
pub mod site_content;
