//! Scroll-linked section geometry and the progress mapper.
//!
//! Geometry is re-measured on mount, on resize and whenever content
//! reflows the page; progress is recomputed from it every frame.

/// Pure mapping from (region geometry, scroll offset) to progress.
pub mod progress;

/// Tracked section geometry and its measurement systems.
pub mod tracked_region;
