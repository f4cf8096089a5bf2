//! Boundary between the engine and the page's DOM.
//!
//! Consumers never touch the DOM directly. They queue [`bridge::DomWrite`]s
//! which are flushed once at the end of the frame, and browser input reaches
//! the engine through a signal queue fed by delegated listeners.

/// Typed DOM access, the write queue and its flush system.
pub mod bridge;

/// Browser input listeners and the signal queue they feed.
pub mod listeners;

/// Custom cursor position and hover feed.
pub mod cursor;
