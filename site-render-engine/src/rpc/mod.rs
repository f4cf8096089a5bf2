//! JSON-RPC 2.0 bridge between the engine and its host page.
//!
//! Messages travel over `postMessage`. The host sends requests; the engine
//! answers requests that carry an ID and pushes notifications as narrative
//! state changes.
//!
//! ## Message Flow
//!
//! ```text
//! Host page (parent window)  <──postMessage──>  Engine
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │                                        ├─ Process request
//!        │ <───────────────── Response (with ID) ─┤
//!        │                                        │
//!        │ <────────── Notification (no ID) ─────┤
//! ```
//!
//! ## Sending Notifications
//!
//! Frame consumers return notifications through their frame output. Other
//! systems call `WebRpcInterface::send_notification()` directly:
//!
//! ```rust,ignore
//! fn your_system(mut rpc: ResMut<WebRpcInterface>) {
//!     rpc.send_notification("event_name", json!({ "data": "value" }));
//! }
//! ```
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32600`: Invalid request
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//!
//! ## Methods
//!
//! ### Navigation
//! - `scroll_to`: Move to `{ offset }` or `{ region }`, optionally `immediate`
//! - `get_scroll_state`: Current offset, velocity, progress and narrative state
//!
//! ### Interaction
//! - `panel_event`: Forward a focus panel enter/leave/tap observed by the host
//! - `unmount`: Tear the engine down
//!
//! ### Diagnostics
//! - `get_fps`: Retrieve current frame rate
//!
//! ## Notifications
//!
//! - `loading_progress`, `loading_ready`
//! - `chapter_changed`, `focus_changed`
//! - `fps_update`, `debug_message`

/// JSON-RPC 2.0 bidirectional communication with the host page.
///
/// Handles request-response patterns, notifications, and WASM message listeners.
pub mod web_rpc;
