pub const JSONRPC_VERSION: &str = "2.0";

/// Requests accepted from the host page.
pub mod methods {
    pub const SCROLL_TO: &str = "scroll_to";
    pub const GET_SCROLL_STATE: &str = "get_scroll_state";
    pub const GET_FPS: &str = "get_fps";
    pub const PANEL_EVENT: &str = "panel_event";
    pub const UNMOUNT: &str = "unmount";
}

/// Notifications pushed to the host page.
pub mod notifications {
    pub const LOADING_PROGRESS: &str = "loading_progress";
    pub const LOADING_READY: &str = "loading_ready";
    pub const CHAPTER_CHANGED: &str = "chapter_changed";
    pub const FOCUS_CHANGED: &str = "focus_changed";
    pub const FPS_UPDATE: &str = "fps_update";
    pub const DEBUG_MESSAGE: &str = "debug_message";
}

/// Standard JSON-RPC 2.0 error codes.
pub mod codes {
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}
