/// Cubic-bezier control points used by the panel transitions.
pub const EXPO_OUT_BEZIER: [f32; 4] = [0.16, 1.0, 0.3, 1.0];

/// Story section chapter transitions.
pub mod chapter {
    /// Background image crossfade.
    pub const IMAGE_DURATION: f32 = 1.2;
    /// Background starts slightly zoomed in and settles to 1.0.
    pub const IMAGE_START_SCALE: f32 = 1.1;

    /// Foreground text blur/translate.
    pub const TEXT_DURATION: f32 = 0.8;
    pub const TEXT_DELAY: f32 = 0.2;
    pub const TEXT_OFFSET_Y: f32 = 50.0;
    pub const TEXT_BLUR: f32 = 10.0;
    /// Outgoing text lifts and blurs away within the reveal delay.
    pub const TEXT_EXIT_DURATION: f32 = 0.2;

    /// Chapter label slide-in.
    pub const LABEL_DURATION: f32 = 0.8;
    pub const LABEL_DELAY: f32 = 0.4;
    pub const LABEL_OFFSET_X: f32 = -20.0;

    /// Indicator dot heights (px).
    pub const DOT_ACTIVE_HEIGHT: f32 = 48.0;
    pub const DOT_IDLE_HEIGHT: f32 = 24.0;
    pub const DOT_DURATION: f32 = 0.5;
}

/// Product showcase focus panels.
pub mod showcase {
    pub const PANEL_DURATION: f32 = 0.8;
    pub const ACTIVE_FLEX: f32 = 3.0;
    pub const IDLE_FLEX: f32 = 1.0;
    pub const IDLE_BRIGHTNESS: f32 = 0.5;
    pub const IMAGE_DURATION: f32 = 1.2;
    pub const IMAGE_ACTIVE_SCALE: f32 = 1.05;
    pub const IMAGE_IDLE_SCALE: f32 = 1.15;
    pub const DETAIL_DURATION: f32 = 0.5;
    pub const DETAIL_DELAY: f32 = 0.2;
    pub const DETAIL_EXIT_DURATION: f32 = 0.2;
    pub const DETAIL_OFFSET_Y: f32 = 20.0;
    pub const DEFAULT_INDEX: usize = 0;
}

/// Location finder focus panels.
pub mod locations {
    pub const PANEL_DURATION: f32 = 0.8;
    pub const ACTIVE_FLEX: f32 = 2.0;
    pub const IDLE_FLEX: f32 = 1.0;
    pub const IDLE_OPACITY: f32 = 0.6;
    pub const IMAGE_DURATION: f32 = 1.5;
    pub const IMAGE_ACTIVE_SCALE: f32 = 1.05;
    pub const IMAGE_IDLE_SCALE: f32 = 1.15;
    pub const UNDERLINE_WIDTH: f32 = 100.0;
    pub const DETAIL_DURATION: f32 = 0.5;
    pub const DETAIL_DELAY: f32 = 0.1;
    pub const DETAIL_EXIT_DURATION: f32 = 0.5;
    pub const DETAIL_OFFSET_Y: f32 = 100.0;
    pub const DEFAULT_INDEX: usize = 0;
}

/// Custom cursor response to interactive targets.
pub mod cursor {
    pub const DOT_HOVER_SCALE: f32 = 2.5;
    pub const RING_HOVER_SCALE: f32 = 1.5;
    pub const DOT_RADIUS: f32 = 8.0;
    pub const RING_RADIUS: f32 = 24.0;
    /// Seconds for the hover scale change.
    pub const SCALE_DURATION: f32 = 0.2;
    /// Exponential follow rate (1/s) of the ring behind the dot.
    pub const RING_FOLLOW_LAMBDA: f32 = 14.0;
    /// Selector matched against hover targets to flag interactivity.
    pub const INTERACTIVE_SELECTOR: &str =
        "a, button, input, textarea, [role=\"button\"], .clickable";
}
