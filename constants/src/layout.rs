/// Section ids and heights (in viewport heights) of the page, top to bottom.
/// Used to derive tracked regions when no DOM is available.
pub const SECTIONS: &[(&str, f32)] = &[
    ("hero", 1.0),
    ("menu", 0.4),
    ("showcase", 1.0),
    ("craft", 0.4),
    ("story", 3.0),
    ("visit", 0.5),
    ("locations", 1.0),
    ("newsletter", 0.6),
    ("footer", 0.4),
];

/// Region ids tracked by the scroll-linked consumers.
pub const HERO_REGION: &str = "hero";
pub const STORY_REGION: &str = "story";
pub const PAGE_REGION: &str = "page";

/// Fallback item counts when the content manifest is unavailable.
pub const DEFAULT_CHAPTER_COUNT: usize = 3;
pub const DEFAULT_SHOWCASE_COUNT: usize = 4;
pub const DEFAULT_LOCATION_COUNT: usize = 2;

/// DOM element ids written by the engine. Indexed elements take a `-{i}`
/// suffix.
pub mod elements {
    pub const STORY_IMAGE: &str = "story-image";
    pub const STORY_TEXT: &str = "story-text";
    pub const STORY_TITLE: &str = "story-title";
    pub const STORY_BODY: &str = "story-body";
    pub const STORY_LABEL: &str = "story-label";
    pub const STORY_DOT: &str = "story-dot";

    pub const SHOWCASE_PANEL: &str = "showcase-panel";
    pub const SHOWCASE_IMAGE: &str = "showcase-image";
    pub const SHOWCASE_DETAIL: &str = "showcase-detail";

    pub const LOCATION_PANEL: &str = "locations-panel";
    pub const LOCATION_IMAGE: &str = "locations-image";
    pub const LOCATION_UNDERLINE: &str = "locations-underline";
    pub const LOCATION_ADDRESS: &str = "locations-address";

    pub const HERO_WORD_LEFT: &str = "hero-word-left";
    pub const HERO_WORD_RIGHT: &str = "hero-word-right";

    pub const SCROLL_PROGRESS: &str = "scroll-progress";

    pub const LOADING_SCREEN: &str = "loading-screen";
    pub const LOADING_BAR: &str = "loading-bar";
    pub const LOADING_LABEL: &str = "loading-label";
    pub const PAGE_ROOT: &str = "page-root";

    pub const CURSOR_DOT: &str = "cursor-dot";
    pub const CURSOR_RING: &str = "cursor-ring";

    pub fn indexed(prefix: &str, index: usize) -> String {
        format!("{prefix}-{index}")
    }
}
