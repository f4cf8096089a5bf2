use bevy::prelude::*;
use constants::layout::{DEFAULT_CHAPTER_COUNT, DEFAULT_LOCATION_COUNT, DEFAULT_SHOWCASE_COUNT};
use serde::{Deserialize, Serialize};

/// One story chapter: background image plus the text block laid over it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChapterEntry {
    pub title: String,
    pub subtitle: String,
    pub text: String,
    pub image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductEntry {
    pub name: String,
    pub desc: String,
    pub price: String,
    pub image: String,
    #[serde(default)]
    pub tag: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationEntry {
    pub name: String,
    pub address: String,
    pub hours: String,
    pub phone: String,
    pub coords: String,
    pub image: String,
}

/// Site content manifest as a Bevy asset. Mirrors `content/site.json`.
#[derive(Asset, TypePath, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteContent {
    #[serde(default)]
    pub chapters: Vec<ChapterEntry>,
    #[serde(default)]
    pub products: Vec<ProductEntry>,
    #[serde(default)]
    pub locations: Vec<LocationEntry>,
}

/// Item counts used to size the state machines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentCounts {
    pub chapters: usize,
    pub showcase: usize,
    pub locations: usize,
}

impl Default for ContentCounts {
    fn default() -> Self {
        Self {
            chapters: DEFAULT_CHAPTER_COUNT,
            showcase: DEFAULT_SHOWCASE_COUNT,
            locations: DEFAULT_LOCATION_COUNT,
        }
    }
}

impl SiteContent {
    /// Item counts, falling back to the built-in defaults for empty lists.
    pub fn counts(&self) -> ContentCounts {
        let fallback = ContentCounts::default();
        let or_default = |len: usize, default: usize| if len == 0 { default } else { len };
        ContentCounts {
            chapters: or_default(self.chapters.len(), fallback.chapters),
            showcase: or_default(self.products.len(), fallback.showcase),
            locations: or_default(self.locations.len(), fallback.locations),
        }
    }
}

/// Handle to the content manifest once loading has been requested.
#[derive(Resource, Default)]
pub struct SiteContentHandle {
    pub handle: Option<Handle<SiteContent>>,
}

impl SiteContentHandle {
    /// The loaded content, if it is available.
    pub fn get<'a>(&self, assets: &'a Assets<SiteContent>) -> Option<&'a SiteContent> {
        self.handle.as_ref().and_then(|handle| assets.get(handle))
    }
}
