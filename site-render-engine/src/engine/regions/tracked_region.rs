use bevy::prelude::*;
use constants::layout::{PAGE_REGION, SECTIONS};

use crate::engine::core::viewport::Viewport;

/// Geometry of a scroll-linked section in document coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedRegion {
    pub id: String,
    pub top_offset: f32,
    pub height: f32,
}

impl TrackedRegion {
    pub fn new(id: &str, top_offset: f32, height: f32) -> Self {
        Self {
            id: id.to_string(),
            top_offset,
            height,
        }
    }
}

/// Every tracked region plus the page itself.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct TrackedRegions {
    regions: Vec<TrackedRegion>,
    document_height: f32,
}

impl TrackedRegions {
    pub fn new(regions: Vec<TrackedRegion>, document_height: f32) -> Self {
        let mut tracked = Self {
            regions,
            document_height: document_height.max(0.0),
        };
        tracked.upsert(TrackedRegion::new(PAGE_REGION, 0.0, tracked.document_height));
        tracked
    }

    /// Stack `sections` (heights in viewport units) top to bottom.
    pub fn from_layout(sections: &[(&str, f32)], viewport_height: f32) -> Self {
        let mut top = 0.0;
        let regions = sections
            .iter()
            .map(|(id, screens)| {
                let height = screens * viewport_height;
                let region = TrackedRegion::new(id, top, height);
                top += height;
                region
            })
            .collect();
        Self::new(regions, top)
    }

    pub fn get(&self, id: &str) -> Option<&TrackedRegion> {
        self.regions.iter().find(|region| region.id == id)
    }

    pub fn document_height(&self) -> f32 {
        self.document_height
    }

    fn upsert(&mut self, region: TrackedRegion) {
        match self.regions.iter_mut().find(|existing| existing.id == region.id) {
            Some(existing) => *existing = region,
            None => self.regions.push(region),
        }
    }
}

/// Ask for region geometry to be measured again, e.g. after content reflow.
#[derive(Event, Debug, Default)]
pub struct RemeasureRegions;

/// Measure tracked regions on mount, on resize and on request.
///
/// Web builds read element geometry from the DOM; native builds, or a DOM
/// that is not ready yet, fall back to the configured section layout.
pub fn measure_regions(
    viewport: Res<Viewport>,
    mut requests: EventReader<RemeasureRegions>,
    mut measured_once: Local<bool>,
    mut regions: ResMut<TrackedRegions>,
) {
    let requested = requests.read().count() > 0;
    if *measured_once && !requested && !viewport.is_changed() {
        return;
    }
    *measured_once = true;

    let ids: Vec<&str> = SECTIONS.iter().map(|(id, _)| *id).collect();
    let next = match crate::engine::dom::bridge::measure_sections(&ids) {
        Ok(measured) => measured,
        Err(error) => {
            debug!("Section measurement unavailable ({error}), using layout fallback");
            TrackedRegions::from_layout(SECTIONS, viewport.height)
        }
    };

    if *regions != next {
        info!(
            "Tracked regions measured: {} sections, document height {:.0}px",
            next.regions.len(),
            next.document_height
        );
        *regions = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_stacks_sections_and_adds_page_region() {
        let regions =
            TrackedRegions::from_layout(&[("hero", 1.0), ("story", 3.0), ("footer", 0.5)], 800.0);

        let story = regions.get("story").unwrap();
        assert_eq!(story.top_offset, 800.0);
        assert_eq!(story.height, 2400.0);

        let page = regions.get(PAGE_REGION).unwrap();
        assert_eq!(page.top_offset, 0.0);
        assert_eq!(page.height, 3600.0);
        assert_eq!(regions.document_height(), 3600.0);
    }

    #[test]
    fn unknown_region_is_none() {
        let regions = TrackedRegions::from_layout(SECTIONS, 800.0);
        assert!(regions.get("missing").is_none());
    }
}
