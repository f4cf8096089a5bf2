use super::tracked_region::TrackedRegion;

/// How a region's scroll range is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionMode {
    /// From the region's top reaching the viewport top until its bottom
    /// reaches the viewport bottom. Used by pinned multi-viewport sections
    /// where each viewport height of scrolling is one step of the story.
    Pinned,
    /// From the region's top reaching the viewport top until its bottom
    /// reaches the viewport top, i.e. while it scrolls out of view.
    ScrollOut,
}

/// Progress through a pinned region, clamped to [0, 1].
///
/// Returns 0 for regions that cannot scroll (not laid out yet, or no
/// taller than the viewport) instead of dividing by zero.
pub fn compute(region: &TrackedRegion, scroll_offset: f32, viewport_height: f32) -> f32 {
    compute_with(RegionMode::Pinned, region, scroll_offset, viewport_height)
}

pub fn compute_with(
    mode: RegionMode,
    region: &TrackedRegion,
    scroll_offset: f32,
    viewport_height: f32,
) -> f32 {
    let span = match mode {
        RegionMode::Pinned => region.height - viewport_height,
        RegionMode::ScrollOut => region.height,
    };
    if !span.is_finite() || span <= 0.0 || region.height <= 0.0 {
        return 0.0;
    }

    let progress = (scroll_offset - region.top_offset) / span;
    if progress.is_nan() {
        return 0.0;
    }
    progress.clamp(0.0, 1.0)
}
