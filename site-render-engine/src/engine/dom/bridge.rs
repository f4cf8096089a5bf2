use bevy::prelude::*;
use thiserror::Error;

use crate::engine::regions::tracked_region::TrackedRegions;
use crate::engine::scroll::smooth_scroll::SmoothScrollController;

#[cfg(target_arch = "wasm32")]
use crate::engine::regions::tracked_region::TrackedRegion;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{JsCast, JsValue};
#[cfg(target_arch = "wasm32")]
use web_sys::{Document, HtmlElement, Window};

#[derive(Debug, Error)]
pub enum DomError {
    #[error("window is not available")]
    WindowUnavailable,
    #[error("document is not available")]
    DocumentUnavailable,
    #[error("no element with id '{0}'")]
    ElementMissing(String),
    #[error("element '{0}' is not an HTML element")]
    NotHtmlElement(String),
    #[error("javascript error: {0}")]
    Js(String),
}

#[cfg(target_arch = "wasm32")]
impl From<JsValue> for DomError {
    fn from(value: JsValue) -> Self {
        DomError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

/// A single visual change addressed to an element id.
#[derive(Debug, Clone, PartialEq)]
pub enum DomWrite {
    Style {
        target: String,
        property: &'static str,
        value: String,
    },
    Text {
        target: String,
        text: String,
    },
}

impl DomWrite {
    pub fn target(&self) -> &str {
        match self {
            DomWrite::Style { target, .. } | DomWrite::Text { target, .. } => target,
        }
    }
}

/// Writes queued during the frame, flushed in [`FrameSet::Flush`].
///
/// [`FrameSet::Flush`]: crate::engine::schedule::FrameSet::Flush
#[derive(Resource, Debug, Default)]
pub struct DomWriteQueue {
    writes: Vec<DomWrite>,
}

impl DomWriteQueue {
    pub fn push(&mut self, write: DomWrite) {
        self.writes.push(write);
    }

    pub fn extend(&mut self, writes: impl IntoIterator<Item = DomWrite>) {
        self.writes.extend(writes);
    }

    /// Take the queued writes, keeping only the last write per target and
    /// property so a frame never sets the same style twice.
    pub fn drain(&mut self) -> Vec<DomWrite> {
        let mut writes = std::mem::take(&mut self.writes);
        let mut seen = std::collections::HashSet::new();
        writes.reverse();
        writes.retain(|write| {
            let key = match write {
                DomWrite::Style {
                    target, property, ..
                } => (target.clone(), *property),
                DomWrite::Text { target, .. } => (target.clone(), "#text"),
            };
            seen.insert(key)
        });
        writes.reverse();
        writes
    }
}

#[cfg(target_arch = "wasm32")]
fn window() -> Result<Window, DomError> {
    web_sys::window().ok_or(DomError::WindowUnavailable)
}

#[cfg(target_arch = "wasm32")]
fn document() -> Result<Document, DomError> {
    window()?.document().ok_or(DomError::DocumentUnavailable)
}

#[cfg(target_arch = "wasm32")]
fn html_element(document: &Document, id: &str) -> Result<HtmlElement, DomError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| DomError::ElementMissing(id.to_string()))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| DomError::NotHtmlElement(id.to_string()))
}

/// Whether the primary input cannot hover, per the `(pointer: coarse)` media
/// query. Always false without a browser.
pub fn prefers_coarse_pointer() -> bool {
    #[cfg(target_arch = "wasm32")]
    {
        window()
            .ok()
            .and_then(|window| window.match_media("(pointer: coarse)").ok().flatten())
            .is_some_and(|query| query.matches())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        false
    }
}

/// Current vertical scroll position of the page.
pub fn current_scroll_offset() -> Result<f32, DomError> {
    #[cfg(target_arch = "wasm32")]
    {
        Ok(window()?.scroll_y()? as f32)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Err(DomError::WindowUnavailable)
    }
}

/// Measure the document position of each section element.
pub fn measure_sections(ids: &[&str]) -> Result<TrackedRegions, DomError> {
    #[cfg(target_arch = "wasm32")]
    {
        let window = window()?;
        let document = window.document().ok_or(DomError::DocumentUnavailable)?;
        let scroll_y = window.scroll_y()? as f32;

        let mut regions = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(element) = document.get_element_by_id(id) else {
                continue;
            };
            let rect = element.get_bounding_client_rect();
            regions.push(TrackedRegion::new(
                id,
                rect.top() as f32 + scroll_y,
                rect.height() as f32,
            ));
        }
        if regions.is_empty() {
            return Err(DomError::ElementMissing(ids.join(",")));
        }

        let document_height = document
            .document_element()
            .map(|root| root.scroll_height() as f32)
            .ok_or(DomError::DocumentUnavailable)?;
        Ok(TrackedRegions::new(regions, document_height))
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = ids;
        Err(DomError::WindowUnavailable)
    }
}

#[cfg(target_arch = "wasm32")]
fn apply_write(document: &Document, write: &DomWrite) -> Result<(), DomError> {
    let element = html_element(document, write.target())?;
    match write {
        DomWrite::Style {
            property, value, ..
        } => element.style().set_property(property, value)?,
        DomWrite::Text { text, .. } => element.set_text_content(Some(text.as_str())),
    }
    Ok(())
}

/// Apply this frame's DOM writes and move the window to the smoothed offset.
pub fn flush_dom_writes(
    mut queue: ResMut<DomWriteQueue>,
    mut controller: ResMut<SmoothScrollController>,
) {
    let writes = queue.drain();

    #[cfg(target_arch = "wasm32")]
    {
        let document = match document() {
            Ok(document) => document,
            Err(error) => {
                warn_once!("DOM writes skipped: {}", error);
                return;
            }
        };
        for write in &writes {
            match apply_write(&document, write) {
                Ok(()) => {}
                Err(DomError::ElementMissing(id)) => {
                    trace!("DOM write skipped, element '{}' not in page", id);
                }
                Err(error) => warn!("DOM write to '{}' failed: {}", write.target(), error),
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    for write in &writes {
        trace!("DOM write {:?}", write);
    }

    let Some(offset) = controller.take_pending_write() else {
        return;
    };

    #[cfg(target_arch = "wasm32")]
    if let Ok(window) = window() {
        window.scroll_to_with_x_and_y(0.0, offset as f64);
    }

    #[cfg(not(target_arch = "wasm32"))]
    trace!("Page scrolled to {:.1}px", offset);
}
