use std::sync::{Arc, Mutex};

use bevy::prelude::*;
use constants::scroll::PIXELS_PER_LINE;

use crate::engine::core::app_state::AppState;
use crate::engine::core::viewport::Viewport;
use crate::engine::narrative::focus::PanelEvent;
use crate::engine::scroll::input::{PointerState, ScrollInput, ScrollSync};
use crate::engine::scroll::smooth_scroll::InputSource;

/// Input observed by a browser listener, queued for the next frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DomSignal {
    Scroll { delta: f32, source: InputSource },
    /// Native `scroll` event with the page's resulting position.
    ScrollSync(f32),
    PointerMove { x: f32, y: f32 },
    Panel(PanelEvent),
    InteractiveHover(bool),
    /// `persisted` is set when the page is going into the back/forward cache
    /// and may be shown again.
    PageHide { persisted: bool },
}

/// Queue shared between listener closures and the ECS.
#[derive(Resource, Clone, Default)]
pub struct DomSignalQueue(Arc<Mutex<Vec<DomSignal>>>);

impl DomSignalQueue {
    pub fn push(&self, signal: DomSignal) {
        if let Ok(mut queue) = self.0.lock() {
            queue.push(signal);
        }
    }

    fn take(&self) -> Vec<DomSignal> {
        self.0
            .lock()
            .map(|mut queue| std::mem::take(&mut *queue))
            .unwrap_or_default()
    }
}

/// Convert a DOM wheel delta to pixels for its `deltaMode`.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub(crate) fn wheel_pixels(delta: f32, mode: u32, page_height: f32) -> f32 {
    match mode {
        web_sys::WheelEvent::DOM_DELTA_LINE => delta * PIXELS_PER_LINE,
        web_sys::WheelEvent::DOM_DELTA_PAGE => delta * page_height,
        _ => delta,
    }
}

/// Fan queued browser signals out to events and pointer state.
pub fn drain_dom_signals(
    queue: Res<DomSignalQueue>,
    viewport: Res<Viewport>,
    state: Res<State<AppState>>,
    mut pointer: ResMut<PointerState>,
    mut scroll_input: EventWriter<ScrollInput>,
    mut scroll_sync: EventWriter<ScrollSync>,
    mut panel_events: EventWriter<PanelEvent>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    for signal in queue.take() {
        match signal {
            DomSignal::Scroll { delta, source } => {
                scroll_input.write(ScrollInput { delta, source });
            }
            DomSignal::ScrollSync(offset) => {
                scroll_sync.write(ScrollSync { offset });
            }
            DomSignal::PointerMove { x, y } => {
                pointer.update_position(Vec2::new(x, y), &viewport);
            }
            DomSignal::Panel(event) => {
                panel_events.write(event);
            }
            DomSignal::InteractiveHover(hovering) => {
                pointer.hovering_interactive = hovering;
            }
            DomSignal::PageHide { persisted: true } => {
                debug!("Page cached for back/forward navigation, staying mounted");
            }
            DomSignal::PageHide { persisted: false } => {
                if *state.get() != AppState::Unmounted {
                    info!("Page hidden, unmounting");
                    next_state.set(AppState::Unmounted);
                }
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::{DomListeners, attach_dom_listeners, detach_dom_listeners};

#[cfg(target_arch = "wasm32")]
mod browser {
    use std::cell::Cell;
    use std::rc::Rc;

    use bevy::prelude::*;
    use constants::transitions::cursor::INTERACTIVE_SELECTOR;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        AddEventListenerOptions, Element, Event, EventTarget, MouseEvent, Node,
        PageTransitionEvent, PointerEvent, TouchEvent, WheelEvent, Window,
    };

    use super::{DomSignal, DomSignalQueue, wheel_pixels};
    use crate::engine::dom::bridge::DomError;
    use crate::engine::narrative::focus::{
        PanelEvent, PanelEventKind, PanelGroup, PointerKind,
    };
    use crate::engine::scroll::smooth_scroll::InputSource;

    const FOCUS_PANEL_SELECTOR: &str = "[data-focus-group]";

    struct Registration {
        target: EventTarget,
        kind: &'static str,
        capture: bool,
        closure: Closure<dyn FnMut(Event)>,
    }

    /// Every listener the engine attached, kept alive until teardown.
    #[derive(Default)]
    pub struct DomListeners {
        registrations: Vec<Registration>,
    }

    impl DomListeners {
        fn add(
            &mut self,
            target: &EventTarget,
            kind: &'static str,
            passive: bool,
            capture: bool,
            handler: impl FnMut(Event) + 'static,
        ) -> Result<(), DomError> {
            let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
            let options = AddEventListenerOptions::new();
            options.set_passive(passive);
            options.set_capture(capture);
            target.add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                closure.as_ref().unchecked_ref(),
                &options,
            )?;
            self.registrations.push(Registration {
                target: target.clone(),
                kind,
                capture,
                closure,
            });
            Ok(())
        }

        /// Remove every listener. Safe to call more than once.
        pub fn remove_all(&mut self) -> usize {
            let count = self.registrations.len();
            for registration in self.registrations.drain(..) {
                if let Err(error) = registration
                    .target
                    .remove_event_listener_with_callback_and_bool(
                        registration.kind,
                        registration.closure.as_ref().unchecked_ref(),
                        registration.capture,
                    )
                {
                    warn!(
                        "Failed to remove '{}' listener: {:?}",
                        registration.kind, error
                    );
                }
            }
            count
        }
    }

    fn pointer_kind(event: &Event) -> PointerKind {
        match event.dyn_ref::<PointerEvent>().map(|event| event.pointer_type()) {
            Some(kind) if kind == "touch" || kind == "pen" => PointerKind::Coarse,
            _ => PointerKind::Fine,
        }
    }

    fn event_element(event: &Event) -> Option<Element> {
        event.target()?.dyn_into::<Element>().ok()
    }

    fn closest(element: &Element, selector: &str) -> Option<Element> {
        element.closest(selector).ok().flatten()
    }

    /// Group and index of the focus panel an event happened in, read from
    /// `data-focus-group` and `data-focus-index`.
    fn focus_panel(element: &Element) -> Option<(Element, PanelGroup, usize)> {
        let panel = closest(element, FOCUS_PANEL_SELECTOR)?;
        let group = match panel.get_attribute("data-focus-group")?.as_str() {
            "showcase" => PanelGroup::Showcase,
            "locations" => PanelGroup::Locations,
            _ => return None,
        };
        let index = panel.get_attribute("data-focus-index")?.parse().ok()?;
        Some((panel, group, index))
    }

    /// Whether the other end of an over/out pair is inside `container`.
    fn stays_within(event: &Event, container: &Element) -> bool {
        event
            .dyn_ref::<MouseEvent>()
            .and_then(|event| event.related_target())
            .and_then(|target| target.dyn_into::<Node>().ok())
            .is_some_and(|node| container.contains(Some(&node)))
    }

    fn wheel_delta(event: &WheelEvent, window: &Window) -> f32 {
        // Read per event; the viewport may have been resized since attach.
        let page_height = window
            .inner_height()
            .ok()
            .and_then(|height| height.as_f64())
            .unwrap_or(800.0) as f32;
        wheel_pixels(event.delta_y() as f32, event.delta_mode(), page_height)
    }

    fn attach(queue: &DomSignalQueue, listeners: &mut DomListeners) -> Result<(), DomError> {
        let window = web_sys::window().ok_or(DomError::WindowUnavailable)?;
        let document = window.document().ok_or(DomError::DocumentUnavailable)?;
        let window_target: &EventTarget = window.as_ref();
        let document_target: &EventTarget = document.as_ref();

        // Wheel and touch moves are taken over so the page only moves by
        // the smoothed offset.
        let wheel_queue = queue.clone();
        let wheel_window = window.clone();
        listeners.add(window_target, "wheel", false, false, move |event| {
            let Some(wheel) = event.dyn_ref::<WheelEvent>() else {
                return;
            };
            event.prevent_default();
            wheel_queue.push(DomSignal::Scroll {
                delta: wheel_delta(wheel, &wheel_window),
                source: InputSource::Wheel,
            });
        })?;

        // Keyboard, scrollbar and restored scrolling still move the page
        // natively; report where it ended up.
        let sync_queue = queue.clone();
        let sync_window = window.clone();
        listeners.add(window_target, "scroll", true, false, move |_| {
            if let Ok(offset) = sync_window.scroll_y() {
                sync_queue.push(DomSignal::ScrollSync(offset as f32));
            }
        })?;

        let last_touch_y: Rc<Cell<Option<f32>>> = Rc::new(Cell::new(None));
        let start_y = last_touch_y.clone();
        listeners.add(window_target, "touchstart", true, false, move |event| {
            let y = event
                .dyn_ref::<TouchEvent>()
                .and_then(|touch| touch.touches().get(0))
                .map(|touch| touch.client_y() as f32);
            start_y.set(y);
        })?;

        let touch_queue = queue.clone();
        let move_y = last_touch_y.clone();
        listeners.add(window_target, "touchmove", false, false, move |event| {
            let Some(y) = event
                .dyn_ref::<TouchEvent>()
                .and_then(|touch| touch.touches().get(0))
                .map(|touch| touch.client_y() as f32)
            else {
                return;
            };
            event.prevent_default();
            if let Some(previous) = move_y.replace(Some(y)) {
                touch_queue.push(DomSignal::Scroll {
                    delta: previous - y,
                    source: InputSource::Touch,
                });
            }
        })?;

        let end_y = last_touch_y;
        listeners.add(window_target, "touchend", true, false, move |_| {
            end_y.set(None);
        })?;

        let move_queue = queue.clone();
        listeners.add(window_target, "pointermove", true, false, move |event| {
            if let Some(pointer) = event.dyn_ref::<MouseEvent>() {
                move_queue.push(DomSignal::PointerMove {
                    x: pointer.client_x() as f32,
                    y: pointer.client_y() as f32,
                });
            }
        })?;

        // Hover detection is delegated to the document in the capture phase,
        // so elements added later are covered without observing mutations.
        let over_queue = queue.clone();
        listeners.add(document_target, "pointerover", true, true, move |event| {
            let Some(element) = event_element(&event) else {
                return;
            };
            if closest(&element, INTERACTIVE_SELECTOR).is_some() {
                over_queue.push(DomSignal::InteractiveHover(true));
            }
            if let Some((panel, group, index)) = focus_panel(&element) {
                // Moving between children of the same panel is not an enter.
                if !stays_within(&event, &panel) {
                    over_queue.push(DomSignal::Panel(PanelEvent {
                        group,
                        index,
                        kind: PanelEventKind::Enter,
                        pointer: pointer_kind(&event),
                    }));
                }
            }
        })?;

        let out_queue = queue.clone();
        listeners.add(document_target, "pointerout", true, true, move |event| {
            let Some(element) = event_element(&event) else {
                return;
            };
            if let Some(interactive) = closest(&element, INTERACTIVE_SELECTOR) {
                if !stays_within(&event, &interactive) {
                    out_queue.push(DomSignal::InteractiveHover(false));
                }
            }
            if let Some((panel, group, index)) = focus_panel(&element) {
                if !stays_within(&event, &panel) {
                    out_queue.push(DomSignal::Panel(PanelEvent {
                        group,
                        index,
                        kind: PanelEventKind::Leave,
                        pointer: pointer_kind(&event),
                    }));
                }
            }
        })?;

        let tap_queue = queue.clone();
        listeners.add(document_target, "click", true, true, move |event| {
            let Some((_, group, index)) = event_element(&event).and_then(|e| focus_panel(&e))
            else {
                return;
            };
            tap_queue.push(DomSignal::Panel(PanelEvent {
                group,
                index,
                kind: PanelEventKind::Tap,
                pointer: pointer_kind(&event),
            }));
        })?;

        let hide_queue = queue.clone();
        listeners.add(window_target, "pagehide", true, false, move |event| {
            let persisted = event
                .dyn_ref::<PageTransitionEvent>()
                .is_some_and(PageTransitionEvent::persisted);
            hide_queue.push(DomSignal::PageHide { persisted });
        })?;

        Ok(())
    }

    pub fn attach_dom_listeners(world: &mut World) {
        let queue = world.get_resource_or_init::<DomSignalQueue>().clone();
        let mut listeners = DomListeners::default();
        match attach(&queue, &mut listeners) {
            Ok(()) => info!(
                "✓ {} DOM listeners attached",
                listeners.registrations.len()
            ),
            Err(error) => warn!("DOM listeners unavailable: {}", error),
        }
        world.insert_non_send_resource(listeners);
    }

    pub fn detach_dom_listeners(listeners: Option<NonSendMut<DomListeners>>) {
        let Some(mut listeners) = listeners else {
            return;
        };
        let removed = listeners.remove_all();
        if removed > 0 {
            info!("DOM listeners removed ({})", removed);
        }
    }
}
