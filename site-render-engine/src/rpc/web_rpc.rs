use bevy::diagnostic::DiagnosticsStore;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use constants::rpc::codes::{INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND};
use constants::rpc::methods::{GET_FPS, GET_SCROLL_STATE, PANEL_EVENT, SCROLL_TO, UNMOUNT};
use constants::rpc::notifications::DEBUG_MESSAGE;
use constants::rpc::JSONRPC_VERSION;
use serde::{Deserialize, Serialize};

use crate::engine::core::app_state::UnmountRequest;
use crate::engine::narrative::NarrativeStatus;
use crate::engine::narrative::focus::PanelEvent;
use crate::engine::schedule::FrameSet;
use crate::engine::scroll::input::{ScrollTarget, ScrollToRequest};
use crate::engine::scroll::smooth_scroll::SmoothScrollController;
use crate::engine::systems::fps_tracking::current_fps;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Resource managing bidirectional RPC communication with the host page.
/// Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Methods of notifications queued but not yet sent, oldest first.
    pub fn pending_methods(&self) -> Vec<&str> {
        self.outgoing_notifications
            .iter()
            .map(|notification| notification.method.as_str())
            .collect()
    }

    /// Queue response for transmission to the host.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin establishing the host bridge. Incoming requests are handled with
/// frame input; queued messages go out after the frame's DOM writes.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (process_incoming_messages, handle_rpc_messages)
                    .chain()
                    .in_set(FrameSet::Input),
            )
            .add_systems(Update, send_outgoing_messages.in_set(FrameSet::Flush));

        #[cfg(target_arch = "wasm32")]
        {
            use crate::engine::core::app_state::AppState;
            app.add_systems(Startup, setup_message_listener)
                .add_systems(OnEnter(AppState::Unmounted), remove_message_listener);
        }
    }
}

/// The `message` listener, kept so teardown can remove it.
#[cfg(target_arch = "wasm32")]
struct MessageListener(Closure<dyn FnMut(MessageEvent)>);

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(world: &mut World) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        // Filter messages to ensure they contain string data.
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    match window() {
        Some(window) => {
            if let Err(e) = window
                .add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            {
                error!("Failed to register message listener: {:?}", e);
            }
        }
        None => error!("Window object not available"),
    }

    world.insert_non_send_resource(MessageListener(closure));
    world.insert_resource(MessageQueue(message_queue));
}

#[cfg(target_arch = "wasm32")]
fn remove_message_listener(world: &mut World) {
    let Some(listener) = world.remove_non_send_resource::<MessageListener>() else {
        return;
    };
    if let Some(window) = window() {
        if let Err(e) = window
            .remove_event_listener_with_callback("message", listener.0.as_ref().unchecked_ref())
        {
            warn!("Failed to remove message listener: {:?}", e);
        }
    }
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing incoming RPC message from the host.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

/// Engine state read by query methods.
#[derive(SystemParam)]
struct RpcReadState<'w> {
    diagnostics: Option<Res<'w, DiagnosticsStore>>,
    controller: Res<'w, SmoothScrollController>,
    status: Res<'w, NarrativeStatus>,
}

/// Events raised by command methods.
#[derive(SystemParam)]
struct RpcCommandWriters<'w> {
    scroll_requests: EventWriter<'w, ScrollToRequest>,
    panel_events: EventWriter<'w, PanelEvent>,
    unmount_requests: EventWriter<'w, UnmountRequest>,
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    read_state: RpcReadState,
    mut writers: RpcCommandWriters,
) {
    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                if let Some(response) = handle_rpc_request(&request, &read_state, &mut writers) {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                rpc_interface.send_notification(
                    DEBUG_MESSAGE,
                    serde_json::json!({
                        "message": format!("Parse error: {}", parse_error)
                    }),
                );
            }
        }
    }
}

/// Handle individual RPC request. Requests without an ID still run but get
/// no response.
fn handle_rpc_request(
    request: &RpcRequest,
    read_state: &RpcReadState,
    writers: &mut RpcCommandWriters,
) -> Option<RpcResponse> {
    let result = if request.jsonrpc != JSONRPC_VERSION {
        Err(RpcError::invalid_request(&format!(
            "Unsupported jsonrpc version: {}",
            request.jsonrpc
        )))
    } else {
        match request.method.as_str() {
            SCROLL_TO => handle_scroll_to(&request.params, &mut writers.scroll_requests),
            GET_SCROLL_STATE => handle_get_scroll_state(&read_state.controller, &read_state.status),
            GET_FPS => handle_get_fps(read_state.diagnostics.as_deref()),
            PANEL_EVENT => handle_panel_event(&request.params, &mut writers.panel_events),
            UNMOUNT => {
                writers.unmount_requests.write(UnmountRequest);
                Ok(serde_json::json!({ "success": true }))
            }
            _ => {
                warn!("Unknown RPC method: {}", request.method);
                Err(RpcError::method_not_found(&request.method))
            }
        }
    };

    let id = request.id.clone()?;
    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(RpcResponse {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }),
    }
}

/// Scroll to an absolute offset or to the top of a tracked region.
fn handle_scroll_to(
    params: &serde_json::Value,
    scroll_requests: &mut EventWriter<ScrollToRequest>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct ScrollToParams {
        offset: Option<f32>,
        region: Option<String>,
        #[serde(default)]
        immediate: bool,
    }

    let parsed = serde_json::from_value::<ScrollToParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'offset' or 'region' parameter"))?;

    let target = match (parsed.offset, parsed.region) {
        (Some(offset), None) if offset.is_finite() => ScrollTarget::Offset(offset),
        (None, Some(region)) => ScrollTarget::Region(region),
        _ => {
            return Err(RpcError::invalid_params(
                "Expected exactly one of 'offset' or 'region'",
            ));
        }
    };

    info!("Scroll request dispatched: {:?}", target);
    scroll_requests.write(ScrollToRequest {
        target,
        immediate: parsed.immediate,
    });

    Ok(serde_json::json!({ "success": true }))
}

fn handle_get_scroll_state(
    controller: &SmoothScrollController,
    status: &NarrativeStatus,
) -> Result<serde_json::Value, RpcError> {
    let scroll = serde_json::to_value(controller.state())
        .map_err(|e| RpcError::internal_error(&e.to_string()))?;
    let narrative =
        serde_json::to_value(status).map_err(|e| RpcError::internal_error(&e.to_string()))?;

    Ok(serde_json::json!({
        "running": controller.is_running(),
        "limit": controller.limit(),
        "scroll": scroll,
        "narrative": narrative,
    }))
}

/// Handle FPS retrieval with diagnostic system integration.
fn handle_get_fps(diagnostics: Option<&DiagnosticsStore>) -> Result<serde_json::Value, RpcError> {
    let fps = diagnostics.and_then(current_fps).unwrap_or(0.0);

    Ok(serde_json::json!({
        "fps": fps
    }))
}

/// Forward a panel interaction the host observed itself.
fn handle_panel_event(
    params: &serde_json::Value,
    panel_events: &mut EventWriter<PanelEvent>,
) -> Result<serde_json::Value, RpcError> {
    let event = serde_json::from_value::<PanelEvent>(params.clone()).map_err(|e| {
        RpcError::invalid_params(&format!("Expected 'group', 'index' and 'kind': {}", e))
    })?;
    panel_events.write(event);

    Ok(serde_json::json!({ "success": true }))
}

/// Send queued notifications and responses to the host.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    // Send notifications first.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    // Send responses second to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to the parent window.
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_request(message: &str) -> Self {
        Self {
            code: INVALID_REQUEST,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: METHOD_NOT_FOUND,
            message: "Method not found".to_string(),
            data: Some(serde_json::json!({ "method": method })),
        }
    }

    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: INVALID_PARAMS,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: INTERNAL_ERROR,
            message: message.to_string(),
            data: None,
        }
    }
}
