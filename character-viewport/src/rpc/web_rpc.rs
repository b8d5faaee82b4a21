use bevy::diagnostic::DiagnosticsStore;
use bevy::prelude::*;
use bevy::state::state::StateTransitionEvent;
use serde::{Deserialize, Serialize};

use crate::engine::character::assembly::{AssemblyRecord, CharactersAssembled};
use crate::engine::core::app_state::{
    MountEpoch, ViewportErrorEvent, ViewportPhase, ViewportRequest,
};
use crate::engine::loading::character_loader::CharacterLoadJob;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::systems::fps_tracking::current_fps;
use crate::engine::systems::overlay::status_line;

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

/// Resource managing bidirectional RPC communication between the host page and Bevy.
/// Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host page without expecting a response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Queue response for transmission to the host page.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Snapshot of the viewport returned by `get_viewport_status`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ViewportStatus {
    pub phase: &'static str,
    pub epoch: u64,
    pub status: String,
    pub progress: f32,
    pub characters_ready: bool,
    /// Characters bound to loaded parts in the current mount.
    pub characters: usize,
}

pub fn phase_name(phase: ViewportPhase) -> &'static str {
    match phase {
        ViewportPhase::Detached => "detached",
        ViewportPhase::Mounted => "mounted",
        ViewportPhase::Faulted => "faulted",
    }
}

/// Plugin establishing WebRPC communication layer for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    notify_viewport_events,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    let Some(window) = window() else {
        error!("Window object not available; RPC listener not registered");
        return;
    };
    if let Err(e) =
        window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
    {
        error!("Failed to register message listener: {:?}", e);
        return;
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing incoming RPC message from the host page.
#[derive(Event)]
pub(crate) struct IncomingRpcMessage {
    pub(crate) content: String,
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

#[allow(clippy::too_many_arguments)]
fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    diagnostics: Res<DiagnosticsStore>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    phase: Res<State<ViewportPhase>>,
    epoch: Res<MountEpoch>,
    progress: Res<LoadingProgress>,
    job: Option<Res<CharacterLoadJob>>,
    record: Option<Res<AssemblyRecord>>,
    mut requests: EventWriter<ViewportRequest>,
) {
    for event in events.read() {
        let request = match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => request,
            Err(parse_error) => {
                warn!("Discarding malformed RPC message: {parse_error}");
                continue;
            }
        };
        debug!("Processing RPC method: {}", request.method);

        let status = ViewportStatus {
            phase: phase_name(*phase.get()),
            epoch: epoch.0,
            status: status_line(job.as_deref().map(|job| &job.stage), &progress),
            progress: progress.fraction(),
            characters_ready: progress.characters_ready,
            characters: record.as_deref().map_or(0, |record| record.characters),
        };
        let mut issued = Vec::new();
        if let Some(response) = handle_rpc_request(&request, &diagnostics, &status, &mut issued) {
            rpc_interface.queue_response(response);
        }
        requests.write_batch(issued);
    }
}

/// Handle individual RPC request and generate response based on method.
///
/// Mount and unmount requests are collected into `issued`; they take effect
/// once the lifecycle handles them, so the response only acknowledges them.
fn handle_rpc_request(
    request: &RpcRequest,
    diagnostics: &DiagnosticsStore,
    status: &ViewportStatus,
    issued: &mut Vec<ViewportRequest>,
) -> Option<RpcResponse> {
    let result = match request.method.as_str() {
        "mount_viewport" => {
            issued.push(ViewportRequest::Mount);
            Ok(serde_json::json!({ "accepted": true }))
        }
        "unmount_viewport" => {
            issued.push(ViewportRequest::Unmount);
            Ok(serde_json::json!({ "accepted": true }))
        }
        "get_viewport_status" => serde_json::to_value(status)
            .map_err(|e| RpcError::internal_error(&e.to_string())),
        "get_fps" => handle_get_fps(diagnostics),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            Err(RpcError::method_not_found(&request.method))
        }
    };

    // Notifications carry no ID and get no response.
    let id = request.id.clone()?;
    Some(match result {
        Ok(result_value) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        },
        Err(error) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        },
    })
}

/// Handle FPS retrieval with diagnostic system integration.
fn handle_get_fps(diagnostics: &DiagnosticsStore) -> Result<serde_json::Value, RpcError> {
    let fps = current_fps(diagnostics).unwrap_or(0.0) as f32;

    Ok(serde_json::json!({
        "fps": fps
    }))
}

/// Notification for a lifecycle transition, if the host page cares about it.
fn transition_notification(
    exited: Option<ViewportPhase>,
    entered: Option<ViewportPhase>,
    epoch: u64,
) -> Option<(&'static str, serde_json::Value)> {
    match (exited, entered) {
        (_, Some(ViewportPhase::Mounted)) => {
            Some(("viewport_mounted", serde_json::json!({ "epoch": epoch })))
        }
        (Some(ViewportPhase::Mounted), _) => {
            Some(("viewport_unmounted", serde_json::json!({ "epoch": epoch })))
        }
        _ => None,
    }
}

/// Forward lifecycle, roster and error events to the host page.
fn notify_viewport_events(
    mut transitions: EventReader<StateTransitionEvent<ViewportPhase>>,
    mut assembled: EventReader<CharactersAssembled>,
    mut errors: EventReader<ViewportErrorEvent>,
    epoch: Res<MountEpoch>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for transition in transitions.read() {
        if transition.exited == transition.entered {
            continue;
        }
        if let Some((method, params)) =
            transition_notification(transition.exited, transition.entered, epoch.0)
        {
            rpc_interface.send_notification(method, params);
        }
    }

    for event in assembled.read() {
        rpc_interface.send_notification(
            "characters_ready",
            serde_json::json!({ "epoch": event.epoch, "count": event.count }),
        );
    }

    for ViewportErrorEvent(err) in errors.read() {
        rpc_interface.send_notification(
            "viewport_error",
            serde_json::json!({
                "kind": err.kind(),
                "fatal": err.is_fatal(),
                "message": err.to_string(),
            }),
        );
    }
}

/// Send queued notifications and responses to the host page.
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

/// Send serialized message to parent window (host page).
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
        // No-op for non-WASM targets.
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: "Method not found".to_string(),
            data: Some(serde_json::json!({ "method": method })),
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::headless_app;

    fn request(method: &str, id: Option<u64>) -> RpcRequest {
        RpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params: serde_json::Value::Null,
            id: id.map(serde_json::Value::from),
        }
    }

    fn detached_status() -> ViewportStatus {
        ViewportStatus {
            phase: "detached",
            epoch: 0,
            status: String::new(),
            progress: 0.0,
            characters_ready: false,
            characters: 0,
        }
    }

    #[test]
    fn unknown_method_is_rejected() {
        let mut issued = Vec::new();
        let response = handle_rpc_request(
            &request("tool_selection", Some(3)),
            &DiagnosticsStore::default(),
            &detached_status(),
            &mut issued,
        )
        .expect("requests with an id get a response");

        assert_eq!(response.id, Some(serde_json::Value::from(3u64)));
        let error = response.error.expect("unknown method is an error");
        assert_eq!(error.code, -32601);
        assert_eq!(
            error.data,
            Some(serde_json::json!({ "method": "tool_selection" }))
        );
        assert!(issued.is_empty());
    }

    #[test]
    fn mount_notification_is_issued_without_response() {
        let mut issued = Vec::new();
        let response = handle_rpc_request(
            &request("mount_viewport", None),
            &DiagnosticsStore::default(),
            &detached_status(),
            &mut issued,
        );

        assert!(response.is_none());
        assert_eq!(issued, vec![ViewportRequest::Mount]);
    }

    #[test]
    fn status_reports_phase_and_progress() {
        let mut issued = Vec::new();
        let response = handle_rpc_request(
            &request("get_viewport_status", Some(1)),
            &DiagnosticsStore::default(),
            &detached_status(),
            &mut issued,
        )
        .expect("response");

        let result = response.result.expect("status result");
        assert_eq!(result["phase"], "detached");
        assert_eq!(result["epoch"], 0);
        assert_eq!(result["characters"], 0);
    }

    #[test]
    fn get_fps_defaults_to_zero_without_samples() {
        assert_eq!(
            handle_get_fps(&DiagnosticsStore::default())
                .ok()
                .map(|v| v["fps"].as_f64()),
            Some(Some(0.0))
        );
    }

    #[test]
    fn lifecycle_transitions_map_to_notifications() {
        let mounted =
            transition_notification(Some(ViewportPhase::Detached), Some(ViewportPhase::Mounted), 2);
        assert_eq!(mounted.map(|(method, _)| method), Some("viewport_mounted"));

        let unmounted =
            transition_notification(Some(ViewportPhase::Mounted), Some(ViewportPhase::Detached), 2);
        assert_eq!(unmounted.map(|(method, _)| method), Some("viewport_unmounted"));

        let faulted =
            transition_notification(Some(ViewportPhase::Detached), Some(ViewportPhase::Faulted), 0);
        assert!(faulted.is_none());
    }

    #[test]
    fn rpc_mount_request_mounts_the_viewport() {
        let mut app = headless_app();
        app.world_mut().send_event(IncomingRpcMessage {
            content: r#"{"jsonrpc":"2.0","method":"mount_viewport","id":7}"#.to_string(),
        });
        for _ in 0..3 {
            app.update();
        }

        let phase = app.world().resource::<State<ViewportPhase>>();
        assert_eq!(*phase.get(), ViewportPhase::Mounted);
        assert_eq!(app.world().resource::<MountEpoch>().0, 1);
    }
}
