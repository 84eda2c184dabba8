//! Widget voice-call state machine.
//!
//! The browser-side voice pane is driven by a small state machine:
//! `idle -> connecting -> active -> idle`. The table here is the single
//! source of truth; the embed script renderer serializes it into the
//! generated JavaScript so the client cannot drift from the model. There is
//! no direct `idle -> active` edge: a call must pass through `connecting`,
//! and every terminal event collapses back to `idle`.

use serde_json::{json, Value};

/// Connection state of the widget voice pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Idle,
    Connecting,
    Active,
}

impl CallState {
    pub const ALL: [CallState; 3] = [Self::Idle, Self::Connecting, Self::Active];

    /// Name used in the generated script and in logs.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Active => "active",
        }
    }
}

impl std::fmt::Display for CallState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Events that can reach the voice pane.
///
/// `CallStarted`, `CallEnded` and the talking events originate from the
/// vendor SDK; the rest are user interactions or local failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallEvent {
    /// User clicked the call button.
    StartRequested,
    /// Microphone permission denied; fails closed.
    MicrophoneDenied,
    /// Call setup failed before the session opened.
    ConnectFailed,
    /// Vendor SDK "call_started" event.
    CallStarted,
    /// Vendor SDK "call_ended" event.
    CallEnded,
    /// User clicked stop/hang-up.
    StopRequested,
}

impl CallEvent {
    pub const ALL: [CallEvent; 6] = [
        Self::StartRequested,
        Self::MicrophoneDenied,
        Self::ConnectFailed,
        Self::CallStarted,
        Self::CallEnded,
        Self::StopRequested,
    ];

    /// Name used in the generated script.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::StartRequested => "start_requested",
            Self::MicrophoneDenied => "microphone_denied",
            Self::ConnectFailed => "connect_failed",
            Self::CallStarted => "call_started",
            Self::CallEnded => "call_ended",
            Self::StopRequested => "stop_requested",
        }
    }
}

/// Apply an event to a state. Returns `None` when the event is ignored in
/// that state (the client treats this as a no-op, not an error).
pub fn transition(state: CallState, event: CallEvent) -> Option<CallState> {
    use CallEvent::*;
    use CallState::*;

    match (state, event) {
        (Idle, StartRequested) => Some(Connecting),
        (Connecting, MicrophoneDenied) => Some(Idle),
        (Connecting, ConnectFailed) => Some(Idle),
        (Connecting, CallStarted) => Some(Active),
        (Connecting, StopRequested) => Some(Idle),
        (Active, CallEnded) => Some(Idle),
        (Active, StopRequested) => Some(Idle),
        _ => None,
    }
}

/// The full transition table as a JSON object keyed by state then event,
/// ready to embed into the generated widget script:
/// `{"idle": {"start_requested": "connecting"}, ...}`.
pub fn transition_table_json() -> Value {
    let mut table = serde_json::Map::new();
    for state in CallState::ALL {
        let mut edges = serde_json::Map::new();
        for event in CallEvent::ALL {
            if let Some(next) = transition(state, event) {
                edges.insert(event.wire_name().to_string(), json!(next.wire_name()));
            }
        }
        table.insert(state.wire_name().to_string(), Value::Object(edges));
    }
    Value::Object(table)
}
