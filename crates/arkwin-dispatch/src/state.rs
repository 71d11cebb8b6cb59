use serde::Serialize;
use std::fmt;

/// Where the dispatcher is inside a drain pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchState {
    /// Not draining.
    #[default]
    Idle,
    /// Waiting on the native poll call.
    Polling,
    /// Reading the event-kind tag.
    Decoding,
    /// Running the action for one event.
    Dispatching,
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DispatchState::Idle => "idle",
            DispatchState::Polling => "polling",
            DispatchState::Decoding => "decoding",
            DispatchState::Dispatching => "dispatching",
        };
        f.write_str(name)
    }
}
