//! Capture files: recorded boundary traffic plus the callbacks it targets.
//!
//! ```json
//! {
//!   "callbacks": [{ "id": 1, "kind": "rect" }],
//!   "events": ["AAAAAAYAAAABAAAA..."]
//! }
//! ```
//!
//! Events are base64 of the exact bytes the native side wrote for each poll.

use std::path::Path;

use arkwin_common::{ArkwinError, ResourceId};
use arkwin_dispatch::{BoundaryEvent, CallbackArgs, CallbackKind};
use arkwin_wire::{FoldCreaseRegion, FoldStatus, Rect};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// A callback the captured events expect to exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackDecl {
    pub id: ResourceId,
    pub kind: CallbackKind,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Capture {
    pub callbacks: Vec<CallbackDecl>,
    pub events: Vec<String>,
}

impl Capture {
    pub fn load(path: &Path) -> Result<Self, ArkwinError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            ArkwinError::Capture(format!("failed to parse {}: {e}", path.display()))
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ArkwinError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ArkwinError::Capture(format!("failed to serialize capture: {e}")))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn push_event(&mut self, bytes: &[u8]) {
        self.events.push(STANDARD.encode(bytes));
    }

    /// Raw bytes of every event, in capture order.
    pub fn event_bytes(&self) -> Result<Vec<Vec<u8>>, ArkwinError> {
        self.events
            .iter()
            .enumerate()
            .map(|(i, encoded)| {
                let bytes = STANDARD
                    .decode(encoded)
                    .map_err(|e| ArkwinError::Capture(format!("event {i}: invalid base64: {e}")))?;
                if bytes.is_empty() {
                    return Err(ArkwinError::Capture(format!("event {i} is empty")));
                }
                Ok(bytes)
            })
            .collect()
    }

    /// A small capture exercising fold listeners and resource holds.
    pub fn sample() -> Self {
        let fold = ResourceId(1);
        let crease = ResourceId(2);
        let area = ResourceId(3);

        let mut capture = Capture {
            callbacks: vec![
                CallbackDecl {
                    id: fold,
                    kind: CallbackKind::FoldStatus,
                },
                CallbackDecl {
                    id: crease,
                    kind: CallbackKind::FoldCreaseRegion,
                },
                CallbackDecl {
                    id: area,
                    kind: CallbackKind::Rect,
                },
            ],
            events: Vec::new(),
        };

        let events = [
            BoundaryEvent::hold(fold),
            BoundaryEvent::call(fold, CallbackArgs::FoldStatus(FoldStatus::HalfFolded)),
            BoundaryEvent::call(
                crease,
                CallbackArgs::FoldCreaseRegion(FoldCreaseRegion {
                    display_id: 0.0,
                    crease_rects: vec![Rect::new(0.0, 1136.0, 1080.0, 48.0)],
                }),
            ),
            BoundaryEvent::call(area, CallbackArgs::Rect(Rect::new(0.0, 0.0, 1080.0, 2340.0))),
            BoundaryEvent::call(fold, CallbackArgs::FoldStatus(FoldStatus::Expanded)),
            BoundaryEvent::release(fold),
        ];
        for event in &events {
            capture.push_event(&event.encode());
        }
        capture
    }
}
