//! Decode capture events for display without invoking callbacks.

use arkwin_common::ArkwinError;
use arkwin_dispatch::{BoundaryEvent, HandleTable};
use serde::Serialize;

/// One decoded line of `arkwin inspect` output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectLine {
    pub index: usize,
    pub len: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<BoundaryEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Decode each event independently; one malformed event does not hide the
/// ones after it.
pub fn inspect(events: &[Vec<u8>]) -> Vec<InspectLine> {
    let handles = HandleTable::new();
    events
        .iter()
        .enumerate()
        .map(|(index, bytes)| match BoundaryEvent::decode(bytes, &handles) {
            Ok(event) => InspectLine {
                index,
                len: bytes.len(),
                event: Some(event),
                error: None,
            },
            Err(e) => InspectLine {
                index,
                len: bytes.len(),
                event: None,
                error: Some(e.to_string()),
            },
        })
        .collect()
}

/// Render lines as newline-delimited JSON.
pub fn to_json_lines(lines: &[InspectLine]) -> Result<String, ArkwinError> {
    let mut out = String::new();
    for line in lines {
        let json = serde_json::to_string(line)
            .map_err(|e| ArkwinError::Other(format!("failed to serialize event: {e}")))?;
        out.push_str(&json);
        out.push('\n');
    }
    Ok(out)
}
