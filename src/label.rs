//! QR Label Payloads
//!
//! Printed labels carry a small JSON document identifying what was scanned.
//! Encoding is plain JSON; decoding validates the shape before anything is
//! looked up.

use serde::{Deserialize, Serialize};

use crate::error::{LifecycleError, Result};

/// What a label is stuck on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelKind {
    Prop,
    Box,
    Location,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelPayload {
    #[serde(rename = "type")]
    pub kind: LabelKind,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_id: Option<String>,
}

impl LabelPayload {
    pub fn new(kind: LabelKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            name: None,
            show_id: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_show(mut self, show_id: impl Into<String>) -> Self {
        self.show_id = Some(show_id.into());
        self
    }
}

/// Serialize a payload for printing as a QR code
pub fn encode(payload: &LabelPayload) -> Result<String> {
    Ok(serde_json::to_string(payload)?)
}

/// Parse scanned QR text
pub fn decode(raw: &str) -> Result<LabelPayload> {
    let payload: LabelPayload = serde_json::from_str(raw.trim())
        .map_err(|e| LifecycleError::InvalidLabel(e.to_string()))?;

    if payload.id.trim().is_empty() {
        return Err(LifecycleError::InvalidLabel("empty id".to_string()));
    }
    Ok(payload)
}
