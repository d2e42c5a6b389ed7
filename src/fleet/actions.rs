//! 变更操作：检查更新、强制更新、重启

use log::debug;
use serde_json::Value;

use crate::api::Api;
use crate::utils::{DockmonError, Result};

/// Error detail the service returns when a forced update finds nothing to do.
pub const NO_UPDATE_DETAIL: &str = "No update available for this container";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    /// A rejection that still means "nothing is wrong".
    Benign,
    Failed,
}

impl Outcome {
    pub fn glyph(self) -> &'static str {
        match self {
            Outcome::Succeeded | Outcome::Benign => "✅",
            Outcome::Failed => "❌",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActionReport {
    pub outcome: Outcome,
    pub message: String,
    /// The response or error body exactly as the service sent it.
    pub payload: Value,
}

/// Trigger an update check for one container, or for every container when
/// `target` is `None`.
pub fn check_updates(api: &impl Api, target: Option<(&str, &str)>) -> Result<Value> {
    match target {
        Some((host_id, container_id)) => api.post(
            &format!("hosts/{}/containers/{}/check-update", host_id, container_id),
            &[],
        ),
        None => api.post("updates/check-all", &[]),
    }
}

pub fn execute_update(api: &impl Api, host_id: &str, container_id: &str) -> Result<ActionReport> {
    let path = format!("hosts/{}/containers/{}/execute-update", host_id, container_id);
    match api.post(&path, &[("force", "true")]) {
        Ok(body) => Ok(from_response(body)),
        Err(err @ DockmonError::Http { .. }) => {
            let detail = detail_text(&err);
            let (outcome, message) = if detail == NO_UPDATE_DETAIL {
                debug!("{}: {}", container_id, detail);
                (Outcome::Benign, detail)
            } else {
                (Outcome::Failed, format!("HTTP exception: {}", detail))
            };
            Ok(ActionReport { outcome, message, payload: into_body(err) })
        }
        Err(err) => Err(err),
    }
}

pub fn execute_restart(api: &impl Api, host_id: &str, container_id: &str) -> Result<ActionReport> {
    let path = format!("hosts/{}/containers/{}/restart", host_id, container_id);
    match api.post(&path, &[]) {
        Ok(body) => Ok(from_response(body)),
        Err(err @ DockmonError::Http { .. }) => Ok(ActionReport {
            outcome: Outcome::Failed,
            message: detail_text(&err),
            payload: into_body(err),
        }),
        Err(err) => Err(err),
    }
}

fn from_response(body: Value) -> ActionReport {
    let outcome = if body.get("status").and_then(Value::as_str) == Some("success") {
        Outcome::Succeeded
    } else {
        Outcome::Failed
    };
    let message = match body.get("message").and_then(Value::as_str) {
        Some(m) => m.to_string(),
        None => body.to_string(),
    };
    ActionReport { outcome, message, payload: body }
}

fn detail_text(err: &DockmonError) -> String {
    match (err.detail(), err) {
        (Some(detail), _) => detail.to_string(),
        (None, DockmonError::Http { body: Value::String(s), .. }) => s.clone(),
        (None, DockmonError::Http { body, .. }) => body.to_string(),
        (None, other) => other.to_string(),
    }
}

fn into_body(err: DockmonError) -> Value {
    match err {
        DockmonError::Http { body, .. } => body,
        other => Value::String(other.to_string()),
    }
}
