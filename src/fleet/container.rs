use chrono::{DateTime, NaiveDateTime, Utc};
use log::debug;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::fleet::humanize;
use crate::utils::types::{ContainerRecord, UpdateStatusRecord};

/// Rendered in place of a version that could not be inferred.
pub const UNKNOWN_VERSION: &str = "N/A";

const VERSION_LABEL: &str = "org.opencontainers.image.version";

/// Version variables set by well-known database and cache images.
const VERSION_ENVS: &[&str] = &["PG_VERSION", "REDIS_VERSION", "INFLUXDB_VERSION"];

/// Per-image version variables, keyed by image base name.
const IMAGE_VERSION_ENVS: &[(&str, &str)] = &[
    ("php", "PHP_VERSION"),
    ("nginx", "NGINX_VERSION"),
    ("python", "PYTHON_VERSION"),
];

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerState {
    Running,
    Exited,
    Paused,
    Other(String),
}

impl ContainerState {
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "running" => ContainerState::Running,
            "exited" => ContainerState::Exited,
            "paused" => ContainerState::Paused,
            _ => ContainerState::Other(raw.to_string()),
        }
    }
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerState::Running => write!(f, "running"),
            ContainerState::Exited => write!(f, "exited"),
            ContainerState::Paused => write!(f, "paused"),
            ContainerState::Other(s) => write!(f, "{}", s),
        }
    }
}

impl Serialize for ContainerState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// 单个容器的更新信息
///
/// Starts as "no update available" and is replaced wholesale when the
/// detailed status is merged in, so merging the same record twice is a no-op.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateStatus {
    /// Set once the service's detailed status has been merged in.
    pub detailed: bool,
    pub update_available: bool,
    pub current_version: Option<String>,
    pub latest_version: Option<String>,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub last_checked: Option<String>,
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct Container {
    pub id: String,
    pub container_id: String,
    pub host_id: String,
    pub name: String,
    pub image: String,
    pub state: ContainerState,
    pub ports: Vec<String>,
    pub healthy: Option<bool>,
    pub created: DateTime<Utc>,
    pub started: DateTime<Utc>,
    version: Option<String>,
    update_status: UpdateStatus,
}

impl Container {
    pub fn from_record(record: ContainerRecord, now: DateTime<Utc>) -> Self {
        let version = infer_version(&record);
        let created = parse_timestamp(record.created.as_deref(), now);
        let started = match record.started.as_deref() {
            Some(s) => parse_timestamp(Some(s), now),
            None => created,
        };
        Self {
            container_id: format!("{}:{}", record.host_id, record.id),
            id: record.id,
            host_id: record.host_id,
            name: record.name,
            image: record.image,
            state: ContainerState::parse(&record.state),
            ports: record.ports.unwrap_or_default(),
            healthy: record.healthy,
            created,
            started,
            version,
            update_status: UpdateStatus::default(),
        }
    }

    /// The inferred version, or `"N/A"`.
    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or(UNKNOWN_VERSION)
    }

    pub fn update_status(&self) -> &UpdateStatus {
        &self.update_status
    }

    pub fn update_available(&self) -> bool {
        self.update_status.update_available
    }

    /// Merge the detailed update status fetched from the service.
    ///
    /// `current_version` falls back to the inferred version when the service
    /// leaves it out; a value the service sends is never overridden.
    pub fn apply_update_status(&mut self, record: UpdateStatusRecord, now: DateTime<Utc>) {
        let current_version = record
            .current_version
            .filter(|v| !v.is_empty())
            .or_else(|| self.version.clone());
        let last_checked_at = record
            .last_checked_at
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| parse_timestamp(Some(s), now));
        self.update_status = UpdateStatus {
            detailed: true,
            update_available: record.update_available,
            current_version,
            latest_version: record.latest_version,
            last_checked: last_checked_at.map(|at| humanize::ago(at, now)),
            last_checked_at,
            extra: record.extra,
        };
    }

    pub fn created_display(&self) -> String {
        self.created.format(DISPLAY_FORMAT).to_string()
    }

    pub fn started_display(&self) -> String {
        self.started.format(DISPLAY_FORMAT).to_string()
    }

    pub fn running_for(&self, now: DateTime<Utc>) -> String {
        humanize::humanize(self.started, now)
    }
}

// ── 版本推断 ─────────────────────────────────────────────────────────────────

/// Infer a version from container metadata, first hit wins:
/// the OCI version label, a database/cache version variable, then a
/// variable specific to the image's base name.
///
/// When several database variables are set, `VERSION_ENVS` order decides;
/// the env map carries no order of its own.
pub fn infer_version(record: &ContainerRecord) -> Option<String> {
    let env = |key: &str| record.env.get(key).filter(|v| !v.is_empty()).cloned();

    if let Some(v) = record.labels.get(VERSION_LABEL).filter(|v| !v.is_empty()) {
        return Some(v.clone());
    }

    if let Some(v) = VERSION_ENVS.iter().find_map(|key| env(*key)) {
        return Some(v);
    }

    let base = image_base_name(&record.image);
    IMAGE_VERSION_ENVS
        .iter()
        .filter(|(image, _)| *image == base)
        .find_map(|(_, key)| env(*key))
}

/// `registry/library/nginx:1.25` → `nginx`
pub fn image_base_name(image: &str) -> &str {
    let without_tag = image.split(':').next().unwrap_or(image);
    without_tag.rsplit('/').next().unwrap_or(without_tag)
}

// ── 时间戳 ───────────────────────────────────────────────────────────────────

/// Parse an ISO-8601 timestamp as sent by the service.
///
/// Accepts RFC 3339 (with `Z` or an offset) or a naive timestamp read as UTC,
/// with fractions longer than nanoseconds truncated. Anything unparseable
/// becomes `now`: a bad timestamp degrades the display, it never fails the run.
pub fn parse_timestamp(raw: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return now;
    };
    let normalized = truncate_fraction(raw);

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return dt.with_timezone(&Utc);
    }
    let naive = normalized.trim_end_matches('Z');
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, fmt) {
            return dt.and_utc();
        }
    }

    debug!("unparseable timestamp {:?}, using current time", raw);
    now
}

fn truncate_fraction(raw: &str) -> String {
    let Some(dot) = raw.find('.') else {
        return raw.to_string();
    };
    let (head, tail) = raw.split_at(dot + 1);
    let digits = tail.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits <= 9 {
        return raw.to_string();
    }
    format!("{}{}{}", head, &tail[..9], &tail[digits..])
}
