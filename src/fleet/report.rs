//! JSON 报告结构体

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::fleet::container::{Container, ContainerState, UpdateStatus};
use crate::fleet::host::{Fleet, Host};

pub const NO_MATCH_MESSAGE: &str = "No containers matching the filter found";

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum FleetReport<'a> {
    Hosts(Vec<HostReport<'a>>),
    Empty { message: &'static str },
}

#[derive(Debug, Serialize)]
pub struct HostSummary<'a> {
    pub id: &'a str,
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct HostReport<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub containers: Vec<ContainerReport<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ContainerReport<'a> {
    pub id: &'a str,
    pub container_id: &'a str,
    pub name: &'a str,
    pub host: HostSummary<'a>,
    pub update_status: UpdateStatusReport<'a>,
    pub version: &'a str,
    pub state: &'a ContainerState,
    pub ports: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healthy: Option<bool>,
    pub image: &'a str,
    pub created: String,
    pub started: String,
    pub running_for: String,
}

/// The outer `Option` decides whether a key is written at all; a detailed
/// status writes its version and check fields even when they are `null`.
#[derive(Debug, Serialize)]
pub struct UpdateStatusReport<'a> {
    pub update_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_version: Option<Option<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<Option<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_checked_at: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<&'a str>,
    #[serde(flatten)]
    pub extra: &'a serde_json::Map<String, serde_json::Value>,
}

/// Hosts without containers are left out; an empty result becomes a message.
pub fn build(fleet: &Fleet, now: DateTime<Utc>) -> FleetReport<'_> {
    let hosts: Vec<HostReport<'_>> = fleet
        .hosts()
        .iter()
        .filter(|h| !h.is_empty())
        .map(|h| host_report(h, now))
        .collect();
    if hosts.is_empty() {
        FleetReport::Empty { message: NO_MATCH_MESSAGE }
    } else {
        FleetReport::Hosts(hosts)
    }
}

fn host_report(host: &Host, now: DateTime<Utc>) -> HostReport<'_> {
    HostReport {
        id: &host.id,
        name: &host.name,
        containers: host
            .containers()
            .into_iter()
            .map(|c| container_report(host, c, now))
            .collect(),
    }
}

fn container_report<'a>(host: &'a Host, c: &'a Container, now: DateTime<Utc>) -> ContainerReport<'a> {
    ContainerReport {
        id: &c.id,
        container_id: &c.container_id,
        name: &c.name,
        host: HostSummary { id: &host.id, name: &host.name },
        update_status: status_report(c.update_status()),
        version: c.version(),
        state: &c.state,
        ports: &c.ports,
        healthy: c.healthy,
        image: &c.image,
        created: c.created_display(),
        started: c.started_display(),
        running_for: c.running_for(now),
    }
}

fn status_report(status: &UpdateStatus) -> UpdateStatusReport<'_> {
    let reported = |field| status.detailed.then_some(field);
    UpdateStatusReport {
        update_available: status.update_available,
        current_version: reported(status.current_version.as_deref()),
        latest_version: reported(status.latest_version.as_deref()),
        last_checked_at: status.detailed.then(|| {
            status
                .last_checked_at
                .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
        }),
        last_checked: status.last_checked.as_deref(),
        extra: &status.extra,
    }
}
