//! 主机与容器信息收集
//! 来源：GET hosts / updates/summary / containers / update-status

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::api::{fetch, Api};
use crate::fleet::container::Container;
use crate::fleet::filter::ContainerFilter;
use crate::fleet::host::{ContainerOrder, Fleet, Host};
use crate::utils::types::{ContainerRecord, HostRecord, UpdateSummary, UpdateStatusRecord};
use crate::utils::Result;

/// Which part of the fleet a run operates on.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Host name or id.
    pub host: Option<String>,
    pub filter: ContainerFilter,
    pub updates_only: bool,
    pub order: ContainerOrder,
}

impl Selection {
    fn wants_host(&self, host: &HostRecord) -> bool {
        match self.host.as_deref() {
            None | Some("") => true,
            Some(h) => host.name == h || host.id == h,
        }
    }
}

// ── 收集入口 ─────────────────────────────────────────────────────────────────

/// One pass of fetch and reconcile: hosts, the update summary, the container
/// listing, then detailed status only for flagged containers.
pub fn collect(api: &impl Api, selection: &Selection) -> Result<Fleet> {
    collect_at(api, selection, Utc::now())
}

pub fn collect_at(api: &impl Api, selection: &Selection, now: DateTime<Utc>) -> Result<Fleet> {
    let mut fleet = Fleet::default();
    for record in fetch::<Vec<HostRecord>>(api, "hosts")? {
        if selection.wants_host(&record) {
            fleet.push(Host::new(record, selection.order));
        }
    }
    debug!("{} host(s) selected", fleet.hosts().len());

    let summary: UpdateSummary = fetch(api, "updates/summary")?;
    let records: Vec<ContainerRecord> = fetch(api, "containers")?;
    let total = records.len();

    let mut working: Vec<Container> = records
        .into_iter()
        .map(|r| Container::from_record(r, now))
        .filter(|c| fleet.contains_host(&c.host_id) && selection.filter.matches(c))
        .collect();
    debug!("{} of {} container(s) match", working.len(), total);

    reconcile(api, &mut working, &summary, now)?;

    for container in working {
        if selection.updates_only && !container.update_available() {
            continue;
        }
        if let Some(host) = fleet.host_mut(&container.host_id) {
            host.add_container(container)?;
        }
    }
    for host in fleet.hosts() {
        debug!("{}: {} update(s) available", host.name, host.updates_available().len());
    }
    Ok(fleet)
}

// ── update-status ────────────────────────────────────────────────────────────

/// Fetch detailed update status for each container the summary flags.
///
/// Unflagged containers keep the default "no update" status and cost no
/// request. Returns the number of detail fetches made.
pub fn reconcile(
    api: &impl Api,
    containers: &mut [Container],
    summary: &UpdateSummary,
    now: DateTime<Utc>,
) -> Result<usize> {
    let mut fetched = 0;
    for container in containers.iter_mut() {
        if !summary.contains(&container.container_id) {
            continue;
        }
        let path = format!(
            "hosts/{}/containers/{}/update-status",
            container.host_id, container.id
        );
        let status: UpdateStatusRecord = fetch(api, &path)?;
        container.apply_update_status(status, now);
        fetched += 1;
    }
    if fetched > 0 {
        info!("fetched update status for {} container(s)", fetched);
    }
    Ok(fetched)
}
