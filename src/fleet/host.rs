use clap::ValueEnum;

use crate::fleet::container::Container;
use crate::utils::types::HostRecord;
use crate::utils::{DockmonError, Result};

/// 容器列表排序键
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ContainerOrder {
    #[default]
    Name,
    Image,
    State,
    #[value(name = "update_available")]
    UpdateAvailable,
}

#[derive(Debug, Clone)]
pub struct Host {
    pub id: String,
    pub name: String,
    pub container_order: ContainerOrder,
    containers: Vec<Container>,
}

impl Host {
    pub fn new(record: HostRecord, container_order: ContainerOrder) -> Self {
        Self {
            id: record.id,
            name: record.name,
            container_order,
            containers: Vec::new(),
        }
    }

    /// Take ownership of a container reported for this host.
    pub fn add_container(&mut self, container: Container) -> Result<()> {
        if container.host_id != self.id {
            return Err(DockmonError::HostMismatch {
                container: container.container_id,
                container_host: container.host_id,
                host: self.id.clone(),
            });
        }
        self.containers.push(container);
        Ok(())
    }

    /// 按 `container_order` 排序，相等时保持原顺序
    pub fn containers(&self) -> Vec<&Container> {
        let mut sorted: Vec<&Container> = self.containers.iter().collect();
        match self.container_order {
            ContainerOrder::Name => sorted.sort_by(|a, b| a.name.cmp(&b.name)),
            ContainerOrder::Image => sorted.sort_by(|a, b| a.image.cmp(&b.image)),
            ContainerOrder::State => {
                sorted.sort_by_cached_key(|c| c.state.to_string());
            }
            ContainerOrder::UpdateAvailable => sorted.sort_by_key(|c| c.update_available()),
        }
        sorted
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    pub fn updates_available(&self) -> Vec<&Container> {
        self.containers()
            .into_iter()
            .filter(|c| c.update_available())
            .collect()
    }
}

/// Hosts selected for this run, in the order the service listed them.
#[derive(Debug, Clone, Default)]
pub struct Fleet {
    hosts: Vec<Host>,
}

impl Fleet {
    pub fn push(&mut self, host: Host) {
        self.hosts.push(host);
    }

    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    pub fn host(&self, id: &str) -> Option<&Host> {
        self.hosts.iter().find(|h| h.id == id)
    }

    pub fn host_mut(&mut self, id: &str) -> Option<&mut Host> {
        self.hosts.iter_mut().find(|h| h.id == id)
    }

    pub fn contains_host(&self, id: &str) -> bool {
        self.host(id).is_some()
    }

    /// Every selected container with its owning host, in display order.
    pub fn containers(&self) -> impl Iterator<Item = (&Host, &Container)> {
        self.hosts
            .iter()
            .flat_map(|h| h.containers().into_iter().map(move |c| (h, c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::types::ContainerRecord;
    use chrono::Utc;
    use serde_json::json;

    fn host(order: ContainerOrder) -> Host {
        Host::new(HostRecord { id: "h1".into(), name: "alpha".into() }, order)
    }

    fn container(id: &str, name: &str, image: &str, state: &str) -> Container {
        let record: ContainerRecord = serde_json::from_value(json!({
            "id": id,
            "name": name,
            "host_id": "h1",
            "image": image,
            "state": state,
        }))
        .unwrap();
        Container::from_record(record, Utc::now())
    }

    fn names(h: &Host) -> Vec<&str> {
        h.containers().into_iter().map(|c| c.name.as_str()).collect()
    }

    fn filled(order: ContainerOrder) -> Host {
        let mut h = host(order);
        h.add_container(container("1", "web", "nginx", "running")).unwrap();
        h.add_container(container("2", "cache", "redis", "exited")).unwrap();
        h.add_container(container("3", "db", "postgres", "paused")).unwrap();
        h
    }

    #[test]
    fn default_order_is_by_name() {
        assert_eq!(names(&filled(ContainerOrder::default())), ["cache", "db", "web"]);
    }

    #[test]
    fn image_and_state_orders() {
        assert_eq!(names(&filled(ContainerOrder::Image)), ["web", "db", "cache"]);
        assert_eq!(names(&filled(ContainerOrder::State)), ["cache", "db", "web"]);
    }

    #[test]
    fn rejects_container_of_another_host() {
        let mut h = host(ContainerOrder::Name);
        let mut stray = container("9", "stray", "busybox", "running");
        stray.host_id = "h2".into();
        let err = h.add_container(stray).unwrap_err();
        assert!(matches!(err, DockmonError::HostMismatch { .. }));
        assert!(h.is_empty());
    }

    #[test]
    fn order_value_names() {
        assert_eq!(
            ContainerOrder::from_str("update_available", false).unwrap(),
            ContainerOrder::UpdateAvailable
        );
    }
}
