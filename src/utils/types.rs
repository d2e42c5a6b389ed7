//! 服务返回的原始数据结构

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostRecord {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerRecord {
    pub id: String,
    pub name: String,
    pub host_id: String,
    pub image: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub ports: Option<Vec<String>>,
    #[serde(default)]
    pub healthy: Option<bool>,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default, alias = "started_at")]
    pub started: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSummary {
    #[serde(default)]
    pub containers_with_updates: HashSet<String>,
}

impl UpdateSummary {
    pub fn contains(&self, container_id: &str) -> bool {
        self.containers_with_updates.contains(container_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStatusRecord {
    #[serde(default)]
    pub update_available: bool,
    #[serde(default)]
    pub current_version: Option<String>,
    #[serde(default)]
    pub latest_version: Option<String>,
    #[serde(default)]
    pub last_checked_at: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
