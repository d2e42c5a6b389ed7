//! 按名称和镜像筛选容器

use crate::fleet::container::Container;

/// Names known to carry a deployment-specific suffix (`www1`, `php-fpm`, ...).
/// Only these may match a container name as a substring; every other name
/// filter requires exact equality.
pub const PARTIAL_MATCH_NAMES: &[&str] = &["www", "php", "librenms"];

#[derive(Debug, Clone, Default)]
pub struct ContainerFilter {
    pub name: Option<String>,
    pub image: Option<String>,
}

impl ContainerFilter {
    pub fn new(name: Option<String>, image: Option<String>) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
        Self {
            name: non_empty(name),
            image: non_empty(image),
        }
    }

    pub fn matches(&self, container: &Container) -> bool {
        matches(container, self.name.as_deref(), self.image.as_deref())
    }
}

pub fn matches(container: &Container, name_filter: Option<&str>, image_filter: Option<&str>) -> bool {
    let image_ok = image_filter.map_or(true, |image| container.image.contains(image));
    let name_ok = name_filter.map_or(true, |name| name_matches(&container.name, name));
    image_ok && name_ok
}

fn name_matches(container_name: &str, filter: &str) -> bool {
    filter == container_name
        || (PARTIAL_MATCH_NAMES.contains(&filter) && container_name.contains(filter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::types::ContainerRecord;
    use chrono::Utc;
    use serde_json::json;

    fn container(name: &str, image: &str) -> Container {
        let record: ContainerRecord = serde_json::from_value(json!({
            "id": "c1",
            "name": name,
            "host_id": "h1",
            "image": image,
            "state": "running",
        }))
        .unwrap();
        Container::from_record(record, Utc::now())
    }

    #[test]
    fn no_filters_match_everything() {
        assert!(matches(&container("anything", "busybox"), None, None));
        let blank = ContainerFilter::new(Some(String::new()), None);
        assert!(blank.name.is_none());
        assert!(blank.matches(&container("anything", "busybox")));
    }

    #[test]
    fn exact_name_matches_even_when_only_a_prefix_is_allow_listed() {
        let c = container("www1", "nginx:1.25");
        assert!(matches(&c, Some("www1"), None));
    }

    #[test]
    fn allow_listed_name_matches_as_substring() {
        assert!(matches(&container("www1", "nginx"), Some("www"), None));
        assert!(matches(&container("php-fpm", "php:8.3"), Some("php"), None));
    }

    #[test]
    fn other_names_require_exact_equality() {
        assert!(!matches(&container("postgres-main", "postgres:16"), Some("postgres"), None));
        assert!(!matches(&container("www", "nginx"), Some("www1"), None));
    }

    #[test]
    fn image_filter_is_a_substring_match() {
        let c = container("db", "docker.io/library/postgres:16");
        assert!(matches(&c, None, Some("postgres")));
        assert!(!matches(&c, None, Some("mysql")));
    }

    #[test]
    fn both_filters_must_hold() {
        let c = container("www2", "nginx:1.25");
        assert!(matches(&c, Some("www"), Some("nginx")));
        assert!(!matches(&c, Some("www"), Some("apache")));
        assert!(!matches(&c, Some("web"), Some("nginx")));
    }
}
