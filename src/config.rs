//! API 凭据解析
//! 来源：环境变量 → ~/.config/dockmon/config.ini → Docker secrets
//!
//! Whichever source supplies the key also supplies the URL.
//! 配置文件为 INI，`[api]` 段包含 `url` 和 `key`；以 `.toml` 结尾的路径按 TOML 读取。

use std::path::{Path, PathBuf};

use ini::{Ini, ParseOption};
use log::debug;
use serde::Deserialize;

use crate::utils::{DockmonError, Result};

const SECRETS_DIR: &str = "/run/secrets";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub url: String,
    pub key: String,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    api: ApiSection,
}

#[derive(Debug, Default, Deserialize)]
struct ApiSection {
    url: Option<String>,
    key: Option<String>,
}

/// Where credentials may come from.
#[derive(Debug, Clone, Default)]
pub struct Sources {
    pub env_url: Option<String>,
    pub env_key: Option<String>,
    pub config_path: Option<PathBuf>,
    pub secrets_dir: PathBuf,
}

impl Sources {
    pub fn from_env() -> Self {
        let config_path = std::env::var_os("DOCKMON_CONFIG")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| default_config_path(&h.join(".config").join("dockmon"))));
        Self {
            env_url: std::env::var("DOCKMON_API_URL").ok(),
            env_key: std::env::var("DOCKMON_API_KEY").ok(),
            config_path,
            secrets_dir: PathBuf::from(SECRETS_DIR),
        }
    }
}

/// `config.ini`, unless only a `config.toml` exists next to it.
fn default_config_path(dir: &Path) -> PathBuf {
    let ini = dir.join("config.ini");
    let toml = dir.join("config.toml");
    if !ini.exists() && toml.exists() {
        toml
    } else {
        ini
    }
}

pub fn resolve_credentials() -> Result<Credentials> {
    resolve(&Sources::from_env())
}

pub fn resolve(sources: &Sources) -> Result<Credentials> {
    let mut url = non_empty(sources.env_url.clone());
    let mut key = non_empty(sources.env_key.clone());

    if key.is_none() {
        if let Some(path) = &sources.config_path {
            (url, key) = read_config_file(path)?;
            if key.is_some() {
                debug!("using credentials from {}", path.display());
            }
        }
    }

    if key.is_none() {
        key = read_secret(&sources.secrets_dir, "dockmon_api_key");
        url = read_secret(&sources.secrets_dir, "dockmon_api_url");
        if key.is_some() {
            debug!("using credentials from Docker secrets");
        }
    }

    match (url, key) {
        (Some(url), Some(key)) => Ok(Credentials { url, key }),
        _ => Err(DockmonError::MissingCredentials),
    }
}

/// 文件不存在 → 无凭据；无法读取或格式错误 → 报错
fn read_config_file(path: &Path) -> Result<(Option<String>, Option<String>)> {
    if !path.exists() {
        return Ok((None, None));
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| DockmonError::Config(format!("cannot read {}: {}", path.display(), e)))?;
    let parse_error = |e: &dyn std::fmt::Display| {
        DockmonError::Config(format!("cannot parse {}: {}", path.display(), e))
    };
    let api = if path.extension().is_some_and(|ext| ext == "toml") {
        toml::from_str::<ConfigFile>(&content).map_err(|e| parse_error(&e))?.api
    } else {
        parse_ini(&content).map_err(|e| parse_error(&e))?
    };
    Ok((non_empty(api.url), non_empty(api.key)))
}

/// 值按原样读取，不处理转义
fn parse_ini(content: &str) -> std::result::Result<ApiSection, ini::ParseError> {
    let options = ParseOption { enabled_escape: false, ..ParseOption::default() };
    let ini = Ini::load_from_str_opt(content, options)?;
    let get = |name: &str| {
        ini.section(Some("api"))
            .and_then(|section| section.get(name))
            .map(|v| v.trim().to_string())
    };
    Ok(ApiSection { url: get("url"), key: get("key") })
}

fn read_secret(dir: &Path, name: &str) -> Option<String> {
    let content = std::fs::read_to_string(dir.join(name)).ok()?;
    non_empty(Some(content.trim().to_string()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
