//! 远程服务客户端
//! 其余模块只通过 [`Api`] trait 访问服务，测试中用 fake 替换 [`ApiClient`]

pub mod client;
#[cfg(test)]
pub mod fake;

pub use client::ApiClient;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::utils::{DockmonError, Result};

pub trait Api {
    /// GET `path` relative to the service base URL.
    fn get(&self, path: &str) -> Result<Value>;

    /// POST to `path` with no body and the given query parameters.
    fn post(&self, path: &str, query: &[(&str, &str)]) -> Result<Value>;
}

/// GET `path` 并解码为 `T`
pub fn fetch<T: DeserializeOwned>(api: &impl Api, path: &str) -> Result<T> {
    let value = api.get(path)?;
    serde_json::from_value(value).map_err(|e| DockmonError::Decode {
        path: path.to_string(),
        reason: e.to_string(),
    })
}
