//! 单元测试用的内存 [`Api`]，记录每次调用

use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::Value;

use crate::api::Api;
use crate::utils::{DockmonError, Result};

#[derive(Default)]
pub struct FakeApi {
    responses: HashMap<String, std::result::Result<Value, (u16, Value)>>,
    calls: RefCell<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `"GET hosts"`-style keys with `body`.
    pub fn on(mut self, key: &str, body: Value) -> Self {
        self.responses.insert(key.to_string(), Ok(body));
        self
    }

    /// Answer `key` with an HTTP error carrying `body`.
    pub fn fail(mut self, key: &str, status: u16, body: Value) -> Self {
        self.responses.insert(key.to_string(), Err((status, body)));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, key: &str) -> usize {
        self.calls.borrow().iter().filter(|c| c.as_str() == key).count()
    }

    fn answer(&self, key: String) -> Result<Value> {
        self.calls.borrow_mut().push(key.clone());
        match self.responses.get(&key) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err((status, body))) => Err(DockmonError::Http {
                status: *status,
                body: body.clone(),
            }),
            None => Err(DockmonError::Http {
                status: 404,
                body: serde_json::json!({ "detail": format!("no fake for {}", key) }),
            }),
        }
    }
}

impl Api for FakeApi {
    fn get(&self, path: &str) -> Result<Value> {
        self.answer(format!("GET {}", path.trim_start_matches('/')))
    }

    fn post(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        let mut key = format!("POST {}", path.trim_start_matches('/'));
        if !query.is_empty() {
            let q: Vec<String> = query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            key = format!("{}?{}", key, q.join("&"));
        }
        self.answer(key)
    }
}
