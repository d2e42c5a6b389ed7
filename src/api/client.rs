use std::io::Read;
use std::time::Duration;

use log::debug;
use serde_json::Value;

use crate::api::Api;
use crate::config::Credentials;
use crate::utils::{DockmonError, Result};

/// 阻塞式 HTTP 客户端，每个请求都带 Bearer token
pub struct ApiClient {
    base_url: String,
    authorization: String,
    agent: ureq::Agent,
}

impl ApiClient {
    pub fn new(credentials: &Credentials, timeout: Option<Duration>) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            base_url: credentials.url.trim_end_matches('/').to_string(),
            authorization: format!("Bearer {}", credentials.key),
            agent: builder.build(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Api for ApiClient {
    fn get(&self, path: &str) -> Result<Value> {
        let url = self.url(path);
        debug!("GET {}", url);
        let response = self
            .agent
            .get(&url)
            .set("Authorization", &self.authorization)
            .call();
        decode(response)
    }

    fn post(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        let url = self.url(path);
        debug!("POST {} {:?}", url, query);
        let mut request = self
            .agent
            .post(&url)
            .set("Authorization", &self.authorization);
        for (key, value) in query {
            request = request.query(key, value);
        }
        decode(request.call())
    }
}

fn decode(response: std::result::Result<ureq::Response, ureq::Error>) -> Result<Value> {
    match response {
        Ok(resp) => {
            let url = resp.get_url().to_string();
            let bytes = read_body(resp)?;
            parse_body(&bytes).map_err(|e| DockmonError::Decode {
                path: url,
                reason: e.to_string(),
            })
        }
        Err(ureq::Error::Status(status, resp)) => {
            let bytes = read_body(resp).unwrap_or_default();
            let text = String::from_utf8_lossy(&bytes).into_owned();
            debug!("HTTP {} body: {}", status, text);
            let body = parse_body(&bytes).unwrap_or(Value::String(text));
            Err(DockmonError::Http { status, body })
        }
        Err(ureq::Error::Transport(t)) => Err(DockmonError::Transport(t.to_string())),
    }
}

/// 读取完整响应体。`into_string` 上限 10 MB，大规模集群的容器列表会超出
fn read_body(resp: ureq::Response) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    resp.into_reader()
        .read_to_end(&mut bytes)
        .map_err(|e| DockmonError::Transport(format!("reading response body: {}", e)))?;
    Ok(bytes)
}

/// 空响应体解码为 `null`
fn parse_body(bytes: &[u8]) -> serde_json::Result<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    fn client(url: &str) -> ApiClient {
        ApiClient::new(
            &Credentials { url: url.to_string(), key: "secret".to_string() },
            None,
        )
    }

    #[test]
    fn url_joins_without_duplicate_slashes() {
        let c = client("https://dockmon.example/api/");
        assert_eq!(c.url("/hosts"), "https://dockmon.example/api/hosts");
        assert_eq!(c.url("updates/summary"), "https://dockmon.example/api/updates/summary");
    }

    #[test]
    fn authorization_uses_bearer_scheme() {
        assert_eq!(client("http://x").authorization, "Bearer secret");
    }

    #[test]
    fn empty_body_is_null() {
        assert_eq!(parse_body(b"  \n").unwrap(), Value::Null);
        assert_eq!(parse_body(b"").unwrap(), Value::Null);
        assert_eq!(parse_body(br#"{"status":"success"}"#).unwrap()["status"], "success");
        assert!(parse_body(b"<html>").is_err());
    }

    /// Serve one canned HTTP response on a local port and return its base URL.
    fn serve_once(status: &str, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let status = status.to_string();
        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
                line.clear();
            }
            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            )
            .unwrap();
            stream.write_all(&body).unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn body_larger_than_ten_megabytes_is_decoded() {
        let record = format!(r#"{{"id":"c","name":"web","env":{{"PAD":"{}"}}}}"#, "x".repeat(2000));
        let listing = format!("[{}]", vec![record; 5500].join(","));
        assert!(listing.len() > 10 * 1024 * 1024);

        let c = client(&serve_once("200 OK", listing.into_bytes()));
        let value = c.get("containers").unwrap();
        assert_eq!(value.as_array().unwrap().len(), 5500);
        assert_eq!(value[5499]["name"], "web");
    }

    #[test]
    fn empty_response_is_null() {
        let c = client(&serve_once("200 OK", Vec::new()));
        assert_eq!(c.post("updates/check-all", &[]).unwrap(), Value::Null);
    }

    #[test]
    fn status_error_keeps_json_body() {
        let c = client(&serve_once("404 Not Found", br#"{"detail":"Host not found"}"#.to_vec()));
        match c.get("hosts/missing") {
            Err(err @ DockmonError::Http { status: 404, .. }) => {
                assert_eq!(err.detail(), Some("Host not found"));
            }
            other => panic!("expected HTTP 404, got {:?}", other),
        }
    }

    #[test]
    fn unreachable_server_is_a_transport_error() {
        let c = ApiClient::new(
            &Credentials { url: "http://127.0.0.1:9".to_string(), key: "k".to_string() },
            Some(Duration::from_secs(2)),
        );
        assert!(matches!(c.get("hosts"), Err(DockmonError::Transport(_))));
    }
}
