use thiserror::Error;

#[derive(Error, Debug)]
pub enum DockmonError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(
        "DOCKMON_API_KEY and DOCKMON_API_URL must be set via environment variables, \
         ~/.config/dockmon/config.ini, or Docker secrets."
    )]
    MissingCredentials,

    #[error("Config error: {0}")]
    Config(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: serde_json::Value },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error in {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("Container {container} belongs to host {container_host}, not {host}")]
    HostMismatch {
        container: String,
        container_host: String,
        host: String,
    },

    #[error("Output error: {0}")]
    Output(String),
}

impl DockmonError {
    /// The `detail` field of a decoded HTTP error body, if the service sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            DockmonError::Http { body, .. } => body.get("detail").and_then(|d| d.as_str()),
            _ => None,
        }
    }

    /// Errors raised while talking to the service, as opposed to local ones.
    pub fn is_request(&self) -> bool {
        matches!(
            self,
            DockmonError::Http { .. } | DockmonError::Transport(_) | DockmonError::Decode { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DockmonError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detail_reads_http_error_body() {
        let err = DockmonError::Http {
            status: 400,
            body: json!({"detail": "No update available for this container"}),
        };
        assert_eq!(err.detail(), Some("No update available for this container"));
    }

    #[test]
    fn detail_is_absent_for_non_http_errors() {
        assert_eq!(DockmonError::Transport("refused".into()).detail(), None);
        let err = DockmonError::Http { status: 502, body: json!("Bad Gateway") };
        assert_eq!(err.detail(), None);
    }

    #[test]
    fn only_service_errors_are_request_errors() {
        assert!(DockmonError::Transport("refused".into()).is_request());
        assert!(DockmonError::Http { status: 500, body: json!(null) }.is_request());
        assert!(DockmonError::Decode { path: "hosts".into(), reason: "eof".into() }.is_request());

        let broken_pipe = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        assert!(!DockmonError::from(broken_pipe).is_request());
        assert!(!DockmonError::Output("serialize".into()).is_request());
    }
}
