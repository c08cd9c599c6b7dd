//! Blocking HTTP bridge to Painter's remote-scripting endpoint.
//!
//! Connections are cheap and never pooled: a fresh `PainterRemote` is built
//! before every call, matching the strictly sequential driver. Transport and
//! HTTP failures are typed; script-level failures are only visible in the
//! returned text.

use std::time::Duration;

/// Generous per-call timeout; project creation on a heavy mesh is slow.
const EXEC_TIMEOUT: Duration = Duration::from_secs(600);

/// Remote-channel failure
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("failed to build http client: {0}")]
    Client(reqwest::Error),

    #[error("could not reach painter at {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("painter returned http {0}")]
    Status(reqwest::StatusCode),

    #[error("could not read painter response: {0}")]
    Body(reqwest::Error),
}

/// One connection's worth of access to the remote-scripting endpoint
pub struct PainterRemote {
    client: reqwest::blocking::Client,
    url: String,
}

impl PainterRemote {
    /// Build a client against `http://<host>:<port>/run.json`
    pub fn connect(host: &str, port: u16) -> Result<Self, RemoteError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(EXEC_TIMEOUT)
            .build()
            .map_err(RemoteError::Client)?;
        Ok(Self {
            client,
            url: format!("http://{host}:{port}/run.json"),
        })
    }

    /// Cheap liveness probe; failure at run start is fatal for the batch.
    pub fn check_connection(&self) -> Result<(), RemoteError> {
        self.exec_script("print(\"meshkiln-ping\")").map(|_| ())
    }

    /// Execute Python source inside Painter, returning captured output text.
    pub fn exec_script(&self, source: &str) -> Result<String, RemoteError> {
        let response = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "python": source }))
            .send()
            .map_err(|source| RemoteError::Transport {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status));
        }

        response.text().map_err(RemoteError::Body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_shape() {
        let remote = PainterRemote::connect("127.0.0.1", 60041).unwrap();
        assert_eq!(remote.url, "http://127.0.0.1:60041/run.json");
    }

    #[test]
    fn test_unreachable_endpoint_is_transport_error() {
        // port 1 on localhost is as close to guaranteed-closed as it gets
        let remote = PainterRemote::connect("127.0.0.1", 1).unwrap();
        match remote.check_connection() {
            Err(RemoteError::Transport { url, .. }) => {
                assert_eq!(url, "http://127.0.0.1:1/run.json");
            }
            other => panic!("expected transport error, got {:?}", other.err()),
        }
    }
}
