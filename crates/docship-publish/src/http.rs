//! HTTP PUT transport.

use std::path::Path;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::debug;
use ureq::Agent;

use crate::error::TransferError;
use crate::transfer::FileTransfer;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Transport uploading files with authenticated HTTP PUTs.
///
/// Each file is PUT to `<server>/<remote path>` with Basic auth. No
/// connection is opened until the first upload.
pub struct HttpTransfer {
    agent: Agent,
    base_url: String,
    auth_header: String,
}

impl HttpTransfer {
    /// Create a transport for the given server and credentials.
    ///
    /// A server address without a scheme defaults to `https://`.
    #[must_use]
    pub fn new(server: &str, username: &str, password: &str) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        let base_url = if server.contains("://") {
            server.trim_end_matches('/').to_owned()
        } else {
            format!("https://{}", server.trim_end_matches('/'))
        };

        let auth_header = format!(
            "Basic {}",
            BASE64.encode(format!("{username}:{password}"))
        );

        Self {
            agent,
            base_url,
            auth_header,
        }
    }
}

impl FileTransfer for HttpTransfer {
    fn upload(&mut self, local: &Path, remote: &str) -> Result<(), TransferError> {
        let data = std::fs::read(local)?;
        let url = format!("{}/{}", self.base_url, remote);

        debug!(url = %url, bytes = data.len(), "PUT file");

        let response = self
            .agent
            .put(&url)
            .header("Authorization", &self.auth_header)
            .header("Content-Type", "application/octet-stream")
            .send(&data[..])
            .map_err(|e| TransferError::Http {
                status: 0,
                body: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let body = response
                .into_body()
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(TransferError::Http { status, body });
        }

        Ok(())
    }
}
