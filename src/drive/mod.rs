//! Drive API client split into focused submodules.
//!
//! The `DriveClient` struct wraps an authenticated session and exposes the
//! two remote operations of the pipeline:
//! - [`locate`] - name-query file location
//! - [`media`] - chunked media download
//!
//! Both emit progress/lifecycle events on the client's broadcast channel.

mod locate;
mod media;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use url::Url;

use crate::auth::DriveSession;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::Event;

/// Client for the Drive v3 `files` endpoints
///
/// Cheap to clone; the underlying HTTP client and event channel are shared.
#[derive(Clone, Debug)]
pub struct DriveClient {
    pub(crate) session: DriveSession,
    pub(crate) chunk_size: u64,
    pub(crate) follow_pagination: bool,
    pub(crate) event_tx: tokio::sync::broadcast::Sender<Event>,
}

impl DriveClient {
    /// Create a client over an authenticated session
    pub fn new(session: DriveSession, config: &Config) -> Self {
        let (event_tx, _rx) = tokio::sync::broadcast::channel(1000);
        Self::with_event_sender(session, config, event_tx)
    }

    /// Create a client that emits events on an existing channel
    pub(crate) fn with_event_sender(
        session: DriveSession,
        config: &Config,
        event_tx: tokio::sync::broadcast::Sender<Event>,
    ) -> Self {
        Self {
            session,
            chunk_size: config.chunk_size,
            follow_pagination: config.follow_pagination,
            event_tx,
        }
    }

    /// Subscribe to lifecycle events emitted by this client
    ///
    /// Multiple subscribers are supported; events sent with no subscribers
    /// are dropped.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// URL of the files collection endpoint
    pub(crate) fn files_url(&self) -> Result<Url> {
        self.session
            .api_base
            .join("drive/v3/files")
            .map_err(|e| Error::Config {
                message: format!("cannot build files URL from api_base: {e}"),
                key: Some("api_base".to_string()),
            })
    }

    /// URL of a single file's resource endpoint
    pub(crate) fn file_url(&self, file_id: &str) -> Result<Url> {
        self.session
            .api_base
            .join(&format!("drive/v3/files/{file_id}"))
            .map_err(|e| Error::Config {
                message: format!("cannot build file URL from api_base: {e}"),
                key: Some("api_base".to_string()),
            })
    }
}
