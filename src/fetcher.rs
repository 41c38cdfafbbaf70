//! Fetch pipeline facade
//!
//! Wires the four steps in order — authenticate, locate, download, extract —
//! and broadcasts lifecycle events to subscribers. Control flow is strictly
//! linear: a failure at any step aborts the run.

use std::path::PathBuf;
use tracing::info;

use crate::auth;
use crate::config::Config;
use crate::drive::DriveClient;
use crate::error::Result;
use crate::extraction::ZipExtractor;
use crate::types::{Event, RemoteFile};

/// Summary of a completed fetch-and-extract run
#[derive(Clone, Debug)]
pub struct FetchReport {
    /// The remote file that was located and downloaded
    pub file: RemoteFile,
    /// Path of the downloaded archive on disk
    pub archive: PathBuf,
    /// Paths of the files extracted from the archive
    pub extracted: Vec<PathBuf>,
}

/// Pipeline facade: authenticate once, then fetch and extract archives
///
/// # Example
///
/// ```no_run
/// use drive_dl::{Config, DriveFetcher};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let fetcher = DriveFetcher::connect(Config::default()).await?;
///
///     let report = fetcher
///         .fetch_and_extract("name = 'invoices_2023.zip'", "invoices_2023.zip")
///         .await?;
///     println!("Extracted {} files", report.extracted.len());
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct DriveFetcher {
    config: Config,
    client: DriveClient,
    event_tx: tokio::sync::broadcast::Sender<Event>,
}

impl DriveFetcher {
    /// Validate the configuration and authenticate the service account
    ///
    /// Fails when the configuration is invalid or authentication is rejected;
    /// no remote file operations happen until
    /// [`fetch_and_extract`](Self::fetch_and_extract) is called.
    pub async fn connect(config: Config) -> Result<Self> {
        config.validate()?;

        let session = auth::authenticate(&config).await?;

        let (event_tx, _rx) = tokio::sync::broadcast::channel(1000);
        let _ = event_tx.send(Event::Authenticated {
            account: session.account().to_string(),
        });

        let client = DriveClient::with_event_sender(session, &config, event_tx.clone());

        Ok(Self {
            config,
            client,
            event_tx,
        })
    }

    /// Subscribe to lifecycle events
    ///
    /// Multiple subscribers are supported; events sent with no subscribers
    /// are dropped.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// The Drive client backing this fetcher, for individual operations
    pub fn client(&self) -> &DriveClient {
        &self.client
    }

    /// The configuration this fetcher was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the full pipeline: locate by query, download as `file_name`,
    /// extract into the configured directory.
    pub async fn fetch_and_extract(&self, query: &str, file_name: &str) -> Result<FetchReport> {
        let file = self.client.find_file(query).await?;

        tokio::fs::create_dir_all(&self.config.download_dir).await?;
        let archive = self
            .client
            .download_to_file(&file.id, &self.config.download_dir, file_name)
            .await?;

        let extracted = ZipExtractor::extract(&archive, &self.config.extract_dir)?;

        let _ = self.event_tx.send(Event::Extracted {
            archive: archive.clone(),
            file_count: extracted.len(),
        });

        info!(
            archive = %archive.display(),
            extracted = extracted.len(),
            "fetch pipeline complete"
        );

        Ok(FetchReport {
            file,
            archive,
            extracted,
        })
    }
}
