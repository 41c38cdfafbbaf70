//! # drive-dl
//!
//! Library for automating a Google Drive batch fetch with a service account:
//! authenticate, locate a file by name query, download its media in chunks,
//! and extract the resulting zip archive.
//!
//! ## Design Philosophy
//!
//! drive-dl is designed to be:
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Sensible defaults** - `Config::default()` reproduces the legacy
//!   automation it replaced (key file in the working directory, archive
//!   extracted to `unzipped_invoices`)
//! - **Event-driven** - Consumers subscribe to progress events, no polling
//!   required
//!
//! ## Quick Start
//!
//! ```no_run
//! use drive_dl::{Config, DriveFetcher};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fetcher = DriveFetcher::connect(Config::default()).await?;
//!
//!     // Subscribe to events
//!     let mut events = fetcher.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let report = fetcher
//!         .fetch_and_extract("name = 'invoices_2023.zip'", "invoices_2023.zip")
//!         .await?;
//!     println!("Extracted {} files", report.extracted.len());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Service-account authentication
pub mod auth;
/// Configuration types
pub mod config;
/// Drive API client (file location and media download)
pub mod drive;
/// Error types
pub mod error;
/// Archive extraction
pub mod extraction;
/// Fetch pipeline facade
pub mod fetcher;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use auth::{AccessToken, DriveSession, ServiceAccountKey, authenticate};
pub use config::Config;
pub use drive::DriveClient;
pub use error::{AuthError, DownloadError, Error, ExtractionError, Result};
pub use extraction::ZipExtractor;
pub use fetcher::{DriveFetcher, FetchReport};
pub use types::{ChunkProgress, Event, RemoteFile};
