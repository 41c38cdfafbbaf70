//! Core types and events for drive-dl

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A remote file reference returned by a name-based search
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFile {
    /// Opaque Drive file identifier
    pub id: String,
    /// File name as stored remotely
    pub name: String,
}

/// Per-chunk progress of a media download
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkProgress {
    /// Bytes received so far
    pub bytes_fetched: u64,
    /// Total size reported by the server
    pub total_bytes: u64,
}

impl ChunkProgress {
    /// Completed fraction in the range 0.0 to 1.0
    pub fn fraction(&self) -> f64 {
        if self.total_bytes == 0 {
            return 1.0;
        }
        self.bytes_fetched as f64 / self.total_bytes as f64
    }

    /// Completed percentage in the range 0.0 to 100.0
    pub fn percent(&self) -> f32 {
        (self.fraction() * 100.0) as f32
    }
}

/// Event emitted during the fetch lifecycle
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Session established with the storage provider
    Authenticated {
        /// Service-account email the session is bound to
        account: String,
    },

    /// A file matching the search query was selected
    FileLocated {
        /// Remote file identifier
        id: String,
        /// Remote file name
        name: String,
    },

    /// Media download progress update
    Downloading {
        /// Progress percentage (0.0 to 100.0)
        percent: f32,
        /// Bytes received so far
        bytes_fetched: u64,
        /// Total size reported by the server
        total_bytes: u64,
    },

    /// Download finished and the file was written to disk
    DownloadComplete {
        /// Path of the written file
        path: PathBuf,
        /// Size of the written file in bytes
        bytes: u64,
    },

    /// Archive extraction finished
    Extracted {
        /// The archive that was extracted
        archive: PathBuf,
        /// Number of files written to the extraction directory
        file_count: usize,
    },
}
