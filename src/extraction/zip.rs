use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{Error, ExtractionError, Result};

/// Archive extractor for ZIP files
pub struct ZipExtractor;

impl ZipExtractor {
    /// Extract every entry of `archive_path` into `dest_path`.
    ///
    /// The archive is opened and parsed before `dest_path` is created, so an
    /// invalid input produces no output directory. Entries with unsafe
    /// (non-enclosed) paths are skipped with a warning. Files already present
    /// in `dest_path` are overwritten on name collision; stale entries from
    /// earlier runs are left alone.
    pub fn extract(archive_path: &Path, dest_path: &Path) -> Result<Vec<PathBuf>> {
        debug!(?archive_path, ?dest_path, "attempting ZIP extraction");

        let file = std::fs::File::open(archive_path)?;

        let mut archive = ::zip::ZipArchive::new(file).map_err(|e| {
            Error::Extraction(ExtractionError::InvalidArchive {
                archive: archive_path.to_path_buf(),
                reason: e.to_string(),
            })
        })?;

        // Archive parsed; only now is it safe to create the destination.
        std::fs::create_dir_all(dest_path)?;

        let mut extracted_files = Vec::new();

        for i in 0..archive.len() {
            let entry = archive.by_index(i).map_err(|e| {
                Error::Extraction(ExtractionError::EntryRead {
                    archive: archive_path.to_path_buf(),
                    reason: e.to_string(),
                })
            })?;

            if let Some(path) = Self::extract_entry(entry, dest_path)? {
                extracted_files.push(path);
            }
        }

        info!(
            ?archive_path,
            extracted_count = extracted_files.len(),
            "ZIP extraction successful"
        );

        Ok(extracted_files)
    }

    /// Extract a single entry to disk, creating directories as needed
    fn extract_entry(
        mut entry: ::zip::read::ZipFile,
        dest_path: &Path,
    ) -> Result<Option<PathBuf>> {
        let entry_path = match entry.enclosed_name() {
            Some(path) => dest_path.join(path),
            None => {
                warn!("skipping entry with unsafe path");
                return Ok(None);
            }
        };

        if entry.is_dir() {
            std::fs::create_dir_all(&entry_path)?;
            return Ok(None);
        }

        if let Some(parent) = entry_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut outfile = std::fs::File::create(&entry_path)?;
        std::io::copy(&mut entry, &mut outfile)?;

        Ok(Some(entry_path))
    }
}
