//! File location by name query

use serde::Deserialize;
use tracing::{debug, info};

use super::DriveClient;
use crate::error::{Error, Result};
use crate::types::{Event, RemoteFile};

/// One page of a files-list response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileListPage {
    #[serde(default)]
    next_page_token: Option<String>,
    #[serde(default)]
    files: Vec<RemoteFile>,
}

impl DriveClient {
    /// Find a file by name query, returning the last match iterated.
    ///
    /// Every entry the query returns is logged. When several files match, the
    /// last one iterated wins; this preserves the selection behavior of the
    /// automation this library replaced and is not a relevance ranking.
    ///
    /// With `follow_pagination` set (the default), every listing page is
    /// consulted; otherwise only the first page is read.
    ///
    /// Returns [`Error::NotFound`] when nothing matches.
    pub async fn find_file(&self, query: &str) -> Result<RemoteFile> {
        let mut page_token: Option<String> = None;
        let mut selected: Option<RemoteFile> = None;

        loop {
            let page = self.list_page(query, page_token.as_deref()).await?;

            for file in page.files {
                info!(name = %file.name, id = %file.id, "found matching file");
                selected = Some(file);
            }

            page_token = page.next_page_token;
            if page_token.is_none() || !self.follow_pagination {
                break;
            }
        }

        let file = selected.ok_or_else(|| Error::NotFound {
            query: query.to_string(),
        })?;

        let _ = self.event_tx.send(Event::FileLocated {
            id: file.id.clone(),
            name: file.name.clone(),
        });

        Ok(file)
    }

    /// Fetch a single page of the files listing
    async fn list_page(&self, query: &str, page_token: Option<&str>) -> Result<FileListPage> {
        let url = self.files_url()?;

        debug!(query, ?page_token, "listing files");

        let mut request = self
            .session
            .http
            .get(url)
            .bearer_auth(&self.session.token.token)
            .query(&[
                ("q", query),
                ("spaces", "drive"),
                ("fields", "nextPageToken, files(id, name)"),
            ]);

        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}
