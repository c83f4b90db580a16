use std::time::Duration;

use wadshelf_core::{CatalogRecord, RemoteError, RemoteMetadataSource};

use crate::error::IdGamesError;
use crate::types::{IdGamesFile, parse_search_response};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking HTTP client for the idgames archive API.
pub struct IdGamesClient {
    http: reqwest::blocking::Client,
    api_url: String,
    mirror_url: String,
}

impl IdGamesClient {
    pub fn new(api_url: impl Into<String>, mirror_url: impl Into<String>) -> Result<Self, IdGamesError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("wadshelf/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            api_url: api_url.into(),
            mirror_url: mirror_url.into(),
        })
    }

    /// Search the archive for files with exactly this name.
    pub fn search_by_filename(&self, name: &str) -> Result<Vec<IdGamesFile>, IdGamesError> {
        log::debug!("idgames search: {}", name);
        let resp = self
            .http
            .get(&self.api_url)
            .query(&[
                ("action", "search"),
                ("type", "filename"),
                ("query", name),
                ("out", "json"),
            ])
            .send()?;

        let status = resp.status();
        let text = resp.text()?;
        if !status.is_success() {
            return Err(IdGamesError::ServerError {
                status: status.as_u16(),
                message: text.chars().take(200).collect(),
            });
        }

        // Search matches substrings; keep exact file names only.
        let files = parse_search_response(&text)?
            .into_iter()
            .filter(|f| f.filename.eq_ignore_ascii_case(name))
            .collect();
        Ok(files)
    }

    /// Download URL of a file on the configured mirror.
    pub fn download_url(&self, file: &IdGamesFile) -> String {
        mirror_join(&self.mirror_url, &file.mirror_path())
    }
}

fn mirror_join(mirror: &str, path: &str) -> String {
    format!(
        "{}/{}",
        mirror.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

impl RemoteMetadataSource for IdGamesClient {
    fn find_by_name(&self, name: &str) -> Result<Vec<CatalogRecord>, RemoteError> {
        let files = self.search_by_filename(name)?;
        Ok(files.iter().map(IdGamesFile::to_record).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_url() {
        let client = IdGamesClient::new("http://localhost/api.php", "https://mirror.example/idgames").unwrap();
        let file = IdGamesFile {
            filename: "av.zip".to_string(),
            dir: Some("levels/doom2/megawads/".to_string()),
            ..IdGamesFile::default()
        };
        assert_eq!(
            client.download_url(&file),
            "https://mirror.example/idgames/levels/doom2/megawads/av.zip"
        );
    }

    #[test]
    fn test_unreachable_maps_to_remote_error() {
        let err = IdGamesError::ServerError {
            status: 503,
            message: "down".to_string(),
        };
        assert!(matches!(RemoteError::from(err), RemoteError::Unreachable(_)));
        let err = IdGamesError::Api("bad".to_string());
        assert!(matches!(RemoteError::from(err), RemoteError::Malformed(_)));
    }
}
