use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use wadshelf_core::CatalogRecord;

use crate::error::IdGamesError;

/// Top-level response wrapper from `api.php?out=json`.
///
/// Exactly one of the three members is present.
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub content: Option<SearchContent>,
    #[serde(default)]
    pub warning: Option<ApiMessage>,
    #[serde(default)]
    pub error: Option<ApiMessage>,
}

#[derive(Debug, Deserialize)]
pub struct SearchContent {
    pub file: OneOrMany<IdGamesFile>,
}

/// The API returns a bare object when a search has a single hit.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(v) => v,
            OneOrMany::One(t) => vec![t],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiMessage {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
}

/// One file entry from the archive.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct IdGamesFile {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    /// Archive directory, e.g. `levels/doom2/Ports/megawads/`.
    #[serde(default)]
    pub dir: Option<String>,
    pub filename: String,
    #[serde(default, deserialize_with = "lenient")]
    pub size: Option<u64>,
    /// Upload date as `YYYY-MM-DD`.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub votes: Option<u32>,
    #[serde(default)]
    pub url: Option<String>,
}

impl IdGamesFile {
    /// Path of the file relative to an archive mirror root.
    pub fn mirror_path(&self) -> String {
        format!("{}{}", self.dir.as_deref().unwrap_or(""), self.filename)
    }

    /// Convert to a catalog record carrying the published metadata.
    pub fn to_record(&self) -> CatalogRecord {
        let mut record = CatalogRecord::new(self.filename.clone()).with_size(self.size.unwrap_or(0));
        record.title = non_empty(self.title.as_deref());
        record.author = non_empty(self.author.as_deref());
        record.description = non_empty(self.description.as_deref()).map(|d| clean_text(&d));
        record.rating = self.rating;
        record.release_date = self
            .date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok());
        record
    }
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Descriptions come with HTML line breaks.
fn clean_text(text: &str) -> String {
    text.replace("<br />", "\n")
        .replace("<br/>", "\n")
        .replace("<br>", "\n")
        .trim()
        .to_string()
}

/// Accept a number or a numeric string; anything else becomes `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.to_string().parse().ok(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Parse the body of a `search` response into file entries.
///
/// A "No Results" warning is an empty list, not an error.
pub fn parse_search_response(text: &str) -> Result<Vec<IdGamesFile>, IdGamesError> {
    let response: ApiResponse = serde_json::from_str(text)?;
    if let Some(err) = response.error {
        return Err(IdGamesError::Api(format!("{}: {}", err.kind, err.message)));
    }
    if let Some(content) = response.content {
        return Ok(content.file.into_vec());
    }
    match response.warning {
        Some(w) if w.kind.eq_ignore_ascii_case("No Results") => Ok(Vec::new()),
        Some(w) => Err(IdGamesError::Api(format!("{}: {}", w.kind, w.message))),
        None => Err(IdGamesError::Api("empty response".to_string())),
    }
}

#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod tests;
