//! Parser for the `.txt` descriptor shipped inside idgames uploads.
//!
//! The template is a list of `Key : value` lines. Only the title, author,
//! release date, and description are read; the description may continue on
//! following lines until a blank line or the next `Key :` header.

use chrono::NaiveDate;
use wadshelf_core::CatalogRecord;

/// Date formats tried when `date_parse_formats` is not configured.
pub const DEFAULT_DATE_FORMATS: &[&str] = &["%m/%d/%y", "%m/%d/%Y", "%d %B %Y", "%B %d, %Y", "%Y-%m-%d"];

/// Longest text header accepted as a `Key :` line.
const MAX_KEY_LEN: usize = 24;

/// Metadata read from a text descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextDescriptor {
    pub title: Option<String>,
    pub author: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub description: Option<String>,
}

impl TextDescriptor {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.release_date.is_none()
            && self.description.is_none()
    }

    /// Copy every parsed field into `record`.
    pub fn apply_to(&self, record: &mut CatalogRecord) {
        if let Some(title) = &self.title {
            record.title = Some(title.clone());
        }
        if let Some(author) = &self.author {
            record.author = Some(author.clone());
        }
        if let Some(date) = self.release_date {
            record.release_date = Some(date);
        }
        if let Some(description) = &self.description {
            record.description = Some(description.clone());
        }
    }
}

/// Split a `Key : value` line. Continuation lines and prose return `None`.
fn split_header(line: &str) -> Option<(String, &str)> {
    if line.starts_with(char::is_whitespace) {
        return None;
    }
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty() || key.len() > MAX_KEY_LEN {
        return None;
    }
    Some((key.to_ascii_lowercase(), value.trim()))
}

/// Collapse runs of whitespace to single spaces.
fn clean_line(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_empty(value: &str) -> Option<String> {
    let value = clean_line(value);
    (!value.is_empty()).then_some(value)
}

/// Parse a date with the first matching format.
pub fn parse_date(value: &str, formats: &[String]) -> Option<NaiveDate> {
    let value = value.trim();
    formats
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(value, f).ok())
}

/// Parse a descriptor's text. Unknown keys and free text are ignored.
pub fn parse_descriptor(text: &str, date_formats: &[String]) -> TextDescriptor {
    let mut descriptor = TextDescriptor::default();
    let mut description: Option<Vec<String>> = None;
    let mut in_description = false;

    for raw in text.lines() {
        let line = raw.trim_end();

        if in_description {
            if line.trim().is_empty() || split_header(line).is_some() {
                in_description = false;
            } else {
                if let Some(lines) = description.as_mut() {
                    lines.push(clean_line(line));
                }
                continue;
            }
        }

        let Some((key, value)) = split_header(line) else {
            continue;
        };
        match key.as_str() {
            "title" if descriptor.title.is_none() => descriptor.title = non_empty(value),
            "author" | "authors" if descriptor.author.is_none() => {
                descriptor.author = non_empty(value)
            }
            "release date" | "date finished" if descriptor.release_date.is_none() => {
                descriptor.release_date = parse_date(value, date_formats)
            }
            "description" if description.is_none() => {
                let mut lines = Vec::new();
                if let Some(first) = non_empty(value) {
                    lines.push(first);
                }
                description = Some(lines);
                in_description = true;
            }
            _ => {}
        }
    }

    descriptor.description = description
        .map(|lines| lines.join("\n"))
        .filter(|d| !d.is_empty());
    descriptor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formats() -> Vec<String> {
        DEFAULT_DATE_FORMATS.iter().map(|s| s.to_string()).collect()
    }

    const SCYTHE_TXT: &str = "\
===========================================================================
Archive Maintainer      : Please do not put this in the /newstuff directory
Advanced engine needed  : None
Primary purpose         : Single play
===========================================================================
Title                   : Scythe
Filename                : scythe.wad
Release date            : 05/12/2003
Author                  : Erik Alm
Email Address           : somewhere@example.com

Description             : 32 maps, increasing in size and difficulty,
                          for Doom II.   The first maps are
                          short.

Additional Credits to   : Everybody
===========================================================================
";

    #[test]
    fn test_parse_idgames_template() {
        let d = parse_descriptor(SCYTHE_TXT, &formats());
        assert_eq!(d.title.as_deref(), Some("Scythe"));
        assert_eq!(d.author.as_deref(), Some("Erik Alm"));
        assert_eq!(d.release_date, NaiveDate::from_ymd_opt(2003, 5, 12));
        assert_eq!(
            d.description.as_deref(),
            Some("32 maps, increasing in size and difficulty,\nfor Doom II. The first maps are\nshort.")
        );
    }

    #[test]
    fn test_description_stops_at_next_header() {
        let text = "Description : One line\nAuthor : Someone\n";
        let d = parse_descriptor(text, &formats());
        assert_eq!(d.description.as_deref(), Some("One line"));
        assert_eq!(d.author.as_deref(), Some("Someone"));
    }

    #[test]
    fn test_unparseable_date_is_none() {
        let text = "Title : X\nRelease date : sometime in spring\n";
        let d = parse_descriptor(text, &formats());
        assert_eq!(d.title.as_deref(), Some("X"));
        assert_eq!(d.release_date, None);
    }

    #[test]
    fn test_date_formats() {
        let f = formats();
        let expected = NaiveDate::from_ymd_opt(1999, 12, 31);
        assert_eq!(parse_date("12/31/99", &f), expected);
        assert_eq!(parse_date("12/31/1999", &f), expected);
        assert_eq!(parse_date("31 December 1999", &f), expected);
        assert_eq!(parse_date("December 31, 1999", &f), expected);
        assert_eq!(parse_date("1999-12-31", &f), expected);
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let d = parse_descriptor("Title :\nAuthor :   \n", &formats());
        assert!(d.is_empty());
    }

    #[test]
    fn test_apply_to_record() {
        let d = parse_descriptor(SCYTHE_TXT, &formats());
        let mut record = CatalogRecord::new("scythe.zip");
        record.comments = Some("mine".to_string());
        d.apply_to(&mut record);
        assert_eq!(record.title.as_deref(), Some("Scythe"));
        assert_eq!(record.author.as_deref(), Some("Erik Alm"));
        assert_eq!(record.comments.as_deref(), Some("mine"));
    }
}
