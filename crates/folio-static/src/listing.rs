//! Blog index ordering and presentation.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::index::BlogEntry;

/// Environment a site is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Local authoring; drafts are listed
    Development,
    /// Published site
    #[default]
    Production,
}

impl Mode {
    /// Whether draft posts are visible in this mode.
    pub fn include_drafts(self) -> bool {
        self == Mode::Development
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!(
                "unknown mode '{}', expected development or production",
                other
            )),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Development => f.write_str("development"),
            Mode::Production => f.write_str("production"),
        }
    }
}

/// Options controlling which entries are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListingOptions {
    /// List entries marked as drafts
    pub include_drafts: bool,
}

impl From<Mode> for ListingOptions {
    fn from(mode: Mode) -> Self {
        Self {
            include_drafts: mode.include_drafts(),
        }
    }
}

/// Order entries newest first and drop hidden drafts.
///
/// Dates compare as strings, so they must be written in a format whose
/// lexical order is chronological (`YYYY-MM-DD`). The sort is stable: entries
/// sharing a date keep their enumeration order.
pub fn arrange(entries: &[BlogEntry], options: ListingOptions) -> Vec<&BlogEntry> {
    let mut visible: Vec<&BlogEntry> = entries
        .iter()
        .filter(|entry| !entry.meta.draft || options.include_drafts)
        .collect();

    visible.sort_by(|a, b| b.meta.date.cmp(&a.meta.date));

    visible
}

/// Render a date as `Feb 15, 2022`.
///
/// Only the leading `YYYY-MM-DD` is read, so full timestamps work too. Dates
/// that do not parse are shown as written.
pub fn display_date(date: &str) -> String {
    match NaiveDate::parse_and_remainder(date.trim(), "%Y-%m-%d") {
        Ok((parsed, _)) => parsed.format("%b %-d, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// A single link in the rendered blog index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingItem {
    /// Link target
    pub href: String,
    /// Post title
    pub title: String,
    /// Post subtitle
    pub subtitle: String,
    /// Date as written in the front matter
    pub date: String,
    /// Human readable date
    pub display_date: String,
    /// Whether the post is a draft
    pub draft: bool,
}

impl ListingItem {
    /// Link to `entry`, with its path appended to `base_url`.
    pub fn from_entry(entry: &BlogEntry, base_url: &str) -> Self {
        Self {
            href: format!("{}{}", base_url, entry.path),
            title: entry.meta.title.clone(),
            subtitle: entry.meta.subtitle.clone(),
            date: entry.meta.date.clone(),
            display_date: display_date(&entry.meta.date),
            draft: entry.meta.draft,
        }
    }
}

/// Arrange entries and turn them into links rooted at `base_url`.
pub fn listing_items(
    entries: &[BlogEntry],
    options: ListingOptions,
    base_url: &str,
) -> Vec<ListingItem> {
    arrange(entries, options)
        .into_iter()
        .map(|entry| ListingItem::from_entry(entry, base_url))
        .collect()
}
