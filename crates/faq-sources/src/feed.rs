//! Spreadsheet feed exported as CSV
//!
//! # Column grammar
//!
//! Two header rows, then one row per top-level option (0-indexed columns):
//!
//! | column      | meaning                                              |
//! |-------------|------------------------------------------------------|
//! | 0, 1        | category id / label (category sheet only)            |
//! | 3           | category id                                          |
//! | 4           | top-level option label                               |
//! | 5           | top-level answer; when set, columns 6+ are ignored   |
//! | 6, 8, 10…   | second-level option labels                           |
//! | 7, 9, 11…   | answers paired with the label to their left          |
//!
//! Top-level ids are `level1-<n>` with `n` counting rows per category in
//! file order. Second-level ids are `<parent>-<m>`, counting non-empty labels.

use crate::error::{SourceError, SourceResult};
use crate::source::{ForestSource, SourceKind};
use async_trait::async_trait;
use csv::{ReaderBuilder, StringRecord};
use faq_category::{description_for, CategoryRecord};
use faq_tree::{Forest, PresetNode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

const HEADER_ROWS: usize = 2;
const MIN_FIELDS: usize = 6;
const CATEGORY_COL: usize = 3;
const LABEL_COL: usize = 4;
const ANSWER_COL: usize = 5;
const FIRST_CHILD_COL: usize = 6;

/// Where the CSV comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedLocation {
    /// A published spreadsheet tab
    Sheet {
        /// Spreadsheet id
        id: String,
        /// Tab id
        gid: String,
    },
    /// Any URL serving CSV
    Url(String),
}

impl FeedLocation {
    /// Spreadsheet tab location
    #[must_use]
    pub fn sheet(id: impl Into<String>, gid: impl Into<String>) -> Self {
        Self::Sheet {
            id: id.into(),
            gid: gid.into(),
        }
    }

    /// CSV export URL
    #[must_use]
    pub fn url(&self) -> String {
        match self {
            Self::Sheet { id, gid } => {
                format!("https://docs.google.com/spreadsheets/d/{id}/export?format=csv&gid={gid}")
            }
            Self::Url(url) => url.clone(),
        }
    }
}

/// Read-only tabular feed
#[derive(Debug, Clone)]
pub struct FeedSource {
    location: FeedLocation,
    client: reqwest::Client,
}

impl FeedSource {
    /// Create feed source
    #[must_use]
    pub fn new(location: FeedLocation, client: reqwest::Client) -> Self {
        Self { location, client }
    }

    /// Configured location
    #[inline]
    #[must_use]
    pub fn location(&self) -> &FeedLocation {
        &self.location
    }

    async fn fetch_text(&self) -> SourceResult<String> {
        let url = self.location.url();
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::status(url, status.as_u16()));
        }
        Ok(response.text().await?)
    }

    /// Fetch the category sheet
    ///
    /// # Errors
    /// Returns error if the request fails or the CSV cannot be read
    pub async fn fetch_categories(&self) -> SourceResult<Option<Vec<CategoryRecord>>> {
        let records = parse_feed_categories(&self.fetch_text().await?)?;
        Ok((!records.is_empty()).then_some(records))
    }
}

#[async_trait]
impl ForestSource for FeedSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Feed
    }

    async fn fetch(&self) -> SourceResult<Option<Forest>> {
        let forest = parse_feed(&self.fetch_text().await?)?;
        Ok(forest.has_data().then_some(forest))
    }
}

/// Data rows: blank lines dropped, then the two header rows skipped
fn data_rows(text: &str) -> SourceResult<Vec<StringRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) && record.len() <= 1 {
            continue;
        }
        rows.push(record);
    }
    Ok(rows.into_iter().skip(HEADER_ROWS).collect())
}

fn cell(record: &StringRecord, index: usize) -> &str {
    record.get(index).map_or("", str::trim)
}

/// Parse feed CSV into a forest
///
/// # Errors
/// Returns error if the text is not readable as CSV
pub fn parse_feed(text: &str) -> SourceResult<Forest> {
    let mut forest = Forest::new();

    for record in data_rows(text)? {
        if record.len() < MIN_FIELDS {
            continue;
        }
        let category = cell(&record, CATEGORY_COL);
        let label = cell(&record, LABEL_COL);
        if category.is_empty() || label.is_empty() {
            continue;
        }

        let siblings = forest.entry(category);
        let id = format!("level1-{}", siblings.len() + 1);
        let answer = cell(&record, ANSWER_COL);

        let node = if answer.is_empty() {
            let children = second_level(&record, &id);
            let node = PresetNode::new(id, label);
            if children.is_empty() {
                node
            } else {
                node.with_children(children)
            }
        } else {
            PresetNode::new(id, label).with_answer(answer)
        };
        siblings.push(node);
    }

    debug!(categories = forest.len(), nodes = forest.node_count(), "feed parsed");
    Ok(forest)
}

fn second_level(record: &StringRecord, parent_id: &str) -> Vec<PresetNode> {
    (FIRST_CHILD_COL..record.len())
        .step_by(2)
        .filter_map(|col| {
            let label = cell(record, col);
            (!label.is_empty()).then(|| (label, cell(record, col + 1)))
        })
        .enumerate()
        .map(|(index, (label, answer))| {
            let node = PresetNode::new(format!("{parent_id}-{}", index + 1), label);
            if answer.is_empty() {
                node
            } else {
                node.with_answer(answer)
            }
        })
        .collect()
}

fn category_emoji(id: &str) -> &'static str {
    match id.to_lowercase().as_str() {
        "appoint" | "appointment" => "📋",
        "guarantee" => "💼",
        "grant" | "support" => "💰",
        "gfe" | "campus" => "🏫",
        _ => "📁",
    }
}

/// Parse the category sheet (columns 0/1) into records
///
/// Repeated ids keep their first occurrence.
///
/// # Errors
/// Returns error if the text is not readable as CSV
pub fn parse_feed_categories(text: &str) -> SourceResult<Vec<CategoryRecord>> {
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for record in data_rows(text)? {
        let id = cell(&record, 0);
        let label = cell(&record, 1);
        if id.is_empty() || label.is_empty() || !seen.insert(id.to_string()) {
            continue;
        }
        records.push(
            CategoryRecord::new(id, label, category_emoji(id)).with_description(description_for(label)),
        );
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HEADER: &str = "카테고리설정,,,프리셋설정\nid,label,,category,option,detail,opt1,ans1,opt2,ans2\n";

    fn feed(rows: &str) -> String {
        format!("{HEADER}{rows}")
    }

    #[test]
    fn sheet_url() {
        let location = FeedLocation::sheet("abc", "0");
        assert_eq!(
            location.url(),
            "https://docs.google.com/spreadsheets/d/abc/export?format=csv&gid=0"
        );
        assert_eq!(FeedLocation::Url("http://x/y.csv".into()).url(), "http://x/y.csv");
    }

    #[test]
    fn terminal_answer_discards_children() {
        let forest = parse_feed(&feed("support,,,support,Pricing,$10/mo,Extra,ignored\n")).unwrap();
        let nodes = forest.get("support").unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].id, "level1-1");
        assert_eq!(nodes[0].answer.as_deref(), Some("$10/mo"));
        assert!(nodes[0].children.is_none());
    }

    #[test]
    fn children_in_pairs() {
        let forest = parse_feed(&feed("x,,,campus,Hours,,Weekday,9-18,,skipped,Weekend,closed\n")).unwrap();
        let node = &forest.get("campus").unwrap()[0];
        let children = node.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].id, "level1-1-1");
        assert_eq!(children[0].answer.as_deref(), Some("9-18"));
        assert_eq!(children[1].id, "level1-1-2");
        assert_eq!(children[1].label, "Weekend");
    }

    #[test]
    fn child_without_answer_is_title_only() {
        let forest = parse_feed(&feed(",,,support,Topic,,Only label\n")).unwrap();
        let child = &forest.get("support").unwrap()[0].children()[0];
        assert!(child.is_title_only());
    }

    #[test]
    fn row_without_answer_or_children_is_title_only() {
        let forest = parse_feed(&feed(",,,support,Just a title,\n")).unwrap();
        let node = &forest.get("support").unwrap()[0];
        assert!(node.is_title_only());
        assert!(node.children.is_none());
    }

    #[test]
    fn ids_count_per_category_without_dedup() {
        let rows = ",,,support,Same,a\n,,,campus,Other,b\n,,,support,Same,c\n";
        let forest = parse_feed(&feed(rows)).unwrap();
        let ids: Vec<_> = forest.get("support").unwrap().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["level1-1", "level1-2"]);
        assert_eq!(forest.get("campus").unwrap()[0].id, "level1-1");
        assert_eq!(forest.keys().collect::<Vec<_>>(), vec!["support", "campus"]);
    }

    #[test]
    fn short_or_incomplete_rows_are_skipped() {
        let rows = ",,,support,Short\n,,,,NoCategory,a\n,,,support,,a\n,,,support,Kept,a\n";
        let forest = parse_feed(&feed(rows)).unwrap();
        let nodes = forest.get("support").unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].label, "Kept");
        assert_eq!(nodes[0].id, "level1-1");
    }

    #[test]
    fn quoted_commas_and_newlines() {
        let rows = ",,,support,\"Fees, charges\",\"Line one\nLine \"\"two\"\"\"\n";
        let forest = parse_feed(&feed(rows)).unwrap();
        let node = &forest.get("support").unwrap()[0];
        assert_eq!(node.label, "Fees, charges");
        assert_eq!(node.answer.as_deref(), Some("Line one\nLine \"two\""));
    }

    #[test]
    fn blank_lines_do_not_count_as_headers() {
        let text = format!("\n\n{HEADER}\n,,,support,Row,answer\n\n");
        let forest = parse_feed(&text).unwrap();
        assert_eq!(forest.get("support").unwrap().len(), 1);
    }

    #[test]
    fn headers_only_is_empty() {
        assert!(!parse_feed(HEADER).unwrap().has_data());
        assert!(!parse_feed("").unwrap().has_data());
    }

    #[test]
    fn crlf_line_endings() {
        let text = "h1\r\nh2\r\n,,,support,Row,answer\r\n";
        let forest = parse_feed(text).unwrap();
        assert_eq!(forest.get("support").unwrap()[0].answer.as_deref(), Some("answer"));
    }

    #[test]
    fn categories_from_first_columns() {
        let rows = "grant,보증,,\nGFE,금융캠퍼스,,\ngrant,중복,,\n,없음,,\nnew,신규,,\n";
        let records = parse_feed_categories(&feed(rows)).unwrap();
        let summary: Vec<_> = records
            .iter()
            .map(|r| (r.id.as_str(), r.label.as_str(), r.emoji.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![("grant", "보증", "💰"), ("GFE", "금융캠퍼스", "🏫"), ("new", "신규", "📁")]
        );
        assert_eq!(records[0].description, "보증 관련 문의");
    }
}
