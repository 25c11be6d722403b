use std::fmt::Write as _;

use chrono::{DateTime, Local};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::model::item::{ItemId, ItemKind};
use crate::model::tree::{Tree, TreeError};

/// One entry returned by a remote source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRecord {
    #[serde(alias = "content")]
    pub name: String,
    /// Seconds since the Unix epoch
    #[serde(default)]
    pub create_timestamp: Option<i64>,
}

impl RemoteRecord {
    pub fn new(name: impl Into<String>, create_timestamp: Option<i64>) -> Self {
        RemoteRecord {
            name: name.into(),
            create_timestamp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("fetch failed: {0}")]
    FetchFailed(String),
}

/// What the fetcher needs to know about the remote item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub item: ItemId,
    pub name: String,
    pub path: Vec<String>,
}

/// Transport for remote items. Implementations live outside the core.
pub trait RemoteFetcher: Send + Sync {
    fn fetch_children(
        &self,
        request: &FetchRequest,
    ) -> BoxFuture<'static, Result<Vec<RemoteRecord>, FetchError>>;
}

/// Identifies one dispatched fetch. A ticket goes stale as soon as the user
/// navigates elsewhere or another fetch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub(crate) item: ItemId,
    pub(crate) epoch: u64,
}

impl FetchTicket {
    pub fn item(&self) -> ItemId {
        self.item
    }
}

/// A fetch the caller still has to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    pub ticket: FetchTicket,
    pub request: FetchRequest,
}

/// Result of applying a finished fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Records were merged; `added` counts new children
    Applied { fetched: usize, added: usize },
    /// The fetch failed; the tree is untouched
    Failed(FetchError),
    /// The user moved on before the fetch finished
    Discarded,
}

/// Append records as text children of `item`, skipping blank names and
/// names already present. Returns how many children were added.
pub fn merge_records(
    tree: &mut Tree,
    item: ItemId,
    records: &[RemoteRecord],
) -> Result<usize, TreeError> {
    let mut added = 0;
    for record in records {
        let name = record.name.trim();
        if name.is_empty() {
            continue;
        }
        let exists = tree
            .children(item)
            .iter()
            .any(|c| tree.display_name(*c) == name);
        if exists {
            continue;
        }
        tree.add_new(item, ItemKind::text(name))?;
        added += 1;
    }
    Ok(added)
}

/// Render a timestamp in local time; invalid input or formats yield an empty string
pub fn format_timestamp(seconds: i64, format: &str) -> String {
    let Some(utc) = DateTime::from_timestamp(seconds, 0) else {
        return String::new();
    };
    let local = utc.with_timezone(&Local);
    let mut out = String::new();
    if write!(out, "{}", local.format(format)).is_err() {
        return String::new();
    }
    out
}

/// Notice text shown after a successful fetch
pub fn fetch_summary(records: &[RemoteRecord], timestamp_format: &str) -> String {
    match records.last() {
        None => "No remote items".to_string(),
        Some(last) => {
            let last_date = last
                .create_timestamp
                .map(|ts| format_timestamp(ts, timestamp_format))
                .unwrap_or_default();
            format!(
                "{} remote items fetched.\nLast on {}",
                records.len(),
                last_date
            )
        }
    }
}
