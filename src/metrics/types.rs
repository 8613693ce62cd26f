use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::Classification;

/// Progress of an epic's issues by status category.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpicStats {
    pub total: u64,
    pub to_do: u64,
    pub in_progress: u64,
    pub done: u64,
    /// Share of issues that are done, 0-100. Zero when there are no issues.
    pub percentage: f64,
    /// Share of the remaining (not done) issues that are in progress, 0-100.
    /// Not finite when every issue is done.
    pub progress_per: f64,
}

/// Occurrences of one status name, with the category of its first sighting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusClassified {
    pub classification: Classification,
    pub count: u64,
}

/// Status name -> classification and count.
pub type StatusCounts = BTreeMap<String, StatusClassified>;

/// Issue type name -> count.
pub type TypeCounts = BTreeMap<String, u64>;

/// One person assigned to at least one issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignee {
    pub account_id: String,
    pub display_name: String,
    pub avatar_url: String,
    pub active: bool,
}
