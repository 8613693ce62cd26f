use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::custom_fields::CustomFields;
use super::document::AtlassianDocument;
use super::lenient;
use super::time::JiraTime;

/// Coarse status bucket, taken from a status category key.
///
/// Raw values outside the known vocabulary are kept verbatim in `Other`
/// so they survive a round trip; they are not counted in any bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Classification {
    /// `new`: not started.
    New,
    /// `indeterminate`: in progress.
    Indeterminate,
    /// `done`: complete.
    Done,
    /// `epic`: only used for the synthesized root node and epic-link edges.
    Epic,
    Other(String),
}

impl Classification {
    pub fn as_str(&self) -> &str {
        match self {
            Classification::New => "new",
            Classification::Indeterminate => "indeterminate",
            Classification::Done => "done",
            Classification::Epic => "epic",
            Classification::Other(raw) => raw,
        }
    }
}

impl Default for Classification {
    fn default() -> Self {
        Classification::Other(String::new())
    }
}

impl From<&str> for Classification {
    fn from(raw: &str) -> Self {
        match raw {
            "new" => Classification::New,
            "indeterminate" => Classification::Indeterminate,
            "done" => Classification::Done,
            "epic" => Classification::Epic,
            other => Classification::Other(other.to_string()),
        }
    }
}

impl From<String> for Classification {
    fn from(raw: String) -> Self {
        Classification::from(raw.as_str())
    }
}

impl From<Classification> for String {
    fn from(c: Classification) -> Self {
        c.as_str().to_string()
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One issue record as returned by the search endpoint.
///
/// The same shape is used for the partial copies of linked issues embedded
/// in `issuelinks`, which usually carry only key, summary, status,
/// priority and issue type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ticket {
    #[serde(deserialize_with = "lenient")]
    pub expand: String,
    #[serde(deserialize_with = "lenient")]
    pub id: String,
    #[serde(rename = "self", deserialize_with = "lenient")]
    pub self_url: String,
    #[serde(deserialize_with = "lenient")]
    pub key: String,
    #[serde(deserialize_with = "lenient")]
    pub fields: Fields,
}

/// The `fields` object of an issue.
///
/// Known fields are typed; every `customfield_*` key lands in
/// `custom_fields`; anything else is dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fields {
    #[serde(deserialize_with = "lenient")]
    pub summary: String,
    #[serde(deserialize_with = "lenient")]
    pub status: Status,
    #[serde(rename = "statusCategory", deserialize_with = "lenient")]
    pub status_category: StatusCategory,
    #[serde(rename = "issuetype", deserialize_with = "lenient")]
    pub issue_type: IssueType,
    #[serde(deserialize_with = "lenient")]
    pub assignee: Option<User>,
    #[serde(deserialize_with = "lenient")]
    pub reporter: Option<User>,
    #[serde(deserialize_with = "lenient")]
    pub creator: Option<User>,
    #[serde(deserialize_with = "lenient")]
    pub priority: Option<Priority>,
    #[serde(deserialize_with = "lenient")]
    pub labels: Vec<String>,
    #[serde(rename = "issuelinks", deserialize_with = "lenient")]
    pub issue_links: Vec<IssueLink>,
    #[serde(deserialize_with = "lenient")]
    pub parent: Option<ParentIssue>,
    #[serde(deserialize_with = "lenient")]
    pub project: Project,
    #[serde(deserialize_with = "lenient")]
    pub description: Option<AtlassianDocument>,
    pub created: JiraTime,
    pub updated: JiraTime,
    #[serde(rename = "statuscategorychangedate")]
    pub status_category_change_date: JiraTime,
    #[serde(rename = "lastViewed")]
    pub last_viewed: JiraTime,
    #[serde(rename = "resolutiondate")]
    pub resolution_date: JiraTime,
    #[serde(rename = "duedate")]
    pub due_date: JiraTime,
    #[serde(flatten)]
    pub custom_fields: CustomFields,
}

impl Fields {
    /// Status classification. Prefers the top-level `statusCategory` and
    /// falls back to the category nested in `status`.
    pub fn classification(&self) -> Classification {
        let key = if self.status_category.key.is_empty() {
            self.status
                .status_category
                .as_ref()
                .map(|c| c.key.as_str())
                .unwrap_or_default()
        } else {
            self.status_category.key.as_str()
        };
        Classification::from(key)
    }

    /// Assignee display name and account id, or empty strings when the
    /// assignee is missing or has no display name.
    pub fn assignee_name_and_id(&self) -> (String, String) {
        match &self.assignee {
            Some(user) if !user.display_name.is_empty() => {
                (user.display_name.clone(), user.account_id.clone())
            }
            _ => (String::new(), String::new()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatusCategory {
    #[serde(rename = "self", deserialize_with = "lenient")]
    pub self_url: String,
    #[serde(deserialize_with = "lenient")]
    pub id: i64,
    #[serde(deserialize_with = "lenient")]
    pub key: String,
    #[serde(deserialize_with = "lenient")]
    pub color_name: String,
    #[serde(deserialize_with = "lenient")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Status {
    #[serde(rename = "self", deserialize_with = "lenient")]
    pub self_url: String,
    #[serde(deserialize_with = "lenient")]
    pub description: String,
    #[serde(deserialize_with = "lenient")]
    pub icon_url: String,
    #[serde(deserialize_with = "lenient")]
    pub name: String,
    #[serde(deserialize_with = "lenient")]
    pub id: String,
    #[serde(deserialize_with = "lenient")]
    pub status_category: Option<StatusCategory>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IssueType {
    #[serde(rename = "self", deserialize_with = "lenient")]
    pub self_url: String,
    #[serde(deserialize_with = "lenient")]
    pub id: String,
    #[serde(deserialize_with = "lenient")]
    pub description: String,
    #[serde(deserialize_with = "lenient")]
    pub icon_url: String,
    #[serde(deserialize_with = "lenient")]
    pub name: String,
    #[serde(deserialize_with = "lenient")]
    pub subtask: bool,
    #[serde(deserialize_with = "lenient")]
    pub avatar_id: i64,
    #[serde(deserialize_with = "lenient")]
    pub hierarchy_level: i64,
}

/// A Jira account (assignee, reporter, creator).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "self", deserialize_with = "lenient")]
    pub self_url: String,
    #[serde(deserialize_with = "lenient")]
    pub account_id: String,
    #[serde(deserialize_with = "lenient")]
    pub email_address: String,
    /// Avatar URLs keyed by size, e.g. `"48x48"`.
    #[serde(deserialize_with = "lenient")]
    pub avatar_urls: BTreeMap<String, String>,
    #[serde(deserialize_with = "lenient")]
    pub display_name: String,
    #[serde(deserialize_with = "lenient")]
    pub active: bool,
    #[serde(deserialize_with = "lenient")]
    pub time_zone: String,
    #[serde(deserialize_with = "lenient")]
    pub account_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Priority {
    #[serde(rename = "self", deserialize_with = "lenient")]
    pub self_url: String,
    #[serde(deserialize_with = "lenient")]
    pub icon_url: String,
    #[serde(deserialize_with = "lenient")]
    pub name: String,
    #[serde(deserialize_with = "lenient")]
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "self", deserialize_with = "lenient")]
    pub self_url: String,
    #[serde(deserialize_with = "lenient")]
    pub id: String,
    #[serde(deserialize_with = "lenient")]
    pub key: String,
    #[serde(deserialize_with = "lenient")]
    pub name: String,
    #[serde(deserialize_with = "lenient")]
    pub project_type_key: String,
    #[serde(deserialize_with = "lenient")]
    pub simplified: bool,
    #[serde(deserialize_with = "lenient")]
    pub avatar_urls: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParentIssue {
    #[serde(deserialize_with = "lenient")]
    pub id: String,
    #[serde(deserialize_with = "lenient")]
    pub key: String,
    #[serde(rename = "self", deserialize_with = "lenient")]
    pub self_url: String,
    #[serde(deserialize_with = "lenient")]
    pub fields: ParentFields,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParentFields {
    #[serde(deserialize_with = "lenient")]
    pub summary: String,
    #[serde(deserialize_with = "lenient")]
    pub status: Option<Status>,
    #[serde(rename = "issuetype", deserialize_with = "lenient")]
    pub issue_type: Option<IssueType>,
}

/// A typed relation to another issue. Jira fills exactly one of
/// `inward_issue` / `outward_issue`, seen from the owning issue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IssueLink {
    #[serde(deserialize_with = "lenient")]
    pub id: String,
    #[serde(rename = "self", deserialize_with = "lenient")]
    pub self_url: String,
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub link_type: LinkType,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub inward_issue: Option<Ticket>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub outward_issue: Option<Ticket>,
}

impl IssueLink {
    /// The outward linked issue, if present with a non-empty key.
    pub fn outward(&self) -> Option<&Ticket> {
        self.outward_issue.as_ref().filter(|t| !t.key.is_empty())
    }

    /// The inward linked issue, if present with a non-empty key.
    pub fn inward(&self) -> Option<&Ticket> {
        self.inward_issue.as_ref().filter(|t| !t.key.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkType {
    #[serde(deserialize_with = "lenient")]
    pub id: String,
    #[serde(rename = "self", deserialize_with = "lenient")]
    pub self_url: String,
    #[serde(deserialize_with = "lenient")]
    pub name: String,
    #[serde(deserialize_with = "lenient")]
    pub inward: String,
    #[serde(deserialize_with = "lenient")]
    pub outward: String,
}
