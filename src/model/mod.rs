//! Typed view of the records returned by the Jira search API.
//!
//! Jira's schema varies between deployments, so every field is parsed
//! leniently: a missing, `null` or mistyped value degrades to its default
//! instead of failing the whole record.

pub mod custom_fields;
pub mod document;
pub mod search;
pub mod ticket;
pub mod time;

pub use custom_fields::{CustomFieldOption, CustomFields, CUSTOM_FIELD_PREFIX};
pub use document::{AtlassianDocument, DocumentNode};
pub use search::SearchPage;
pub use ticket::{
    Classification, Fields, IssueLink, IssueType, LinkType, ParentFields, ParentIssue, Priority,
    Project, Status, StatusCategory, Ticket, User,
};
pub use time::JiraTime;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Deserialize a field, falling back to `T::default()` on `null` or on a
/// value of the wrong shape.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}
