use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::date_util::{format_jira_timestamp, parse_jira_timestamp};

/// A Jira timestamp that never fails to deserialize.
///
/// Unrecognized encodings, `null` and non-string values all resolve to the
/// zero value, which serializes back out as `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JiraTime(Option<DateTime<FixedOffset>>);

impl JiraTime {
    pub fn new(dt: DateTime<FixedOffset>) -> Self {
        Self(Some(dt))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_none()
    }

    pub fn as_datetime(&self) -> Option<&DateTime<FixedOffset>> {
        self.0.as_ref()
    }
}

impl fmt::Display for JiraTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(dt) => f.write_str(&format_jira_timestamp(dt)),
            None => Ok(()),
        }
    }
}

impl<'de> Deserialize<'de> for JiraTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self(value.as_str().and_then(parse_jira_timestamp)))
    }
}

impl Serialize for JiraTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.0 {
            Some(dt) => serializer.serialize_str(&format_jira_timestamp(dt)),
            None => serializer.serialize_none(),
        }
    }
}
