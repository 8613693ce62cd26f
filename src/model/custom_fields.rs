use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Prefix Jira gives to per-deployment fields (`customfield_10016`, ...).
pub const CUSTOM_FIELD_PREFIX: &str = "customfield_";

/// Whether a field id belongs to the custom-field namespace.
pub fn is_custom_field_id(id: &str) -> bool {
    id.strip_prefix(CUSTOM_FIELD_PREFIX)
        .is_some_and(|suffix| !suffix.is_empty())
}

/// A select-list value stored in a custom field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CustomFieldOption {
    pub id: String,
    pub value: String,
    #[serde(rename = "self")]
    pub self_url: String,
}

/// The `customfield_*` entries of an issue's `fields` object.
///
/// Deserializing from a map keeps only custom-field ids, so this type can
/// sit behind `#[serde(flatten)]` and soak up whatever the fixed schema
/// did not claim.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CustomFields(BTreeMap<String, Value>);

impl CustomFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, value: Value) {
        self.0.insert(id.into(), value);
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.0.get(id)
    }

    pub fn get_str(&self, id: &str) -> Option<&str> {
        self.get(id).and_then(Value::as_str)
    }

    pub fn get_f64(&self, id: &str) -> Option<f64> {
        self.get(id).and_then(Value::as_f64)
    }

    /// Read an object-valued field as a select option. Members that are
    /// missing or not strings come back empty.
    pub fn get_option(&self, id: &str) -> Option<CustomFieldOption> {
        let obj = self.get(id)?.as_object()?;
        let member = |name: &str| {
            obj.get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Some(CustomFieldOption {
            id: member("id"),
            value: member("value"),
            self_url: member("self"),
        })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for CustomFields {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .filter(|(id, _)| is_custom_field_id(id))
                .collect(),
        )
    }
}

impl<'de> Deserialize<'de> for CustomFields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let all = BTreeMap::<String, Value>::deserialize(deserializer)?;
        Ok(all.into_iter().collect())
    }
}
