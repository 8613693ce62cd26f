use serde::{Deserialize, Serialize};

use super::lenient;
use super::ticket::Ticket;

/// One page of results from `GET /rest/api/3/search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(deserialize_with = "lenient")]
    pub start_at: u64,
    #[serde(deserialize_with = "lenient")]
    pub max_results: u64,
    #[serde(deserialize_with = "lenient")]
    pub total: u64,
    #[serde(deserialize_with = "lenient")]
    pub issues: Vec<Ticket>,
}
