use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::graph::{build_graph, Graph};
use crate::metrics::{
    compute_stats, compute_status_counts, compute_type_counts, extract_assignees, Assignee,
    EpicStats, StatusCounts, TypeCounts,
};
use crate::model::Ticket;

/// Everything derived from one epic's issues, in the shape the web UI reads.
#[derive(Debug, Clone)]
pub struct EpicReport {
    pub stats: EpicStats,
    pub graph: Graph,
    pub status_counts: StatusCounts,
    pub type_counts: TypeCounts,
    pub tickets: Vec<Ticket>,
    /// The epic itself, when it was among the fetched issues.
    pub epic: Option<Ticket>,
    /// Workspace host, passed through for building issue links.
    pub jira_base_url: String,
    pub assignees: Vec<Assignee>,
}

impl EpicReport {
    pub fn total(&self) -> usize {
        self.tickets.len()
    }
}

/// Run every aggregation over a fully fetched issue set.
pub fn build_report(tickets: Vec<Ticket>, epic_key: &str, jira_base_url: &str) -> EpicReport {
    let stats = compute_stats(&tickets);
    let status_counts = compute_status_counts(&tickets);
    let type_counts = compute_type_counts(&tickets);
    let graph = build_graph(&tickets, epic_key);
    let assignees = extract_assignees(&tickets);
    let epic = find_epic(&tickets, epic_key).cloned();

    if epic.is_none() {
        log::debug!("Epic {epic_key} is not among its own search results");
    }

    EpicReport {
        stats,
        graph,
        status_counts,
        type_counts,
        tickets,
        epic,
        jira_base_url: jira_base_url.to_string(),
        assignees,
    }
}

/// First ticket whose key is `epic_key`.
pub fn find_epic<'a>(tickets: &'a [Ticket], epic_key: &str) -> Option<&'a Ticket> {
    tickets.iter().find(|t| t.key == epic_key)
}

// `issues` and `tickets` carry the same list; both names are read by clients.
impl Serialize for EpicReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("EpicReport", 10)?;
        s.serialize_field("stats", &self.stats)?;
        s.serialize_field("graph", &self.graph)?;
        s.serialize_field("statusCounts", &self.status_counts)?;
        s.serialize_field("typeCounts", &self.type_counts)?;
        s.serialize_field("issues", &self.tickets)?;
        s.serialize_field("epic", &self.epic)?;
        s.serialize_field("tickets", &self.tickets)?;
        s.serialize_field("total", &self.total())?;
        s.serialize_field("jiraBaseUrl", &self.jira_base_url)?;
        s.serialize_field("assignees", &self.assignees)?;
        s.end()
    }
}
