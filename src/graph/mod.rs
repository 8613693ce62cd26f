use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{Classification, Ticket};
use crate::story_points::story_points;

/// Relation type used for the edges from the epic to its issues.
pub const EPIC_LINK: &str = "epic link";

/// Label and status given to the epic when it is not among the fetched issues.
pub const EPIC_PLACEHOLDER: &str = "Epic";

/// Issues and the relations between them, ready for a graph view.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Issue key.
    pub id: String,
    /// Issue summary.
    pub label: String,
    pub status: String,
    pub classification: Classification,
    pub story_points: f64,
    /// Assignee display name.
    pub assignee: String,
    pub assignee_id: String,
}

/// A directed relation. The status, points and assignee describe the `to`
/// end, except on epic-link edges where status and classification are the
/// fixed `"Epic"` / `epic` pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    /// Relation name, e.g. `"Blocks"` or [`EPIC_LINK`].
    #[serde(rename = "type")]
    pub relation: String,
    pub status: String,
    pub classification: Classification,
    pub story_points: f64,
    pub assignee: String,
    pub assignee_id: String,
}

impl Graph {
    pub fn node(&self, key: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == key)
    }

    pub fn edges_of_type<'a>(&'a self, relation: &'a str) -> impl Iterator<Item = &'a GraphEdge> {
        self.edges.iter().filter(move |e| e.relation == relation)
    }
}

impl GraphNode {
    fn from_ticket(ticket: &Ticket) -> Self {
        let (assignee, assignee_id) = ticket.fields.assignee_name_and_id();
        Self {
            id: ticket.key.clone(),
            label: ticket.fields.summary.clone(),
            status: ticket.fields.status.name.clone(),
            classification: ticket.fields.classification(),
            story_points: story_points(ticket),
            assignee,
            assignee_id,
        }
    }

    fn epic_placeholder(key: &str) -> Self {
        Self {
            id: key.to_string(),
            label: EPIC_PLACEHOLDER.to_string(),
            status: EPIC_PLACEHOLDER.to_string(),
            classification: Classification::Epic,
            story_points: 0.0,
            assignee: String::new(),
            assignee_id: String::new(),
        }
    }
}

impl GraphEdge {
    /// Edge whose attributes describe `target`.
    fn towards(from: &str, to: &str, relation: &str, target: &Ticket) -> Self {
        let (assignee, assignee_id) = target.fields.assignee_name_and_id();
        Self {
            from: from.to_string(),
            to: to.to_string(),
            relation: relation.to_string(),
            status: target.fields.status.name.clone(),
            classification: target.fields.classification(),
            story_points: story_points(target),
            assignee,
            assignee_id,
        }
    }

    fn epic_link(epic_key: &str, child: &Ticket) -> Self {
        Self {
            status: EPIC_PLACEHOLDER.to_string(),
            classification: Classification::Epic,
            ..Self::towards(epic_key, &child.key, EPIC_LINK, child)
        }
    }
}

/// Build the relationship graph of an epic's issues.
///
/// Nodes: one per issue, plus a placeholder for `epic_key` when the epic
/// itself was not fetched, plus one for every linked issue outside the
/// collection (from its embedded partial record). An issue's own node is
/// never replaced by a link's partial copy.
///
/// Edges, in issue order: an epic link from `epic_key` to the issue (unless
/// it is the epic), then that issue's links in link order, an outward side
/// before an inward one.
pub fn build_graph(tickets: &[Ticket], epic_key: &str) -> Graph {
    let mut nodes: BTreeMap<String, GraphNode> = BTreeMap::new();
    let mut edges = Vec::new();

    for ticket in tickets {
        nodes.insert(ticket.key.clone(), GraphNode::from_ticket(ticket));
    }

    if !nodes.contains_key(epic_key) {
        nodes.insert(epic_key.to_string(), GraphNode::epic_placeholder(epic_key));
    }

    for ticket in tickets {
        if ticket.key != epic_key {
            edges.push(GraphEdge::epic_link(epic_key, ticket));
        }
        for link in &ticket.fields.issue_links {
            if let Some(outward) = link.outward() {
                edges.push(GraphEdge::towards(
                    &ticket.key,
                    &outward.key,
                    &link.link_type.name,
                    outward,
                ));
                nodes
                    .entry(outward.key.clone())
                    .or_insert_with(|| GraphNode::from_ticket(outward));
            }
            if let Some(inward) = link.inward() {
                edges.push(GraphEdge::towards(
                    &inward.key,
                    &ticket.key,
                    &link.link_type.name,
                    inward,
                ));
                nodes
                    .entry(inward.key.clone())
                    .or_insert_with(|| GraphNode::from_ticket(inward));
            }
        }
    }

    log::debug!(
        "Built graph for {epic_key}: {} nodes, {} edges",
        nodes.len(),
        edges.len()
    );

    Graph {
        nodes: nodes.into_values().collect(),
        edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IssueLink, LinkType, StatusCategory, User};
    use serde_json::json;

    fn ticket(key: &str, category: &str) -> Ticket {
        let mut t = Ticket {
            key: key.to_string(),
            ..Default::default()
        };
        t.fields.summary = format!("Summary of {key}");
        t.fields.status.name = match category {
            "new" => "To Do",
            "done" => "Done",
            _ => "In Progress",
        }
        .to_string();
        t.fields.status_category.key = category.to_string();
        t
    }

    fn with_points(mut t: Ticket, points: f64) -> Ticket {
        t.fields.custom_fields.insert("customfield_10016", json!(points));
        t
    }

    fn with_assignee(mut t: Ticket, id: &str, name: &str) -> Ticket {
        t.fields.assignee = Some(User {
            account_id: id.to_string(),
            display_name: name.to_string(),
            ..Default::default()
        });
        t
    }

    fn link(name: &str, outward: Option<Ticket>, inward: Option<Ticket>) -> IssueLink {
        IssueLink {
            link_type: LinkType {
                name: name.to_string(),
                ..Default::default()
            },
            outward_issue: outward,
            inward_issue: inward,
            ..Default::default()
        }
    }

    fn assert_edges_reference_nodes(graph: &Graph) {
        for edge in &graph.edges {
            assert!(graph.node(&edge.from).is_some(), "missing from {}", edge.from);
            assert!(graph.node(&edge.to).is_some(), "missing to {}", edge.to);
        }
    }

    #[test]
    fn test_epic_present_with_two_children() {
        let tickets = vec![
            ticket("EPIC-1", "indeterminate"),
            ticket("EPIC-2", "new"),
            ticket("EPIC-3", "done"),
        ];
        let graph = build_graph(&tickets, "EPIC-1");

        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.edges.len(), 2);
        assert_eq!(graph.edges[0].from, "EPIC-1");
        assert_eq!(graph.edges[0].to, "EPIC-2");
        assert_eq!(graph.edges[1].to, "EPIC-3");
        assert!(graph.edges.iter().all(|e| e.relation == EPIC_LINK));

        // The epic keeps its real fields, not the placeholder
        let epic = graph.node("EPIC-1").unwrap();
        assert_eq!(epic.label, "Summary of EPIC-1");
        assert_eq!(epic.classification, Classification::Indeterminate);
    }

    #[test]
    fn test_missing_epic_gets_placeholder() {
        let tickets = vec![ticket("APP-2", "new"), ticket("APP-3", "done")];
        let graph = build_graph(&tickets, "APP-1");

        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.edges.len(), 2);

        let epic = graph.node("APP-1").unwrap();
        assert_eq!(epic.label, "Epic");
        assert_eq!(epic.status, "Epic");
        assert_eq!(epic.classification, Classification::Epic);
        assert_eq!(epic.story_points, 0.0);
        assert_eq!(epic.assignee, "");
        assert_eq!(epic.assignee_id, "");
        assert_edges_reference_nodes(&graph);
    }

    #[test]
    fn test_epic_link_edge_uses_fixed_status_and_child_assignee() {
        let child = with_assignee(with_points(ticket("APP-2", "done"), 8.0), "acc-7", "Kim");
        let graph = build_graph(&[child], "APP-1");

        let edge = &graph.edges[0];
        assert_eq!(edge.relation, "epic link");
        assert_eq!(edge.status, "Epic");
        assert_eq!(edge.classification, Classification::Epic);
        assert_eq!(edge.story_points, 8.0);
        assert_eq!(edge.assignee, "Kim");
        assert_eq!(edge.assignee_id, "acc-7");
    }

    #[test]
    fn test_empty_input_has_only_placeholder() {
        let graph = build_graph(&[], "APP-1");
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_node_count_matches_distinct_keys() {
        let tickets = vec![
            ticket("APP-2", "new"),
            ticket("APP-3", "new"),
            ticket("APP-4", "new"),
        ];
        assert_eq!(build_graph(&tickets, "APP-1").nodes.len(), 4);
        assert_eq!(build_graph(&tickets, "APP-3").nodes.len(), 3);
        assert_eq!(build_graph(&tickets, "APP-3").edges.len(), 2);
    }

    #[test]
    fn test_link_edges_describe_linked_issue() {
        let blocker = with_points(ticket("APP-9", "new"), 2.0);
        let mut owner = ticket("APP-2", "indeterminate");
        owner.fields.issue_links = vec![link("Blocks", Some(blocker.clone()), None)];
        let tickets = vec![owner, blocker];

        let graph = build_graph(&tickets, "APP-1");
        let blocks: Vec<_> = graph.edges_of_type("Blocks").collect();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].from, "APP-2");
        assert_eq!(blocks[0].to, "APP-9");
        assert_eq!(blocks[0].status, "To Do");
        assert_eq!(blocks[0].classification, Classification::New);
        assert_eq!(blocks[0].story_points, 2.0);
    }

    #[test]
    fn test_inward_link_points_at_owner() {
        let other = ticket("APP-5", "done");
        let mut owner = ticket("APP-2", "new");
        owner.fields.issue_links = vec![link("Relates", None, Some(other.clone()))];

        let graph = build_graph(&[owner, other], "APP-1");
        let rel: Vec<_> = graph.edges_of_type("Relates").collect();
        assert_eq!(rel.len(), 1);
        assert_eq!(rel[0].from, "APP-5");
        assert_eq!(rel[0].to, "APP-2");
        // Attributes come from the linked issue, even though it is the source
        assert_eq!(rel[0].classification, Classification::Done);
    }

    #[test]
    fn test_edge_order_and_multiplicity() {
        let a = ticket("APP-2", "new");
        let b = ticket("APP-3", "new");
        let mut owner = a.clone();
        owner.fields.issue_links = vec![
            link("Blocks", Some(b.clone()), None),
            link("Relates", Some(b.clone()), None),
            link("Clones", Some(b.clone()), Some(b.clone())),
        ];
        let graph = build_graph(&[owner, b], "APP-1");

        let order: Vec<(&str, &str, &str)> = graph
            .edges
            .iter()
            .map(|e| (e.from.as_str(), e.to.as_str(), e.relation.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("APP-1", "APP-2", "epic link"),
                ("APP-2", "APP-3", "Blocks"),
                ("APP-2", "APP-3", "Relates"),
                ("APP-2", "APP-3", "Clones"),
                ("APP-3", "APP-2", "Clones"),
                ("APP-1", "APP-3", "epic link"),
            ]
        );
        assert_eq!(graph.nodes.len(), 3);
    }

    #[test]
    fn test_link_to_issue_outside_collection_adds_node() {
        let mut outsider = ticket("OPS-77", "done");
        outsider.fields.summary = "Partial copy".to_string();
        let mut owner = ticket("APP-2", "new");
        owner.fields.issue_links = vec![link("Blocks", Some(outsider), None)];

        let graph = build_graph(&[owner], "APP-1");
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.node("OPS-77").unwrap().label, "Partial copy");
        assert_edges_reference_nodes(&graph);
    }

    #[test]
    fn test_edges_grouped_per_issue() {
        let mut first = ticket("APP-2", "new");
        first.fields.issue_links = vec![link("Blocks", Some(ticket("APP-3", "new")), None)];
        let second = ticket("APP-3", "new");
        let mut third = ticket("APP-4", "new");
        third.fields.issue_links = vec![link("Relates", None, Some(ticket("APP-2", "new")))];

        let graph = build_graph(&[first, second, third], "APP-1");
        let order: Vec<String> = graph
            .edges
            .iter()
            .map(|e| format!("{}->{}:{}", e.from, e.to, e.relation))
            .collect();
        assert_eq!(
            order,
            vec![
                "APP-1->APP-2:epic link",
                "APP-2->APP-3:Blocks",
                "APP-1->APP-3:epic link",
                "APP-1->APP-4:epic link",
                "APP-2->APP-4:Relates",
            ]
        );
    }

    #[test]
    fn test_inward_link_from_outside_collection_adds_node() {
        let mut outsider = ticket("OPS-12", "indeterminate");
        outsider.fields.summary = "Upstream".to_string();
        let mut owner = ticket("APP-2", "new");
        owner.fields.issue_links = vec![link("Blocks", None, Some(outsider))];

        let graph = build_graph(&[owner], "APP-1");
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.node("OPS-12").unwrap().label, "Upstream");
        let blocks: Vec<_> = graph.edges_of_type("Blocks").collect();
        assert_eq!(blocks[0].from, "OPS-12");
        assert_eq!(blocks[0].to, "APP-2");
        assert_edges_reference_nodes(&graph);
    }

    #[test]
    fn test_link_edge_classification_from_nested_status_category() {
        let mut linked = ticket("APP-3", "new");
        linked.fields.status_category = Default::default();
        linked.fields.status.status_category = Some(StatusCategory {
            key: "done".to_string(),
            ..Default::default()
        });
        let mut owner = ticket("APP-2", "new");
        owner.fields.issue_links = vec![link("Blocks", Some(linked), None)];

        let graph = build_graph(&[owner], "APP-1");
        let blocks: Vec<_> = graph.edges_of_type("Blocks").collect();
        assert_eq!(blocks[0].classification, Classification::Done);
        assert_eq!(graph.node("APP-3").unwrap().classification, Classification::Done);
    }

    #[test]
    fn test_partial_link_copy_does_not_replace_real_node() {
        let real = ticket("APP-3", "indeterminate");
        let mut stale = ticket("APP-3", "new");
        stale.fields.summary = "stale".to_string();
        let mut owner = ticket("APP-2", "new");
        owner.fields.issue_links = vec![link("Blocks", Some(stale), None)];

        let graph = build_graph(&[owner, real], "APP-1");
        let node = graph.node("APP-3").unwrap();
        assert_eq!(node.label, "Summary of APP-3");
        assert_eq!(node.classification, Classification::Indeterminate);
    }

    #[test]
    fn test_link_with_empty_key_is_ignored() {
        let mut owner = ticket("APP-2", "new");
        owner.fields.issue_links = vec![link("Blocks", Some(Ticket::default()), None)];
        let graph = build_graph(&[owner], "APP-1");
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.nodes.len(), 2);
    }

    #[test]
    fn test_serialized_edge_shape() {
        let graph = build_graph(&[ticket("APP-2", "new")], "APP-1");
        let json = serde_json::to_value(&graph).unwrap();
        let edge = &json["edges"][0];
        assert_eq!(edge["from"], "APP-1");
        assert_eq!(edge["type"], "epic link");
        assert_eq!(edge["classification"], "epic");
        assert_eq!(edge["storyPoints"], 0.0);
        assert_eq!(edge["assigneeId"], "");
    }
}
