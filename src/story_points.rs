use crate::model::Ticket;

/// Custom fields that hold story points, in probe order.
///
/// The field id depends on how the Jira instance was set up:
/// - `customfield_10016`: most Jira Cloud sites
/// - `customfield_10002`: most Jira Server sites
/// - `customfield_10004`, `customfield_10008`: older or migrated setups
pub const STORY_POINT_FIELDS: &[&str] = &[
    "customfield_10016",
    "customfield_10002",
    "customfield_10004",
    "customfield_10008",
];

/// Story points for a ticket: the first probed field holding a number
/// greater than zero, or 0.
///
/// An explicit estimate of 0 cannot be told apart from a missing one.
pub fn story_points(ticket: &Ticket) -> f64 {
    STORY_POINT_FIELDS
        .iter()
        .filter_map(|id| ticket.fields.custom_fields.get_f64(id))
        .find(|points| *points > 0.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ticket_with(fields: &[(&str, serde_json::Value)]) -> Ticket {
        let mut t = Ticket::default();
        for (id, value) in fields {
            t.fields.custom_fields.insert(*id, value.clone());
        }
        t
    }

    #[test]
    fn test_single_server_field() {
        let t = ticket_with(&[("customfield_10002", json!(5))]);
        assert_eq!(story_points(&t), 5.0);
    }

    #[test]
    fn test_no_fields() {
        assert_eq!(story_points(&Ticket::default()), 0.0);
    }

    #[test]
    fn test_zero_is_skipped_for_later_candidate() {
        let t = ticket_with(&[
            ("customfield_10016", json!(0)),
            ("customfield_10002", json!(3)),
        ]);
        assert_eq!(story_points(&t), 3.0);
    }

    #[test]
    fn test_probe_order_wins() {
        let t = ticket_with(&[
            ("customfield_10008", json!(13)),
            ("customfield_10004", json!(8)),
        ]);
        assert_eq!(story_points(&t), 8.0);
    }

    #[test]
    fn test_non_numeric_and_negative_ignored() {
        let t = ticket_with(&[
            ("customfield_10016", json!("5")),
            ("customfield_10002", json!(-2)),
            ("customfield_10004", json!(null)),
            ("customfield_10008", json!(0.5)),
        ]);
        assert_eq!(story_points(&t), 0.5);
    }

    #[test]
    fn test_unprobed_field_ignored() {
        let t = ticket_with(&[("customfield_10026", json!(8))]);
        assert_eq!(story_points(&t), 0.0);
    }
}
