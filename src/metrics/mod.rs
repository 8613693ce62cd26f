pub mod types;

pub use types::*;

use std::collections::BTreeMap;

use crate::model::{Classification, Ticket};

/// Avatar sizes to pick from, best first.
const AVATAR_SIZES: &[&str] = &["48x48", "32x32", "24x24", "16x16"];

/// Count issues per status category and derive completion percentages.
///
/// Issues with an unrecognized category count toward `total` only.
pub fn compute_stats(tickets: &[Ticket]) -> EpicStats {
    let mut stats = EpicStats::default();

    for ticket in tickets {
        stats.total += 1;
        match ticket.fields.classification() {
            Classification::New => stats.to_do += 1,
            Classification::Indeterminate => stats.in_progress += 1,
            Classification::Done => stats.done += 1,
            _ => {}
        }
    }

    if stats.total > 0 {
        stats.percentage = stats.done as f64 / stats.total as f64 * 100.0;
    }

    // Unguarded: not finite once every issue is done.
    let remaining = stats.total - stats.done;
    stats.progress_per = stats.in_progress as f64 / remaining as f64 * 100.0;

    stats
}

/// Histogram of status names. The first issue seen with a given status
/// decides the classification stored for it.
pub fn compute_status_counts(tickets: &[Ticket]) -> StatusCounts {
    let mut counts = StatusCounts::new();

    for ticket in tickets {
        counts
            .entry(ticket.fields.status.name.clone())
            .and_modify(|entry| entry.count += 1)
            .or_insert_with(|| StatusClassified {
                classification: ticket.fields.classification(),
                count: 1,
            });
    }

    counts
}

/// Histogram of issue type names.
pub fn compute_type_counts(tickets: &[Ticket]) -> TypeCounts {
    let mut counts = TypeCounts::new();
    for ticket in tickets {
        *counts.entry(ticket.fields.issue_type.name.clone()).or_insert(0) += 1;
    }
    counts
}

/// Everyone assigned to at least one issue, once per account id.
///
/// When the same account shows up on several issues, the last one seen
/// provides the details. Callers must not rely on the output order.
pub fn extract_assignees(tickets: &[Ticket]) -> Vec<Assignee> {
    let mut by_account: BTreeMap<String, Assignee> = BTreeMap::new();

    for ticket in tickets {
        let Some(user) = ticket.fields.assignee.as_ref() else {
            continue;
        };
        if user.account_id.is_empty() {
            continue;
        }
        by_account.insert(
            user.account_id.clone(),
            Assignee {
                account_id: user.account_id.clone(),
                display_name: user.display_name.clone(),
                avatar_url: best_avatar_url(&user.avatar_urls),
                active: user.active,
            },
        );
    }

    by_account.into_values().collect()
}

/// Pick the largest preferred avatar, else any non-empty URL, else "".
pub fn best_avatar_url(avatar_urls: &BTreeMap<String, String>) -> String {
    AVATAR_SIZES
        .iter()
        .filter_map(|size| avatar_urls.get(*size))
        .chain(avatar_urls.values())
        .find(|url| !url.is_empty())
        .cloned()
        .unwrap_or_default()
}
