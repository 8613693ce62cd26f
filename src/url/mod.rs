use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static ISSUE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z0-9_]*-\d+$").unwrap());

/// Parsed information from a Jira issue URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueUrlInfo {
    pub host: String,
    pub key: String,
}

/// Parse a Jira issue URL into its host and issue key.
///
/// Supported URL patterns:
/// - `https://<host>/browse/<KEY>`
/// - `https://<host>/jira/software/projects/<P>/issues/<KEY>`
/// - `https://<host>/...?selectedIssue=<KEY>` (boards and backlogs)
pub fn parse_browse_url(input: &str) -> Result<IssueUrlInfo> {
    let url = url::Url::parse(input).map_err(|e| Error::UrlParse(e.to_string()))?;

    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| Error::UrlParse(format!("URL has no host: {input}")))?
        .to_string();

    if let Some((_, selected)) = url.query_pairs().find(|(k, _)| k == "selectedIssue") {
        let key = selected.to_uppercase();
        if is_issue_key(&key) {
            return Ok(IssueUrlInfo { host, key });
        }
    }

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let key = segments
        .windows(2)
        .find(|pair| pair[0] == "browse" || pair[0] == "issues")
        .map(|pair| pair[1].to_uppercase())
        .filter(|k| is_issue_key(k))
        .ok_or_else(|| Error::UrlParse(format!("no issue key in URL: {input}")))?;

    Ok(IssueUrlInfo { host, key })
}

/// Build the browse URL for an issue. `base` may be a bare host or
/// already carry a scheme.
pub fn browse_url(base: &str, key: &str) -> String {
    format!("{}/browse/{key}", with_scheme(base))
}

/// REST v3 base URL for a workspace host.
pub fn api_base_url(workspace: &str) -> String {
    format!("{}/rest/api/3", with_scheme(workspace))
}

fn with_scheme(base: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    if base.starts_with("http://") || base.starts_with("https://") {
        base.to_string()
    } else {
        format!("https://{base}")
    }
}

/// Check if a string looks like a Jira issue key (`PROJ-123`).
pub fn is_issue_key(s: &str) -> bool {
    ISSUE_KEY.is_match(s)
}

/// Extract an issue key from either a raw key or a Jira URL.
pub fn resolve_key(input: &str) -> Result<String> {
    let input = input.trim();
    let upper = input.to_uppercase();
    if is_issue_key(&upper) {
        return Ok(upper);
    }
    if input.contains("://") {
        return parse_browse_url(input)
            .map(|info| info.key)
            .map_err(|_| Error::InvalidIdentifier(input.to_string()));
    }
    Err(Error::InvalidIdentifier(input.to_string()))
}
