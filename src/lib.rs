pub mod config;
pub mod date_util;
pub mod error;
pub mod graph;
pub mod jira;
pub mod metrics;
pub mod model;
pub mod report;
pub mod story_points;
pub mod sync;
pub mod url;

pub use config::Config;
pub use error::{Error, Result};
pub use graph::{build_graph, Graph, GraphEdge, GraphNode};
pub use jira::JiraClient;
pub use metrics::{Assignee, EpicStats, StatusCounts, TypeCounts};
pub use model::{Classification, Ticket};
pub use report::{build_report, EpicReport};
pub use story_points::story_points;
pub use sync::{FetchOptions, FetchProgress, IssueSource, NoopProgress};
pub use url::{browse_url, parse_browse_url, resolve_key, IssueUrlInfo};

use sync::fetcher;

/// Main entry point: fetch an epic's issues and aggregate them.
pub struct EpicMap<S: IssueSource = JiraClient> {
    source: S,
    workspace: String,
    options: FetchOptions,
}

impl EpicMap<JiraClient> {
    /// Build a Jira-backed instance from validated settings.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = JiraClient::new(config)?;
        Ok(Self::new(
            client,
            &config.workspace,
            FetchOptions {
                page_size: config.page_size,
            },
        ))
    }

    /// Check that the configured credentials are accepted.
    pub async fn ping(&self) -> Result<model::User> {
        self.source.ping().await
    }
}

impl<S: IssueSource> EpicMap<S> {
    pub fn new(source: S, workspace: &str, options: FetchOptions) -> Self {
        Self {
            source,
            workspace: workspace.to_string(),
            options,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn workspace(&self) -> &str {
        &self.workspace
    }

    /// Resolve `identifier` (issue key or browse URL), fetch every child
    /// issue and build the report.
    pub async fn report(
        &self,
        identifier: &str,
        progress: &dyn FetchProgress,
    ) -> Result<EpicReport> {
        let epic_key = url::resolve_key(identifier)?;
        let tickets =
            fetcher::fetch_all_issues(&self.source, &epic_key, &self.options, progress).await?;
        log::info!("Epic {epic_key}: aggregating {} issues", tickets.len());
        Ok(build_report(tickets, &epic_key, &self.workspace))
    }
}
