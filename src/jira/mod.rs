use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{SearchPage, User};
use crate::sync::{IssueSource, PageRequest};
use crate::url::api_base_url;

/// Minimal Jira Cloud REST v3 client.
#[derive(Debug, Clone)]
pub struct JiraClient {
    base_url: String,
    email: String,
    token: String,
    client: reqwest::Client,
}

impl JiraClient {
    /// Create a client for the configured workspace. Fails if any
    /// credential is missing.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("epicmap/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: api_base_url(&config.workspace),
            email: config.email.clone(),
            token: config.token.clone(),
            client,
        })
    }

    /// REST base, e.g. `https://acme.atlassian.net/rest/api/3`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the authenticated user. Used to check credentials.
    pub async fn ping(&self) -> Result<User> {
        self.get_json("/myself", &[]).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("GET {url}");
        let resp = self
            .client
            .get(&url)
            .basic_auth(&self.email, Some(&self.token))
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .query(query)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: api_error_message(status.canonical_reason(), &body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl IssueSource for JiraClient {
    async fn search_page(&self, request: &PageRequest) -> Result<SearchPage> {
        let query = [
            ("jql", search_jql(&request.epic_key)),
            ("startAt", request.start_at.to_string()),
            ("maxResults", request.page_size.to_string()),
        ];
        self.get_json("/search", &query).await
    }
}

/// JQL selecting the children of an epic.
pub fn search_jql(epic_key: &str) -> String {
    format!("parent = {epic_key}")
}

// Jira error bodies carry `errorMessages` and a field -> message map.
fn api_error_message(reason: Option<&str>, body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let mut messages: Vec<String> = Vec::new();
    if let Some(value) = &parsed {
        if let Some(list) = value.get("errorMessages").and_then(|v| v.as_array()) {
            messages.extend(list.iter().filter_map(|m| m.as_str()).map(String::from));
        }
        if let Some(map) = value.get("errors").and_then(|v| v.as_object()) {
            messages.extend(
                map.iter()
                    .filter_map(|(field, m)| m.as_str().map(|m| format!("{field}: {m}"))),
            );
        }
    }

    if !messages.is_empty() {
        return messages.join("; ");
    }
    let body = body.trim();
    if body.is_empty() {
        reason.unwrap_or("request failed").to_string()
    } else {
        body.to_string()
    }
}
