use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::sync::DEFAULT_PAGE_SIZE;

/// Prefix of every environment variable read by [`Config::from_env`].
pub const ENV_PREFIX: &str = "JIRA_EPIC_";

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for a Jira workspace.
#[derive(Clone)]
pub struct Config {
    /// Workspace host, e.g. `acme.atlassian.net`.
    pub workspace: String,
    pub email: String,
    /// API token. Only ever logged through [`mask_token`].
    pub token: String,
    pub page_size: u32,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace: String::new(),
            email: String::new(),
            token: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("workspace", &self.workspace)
            .field("email", &self.email)
            .field("token", &mask_token(&self.token))
            .field("page_size", &self.page_size)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    /// Read `JIRA_EPIC_WORKSPACE`, `JIRA_EPIC_EMAIL`, `JIRA_EPIC_TOKEN`,
    /// `JIRA_EPIC_PAGE_SIZE` and `JIRA_EPIC_TIMEOUT_SECS`. Missing values
    /// stay at their defaults; call [`Config::validate`] before use.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(format!("{ENV_PREFIX}{name}")).ok())
    }

    /// Build a config from a name -> value lookup (names without the prefix).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(workspace) = lookup("WORKSPACE") {
            config.workspace = workspace.trim().to_string();
        }
        if let Some(email) = lookup("EMAIL") {
            config.email = email.trim().to_string();
        }
        if let Some(token) = lookup("TOKEN") {
            config.token = token.trim().to_string();
        }
        if let Some(raw) = lookup("PAGE_SIZE") {
            config.page_size = raw.trim().parse().map_err(|_| {
                Error::Config(format!("{ENV_PREFIX}PAGE_SIZE is not a number: {raw}"))
            })?;
        }
        if let Some(raw) = lookup("TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                Error::Config(format!("{ENV_PREFIX}TIMEOUT_SECS is not a number: {raw}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Check that everything needed to talk to Jira is present.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("WORKSPACE", &self.workspace),
            ("EMAIL", &self.email),
            ("TOKEN", &self.token),
        ]
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| *name)
        .collect();

        if !missing.is_empty() {
            let names: Vec<String> = missing.iter().map(|n| format!("{ENV_PREFIX}{n}")).collect();
            return Err(Error::Config(format!(
                "missing Jira settings: {}",
                names.join(", ")
            )));
        }
        if self.page_size == 0 {
            return Err(Error::Config("page size must be greater than zero".into()));
        }
        Ok(())
    }
}

/// `.env` files to look for, in order of preference.
pub fn env_file_candidates(cwd: &Path, home: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = vec![cwd.join(".env"), cwd.join(".env.local")];
    if let Some(home) = home {
        candidates.push(home.join(".env"));
        candidates.push(home.join(".epicmap.env"));
    }
    candidates
}

/// Load the first `.env` file that exists and parses. Variables already
/// set in the environment win. Returns the file that was loaded.
pub fn load_env_files() -> Option<PathBuf> {
    let cwd = std::env::current_dir().unwrap_or_default();
    let home = dirs::home_dir();
    load_first_env_file(&env_file_candidates(&cwd, home.as_deref()))
}

fn load_first_env_file(candidates: &[PathBuf]) -> Option<PathBuf> {
    for path in candidates.iter().filter(|p| p.is_file()) {
        match dotenv::from_path(path) {
            Ok(()) => {
                log::debug!("Loaded environment from {}", path.display());
                return Some(path.clone());
            }
            Err(e) => log::warn!("Could not load env file {}: {e}", path.display()),
        }
    }
    None
}

/// Keep the first four characters of a secret and star out the rest.
pub fn mask_token(token: &str) -> String {
    let len = token.chars().count();
    if len > 4 {
        let visible: String = token.chars().take(4).collect();
        format!("{visible}{}", "*".repeat(len - 4))
    } else {
        "****".to_string()
    }
}
