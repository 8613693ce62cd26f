use std::time::Duration;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "epicmap", about = "Jira epic progress and dependency graph CLI")]
struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Jira workspace host (overrides JIRA_EPIC_WORKSPACE)
    #[arg(long)]
    workspace: Option<String>,

    /// Account email (overrides JIRA_EPIC_EMAIL)
    #[arg(long)]
    email: Option<String>,

    /// API token (overrides JIRA_EPIC_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Page size for search requests (default: 50)
    #[arg(long)]
    page_size: Option<u32>,

    /// Per-request timeout in seconds (default: 10)
    #[arg(long)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

/// Progress reporter that writes to stderr.
struct StderrProgress;

impl epicmap::FetchProgress for StderrProgress {
    fn on_page_fetched(&self, epic_key: &str, fetched: usize, total: u64) {
        eprint!("\r  Fetching {epic_key}: {fetched}/{total}   ");
    }

    fn on_complete(&self, _epic_key: &str, count: usize) {
        eprintln!("\n  Done: {count} issues");
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the configured credentials work
    Ping,
    /// Fetch an epic and print its progress summary
    Report {
        /// Epic key (APP-1) or browse URL
        epic: String,
        /// Output the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fetch an epic and print its dependency graph
    Graph {
        /// Epic key (APP-1) or browse URL
        epic: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Before the logger, so RUST_LOG may come from a .env file
    let env_file = epicmap::config::load_env_files();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Some(path) = env_file {
        log::debug!("Loaded environment from {}", path.display());
    }
    let config = build_config(&cli)?;
    log::debug!("Using {config:?}");

    let map = epicmap::EpicMap::from_config(&config)?;

    match cli.command {
        Commands::Ping => {
            let me = map.ping().await?;
            println!("Connected to {} as {}", config.workspace, display_user(&me));
        }
        Commands::Report { epic, json } => {
            let report = map.report(&epic, &StderrProgress).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Commands::Graph { epic, json } => {
            let report = map.report(&epic, &StderrProgress).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report.graph)?);
            } else {
                print_graph(&report.graph);
            }
        }
    }

    Ok(())
}

fn build_config(cli: &Cli) -> anyhow::Result<epicmap::Config> {
    let mut config = epicmap::Config::from_env()?;
    if let Some(workspace) = &cli.workspace {
        config.workspace = workspace.clone();
    }
    if let Some(email) = &cli.email {
        config.email = email.clone();
    }
    if let Some(token) = &cli.token {
        config.token = token.clone();
    }
    if let Some(ps) = cli.page_size {
        config.page_size = ps;
    }
    if let Some(secs) = cli.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    config.validate()?;
    Ok(config)
}

fn display_user(user: &epicmap::model::User) -> String {
    match (user.display_name.is_empty(), user.email_address.is_empty()) {
        (false, false) => format!("{} <{}>", user.display_name, user.email_address),
        (false, true) => user.display_name.clone(),
        (true, false) => user.email_address.clone(),
        (true, true) => user.account_id.clone(),
    }
}

fn print_report(report: &epicmap::EpicReport) {
    match &report.epic {
        Some(epic) => println!("Epic: {} {}", epic.key, epic.fields.summary),
        None => println!("Epic: (not in results)"),
    }
    if let Some(key) = report.epic.as_ref().map(|e| e.key.as_str()) {
        println!("  {}", epicmap::browse_url(&report.jira_base_url, key));
    }

    let s = &report.stats;
    println!("  Progress:");
    println!("    Issues:      {}", s.total);
    println!("    To do:       {}", s.to_do);
    println!("    In progress: {}", s.in_progress);
    println!("    Done:        {} ({:.1}%)", s.done, s.percentage);

    if !report.status_counts.is_empty() {
        println!("  Statuses:");
        for (name, entry) in &report.status_counts {
            println!("    {:<20} {:>4}  ({})", name, entry.count, entry.classification);
        }
    }

    if !report.type_counts.is_empty() {
        println!("  Types:");
        for (name, count) in &report.type_counts {
            println!("    {name:<20} {count:>4}");
        }
    }

    if !report.assignees.is_empty() {
        println!("  Assignees:");
        for a in &report.assignees {
            let inactive = if a.active { "" } else { " (inactive)" };
            println!("    {}{inactive}", a.display_name);
        }
    }
}

fn print_graph(graph: &epicmap::Graph) {
    println!("Nodes ({}):", graph.nodes.len());
    for node in &graph.nodes {
        let owner = if node.assignee.is_empty() {
            "unassigned"
        } else {
            node.assignee.as_str()
        };
        println!(
            "  {:<12} [{}] {} pts, {owner}",
            node.id, node.status, node.story_points
        );
    }
    println!("Edges ({}):", graph.edges.len());
    for edge in &graph.edges {
        println!("  {} -> {}  ({})", edge.from, edge.to, edge.relation);
    }
}
