//! sitegraph command-line front end
//!
//! Loads a JSON fixture into the in-memory store and runs one site
//! membership operation against it, printing the result as JSON on stdout.
//!
//! # Usage
//!
//! ```bash
//! # With config file
//! sitegraph --config sitegraph.yaml members /sites/physics --sort lastName:asc
//!
//! # With environment variables only
//! SITEGRAPH_STORE__FIXTURE_PATH=fixture.json sitegraph count /sites/physics
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde_json::{json, Value};
use tracing::info;

use sitegraph_domain::model::{AuthorizableId, ContentNode};
use sitegraph_domain::{EntityStore, SiteService};
use sitegraph_server::handlers::params::{PARAM_ITEMS, PARAM_SORT, PARAM_START};
use sitegraph_server::{
    init_logging, ChannelEventSink, LoggingConfig, MembersHandler, MembersQuery, ServerConfig,
};
use sitegraph_storage::MemoryEntityStore;

type Service = SiteService<MemoryEntityStore, MemoryEntityStore>;

/// sitegraph - site group membership resolution
#[derive(Parser, Debug)]
#[command(name = "sitegraph")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<String>,

    /// JSON fixture to load, overriding store.fixture_path
    #[arg(short, long)]
    fixture: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List a page of the site's members with their profiles
    Members {
        site: String,
        #[command(flatten)]
        paging: Paging,
    },
    /// List a page of the site's groups
    Groups {
        site: String,
        #[command(flatten)]
        paging: Paging,
    },
    /// Count the site's members
    Count { site: String },
    /// Check whether an authorizable is a member of the site
    IsMember { site: String, id: String },
    /// Sites a user belongs to, with the linking groups
    Membership { user: String },
    /// Find the site a content path belongs to
    FindPath { path: String },
    /// Find a site by name or text
    FindName { name: String },
    /// Show the site's template and skin
    Template { site: String },
    /// Join a user to a site through one of its groups
    Join {
        site: String,
        user: String,
        group: String,
    },
    /// Remove a user from one of the site's groups
    Unjoin {
        site: String,
        user: String,
        group: String,
    },
}

/// Raw paging parameters. Parsed leniently, like request parameters.
#[derive(ClapArgs, Debug)]
struct Paging {
    #[arg(long)]
    start: Option<String>,
    #[arg(long)]
    items: Option<String>,
    /// Sort entry "field[:asc|desc]"; repeatable
    #[arg(long)]
    sort: Vec<String>,
}

impl Paging {
    fn to_query(&self, config: &ServerConfig) -> MembersQuery {
        let mut pairs: Vec<(&str, &str)> = Vec::new();
        if let Some(start) = &self.start {
            pairs.push((PARAM_START, start));
        }
        if let Some(items) = &self.items {
            pairs.push((PARAM_ITEMS, items));
        }
        pairs.extend(self.sort.iter().map(|s| (PARAM_SORT, s.as_str())));
        MembersQuery::from_pairs(pairs, &config.membership)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = if let Some(config_path) = &args.config {
        ServerConfig::load(config_path)?
    } else {
        ServerConfig::from_env()?
    };
    if let Some(fixture) = args.fixture {
        config.store.fixture_path = Some(fixture);
    }
    config.validate()?;

    init_logging(LoggingConfig::from_settings(&config.logging));
    info!(version = env!("CARGO_PKG_VERSION"), "Starting sitegraph");

    let store = match &config.store.fixture_path {
        Some(path) => {
            info!(%path, "Loading fixture into memory store");
            Arc::new(
                MemoryEntityStore::from_path(path)
                    .with_context(|| format!("failed to load fixture {path}"))?,
            )
        }
        None => {
            info!("No fixture configured, using an empty memory store");
            MemoryEntityStore::new_shared()
        }
    };

    let (events, mut receiver) = ChannelEventSink::new();
    let service = Arc::new(SiteService::with_config(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::new(events),
        config.membership.to_membership_config(),
    ));

    let output = run(args.command, &config, &store, &service).await?;

    // Only join/unjoin post events.
    let mut posted = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        posted.push(event);
    }
    let output = if posted.is_empty() {
        output
    } else {
        json!({ "result": output, "events": posted })
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run(
    command: Command,
    config: &ServerConfig,
    store: &Arc<MemoryEntityStore>,
    service: &Arc<Service>,
) -> anyhow::Result<Value> {
    match command {
        Command::Members { site, paging } => {
            let site = load_site(store, &site).await?;
            let handler =
                MembersHandler::new(Arc::clone(service), Arc::clone(store), Arc::clone(store));
            let listing = handler.list(&site, &paging.to_query(config)).await?;
            Ok(serde_json::to_value(listing)?)
        }
        Command::Groups { site, paging } => {
            let site = load_site(store, &site).await?;
            let query = paging.to_query(config);
            let page = service
                .get_groups(&site, query.start, query.items, &query.sorts)
                .await?;
            let total = page.total();
            let partial = page.is_partial();
            let groups: Vec<_> = page.collect();
            Ok(json!({
                "site": site.path,
                "total": total,
                "partial": partial,
                "groups": groups,
            }))
        }
        Command::Count { site } => {
            let site = load_site(store, &site).await?;
            let count = service.get_member_count(&site).await?;
            Ok(json!({
                "site": site.path,
                "count": count.count,
                "partial": count.partial,
            }))
        }
        Command::IsMember { site, id } => {
            let site = load_site(store, &site).await?;
            let member = service
                .is_member(&site, &AuthorizableId::from(id.as_str()))
                .await;
            Ok(json!({ "site": site.path, "id": id, "member": member }))
        }
        Command::Membership { user } => {
            let sites = service
                .get_membership(&AuthorizableId::from(user.as_str()))
                .await?;
            let sites: Vec<Value> = sites
                .into_iter()
                .map(|(path, groups)| json!({ "site": path, "groups": groups }))
                .collect();
            Ok(json!({ "user": user, "sites": sites }))
        }
        Command::FindPath { path } => {
            let site = service.find_site_by_path(&path).await?;
            Ok(serde_json::to_value(site)?)
        }
        Command::FindName { name } => {
            let site = service.find_site_by_name(&name).await?;
            Ok(serde_json::to_value(site)?)
        }
        Command::Template { site } => {
            let site = load_site(store, &site).await?;
            Ok(json!({
                "site": site.path,
                "isTemplate": service.is_site_template(&site),
                "template": service.get_site_template(&site),
                "skin": service.get_site_skin(&site),
            }))
        }
        Command::Join { site, user, group } => {
            let site = load_site(store, &site).await?;
            service
                .join_site(&site, &user.as_str().into(), &group.as_str().into())
                .await?;
            Ok(json!({
                "site": site.path,
                "user": user,
                "group": group,
                "joinable": service.get_joinable(&site).to_string(),
            }))
        }
        Command::Unjoin { site, user, group } => {
            let site = load_site(store, &site).await?;
            service
                .unjoin_site(&site, &user.as_str().into(), &group.as_str().into())
                .await?;
            Ok(json!({ "site": site.path, "user": user, "group": group }))
        }
    }
}

async fn load_site(store: &MemoryEntityStore, path: &str) -> anyhow::Result<ContentNode> {
    store
        .node(path)
        .await?
        .with_context(|| format!("no content node at {path}"))
}
