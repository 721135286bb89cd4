//! Sitegate Report - Main Entry Point
//!
//! Loads the access snapshot from `PostgreSQL` and reports what a principal
//! described on the command line can see and do.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use sg_types::{GroupId, PermissionLevel, Principal};
use tracing::{info, warn};
use uuid::Uuid;

use sg_server::access::{self, AccessError, AccessSnapshot, Navigator};
use sg_server::cache::SnapshotStore;
use sg_server::{config, db, observability};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    principal: PrincipalArgs,

    #[command(subcommand)]
    command: Command,
}

/// Who the report is resolved for.
#[derive(Args, Debug, Default)]
struct PrincipalArgs {
    /// Resolve as an anonymous visitor
    #[arg(long, global = true, conflicts_with_all = ["superuser", "groups"])]
    anonymous: bool,

    /// Resolve as a superuser
    #[arg(long, global = true)]
    superuser: bool,

    /// Group membership of the authenticated principal (repeatable)
    #[arg(long = "group", value_name = "UUID", global = true)]
    groups: Vec<Uuid>,
}

impl PrincipalArgs {
    fn principal(&self) -> Principal {
        let groups = self.groups.iter().copied().map(GroupId);
        if self.anonymous {
            Principal::anonymous()
        } else if self.superuser {
            groups.fold(Principal::superuser(), Principal::with_group)
        } else {
            Principal::authenticated(groups)
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the navigator as JSON
    Nav,
    /// List accessible services
    List {
        /// Only services in this category
        #[arg(long)]
        category: Option<String>,
        /// Minimum level the principal must hold
        #[arg(long, default_value = "access")]
        at_least: PermissionLevel,
    },
    /// Decide whether the principal holds a level on one service
    Check {
        /// Service path (or name with --by-name)
        target: String,
        /// Required level
        required: PermissionLevel,
        /// Treat TARGET as a service name instead of a path
        #[arg(long)]
        by_name: bool,
    },
    /// Reload the snapshot periodically and print the navigator on change
    Watch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum Outcome {
    Allowed,
    NotFound,
    Forbidden,
}

impl Outcome {
    const fn exit_code(self) -> u8 {
        match self {
            Self::Allowed => 0,
            Self::NotFound => 2,
            Self::Forbidden => 3,
        }
    }
}

#[derive(Debug, Serialize)]
struct Decision {
    target: String,
    required: PermissionLevel,
    outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    held: Option<PermissionLevel>,
}

fn decide(
    snapshot: &AccessSnapshot,
    principal: &Principal,
    target: &str,
    required: PermissionLevel,
    by_name: bool,
) -> Decision {
    let result = if by_name {
        access::authorize_name(snapshot, principal, target, required)
    } else {
        access::authorize_path(snapshot, principal, target, required)
    };

    let (outcome, service, held) = match result {
        Ok(service) => (
            Outcome::Allowed,
            Some(snapshot.catalog().qualified_name(service)),
            Some(snapshot.resolver().resolve(principal, service)),
        ),
        Err(AccessError::ServiceNotFound { .. }) => (Outcome::NotFound, None, None),
        Err(AccessError::Forbidden { service, held, .. }) => {
            (Outcome::Forbidden, Some(service), Some(held))
        }
    };

    Decision {
        target: target.to_string(),
        required,
        outcome,
        service,
        held,
    }
}

#[derive(Debug, Serialize)]
struct Listing {
    category: String,
    name: String,
    path: String,
    permission: PermissionLevel,
}

fn list(
    snapshot: &AccessSnapshot,
    principal: &Principal,
    category: Option<&str>,
    at_least: PermissionLevel,
) -> Result<Vec<Listing>> {
    let catalog = snapshot.catalog();
    let category_id = match category {
        Some(name) => Some(
            catalog
                .categories()
                .iter()
                .find(|c| c.name == name)
                .map(|c| c.id)
                .with_context(|| format!("Unknown category '{name}'"))?,
        ),
        None => None,
    };

    let resolver = snapshot.resolver();
    Ok(snapshot
        .accessible()
        .at_least(principal, category_id, at_least)
        .into_iter()
        .map(|service| Listing {
            category: catalog
                .category(service.category_id)
                .map(|c| c.name.clone())
                .unwrap_or_default(),
            name: service.name.clone(),
            path: service.path.clone(),
            permission: resolver.resolve(principal, service),
        })
        .collect())
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize report")?
    );
    Ok(())
}

async fn watch(
    store: &SnapshotStore,
    pool: &sqlx::PgPool,
    principal: &Principal,
    interval: std::time::Duration,
) -> Result<()> {
    let mut ticker = tokio::time::interval(interval);
    // The first tick completes immediately; the initial load already happened
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping watch");
                return Ok(());
            }
        }

        let before = store.generation();
        match store.reload(pool).await {
            Ok(true) => {
                let navigator = Navigator::build(&store.current(), principal);
                info!(
                    generation = store.generation(),
                    links = navigator.link_count(),
                    "Navigator refreshed"
                );
                print_json(&navigator)?;
            }
            Ok(false) => warn!(before, "Reload raced with invalidation, retrying next tick"),
            Err(e) => warn!(error = %e, "Snapshot reload failed, keeping previous snapshot"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;
    observability::init(&config)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting Sitegate report");

    // Initialize database
    let db_pool = db::create_pool(&config.database_url, config.db_max_connections).await?;
    db::run_migrations(&db_pool).await?;

    let store = SnapshotStore::default();
    store
        .reload(&db_pool)
        .await
        .context("Failed to load access snapshot")?;
    let snapshot = store.current();
    let principal = cli.principal.principal();

    match cli.command {
        Command::Nav => print_json(&Navigator::build(&snapshot, &principal))?,
        Command::List {
            category,
            at_least,
        } => print_json(&list(&snapshot, &principal, category.as_deref(), at_least)?)?,
        Command::Check {
            target,
            required,
            by_name,
        } => {
            let decision = decide(&snapshot, &principal, &target, required, by_name);
            print_json(&decision)?;
            return Ok(ExitCode::from(decision.outcome.exit_code()));
        }
        Command::Watch => {
            print_json(&Navigator::build(&snapshot, &principal))?;
            watch(
                &store,
                &db_pool,
                &principal,
                config.snapshot_reload_interval(),
            )
            .await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use sg_types::{Category, GroupServicePermission, Service};

    use super::*;

    fn fixture() -> (AccessSnapshot, GroupId) {
        let editors = GroupId::new();
        let board = Category::new("Board", 0);
        let notice = Service::new(board.id, "Notice", "/notice")
            .with_ceilings(PermissionLevel::Access, PermissionLevel::Read);
        let grant = GroupServicePermission::new(editors, notice.id, PermissionLevel::Edit);
        let snapshot = AccessSnapshot::build(vec![board], vec![notice], vec![grant]).unwrap();
        (snapshot, editors)
    }

    #[test]
    fn test_cli_parses_principal_and_check() {
        let group = Uuid::now_v7();
        let cli = Cli::try_parse_from([
            "sg-report",
            "--group",
            &group.to_string(),
            "check",
            "/notice",
            "write",
        ])
        .unwrap();

        let principal = cli.principal.principal();
        assert!(principal.is_authenticated);
        assert!(principal.is_member_of(GroupId(group)));
        assert!(matches!(
            cli.command,
            Command::Check {
                required: PermissionLevel::Write,
                by_name: false,
                ..
            }
        ));
    }

    #[test]
    fn test_cli_rejects_anonymous_with_groups() {
        let group = Uuid::now_v7().to_string();
        let result = Cli::try_parse_from(["sg-report", "--anonymous", "--group", &group, "nav"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_level() {
        let result = Cli::try_parse_from(["sg-report", "check", "/notice", "admin"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_principal_args() {
        assert_eq!(
            PrincipalArgs {
                anonymous: true,
                ..Default::default()
            }
            .principal(),
            Principal::anonymous()
        );

        let superuser = PrincipalArgs {
            superuser: true,
            ..Default::default()
        }
        .principal();
        assert!(superuser.is_superuser);
        assert!(superuser.is_authenticated);
    }

    #[test]
    fn test_decide_outcomes() {
        let (snapshot, editors) = fixture();
        let member = Principal::authenticated([editors]);

        let allowed = decide(&snapshot, &member, "notice", PermissionLevel::Edit, false);
        assert_eq!(allowed.outcome, Outcome::Allowed);
        assert_eq!(allowed.service.as_deref(), Some("Board/Notice"));
        assert_eq!(allowed.held, Some(PermissionLevel::Edit));

        let forbidden = decide(
            &snapshot,
            &Principal::anonymous(),
            "Notice",
            PermissionLevel::Read,
            true,
        );
        assert_eq!(forbidden.outcome, Outcome::Forbidden);
        assert_eq!(forbidden.held, Some(PermissionLevel::Access));

        let missing = decide(&snapshot, &member, "/wiki", PermissionLevel::Access, false);
        assert_eq!(missing.outcome, Outcome::NotFound);
        assert_eq!(Outcome::NotFound.exit_code(), 2);
    }

    #[test]
    fn test_list_filters_by_category_and_level() {
        let (snapshot, editors) = fixture();
        let member = Principal::authenticated([editors]);

        let rows = list(&snapshot, &member, Some("Board"), PermissionLevel::Write).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].permission, PermissionLevel::Edit);

        let none = list(
            &snapshot,
            &Principal::anonymous(),
            None,
            PermissionLevel::Read,
        )
        .unwrap();
        assert!(none.is_empty());

        assert!(list(&snapshot, &member, Some("Nope"), PermissionLevel::Access).is_err());
    }
}
