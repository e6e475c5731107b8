//! Command-line surface.
//!
//! `serve` runs the proxy. `sections ...` drives a [`SectionManager`] against
//! the section service (or a running proxy via `--api-url .../api`): load,
//! run one operation, print notices to stderr and results to stdout.

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing::info;

use crate::config::{AppConfig, ConfigError};
use crate::manager::{ManagerError, ManagerOptions, Notice, NoticeLevel, SectionManager};
use crate::preview::render_preview;
use crate::registry::templates;
use crate::repo::RepoError;
use crate::repo::http::HttpSectionRepository;
use crate::routes::{self, ProxyState};
use crate::section::{ListFilter, OrderBy, Section, SectionConfig};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Manager(#[from] ManagerError),
    #[error("invalid --config JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("--config must be a JSON object")]
    ConfigNotObject,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "homepage-admin", about = "Homepage section admin console")]
pub struct Cli {
    /// Section API base URL; defaults to `BACKEND_URL`.
    #[arg(long, env = "HOMEPAGE_API_URL")]
    pub api_url: Option<String>,

    /// Sent as `Authorization: Bearer <token>`.
    #[arg(long, env = "HOMEPAGE_AUTH_TOKEN")]
    pub auth_token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the API proxy and preview pages.
    Serve,
    Sections(SectionsCommand),
}

#[derive(Args, Debug)]
pub struct SectionsCommand {
    #[command(subcommand)]
    pub command: SectionsSubcommand,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum SectionsSubcommand {
    List {
        /// Ask the service for enabled sections only.
        #[arg(long)]
        enabled_only: bool,
        /// Server-side sort: `order`, `name` or `createdAt`.
        #[arg(long, value_parser = parse_order_by)]
        order_by: Option<OrderBy>,
    },
    Templates,
    Add {
        template_id: String,
    },
    Remove {
        id: String,
    },
    Toggle {
        id: String,
    },
    Reorder {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        config: String,
    },
    Reset,
    /// Print the code a save would write.
    Generate,
    Save,
    Preview {
        /// Apply a preview-only config change to this section first.
        #[arg(long, requires = "config")]
        edit: Option<String>,
        #[arg(long, requires = "edit")]
        config: Option<String>,
    },
}

/// Run a parsed command line.
///
/// # Errors
///
/// Returns [`CliError`] for bad configuration or input, or when the
/// operation fails.
pub async fn run(cli: Cli) -> Result<(), CliError> {
    let config = AppConfig::from_env()?;
    match cli.command {
        Command::Serve => serve(&config).await,
        Command::Sections(sections) => {
            let base_url = cli.api_url.unwrap_or_else(|| config.backend_url.clone());
            let authorization = cli.auth_token.map(|token| format!("Bearer {token}"));
            let repo = HttpSectionRepository::new(&base_url, authorization.as_deref(), config.timeouts)?;
            let options =
                ManagerOptions { homepage_file_path: config.homepage_file_path.clone(), reorder_mode: config.reorder_mode };
            let mut manager = SectionManager::new(Arc::new(repo), options);

            let result = execute(&mut manager, sections.command).await;
            print_notices(&manager.drain_notices());
            result
        }
    }
}

async fn serve(config: &AppConfig) -> Result<(), CliError> {
    let app = routes::app(ProxyState::new(config)?);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    info!(port = config.port, backend = %config.backend_url, "homepage admin listening");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Load the manager (unless the command needs no sections) and run one
/// subcommand against it.
pub(crate) async fn execute(manager: &mut SectionManager, command: SectionsSubcommand) -> Result<(), CliError> {
    if command != SectionsSubcommand::Templates {
        manager.load().await?;
    }

    match command {
        SectionsSubcommand::List { enabled_only, order_by } => {
            if enabled_only || order_by.is_some() {
                let filter = ListFilter { enabled: enabled_only.then_some(true), order_by };
                print_sections(&manager.fetch(filter).await?);
            } else {
                print_sections(manager.sections());
                eprintln!("{} of {} sections enabled", manager.enabled_count(), manager.sections().len());
            }
        }
        SectionsSubcommand::Templates => {
            for template in templates() {
                println!("{:<8} {:<16} {}", template.template_id, template.component_name, template.display_name);
            }
        }
        SectionsSubcommand::Add { template_id } => {
            let created = manager.add(&template_id).await?;
            println!("{}", created.id);
        }
        SectionsSubcommand::Remove { id } => {
            manager.remove(&id).await?;
            print_sections(manager.sections());
        }
        SectionsSubcommand::Toggle { id } => {
            manager.toggle(&id).await?;
            print_sections(manager.sections());
        }
        SectionsSubcommand::Reorder { ids } => {
            manager.reorder(&ids).await?;
            print_sections(manager.sections());
        }
        SectionsSubcommand::Update { id, config } => {
            manager.update(&id, parse_config(&config)?).await?;
            print_sections(manager.sections());
        }
        SectionsSubcommand::Reset => {
            manager.reset_to_default().await?;
            print_sections(manager.sections());
        }
        SectionsSubcommand::Generate => {
            eprintln!("Sections to be saved:");
            for entry in manager.save_summary() {
                eprintln!("  {}. {} ({}) [{}]", entry.position, entry.name, entry.component, entry.configured_keys.join(", "));
            }
            println!("{}", manager.generated_code());
        }
        SectionsSubcommand::Save => {
            let outcome = manager.save().await?;
            println!("{}", outcome.message);
            if outcome.reload_required {
                eprintln!("Reload the site to show the new homepage.");
            }
        }
        SectionsSubcommand::Preview { edit, config } => {
            if let (Some(id), Some(raw)) = (edit, config) {
                manager.preview_only(&id, parse_config(&raw)?)?;
            }
            print!("{}", render_preview(manager.preview_sections()));
        }
    }
    if manager.is_dirty() {
        eprintln!("Homepage file is out of date; run `sections save` to regenerate it.");
    }
    Ok(())
}

fn parse_order_by(raw: &str) -> Result<OrderBy, String> {
    match raw {
        "order" => Ok(OrderBy::Order),
        "name" => Ok(OrderBy::Name),
        "createdAt" => Ok(OrderBy::CreatedAt),
        other => Err(format!("unknown sort key '{other}'")),
    }
}

/// Parse a `--config` argument into a section config object.
pub(crate) fn parse_config(raw: &str) -> Result<SectionConfig, CliError> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => Ok(map),
        _ => Err(CliError::ConfigNotObject),
    }
}

fn print_sections(sections: &[Section]) {
    for section in sections {
        let state = if section.enabled { "on" } else { "off" };
        println!("{:>3}  {:<3}  {:<36}  {:<16}  {}", section.order, state, section.id, section.component, section.name);
    }
}

pub(crate) fn format_notice(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Success => "ok",
        NoticeLevel::Error => "error",
    };
    match &notice.description {
        Some(description) => format!("[{tag}] {}: {description}", notice.message),
        None => format!("[{tag}] {}", notice.message),
    }
}

fn print_notices(notices: &[Notice]) {
    for notice in notices {
        eprintln!("{}", format_notice(notice));
    }
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
