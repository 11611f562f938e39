// SPDX-FileCopyrightText: 2026 Haku Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Haku - a privacy-aware router between an operator and several LLM engines.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod agent_cmd;
mod commands;
mod output;
mod serve;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{ArgGroup, Args, Parser, Subcommand};
use haku_config::HakuConfig;
use haku_core::{AgentScope, Organ, PrivacyTier, Query};

/// Haku - route each query to the right engine, keep secrets local,
/// and check answers before they reach you.
#[derive(Parser, Debug)]
#[command(name = "haku", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print machine-readable JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Disable colors.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway.
    Serve {
        /// Override `[gateway] host`.
        #[arg(long)]
        host: Option<String>,
        /// Override `[gateway] port`.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Classify, route, invoke and validate one query.
    Ask(QueryArgs),
    /// Show where a query would go without invoking an engine.
    Route(QueryArgs),
    /// Validate a response text (reads stdin when no text is given).
    Validate {
        text: Option<String>,
    },
    /// Ask two perspectives and synthesize them.
    Merge(QueryArgs),
    /// Send a query straight to the Hands organ.
    Exec(QueryArgs),
    /// Send a query straight to the Conscience organ.
    Council(QueryArgs),
    /// Manage custom agent definitions.
    Agent {
        #[command(subcommand)]
        action: AgentCommand,
    },
    /// Inspect configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

/// Arguments shared by every query command.
#[derive(Args, Debug, Clone)]
struct QueryArgs {
    /// The query text.
    message: String,

    /// Declared sensitivity (0-3). Can only raise the detected tier.
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=3))]
    sensitivity: Option<u8>,

    /// Extra context appended to the prompt.
    #[arg(long)]
    context: Option<String>,

    /// Apply agent definitions for this group.
    #[arg(long, conflicts_with = "workstream")]
    group: Option<String>,

    /// Apply agent definitions for this workstream.
    #[arg(long)]
    workstream: Option<String>,
}

impl QueryArgs {
    fn into_query(self) -> Query {
        let mut query = Query::new(self.message);
        query.sensitivity_hint = self.sensitivity.and_then(PrivacyTier::from_level);
        query.context = self.context;
        query.scope = scope_from(self.group, self.workstream);
        query
    }
}

fn scope_from(group: Option<String>, workstream: Option<String>) -> Option<AgentScope> {
    match (workstream, group) {
        (Some(ws), _) => Some(AgentScope::Workstream(ws)),
        (None, Some(group)) => Some(AgentScope::Group(group)),
        (None, None) => None,
    }
}

#[derive(Subcommand, Debug)]
enum AgentCommand {
    /// Create or replace an agent definition.
    #[command(group(ArgGroup::new("scope").required(true).args(["group", "workstream"])))]
    Create {
        /// Agent name (letters, digits, `-` and `_`).
        name: String,
        /// Organ the agent serves.
        #[arg(long)]
        organ: Organ,
        /// Engine id from `[[engines]]`.
        #[arg(long)]
        engine: String,
        /// System prompt replacing `[agent] system_context`.
        #[arg(long)]
        system_prompt: Option<String>,
        #[arg(long)]
        group: Option<String>,
        #[arg(long)]
        workstream: Option<String>,
    },
    /// List agent definitions.
    List,
    /// Show one agent definition.
    Show { name: String },
    /// Delete an agent definition.
    Delete { name: String },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate the configuration.
    Check,
    /// Print the effective configuration as TOML.
    Show,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            haku_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    let out = output::Output::new(cli.json, cli.plain);
    if let Err(e) = run(cli.command, Arc::new(config), out).await {
        tracing::error!(error = %e, "command failed");
        out.error(&e.to_string());
        std::process::exit(1);
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<HakuConfig, Vec<haku_config::ConfigError>> {
    match path {
        Some(path) => haku_config::load_and_validate_path(path),
        None => haku_config::load_and_validate(),
    }
}

async fn run(
    command: Commands,
    config: Arc<HakuConfig>,
    out: output::Output,
) -> Result<(), haku_core::HakuError> {
    match command {
        Commands::Serve { host, port } => serve::run_serve(config, host, port).await,
        Commands::Ask(args) => {
            let pipeline = commands::build_pipeline(config)?;
            commands::run_ask(&pipeline, &args.into_query(), None, out).await
        }
        Commands::Exec(args) => {
            let pipeline = commands::build_pipeline(config)?;
            commands::run_ask(&pipeline, &args.into_query(), Some(Organ::Hands), out).await
        }
        Commands::Council(args) => {
            let pipeline = commands::build_pipeline(config)?;
            commands::run_ask(&pipeline, &args.into_query(), Some(Organ::Conscience), out).await
        }
        Commands::Route(args) => {
            let pipeline = commands::build_pipeline(config)?;
            commands::run_route(&pipeline, &args.into_query(), out).await
        }
        Commands::Merge(args) => {
            let pipeline = commands::build_pipeline(config)?;
            commands::run_merge(&pipeline, &args.into_query(), out).await
        }
        Commands::Validate { text } => {
            let pipeline = commands::build_pipeline(config)?;
            let text = match text {
                Some(text) => text,
                None => std::io::read_to_string(std::io::stdin())?,
            };
            commands::run_validate(&pipeline, &text, out);
            Ok(())
        }
        Commands::Agent { action } => {
            let store = agent_cmd::store_for(&config);
            match action {
                AgentCommand::Create {
                    name,
                    organ,
                    engine,
                    system_prompt,
                    group,
                    workstream,
                } => {
                    let scope = scope_from(group, workstream).ok_or_else(|| {
                        haku_core::HakuError::Agent {
                            message: "an agent needs --group or --workstream".to_string(),
                            source: None,
                        }
                    })?;
                    let definition = haku_core::AgentDefinition {
                        name,
                        organ,
                        engine,
                        system_prompt,
                        scope,
                    };
                    agent_cmd::create(&store, &config, definition, out).await
                }
                AgentCommand::List => agent_cmd::list(&store, out).await,
                AgentCommand::Show { name } => agent_cmd::show(&store, &name, out).await,
                AgentCommand::Delete { name } => agent_cmd::delete(&store, &name, out).await,
            }
        }
        Commands::Config { action } => match action {
            ConfigCommand::Check => {
                commands::run_config_check(&config, out);
                Ok(())
            }
            ConfigCommand::Show => commands::run_config_show(&config),
        },
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` wins over `[agent] log_level`.
///
/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("haku={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
