//! Playbooker CLI — playbook → BPMN → diagram wizard.
//!
//! Reuses the same core domain logic (playbooker-core) and server bootstrap
//! (playbooker-server) that back the HTTP API.

mod commands;

use clap::{Args, Parser, Subcommand};
use playbooker_core::config::AgentEndpoints;

/// Playbooker — turn a process description into a playbook, BPMN and a diagram
#[derive(Parser)]
#[command(name = "playbooker", version, about = "Playbooker — playbook, BPMN and diagram wizard")]
pub struct Cli {
    #[command(flatten)]
    agents: AgentArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Webhook URLs of the three agents.
#[derive(Args)]
struct AgentArgs {
    /// Playbook agent webhook URL
    #[arg(long, env = "PLAYBOOK_WEBHOOK_URL", global = true)]
    playbook_url: Option<String>,
    /// BPMN agent webhook URL
    #[arg(long, env = "BPMN_WEBHOOK_URL", global = true)]
    bpmn_url: Option<String>,
    /// Mermaid agent webhook URL
    #[arg(long, env = "MERMAID_WEBHOOK_URL", global = true)]
    mermaid_url: Option<String>,
}

impl From<AgentArgs> for AgentEndpoints {
    fn from(args: AgentArgs) -> Self {
        Self {
            playbook: args.playbook_url,
            bpmn: args.bpmn_url,
            mermaid: args.mermaid_url,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Playbooker HTTP backend server
    Server {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to listen on
        #[arg(long, default_value_t = 3210)]
        port: u16,
    },

    /// Interactive three-phase wizard in the terminal
    Wizard,
}

#[tokio::main]
async fn main() {
    // Before tracing and parsing, so RUST_LOG and env-backed flags see .env values
    let dotenv_files = playbooker_core::config::load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "playbooker_core=warn,playbooker_server=info,playbooker=info".into()),
        )
        .init();
    for path in &dotenv_files {
        tracing::info!("Loaded environment from '{}'", path.display());
    }

    let cli = Cli::parse();
    let endpoints = AgentEndpoints::from(cli.agents);

    let result = match cli.command {
        Some(Commands::Server { host, port }) => commands::server::run(host, port, endpoints).await,
        Some(Commands::Wizard) => {
            let state = commands::init_state(endpoints);
            commands::wizard::run(&state).await
        }
        None => {
            // No subcommand — show help
            use clap::CommandFactory;
            Cli::command().print_help().ok();
            println!();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
