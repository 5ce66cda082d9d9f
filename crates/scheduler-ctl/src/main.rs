//! Scheduler CLI
//!
//! Command-line client for the task scheduler service. Every command maps to
//! one REST call against the `tasks` resource; scheduling and execution happen
//! server-side.

mod commands;
mod output;

use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand};
use scheduler_client::config::ENV_API_URL;
use scheduler_client::ClientConfig;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "scheduler-ctl", version, about, styles = output::clap_styles())]
struct Cli {
    /// Base URL of the scheduler API
    #[arg(long, global = true, env = ENV_API_URL, value_name = "URL")]
    api_url: Option<String>,

    /// Enable verbose output (repeat for more detail)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage scheduler tasks
    #[command(subcommand)]
    Tasks(TaskCommands),
}

#[derive(Debug, Subcommand)]
pub(crate) enum TaskCommands {
    /// List all tasks in a table
    List,
    /// Show a task as JSON
    Get {
        /// ID of the task to retrieve
        task_id: String,
    },
    /// Create a new task
    ///
    /// The working directory is inherited from the assigned job.
    Create(CreateTaskArgs),
    /// Update an existing task; only the given options are changed
    Update(UpdateTaskArgs),
    /// Delete a task
    Delete {
        /// ID of the task to delete
        task_id: String,
    },
    /// Run a task immediately
    Run {
        /// ID of the task to run
        task_id: String,
    },
    /// Enable a task
    Enable {
        /// ID of the task to enable
        task_id: String,
    },
    /// Disable a task
    Disable {
        /// ID of the task to disable
        task_id: String,
    },
}

#[derive(Debug, Args)]
pub(crate) struct CreateTaskArgs {
    /// Task name
    #[arg(long)]
    pub name: String,

    /// The prompt text to execute
    #[arg(long)]
    pub prompt: String,

    /// Model to use (server default when omitted)
    #[arg(long)]
    pub model: Option<String>,

    /// Environment profile ID
    #[arg(long)]
    pub profile: Option<String>,

    /// Use the ZAI profile (shortcut)
    #[arg(long = "zai")]
    pub use_zai: bool,

    /// Use the Bedrock profile (shortcut)
    #[arg(long = "bedrock")]
    pub use_bedrock: bool,

    /// Job ID to assign the task to (inherits working directory)
    #[arg(long = "job", value_name = "JOB_ID")]
    pub job_id: Option<String>,

    /// Task permissions (comma-separated)
    #[arg(long)]
    pub permissions: Option<String>,

    /// Enable task (default: enabled)
    #[arg(long, default_value_t = true)]
    pub enabled: bool,

    /// Commit changes on successful execution (default)
    #[arg(long, overrides_with = "no_commit_on_success")]
    pub commit_on_success: bool,

    /// Do not commit changes on successful execution
    #[arg(long, overrides_with = "commit_on_success")]
    pub no_commit_on_success: bool,
}

#[derive(Debug, Args)]
pub(crate) struct UpdateTaskArgs {
    /// ID of the task to update
    pub task_id: String,

    /// New task name
    #[arg(long)]
    pub name: Option<String>,

    /// New prompt text
    #[arg(long)]
    pub prompt: Option<String>,

    /// New model
    #[arg(long)]
    pub model: Option<String>,

    /// New environment profile ID
    #[arg(long)]
    pub profile: Option<String>,

    /// Assign to job (use 'none' to unassign)
    #[arg(long = "job", value_name = "JOB_ID")]
    pub job_id: Option<String>,

    /// New permissions (comma-separated)
    #[arg(long)]
    pub permissions: Option<String>,

    /// Enable the task
    #[arg(long, overrides_with = "disabled")]
    pub enabled: bool,

    /// Disable the task
    #[arg(long, overrides_with = "enabled")]
    pub disabled: bool,

    /// Commit changes on successful execution
    #[arg(long, overrides_with = "no_commit_on_success")]
    pub commit_on_success: bool,

    /// Do not commit changes on successful execution
    #[arg(long, overrides_with = "commit_on_success")]
    pub no_commit_on_success: bool,
}

/// Map the `-v` count to a log filter. `RUST_LOG` wins when set.
fn init_tracing(verbose: u8) {
    let directives = match verbose {
        0 => "warn".to_string(),
        1 => "warn,scheduler_ctl=info,scheduler_client=info".to_string(),
        2 => "warn,scheduler_ctl=debug,scheduler_client=debug".to_string(),
        _ => "trace".to_string(),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose > 2)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ClientConfig::load().with_base_url(cli.api_url);
    tracing::debug!(base_url = %config.api.base_url, "Resolved API configuration");

    let result = match cli.command {
        Commands::Tasks(cmd) => commands::handle_task_command(cmd, &config, cli.verbose).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(format!("Error: {e}"));
            ExitCode::FAILURE
        }
    }
}
