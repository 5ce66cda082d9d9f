//! Task command handlers for the scheduler CLI

use scheduler_client::models::{
    parse_permissions, resolve_profile, CreateTaskRequest, JobAssignment, Patch, ProfileShortcut,
    RunDescriptor, TaskListing, UpdateTaskRequest,
};
use scheduler_client::{ClientConfig, ClientError, ClientResult, SchedulerApiClient};
use tracing::{debug, info};

use crate::output;
use crate::{CreateTaskArgs, TaskCommands, UpdateTaskArgs};

pub(crate) async fn handle_task_command(
    cmd: TaskCommands,
    config: &ClientConfig,
    verbose: u8,
) -> ClientResult<()> {
    match cmd {
        TaskCommands::List => list(config, verbose).await,
        TaskCommands::Get { task_id } => {
            let client = connect(config)?;
            debug!(%task_id, "Fetching task");
            let task = client
                .get_task(&task_id)
                .await
                .map_err(|e| report_failure(e, &task_id, "fetching"))?;
            output::json(&task);
            Ok(())
        }
        TaskCommands::Create(args) => create(args, config).await,
        TaskCommands::Update(args) => update(args, config).await,
        TaskCommands::Delete { task_id } => {
            let client = connect(config)?;
            debug!(%task_id, "Deleting task");
            let response = client
                .delete_task(&task_id)
                .await
                .map_err(|e| report_failure(e, &task_id, "deleting"))?;
            output::success("Task deleted successfully!");
            if verbose > 0 && !response.is_null() {
                output::json(&response);
            }
            Ok(())
        }
        TaskCommands::Run { task_id } => {
            let client = connect(config)?;
            debug!(%task_id, "Running task");
            let response = client
                .run_task(&task_id)
                .await
                .map_err(|e| report_failure(e, &task_id, "running"))?;
            match RunDescriptor::try_from(&response) {
                Ok(run) => info!(run_id = %run.run_id, task_id = %run.task_id, "Run started"),
                Err(e) => debug!(error = %e, "Run response has no run descriptor"),
            }
            output::success("Task started successfully!");
            output::json(&response);
            Ok(())
        }
        TaskCommands::Enable { task_id } => {
            let client = connect(config)?;
            debug!(%task_id, "Enabling task");
            let task = client
                .enable_task(&task_id)
                .await
                .map_err(|e| report_failure(e, &task_id, "enabling"))?;
            output::success("Task enabled successfully!");
            output::json(&task);
            Ok(())
        }
        TaskCommands::Disable { task_id } => {
            let client = connect(config)?;
            debug!(%task_id, "Disabling task");
            let task = client
                .disable_task(&task_id)
                .await
                .map_err(|e| report_failure(e, &task_id, "disabling"))?;
            output::success("Task disabled successfully!");
            output::json(&task);
            Ok(())
        }
    }
}

/// Build the API client for one command; it is dropped when the command returns.
fn connect(config: &ClientConfig) -> ClientResult<SchedulerApiClient> {
    SchedulerApiClient::new(config.api.clone()).inspect_err(|e| {
        output::error(format!("Invalid API configuration: {e}"));
    })
}

/// Print the user-facing message for a failed task request and hand the error back.
fn report_failure(err: ClientError, task_id: &str, action: &str) -> ClientError {
    if err.is_not_found() {
        output::error(format!("Task '{task_id}' not found"));
    } else {
        output::error(format!("Error {action} task: {err}"));
    }
    err
}

async fn list(config: &ClientConfig, verbose: u8) -> ClientResult<()> {
    let client = connect(config)?;
    debug!("Fetching tasks from API");
    let response = client.list_tasks().await.inspect_err(|e| {
        output::error(format!("Error listing tasks: {e}"));
    })?;

    match TaskListing::from_response(response) {
        TaskListing::Tasks(tasks) => {
            output::plain(output::format_task_table(&tasks));
            if verbose > 0 {
                output::blank();
                output::dim(format!("Total tasks: {}", tasks.len()));
            }
        }
        TaskListing::Unrecognized(value) => {
            output::warning(format!("Unexpected response format: {value}"));
        }
    }
    Ok(())
}

async fn create(args: CreateTaskArgs, config: &ClientConfig) -> ClientResult<()> {
    let conflicting = args.use_zai && args.use_bedrock;
    let request =
        build_create_request(args).inspect_err(|_| output::error(validation_hint(conflicting)))?;

    let client = connect(config)?;
    debug!(name = %request.name, "Creating task");
    let task = client
        .create_task(&request)
        .await
        .inspect_err(|e| output::error(format!("Error creating task: {e}")))?;
    output::success("Task created successfully!");
    output::json(&task);
    Ok(())
}

async fn update(args: UpdateTaskArgs, config: &ClientConfig) -> ClientResult<()> {
    let (task_id, request) = build_update_request(args);
    if request.is_empty() {
        output::plain("No updates specified. Use --help to see available options.");
        return Ok(());
    }

    let client = connect(config)?;
    debug!(%task_id, "Updating task");
    let task = client
        .update_task(&task_id, &request)
        .await
        .map_err(|e| report_failure(e, &task_id, "updating"))?;
    output::success("Task updated successfully!");
    output::json(&task);
    Ok(())
}

fn validation_hint(conflicting_shortcuts: bool) -> String {
    if conflicting_shortcuts {
        format!(
            "Cannot use both {} and {}. Choose one.",
            ProfileShortcut::Zai.flag(),
            ProfileShortcut::Bedrock.flag()
        )
    } else {
        "Profile is required. Use --profile <id>, --zai, or --bedrock.".to_string()
    }
}

/// Empty option values count as not supplied on create.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Collapse an `--on/--off` flag pair into an optional explicit value.
fn toggle(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

fn build_create_request(args: CreateTaskArgs) -> ClientResult<CreateTaskRequest> {
    let profile = resolve_profile(args.profile.as_deref(), args.use_zai, args.use_bedrock)?;

    Ok(CreateTaskRequest {
        name: args.name,
        prompt: args.prompt,
        enabled: args.enabled,
        profile,
        commit_on_success: args.commit_on_success || !args.no_commit_on_success,
        model: non_empty(args.model),
        job_id: non_empty(args.job_id),
        permissions: non_empty(args.permissions).map(|p| parse_permissions(&p)),
    })
}

fn build_update_request(args: UpdateTaskArgs) -> (String, UpdateTaskRequest) {
    let request = UpdateTaskRequest {
        name: args.name.into(),
        prompt: args.prompt.into(),
        model: args.model.into(),
        profile: args.profile.into(),
        job_id: args
            .job_id
            .as_deref()
            .map_or(Patch::Absent, JobAssignment::parse),
        permissions: args.permissions.map(|p| parse_permissions(&p)).into(),
        enabled: toggle(args.enabled, args.disabled).into(),
        commit_on_success: toggle(args.commit_on_success, args.no_commit_on_success).into(),
    };
    (args.task_id, request)
}
