//! Command handlers for the scheduler CLI
//!
//! Each module handles a command group, delegating to `scheduler-client` for API operations.

pub(crate) mod task;

pub(crate) use task::handle_task_command;
