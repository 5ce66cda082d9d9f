//! Wire models for the scheduler API.

pub mod task;

pub use task::{
    parse_permissions, resolve_profile, CreateTaskRequest, JobAssignment, Patch,
    ProfileShortcut, RunDescriptor, TaskListing, TaskSummary, UpdateTaskRequest,
};
