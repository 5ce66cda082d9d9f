//! Task wire models and request payload construction.
//!
//! Tasks are owned by the scheduler service. These types only describe what
//! the client sends and the subset of the response it needs for display.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::{ClientError, ClientResult};

/// Well-known execution profiles selectable by a shortcut flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileShortcut {
    Zai,
    Bedrock,
}

impl ProfileShortcut {
    /// Fixed server-side profile identifier for this shortcut.
    #[must_use]
    pub const fn profile_id(self) -> &'static str {
        match self {
            Self::Zai => "5270805b-3731-41da-8710-fe765f2e58be",
            Self::Bedrock => "9e4eaa7d-ba4e-44c0-861a-712aa75382d1",
        }
    }

    /// Command-line flag that selects this shortcut.
    #[must_use]
    pub const fn flag(self) -> &'static str {
        match self {
            Self::Zai => "--zai",
            Self::Bedrock => "--bedrock",
        }
    }
}

impl std::fmt::Display for ProfileShortcut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Zai => write!(f, "zai"),
            Self::Bedrock => write!(f, "bedrock"),
        }
    }
}

/// Resolve the profile for a new task from `--profile` and the shortcut flags.
///
/// Shortcuts win over an explicit profile. Both shortcuts together is an
/// error, as is ending up with no profile at all.
pub fn resolve_profile(
    explicit: Option<&str>,
    use_zai: bool,
    use_bedrock: bool,
) -> ClientResult<String> {
    let shortcut = match (use_zai, use_bedrock) {
        (true, true) => return Err(ClientError::invalid_input("Conflicting profile options")),
        (true, false) => Some(ProfileShortcut::Zai),
        (false, true) => Some(ProfileShortcut::Bedrock),
        (false, false) => None,
    };

    if let Some(shortcut) = shortcut {
        tracing::debug!(
            profile = shortcut.profile_id(),
            "Using {} profile shortcut",
            shortcut
        );
        return Ok(shortcut.profile_id().to_string());
    }

    match explicit {
        Some(profile) if !profile.is_empty() => Ok(profile.to_string()),
        _ => Err(ClientError::invalid_input("Profile is required")),
    }
}

/// Split a comma-separated permission list, trimming each entry.
#[must_use]
pub fn parse_permissions(raw: &str) -> Vec<String> {
    raw.split(',').map(|p| p.trim().to_string()).collect()
}

/// A field in a partial update.
///
/// `Absent` fields are left out of the payload entirely so the server keeps
/// its current value; `Null` is sent as an explicit JSON `null` to clear it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Self::Value)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => v.serialize(serializer),
            // Absent is skipped at the field level; serializing it anyway is a null.
            Self::Absent | Self::Null => serializer.serialize_none(),
        }
    }
}

/// Job reference given on the command line.
#[derive(Debug)]
pub struct JobAssignment;

impl JobAssignment {
    /// `none` in any case clears the job; anything else assigns that job id.
    #[must_use]
    pub fn parse(raw: &str) -> Patch<String> {
        if raw.eq_ignore_ascii_case("none") {
            Patch::Null
        } else {
            Patch::Value(raw.to_string())
        }
    }
}

/// Body of `POST /api/tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTaskRequest {
    pub name: String,
    pub prompt: String,
    pub enabled: bool,
    pub profile: String,
    pub commit_on_success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

/// Body of `PUT /api/tasks/{id}`; only supplied fields are serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateTaskRequest {
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub name: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub prompt: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub model: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub profile: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub job_id: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub permissions: Patch<Vec<String>>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub enabled: Patch<bool>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    pub commit_on_success: Patch<bool>,
}

impl UpdateTaskRequest {
    /// True when no field was supplied and there is nothing to send.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_absent()
            && self.prompt.is_absent()
            && self.model.is_absent()
            && self.profile.is_absent()
            && self.job_id.is_absent()
            && self.permissions.is_absent()
            && self.enabled.is_absent()
            && self.commit_on_success.is_absent()
    }
}

/// Display view of a task as returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TaskSummary {
    pub id: Option<String>,
    pub name: Option<String>,
    pub enabled: Option<bool>,
    pub model: Option<String>,
    pub commit_on_success: Option<bool>,
    pub last_run_status: Option<String>,
}

/// Result of interpreting a `GET /api/tasks` response.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskListing {
    Tasks(Vec<TaskSummary>),
    /// Response did not match a known shape; kept verbatim for reporting.
    Unrecognized(Value),
}

impl TaskListing {
    /// Accept `{"tasks": [...]}` first, then a bare array.
    ///
    /// The array is decoded as a whole: a single entry with a mistyped field
    /// makes the entire response `Unrecognized`.
    #[must_use]
    pub fn from_response(response: Value) -> Self {
        let candidate = match &response {
            Value::Object(map) => map.get("tasks").filter(|t| t.is_array()),
            Value::Array(_) => Some(&response),
            _ => None,
        };

        match candidate
            .cloned()
            .map(serde_json::from_value::<Vec<TaskSummary>>)
        {
            Some(Ok(tasks)) => Self::Tasks(tasks),
            Some(Err(e)) => {
                tracing::debug!(error = %e, "Task list entries did not match the task shape");
                Self::Unrecognized(response)
            }
            None => Self::Unrecognized(response),
        }
    }
}

/// Response of `POST /api/tasks/{id}/run`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunDescriptor {
    pub run_id: String,
    pub task_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
}

impl TryFrom<&Value> for RunDescriptor {
    type Error = ClientError;

    fn try_from(value: &Value) -> ClientResult<Self> {
        if !value.is_object() {
            return Err(ClientError::invalid_response("run", "expected a JSON object"));
        }
        serde_json::from_value(value.clone())
            .map_err(|e| ClientError::invalid_response("run", e.to_string()))
    }
}
