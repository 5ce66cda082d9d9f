//! REST client for the scheduler `tasks` resource.
//!
//! One client is built per command invocation and dropped when the command
//! returns; the underlying connection pool goes with it. Requests are never
//! retried.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::ApiConfig;
use crate::error::{ClientError, ClientResult};
use crate::models::task::{CreateTaskRequest, UpdateTaskRequest};

const BODY_PREVIEW_LIMIT: usize = 512;
const TASKS_PATH: [&str; 2] = ["api", "tasks"];

/// HTTP client for the scheduler API.
#[derive(Debug)]
pub struct SchedulerApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl SchedulerApiClient {
    pub fn new(config: ApiConfig) -> ClientResult<Self> {
        config.validate()?;
        let base_url = config.parsed_base_url()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { http, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, each encoded as a single segment.
    pub fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ClientError::config_error(format!(
                    "API base URL cannot carry a path: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `/api/tasks/{id}[/{action}]`.
    fn task_url(&self, task_id: &str, action: Option<&str>) -> ClientResult<Url> {
        if matches!(task_id, "" | "." | "..") {
            return Err(ClientError::invalid_input(format!(
                "Task ID '{task_id}' is not a valid path segment"
            )));
        }
        self.endpoint(TASKS_PATH.into_iter().chain([task_id]).chain(action))
    }

    async fn send(&self, method: Method, url: &Url, request: RequestBuilder) -> ClientResult<Value> {
        debug!(%method, %url, "Sending request");
        let response = request.send().await?;
        debug!(%method, path = url.path(), status = %response.status(), "Received response");
        parse_json_response(response).await
    }

    pub async fn get(&self, url: Url) -> ClientResult<Value> {
        let request = self.http.get(url.clone());
        self.send(Method::GET, &url, request).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: Option<&B>,
    ) -> ClientResult<Value> {
        let mut request = self.http.post(url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(Method::POST, &url, request).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, url: Url, body: &B) -> ClientResult<Value> {
        let request = self.http.put(url.clone()).json(body);
        self.send(Method::PUT, &url, request).await
    }

    pub async fn delete(&self, url: Url) -> ClientResult<Value> {
        let request = self.http.delete(url.clone());
        self.send(Method::DELETE, &url, request).await
    }

    // ===================================================================================
    // TASK OPERATIONS
    // ===================================================================================

    /// `GET /api/tasks`. The raw body is returned; see
    /// [`TaskListing`](crate::models::task::TaskListing) for shape handling.
    pub async fn list_tasks(&self) -> ClientResult<Value> {
        self.get(self.endpoint(TASKS_PATH)?).await
    }

    pub async fn get_task(&self, task_id: &str) -> ClientResult<Value> {
        self.get(self.task_url(task_id, None)?).await
    }

    pub async fn create_task(&self, request: &CreateTaskRequest) -> ClientResult<Value> {
        self.post(self.endpoint(TASKS_PATH)?, Some(request)).await
    }

    pub async fn update_task(
        &self,
        task_id: &str,
        request: &UpdateTaskRequest,
    ) -> ClientResult<Value> {
        self.put(self.task_url(task_id, None)?, request).await
    }

    /// `DELETE /api/tasks/{id}`. Returns `Value::Null` when the server sends no body.
    pub async fn delete_task(&self, task_id: &str) -> ClientResult<Value> {
        self.delete(self.task_url(task_id, None)?).await
    }

    pub async fn run_task(&self, task_id: &str) -> ClientResult<Value> {
        self.post::<Value>(self.task_url(task_id, Some("run"))?, None)
            .await
    }

    pub async fn enable_task(&self, task_id: &str) -> ClientResult<Value> {
        self.post::<Value>(self.task_url(task_id, Some("enable"))?, None)
            .await
    }

    pub async fn disable_task(&self, task_id: &str) -> ClientResult<Value> {
        self.post::<Value>(self.task_url(task_id, Some("disable"))?, None)
            .await
    }
}

async fn parse_json_response(response: Response) -> ClientResult<Value> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ClientError::api_error(status.as_u16(), error_message(&body)));
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    Ok(serde_json::from_str(&body)?)
}

/// Pull a human-readable message out of an error body.
fn error_message(body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["error", "detail", "message"] {
            if let Some(Value::String(msg)) = map.get(key) {
                return msg.clone();
            }
        }
    }
    preview_body(body)
}

fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    let mut out: String = trimmed.chars().take(BODY_PREVIEW_LIMIT).collect();
    if trimmed.chars().count() > BODY_PREVIEW_LIMIT {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::Patch;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn client_for(server: &mockito::ServerGuard) -> SchedulerApiClient {
        SchedulerApiClient::new(ApiConfig {
            base_url: server.url(),
            timeout_ms: 1_000,
        })
        .unwrap()
    }

    #[test]
    fn test_preview_body_empty() {
        assert_eq!(preview_body("   "), "<empty body>");
    }

    #[test]
    fn test_preview_body_truncates() {
        let body = "a".repeat(BODY_PREVIEW_LIMIT + 10);
        let preview = preview_body(&body);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), BODY_PREVIEW_LIMIT + 3);
    }

    #[test]
    fn test_error_message_prefers_json_fields() {
        assert_eq!(error_message(r#"{"error":"Task not found"}"#), "Task not found");
        assert_eq!(error_message(r#"{"detail":"bad profile"}"#), "bad profile");
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message(r#"{"code":7}"#), r#"{"code":7}"#);
    }

    fn offline_client(base_url: &str) -> SchedulerApiClient {
        SchedulerApiClient::new(ApiConfig {
            base_url: base_url.to_string(),
            timeout_ms: 1_000,
        })
        .unwrap()
    }

    #[test]
    fn test_task_path_encodes_id() {
        let client = offline_client("http://localhost:5679");
        assert_eq!(
            client.task_url("abc-123", None).unwrap().path(),
            "/api/tasks/abc-123"
        );
        assert_eq!(
            client.task_url("a/b c", Some("run")).unwrap().path(),
            "/api/tasks/a%2Fb%20c/run"
        );
    }

    #[test]
    fn test_task_url_rejects_dot_segments() {
        let client = offline_client("http://localhost:5679");
        for id in ["", ".", ".."] {
            let err = client.task_url(id, None).unwrap_err();
            assert!(matches!(err, ClientError::InvalidInput(_)), "{id:?}");
        }
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        for base_url in ["not a url", "http://", "ftp://files.example"] {
            let err = SchedulerApiClient::new(ApiConfig {
                base_url: base_url.to_string(),
                timeout_ms: 1_000,
            })
            .unwrap_err();
            assert!(matches!(err, ClientError::ConfigError(_)), "{base_url}");
        }
    }

    #[test]
    fn test_endpoint_ignores_trailing_slash() {
        let client = offline_client("http://localhost:5679/");
        assert_eq!(
            client.endpoint(TASKS_PATH).unwrap().as_str(),
            "http://localhost:5679/api/tasks"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let client = offline_client("https://gateway.example/scheduler/");
        assert_eq!(
            client.task_url("t1", Some("enable")).unwrap().as_str(),
            "https://gateway.example/scheduler/api/tasks/t1/enable"
        );
    }

    #[tokio::test]
    async fn test_list_tasks_returns_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/tasks")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"tasks":[{"id":"t1"}]}"#)
            .create_async()
            .await;

        let value = client_for(&server).list_tasks().await.unwrap();
        assert_eq!(value, json!({ "tasks": [{ "id": "t1" }] }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_task_not_found() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/tasks/missing")
            .with_status(404)
            .with_body(r#"{"error":"Task not found"}"#)
            .create_async()
            .await;

        let err = client_for(&server).get_task("missing").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "API error: 404 - Task not found");
    }

    #[tokio::test]
    async fn test_update_task_sends_partial_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/api/tasks/t1")
            .match_body(Matcher::Json(json!({ "job_id": null })))
            .with_status(200)
            .with_body(r#"{"id":"t1","job_id":null}"#)
            .create_async()
            .await;

        let request = UpdateTaskRequest {
            job_id: Patch::Null,
            ..Default::default()
        };
        client_for(&server).update_task("t1", &request).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_task_accepts_empty_body() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("DELETE", "/api/tasks/t1")
            .with_status(204)
            .create_async()
            .await;

        let value = client_for(&server).delete_task("t1").await.unwrap();
        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn test_action_endpoints_post_without_body() {
        let mut server = Server::new_async().await;
        let run = server
            .mock("POST", "/api/tasks/t1/run")
            .with_status(200)
            .with_body(r#"{"run_id":"r1","task_id":"t1","status":"running"}"#)
            .create_async()
            .await;
        let enable = server
            .mock("POST", "/api/tasks/t1/enable")
            .with_status(200)
            .with_body(r#"{"id":"t1","enabled":true}"#)
            .create_async()
            .await;
        let disable = server
            .mock("POST", "/api/tasks/t1/disable")
            .with_status(200)
            .with_body(r#"{"id":"t1","enabled":false}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        assert_eq!(client.run_task("t1").await.unwrap()["run_id"], "r1");
        assert_eq!(client.enable_task("t1").await.unwrap()["enabled"], true);
        assert_eq!(client.disable_task("t1").await.unwrap()["enabled"], false);
        run.assert_async().await;
        enable.assert_async().await;
        disable.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_is_generic_api_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/api/tasks")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let request = CreateTaskRequest {
            name: "n".to_string(),
            prompt: "p".to_string(),
            enabled: true,
            profile: "prof".to_string(),
            commit_on_success: true,
            model: None,
            job_id: None,
            permissions: None,
        };
        let err = client_for(&server).create_task(&request).await.unwrap_err();
        assert!(!err.is_not_found());
        assert_eq!(err.status_code(), Some(500));
        assert_eq!(err.to_string(), "API error: 500 - boom");
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_serialization_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/tasks/t1")
            .with_status(200)
            .with_body("<html>")
            .create_async()
            .await;

        let err = client_for(&server).get_task("t1").await.unwrap_err();
        assert!(matches!(err, ClientError::SerializationError(_)));
    }
}
