//! Backend seam for the `/tasks` REST resource.
//!
//! `TasksApi` is the injectable port the controller talks to; `HttpTasksApi`
//! is the production implementation. The toggle endpoint is pinned to
//! `PATCH /tasks/{id}/toggle` with no body.

use std::time::Duration;

use crate::models::{Task, TaskDraft};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub enum ApiError {
    /// Transport failure, timeout, or undecodable response body.
    Http(reqwest::Error),
    /// The backend answered with a non-success status.
    Status { status: u16, body: String },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Http(err) => write!(f, "http error: {err}"),
            ApiError::Status { status, body } => write!(f, "backend http {status}: {body}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        ApiError::Http(value)
    }
}

#[allow(async_fn_in_trait)]
pub trait TasksApi {
    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError>;
    async fn create_task(&self, draft: &TaskDraft) -> Result<Task, ApiError>;
    async fn update_task(&self, task: &Task) -> Result<Task, ApiError>;
    async fn toggle_task(&self, task_id: &str) -> Result<Task, ApiError>;
    async fn delete_task(&self, task_id: &str) -> Result<(), ApiError>;
}

pub struct HttpTasksApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTasksApi {
    /// `base_url` is the server root, e.g. `http://localhost:8000`; the
    /// `/tasks` resource path is appended here.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/tasks", self.base_url)
    }

    fn task_url(&self, task_id: &str) -> String {
        format!("{}/tasks/{task_id}", self.base_url)
    }

    async fn expect_success(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

impl TasksApi for HttpTasksApi {
    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let resp = self.client.get(self.collection_url()).send().await?;
        Ok(Self::expect_success(resp).await?.json().await?)
    }

    async fn create_task(&self, draft: &TaskDraft) -> Result<Task, ApiError> {
        // The backend assigns the id; a draft is posted with an empty one.
        let payload = serde_json::json!({
            "id": "",
            "title": draft.title,
            "description": draft.description,
            "completed": false,
        });
        let resp = self
            .client
            .post(self.collection_url())
            .json(&payload)
            .send()
            .await?;
        Ok(Self::expect_success(resp).await?.json().await?)
    }

    async fn update_task(&self, task: &Task) -> Result<Task, ApiError> {
        let resp = self
            .client
            .put(self.task_url(&task.id))
            .json(task)
            .send()
            .await?;
        Ok(Self::expect_success(resp).await?.json().await?)
    }

    async fn toggle_task(&self, task_id: &str) -> Result<Task, ApiError> {
        let url = format!("{}/toggle", self.task_url(task_id));
        let resp = self.client.patch(url).send().await?;
        Ok(Self::expect_success(resp).await?.json().await?)
    }

    async fn delete_task(&self, task_id: &str) -> Result<(), ApiError> {
        let resp = self.client.delete(self.task_url(task_id)).send().await?;
        Self::expect_success(resp).await?;
        Ok(())
    }
}
