use crate::model::NewCommentInput;
use crate::model::NewTaskInput;
use crate::model::WorkflowRecord;
use reqwest::Method;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;
use tracing::error;

pub const DEFAULT_API_BASE: &str = "https://lumantra-backend-4.onrender.com/api";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to workflow service failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("workflow service returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Thin client for the remote workflow service. One method per endpoint,
/// one HTTP request per call. No batching, retries, or de-duplication;
/// a failed call surfaces immediately and the caller decides what to do.
#[derive(Debug, Clone)]
pub struct WorkflowClient {
    http: reqwest::Client,
    base_url: String,
}

impl WorkflowClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_tasks(&self) -> Result<Vec<WorkflowRecord>, ApiError> {
        self.request(Method::GET, "/workflow", None).await
    }

    pub async fn create_task(&self, input: &NewTaskInput) -> Result<WorkflowRecord, ApiError> {
        let body = serde_json::to_value(input)?;
        self.request(Method::POST, "/workflow", Some(body)).await
    }

    pub async fn fetch_task(&self, id: &str) -> Result<WorkflowRecord, ApiError> {
        self.request(Method::GET, &format!("/workflow/{id}"), None)
            .await
    }

    pub async fn update_task(
        &self,
        id: &str,
        updates: &serde_json::Value,
    ) -> Result<WorkflowRecord, ApiError> {
        self.request(Method::PUT, &format!("/workflow/{id}"), Some(updates.clone()))
            .await
    }

    pub async fn delete_task(&self, id: &str) -> Result<(), ApiError> {
        // DELETE returns no body; only the status matters.
        self.send(Method::DELETE, &format!("/workflow/{id}"), None)
            .await?;
        Ok(())
    }

    pub async fn add_comment(
        &self,
        task_id: &str,
        comment: &NewCommentInput,
    ) -> Result<WorkflowRecord, ApiError> {
        let body = serde_json::to_value(comment)?;
        self.request(
            Method::POST,
            &format!("/workflow/{task_id}/comment"),
            Some(body),
        )
        .await
    }

    pub async fn delete_comment(
        &self,
        task_id: &str,
        comment_id: &str,
    ) -> Result<WorkflowRecord, ApiError> {
        self.request(
            Method::DELETE,
            &format!("/workflow/{task_id}/comment/{comment_id}"),
            None,
        )
        .await
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        let response = self.send(method, endpoint, body).await?;
        Ok(response.json().await?)
    }

    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}{endpoint}", self.base_url);
        debug!("{method} {url}");
        let mut request = self.http.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                error!("{method} {endpoint} failed: {err}");
                return Err(err.into());
            }
        };
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("{method} {endpoint} failed with {status}: {body}");
            return Err(ApiError::Status { status, body });
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_normalized() {
        let client = WorkflowClient::new("https://example.test/api/");
        assert_eq!(client.base_url(), "https://example.test/api");
    }

    #[test]
    fn status_error_includes_body() {
        let err = ApiError::Status {
            status: StatusCode::NOT_FOUND,
            body: "no such workflow".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("404"));
        assert!(message.contains("no such workflow"));
    }
}
