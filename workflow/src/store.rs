use crate::client::ApiError;
use crate::client::WorkflowClient;
use crate::model::Comment;
use crate::model::NewCommentInput;
use crate::model::NewTaskInput;
use crate::model::Task;
use crate::model::TaskStatus;
use chrono::Utc;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Remote(String),
}

/// Authoritative local view of tasks for the active session.
///
/// Every remote-backed mutation is strictly remote-then-local: the list is
/// only touched once the call is known to have succeeded, so there is never
/// anything to roll back. Concurrent mutations against one task are not
/// coordinated; the last completed call wins. `update_status` is the one
/// deliberate exception to the remote round-trip — the remote schema has no
/// status field, so status is a purely local mutation.
#[derive(Debug)]
pub struct TaskStore {
    client: WorkflowClient,
    user: String,
    tasks: Vec<Task>,
    selected: Option<Task>,
    loading: bool,
    last_error: Option<String>,
}

impl TaskStore {
    pub fn new(client: WorkflowClient, user: impl Into<String>) -> Self {
        Self {
            client,
            user: user.into(),
            tasks: Vec::new(),
            selected: None,
            loading: false,
            last_error: None,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub fn selected(&self) -> Option<&Task> {
        self.selected.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Replaces the local list wholesale with the remote one. On failure the
    /// previous list is left untouched; a failed refresh never clears data.
    pub async fn load(&mut self) -> Result<(), StoreError> {
        self.loading = true;
        let records = match self.client.list_tasks().await {
            Ok(records) => records,
            Err(err) => {
                self.loading = false;
                return Err(self.record_failure("failed to load workflows", err));
            }
        };
        self.tasks = records
            .into_iter()
            .map(|record| Task::from_record(record, &self.user))
            .collect();
        self.loading = false;
        self.last_error = None;
        Ok(())
    }

    /// Creates a task remotely and appends the server's returned record to
    /// the local list. The list is unchanged when the remote call fails.
    pub async fn create(&mut self, input: NewTaskInput) -> Result<&Task, StoreError> {
        let record = match self.client.create_task(&input).await {
            Ok(record) => record,
            Err(err) => return Err(self.record_failure("failed to create workflow", err)),
        };
        self.tasks.push(Task::from_record(record, &self.user));
        self.last_error = None;
        Ok(self.tasks.last().expect("task appended above"))
    }

    /// Adds a comment authored by the active session. The comment appended
    /// locally prefers the id and timestamp the server echoed back; when the
    /// server omits them the local creation time stands in. Mirrored into
    /// the selection when it points at the same task.
    pub async fn add_comment(&mut self, task_id: &str, text: &str) -> Result<(), StoreError> {
        let input = NewCommentInput {
            author: self.user.clone(),
            text: text.to_string(),
        };
        let record = match self.client.add_comment(task_id, &input).await {
            Ok(record) => record,
            Err(err) => return Err(self.record_failure("failed to add comment", err)),
        };
        let comment = record
            .comments
            .unwrap_or_default()
            .pop()
            .map(Comment::from_record)
            .filter(|comment| comment.text == text)
            .unwrap_or_else(|| Comment {
                id: None,
                author: input.author,
                text: input.text,
                created_at: Utc::now(),
            });
        if let Some(task) = self.tasks.iter_mut().find(|task| task.id == task_id) {
            task.comments.push(comment.clone());
        }
        if let Some(selected) = self.selected.as_mut().filter(|task| task.id == task_id) {
            selected.comments.push(comment);
        }
        self.last_error = None;
        Ok(())
    }

    /// Local-only status change; no remote call is made because the remote
    /// schema has nowhere to store it. Returns false when the id is unknown.
    pub fn update_status(&mut self, task_id: &str, status: TaskStatus) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == task_id) else {
            warn!("status update for unknown task {task_id}");
            return false;
        };
        task.status = status;
        if let Some(selected) = self.selected.as_mut().filter(|task| task.id == task_id) {
            selected.status = status;
        }
        true
    }

    /// Deletes the task remotely, then removes it locally and clears the
    /// selection when it pointed at the deleted task.
    pub async fn delete(&mut self, task_id: &str) -> Result<(), StoreError> {
        if let Err(err) = self.client.delete_task(task_id).await {
            return Err(self.record_failure("failed to delete workflow", err));
        }
        self.tasks.retain(|task| task.id != task_id);
        if self
            .selected
            .as_ref()
            .is_some_and(|task| task.id == task_id)
        {
            self.selected = None;
        }
        self.last_error = None;
        Ok(())
    }

    /// Mirrors the matching task into the selection slot.
    pub fn select(&mut self, task_id: &str) -> Option<&Task> {
        self.selected = self.task(task_id).cloned();
        self.selected.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    fn record_failure(&mut self, action: &str, err: ApiError) -> StoreError {
        let message = format!("{action}: {err}");
        self.last_error = Some(message.clone());
        StoreError::Remote(message)
    }
}
