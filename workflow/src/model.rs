use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Wire shape of a workflow record as the remote service returns it.
/// The remote schema has no status field; status lives only in [`Task`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRecord {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "dueDate")]
    pub due_date: NaiveDate,
    #[serde(rename = "assignedTo")]
    pub assigned_to: String,
    pub priority: Priority,
    #[serde(default)]
    pub comments: Option<Vec<CommentRecord>>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRecord {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    pub author: String,
    pub text: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `POST /workflow`.
#[derive(Debug, Clone, Serialize)]
pub struct NewTaskInput {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "dueDate")]
    pub due_date: NaiveDate,
    #[serde(rename = "assignedTo")]
    pub assigned_to: String,
    pub priority: Priority,
}

/// Body of `POST /workflow/{id}/comment`.
#[derive(Debug, Clone, Serialize)]
pub struct NewCommentInput {
    pub author: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: Option<String>,
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn from_record(record: CommentRecord) -> Self {
        Self {
            id: record.id,
            author: record.author,
            text: record.text,
            created_at: record.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub assigned_to: String,
    pub priority: Priority,
    pub status: TaskStatus,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}

impl Task {
    /// Maps a remote record to the local view. Status always starts at
    /// Pending because the remote schema does not carry one. A record
    /// without an id gets a millisecond-timestamp id, matching how the
    /// service assigns ids to offline-created tasks.
    pub fn from_record(record: WorkflowRecord, created_by: &str) -> Self {
        let WorkflowRecord {
            id,
            title,
            description,
            due_date,
            assigned_to,
            priority,
            comments,
            created_at,
        } = record;
        Self {
            id: id.unwrap_or_else(local_id),
            title,
            description: description.unwrap_or_default(),
            due_date,
            assigned_to,
            priority,
            status: TaskStatus::Pending,
            comments: comments
                .unwrap_or_default()
                .into_iter()
                .map(Comment::from_record)
                .collect(),
            created_at: created_at.unwrap_or_else(Utc::now),
            created_by: created_by.to_string(),
        }
    }

    /// Human summary of how far the due date is from `today`.
    pub fn due_summary(&self, today: NaiveDate) -> DueSummary {
        let days = (self.due_date - today).num_days();
        if days < 0 {
            DueSummary::Overdue(-days)
        } else if days == 0 {
            DueSummary::DueToday
        } else {
            DueSummary::Remaining(days)
        }
    }
}

fn local_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueSummary {
    Overdue(i64),
    DueToday,
    Remaining(i64),
}

impl fmt::Display for DueSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueSummary::Overdue(days) => write!(f, "{days} days overdue"),
            DueSummary::DueToday => write!(f, "Due today"),
            DueSummary::Remaining(days) => write!(f, "{days} days remaining"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        };
        f.write_str(label)
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(ParseEnumError {
                value: s.to_string(),
                expected: "high, medium, or low",
            }),
        }
    }
}

/// Client-local status. Never serialized to the remote service.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        };
        f.write_str(label)
    }
}

impl FromStr for TaskStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "in-progress" | "in progress" | "inprogress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            _ => Err(ParseEnumError {
                value: s.to_string(),
                expected: "pending, in-progress, or completed",
            }),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unrecognized value `{value}`, expected {expected}")]
pub struct ParseEnumError {
    value: String,
    expected: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(s: &str) -> NaiveDate {
        s.parse().expect("valid date")
    }

    #[test]
    fn maps_record_to_pending_task() {
        let record: WorkflowRecord = serde_json::from_value(serde_json::json!({
            "_id": "t1",
            "title": "Ship",
            "dueDate": "2024-03-01",
            "assignedTo": "Bob",
            "priority": "High",
        }))
        .expect("deserialize record");

        let task = Task::from_record(record, "alice");
        assert_eq!(task.id, "t1");
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.created_by, "alice");
        assert_eq!(task.description, "");
        assert!(task.comments.is_empty());
    }

    #[test]
    fn record_without_id_gets_local_id() {
        let record: WorkflowRecord = serde_json::from_value(serde_json::json!({
            "title": "Draft",
            "dueDate": "2024-04-01",
            "assignedTo": "Eve",
            "priority": "Low",
        }))
        .expect("deserialize record");

        let task = Task::from_record(record, "eve");
        assert!(!task.id.is_empty());
        assert!(task.id.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn comment_record_defaults_timestamp_to_now() {
        let before = Utc::now();
        let comment = Comment::from_record(CommentRecord {
            id: None,
            author: "mike".into(),
            text: "looks good".into(),
            created_at: None,
        });
        assert!(comment.created_at >= before);
        assert!(comment.id.is_none());
    }

    #[test]
    fn due_summary_buckets() {
        let record: WorkflowRecord = serde_json::from_value(serde_json::json!({
            "_id": "t1",
            "title": "Ship",
            "dueDate": "2024-03-10",
            "assignedTo": "Bob",
            "priority": "Medium",
        }))
        .expect("deserialize record");
        let task = Task::from_record(record, "alice");

        assert_eq!(
            task.due_summary(date("2024-03-12")),
            DueSummary::Overdue(2)
        );
        assert_eq!(task.due_summary(date("2024-03-10")), DueSummary::DueToday);
        assert_eq!(
            task.due_summary(date("2024-03-07")),
            DueSummary::Remaining(3)
        );
        assert_eq!(DueSummary::Overdue(2).to_string(), "2 days overdue");
    }

    #[test]
    fn status_and_priority_parse_loosely() {
        assert_eq!(
            "in progress".parse::<TaskStatus>().expect("parse"),
            TaskStatus::InProgress
        );
        assert_eq!(
            "In-Progress".parse::<TaskStatus>().expect("parse"),
            TaskStatus::InProgress
        );
        assert_eq!("HIGH".parse::<Priority>().expect("parse"), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn new_task_input_serializes_wire_names() {
        let input = NewTaskInput {
            title: "Ship".into(),
            description: None,
            due_date: date("2024-03-01"),
            assigned_to: "Bob".into(),
            priority: Priority::High,
        };
        let value = serde_json::to_value(&input).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "title": "Ship",
                "dueDate": "2024-03-01",
                "assignedTo": "Bob",
                "priority": "High",
            })
        );
    }
}
