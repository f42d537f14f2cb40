mod client;
mod model;
mod session;
mod store;

pub use client::ApiError;
pub use client::DEFAULT_API_BASE;
pub use client::WorkflowClient;
pub use model::Comment;
pub use model::CommentRecord;
pub use model::DueSummary;
pub use model::NewCommentInput;
pub use model::NewTaskInput;
pub use model::ParseEnumError;
pub use model::Priority;
pub use model::Task;
pub use model::TaskStatus;
pub use model::WorkflowRecord;
pub use session::SessionError;
pub use session::SessionStore;
pub use store::StoreError;
pub use store::TaskStore;
