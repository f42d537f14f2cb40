use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use chrono::Local;
use chrono::NaiveDate;
use clap::Args;
use clap::Subcommand;
use lumantra_workflow::NewTaskInput;
use lumantra_workflow::Priority;
use lumantra_workflow::SessionStore;
use lumantra_workflow::Task;
use lumantra_workflow::TaskStatus;
use lumantra_workflow::TaskStore;
use lumantra_workflow::WorkflowClient;
use std::io::Write;
use textwrap::wrap;

#[derive(Debug, Subcommand)]
pub enum TasksCommand {
    /// Sign in against the credential directory and persist the session.
    Login(LoginArgs),
    /// Clear the persisted session.
    Logout,
    /// Print the signed-in username, if any.
    Whoami,
    /// Fetch and render the workflow task list.
    List(ListArgs),
    /// Render a single task with its comment thread.
    Show(ShowArgs),
    /// Create a new workflow task.
    Create(CreateArgs),
    /// Add a comment to a task.
    Comment(CommentArgs),
    /// Change a task's status (tracked locally, never sent to the service).
    Status(StatusArgs),
    /// Delete a task.
    Delete(DeleteArgs),
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username from the credential directory.
    pub username: String,

    /// Password; prompted on stdin when omitted.
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Emit the task list as JSON instead of the card view.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Task identifier.
    pub id: String,

    /// Emit the task as JSON instead of the detail view.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub description: Option<String>,

    /// Due date, YYYY-MM-DD.
    #[arg(long, value_name = "DATE")]
    pub due: NaiveDate,

    /// Assignee display name.
    #[arg(long = "assign", value_name = "NAME")]
    pub assigned_to: String,

    #[arg(long, default_value = "medium")]
    pub priority: Priority,
}

#[derive(Debug, Args)]
pub struct CommentArgs {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Args)]
pub struct StatusArgs {
    pub id: String,
    /// One of pending, in-progress, completed.
    pub status: TaskStatus,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub id: String,
}

pub async fn execute(command: TasksCommand, base_url: &str) -> Result<()> {
    let mut session = SessionStore::restore(SessionStore::default_storage_path())?;

    match command {
        TasksCommand::Login(args) => login(&mut session, args),
        TasksCommand::Logout => {
            session.sign_out()?;
            println!("Signed out.");
            Ok(())
        }
        TasksCommand::Whoami => {
            match session.current_user() {
                Some(user) => println!("{user}"),
                None => println!("Not signed in."),
            }
            Ok(())
        }
        command => {
            let Some(user) = session.current_user() else {
                bail!("Not signed in. Run `lumantra login <username>` first.");
            };
            let mut store = TaskStore::new(WorkflowClient::new(base_url), user);
            run_task_command(&mut store, command).await
        }
    }
}

fn login(session: &mut SessionStore, args: LoginArgs) -> Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => prompt_password()?,
    };
    session.sign_in(&args.username, &password)?;
    println!("Signed in as {}.", args.username);
    Ok(())
}

fn prompt_password() -> Result<String> {
    print!("Password: ");
    std::io::stdout().flush().context("flush stdout")?;
    let mut password = String::new();
    std::io::stdin()
        .read_line(&mut password)
        .context("read password from stdin")?;
    Ok(password.trim_end_matches(['\r', '\n']).to_string())
}

async fn run_task_command(store: &mut TaskStore, command: TasksCommand) -> Result<()> {
    store.load().await.context("load workflow tasks")?;

    match command {
        TasksCommand::List(args) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(store.tasks())?);
            } else {
                print_task_list(store.tasks());
            }
            Ok(())
        }
        TasksCommand::Show(args) => {
            let Some(task) = store.select(&args.id) else {
                bail!("no task with id {}", args.id);
            };
            if args.json {
                println!("{}", serde_json::to_string_pretty(task)?);
            } else {
                print_task_detail(task);
            }
            Ok(())
        }
        TasksCommand::Create(args) => {
            let input = validate_create(args)?;
            let task = store.create(input).await.context("create workflow task")?;
            println!("Created task {}.", task.id);
            print_task_detail(task);
            Ok(())
        }
        TasksCommand::Comment(args) => {
            if args.text.trim().is_empty() {
                bail!("comment text must not be empty");
            }
            let _ = store.select(&args.id);
            store
                .add_comment(&args.id, &args.text)
                .await
                .context("add comment")?;
            match store.selected() {
                Some(task) => print_task_detail(task),
                None => println!("Comment added to task {}.", args.id),
            }
            Ok(())
        }
        TasksCommand::Status(args) => {
            if !store.update_status(&args.id, args.status) {
                bail!("no task with id {}", args.id);
            }
            if let Some(task) = store.task(&args.id) {
                print_task_detail(task);
            }
            println!("Note: status lives in this client only; the service does not track it.");
            Ok(())
        }
        TasksCommand::Delete(args) => {
            store.delete(&args.id).await.context("delete workflow task")?;
            println!("Deleted task {}.", args.id);
            Ok(())
        }
        TasksCommand::Login(_) | TasksCommand::Logout | TasksCommand::Whoami => {
            unreachable!("session commands handled before loading the store")
        }
    }
}

/// Required-field validation happens here, before anything reaches the
/// store: title, due date, and assignee must be non-empty.
fn validate_create(args: CreateArgs) -> Result<NewTaskInput> {
    let title = args.title.trim();
    if title.is_empty() {
        bail!("--title must not be empty");
    }
    let assigned_to = args.assigned_to.trim();
    if assigned_to.is_empty() {
        bail!("--assign must not be empty");
    }
    Ok(NewTaskInput {
        title: title.to_string(),
        description: args
            .description
            .filter(|description| !description.trim().is_empty()),
        due_date: args.due,
        assigned_to: assigned_to.to_string(),
        priority: args.priority,
    })
}

fn print_task_list(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No workflows yet.");
        println!("Create your first workflow to get started with task management.");
        return;
    }

    println!("Active Workflows ({} total tasks)", tasks.len());
    let today = Local::now().date_naive();
    for task in tasks {
        println!();
        println!("- [{}] [{}] {}  ({})", task.priority, task.status, task.title, task.id);
        for line in wrap(&task.description, 72) {
            println!("    {line}");
        }
        println!(
            "    assigned: {}    due: {} ({})",
            task.assigned_to,
            task.due_date,
            task.due_summary(today)
        );
        println!(
            "    comments: {}    by {}",
            task.comments.len(),
            task.created_by
        );
    }
}

fn print_task_detail(task: &Task) {
    let today = Local::now().date_naive();
    println!("{}  ({})", task.title, task.id);
    println!("Priority: {}    Status: {}", task.priority, task.status);
    println!(
        "Assigned: {}    Due: {} ({})",
        task.assigned_to,
        task.due_date,
        task.due_summary(today)
    );
    println!(
        "Created: {} by {}",
        task.created_at.format("%Y-%m-%d %H:%M UTC"),
        task.created_by
    );
    if !task.description.is_empty() {
        println!();
        for line in wrap(&task.description, 80) {
            println!("{line}");
        }
    }
    println!();
    if task.comments.is_empty() {
        println!("No comments.");
    } else {
        println!("Comments ({}):", task.comments.len());
        for comment in &task.comments {
            println!(
                "- [{}] {}: {}",
                comment.created_at.format("%Y-%m-%d %H:%M"),
                comment.author,
                comment.text
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn create_args(title: &str, assignee: &str) -> CreateArgs {
        CreateArgs {
            title: title.to_string(),
            description: Some("  ".to_string()),
            due: "2024-03-01".parse().expect("date"),
            assigned_to: assignee.to_string(),
            priority: Priority::Medium,
        }
    }

    #[test]
    fn create_requires_non_empty_title_and_assignee() {
        assert!(validate_create(create_args("  ", "Bob")).is_err());
        assert!(validate_create(create_args("Ship", "  ")).is_err());

        let input = validate_create(create_args(" Ship ", " Bob ")).expect("valid");
        assert_eq!(input.title, "Ship");
        assert_eq!(input.assigned_to, "Bob");
        // Whitespace-only descriptions are dropped rather than sent.
        assert_eq!(input.description, None);
    }
}
