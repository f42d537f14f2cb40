mod tasks_cmd;

use anyhow::Result;
use clap::Parser;
use lumantra_workflow::DEFAULT_API_BASE;
use tasks_cmd::TasksCommand;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "lumantra", about = "Lumantra workflow management client")]
struct Cli {
    /// Base URL of the remote workflow service.
    #[arg(
        long = "base-url",
        value_name = "URL",
        env = "LUMANTRA_API_BASE",
        default_value = DEFAULT_API_BASE,
        global = true
    )]
    base_url: String,

    #[command(subcommand)]
    command: TasksCommand,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tasks_cmd::execute(cli.command, &cli.base_url).await
}
