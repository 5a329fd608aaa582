pub mod cli;
pub mod commands;
pub mod pan;

use cli::Cli;
use commands::{Command, Context, Response};
use pan::{Pan115Session, PanError};

/// Validate the request, log in, run one action
pub async fn run(cli: &Cli) -> Result<Response, PanError> {
    let command = Command::parse(
        cli.action.as_deref(),
        cli.path.as_deref(),
        cli.sort.as_deref(),
    )?;

    let config = cli.session_config();
    let ctx = Context {
        user_agent: config.user_agent.clone(),
        list_limit: config.list_limit,
    };

    let session = Pan115Session::connect(config).await?;
    commands::execute(&session, &command, &ctx).await
}
