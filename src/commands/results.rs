use async_trait::async_trait;

use super::{Command, CommandContext, CommandResult};
use crate::report::print_results;

pub struct ResultsCommand;

#[async_trait]
impl Command for ResultsCommand {
    fn name(&self) -> &str {
        "/results"
    }

    fn description(&self) -> &str {
        "show the output of the last run"
    }

    async fn execute(&self, ctx: &CommandContext<'_>, _args: &str) -> CommandResult {
        if ctx.session.is_running() {
            println!("  running...");
        } else {
            print_results(&ctx.session.results());
        }
        CommandResult::Handled
    }
}
