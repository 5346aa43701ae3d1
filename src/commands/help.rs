use async_trait::async_trait;

use super::{Command, CommandContext, CommandResult};

/// Listing is done by the registry itself; see [`super::CommandRegistry::dispatch`].
pub struct HelpCommand;

#[async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &str {
        "/help"
    }

    fn aliases(&self) -> &[&str] {
        &["/h", "/?"]
    }

    fn description(&self) -> &str {
        "show this help"
    }

    async fn execute(&self, _ctx: &CommandContext<'_>, _args: &str) -> CommandResult {
        CommandResult::Handled
    }
}
