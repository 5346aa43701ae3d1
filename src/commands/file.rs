use async_trait::async_trait;
use std::path::Path;

use super::{Command, CommandContext, CommandResult};
use crate::files;

pub struct LoadCommand;

#[async_trait]
impl Command for LoadCommand {
    fn name(&self) -> &str {
        "/load"
    }

    fn usage(&self) -> &str {
        "<path>"
    }

    fn description(&self) -> &str {
        "replace the source with a file's contents"
    }

    async fn execute(&self, ctx: &CommandContext<'_>, args: &str) -> CommandResult {
        if args.is_empty() {
            println!("  usage: /load <path>");
            return CommandResult::Handled;
        }
        match files::load_into(ctx.session, Path::new(args)).await {
            Ok(bytes) => println!("  ✓ loaded {args} ({bytes} bytes)"),
            Err(e) => eprintln!("  ✗ {e:#}"),
        }
        CommandResult::Handled
    }
}

pub struct SaveCommand;

#[async_trait]
impl Command for SaveCommand {
    fn name(&self) -> &str {
        "/save"
    }

    fn usage(&self) -> &str {
        "[name]"
    }

    fn description(&self) -> &str {
        "write the source to a file (default code.txt)"
    }

    async fn execute(&self, ctx: &CommandContext<'_>, args: &str) -> CommandResult {
        match files::save_from(ctx.session, args).await {
            Ok(path) => println!("  ✓ saved to {}", path.display()),
            Err(e) => eprintln!("  ✗ {e:#}"),
        }
        CommandResult::Handled
    }
}
