use async_trait::async_trait;

use super::{Command, CommandContext, CommandResult};
use crate::languages::CATALOG;

pub struct LangCommand;

#[async_trait]
impl Command for LangCommand {
    fn name(&self) -> &str {
        "/lang"
    }

    fn usage(&self) -> &str {
        "[id]"
    }

    fn description(&self) -> &str {
        "list languages, or switch (replaces the source with boilerplate)"
    }

    async fn execute(&self, ctx: &CommandContext<'_>, args: &str) -> CommandResult {
        if args.is_empty() {
            let current = ctx.session.language().id;
            for lang in CATALOG {
                let marker = if lang.id == current { " ← current" } else { "" };
                println!("  {:<12} {}{}", lang.id, lang.label, marker);
            }
            return CommandResult::Handled;
        }

        if args == ctx.session.language().id {
            println!("  already using {}", ctx.session.language().label);
            return CommandResult::Handled;
        }

        match ctx.session.select_language(args) {
            Ok(lang) => println!("  ✓ switched to {} (source reset to boilerplate)", lang.label),
            Err(e) => eprintln!("  ✗ {e}"),
        }
        CommandResult::Handled
    }
}
