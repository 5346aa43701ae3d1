use async_trait::async_trait;

use super::{Command, CommandContext, CommandResult};

pub struct CodeCommand;

#[async_trait]
impl Command for CodeCommand {
    fn name(&self) -> &str {
        "/code"
    }

    fn description(&self) -> &str {
        "print the current source"
    }

    async fn execute(&self, ctx: &CommandContext<'_>, _args: &str) -> CommandResult {
        let language = ctx.session.language();
        println!("  [{}, mode {}]", language.label, language.mode);
        print!("{}", numbered(&ctx.session.code()));
        CommandResult::Handled
    }
}

fn numbered(code: &str) -> String {
    let lines: Vec<&str> = code.lines().collect();
    let width = lines.len().to_string().len();
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        out.push_str(&format!("  {:>width$} │ {line}\n", i + 1));
    }
    out
}
