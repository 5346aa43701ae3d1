use async_trait::async_trait;
use std::io;

use super::{Command, CommandContext, CommandResult};
use crate::input::LineSource;

/// Line that ends multi-line input.
const TERMINATOR: &str = ".";

/// Reads the new source from the REPL's own input, so piped scripts work.
pub struct EditCommand;

#[async_trait]
impl Command for EditCommand {
    fn name(&self) -> &str {
        "/edit"
    }

    fn description(&self) -> &str {
        "replace the source; end input with a line containing only `.`"
    }

    async fn execute(&self, ctx: &CommandContext<'_>, _args: &str) -> CommandResult {
        println!("  enter source, finish with `{TERMINATOR}` on its own line:");
        let mut input = ctx.input.lock().await;
        let body = tokio::select! {
            body = read_until_terminator(&mut **input) => body,
            _ = tokio::signal::ctrl_c() => {
                println!("\n  edit abandoned; source unchanged");
                return CommandResult::Handled;
            }
        };

        match body {
            Ok(Some(code)) => {
                let lines = code.lines().count();
                ctx.session.set_code(code);
                println!("  ✓ source replaced ({lines} lines)");
            }
            Ok(None) => println!("  ✗ input ended before `{TERMINATOR}`; source unchanged"),
            Err(e) => eprintln!("  ✗ failed to read input: {e}"),
        }
        CommandResult::Handled
    }
}

/// Collect lines up to the terminator. `None` if input ends first.
async fn read_until_terminator(source: &mut dyn LineSource) -> io::Result<Option<String>> {
    let mut lines = Vec::new();
    while let Some(line) = source.next_line().await? {
        if line == TERMINATOR {
            return Ok(Some(lines.join("\n")));
        }
        lines.push(line);
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::Fixture;
    use tokio::io::AsyncBufReadExt;

    async fn read(text: &'static str) -> Option<String> {
        let mut source = text.as_bytes().lines();
        read_until_terminator(&mut source).await.unwrap()
    }

    #[tokio::test]
    async fn stops_at_terminator() {
        assert_eq!(
            read("a = 1\nprint(a)\n.\nignored\n").await.as_deref(),
            Some("a = 1\nprint(a)")
        );
    }

    #[tokio::test]
    async fn eof_before_terminator_is_none() {
        assert_eq!(read("x\ny").await, None);
        assert_eq!(read("").await, None);
    }

    #[tokio::test]
    async fn indented_dot_is_content() {
        assert_eq!(read("  .\n.\n").await.as_deref(), Some("  ."));
    }

    #[tokio::test]
    async fn body_comes_from_repl_input() {
        let fx = Fixture::with_input("print(123)\n.\n/code\n");
        EditCommand.execute(&fx.ctx(), "").await;
        assert_eq!(fx.session.code(), "print(123)");
        assert_eq!(fx.session.saved_code(), "print(123)");

        // Lines after the terminator are left for the prompt.
        let next = fx.input.lock().await.next_line().await.unwrap();
        assert_eq!(next.as_deref(), Some("/code"));
    }

    #[tokio::test]
    async fn truncated_input_keeps_source() {
        let fx = Fixture::with_input("half a program\n");
        fx.session.set_code("original");
        EditCommand.execute(&fx.ctx(), "").await;
        assert_eq!(fx.session.code(), "original");
        assert_eq!(fx.session.saved_code(), "original");
    }
}
