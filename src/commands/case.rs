use async_trait::async_trait;

use super::{Command, CommandContext, CommandResult, parse_index};
use crate::consts::{MAX_TEST_CASES, MIN_TEST_CASES};

pub struct CaseCommand;

const USAGE: &str = "usage: /case [list | add | rm <n> | set <n> <text>]";

#[async_trait]
impl Command for CaseCommand {
    fn name(&self) -> &str {
        "/case"
    }

    fn usage(&self) -> &str {
        "[list|add|rm n|set n text]"
    }

    fn description(&self) -> &str {
        "manage test-case inputs (`\\n` in text is a newline)"
    }

    async fn execute(&self, ctx: &CommandContext<'_>, args: &str) -> CommandResult {
        let (sub, rest) = match args.split_once(char::is_whitespace) {
            Some((sub, rest)) => (sub, rest.trim_start()),
            None => (args, ""),
        };
        let session = ctx.session;

        match sub {
            "" | "list" => {}
            "add" => {
                if !session.add_test_case() {
                    println!("  ✗ at most {MAX_TEST_CASES} test cases");
                }
            }
            "rm" => match parse_index(rest) {
                Some(i) if session.remove_test_case(i) => {}
                Some(_) => println!("  ✗ no such test case, or only {MIN_TEST_CASES} left"),
                None => println!("  {USAGE}"),
            },
            "set" => {
                let (index, text) = rest.split_once(' ').unwrap_or((rest, ""));
                match parse_index(index) {
                    Some(i) if session.set_test_case(i, unescape(text)) => {}
                    Some(_) => println!("  ✗ no such test case"),
                    None => println!("  {USAGE}"),
                }
            }
            _ => {
                println!("  {USAGE}");
                return CommandResult::Handled;
            }
        }

        for (i, input) in session.test_cases().iter().enumerate() {
            let shown = if input.is_empty() {
                "(empty)".to_string()
            } else {
                input.replace('\n', "\\n")
            };
            println!("  Test Case {}: {shown}", i + 1);
        }
        CommandResult::Handled
    }
}

/// Turn the two-character sequences `\n` and `\t` into real whitespace.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
