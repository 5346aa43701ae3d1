//! Terminal rendering of run results.

use crate::classify::classify;
use crate::consts::pluralize;

pub const EMPTY_MESSAGE: &str = "No output yet. Run your code to see results!";

/// Format results as a list of test cases, each with its severity badge.
pub fn render(results: &[String]) -> String {
    let mut out = format!("Output ({})\n", pluralize(results.len(), "result"));
    if results.is_empty() {
        out.push_str(&format!("\n  {EMPTY_MESSAGE}\n"));
        return out;
    }
    for (i, output) in results.iter().enumerate() {
        let severity = classify(output);
        out.push_str(&format!(
            "\n  {} Test Case {}  [{}]\n",
            severity.symbol(),
            i + 1,
            severity.label()
        ));
        for line in output.lines() {
            out.push_str(&format!("    {line}\n"));
        }
    }
    out
}

pub fn print_results(results: &[String]) {
    print!("{}", render(results));
}
