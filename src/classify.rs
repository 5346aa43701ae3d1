//! Severity heuristic for free-form program output.
//!
//! The execution service has no per-test-case status, so severity is
//! sniffed from the text: "error"/"failed" mean Error, "warning"/"import"
//! mean Warning, anything else is Success. Matching is case-insensitive and
//! the first bucket that matches wins. Ordinary output that happens to
//! contain a keyword (`import numpy as np`) is flagged too; keep the
//! keyword list and order as is, front-ends depend on it.

use std::fmt;

const ERROR_KEYWORDS: &[&str] = &["error", "failed"];
const WARNING_KEYWORDS: &[&str] = &["warning", "import"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Success,
}

impl Severity {
    /// Badge text shown next to each test case.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Success => "SUCCESS",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Severity::Error => "✗",
            Severity::Warning => "!",
            Severity::Success => "✓",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn classify(output: &str) -> Severity {
    let lower = output.to_lowercase();
    if ERROR_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Severity::Error
    } else if WARNING_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Severity::Warning
    } else {
        Severity::Success
    }
}
