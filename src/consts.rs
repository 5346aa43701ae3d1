//! Project-wide constants.

use std::path::PathBuf;

pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
pub const HOMEPAGE: &str = env!("CARGO_PKG_HOMEPAGE");
pub const REPO: &str = env!("CARGO_PKG_REPOSITORY");

/// Execution endpoint used when none is configured. Local development only.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/";

/// Shared credential used when none is configured. Local development only.
pub const DEFAULT_API_KEY: &str = "default-secret-key";

/// Request timeout for the execution service, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Test-case count bounds (inclusive).
pub const MIN_TEST_CASES: usize = 1;
pub const MAX_TEST_CASES: usize = 10;

/// Resize extent bounds, in percent (inclusive).
pub const MIN_EXTENT: f64 = 20.0;
pub const MAX_EXTENT: f64 = 80.0;

/// Initial editor width and output height, in percent.
pub const DEFAULT_EDITOR_WIDTH: f64 = 60.0;
pub const DEFAULT_OUTPUT_HEIGHT: f64 = 40.0;

/// Persisted key for the last edited source text.
pub const CODE_KEY: &str = "userCode";

/// Persisted key for the last selected language.
pub const LANGUAGE_KEY: &str = "userLanguage";

/// File name used by `/save` when none is given.
pub const DEFAULT_SAVE_NAME: &str = "code.txt";

/// Default database path: `~/.codepad/codepad.db`.
pub fn default_db_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".codepad")
        .join("codepad.db")
}

/// `"1 result"` / `"3 results"`.
pub fn pluralize(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}
