//! Startup banner and session summary display.

use crate::consts::{AUTHOR, HOMEPAGE, REPO};

/// Session configuration for display in the startup banner.
pub struct BannerInfo<'a> {
    pub endpoint: &'a str,
    pub language: &'a str,
    pub test_cases: usize,
    pub layout: &'a str,
    pub store: &'a str,
}

pub fn banner_text(info: &BannerInfo) -> String {
    format!(
        r#"
   ╔═══════════════════════════════════════╗
   ║             C O D E P A D             ║
   ║      write it here, run it there      ║
   ╚═══════════════════════════════════════╝

   version   {}
   by        {}
   home      {}
   repo      {}
   endpoint  {}
   language  {}
   cases     {}
   layout    {}
   state     {}

   type /help for commands
"#,
        env!("CARGO_PKG_VERSION"),
        AUTHOR,
        HOMEPAGE,
        REPO,
        info.endpoint,
        info.language,
        info.test_cases,
        info.layout,
        info.store,
    )
}

/// Print the startup banner with session info.
pub fn print_banner(info: &BannerInfo) {
    println!("{}", banner_text(info));
}

/// Print the farewell line with the number of runs made.
pub fn print_session_summary(runs: usize) {
    if runs > 0 {
        println!("session: {}", crate::consts::pluralize(runs, "run"));
    }
    println!("goodbye.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_lists_session_info() {
        let text = banner_text(&BannerInfo {
            endpoint: "http://localhost:5000/",
            language: "Python",
            test_cases: 1,
            layout: "editor 60% | output 40%",
            store: "ephemeral",
        });
        assert!(text.contains("C O D E P A D"));
        assert!(text.contains("http://localhost:5000/"));
        assert!(text.contains("editor 60% | output 40%"));
        assert!(text.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn print_session_summary_does_not_panic() {
        print_session_summary(0);
        print_session_summary(3);
    }
}
