use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinError;
use tracing::error;

use super::{Command, CommandContext, CommandResult};
use crate::report::print_results;
use crate::session::{RunStatus, Session};
use crate::spinner::Spinner;

/// Ctrl+C stops waiting for a run, not the run. The request settles in the
/// background and `/results` shows its outcome.
pub struct RunCommand;

#[async_trait]
impl Command for RunCommand {
    fn name(&self) -> &str {
        "/run"
    }

    fn aliases(&self) -> &[&str] {
        &["/r"]
    }

    fn description(&self) -> &str {
        "run the code against every test case (Ctrl+C stops waiting)"
    }

    async fn execute(&self, ctx: &CommandContext<'_>, _args: &str) -> CommandResult {
        let spinner = Spinner::start(&format!("running {}", ctx.session.language().label));
        let waited = wait_for_run(ctx.session, async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await;
        spinner.stop().await;

        let status = match waited {
            Ok(Some(status)) => status,
            Ok(None) => {
                println!("\n  still running in the background; /results shows the outcome");
                return CommandResult::Handled;
            }
            Err(e) => {
                error!(error = %e, "run task failed");
                eprintln!("  ✗ run failed: {e}");
                return CommandResult::Handled;
            }
        };

        match &status {
            RunStatus::EmptySource => println!("  nothing to run: the source is empty"),
            RunStatus::AlreadyRunning => println!("  a run is already in progress"),
            RunStatus::Completed(_) => print_results(&ctx.session.results()),
        }
        CommandResult::Ran(status)
    }
}

/// Start a run on its own task and wait for it until `interrupt` fires.
/// `Ok(None)` means the wait was interrupted; the run carries on.
async fn wait_for_run(
    session: &Arc<Session>,
    interrupt: impl Future<Output = ()>,
) -> Result<Option<RunStatus>, JoinError> {
    let handle = tokio::spawn({
        let session = Arc::clone(session);
        async move { session.run().await }
    });
    tokio::select! {
        biased;
        status = handle => status.map(Some),
        _ = interrupt => Ok(None),
    }
}
