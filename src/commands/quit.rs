use async_trait::async_trait;

use super::{Command, CommandContext, CommandResult};
use crate::events::PointerEvent;

/// Detaches every window-scope listener before leaving. The line REPL has
/// no key-chord source and never binds the run shortcut; front-ends that
/// call [`crate::session::Session::install_shortcut`] get it unbound here.
pub struct QuitCommand;

#[async_trait]
impl Command for QuitCommand {
    fn name(&self) -> &str {
        "/quit"
    }

    fn aliases(&self) -> &[&str] {
        &["quit", "exit", "/exit"]
    }

    fn description(&self) -> &str {
        "end any drag, unbind the run shortcut, and exit"
    }

    async fn execute(&self, ctx: &CommandContext<'_>, _args: &str) -> CommandResult {
        {
            let mut layout = ctx.layout.lock().unwrap();
            layout.editor.apply(PointerEvent::Cancel);
            layout.output.apply(PointerEvent::Cancel);
        }
        ctx.session.remove_shortcut();
        CommandResult::Quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::Fixture;

    #[tokio::test]
    async fn quit_detaches_listeners() {
        let fx = Fixture::new();
        let ctx = fx.ctx();
        fx.layout
            .lock()
            .unwrap()
            .editor
            .begin_drag(&fx.bus, 10.0, ctx.viewport);
        fx.session.install_shortcut(&fx.bus);
        assert_eq!(fx.bus.listener_count(), 2);

        assert!(matches!(
            QuitCommand.execute(&ctx, "").await,
            CommandResult::Quit
        ));
        assert_eq!(fx.bus.listener_count(), 0);
        assert!(!fx.layout.lock().unwrap().is_dragging());
        assert!(!fx.session.has_shortcut());
    }

    #[test]
    fn exit_words_are_aliases() {
        let aliases = QuitCommand.aliases();
        for word in ["quit", "exit", "/exit"] {
            assert!(aliases.contains(&word));
        }
    }
}
