use async_trait::async_trait;

use super::{Command, CommandContext, CommandResult};
use crate::events::{Event, PointerEvent};
use crate::layout::Axis;

pub struct LayoutCommand;

#[async_trait]
impl Command for LayoutCommand {
    fn name(&self) -> &str {
        "/layout"
    }

    fn description(&self) -> &str {
        "show the editor and output split sizes"
    }

    async fn execute(&self, ctx: &CommandContext<'_>, _args: &str) -> CommandResult {
        let layout = ctx.layout.lock().unwrap();
        let cols = ctx.viewport.width as u16;
        let rows = ctx.viewport.height as u16;
        let editor = layout.editor.extent();
        let output = layout.output.extent();
        println!("  editor  {:>7}  ({} of {cols} cols)", editor.to_string(), editor.cells(cols));
        println!("  output  {:>7}  ({} of {rows} rows)", output.to_string(), output.cells(rows));
        CommandResult::Handled
    }
}

/// Replays a full drag gesture (press, move, release) through the event bus.
pub struct DragCommand;

#[async_trait]
impl Command for DragCommand {
    fn name(&self) -> &str {
        "/drag"
    }

    fn usage(&self) -> &str {
        "<editor|output> <from> <to>"
    }

    fn description(&self) -> &str {
        "drag a split handle between two cell positions"
    }

    async fn execute(&self, ctx: &CommandContext<'_>, args: &str) -> CommandResult {
        let Some((axis, from, to)) = parse_drag(args) else {
            println!("  usage: /drag <editor|output> <from> <to>");
            return CommandResult::Handled;
        };

        let mut layout = ctx.layout.lock().unwrap();
        let controller = match axis {
            Axis::Horizontal => &mut layout.editor,
            Axis::Vertical => &mut layout.output,
        };
        controller.begin_drag(ctx.bus, from, ctx.viewport);

        let pointer = match axis {
            Axis::Horizontal => PointerEvent::Move { x: to, y: 0.0 },
            Axis::Vertical => PointerEvent::Move { x: 0.0, y: to },
        };
        ctx.bus.emit(Event::Pointer(pointer));
        ctx.bus.emit(Event::Pointer(PointerEvent::Release));
        layout.pump();

        println!(
            "  editor {} | output {}",
            layout.editor.extent(),
            layout.output.extent()
        );
        CommandResult::Handled
    }
}

fn parse_drag(args: &str) -> Option<(Axis, f64, f64)> {
    let mut parts = args.split_whitespace();
    let axis = match parts.next()? {
        "editor" => Axis::Horizontal,
        "output" => Axis::Vertical,
        _ => return None,
    };
    let from = parts.next()?.parse().ok()?;
    let to = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((axis, from, to))
}
