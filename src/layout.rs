//! Drag-to-resize layout engine.
//!
//! Two independent [`AxisResizeController`]s own the layout geometry: the
//! horizontal split between editor and the right-hand panel, and the
//! vertical split between controls and output. Each turns a pointer drag
//! into a percentage clamped to `[MIN_EXTENT, MAX_EXTENT]`.
//!
//! A drag listens on the [`EventBus`], not on the handle, so the pointer may
//! wander anywhere while the gesture is live. The subscription lives inside
//! the `Dragging` state and is dropped on release, cancel, blur, restart, or
//! when the controller itself is dropped.

use std::fmt;

use tokio::sync::broadcast;

use crate::consts::{DEFAULT_EDITOR_WIDTH, DEFAULT_OUTPUT_HEIGHT, MAX_EXTENT, MIN_EXTENT};
use crate::events::{Event, EventBus, PointerEvent, drain};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Width; grows with rightward drag.
    Horizontal,
    /// Height of the region below the handle; grows with upward drag.
    Vertical,
}

impl Axis {
    fn coordinate(self, x: f64, y: f64) -> f64 {
        match self {
            Axis::Horizontal => x,
            Axis::Vertical => y,
        }
    }

    fn direction(self) -> f64 {
        match self {
            Axis::Horizontal => 1.0,
            Axis::Vertical => -1.0,
        }
    }
}

/// A clamped percentage.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Extent(f64);

impl Extent {
    /// Clamp `percent` into range. NaN clamps to the lower bound.
    pub fn new(percent: f64) -> Self {
        if percent.is_nan() {
            return Self(MIN_EXTENT);
        }
        Self(percent.clamp(MIN_EXTENT, MAX_EXTENT))
    }

    pub fn percent(self) -> f64 {
        self.0
    }

    /// This extent's share of `total` cells, rounded down.
    pub fn cells(self, total: u16) -> u16 {
        ((f64::from(total) * self.0) / 100.0).floor() as u16
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = (self.0 * 100.0).round() / 100.0;
        write!(f, "{rounded}%")
    }
}

/// Viewport size in the same units as pointer coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn span(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }
}

/// New extent after moving the pointer `delta` units along `axis`, starting
/// from `start`, in a viewport `span` units long.
pub fn resize(axis: Axis, start: Extent, delta: f64, span: f64) -> Extent {
    if !(span.is_finite() && span > 0.0 && delta.is_finite()) {
        return start;
    }
    Extent::new(start.percent() + axis.direction() * (delta / span) * 100.0)
}

struct Drag {
    start_coordinate: f64,
    start_extent: Extent,
    span: f64,
    listener: broadcast::Receiver<Event>,
}

/// One-axis resize state machine: Idle, or Dragging with a live listener.
pub struct AxisResizeController {
    axis: Axis,
    extent: Extent,
    drag: Option<Drag>,
}

impl AxisResizeController {
    pub fn new(axis: Axis, initial_percent: f64) -> Self {
        Self {
            axis,
            extent: Extent::new(initial_percent),
            drag: None,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Enter Dragging at `start` (the pointer coordinate on this axis).
    /// A drag already in progress is abandoned and restarted from here.
    pub fn begin_drag(&mut self, bus: &EventBus, start: f64, viewport: Viewport) {
        self.drag = None;
        self.drag = Some(Drag {
            start_coordinate: start,
            start_extent: self.extent,
            span: viewport.span(self.axis),
            listener: bus.subscribe(),
        });
    }

    /// Apply every pointer event queued since the last pump.
    /// Returns true if the extent changed.
    pub fn pump(&mut self) -> bool {
        let events = match self.drag.as_mut() {
            Some(drag) => drain(&mut drag.listener),
            None => return false,
        };
        let before = self.extent;
        for event in events {
            if let Event::Pointer(pointer) = event {
                self.apply(pointer);
            }
            if self.drag.is_none() {
                break;
            }
        }
        self.extent != before
    }

    /// Feed one pointer signal. Ignored while Idle.
    pub fn apply(&mut self, event: PointerEvent) {
        let Some(drag) = self.drag.as_ref() else {
            return;
        };
        match event {
            PointerEvent::Move { x, y } => {
                let delta = self.axis.coordinate(x, y) - drag.start_coordinate;
                self.extent = resize(self.axis, drag.start_extent, delta, drag.span);
            }
            PointerEvent::Release | PointerEvent::Cancel | PointerEvent::Blur => {
                self.drag = None;
            }
        }
    }
}

/// The two splits of the workspace.
pub struct Layout {
    pub editor: AxisResizeController,
    pub output: AxisResizeController,
}

impl Layout {
    pub fn new() -> Self {
        Self {
            editor: AxisResizeController::new(Axis::Horizontal, DEFAULT_EDITOR_WIDTH),
            output: AxisResizeController::new(Axis::Vertical, DEFAULT_OUTPUT_HEIGHT),
        }
    }

    /// Pump both controllers. Returns true if either extent changed.
    pub fn pump(&mut self) -> bool {
        let editor = self.editor.pump();
        let output = self.output.pump();
        editor || output
    }

    pub fn is_dragging(&self) -> bool {
        self.editor.is_dragging() || self.output.is_dragging()
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}
