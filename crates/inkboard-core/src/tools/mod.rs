//! Tool selection and per-gesture interaction state.

use crate::geometry::{rgba, with_alpha};
use crate::objects::Stroke;
use crate::selection::HandleKind;
use crate::smoothing::SmoothingParams;
use kurbo::Point;
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Available tools. Arrow, line and text are accepted but do nothing yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    Select,
    Rectangle,
    Circle,
    Arrow,
    Line,
    Pen,
    Text,
    Eraser,
    /// No tool, or a name the engine does not recognise.
    #[default]
    Unknown,
}

impl ToolKind {
    /// Parse a host-facing tool name. Unrecognised names map to `Unknown`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "select" => ToolKind::Select,
            "rectangle" => ToolKind::Rectangle,
            "circle" => ToolKind::Circle,
            "arrow" => ToolKind::Arrow,
            "line" => ToolKind::Line,
            "pen" => ToolKind::Pen,
            "text" => ToolKind::Text,
            "eraser" => ToolKind::Eraser,
            _ => ToolKind::Unknown,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Circle => "circle",
            ToolKind::Arrow => "arrow",
            ToolKind::Line => "line",
            ToolKind::Pen => "pen",
            ToolKind::Text => "text",
            ToolKind::Eraser => "eraser",
            ToolKind::Unknown => "",
        }
    }

    /// Cursor the host should show while this tool is active.
    pub fn cursor(self) -> &'static str {
        match self {
            ToolKind::Pen => "crosshair",
            ToolKind::Eraser | ToolKind::Select => "pointer",
            ToolKind::Text => "text",
            ToolKind::Unknown => "default",
            _ => "crosshair",
        }
    }

    /// Whether pointer input does anything with this tool.
    pub fn is_interactive(self) -> bool {
        matches!(
            self,
            ToolKind::Select
                | ToolKind::Rectangle
                | ToolKind::Circle
                | ToolKind::Pen
                | ToolKind::Eraser
        )
    }
}

/// State of the current pointer gesture.
#[derive(Debug, Clone, Default)]
pub enum ToolState {
    /// No button held.
    #[default]
    Idle,
    /// A freehand stroke in progress.
    Drawing(Stroke),
    /// A rectangle drag from `start`.
    Rectangle { start: Point, current: Point },
    /// A circle drag out from `center`.
    Circle { center: Point, current: Point },
    /// The eraser is pressed.
    Erasing,
    /// A rubber-band selection.
    Selecting { start: Point, current: Point },
    /// Dragging the selection; `last` is the previous pointer position.
    Moving { last: Point },
    /// Dragging a resize handle.
    Resizing { handle: HandleKind, last: Point },
}

impl ToolState {
    pub fn is_idle(&self) -> bool {
        matches!(self, ToolState::Idle)
    }
}

/// Pen and shape styling applied to new objects.
#[derive(Debug, Clone, Copy)]
pub struct ToolStyle {
    pub pen_width: f64,
    pub pen_color: Color,
    pub rectangle_color: Color,
    pub circle_color: Color,
}

impl Default for ToolStyle {
    fn default() -> Self {
        Self {
            pen_width: 3.0,
            pen_color: rgba(0.0, 0.0, 0.8, 1.0),
            rectangle_color: rgba(0.0, 0.0, 0.0, 1.0),
            circle_color: rgba(0.0, 0.0, 0.0, 1.0),
        }
    }
}

/// Manages the current tool and its state.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Current state of the tool.
    pub state: ToolState,
    /// Style applied to new objects.
    pub style: ToolStyle,
    /// Smoothing used for new strokes.
    pub smoothing: SmoothingParams,
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch tools, abandoning any gesture in progress.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
        self.state = ToolState::Idle;
    }

    /// Start a stroke with the current pen style.
    pub fn new_stroke(&self) -> Stroke {
        Stroke::with_params(self.style.pen_width, self.style.pen_color, self.smoothing)
    }

    pub fn set_pen_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.style.pen_width = width;
        }
    }

    pub fn set_pen_opacity(&mut self, opacity: f64) {
        self.style.pen_color = with_alpha(self.style.pen_color, opacity);
    }
}
