//! Tool system for the canvas.
//!
//! Every tool implements the same capability set ([`Tool`]) and the
//! [`ToolBox`] routes pointer and activation events to whichever tool is
//! active. Exactly one tool is active per canvas.

mod select;
mod text;

pub use select::SelectTool;
pub use text::{TextTool, TextToolState};

use crate::input::PointerEvent;
use crate::notify::HostNotifier;
use crate::scene::{SceneProvider, TextDefaults};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Text,
}

/// Pointer affordance requested by the active tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    /// Text-entry caret.
    Text,
}

/// Collaborators a tool may use while handling an event.
pub struct ToolContext<'a> {
    pub scene: &'a mut dyn SceneProvider,
    pub notifier: &'a mut dyn HostNotifier,
}

impl<'a> ToolContext<'a> {
    /// Borrow the scene and notification sink for one event.
    pub fn new(scene: &'a mut dyn SceneProvider, notifier: &'a mut dyn HostNotifier) -> Self {
        Self { scene, notifier }
    }
}

/// Lifecycle and pointer hooks implemented by every tool.
///
/// Handlers are total: an event a tool has no use for is a no-op.
pub trait Tool {
    /// Which tool this is.
    fn kind(&self) -> ToolKind;

    /// Cursor for the tool's current state.
    fn cursor(&self) -> Cursor;

    /// The tool became active.
    fn on_activate(&mut self, ctx: &mut ToolContext<'_>);

    /// The tool is losing focus; finish any in-progress work.
    fn on_deactivate(&mut self, ctx: &mut ToolContext<'_>);

    fn on_pointer_move(&mut self, position: Point, ctx: &mut ToolContext<'_>);

    fn on_pointer_down(&mut self, position: Point, ctx: &mut ToolContext<'_>);

    fn on_pointer_drag(&mut self, position: Point, ctx: &mut ToolContext<'_>);

    fn on_pointer_up(&mut self, position: Point, ctx: &mut ToolContext<'_>);
}

/// Holds every tool and tracks which one is active.
#[derive(Debug, Clone, Default)]
pub struct ToolBox {
    active: ToolKind,
    select: SelectTool,
    text: TextTool,
}

impl ToolBox {
    /// Create a tool box with the select tool active.
    pub fn new(text_defaults: TextDefaults) -> Self {
        Self {
            active: ToolKind::default(),
            select: SelectTool::new(),
            text: TextTool::new(text_defaults),
        }
    }

    /// Kind of the active tool.
    pub fn active(&self) -> ToolKind {
        self.active
    }

    /// Cursor requested by the active tool.
    pub fn cursor(&self) -> Cursor {
        self.tool(self.active).cursor()
    }

    /// Look up a tool by kind.
    pub fn tool(&self, kind: ToolKind) -> &dyn Tool {
        match kind {
            ToolKind::Select => &self.select,
            ToolKind::Text => &self.text,
        }
    }

    fn tool_mut(&mut self, kind: ToolKind) -> &mut dyn Tool {
        match kind {
            ToolKind::Select => &mut self.select,
            ToolKind::Text => &mut self.text,
        }
    }

    /// Get the select tool.
    pub fn select_tool(&self) -> &SelectTool {
        &self.select
    }

    /// Get the select tool mutably.
    pub fn select_tool_mut(&mut self) -> &mut SelectTool {
        &mut self.select
    }

    /// Get the text tool.
    pub fn text_tool(&self) -> &TextTool {
        &self.text
    }

    /// Get the text tool mutably.
    pub fn text_tool_mut(&mut self) -> &mut TextTool {
        &mut self.text
    }

    /// Switch tools. The outgoing tool is deactivated before the incoming
    /// one is activated. Selecting the active tool again does nothing.
    pub fn set_tool(&mut self, kind: ToolKind, ctx: &mut ToolContext<'_>) {
        if kind == self.active {
            return;
        }
        log::debug!("Switching tool {:?} -> {:?}", self.active, kind);
        self.tool_mut(self.active).on_deactivate(ctx);
        self.active = kind;
        self.tool_mut(kind).on_activate(ctx);
    }

    /// Deactivate the active tool without switching, e.g. when the canvas
    /// loses focus.
    pub fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        self.tool_mut(self.active).on_deactivate(ctx);
    }

    /// Route a pointer event to the active tool.
    pub fn dispatch(&mut self, event: PointerEvent, ctx: &mut ToolContext<'_>) {
        let tool = self.tool_mut(self.active);
        match event {
            PointerEvent::Move { position } => tool.on_pointer_move(position, ctx),
            PointerEvent::Down { position, .. } => tool.on_pointer_down(position, ctx),
            PointerEvent::Drag { position } => tool.on_pointer_drag(position, ctx),
            PointerEvent::Up { position, .. } => tool.on_pointer_up(position, ctx),
        }
    }
}
