//! Text tool: hover, create and edit point text.

use super::{Cursor, Tool, ToolContext, ToolKind};
use crate::scene::{Hit, ObjectId, TextDefaults};
use kurbo::Point;

/// Observable state of the text tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextToolState {
    #[default]
    Idle,
    Hovering(ObjectId),
    Editing(ObjectId),
}

/// Creates text objects on empty canvas and edits existing top-level text.
///
/// A pointer-down does exactly one thing: commit the open edit, enter edit
/// mode on the hovered text, or create a new text object, in that order of
/// precedence.
#[derive(Debug, Clone, Default)]
pub struct TextTool {
    defaults: TextDefaults,
    hovered: Option<ObjectId>,
    editing: Option<ObjectId>,
}

impl TextTool {
    /// Create an idle text tool that places text with `defaults`.
    pub fn new(defaults: TextDefaults) -> Self {
        Self {
            defaults,
            hovered: None,
            editing: None,
        }
    }

    /// Current state; an open edit takes precedence over hover.
    pub fn state(&self) -> TextToolState {
        match (self.editing, self.hovered) {
            (Some(id), _) => TextToolState::Editing(id),
            (None, Some(id)) => TextToolState::Hovering(id),
            (None, None) => TextToolState::Idle,
        }
    }

    /// Text object under the pointer, if it may be edited directly.
    pub fn hovered(&self) -> Option<ObjectId> {
        self.hovered
    }

    /// Text object with an open edit session.
    pub fn editing(&self) -> Option<ObjectId> {
        self.editing
    }

    /// Attributes given to newly created text.
    pub fn defaults(&self) -> &TextDefaults {
        &self.defaults
    }

    /// Change the attributes for text created from now on.
    pub fn set_defaults(&mut self, defaults: TextDefaults) {
        self.defaults = defaults;
    }

    /// Stop editing the current text and apply changes.
    ///
    /// Does nothing when no edit is open, so it is safe to call repeatedly.
    pub fn finish_editing(&mut self, ctx: &mut ToolContext<'_>) {
        let Some(id) = self.editing.take() else {
            return;
        };
        ctx.scene.finish_edit(id);
        log::debug!("Committed text edit on {}", id);
        ctx.notifier.canvas_modified();
    }

    /// Drop every reference to an object that is leaving the scene.
    ///
    /// An open edit on it is committed first. Call before the object is
    /// removed.
    pub fn forget(&mut self, id: ObjectId, ctx: &mut ToolContext<'_>) {
        if self.editing == Some(id) {
            self.finish_editing(ctx);
        }
        if self.hovered == Some(id) {
            self.hovered = None;
        }
    }
}

impl Tool for TextTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Text
    }

    fn cursor(&self) -> Cursor {
        if self.hovered.is_some() || self.editing.is_some() {
            Cursor::Text
        } else {
            Cursor::Default
        }
    }

    fn on_activate(&mut self, _ctx: &mut ToolContext<'_>) {}

    fn on_deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        self.finish_editing(ctx);
        self.hovered = None;
    }

    fn on_pointer_move(&mut self, position: Point, ctx: &mut ToolContext<'_>) {
        let hit = ctx.scene.hit_test(position);
        if let Hit::Text { id, top_level: false } = hit {
            log::trace!("Text {} is inside a group; not directly editable", id);
        }
        self.hovered = hit.editable_text();
    }

    fn on_pointer_down(&mut self, position: Point, ctx: &mut ToolContext<'_>) {
        if self.editing.is_some() {
            self.finish_editing(ctx);
        } else if let Some(id) = self.hovered {
            log::debug!("Editing text {}", id);
            self.editing = Some(id);
            ctx.scene.begin_edit(id);
        } else {
            ctx.scene.create_text(position, &self.defaults);
            ctx.notifier.canvas_modified();
        }
    }

    // Drag and release carry no meaning for text.
    fn on_pointer_drag(&mut self, _position: Point, _ctx: &mut ToolContext<'_>) {}

    fn on_pointer_up(&mut self, _position: Point, _ctx: &mut ToolContext<'_>) {}
}
