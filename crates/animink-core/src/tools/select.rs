//! Select tool: picks the object whose scripts the host edits.

use super::{Cursor, Tool, ToolContext, ToolKind};
use crate::notify::Notification;
use crate::scene::ObjectId;
use kurbo::Point;

/// Selects the top-level object under the pointer.
///
/// Clicking inside a group selects the group itself, since scripts attach
/// to directly addressable objects.
#[derive(Debug, Clone, Default)]
pub struct SelectTool {
    selected: Option<ObjectId>,
}

impl SelectTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    /// Set the selection directly. Returns true if it changed.
    pub fn set_selected(&mut self, id: Option<ObjectId>) -> bool {
        if self.selected == id {
            return false;
        }
        self.selected = id;
        true
    }
}

impl Tool for SelectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn cursor(&self) -> Cursor {
        Cursor::Default
    }

    fn on_activate(&mut self, _ctx: &mut ToolContext<'_>) {}

    fn on_deactivate(&mut self, _ctx: &mut ToolContext<'_>) {}

    fn on_pointer_move(&mut self, _position: Point, _ctx: &mut ToolContext<'_>) {}

    fn on_pointer_down(&mut self, position: Point, ctx: &mut ToolContext<'_>) {
        let target = ctx.scene.hit_test(position).id().map(|mut id| {
            while let Some(parent) = ctx.scene.parent_of(id) {
                id = parent;
            }
            id
        });
        if self.set_selected(target) {
            log::debug!("Selection changed to {:?}", target);
            ctx.notifier.notify(Notification::SelectionChanged(target));
        }
    }

    fn on_pointer_drag(&mut self, _position: Point, _ctx: &mut ToolContext<'_>) {}

    fn on_pointer_up(&mut self, _position: Point, _ctx: &mut ToolContext<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Scene, SceneProvider, TextDefaults};

    #[test]
    fn test_select_and_clear() {
        let mut scene = Scene::new();
        let id = scene.create_text(Point::new(100.0, 100.0), &TextDefaults::default());
        let center = scene.text(id).unwrap().bounds().center();
        let mut log: Vec<Notification> = Vec::new();
        let mut tool = SelectTool::new();

        let mut ctx = ToolContext::new(&mut scene, &mut log);
        tool.on_pointer_down(center, &mut ctx);
        tool.on_pointer_down(center, &mut ctx);
        tool.on_pointer_down(Point::new(-500.0, -500.0), &mut ctx);

        assert_eq!(tool.selected(), None);
        assert_eq!(
            log,
            vec![
                Notification::SelectionChanged(Some(id)),
                Notification::SelectionChanged(None),
            ]
        );
    }

    #[test]
    fn test_nested_hit_selects_group() {
        let mut scene = Scene::new();
        let a = scene.create_text(Point::new(100.0, 100.0), &TextDefaults::default());
        let b = scene.create_text(Point::new(400.0, 400.0), &TextDefaults::default());
        let group = scene.group(&[a, b]).unwrap();
        let center = scene.text(a).unwrap().bounds().center();
        let mut log: Vec<Notification> = Vec::new();
        let mut tool = SelectTool::new();

        tool.on_pointer_down(center, &mut ToolContext::new(&mut scene, &mut log));
        assert_eq!(tool.selected(), Some(group));
    }
}
