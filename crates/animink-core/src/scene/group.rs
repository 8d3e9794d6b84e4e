//! Composite objects.

use super::ObjectId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A group of scene objects manipulated as a single unit.
/// Groups can contain other groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub(crate) id: ObjectId,
    /// Child objects, back to front.
    pub(crate) children: Vec<ObjectId>,
}

impl Group {
    /// Create a new group over the given children.
    pub fn new(children: Vec<ObjectId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            children,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Child ids, back to front.
    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    /// Detach a child. Returns true if it was a member.
    pub(crate) fn remove_child(&mut self, id: ObjectId) -> bool {
        let before = self.children.len();
        self.children.retain(|&child| child != id);
        self.children.len() != before
    }
}
