//! Scene graph and the canvas capabilities the tools consume.
//!
//! Tools never reach into the scene directly. They go through
//! [`SceneProvider`], which hit-tests pointer positions, creates text, and
//! toggles per-object edit mode. [`Scene`] is the in-memory implementation.

mod group;
mod text;

pub use group::Group;
pub use text::{Justification, TextDefaults, TextObject};

use kurbo::{Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for scene objects, independent of z-order.
pub type ObjectId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// A non-text drawable, reduced to what hit-testing needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathObject {
    pub(crate) id: ObjectId,
    pub bounds: Rect,
}

/// Any object that can live in the scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SceneObject {
    Text(TextObject),
    Path(PathObject),
    Group(Group),
}

impl SceneObject {
    pub fn id(&self) -> ObjectId {
        match self {
            SceneObject::Text(t) => t.id,
            SceneObject::Path(p) => p.id,
            SceneObject::Group(g) => g.id,
        }
    }

    pub fn as_text(&self) -> Option<&TextObject> {
        match self {
            SceneObject::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextObject> {
        match self {
            SceneObject::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Result of hit-testing a pointer position.
///
/// Carries only what the tools switch on: the kind of object and whether
/// it sits directly on the canvas rather than inside a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Text { id: ObjectId, top_level: bool },
    Other { id: ObjectId, top_level: bool },
    None,
}

impl Hit {
    /// The hit object's id, if anything was hit.
    pub fn id(&self) -> Option<ObjectId> {
        match *self {
            Hit::Text { id, .. } | Hit::Other { id, .. } => Some(id),
            Hit::None => None,
        }
    }

    /// The id of a text object the text tool may interact with directly.
    pub fn editable_text(&self) -> Option<ObjectId> {
        match *self {
            Hit::Text { id, top_level: true } => Some(id),
            _ => None,
        }
    }
}

/// Canvas capabilities consumed by the tools.
pub trait SceneProvider {
    /// Topmost leaf object under `point`.
    fn hit_test(&self, point: Point) -> Hit;

    /// The enclosing group of `id`, if any.
    fn parent_of(&self, id: ObjectId) -> Option<ObjectId>;

    /// Instantiate a new text object at `position`.
    fn create_text(&mut self, position: Point, defaults: &TextDefaults) -> ObjectId;

    /// Put an object into edit mode.
    fn begin_edit(&mut self, id: ObjectId);

    /// Take an object out of edit mode, applying its changes.
    fn finish_edit(&mut self, id: ObjectId);
}

/// In-memory scene: objects keyed by id, plus the top-level z-order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    objects: HashMap<ObjectId, SceneObject>,
    /// Top-level objects, back to front.
    z_order: Vec<ObjectId>,
    /// Child id to enclosing group id.
    parents: HashMap<ObjectId, ObjectId>,
    /// Pointer hit tolerance in scene units.
    #[serde(default = "default_tolerance")]
    tolerance: f64,
}

fn default_tolerance() -> f64 {
    2.0
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            objects: HashMap::new(),
            z_order: Vec::new(),
            parents: HashMap::new(),
            tolerance: default_tolerance(),
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pointer hit tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(&id)
    }

    pub fn text(&self, id: ObjectId) -> Option<&TextObject> {
        self.objects.get(&id).and_then(SceneObject::as_text)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Number of objects, nested ones included.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Top-level object ids, back to front.
    pub fn top_level(&self) -> &[ObjectId] {
        &self.z_order
    }

    /// Add a text object on top of the scene.
    pub fn add_text(&mut self, text: TextObject) -> ObjectId {
        let id = text.id;
        self.insert_top(SceneObject::Text(text));
        id
    }

    /// Add a non-text object with the given bounds on top of the scene.
    pub fn add_path(&mut self, bounds: Rect) -> ObjectId {
        let id = Uuid::new_v4();
        self.insert_top(SceneObject::Path(PathObject { id, bounds }));
        id
    }

    fn insert_top(&mut self, object: SceneObject) {
        let id = object.id();
        self.z_order.push(id);
        self.objects.insert(id, object);
    }

    /// Group top-level objects. Returns the group id, or `None` if fewer
    /// than two of the ids are top-level objects of this scene.
    /// The group takes the place of its frontmost member.
    pub fn group(&mut self, ids: &[ObjectId]) -> Option<ObjectId> {
        let members: Vec<(usize, ObjectId)> = self
            .z_order
            .iter()
            .enumerate()
            .filter(|(_, id)| ids.contains(*id))
            .map(|(idx, &id)| (idx, id))
            .collect();
        let &(front_idx, _) = members.last()?;
        if members.len() < 2 {
            return None;
        }

        let children: Vec<ObjectId> = members.iter().map(|&(_, id)| id).collect();
        self.z_order.retain(|id| !children.contains(id));

        let group = Group::new(children.clone());
        let group_id = group.id;
        for child in children.iter() {
            self.parents.insert(*child, group_id);
        }
        self.objects.insert(group_id, SceneObject::Group(group));

        let insert_pos = (front_idx + 1 - members.len()).min(self.z_order.len());
        self.z_order.insert(insert_pos, group_id);
        Some(group_id)
    }

    /// Dissolve a top-level group, returning its children to the canvas
    /// where the group was.
    pub fn ungroup(&mut self, group_id: ObjectId) -> Option<Vec<ObjectId>> {
        let z_pos = self.z_order.iter().position(|&id| id == group_id)?;
        let children = match self.objects.get(&group_id) {
            Some(SceneObject::Group(g)) => g.children.clone(),
            _ => return None,
        };

        self.objects.remove(&group_id);
        self.z_order.remove(z_pos);
        for (i, child) in children.iter().enumerate() {
            self.parents.remove(child);
            self.z_order.insert(z_pos + i, *child);
        }
        Some(children)
    }

    /// Remove an object and everything nested inside it.
    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let object = self.objects.remove(&id)?;
        self.z_order.retain(|&zid| zid != id);
        if let Some(parent) = self.parents.remove(&id) {
            if let Some(SceneObject::Group(group)) = self.objects.get_mut(&parent) {
                group.remove_child(id);
            }
        }
        if let SceneObject::Group(group) = &object {
            for child in group.children.clone() {
                self.remove_nested(child);
            }
        }
        Some(object)
    }

    fn remove_nested(&mut self, id: ObjectId) {
        self.parents.remove(&id);
        if let Some(SceneObject::Group(group)) = self.objects.remove(&id) {
            for child in group.children {
                self.remove_nested(child);
            }
        }
    }

    /// `id` followed by every object nested inside it. Empty if `id` is
    /// not in the scene.
    pub fn subtree(&self, id: ObjectId) -> Vec<ObjectId> {
        let mut ids = Vec::new();
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            match self.objects.get(&next) {
                Some(SceneObject::Group(group)) => {
                    ids.push(next);
                    pending.extend(group.children.iter().rev().copied());
                }
                Some(_) => ids.push(next),
                None => {}
            }
        }
        ids
    }

    /// Walk up the parent chain to the object sitting directly on the canvas.
    pub fn top_level_ancestor(&self, id: ObjectId) -> ObjectId {
        let mut current = id;
        while let Some(&parent) = self.parents.get(&current) {
            current = parent;
        }
        current
    }

    fn leaf_at(&self, id: ObjectId, point: Point) -> Option<ObjectId> {
        match self.objects.get(&id)? {
            SceneObject::Text(t) => t.hit_test(point, self.tolerance).then_some(id),
            SceneObject::Path(p) => p
                .bounds
                .inflate(self.tolerance, self.tolerance)
                .contains(point)
                .then_some(id),
            SceneObject::Group(g) => g
                .children
                .iter()
                .rev()
                .find_map(|&child| self.leaf_at(child, point)),
        }
    }

    /// Serialize the scene to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a scene from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl SceneProvider for Scene {
    fn hit_test(&self, point: Point) -> Hit {
        let Some(leaf) = self
            .z_order
            .iter()
            .rev()
            .find_map(|&id| self.leaf_at(id, point))
        else {
            return Hit::None;
        };

        let top_level = !self.parents.contains_key(&leaf);
        match self.objects.get(&leaf) {
            Some(SceneObject::Text(_)) => Hit::Text { id: leaf, top_level },
            Some(_) => Hit::Other { id: leaf, top_level },
            None => Hit::None,
        }
    }

    fn parent_of(&self, id: ObjectId) -> Option<ObjectId> {
        self.parents.get(&id).copied()
    }

    fn create_text(&mut self, position: Point, defaults: &TextDefaults) -> ObjectId {
        let id = self.add_text(TextObject::new(position, defaults));
        log::debug!("Created text object {} at ({}, {})", id, position.x, position.y);
        id
    }

    fn begin_edit(&mut self, id: ObjectId) {
        match self.objects.get_mut(&id).and_then(SceneObject::as_text_mut) {
            Some(text) => text.editing = true,
            None => log::warn!("Cannot edit object {}: not a text object", id),
        }
    }

    fn finish_edit(&mut self, id: ObjectId) {
        if let Some(text) = self.objects.get_mut(&id).and_then(SceneObject::as_text_mut) {
            text.editing = false;
        }
    }
}
