//! Text objects.

use super::{ObjectId, SerializableColor};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Horizontal alignment of text around its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Justification {
    #[default]
    Left,
    Center,
    Right,
}

/// Attributes given to text objects created by the text tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextDefaults {
    pub justification: Justification,
    pub fill: SerializableColor,
    /// Placeholder content shown until the user types.
    pub content: String,
    pub font_size: f64,
}

impl Default for TextDefaults {
    fn default() -> Self {
        Self {
            justification: Justification::Left,
            fill: SerializableColor::black(),
            content: "This is some text".to_string(),
            font_size: TextObject::DEFAULT_FONT_SIZE,
        }
    }
}

/// A point text object anchored at its baseline origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextObject {
    pub(crate) id: ObjectId,
    /// Anchor point (left end of the baseline for left-justified text).
    pub anchor: Point,
    pub content: String,
    pub font_size: f64,
    pub fill: SerializableColor,
    pub justification: Justification,
    /// Whether an edit session is currently open on this object.
    #[serde(default)]
    pub(crate) editing: bool,
}

impl TextObject {
    pub const DEFAULT_FONT_SIZE: f64 = 14.0;

    /// Create a text object at `anchor` with the given defaults.
    pub fn new(anchor: Point, defaults: &TextDefaults) -> Self {
        Self {
            id: Uuid::new_v4(),
            anchor,
            content: defaults.content.clone(),
            font_size: defaults.font_size,
            fill: defaults.fill,
            justification: defaults.justification,
            editing: false,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Check if an edit session is open.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Replace the text content.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Approximate width, using the widest line.
    fn approximate_width(&self) -> f64 {
        let max_line_len = self
            .content
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        (max_line_len as f64 * self.font_size * 0.55).max(self.font_size)
    }

    fn approximate_height(&self) -> f64 {
        let line_count = self.content.lines().count().max(1);
        line_count as f64 * self.font_size * 1.2
    }

    /// Bounding box in scene coordinates.
    ///
    /// The anchor sits on the first baseline, so the box extends one
    /// ascent above it.
    pub fn bounds(&self) -> Rect {
        let width = self.approximate_width();
        let height = self.approximate_height();
        let x0 = match self.justification {
            Justification::Left => self.anchor.x,
            Justification::Center => self.anchor.x - width / 2.0,
            Justification::Right => self.anchor.x - width,
        };
        let y0 = self.anchor.y - self.font_size;
        Rect::new(x0, y0, x0 + width, y0 + height)
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_defaults() {
        let text = TextObject::new(Point::new(10.0, 20.0), &TextDefaults::default());
        assert_eq!(text.content, "This is some text");
        assert_eq!(text.justification, Justification::Left);
        assert_eq!(text.fill, SerializableColor::black());
        assert!((text.font_size - 14.0).abs() < f64::EPSILON);
        assert!(!text.is_editing());
    }

    #[test]
    fn test_bounds_follow_justification() {
        let defaults = TextDefaults::default();
        let mut text = TextObject::new(Point::new(100.0, 100.0), &defaults);
        let left = text.bounds();
        assert!((left.x0 - 100.0).abs() < f64::EPSILON);

        text.justification = Justification::Right;
        let right = text.bounds();
        assert!((right.x1 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_hit_test() {
        let text = TextObject::new(Point::new(100.0, 100.0), &TextDefaults::default());
        let bounds = text.bounds();
        assert!(text.hit_test(bounds.center(), 0.0));
        assert!(!text.hit_test(Point::new(0.0, 0.0), 0.0));
    }
}
