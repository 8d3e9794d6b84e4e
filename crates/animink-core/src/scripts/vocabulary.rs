//! Event-trigger vocabulary: which script names exist and how they group.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::{Arc, OnceLock};

/// Category of an event trigger.
///
/// Variant order is the display order of the categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum ScriptType {
    Timeline,
    #[default]
    Mouse,
    Keyboard,
    /// Any name outside the vocabulary.
    Custom,
}

impl ScriptType {
    /// Get display name for UI.
    pub fn display_name(&self) -> &'static str {
        match self {
            ScriptType::Timeline => "Timeline",
            ScriptType::Mouse => "Mouse",
            ScriptType::Keyboard => "Keyboard",
            ScriptType::Custom => "Custom",
        }
    }

    pub fn all() -> &'static [ScriptType] {
        &[
            ScriptType::Timeline,
            ScriptType::Mouse,
            ScriptType::Keyboard,
            ScriptType::Custom,
        ]
    }
}

/// One event trigger a script can be attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptInfo {
    pub name: String,
    pub script_type: ScriptType,
    pub description: String,
}

impl ScriptInfo {
    pub fn new(name: &str, script_type: ScriptType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            script_type,
            description: description.to_string(),
        }
    }
}

/// Ordered, host-defined list of event triggers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptVocabulary {
    entries: Vec<ScriptInfo>,
}

impl Default for ScriptVocabulary {
    fn default() -> Self {
        use ScriptType::*;
        let entries = [
            ("default", Timeline, "Runs once when the frame is entered"),
            ("load", Timeline, "Runs once when the object first appears"),
            ("update", Timeline, "Runs every tick while the object is on screen"),
            ("unload", Timeline, "Runs once when the object leaves the screen"),
            ("mouseenter", Mouse, "The pointer starts hovering the object"),
            ("mousedown", Mouse, "A button is pressed over the object"),
            ("mousepressed", Mouse, "A press starts over the object"),
            ("mousereleased", Mouse, "A press ends over the object"),
            ("mouseleave", Mouse, "The pointer stops hovering the object"),
            ("mousehover", Mouse, "Every tick while the pointer hovers the object"),
            ("mousedrag", Mouse, "Every tick while the object is dragged"),
            ("mouseclick", Mouse, "A full click lands on the object"),
            ("keypressed", Keyboard, "A key goes down"),
            ("keyreleased", Keyboard, "A key comes up"),
            ("keydown", Keyboard, "Every tick while a key is held"),
        ]
        .into_iter()
        .map(|(name, ty, description)| ScriptInfo::new(name, ty, description))
        .collect();
        Self { entries }
    }
}

impl ScriptVocabulary {
    /// Build a vocabulary from explicit entries. Later duplicates of a name
    /// are dropped.
    pub fn new(entries: Vec<ScriptInfo>) -> Self {
        let mut deduped: Vec<ScriptInfo> = Vec::with_capacity(entries.len());
        for entry in entries {
            if !deduped.iter().any(|e| e.name == entry.name) {
                deduped.push(entry);
            }
        }
        Self { entries: deduped }
    }

    /// Process-wide instance of the built-in vocabulary.
    pub fn shared() -> Arc<ScriptVocabulary> {
        static SHARED: OnceLock<Arc<ScriptVocabulary>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(ScriptVocabulary::default())).clone()
    }

    pub fn entries(&self) -> &[ScriptInfo] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&ScriptInfo> {
        self.entries.iter().find(|e| e.name == name)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    /// Classify a script name. Unknown names are [`ScriptType::Custom`].
    pub fn script_type(&self, name: &str) -> ScriptType {
        self.get(name)
            .map(|e| e.script_type)
            .unwrap_or(ScriptType::Custom)
    }

    /// Entries of one category, in vocabulary order.
    pub fn of_type(&self, script_type: ScriptType) -> impl Iterator<Item = &ScriptInfo> + '_ {
        self.entries
            .iter()
            .filter(move |e| e.script_type == script_type)
    }

    /// Default display order: category first, then vocabulary position.
    /// Custom names all rank equal so a stable sort keeps their order.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let rank = |name: &str| match self.script_type(name) {
            ScriptType::Custom => (ScriptType::Custom, None),
            other => (other, self.position(name)),
        };
        rank(a).cmp(&rank(b))
    }
}
