//! Named, event-triggered scripts attached to a scene object.

mod vocabulary;

pub use vocabulary::{ScriptInfo, ScriptType, ScriptVocabulary};

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;
use thiserror::Error;

/// Script collection errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("A script named '{0}' already exists")]
    NameConflict(String),
    #[error("No script named '{0}'")]
    NotFound(String),
    #[error("Invalid script name: {0:?}")]
    InvalidName(String),
}

/// Result type for script operations.
pub type ScriptResult<T> = Result<T, ScriptError>;

/// A single script: the trigger it responds to and its source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptEntry {
    name: String,
    source: String,
    script_type: ScriptType,
}

impl ScriptEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn script_type(&self) -> ScriptType {
        self.script_type
    }
}

/// Ordered set of scripts keyed by name. No two entries share a name.
///
/// Storage order is for display only; it has no bearing on when scripts
/// run. `revision` increases on every observable change so callers can
/// tell whether the collection needs saving.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptCollection {
    scripts: Vec<ScriptEntry>,
    #[serde(skip)]
    revision: u64,
    #[serde(skip, default = "ScriptVocabulary::shared")]
    vocabulary: Arc<ScriptVocabulary>,
}

impl Default for ScriptCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for ScriptCollection {
    fn eq(&self, other: &Self) -> bool {
        self.scripts == other.scripts
    }
}

impl ScriptCollection {
    /// Create an empty collection using the built-in vocabulary.
    pub fn new() -> Self {
        Self::with_vocabulary(ScriptVocabulary::shared())
    }

    pub fn with_vocabulary(vocabulary: Arc<ScriptVocabulary>) -> Self {
        Self {
            scripts: Vec::new(),
            revision: 0,
            vocabulary,
        }
    }

    pub fn vocabulary(&self) -> &Arc<ScriptVocabulary> {
        &self.vocabulary
    }

    /// Swap the vocabulary and reclassify existing entries.
    pub fn set_vocabulary(&mut self, vocabulary: Arc<ScriptVocabulary>) {
        self.vocabulary = vocabulary;
        for entry in &mut self.scripts {
            entry.script_type = self.vocabulary.script_type(&entry.name);
        }
        self.revision += 1;
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScriptEntry> {
        self.scripts.iter()
    }

    /// Script names in storage order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scripts.iter().map(|s| s.name.as_str())
    }

    pub fn has_script(&self, name: &str) -> bool {
        self.scripts.iter().any(|s| s.name == name)
    }

    pub fn script(&self, name: &str) -> Option<&ScriptEntry> {
        self.scripts.iter().find(|s| s.name == name)
    }

    /// Classification of `name`, whether or not it is present.
    pub fn script_type(&self, name: &str) -> ScriptType {
        self.vocabulary.script_type(name)
    }

    /// Append an empty script for `name`.
    pub fn add_script(&mut self, name: &str) -> ScriptResult<&ScriptEntry> {
        if name.trim().is_empty() {
            return Err(ScriptError::InvalidName(name.to_string()));
        }
        if self.has_script(name) {
            log::warn!("Refusing to add duplicate script '{}'", name);
            return Err(ScriptError::NameConflict(name.to_string()));
        }
        self.scripts.push(ScriptEntry {
            name: name.to_string(),
            source: String::new(),
            script_type: self.vocabulary.script_type(name),
        });
        self.revision += 1;
        Ok(&self.scripts[self.scripts.len() - 1])
    }

    /// Replace the source of an existing script in place.
    pub fn update_script(&mut self, name: &str, source: &str) -> ScriptResult<()> {
        let entry = self
            .scripts
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| ScriptError::NotFound(name.to_string()))?;
        if entry.source != source {
            entry.source = source.to_string();
            self.revision += 1;
        }
        Ok(())
    }

    /// Remove a script, returning it.
    pub fn remove_script(&mut self, name: &str) -> ScriptResult<ScriptEntry> {
        let pos = self
            .scripts
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| ScriptError::NotFound(name.to_string()))?;
        self.revision += 1;
        Ok(self.scripts.remove(pos))
    }

    /// Vocabulary names not yet present, in vocabulary order.
    ///
    /// The iterator borrows the collection; call again to restart.
    pub fn available_scripts(&self) -> impl Iterator<Item = &ScriptInfo> + '_ {
        self.vocabulary
            .entries()
            .iter()
            .filter(move |info| !self.has_script(&info.name))
    }

    /// Stable in-place sort with a caller-supplied order.
    pub fn sort_scripts<F>(&mut self, mut compare: F)
    where
        F: FnMut(&ScriptEntry, &ScriptEntry) -> Ordering,
    {
        let before: Vec<String> = self.scripts.iter().map(|s| s.name.clone()).collect();
        self.scripts.sort_by(|a, b| compare(a, b));
        if self.scripts.iter().map(|s| &s.name).ne(before.iter()) {
            self.revision += 1;
        }
    }

    /// Sort by the vocabulary's display order.
    pub fn sort_by_vocabulary(&mut self) {
        let vocabulary = Arc::clone(&self.vocabulary);
        self.sort_scripts(|a, b| vocabulary.compare(&a.name, &b.name));
    }
}
