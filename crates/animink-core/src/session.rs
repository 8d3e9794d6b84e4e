//! Script editing session: the state behind the code editor panel.
//!
//! The session does not own the collection it edits. It keeps a weak
//! handle, so the host can swap or drop the collection (for instance when
//! another object is selected) without the session keeping it alive.

use crate::notify::HostNotifier;
use crate::scripts::{ScriptCollection, ScriptError, ScriptInfo, ScriptResult, ScriptType};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Text shown in the editor when no script is open.
pub const NO_SCRIPT_PLACEHOLDER: &str = "No Script";

/// What the editor panel currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScriptTarget {
    #[default]
    NoScript,
    /// The "add script" picker.
    AddScript,
    Script(String),
}

/// One tab in the editor's script strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTab {
    pub name: String,
    /// Capitalized name for display.
    pub label: String,
    pub script_type: ScriptType,
    pub selected: bool,
}

/// Content of the editing pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorPane {
    Source(String),
    /// Scripts that may still be added, for the selected category.
    AddScript(Vec<ScriptInfo>),
    Placeholder(&'static str),
}

/// Tracks which script of which collection is being edited.
#[derive(Debug, Default)]
pub struct ScriptEditingSession {
    collection: Weak<RefCell<ScriptCollection>>,
    target: ScriptTarget,
    add_tab: ScriptType,
    error: Option<String>,
    autosave_pending: bool,
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl ScriptEditingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Category initially shown by the add-script picker.
    pub fn with_add_tab(mut self, tab: ScriptType) -> Self {
        self.add_tab = tab;
        self
    }

    /// Rebind to `collection` and show `target`.
    ///
    /// Opening a script name the collection lacks fails with `NotFound`
    /// and leaves the session untouched. The collection is sorted into
    /// display order on every open.
    pub fn open(
        &mut self,
        collection: &Rc<RefCell<ScriptCollection>>,
        target: ScriptTarget,
    ) -> ScriptResult<()> {
        if let ScriptTarget::Script(name) = &target {
            if !collection.borrow().has_script(name) {
                return Err(ScriptError::NotFound(name.clone()));
            }
        }
        collection.borrow_mut().sort_by_vocabulary();
        self.collection = Rc::downgrade(collection);
        self.target = target;
        self.error = None;
        Ok(())
    }

    /// Rebind to `collection` with nothing open.
    pub fn bind(&mut self, collection: &Rc<RefCell<ScriptCollection>>) {
        self.collection = Rc::downgrade(collection);
        self.target = ScriptTarget::NoScript;
        self.error = None;
        collection.borrow_mut().sort_by_vocabulary();
    }

    /// Drop the binding and reset to the empty state.
    pub fn close(&mut self) {
        self.collection = Weak::new();
        self.target = ScriptTarget::NoScript;
        self.error = None;
        self.autosave_pending = false;
    }

    /// The bound collection, if it is still alive.
    pub fn collection(&self) -> Option<Rc<RefCell<ScriptCollection>>> {
        self.collection.upgrade()
    }

    pub fn is_bound(&self) -> bool {
        self.collection.strong_count() > 0
    }

    pub fn target(&self) -> &ScriptTarget {
        &self.target
    }

    /// Name of the open script, if a real one is open.
    pub fn current_script(&self) -> Option<&str> {
        match &self.target {
            ScriptTarget::Script(name) => Some(name),
            _ => None,
        }
    }

    /// Switch to another script of the bound collection.
    pub fn select_script(&mut self, name: &str) -> ScriptResult<()> {
        let Some(collection) = self.collection() else {
            return Err(ScriptError::NotFound(name.to_string()));
        };
        if !collection.borrow().has_script(name) {
            return Err(ScriptError::NotFound(name.to_string()));
        }
        self.target = ScriptTarget::Script(name.to_string());
        self.error = None;
        Ok(())
    }

    /// Show the add-script picker.
    pub fn open_add_workflow(&mut self) {
        self.target = ScriptTarget::AddScript;
        self.error = None;
    }

    /// Apply an edit from the host's code widget.
    ///
    /// With a real script open this requests an autosave, writes the new
    /// source through to the collection, then reports the change, and
    /// returns `Ok(true)`. In any other state nothing happens and
    /// `Ok(false)` is returned.
    pub fn on_edit(
        &mut self,
        new_source: &str,
        notifier: &mut dyn HostNotifier,
    ) -> ScriptResult<bool> {
        let ScriptTarget::Script(name) = &self.target else {
            return Ok(false);
        };
        let Some(collection) = self.collection.upgrade() else {
            log::debug!("Ignoring edit to '{}': collection is gone", name);
            return Ok(false);
        };

        notifier.request_autosave();
        self.autosave_pending = true;
        collection.borrow_mut().update_script(name, new_source)?;
        notifier.minor_script_update(new_source);
        Ok(true)
    }

    /// Add a script to the bound collection and open it.
    ///
    /// Returns `Ok(false)` when no collection is bound.
    pub fn add_script(&mut self, name: &str) -> ScriptResult<bool> {
        let Some(collection) = self.collection.upgrade() else {
            return Ok(false);
        };
        {
            let mut scripts = collection.borrow_mut();
            scripts.add_script(name)?;
            scripts.sort_by_vocabulary();
        }
        self.target = ScriptTarget::Script(name.to_string());
        self.error = None;
        Ok(true)
    }

    pub fn autosave_pending(&self) -> bool {
        self.autosave_pending
    }

    /// Mark the last autosave request as handled.
    pub fn acknowledge_autosave(&mut self) {
        self.autosave_pending = false;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Record an error for display, e.g. a script that failed to compile.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn add_tab(&self) -> ScriptType {
        self.add_tab
    }

    pub fn set_add_tab(&mut self, tab: ScriptType) {
        self.add_tab = tab;
    }

    /// Every script that can still be added, in vocabulary order.
    pub fn available_scripts(&self) -> Vec<ScriptInfo> {
        let Some(collection) = self.collection() else {
            return Vec::new();
        };
        let scripts = collection.borrow();
        scripts.available_scripts().cloned().collect()
    }

    /// Scripts that can still be added in the selected category.
    pub fn add_candidates(&self) -> Vec<ScriptInfo> {
        self.available_scripts()
            .into_iter()
            .filter(|info| info.script_type == self.add_tab)
            .collect()
    }

    /// Tab strip contents, in collection order.
    pub fn tabs(&self) -> Vec<ScriptTab> {
        let Some(collection) = self.collection() else {
            return Vec::new();
        };
        let current = self.current_script();
        let scripts = collection.borrow();
        scripts
            .iter()
            .map(|entry| ScriptTab {
                name: entry.name().to_string(),
                label: capitalize(entry.name()),
                script_type: entry.script_type(),
                selected: current == Some(entry.name()),
            })
            .collect()
    }

    /// Source of the open script, or the placeholder text.
    pub fn source(&self) -> String {
        let (Some(name), Some(collection)) = (self.current_script(), self.collection()) else {
            return NO_SCRIPT_PLACEHOLDER.to_string();
        };
        let scripts = collection.borrow();
        scripts
            .script(name)
            .map(|entry| entry.source().to_string())
            .unwrap_or_else(|| NO_SCRIPT_PLACEHOLDER.to_string())
    }

    /// What the editing pane should display.
    pub fn pane(&self) -> EditorPane {
        match &self.target {
            ScriptTarget::AddScript => EditorPane::AddScript(self.add_candidates()),
            ScriptTarget::Script(_) if self.is_bound() => EditorPane::Source(self.source()),
            _ => EditorPane::Placeholder(NO_SCRIPT_PLACEHOLDER),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Notification;

    fn shared(names: &[&str]) -> Rc<RefCell<ScriptCollection>> {
        let mut c = ScriptCollection::new();
        for name in names {
            c.add_script(name).unwrap();
        }
        Rc::new(RefCell::new(c))
    }

    #[test]
    fn test_edit_fires_autosave_update_and_minor_update() {
        let scripts = shared(&["mouseclick"]);
        let mut session = ScriptEditingSession::new();
        session
            .open(&scripts, ScriptTarget::Script("mouseclick".to_string()))
            .unwrap();
        let mut log: Vec<Notification> = Vec::new();

        assert_eq!(session.on_edit("stop()", &mut log), Ok(true));
        assert_eq!(session.on_edit("play()", &mut log), Ok(true));

        assert_eq!(
            log,
            vec![
                Notification::AutosaveRequested,
                Notification::MinorScriptUpdate("stop()".to_string()),
                Notification::AutosaveRequested,
                Notification::MinorScriptUpdate("play()".to_string()),
            ]
        );
        assert_eq!(scripts.borrow().script("mouseclick").unwrap().source(), "play()");
        assert!(session.autosave_pending());
    }

    #[test]
    fn test_edit_in_sentinel_states_is_noop() {
        let scripts = shared(&["load"]);
        let mut session = ScriptEditingSession::new();
        let mut log: Vec<Notification> = Vec::new();

        assert_eq!(session.on_edit("x", &mut log), Ok(false));

        session.bind(&scripts);
        assert_eq!(session.on_edit("x", &mut log), Ok(false));

        session.open_add_workflow();
        assert_eq!(session.on_edit("x", &mut log), Ok(false));

        assert!(log.is_empty());
        assert_eq!(scripts.borrow().script("load").unwrap().source(), "");
        assert!(!session.autosave_pending());
    }

    #[test]
    fn test_edit_after_collection_dropped_is_noop() {
        let scripts = shared(&["load"]);
        let mut session = ScriptEditingSession::new();
        session
            .open(&scripts, ScriptTarget::Script("load".to_string()))
            .unwrap();
        drop(scripts);

        let mut log: Vec<Notification> = Vec::new();
        assert_eq!(session.on_edit("x", &mut log), Ok(false));
        assert!(log.is_empty());
        assert!(!session.is_bound());
        assert_eq!(session.pane(), EditorPane::Placeholder(NO_SCRIPT_PLACEHOLDER));
    }

    #[test]
    fn test_edit_to_removed_script_reports_not_found() {
        let scripts = shared(&["load"]);
        let mut session = ScriptEditingSession::new();
        session
            .open(&scripts, ScriptTarget::Script("load".to_string()))
            .unwrap();
        scripts.borrow_mut().remove_script("load").unwrap();

        let mut log: Vec<Notification> = Vec::new();
        assert_eq!(
            session.on_edit("x", &mut log),
            Err(ScriptError::NotFound("load".to_string()))
        );
        assert_eq!(log, vec![Notification::AutosaveRequested]);
    }

    #[test]
    fn test_add_script_opens_it() {
        let scripts = shared(&[]);
        let mut session = ScriptEditingSession::new();
        session.open(&scripts, ScriptTarget::AddScript).unwrap();

        assert_eq!(session.add_script("mousedown"), Ok(true));
        assert_eq!(session.current_script(), Some("mousedown"));
        assert!(scripts.borrow().has_script("mousedown"));
        assert_eq!(session.pane(), EditorPane::Source(String::new()));
    }

    #[test]
    fn test_add_duplicate_keeps_session_state() {
        let scripts = shared(&["mousedown"]);
        let mut session = ScriptEditingSession::new();
        session.open(&scripts, ScriptTarget::AddScript).unwrap();

        assert_eq!(
            session.add_script("mousedown"),
            Err(ScriptError::NameConflict("mousedown".to_string()))
        );
        assert_eq!(session.target(), &ScriptTarget::AddScript);
        assert_eq!(scripts.borrow().len(), 1);
    }

    #[test]
    fn test_add_without_collection() {
        let mut session = ScriptEditingSession::new();
        assert_eq!(session.add_script("load"), Ok(false));
        assert_eq!(session.target(), &ScriptTarget::NoScript);
    }

    #[test]
    fn test_open_missing_script_fails() {
        let scripts = shared(&["load"]);
        let mut session = ScriptEditingSession::new();
        session.bind(&scripts);
        let other = shared(&[]);

        assert!(matches!(
            session.open(&other, ScriptTarget::Script("load".to_string())),
            Err(ScriptError::NotFound(_))
        ));
        assert!(Rc::ptr_eq(&session.collection().unwrap(), &scripts));
    }

    #[test]
    fn test_select_script_and_errors() {
        let scripts = shared(&["load", "update"]);
        let mut session = ScriptEditingSession::new();
        session.bind(&scripts);
        session.set_error("line 1: unexpected token");

        session.select_script("update").unwrap();
        assert_eq!(session.current_script(), Some("update"));
        assert_eq!(session.error(), None);

        assert!(matches!(
            session.select_script("keydown"),
            Err(ScriptError::NotFound(_))
        ));
        assert_eq!(session.current_script(), Some("update"));
    }

    #[test]
    fn test_add_workflow_lists_candidates_by_tab() {
        let scripts = shared(&["mousedown"]);
        let mut session = ScriptEditingSession::new();
        session.open(&scripts, ScriptTarget::AddScript).unwrap();
        assert_eq!(session.add_tab(), ScriptType::Mouse);

        let EditorPane::AddScript(candidates) = session.pane() else {
            panic!("expected add-script pane");
        };
        assert!(candidates.iter().all(|c| c.script_type == ScriptType::Mouse));
        assert!(candidates.iter().all(|c| c.name != "mousedown"));

        session.set_add_tab(ScriptType::Keyboard);
        let names: Vec<String> = session.add_candidates().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["keypressed", "keyreleased", "keydown"]);
    }

    #[test]
    fn test_tabs_sorted_and_selected() {
        let scripts = shared(&["keydown", "mouseclick", "load"]);
        let mut session = ScriptEditingSession::new();
        session
            .open(&scripts, ScriptTarget::Script("mouseclick".to_string()))
            .unwrap();

        let tabs = session.tabs();
        let labels: Vec<&str> = tabs.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["Load", "Mouseclick", "Keydown"]);
        let selected: Vec<bool> = tabs.iter().map(|t| t.selected).collect();
        assert_eq!(selected, vec![false, true, false]);
        assert_eq!(tabs[0].script_type, ScriptType::Timeline);
    }

    #[test]
    fn test_source_placeholder() {
        let scripts = shared(&["load"]);
        let mut session = ScriptEditingSession::new();
        assert_eq!(session.source(), NO_SCRIPT_PLACEHOLDER);

        session.bind(&scripts);
        assert_eq!(session.pane(), EditorPane::Placeholder(NO_SCRIPT_PLACEHOLDER));

        scripts.borrow_mut().update_script("load", "init()").unwrap();
        session.select_script("load").unwrap();
        assert_eq!(session.source(), "init()");
    }

    #[test]
    fn test_close_resets() {
        let scripts = shared(&["load"]);
        let mut session = ScriptEditingSession::new();
        session
            .open(&scripts, ScriptTarget::Script("load".to_string()))
            .unwrap();
        session.close();

        assert!(!session.is_bound());
        assert_eq!(session.target(), &ScriptTarget::NoScript);
        assert!(session.tabs().is_empty());
    }
}
