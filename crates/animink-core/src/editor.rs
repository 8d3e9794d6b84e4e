//! Headless editor host.
//!
//! Wires the scene, the tool box, per-object script collections, the script
//! editing session and the console together the way an application shell
//! would. Notifications are recorded for the shell to drain after each
//! event.

use crate::autosave::AutosaveScheduler;
use crate::config::EditorConfig;
use crate::console::{ConsoleCapture, ConsoleError};
use crate::input::PointerEvent;
use crate::notify::{HostNotifier, Notification};
use crate::scene::{ObjectId, Scene, SceneObject};
use crate::scripts::{ScriptCollection, ScriptResult, ScriptVocabulary};
use crate::session::{ScriptEditingSession, ScriptTarget};
use crate::tools::{Cursor, ToolBox, ToolContext, ToolKind};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

pub struct Editor {
    scene: Scene,
    tools: ToolBox,
    /// Scripts of each object that has any, keyed by object id.
    scripts: HashMap<ObjectId, Rc<RefCell<ScriptCollection>>>,
    vocabulary: Arc<ScriptVocabulary>,
    session: ScriptEditingSession,
    autosave: AutosaveScheduler,
    notifications: Vec<Notification>,
    /// Attached while the code editor is open.
    console: Option<ConsoleCapture>,
    selected: Option<ObjectId>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: &EditorConfig) -> Self {
        Self::with_vocabulary(config, ScriptVocabulary::shared())
    }

    pub fn with_vocabulary(config: &EditorConfig, vocabulary: Arc<ScriptVocabulary>) -> Self {
        Self {
            scene: Scene::new().with_tolerance(config.hit_tolerance),
            tools: ToolBox::new(config.text.clone()),
            scripts: HashMap::new(),
            vocabulary,
            session: ScriptEditingSession::new().with_add_tab(config.add_script_tab),
            autosave: AutosaveScheduler::new(Duration::from_secs(config.autosave_interval_secs)),
            notifications: Vec::new(),
            console: None,
            selected: None,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn tools(&self) -> &ToolBox {
        &self.tools
    }

    pub fn session(&self) -> &ScriptEditingSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ScriptEditingSession {
        &mut self.session
    }

    pub fn autosave(&self) -> &AutosaveScheduler {
        &self.autosave
    }

    pub fn autosave_mut(&mut self) -> &mut AutosaveScheduler {
        &mut self.autosave
    }

    pub fn cursor(&self) -> Cursor {
        self.tools.cursor()
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    /// Scripts attached to `id`, if any were ever opened.
    pub fn scripts_of(&self, id: ObjectId) -> Option<Rc<RefCell<ScriptCollection>>> {
        self.scripts.get(&id).cloned()
    }

    /// Drain the notifications recorded since the last call.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn set_tool(&mut self, kind: ToolKind) {
        let mark = self.notifications.len();
        let mut ctx = ToolContext::new(&mut self.scene, &mut self.notifications);
        self.tools.set_tool(kind, &mut ctx);
        self.react(mark);
    }

    /// Feed a pointer event to the active tool.
    pub fn pointer(&mut self, event: PointerEvent) {
        let mark = self.notifications.len();
        let mut ctx = ToolContext::new(&mut self.scene, &mut self.notifications);
        self.tools.dispatch(event, &mut ctx);
        self.react(mark);
    }

    /// The canvas lost focus: the active tool wraps up whatever it was doing.
    pub fn blur(&mut self) {
        let mark = self.notifications.len();
        let mut ctx = ToolContext::new(&mut self.scene, &mut self.notifications);
        self.tools.deactivate(&mut ctx);
        self.react(mark);
    }

    /// Select an object (or nothing) from outside the canvas.
    ///
    /// Nested objects resolve to their top-level ancestor, since scripts
    /// attach to directly addressable objects.
    pub fn select_object(&mut self, id: Option<ObjectId>) {
        let id = id
            .filter(|id| self.scene.contains(*id))
            .map(|id| self.scene.top_level_ancestor(id));
        if self.tools.select_tool_mut().set_selected(id) {
            self.notifications.notify(Notification::SelectionChanged(id));
            self.bind_scripts(id);
        }
    }

    /// Remove an object from the scene along with its scripts.
    ///
    /// An edit in progress on the object, or on anything nested in it, is
    /// committed first.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<SceneObject> {
        let doomed = self.scene.subtree(id);
        if doomed.is_empty() {
            return None;
        }
        {
            let mut ctx = ToolContext::new(&mut self.scene, &mut self.notifications);
            for doomed_id in doomed {
                self.tools.text_tool_mut().forget(doomed_id, &mut ctx);
            }
        }
        let object = self.scene.remove(id)?;
        self.scripts.retain(|object_id, _| self.scene.contains(*object_id));
        if self.selected.is_some_and(|s| !self.scene.contains(s)) {
            self.select_object(None);
        }
        self.notifications.canvas_modified();
        Some(object)
    }

    /// Open the code editor surface and start capturing the console.
    ///
    /// Fails when the process logger is not the console hub; the editor
    /// surface stays closed in that case.
    pub fn open_code_editor(&mut self) -> Result<(), ConsoleError> {
        if self.console.is_none() {
            self.console = Some(ConsoleCapture::attach()?);
        }
        if let Some(id) = self.selected {
            self.bind_scripts(Some(id));
        }
        Ok(())
    }

    /// Close the code editor surface, releasing the console.
    pub fn close_code_editor(&mut self) {
        self.console = None;
        self.session.close();
    }

    pub fn console(&self) -> Option<&ConsoleCapture> {
        self.console.as_ref()
    }

    pub fn clear_console(&self) {
        if let Some(console) = &self.console {
            console.clear();
        }
    }

    /// Show a script of the selected object, or the add-script picker.
    pub fn edit_script(&mut self, target: ScriptTarget) -> ScriptResult<()> {
        match target {
            ScriptTarget::NoScript => {
                if let Some(collection) = self.session.collection() {
                    self.session.bind(&collection);
                }
                Ok(())
            }
            ScriptTarget::AddScript => {
                self.session.open_add_workflow();
                Ok(())
            }
            ScriptTarget::Script(name) => self.session.select_script(&name),
        }
    }

    /// Add a script to the selected object and open it.
    pub fn add_script(&mut self, name: &str) -> ScriptResult<bool> {
        let added = self.session.add_script(name)?;
        if added {
            self.notifications.request_autosave();
            self.autosave.request();
        }
        Ok(added)
    }

    /// Forward an edit from the code widget.
    pub fn edit_source(&mut self, source: &str) -> ScriptResult<bool> {
        let mark = self.notifications.len();
        let result = self.session.on_edit(source, &mut self.notifications);
        self.react(mark);
        result
    }

    /// Apply host-side effects of notifications recorded since `mark`.
    fn react(&mut self, mark: usize) {
        let fresh: Vec<Notification> = self.notifications[mark..].to_vec();
        for notification in fresh {
            match notification {
                Notification::AutosaveRequested => self.autosave.request(),
                Notification::SelectionChanged(id) => self.bind_scripts(id),
                Notification::CanvasModified | Notification::MinorScriptUpdate(_) => {}
            }
        }
    }

    fn bind_scripts(&mut self, id: Option<ObjectId>) {
        self.selected = id;
        let Some(id) = id else {
            self.session.close();
            return;
        };
        let collection = self
            .scripts
            .entry(id)
            .or_insert_with(|| {
                Rc::new(RefCell::new(ScriptCollection::with_vocabulary(Arc::clone(
                    &self.vocabulary,
                ))))
            })
            .clone();
        self.session.bind(&collection);
    }
}
