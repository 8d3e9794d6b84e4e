//! AnimInk Core Library
//!
//! Headless core of the AnimInk animation editor: the text tool state
//! machine, per-object scripts and the script editing session.

pub mod autosave;
pub mod config;
pub mod console;
pub mod editor;
pub mod input;
pub mod notify;
pub mod scene;
pub mod scripts;
pub mod session;
pub mod tools;

pub use autosave::AutosaveScheduler;
pub use config::{ConfigError, EditorConfig};
pub use console::{ConsoleCapture, ConsoleError, ConsoleRecord};
pub use editor::Editor;
pub use input::{MouseButton, PointerEvent};
pub use notify::{HostNotifier, Notification};
pub use scene::{Hit, ObjectId, Scene, SceneObject, SceneProvider, TextDefaults, TextObject};
pub use scripts::{ScriptCollection, ScriptError, ScriptResult, ScriptType, ScriptVocabulary};
pub use session::{EditorPane, ScriptEditingSession, ScriptTarget};
pub use tools::{Cursor, Tool, ToolBox, ToolContext, ToolKind};
