//! Notifications the core sends to its host.
//!
//! All notifications are synchronous callouts; the core never queues or
//! batches them. Hosts that prefer polling can record into a
//! `Vec<Notification>` and drain it after each event.

use crate::scene::ObjectId;

/// A single host notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The canvas changed (object created, edit committed).
    CanvasModified,
    /// A script's source changed in the editor.
    MinorScriptUpdate(String),
    /// Ask the host to persist the project soon.
    AutosaveRequested,
    /// The select tool picked a different object (or none).
    SelectionChanged(Option<ObjectId>),
}

/// Receiver of host notifications.
pub trait HostNotifier {
    fn notify(&mut self, notification: Notification);

    fn canvas_modified(&mut self) {
        self.notify(Notification::CanvasModified);
    }

    fn minor_script_update(&mut self, source: &str) {
        self.notify(Notification::MinorScriptUpdate(source.to_string()));
    }

    fn request_autosave(&mut self) {
        self.notify(Notification::AutosaveRequested);
    }
}

impl HostNotifier for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

/// Adapts a closure into a [`HostNotifier`].
pub struct FnNotifier<F: FnMut(Notification)>(pub F);

impl<F: FnMut(Notification)> HostNotifier for FnNotifier<F> {
    fn notify(&mut self, notification: Notification) {
        (self.0)(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_records_in_order() {
        let mut log: Vec<Notification> = Vec::new();
        log.request_autosave();
        log.minor_script_update("x = 1");
        log.canvas_modified();
        assert_eq!(
            log,
            vec![
                Notification::AutosaveRequested,
                Notification::MinorScriptUpdate("x = 1".to_string()),
                Notification::CanvasModified,
            ]
        );
    }

    #[test]
    fn test_fn_notifier() {
        let mut count = 0;
        {
            let mut notifier = FnNotifier(|_| count += 1);
            notifier.canvas_modified();
            notifier.request_autosave();
        }
        assert_eq!(count, 2);
    }
}
