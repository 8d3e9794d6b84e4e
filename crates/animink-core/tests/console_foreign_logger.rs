//! A process whose logger was installed by someone else cannot be captured.

use animink_core::console::{self, ConsoleCapture, ConsoleError};
use animink_core::{Editor, EditorConfig};
use log::{LevelFilter, Log, Metadata, Record};

struct HostLogger;

impl Log for HostLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, _record: &Record<'_>) {}

    fn flush(&self) {}
}

static HOST: HostLogger = HostLogger;

#[test]
fn test_attach_reports_foreign_logger() {
    log::set_logger(&HOST).unwrap();
    log::set_max_level(LevelFilter::Info);

    assert_eq!(ConsoleCapture::attach().unwrap_err(), ConsoleError::ForeignLogger);
    assert!(!console::is_installed());
    assert_eq!(console::attached_captures(), 0);

    // Repeated attempts keep reporting the real cause.
    assert_eq!(console::install_default(), Err(ConsoleError::ForeignLogger));
    assert_eq!(console::install(None), Err(ConsoleError::ForeignLogger));

    let mut editor = Editor::new(&EditorConfig::default());
    assert_eq!(editor.open_code_editor(), Err(ConsoleError::ForeignLogger));
    assert!(editor.console().is_none());
}
