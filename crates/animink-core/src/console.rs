//! Console capture for the script editor.
//!
//! Diagnostics travel through the `log` facade. A hub logger is installed
//! once per process; it forwards every record to the ambient channel (by
//! default an `env_logger` writing to stderr) and, while a
//! [`ConsoleCapture`] is attached, also appends the record to the most
//! recently attached capture's buffer. Dropping a capture removes exactly
//! that capture, whatever order captures are released in.

use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use thiserror::Error;

/// Console installation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsoleError {
    #[error("The console hub is already installed")]
    AlreadyInstalled,
    #[error("Another logger owns the diagnostic channel")]
    ForeignLogger,
}

/// One captured diagnostic line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleRecord {
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl ConsoleRecord {
    fn from_record(record: &Record<'_>) -> Self {
        Self {
            level: record.level(),
            target: record.target().to_string(),
            message: record.args().to_string(),
        }
    }
}

type Buffer = Arc<Mutex<Vec<ConsoleRecord>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Hub {
    fallback: OnceLock<Box<dyn Log>>,
    /// Attached captures, oldest first. The last one receives records.
    captures: Mutex<Vec<(u64, Buffer)>>,
    installed: AtomicBool,
    next_id: AtomicU64,
}

impl Hub {
    fn push(&self, buffer: Buffer) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.captures).push((id, buffer));
        id
    }

    fn release(&self, id: u64) {
        lock(&self.captures).retain(|(capture, _)| *capture != id);
    }

    fn active(&self) -> Option<Buffer> {
        lock(&self.captures)
            .last()
            .map(|(_, buffer)| Arc::clone(buffer))
    }
}

impl Log for Hub {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        if let Some(fallback) = self.fallback.get() {
            if fallback.enabled(record.metadata()) {
                fallback.log(record);
            }
        }
        // Append outside the stack lock so a concurrent release never waits on it.
        if let Some(buffer) = self.active() {
            lock(&buffer).push(ConsoleRecord::from_record(record));
        }
    }

    fn flush(&self) {
        if let Some(fallback) = self.fallback.get() {
            fallback.flush();
        }
    }
}

static HUB: Hub = Hub {
    fallback: OnceLock::new(),
    captures: Mutex::new(Vec::new()),
    installed: AtomicBool::new(false),
    next_id: AtomicU64::new(0),
};

/// Serializes installation so the outcome of `set_logger` is attributed
/// to the right caller.
static INSTALL: Mutex<()> = Mutex::new(());

/// Whether the hub is the process logger.
pub fn is_installed() -> bool {
    HUB.installed.load(Ordering::Acquire)
}

/// Install the hub as the process logger, forwarding to `fallback`.
///
/// Fails with [`ConsoleError::ForeignLogger`] when some other logger was
/// installed first; the hub is left uninstalled in that case.
pub fn install(fallback: Option<Box<dyn Log>>) -> Result<(), ConsoleError> {
    let _install = lock(&INSTALL);
    if is_installed() {
        return Err(ConsoleError::AlreadyInstalled);
    }
    log::set_logger(&HUB).map_err(|_| ConsoleError::ForeignLogger)?;
    if let Some(fallback) = fallback {
        // Only reachable once: `set_logger` succeeds a single time per process.
        let _ = HUB.fallback.set(fallback);
    }
    HUB.installed.store(true, Ordering::Release);
    log::set_max_level(LevelFilter::Trace);
    Ok(())
}

/// Install the hub with an `env_logger` fallback configured from
/// `RUST_LOG`.
pub fn install_default() -> Result<(), ConsoleError> {
    install_env_logger(env_logger::Builder::from_default_env())
}

/// Install the hub with an `env_logger` fallback built from `builder`.
pub fn install_env_logger(mut builder: env_logger::Builder) -> Result<(), ConsoleError> {
    install(Some(Box::new(builder.build())))
}

/// Number of captures currently attached.
pub fn attached_captures() -> usize {
    lock(&HUB.captures).len()
}

/// In-memory console fed by the diagnostic channel while attached.
///
/// Captures nest: the most recently attached live capture receives
/// records. Releasing a capture in any order only removes that capture.
pub struct ConsoleCapture {
    id: u64,
    buffer: Buffer,
}

impl ConsoleCapture {
    /// Start intercepting diagnostics. Installs the hub without a fallback
    /// if nothing was installed yet.
    ///
    /// Fails with [`ConsoleError::ForeignLogger`] when the process logger
    /// is not the hub, since records would never reach the capture.
    pub fn attach() -> Result<Self, ConsoleError> {
        if !is_installed() {
            match install(None) {
                Ok(()) | Err(ConsoleError::AlreadyInstalled) => {}
                Err(e) => return Err(e),
            }
        }
        let buffer: Buffer = Arc::new(Mutex::new(Vec::new()));
        let id = HUB.push(Arc::clone(&buffer));
        Ok(Self { id, buffer })
    }

    /// Stop intercepting. Equivalent to dropping the capture.
    pub fn detach(self) {}

    /// Snapshot of the captured records, oldest first.
    pub fn records(&self) -> Vec<ConsoleRecord> {
        lock(&self.buffer).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.buffer).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.buffer).is_empty()
    }

    /// Empty the buffer; interception continues.
    pub fn clear(&self) {
        lock(&self.buffer).clear();
    }
}

impl Drop for ConsoleCapture {
    fn drop(&mut self) {
        HUB.release(self.id);
    }
}

impl std::fmt::Debug for ConsoleCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleCapture")
            .field("id", &self.id)
            .field("records", &self.len())
            .finish()
    }
}

/// Serializes tests that attach captures, since the hub is process-wide.
#[cfg(test)]
pub(crate) fn test_guard() -> MutexGuard<'static, ()> {
    static SERIAL: Mutex<()> = Mutex::new(());
    lock(&SERIAL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const TARGET: &str = "console_test";

    fn ours(capture: &ConsoleCapture) -> Vec<String> {
        capture
            .records()
            .into_iter()
            .filter(|r| r.target == TARGET)
            .map(|r| r.message)
            .collect()
    }

    #[test]
    fn test_capture_collects_in_order() {
        let _serial = test_guard();
        let capture = ConsoleCapture::attach().unwrap();
        log::info!(target: TARGET, "first");
        log::warn!(target: TARGET, "second {}", 2);

        assert_eq!(ours(&capture), vec!["first", "second 2"]);
        let levels: Vec<Level> = capture
            .records()
            .into_iter()
            .filter(|r| r.target == TARGET)
            .map(|r| r.level)
            .collect();
        assert_eq!(levels, vec![Level::Info, Level::Warn]);
    }

    #[test]
    fn test_clear_keeps_intercepting() {
        let _serial = test_guard();
        let capture = ConsoleCapture::attach().unwrap();
        log::info!(target: TARGET, "before");
        capture.clear();
        assert!(ours(&capture).is_empty());

        log::info!(target: TARGET, "after");
        assert_eq!(ours(&capture), vec!["after"]);
    }

    #[test]
    fn test_detach_stops_capture() {
        let _serial = test_guard();
        let capture = ConsoleCapture::attach().unwrap();
        let buffer = Arc::clone(&capture.buffer);
        capture.detach();

        log::info!(target: TARGET, "unseen");
        assert!(lock(&buffer).iter().all(|r| r.target != TARGET));
        assert_eq!(attached_captures(), 0);
    }

    #[test]
    fn test_nested_capture_restores_outer() {
        let _serial = test_guard();
        let outer = ConsoleCapture::attach().unwrap();
        {
            let inner = ConsoleCapture::attach().unwrap();
            log::info!(target: TARGET, "inner");
            assert_eq!(ours(&inner), vec!["inner"]);
        }
        log::info!(target: TARGET, "outer");
        assert_eq!(ours(&outer), vec!["outer"]);
    }

    #[test]
    fn test_out_of_order_release() {
        let _serial = test_guard();
        let outer = ConsoleCapture::attach().unwrap();
        let inner = ConsoleCapture::attach().unwrap();
        let outer_buffer = Arc::clone(&outer.buffer);

        drop(outer);
        log::info!(target: TARGET, "still inner");
        assert_eq!(ours(&inner), vec!["still inner"]);

        drop(inner);
        log::info!(target: TARGET, "after both");
        assert!(lock(&outer_buffer).iter().all(|r| r.target != TARGET));
        assert_eq!(attached_captures(), 0);
    }

    #[test]
    fn test_release_during_concurrent_logging() {
        let _serial = test_guard();
        drop(ConsoleCapture::attach().unwrap());
        let stop = Arc::new(AtomicBool::new(false));

        let writer = {
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let mut written = 0u64;
                while !stop.load(Ordering::Relaxed) {
                    log::info!(target: TARGET, "tick {}", written);
                    written += 1;
                }
                written
            })
        };

        for _ in 0..200 {
            let outer = ConsoleCapture::attach().unwrap();
            let inner = ConsoleCapture::attach().unwrap();
            drop(outer);
            thread::yield_now();
            inner.detach();
        }
        stop.store(true, Ordering::Relaxed);
        assert!(writer.join().unwrap() > 0);

        assert_eq!(attached_captures(), 0);
        let capture = ConsoleCapture::attach().unwrap();
        log::info!(target: TARGET, "fresh");
        assert_eq!(ours(&capture), vec!["fresh"]);
    }

    #[test]
    fn test_second_install_rejected() {
        let _serial = test_guard();
        drop(ConsoleCapture::attach().unwrap());
        assert!(is_installed());
        assert_eq!(install(None), Err(ConsoleError::AlreadyInstalled));
        assert_eq!(install_default(), Err(ConsoleError::AlreadyInstalled));
    }
}
