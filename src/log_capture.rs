//! Log capture for unit tests
//!
//! Records are collected per thread, so tests running in parallel only see
//! what they logged themselves.

use std::cell::RefCell;
use std::sync::Once;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured {
    pub level: Level,
    pub message: String,
}

thread_local! {
    static ACTIVE: RefCell<Option<Vec<Captured>>> = const { RefCell::new(None) };
}

struct CaptureLogger;

static LOGGER: CaptureLogger = CaptureLogger;
static INSTALL: Once = Once::new();

impl Log for CaptureLogger {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        ACTIVE.with(|active| {
            if let Some(records) = active.borrow_mut().as_mut() {
                records.push(Captured {
                    level: record.level(),
                    message: record.args().to_string(),
                });
            }
        });
    }

    fn flush(&self) {}
}

/// Run `f`, returning its result and everything it logged on this thread
pub fn capture<T>(f: impl FnOnce() -> T) -> (T, Vec<Captured>) {
    INSTALL.call_once(|| {
        // Another logger may already be installed; then nothing is captured
        // and the assertions below the call will say so.
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(LevelFilter::Trace);
    });

    ACTIVE.with(|active| *active.borrow_mut() = Some(Vec::new()));
    let result = f();
    let records = ACTIVE.with(|active| active.borrow_mut().take().unwrap_or_default());
    (result, records)
}

/// Captured errors only
pub fn errors(records: &[Captured]) -> Vec<&str> {
    records
        .iter()
        .filter(|r| r.level == Level::Error)
        .map(|r| r.message.as_str())
        .collect()
}
