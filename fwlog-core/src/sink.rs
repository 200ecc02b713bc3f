use std::sync::{Arc, Mutex};

use crate::{
    formatter::Formatter,
    record::{Level, LogRecord},
    utils::LogSender,
};

/// Receiver of log records.
pub trait LogSink: Send + Sync {
    fn emit(&self, record: &LogRecord);

    /// Whether a record of `level` would be kept.
    fn enabled(&self, _level: Level) -> bool {
        true
    }
}

/// Formats records on the calling thread and queues the result on a writer
/// thread. Formatting and queueing happen under one lock, so lines reach the
/// writer in the order their timestamps were de-duplicated.
pub struct Handler {
    level: Level,
    formatter: Box<dyn Formatter>,
    sender: Arc<LogSender>,
    queue: Mutex<()>,
}

impl Handler {
    pub fn new(level: Level, formatter: Box<dyn Formatter>, sender: Arc<LogSender>) -> Self {
        Self {
            level,
            formatter,
            sender,
            queue: Mutex::new(()),
        }
    }
}

impl LogSink for Handler {
    fn emit(&self, record: &LogRecord) {
        if record.level < self.level {
            return;
        }
        let _queue = match self.queue.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.sender.line(self.formatter.format(record));
    }

    fn enabled(&self, level: Level) -> bool {
        level >= self.level
    }
}

/// Discards every record.
#[derive(Default, Debug, Clone, Copy)]
pub struct NullSink;

impl LogSink for NullSink {
    fn emit(&self, _record: &LogRecord) {}

    fn enabled(&self, _level: Level) -> bool {
        false
    }
}

/// Keeps every record it receives.
#[derive(Default, Debug)]
pub struct RecordBuffer {
    records: Mutex<Vec<LogRecord>>,
}

impl RecordBuffer {
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    pub fn take(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .map(|mut records| std::mem::take(&mut *records))
            .unwrap_or_default()
    }
}

impl LogSink for RecordBuffer {
    fn emit(&self, record: &LogRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record.clone());
        }
    }
}
