use std::{fmt::Display, sync::Arc};

use fwlog_core::{
    Direction, Extra, Level, LogRecord, LogSink, NullSink, format_hexdump, hexdump_extra,
};

use crate::GlobalSink;

/// Named logging handle carrying default extras.
///
/// Handles created with [`Logger::new`] write to the process-wide sinks
/// installed through [`crate::logger_config`]; [`Logger::with_sink`] binds a
/// handle to a caller-owned sink instead.
#[derive(Clone)]
pub struct Logger {
    name: Arc<str>,
    extra: Extra,
    sink: Arc<dyn LogSink>,
}

impl Logger {
    pub fn new(name: &str) -> Self {
        Self::with_sink(name, Arc::new(GlobalSink))
    }

    pub fn with_sink(name: &str, sink: Arc<dyn LogSink>) -> Self {
        Self {
            name: name.into(),
            extra: Extra::default(),
            sink,
        }
    }

    /// A logger that discards everything.
    pub fn null(name: &str) -> Self {
        Self::with_sink(name, Arc::new(NullSink))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extra(&self) -> &Extra {
        &self.extra
    }

    /// Logger named `<name>.<suffix>` sharing sink and extras.
    pub fn child(&self, suffix: &str) -> Self {
        Self {
            name: format!("{}.{suffix}", self.name).into(),
            ..self.clone()
        }
    }

    /// Replaces the extras added to every record.
    pub fn with_extra(self, extra: Extra) -> Self {
        Self { extra, ..self }
    }

    pub fn enabled(&self, level: Level) -> bool {
        self.sink.enabled(level)
    }

    pub fn log(&self, level: Level, message: impl Display) {
        self.log_with(level, message, Extra::default());
    }

    /// Logs with per-call extras; those win over the logger's defaults.
    pub fn log_with(&self, level: Level, message: impl Display, extra: Extra) {
        if !self.sink.enabled(level) {
            return;
        }
        let record = LogRecord::new(level, &*self.name, message.to_string())
            .with_extra(extra.merged_over(&self.extra));
        self.sink.emit(&record);
    }

    pub fn debug(&self, message: impl Display) {
        self.log(Level::Debug, message)
    }

    pub fn info(&self, message: impl Display) {
        self.log(Level::Info, message)
    }

    pub fn warning(&self, message: impl Display) {
        self.log(Level::Warning, message)
    }

    pub fn error(&self, message: impl Display) {
        self.log(Level::Error, message)
    }

    pub fn critical(&self, message: impl Display) {
        self.log(Level::Critical, message)
    }
}

/// Returns a copy of `log` that tags every record with `id`.
pub fn add_id_to_log(log: &Logger, id: impl Into<String>) -> Logger {
    let extra = log.extra().clone().with_id(id);
    log.clone().with_extra(extra)
}

/// Logs the hex dump of `data`, typically a chunk of network traffic.
///
/// The direction becomes the record's semantics and the last ten characters
/// of `address` its identifier.
pub fn log_hexdump(
    log: &Logger,
    data: &[u8],
    address: Option<&str>,
    direction: Option<Direction>,
    level: Level,
) {
    if !log.enabled(level) {
        return;
    }
    log.log_with(level, format_hexdump(data), hexdump_extra(address, direction));
}
