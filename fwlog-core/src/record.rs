use std::{fmt, str::FromStr};

use chrono::{DateTime, Local};

/// Severity of a log record, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Level {
    pub fn name(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warning,
            log::Level::Info => Level::Info,
            log::Level::Debug | log::Level::Trace => Level::Debug,
        }
    }
}

/// Most permissive `log` filter whose records all map to `level` or above.
impl From<Level> for log::LevelFilter {
    fn from(level: Level) -> Self {
        match level {
            Level::Debug => log::LevelFilter::Trace,
            Level::Info => log::LevelFilter::Info,
            Level::Warning => log::LevelFilter::Warn,
            Level::Error | Level::Critical => log::LevelFilter::Error,
        }
    }
}

/// Application-level hint that selects a colour or symbol independently of
/// the severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Semantics {
    Inbound,
    Outbound,
    Request,
    ResponseSuccess,
    ResponseError,
    Notification,
    Success,
    Failure,
}

impl Semantics {
    pub const ALL: [Semantics; 8] = [
        Semantics::Inbound,
        Semantics::Outbound,
        Semantics::Request,
        Semantics::ResponseSuccess,
        Semantics::ResponseError,
        Semantics::Notification,
        Semantics::Success,
        Semantics::Failure,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Semantics::Inbound => "inbound",
            Semantics::Outbound => "outbound",
            Semantics::Request => "request",
            Semantics::ResponseSuccess => "response_success",
            Semantics::ResponseError => "response_error",
            Semantics::Notification => "notification",
            Semantics::Success => "success",
            Semantics::Failure => "failure",
        }
    }
}

impl fmt::Display for Semantics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSemantics(pub String);

impl fmt::Display for UnknownSemantics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown log semantics: {:?}", self.0)
    }
}

impl std::error::Error for UnknownSemantics {}

impl FromStr for Semantics {
    type Err = UnknownSemantics;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Semantics::ALL
            .into_iter()
            .find(|semantics| semantics.as_str() == s)
            .ok_or_else(|| UnknownSemantics(s.to_string()))
    }
}

/// Optional attributes attached to a record by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extra {
    pub id: Option<String>,
    pub semantics: Option<Semantics>,
}

impl Extra {
    pub fn with_id(self, id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..self
        }
    }

    pub fn with_semantics(self, semantics: Semantics) -> Self {
        Self {
            semantics: Some(semantics),
            ..self
        }
    }

    /// Values set here win; missing ones are taken from `defaults`.
    pub fn merged_over(self, defaults: &Extra) -> Self {
        Self {
            id: self.id.or_else(|| defaults.id.clone()),
            semantics: self.semantics.or(defaults.semantics),
        }
    }
}

/// One log event, as handed to a formatter.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub name: String,
    pub message: String,
    pub extra: Extra,
}

impl LogRecord {
    pub fn new(level: Level, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            name: name.into(),
            message: message.into(),
            extra: Extra::default(),
        }
    }

    pub fn at(self, timestamp: DateTime<Local>) -> Self {
        Self { timestamp, ..self }
    }

    pub fn with_extra(self, extra: Extra) -> Self {
        Self { extra, ..self }
    }

    pub fn with_id(self, id: impl Into<String>) -> Self {
        Self {
            extra: self.extra.with_id(id),
            ..self
        }
    }

    pub fn with_semantics(self, semantics: Semantics) -> Self {
        Self {
            extra: self.extra.with_semantics(semantics),
            ..self
        }
    }

    /// Identifier or the empty string.
    pub fn id(&self) -> &str {
        self.extra.id.as_deref().unwrap_or("")
    }

    pub fn semantics(&self) -> Option<Semantics> {
        self.extra.semantics
    }
}

/// Last component of a logger name. Both `.` and `:` count as separators so
/// that Rust module paths shorten the same way as dotted names.
pub fn short_name(name: &str) -> &str {
    name.rsplit(|c: char| c == '.' || c == ':').next().unwrap_or(name)
}
