//! # fwlog
//! Colourful, plain, tabular and JSON log output with identifiers,
//! semantic hints and hex dumps of raw traffic.
//!
//! ## Usage
//! ```toml
//! // Cargo.toml
//! ...
//! [dependencies]
//! fwlog = "0.1.0"
//! ```
//!
//! ```rust
//! use fwlog::{Level, install};
//!
//! let _guard = install(Level::Debug, "fancy");
//! log::info!("Hello, world!");
//! log::info!(id = "conn-42", semantics = "success"; "Connected");
//! // guard flushes the output when dropped
//! ```
//!
//! ## Loggers with a persistent identifier
//! ```rust
//! use fwlog::{Logger, add_id_to_log, logger_config};
//!
//! let _guard = logger_config().with_style("colorful").init_global();
//! let log = Logger::new("server.uav");
//! let uav = add_id_to_log(&log, "UAV-17");
//! uav.warning("Battery low");
//! uav.critical("Lost contact");
//! ```
//!
//! ## Isolated sinks
//! Sinks built with [`ConfigBuilder::build_sink`] are not registered
//! globally, which keeps tests independent of each other.
//!
//! ```rust
//! use fwlog::{Direction, Level, LogMemory, Logger, log_hexdump, logger_config};
//!
//! let memory = LogMemory::default();
//! let sink = logger_config()
//!     .with_style("plain")
//!     .with_level(Level::Debug)
//!     .no_console()
//!     .with_writer(memory.clone())
//!     .build_sink();
//! let log = Logger::with_sink("net.client", sink);
//! log.error("connection lost");
//! log_hexdump(&log, b"\xde\xad\xbe\xef", Some("123"), Some(Direction::Out), Level::Debug);
//! drop(log); // the last handle flushes the writer thread
//! assert_eq!(memory.lines()[0], "ERROR:net.client::connection lost");
//! ```
//!
//! ## Logging to files
//! The log file is created if it does not exist and appended to if it does.
//!
//! ```rust
//! use fwlog::logger_config;
//!
//! let path = std::env::temp_dir().join("fwlog_doc_app.log");
//! std::fs::remove_file(&path).ok();
//! let guard = logger_config()
//!     .with_style("tabular")
//!     .with_log_file(&path)
//!     .expect("Unable to create log file")
//!     .no_console()
//!     .init_global();
//!
//! log::info!(target: "app.main", "Hello, world!");
//! drop(guard); // ensure logs are flushed
//! let contents = std::fs::read_to_string(&path).unwrap();
//! assert!(contents.ends_with("INFO\tapp.main\t\tHello, world!\n"));
//! ```

mod error;
pub mod integrations;
mod logger;

pub use error::Error;
pub use fwlog_core::{
    Direction, Extra, FormatterOptions, Level, LogMemory, LogRecord, LogSink, LogWriter,
    RecordBuffer, Semantics, Style, SymbolSet, format_hexdump,
};
pub use logger::{Logger, add_id_to_log, log_hexdump};

use fwlog_core::{
    FWLOG_CONFIG, Handler, LogFile, LogStderr, LogStdout, create_formatter, spawn_log_thread,
};
use log::{
    LevelFilter, Log,
    kv::{Key, Source},
};
use std::{
    io::IsTerminal,
    path::Path,
    sync::{Arc, LazyLock, RwLock},
};

/// Sinks receiving records from the `log` facade and from [`Logger::new`]
/// handles.
#[derive(Default)]
struct Dispatcher {
    sinks: RwLock<Vec<Arc<dyn LogSink>>>,
}

impl Dispatcher {
    fn emit(&self, record: &LogRecord) {
        if let Ok(sinks) = self.sinks.read() {
            for sink in sinks.iter() {
                sink.emit(record);
            }
        }
    }

    fn enabled(&self, level: Level) -> bool {
        self.sinks
            .read()
            .map(|sinks| sinks.iter().any(|sink| sink.enabled(level)))
            .unwrap_or(false)
    }

    fn attach(&self, sink: Arc<dyn LogSink>) {
        if let Ok(mut sinks) = self.sinks.write() {
            sinks.push(sink);
            if *BRIDGE_INSTALLED {
                update_max_level(&sinks);
            }
        }
    }

    fn detach(&self, sink: &Arc<dyn LogSink>) {
        if let Ok(mut sinks) = self.sinks.write() {
            sinks.retain(|other| !std::ptr::addr_eq(Arc::as_ptr(other), Arc::as_ptr(sink)));
            if *BRIDGE_INSTALLED {
                update_max_level(&sinks);
            }
        }
    }
}

/// Lets the `log` facade skip records no sink wants. Called with the write
/// lock held so that concurrent updates cannot leave a stale filter behind.
/// The filter belongs to whoever owns the facade, so it is left alone when
/// that is another logger.
fn update_max_level(sinks: &[Arc<dyn LogSink>]) {
    let most_verbose = [
        Level::Debug,
        Level::Info,
        Level::Warning,
        Level::Error,
        Level::Critical,
    ]
    .into_iter()
    .find(|level| sinks.iter().any(|sink| sink.enabled(*level)));
    log::set_max_level(most_verbose.map_or(LevelFilter::Off, LevelFilter::from));
}

static DISPATCHER: LazyLock<Dispatcher> = LazyLock::new(Dispatcher::default);

/// Whether the `log` facade forwards to [`DISPATCHER`].
static BRIDGE_INSTALLED: LazyLock<bool> =
    LazyLock::new(|| log::set_boxed_logger(Box::new(FWLogger)).is_ok());

/// Routes [`Logger::new`] handles to the process-wide sinks.
pub(crate) struct GlobalSink;

impl LogSink for GlobalSink {
    fn emit(&self, record: &LogRecord) {
        DISPATCHER.emit(record)
    }

    fn enabled(&self, level: Level) -> bool {
        DISPATCHER.enabled(level)
    }
}

/// Bridge from the `log` facade. The optional `id` and `semantics`
/// key-values become record extras; unknown semantics are ignored.
struct FWLogger;

impl Log for FWLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        DISPATCHER.enabled(metadata.level().into())
    }

    fn log(&self, record: &log::Record) {
        let level = Level::from(record.level());
        if !DISPATCHER.enabled(level) {
            return;
        }
        let key_values = record.key_values();
        let extra = Extra {
            id: key_values.get(Key::from_str("id")).map(|id| id.to_string()),
            semantics: key_values
                .get(Key::from_str("semantics"))
                .and_then(|semantics| semantics.to_string().parse().ok()),
        };
        let record =
            LogRecord::new(level, record.target(), record.args().to_string()).with_extra(extra);
        DISPATCHER.emit(&record);
    }

    fn flush(&self) {}
}

/// Console stream used by a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Console {
    Stdout,
    Stderr,
}

impl Console {
    pub fn is_terminal(self) -> bool {
        match self {
            Console::Stdout => std::io::stdout().is_terminal(),
            Console::Stderr => std::io::stderr().is_terminal(),
        }
    }
}

/// Fan-out over the handlers built from one [`ConfigBuilder`].
struct SinkGroup {
    handlers: Vec<Handler>,
}

impl LogSink for SinkGroup {
    fn emit(&self, record: &LogRecord) {
        for handler in &self.handlers {
            handler.emit(record);
        }
    }

    fn enabled(&self, level: Level) -> bool {
        self.handlers.iter().any(|handler| handler.enabled(level))
    }
}

/// Guard that detaches the sink installed by [`ConfigBuilder::init_global`]
/// and flushes its output when dropped.
pub struct LoggerGuard {
    sink: Arc<dyn LogSink>,
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        DISPATCHER.detach(&self.sink);
    }
}

/// Builder for configuring and initializing the logger.
pub struct ConfigBuilder {
    style: Style,
    level: Level,
    symbols: Option<SymbolSet>,
    colors: Option<bool>,
    timestamps: Option<bool>,
    console: Option<Console>,
    writers: Vec<Box<dyn LogWriter + Send>>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            style: Style::Fancy,
            level: Level::Info,
            symbols: None,
            colors: None,
            timestamps: None,
            console: Some(Console::Stderr),
            writers: Vec::new(),
        }
    }
}

impl ConfigBuilder {
    fn build_handlers(self) -> Vec<Handler> {
        let Self {
            style,
            level,
            symbols,
            colors,
            timestamps,
            console,
            writers,
        } = self;
        let symbols = symbols.unwrap_or_else(SymbolSet::detect);
        let options_for = |colors: bool| FormatterOptions {
            symbols,
            colors,
            timestamps,
        };
        let mut handlers = Vec::with_capacity(writers.len() + 1);
        if let Some(console) = console {
            let options = options_for(
                colors.unwrap_or_else(|| FWLOG_CONFIG.colors_enabled(console.is_terminal())),
            );
            let sender = match console {
                Console::Stdout => spawn_log_thread(LogStdout),
                Console::Stderr => spawn_log_thread(LogStderr),
            };
            handlers.push(Handler::new(
                level,
                create_formatter(style, &options),
                Arc::new(sender),
            ));
        }
        for writer in writers {
            let options = options_for(colors.unwrap_or(false));
            handlers.push(Handler::new(
                level,
                create_formatter(style, &options),
                Arc::new(spawn_log_thread(writer)),
            ));
        }
        handlers
    }

    /// Selects the output style by name (`fancy`, `colorful`, `symbolic`,
    /// `plain`, `journal`, `tabular`, `json`). Unknown names give unstyled
    /// `LEVEL:name:message` lines.
    pub fn with_style(self, style: &str) -> Self {
        Self {
            style: Style::from_key(style),
            ..self
        }
    }
    /// Minimum severity that gets through.
    pub fn with_level(self, level: Level) -> Self {
        Self { level, ..self }
    }
    /// Shows or hides timestamps in styles that support them.
    pub fn with_timestamps(self, yes: bool) -> Self {
        Self {
            timestamps: Some(yes),
            ..self
        }
    }
    /// Forces ANSI colours on or off.
    pub fn with_colors(self, yes: bool) -> Self {
        Self {
            colors: Some(yes),
            ..self
        }
    }
    pub fn with_symbols(self, symbols: SymbolSet) -> Self {
        Self {
            symbols: Some(symbols),
            ..self
        }
    }
    /// Adds a log file.
    pub fn with_log_file<P: AsRef<Path>>(self, path: P) -> Result<Self, Error> {
        Ok(self.with_writer(LogFile::new(path)?))
    }
    /// Maybe adds a log file.
    pub fn maybe_with_log_file<P: AsRef<Path>>(self, path: Option<P>) -> Result<Self, Error> {
        match path {
            Some(path) => self.with_log_file(path),
            None => Ok(self),
        }
    }
    /// Adds an arbitrary line writer.
    pub fn with_writer<W: LogWriter + Send + 'static>(mut self, writer: W) -> Self {
        self.writers.push(Box::new(writer));
        self
    }
    /// Ignore console logging
    pub fn no_console(self) -> Self {
        Self {
            console: None,
            ..self
        }
    }
    /// Logs to stdout instead of stderr.
    pub fn with_stdout(self) -> Self {
        Self {
            console: Some(Console::Stdout),
            ..self
        }
    }
    /// Builds a caller-owned sink without touching the global state.
    /// Output is flushed when the last reference is dropped.
    pub fn build_sink(self) -> Arc<dyn LogSink> {
        Arc::new(SinkGroup {
            handlers: self.build_handlers(),
        })
    }
    /// Adds a sink to the process-wide dispatcher. Every call adds another
    /// sink. Returns a guard that detaches and flushes it when dropped.
    #[must_use = "LoggerGuard must be kept alive to ensure logging works. Do \"let _guard = logger_config().init_global();\""]
    pub fn init_global(self) -> LoggerGuard {
        LazyLock::force(&BRIDGE_INSTALLED);
        let sink = self.build_sink();
        DISPATCHER.attach(Arc::clone(&sink));
        LoggerGuard { sink }
    }
    /// Like [`ConfigBuilder::init_global`], but fails without installing
    /// anything if another logger owns the `log` facade.
    pub fn try_init_global(self) -> Result<LoggerGuard, Error> {
        if !*BRIDGE_INSTALLED {
            return Err(Error::LoggerAlreadySet);
        }
        Ok(self.init_global())
    }
}

/// Returns a default ConfigBuilder for configuring the logger.
pub fn logger_config() -> ConfigBuilder {
    ConfigBuilder::default()
}

/// Sends records of `level` and above to the console in `style`.
#[must_use = "LoggerGuard must be kept alive to ensure logging works"]
pub fn install(level: Level, style: &str) -> LoggerGuard {
    logger_config().with_level(level).with_style(style).init_global()
}
