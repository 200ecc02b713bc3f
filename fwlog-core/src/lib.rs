//! # fwlog-core
//! Record model, formatters, hex dumps and output plumbing shared by fwlog.

mod config;
mod formatter;
mod hexdump;
mod log_writer;
mod record;
mod render;
mod sink;
mod style;
mod utils;

pub use config::{FWLOG_CONFIG, FWLogConfig};
pub use formatter::{
    BareFormatter, FancyFormatter, Formatter, FormatterOptions, JsonFormatter, PlainFormatter,
    PlainLayout, Style, TabularFormatter, create_formatter,
};
pub use hexdump::{Direction, format_hexdump, hexdump_extra};
pub use log_writer::{LogFile, LogMemory, LogStderr, LogStdout, LogWriter};
pub use record::{Extra, Level, LogRecord, Semantics, UnknownSemantics, short_name};
pub use render::{ShortNameCache, TimestampSlot, indent_continuation, pad_field};
pub use sink::{Handler, LogSink, NullSink, RecordBuffer};
pub use style::{ColorTable, Paint, RESET, StyleConfig, SymbolSet, SymbolTable};
pub use utils::{LogMessage, LogSender, spawn_log_thread};
