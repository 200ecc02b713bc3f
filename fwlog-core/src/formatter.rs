use std::io::IsTerminal;

use colored::Color;
use serde::Serialize;

use crate::{
    config::FWLOG_CONFIG,
    record::LogRecord,
    render::{
        ID_WIDTH, NAME_WIDTH, ShortNameCache, TIMESTAMP_WIDTH, TimestampSlot, indent_continuation,
        pad_field,
    },
    style::{Paint, RESET, StyleConfig, SymbolSet},
};

/// Turns a record into one output line (which may span several physical
/// lines). Formatting never fails.
pub trait Formatter: Send + Sync {
    fn format(&self, record: &LogRecord) -> String;
}

const NAME_PAINT: Paint = Paint::Plain(Color::Cyan);
const ID_PAINT: Paint = Paint::Bold(Color::Black);
const TIMESTAMP_PAINT: Paint = Paint::Bold(Color::Black);

/// Human-oriented, optionally colourised output:
/// symbol, short name, identifier, timestamp and message.
pub struct FancyFormatter {
    style: StyleConfig,
    names: ShortNameCache,
    last_timestamp: TimestampSlot,
}

impl FancyFormatter {
    pub fn new(style: StyleConfig) -> Self {
        Self {
            style,
            names: ShortNameCache::default(),
            last_timestamp: TimestampSlot::default(),
        }
    }

    /// Number of columns in front of the message.
    pub fn continuation_padding(&self) -> usize {
        if let Some(padding) = self.style.continuation_padding {
            return padding;
        }
        let mut padding = 2;
        if self.style.show_name {
            padding += NAME_WIDTH + 1;
        }
        if self.style.show_id {
            padding += ID_WIDTH + 1;
        }
        if self.style.show_timestamp {
            padding += TIMESTAMP_WIDTH + 1;
        }
        padding
    }

    fn paint(&self, paint: Option<Paint>) -> String {
        match paint {
            Some(paint) if self.style.use_colors => paint.escape(),
            _ => String::new(),
        }
    }

    fn reset(&self) -> &'static str {
        if self.style.use_colors { RESET } else { "" }
    }
}

impl Formatter for FancyFormatter {
    fn format(&self, record: &LogRecord) -> String {
        let style = &self.style;
        let semantics = record.semantics();
        let message_paint = style.colors.resolve(record.level, semantics);
        let symbol_paint = style
            .symbol_colors
            .resolve(record.level, semantics)
            .or(message_paint);
        let symbol = style.symbols.resolve(record.level, semantics);
        let reset = self.reset();

        let mut line = format!(
            "{}{}{reset} ",
            self.paint(symbol_paint),
            pad_field(symbol, 1)
        );
        if style.show_name {
            let short = self.names.get(&record.name);
            line += &format!(
                "{}{}{reset} ",
                self.paint(Some(NAME_PAINT)),
                pad_field(&short, NAME_WIDTH)
            );
        }
        if style.show_id {
            line += &format!(
                "{}{}{reset} ",
                self.paint(Some(ID_PAINT)),
                pad_field(record.id(), ID_WIDTH)
            );
        }
        if style.show_timestamp {
            let stamp = record.timestamp.format("[%H:%M:%S]").to_string();
            line += &format!(
                "{}{}{reset} ",
                self.paint(Some(TIMESTAMP_PAINT)),
                self.last_timestamp.render(&stamp)
            );
        }
        line += &self.paint(message_paint);
        line += &indent_continuation(&record.message, self.continuation_padding());
        if style.use_colors && !line.ends_with(RESET) {
            line += RESET;
        }
        line
    }
}

/// Field layout of [`PlainFormatter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlainLayout {
    /// `LEVEL:name:id:message`
    Full,
    /// `short:id: message`, or `short: message` without an identifier.
    /// Meant for system journals, which add their own timestamps.
    Journal,
}

/// Colourless single-line output.
pub struct PlainFormatter {
    layout: PlainLayout,
    names: ShortNameCache,
}

impl PlainFormatter {
    pub fn new(layout: PlainLayout) -> Self {
        Self {
            layout,
            names: ShortNameCache::default(),
        }
    }
}

impl Formatter for PlainFormatter {
    fn format(&self, record: &LogRecord) -> String {
        match self.layout {
            PlainLayout::Full => format!(
                "{}:{}:{}:{}",
                record.level,
                record.name,
                record.id(),
                record.message
            ),
            PlainLayout::Journal => {
                let short = self.names.get(&record.name);
                match record.id() {
                    "" => format!("{short}: {}", record.message),
                    id => format!("{short}:{id}: {}", record.message),
                }
            }
        }
    }
}

/// Tab-separated output for post-processing:
/// `[timestamp]`, level, logger name, identifier, message.
pub struct TabularFormatter {
    show_timestamp: bool,
}

impl TabularFormatter {
    pub fn new(show_timestamp: bool) -> Self {
        Self { show_timestamp }
    }
}

impl Formatter for TabularFormatter {
    fn format(&self, record: &LogRecord) -> String {
        let mut fields = Vec::with_capacity(5);
        if self.show_timestamp {
            fields.push(
                record
                    .timestamp
                    .format("%Y-%m-%d %H:%M:%S%.3f")
                    .to_string(),
            );
        }
        fields.push(record.level.name().to_string());
        fields.push(record.name.clone());
        fields.push(record.id().to_string());
        fields.push(record.message.clone());
        fields.join("\t")
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonLine<'a> {
    timestamp: String,
    level: &'static str,
    logger_name: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    semantics: Option<&'static str>,
}

/// One JSON object per record, for log collectors.
#[derive(Default)]
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, record: &LogRecord) -> String {
        let line = JsonLine {
            timestamp: record
                .timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Millis, false),
            level: record.level.name(),
            logger_name: &record.name,
            message: &record.message,
            id: record.extra.id.as_deref(),
            semantics: record.semantics().map(|s| s.as_str()),
        };
        serde_json::to_string(&line).unwrap_or_else(|_| BareFormatter.format(record))
    }
}

/// `LEVEL:name:message`, used when a style name is not recognised.
#[derive(Default)]
pub struct BareFormatter;

impl Formatter for BareFormatter {
    fn format(&self, record: &LogRecord) -> String {
        format!("{}:{}:{}", record.level, record.name, record.message)
    }
}

/// Named output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Fancy,
    /// Fancy without the identifier column.
    Colorful,
    /// Fancy without identifier and name columns.
    Symbolic,
    Plain,
    Journal,
    Tabular,
    Json,
    Bare,
}

impl Style {
    /// Resolves a style name; unknown names give [`Style::Bare`].
    pub fn from_key(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "fancy" => Style::Fancy,
            "colorful" => Style::Colorful,
            "symbolic" => Style::Symbolic,
            "plain" => Style::Plain,
            "journal" => Style::Journal,
            "tabular" => Style::Tabular,
            "json" => Style::Json,
            _ => Style::Bare,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Style::Fancy => "fancy",
            Style::Colorful => "colorful",
            Style::Symbolic => "symbolic",
            Style::Plain => "plain",
            Style::Journal => "journal",
            Style::Tabular => "tabular",
            Style::Json => "json",
            Style::Bare => "bare",
        }
    }
}

/// Runtime choices that apply across styles.
#[derive(Debug, Clone, Copy)]
pub struct FormatterOptions {
    pub symbols: SymbolSet,
    pub colors: bool,
    /// `None` keeps the style's own default.
    pub timestamps: Option<bool>,
}

/// Defaults suit the stderr console.
impl Default for FormatterOptions {
    fn default() -> Self {
        Self {
            symbols: SymbolSet::detect(),
            colors: FWLOG_CONFIG.colors_enabled(std::io::stderr().is_terminal()),
            timestamps: None,
        }
    }
}

pub fn create_formatter(style: Style, options: &FormatterOptions) -> Box<dyn Formatter> {
    let fancy = |show_name: bool, show_id: bool| {
        let mut config = StyleConfig::fancy(options.symbols);
        config.show_name = show_name;
        config.show_id = show_id;
        config.show_timestamp = options.timestamps.unwrap_or(false);
        config.use_colors = options.colors;
        Box::new(FancyFormatter::new(config)) as Box<dyn Formatter>
    };
    match style {
        Style::Fancy => fancy(true, true),
        Style::Colorful => fancy(true, false),
        Style::Symbolic => fancy(false, false),
        Style::Plain => Box::new(PlainFormatter::new(PlainLayout::Full)),
        Style::Journal => Box::new(PlainFormatter::new(PlainLayout::Journal)),
        Style::Tabular => Box::new(TabularFormatter::new(options.timestamps.unwrap_or(true))),
        Style::Json => Box::new(JsonFormatter),
        Style::Bare => Box::new(BareFormatter),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};

    use super::*;
    use crate::record::{Level, Semantics};

    fn at(h: u32, m: u32, s: u32, ms: u32) -> chrono::DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 3, 9, h, m, s)
            .single()
            .unwrap()
            + chrono::Duration::milliseconds(ms as i64)
    }

    fn fancy(colors: bool) -> FancyFormatter {
        let mut style = StyleConfig::fancy(SymbolSet::Unicode);
        style.use_colors = colors;
        FancyFormatter::new(style)
    }

    #[test]
    fn test_fancy_plain_text_layout() {
        let formatter = fancy(false);
        let record = LogRecord::new(Level::Warning, "net.client", "connection lost").with_id("conn-42");
        assert_eq!(
            formatter.format(&record),
            "\u{25B2} client      conn-42    connection lost"
        );
        let record = LogRecord::new(Level::Info, "app", "hi");
        assert_eq!(formatter.format(&record), "  app                    hi");
    }

    #[test]
    fn test_fancy_colors_and_single_reset() {
        let formatter = fancy(true);
        let record = LogRecord::new(Level::Error, "a.b", "boom");
        let line = formatter.format(&record);
        assert!(line.starts_with("\x1B[31m\u{25CF}\x1B[0m "));
        assert!(line.ends_with("\x1B[31mboom\x1B[0m"));

        let record = LogRecord::new(Level::Info, "a.b", format!("already reset{RESET}"));
        let line = formatter.format(&record);
        assert!(line.ends_with(&format!("already reset{RESET}")));
        assert!(!line.ends_with(&format!("{RESET}{RESET}")));
    }

    #[test]
    fn test_fancy_semantics_override_only_at_info() {
        let formatter = fancy(true);
        let green = Paint::Bold(Color::Green).escape();
        let yellow = Paint::Plain(Color::Yellow).escape();

        let info = LogRecord::new(Level::Info, "x", "ok").with_semantics(Semantics::Success);
        assert!(formatter.format(&info).starts_with(&format!("{green}\u{2714}")));

        let warning = LogRecord::new(Level::Warning, "x", "ok").with_semantics(Semantics::Success);
        assert!(formatter.format(&warning).starts_with(&format!("{yellow}\u{2714}")));
    }

    #[test]
    fn test_fancy_timestamp_deduplication() {
        let mut style = StyleConfig::fancy(SymbolSet::Ascii);
        style.use_colors = false;
        style.show_name = false;
        style.show_id = false;
        style.show_timestamp = true;
        let formatter = FancyFormatter::new(style);

        let first = LogRecord::new(Level::Info, "x", "one").at(at(10, 20, 30, 100));
        let second = LogRecord::new(Level::Info, "x", "two").at(at(10, 20, 30, 900));
        let third = LogRecord::new(Level::Info, "x", "three").at(at(10, 20, 31, 0));
        assert_eq!(formatter.format(&first), "  [10:20:30] one");
        assert_eq!(formatter.format(&second), format!("  {} two", " ".repeat(10)));
        assert_eq!(formatter.format(&third), "  [10:20:31] three");
    }

    #[test]
    fn test_fancy_multi_line_continuation() {
        let formatter = fancy(false);
        let padding = formatter.continuation_padding();
        assert_eq!(padding, 2 + 12 + 11);
        let record = LogRecord::new(Level::Info, "x", "line1\nline2");
        let line = formatter.format(&record);
        let second = line.split('\n').nth(1).unwrap();
        assert_eq!(second, format!("{}line2", " ".repeat(padding)));

        let mut style = StyleConfig::fancy(SymbolSet::Unicode);
        style.use_colors = false;
        style.continuation_padding = Some(4);
        let formatter = FancyFormatter::new(style);
        let line = formatter.format(&record);
        assert_eq!(line.split('\n').nth(1), Some("    line2"));
    }

    #[test]
    fn test_missing_style_entries_degrade() {
        let mut style = StyleConfig::fancy(SymbolSet::Unicode);
        style.colors = Default::default();
        style.symbol_colors = Default::default();
        style.symbols = Default::default();
        let formatter = FancyFormatter::new(style);
        let record = LogRecord::new(Level::Critical, "x", "bare").with_semantics(Semantics::Inbound);
        let line = formatter.format(&record);
        assert!(line.starts_with(&format!(" {RESET} ")));
        assert!(line.ends_with(&format!("bare{RESET}")));
    }

    #[test]
    fn test_plain_layouts() {
        let record = LogRecord::new(Level::Error, "net.client", "connection lost").with_id("conn-42");
        assert_eq!(
            PlainFormatter::new(PlainLayout::Full).format(&record),
            "ERROR:net.client:conn-42:connection lost"
        );
        let journal = PlainFormatter::new(PlainLayout::Journal);
        assert_eq!(journal.format(&record), "client:conn-42: connection lost");
        let record = LogRecord::new(Level::Info, "net.client", "up");
        assert_eq!(journal.format(&record), "client: up");
    }

    #[test]
    fn test_tabular() {
        let record = LogRecord::new(Level::Warning, "a.b.c", "careful")
            .with_id("spam")
            .at(at(8, 5, 3, 42));
        assert_eq!(
            TabularFormatter::new(true).format(&record),
            "2024-03-09 08:05:03.042\tWARNING\ta.b.c\tspam\tcareful"
        );
        assert_eq!(
            TabularFormatter::new(false).format(&record),
            "WARNING\ta.b.c\tspam\tcareful"
        );
    }

    #[test]
    fn test_json_line() {
        let record = LogRecord::new(Level::Info, "a.b.c", "hello");
        let line = JsonFormatter.format(&record);
        assert!(!line.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["level"], "INFO");
        assert_eq!(value["loggerName"], "a.b.c");
        assert_eq!(value["message"], "hello");
        assert!(value.get("id").is_none());

        let record = LogRecord::new(Level::Info, "a", "multi\nline")
            .with_id("7")
            .with_semantics(Semantics::Request);
        let line = JsonFormatter.format(&record);
        assert!(!line.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["message"], "multi\nline");
        assert_eq!(value["id"], "7");
        assert_eq!(value["semantics"], "request");
    }

    #[test]
    fn test_style_keys() {
        for style in [
            Style::Fancy,
            Style::Colorful,
            Style::Symbolic,
            Style::Plain,
            Style::Journal,
            Style::Tabular,
            Style::Json,
        ] {
            assert_eq!(Style::from_key(style.key()), style);
        }
        assert_eq!(Style::from_key("no-such-style"), Style::Bare);
        let options = FormatterOptions {
            symbols: SymbolSet::Ascii,
            colors: false,
            timestamps: None,
        };
        let record = LogRecord::new(Level::Debug, "a.b", "m").with_id("id");
        assert_eq!(
            create_formatter(Style::from_key("mystery"), &options).format(&record),
            "DEBUG:a.b:m"
        );
        assert_eq!(
            create_formatter(Style::Colorful, &options).format(&record),
            "  b           m"
        );
        assert_eq!(
            create_formatter(Style::Symbolic, &options).format(&record),
            "  m"
        );
    }
}
