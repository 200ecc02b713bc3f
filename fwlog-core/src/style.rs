use std::collections::HashMap;

use colored::Color;

use crate::{
    config::FWLOG_CONFIG,
    record::{Level, Semantics},
};

pub const RESET: &str = "\x1B[0m";

/// A single ANSI styling instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Reset,
    Plain(Color),
    Bold(Color),
}

impl Paint {
    pub fn escape(&self) -> String {
        match self {
            Paint::Reset => RESET.to_string(),
            Paint::Plain(color) => format!("\x1B[{}m", color.to_fg_str()),
            Paint::Bold(color) => format!("\x1B[1;{}m", color.to_fg_str()),
        }
    }
}

/// Colours keyed by level, with semantic overrides that only apply to
/// `Info` records.
#[derive(Debug, Clone, Default)]
pub struct ColorTable {
    pub by_level: HashMap<Level, Paint>,
    pub by_semantics: HashMap<Semantics, Paint>,
}

impl ColorTable {
    pub fn resolve(&self, level: Level, semantics: Option<Semantics>) -> Option<Paint> {
        if level == Level::Info
            && let Some(paint) = semantics.and_then(|s| self.by_semantics.get(&s))
        {
            return Some(*paint);
        }
        self.by_level.get(&level).copied()
    }

    pub fn with_level(mut self, level: Level, paint: Paint) -> Self {
        self.by_level.insert(level, paint);
        self
    }

    pub fn with_semantics(mut self, semantics: Semantics, paint: Paint) -> Self {
        self.by_semantics.insert(semantics, paint);
        self
    }
}

/// Symbols keyed by level, with semantic overrides at every level.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    pub by_level: HashMap<Level, &'static str>,
    pub by_semantics: HashMap<Semantics, &'static str>,
}

impl SymbolTable {
    pub fn resolve(&self, level: Level, semantics: Option<Semantics>) -> &'static str {
        semantics
            .and_then(|s| self.by_semantics.get(&s))
            .or_else(|| self.by_level.get(&level))
            .copied()
            .unwrap_or("")
    }

    pub fn for_set(set: SymbolSet) -> Self {
        let (levels, semantics) = match set {
            SymbolSet::Unicode => (UNICODE_LEVEL_SYMBOLS, UNICODE_SEMANTIC_SYMBOLS),
            SymbolSet::Ascii => (ASCII_LEVEL_SYMBOLS, ASCII_SEMANTIC_SYMBOLS),
        };
        Self {
            by_level: levels.iter().copied().collect(),
            by_semantics: semantics.iter().copied().collect(),
        }
    }
}

const UNICODE_LEVEL_SYMBOLS: &[(Level, &str)] = &[
    (Level::Debug, " "),
    (Level::Info, " "),
    (Level::Warning, "\u{25B2}"), // black up-pointing triangle
    (Level::Error, "\u{25CF}"),   // black circle
    (Level::Critical, "\u{25CF}"),
];

const UNICODE_SEMANTIC_SYMBOLS: &[(Semantics, &str)] = &[
    (Semantics::Request, "\u{2190}"), // leftwards arrow
    (Semantics::ResponseSuccess, "\u{2192}"),
    (Semantics::ResponseError, "\u{2192}"),
    (Semantics::Notification, "\u{2192}"),
    (Semantics::Success, "\u{2714}"), // check mark
    (Semantics::Failure, "\u{2718}"), // ballot x
    (Semantics::Inbound, "\u{2190}"),
    (Semantics::Outbound, "\u{2192}"),
];

const ASCII_LEVEL_SYMBOLS: &[(Level, &str)] = &[
    (Level::Debug, " "),
    (Level::Info, " "),
    (Level::Warning, "!"),
    (Level::Error, "*"),
    (Level::Critical, "*"),
];

const ASCII_SEMANTIC_SYMBOLS: &[(Semantics, &str)] = &[
    (Semantics::Request, "<"),
    (Semantics::ResponseSuccess, ">"),
    (Semantics::ResponseError, ">"),
    (Semantics::Notification, ">"),
    (Semantics::Success, "+"),
    (Semantics::Failure, "x"),
    (Semantics::Inbound, "<"),
    (Semantics::Outbound, ">"),
];

/// Glyph repertoire used for symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolSet {
    Unicode,
    Ascii,
}

impl SymbolSet {
    /// Picks a glyph set from `FWLOG_SYMBOLS`, falling back to a guess about
    /// the console's capabilities.
    pub fn detect() -> Self {
        Self::from_setting(
            &FWLOG_CONFIG.SYMBOLS,
            cfg!(windows),
            std::env::var_os("WT_SESSION").is_some(),
            std::env::var("TERM").ok().as_deref(),
        )
    }

    /// `unicode` and `ascii` (any case) win over the console guess; anything
    /// else, `auto` included, falls back to it.
    pub fn from_setting(
        setting: &str,
        windows: bool,
        windows_terminal: bool,
        term: Option<&str>,
    ) -> Self {
        match setting.to_ascii_lowercase().as_str() {
            "unicode" => SymbolSet::Unicode,
            "ascii" => SymbolSet::Ascii,
            _ => Self::guess(windows, windows_terminal, term),
        }
    }

    fn guess(windows: bool, windows_terminal: bool, term: Option<&str>) -> Self {
        if (windows && !windows_terminal) || term == Some("dumb") {
            SymbolSet::Ascii
        } else {
            SymbolSet::Unicode
        }
    }
}

/// Read-only configuration of the fancy formatter.
#[derive(Debug, Clone)]
pub struct StyleConfig {
    pub colors: ColorTable,
    pub symbol_colors: ColorTable,
    pub symbols: SymbolTable,
    pub show_name: bool,
    pub show_id: bool,
    pub show_timestamp: bool,
    /// Emit ANSI escapes at all.
    pub use_colors: bool,
    /// Overrides the padding derived from the visible fields.
    pub continuation_padding: Option<usize>,
}

impl StyleConfig {
    pub fn fancy(symbols: SymbolSet) -> Self {
        let colors = ColorTable::default()
            .with_level(Level::Debug, Paint::Bold(Color::Black))
            .with_level(Level::Info, Paint::Reset)
            .with_level(Level::Warning, Paint::Plain(Color::Yellow))
            .with_level(Level::Error, Paint::Plain(Color::Red))
            .with_level(Level::Critical, Paint::Bold(Color::Red))
            .with_semantics(Semantics::Request, Paint::Bold(Color::Blue))
            .with_semantics(Semantics::ResponseSuccess, Paint::Bold(Color::Green))
            .with_semantics(Semantics::ResponseError, Paint::Bold(Color::Red))
            .with_semantics(Semantics::Notification, Paint::Bold(Color::Yellow));
        let symbol_colors = colors
            .clone()
            .with_semantics(Semantics::Failure, Paint::Bold(Color::Red))
            .with_semantics(Semantics::Success, Paint::Bold(Color::Green));
        Self {
            colors,
            symbol_colors,
            symbols: SymbolTable::for_set(symbols),
            show_name: true,
            show_id: true,
            show_timestamp: false,
            use_colors: true,
            continuation_padding: None,
        }
    }
}
