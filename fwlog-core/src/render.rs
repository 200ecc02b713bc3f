use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::record::short_name;

pub const NAME_WIDTH: usize = 11;
pub const ID_WIDTH: usize = 10;
/// Width of `[HH:MM:SS]`.
pub const TIMESTAMP_WIDTH: usize = 10;

const SHORT_NAME_CACHE_CAPACITY: usize = 256;

/// Memo of logger short names, cleared wholesale once it is full.
#[derive(Default)]
pub struct ShortNameCache {
    entries: Mutex<HashMap<String, Arc<str>>>,
}

impl ShortNameCache {
    pub fn get(&self, name: &str) -> Arc<str> {
        let Ok(mut entries) = self.entries.lock() else {
            return short_name(name).into();
        };
        if let Some(short) = entries.get(name) {
            return Arc::clone(short);
        }
        if entries.len() >= SHORT_NAME_CACHE_CAPACITY {
            entries.clear();
        }
        let short: Arc<str> = short_name(name).into();
        entries.insert(name.to_string(), Arc::clone(&short));
        short
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Left-justifies `text` in a field of `width` characters, truncating it if
/// it is longer.
pub fn pad_field(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width).collect();
    format!("{truncated:<width$}")
}

/// The last timestamp emitted by one formatter.
///
/// Checking and updating the slot is atomic, so a stamp is printed once per
/// change. Keeping the printed stamp ahead of its blanks in the output is up
/// to the caller, see [`crate::Handler`].
#[derive(Default)]
pub struct TimestampSlot {
    last: Mutex<String>,
}

impl TimestampSlot {
    /// Returns `stamp`, or blanks of the same width if it equals the
    /// previously rendered stamp.
    pub fn render(&self, stamp: &str) -> String {
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if *last == stamp {
            " ".repeat(stamp.chars().count())
        } else {
            last.clear();
            last.push_str(stamp);
            stamp.to_string()
        }
    }
}

/// Prefixes every line of `message` after the first with `padding` spaces.
pub fn indent_continuation(message: &str, padding: usize) -> String {
    if !message.contains('\n') {
        return message.to_string();
    }
    let separator = format!("\n{}", " ".repeat(padding));
    message.split('\n').collect::<Vec<_>>().join(&separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_field() {
        assert_eq!(pad_field("client", NAME_WIDTH), "client     ");
        assert_eq!(pad_field("averyverylongname", NAME_WIDTH), "averyverylo");
        assert_eq!(pad_field("", ID_WIDTH), " ".repeat(ID_WIDTH));
        assert_eq!(pad_field("\u{e9}t\u{e9}", 2), "\u{e9}t");
    }

    #[test]
    fn test_timestamp_slot_blanks_repeats() {
        let slot = TimestampSlot::default();
        assert_eq!(slot.render("[12:00:00]"), "[12:00:00]");
        assert_eq!(slot.render("[12:00:00]"), " ".repeat(TIMESTAMP_WIDTH));
        assert_eq!(slot.render("[12:00:01]"), "[12:00:01]");
        assert_eq!(slot.render("[12:00:00]"), "[12:00:00]");
    }

    #[test]
    fn test_indent_continuation() {
        assert_eq!(indent_continuation("line1\nline2", 4), "line1\n    line2");
        assert_eq!(indent_continuation("a\nb\nc", 2), "a\n  b\n  c");
        assert_eq!(indent_continuation("single", 8), "single");
        assert_eq!(indent_continuation("end\n", 1), "end\n ");
    }

    #[test]
    fn test_short_name_cache() {
        let cache = ShortNameCache::default();
        assert!(cache.is_empty());
        assert_eq!(&*cache.get("net.client"), "client");
        assert_eq!(&*cache.get("net.client"), "client");
        assert_eq!(cache.len(), 1);
        for i in 0..SHORT_NAME_CACHE_CAPACITY + 10 {
            assert_eq!(&*cache.get(&format!("app.mod{i}")), format!("mod{i}"));
        }
        assert!(cache.len() <= SHORT_NAME_CACHE_CAPACITY);
    }
}
