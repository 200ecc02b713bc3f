use std::sync::LazyLock;

use derive_from_env::FromEnv;

#[derive(FromEnv)]
#[from_env(prefix = "FWLOG")]
#[allow(non_snake_case)]
pub struct FWLogConfig {
    #[from_env(default = "100")]
    pub FLUSH_INTERVAL_MS: u64,
    // auto, unicode or ascii
    #[from_env(default = "auto")]
    pub SYMBOLS: String,
    // auto, always or never
    #[from_env(default = "auto")]
    pub COLORS: String,
}

impl Default for FWLogConfig {
    fn default() -> Self {
        Self {
            FLUSH_INTERVAL_MS: 100,
            SYMBOLS: "auto".into(),
            COLORS: "auto".into(),
        }
    }
}

impl FWLogConfig {
    /// Whether ANSI colours should be emitted on a stream when the caller
    /// did not decide. In `auto` mode that takes a terminal and no
    /// `NO_COLOR` in the environment.
    pub fn colors_enabled(&self, is_terminal: bool) -> bool {
        self.colors_for(is_terminal, std::env::var_os("NO_COLOR").is_some())
    }

    fn colors_for(&self, is_terminal: bool, no_color: bool) -> bool {
        match self.COLORS.to_ascii_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => is_terminal && !no_color,
        }
    }
}

// A malformed environment must not take logging down with it.
pub static FWLOG_CONFIG: LazyLock<FWLogConfig> =
    LazyLock::new(|| FWLogConfig::from_env().unwrap_or_default());

#[test]
fn test_default_config() {
    let config = FWLogConfig::default();
    assert_eq!(config.FLUSH_INTERVAL_MS, 100);
    assert_eq!(config.SYMBOLS, "auto");
    let never = FWLogConfig {
        COLORS: "never".into(),
        ..FWLogConfig::default()
    };
    assert!(!never.colors_enabled(true));
    let always = FWLogConfig {
        COLORS: "Always".into(),
        ..FWLogConfig::default()
    };
    assert!(always.colors_enabled(false));
}

#[test]
fn test_auto_colors_follow_the_stream() {
    let auto = FWLogConfig::default();
    assert!(auto.colors_for(true, false));
    assert!(!auto.colors_for(false, false));
    assert!(!auto.colors_for(true, true));
}
