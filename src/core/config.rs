use inksac::prelude::*;
use log::LevelFilter;

use crate::logging;

/// Variable the shell points at its own startup directory.
pub const SELF_VAR: &str = "SHELL";

/// Search path used when the environment has no `PATH`.
pub const DEFAULT_PATH: &str = "/usr/local/bin:/usr/bin:/bin";

/// Startup settings. There are no config files or flags; everything comes from
/// the inherited environment and is read once.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub log_level: LevelFilter,
    pub color: bool,
    pub self_var: &'static str,
    pub default_path: &'static str,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            log_level: LevelFilter::Off,
            color: false,
            self_var: SELF_VAR,
            default_path: DEFAULT_PATH,
        }
    }
}

impl ShellConfig {
    pub fn from_env() -> Self {
        let mut config = Self::from_lookup(|name| std::env::var(name).ok());
        if config.color {
            let support = check_color_support().unwrap_or(ColorSupport::NoColor);
            config.color = !matches!(support, ColorSupport::NoColor);
        }
        config
    }

    /// Builds a config from an arbitrary variable lookup. Terminal color
    /// detection is left to [`ShellConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let no_color = lookup("NO_COLOR").is_some_and(|v| !v.is_empty());

        Self {
            log_level: logging::parse_level(lookup("CASH_LOG").as_deref()),
            color: !no_color,
            ..Self::default()
        }
    }
}
