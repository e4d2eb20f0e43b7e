//! Terminal styling for command output.
//!
//! Update and init commands print a status line per step and a summary of
//! touched files. Whether that output carries colors, emoji markers and a
//! spinner is decided once, from `--color` and the environment:
//!
//! - `--color always` and `--color never` win over everything else.
//! - With `--color auto`, `NO_COLOR` (even empty) and `CLICOLOR=0` turn
//!   styling off, `CLICOLOR_FORCE` turns it on, `TERM=dumb` turns it off,
//!   and otherwise stdout decides.
//!
//! With styling off every marker falls back to a bracketed word such as
//! `[OK]`, which keeps logs and CI output greppable.
//!
//! ```rust,ignore
//! use sf_toolbox::output::{emoji, spinner, OutputConfig};
//!
//! let out = OutputConfig::from_env_and_flag("never");
//! let progress = spinner(&out, "Retrieving profiles");
//! progress.finish_and_clear();
//! println!("{} 2 profiles written", emoji(&out, "✅", "[OK]"));
//! ```

use std::env;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Styling decision for one command run.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    /// Resolves the `--color` value. Anything other than `always` or
    /// `never` is treated as `auto`.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_ascii_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => color_from_env(
                |name| env::var_os(name).map(|v| v.to_string_lossy().into_owned()),
                console::Term::stdout().features().colors_supported(),
            ),
        };
        Self { use_color }
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// `auto` resolution. `var` reads an environment variable and `terminal`
/// says whether stdout can show colors.
fn color_from_env(var: impl Fn(&str) -> Option<String>, terminal: bool) -> bool {
    if var("NO_COLOR").is_some() {
        return false;
    }
    if var("CLICOLOR").as_deref() == Some("0") {
        return false;
    }
    if var("CLICOLOR_FORCE").is_some_and(|v| !v.is_empty() && v != "0") {
        return true;
    }
    if var("TERM").as_deref() == Some("dumb") {
        return false;
    }
    terminal
}

/// Status marker: `styled` when colors are on, the bracketed `plain` word
/// otherwise.
pub fn emoji<'a>(config: &OutputConfig, styled: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        styled
    } else {
        plain
    }
}

/// Bold section header, plain when colors are off.
pub fn header(config: &OutputConfig, text: &str) -> String {
    if config.use_color {
        style(text).bold().cyan().to_string()
    } else {
        text.to_string()
    }
}

/// Dimmed secondary text, plain when colors are off.
pub fn dim(config: &OutputConfig, text: &str) -> String {
    if config.use_color {
        style(text).dim().to_string()
    } else {
        text.to_string()
    }
}

/// Spinner shown while a long operation runs. Hidden when colors are off so
/// piped output stays clean.
pub fn spinner(config: &OutputConfig, message: &str) -> ProgressBar {
    if !config.use_color {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed:.dim}") {
        bar.set_style(template);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_always() {
        let config = OutputConfig::from_env_and_flag("always");
        assert!(config.use_color);
    }

    #[test]
    fn test_color_never() {
        let config = OutputConfig::from_env_and_flag("never");
        assert!(!config.use_color);
    }

    #[test]
    fn test_emoji_helper_with_color() {
        let config = OutputConfig::with_color();
        assert_eq!(emoji(&config, "✅", "[OK]"), "✅");
    }

    #[test]
    fn test_emoji_helper_without_color() {
        let config = OutputConfig::without_color();
        assert_eq!(emoji(&config, "✅", "[OK]"), "[OK]");
    }

    fn vars<'a>(set: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            set.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn test_auto_follows_terminal_without_overrides() {
        assert!(color_from_env(vars(&[]), true));
        assert!(!color_from_env(vars(&[]), false));
    }

    #[test]
    fn test_auto_environment_overrides() {
        assert!(!color_from_env(vars(&[("NO_COLOR", "")]), true));
        assert!(!color_from_env(vars(&[("CLICOLOR", "0")]), true));
        assert!(!color_from_env(vars(&[("TERM", "dumb")]), true));
        assert!(color_from_env(vars(&[("CLICOLOR_FORCE", "1")]), false));
        assert!(!color_from_env(vars(&[("CLICOLOR_FORCE", "0")]), false));
        // NO_COLOR beats a forced color.
        assert!(!color_from_env(
            vars(&[("NO_COLOR", "1"), ("CLICOLOR_FORCE", "1")]),
            true
        ));
    }

    #[test]
    fn test_plain_styling_without_color() {
        let config = OutputConfig::without_color();
        assert_eq!(header(&config, "Profiles"), "Profiles");
        assert_eq!(dim(&config, "force-app"), "force-app");
        assert!(spinner(&config, "Updating").is_hidden());
    }
}
