//! Color control for terminal reports.
//!
//! Precedence, lowest to highest: the `[output] use_color` setting,
//! `NO_COLOR`, `CLICOLOR=0`, `CLICOLOR_FORCE=1`. Without any of them the
//! decision is made by looking at stdout.

use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn should_use_color(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => stdout_supports_color(),
        }
    }

    fn from_setting(use_color: bool) -> Self {
        if use_color {
            ColorMode::Always
        } else {
            ColorMode::Never
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormattingConfig {
    pub color: ColorMode,
}

impl FormattingConfig {
    /// Resolve colors from the process environment.
    pub fn from_env(configured: Option<bool>) -> Self {
        Self::resolve(configured, |name| env::var(name).ok())
    }

    /// Resolve colors against an arbitrary variable lookup.
    pub fn resolve(configured: Option<bool>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut color = configured.map_or(ColorMode::Auto, ColorMode::from_setting);

        if lookup("NO_COLOR").is_some() || lookup("CLICOLOR").as_deref() == Some("0") {
            color = ColorMode::Never;
        }
        if lookup("CLICOLOR_FORCE").as_deref() == Some("1") {
            color = ColorMode::Always;
        }

        Self { color }
    }

    pub fn plain() -> Self {
        Self {
            color: ColorMode::Never,
        }
    }

    /// Apply to the process-wide `colored` switch.
    pub fn apply(&self) {
        colored::control::set_override(self.color.should_use_color());
    }
}

fn stdout_supports_color() -> bool {
    let dumb = env::var("TERM").is_ok_and(|term| term == "dumb");
    !dumb && std::io::stdout().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn resolve(configured: Option<bool>, vars: &[(&str, &str)]) -> ColorMode {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        FormattingConfig::resolve(configured, |name| vars.get(name).cloned()).color
    }

    #[test]
    fn test_defaults_to_auto() {
        assert_eq!(resolve(None, &[]), ColorMode::Auto);
    }

    #[test]
    fn test_config_setting_applies_without_env() {
        assert_eq!(resolve(Some(true), &[]), ColorMode::Always);
        assert_eq!(resolve(Some(false), &[]), ColorMode::Never);
    }

    #[test]
    fn test_no_color_overrides_config() {
        assert_eq!(resolve(Some(true), &[("NO_COLOR", "")]), ColorMode::Never);
        assert_eq!(resolve(Some(true), &[("CLICOLOR", "0")]), ColorMode::Never);
        assert_eq!(resolve(None, &[("CLICOLOR", "1")]), ColorMode::Auto);
    }

    #[test]
    fn test_clicolor_force_wins() {
        assert_eq!(
            resolve(Some(false), &[("NO_COLOR", "1"), ("CLICOLOR_FORCE", "1")]),
            ColorMode::Always
        );
    }

    #[test]
    fn test_explicit_modes() {
        assert!(ColorMode::Always.should_use_color());
        assert!(!ColorMode::Never.should_use_color());
        assert_eq!(FormattingConfig::plain().color, ColorMode::Never);
    }
}
