use clap::ValueEnum;
use colored::*;
use std::env;
use std::io::IsTerminal;

use crate::core::ConditionClass;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorMode {
    /// Detect based on terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FormattingConfig {
    pub color: ColorMode,
}

impl FormattingConfig {
    pub fn new(color: ColorMode) -> Self {
        Self { color }
    }

    /// Honors `NO_COLOR`, `CLICOLOR=0` and `CLICOLOR_FORCE=1` when the mode is auto.
    pub fn from_env(color: ColorMode) -> Self {
        let mut config = Self::new(color);
        if color != ColorMode::Auto {
            return config;
        }

        if env::var_os("NO_COLOR").is_some() {
            config.color = ColorMode::Never;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            config.color = ColorMode::Never;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v == "1") {
            config.color = ColorMode::Always;
        }
        config
    }

    pub fn plain() -> Self {
        Self::new(ColorMode::Never)
    }

    pub fn use_color(&self) -> bool {
        self.color.should_use_color()
    }
}

/// Terminal styling for report output.
pub struct Styler {
    color: bool,
}

impl Styler {
    pub fn new(config: FormattingConfig) -> Self {
        let color = config.use_color();
        colored::control::set_override(color);
        Self { color }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn header(&self, text: &str) -> String {
        if self.color {
            text.blue().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn warning(&self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }

    /// Text in the conventional chart color of a condition class.
    pub fn class(&self, class: ConditionClass, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        match class {
            ConditionClass::Best => text.bright_green().to_string(),
            ConditionClass::Good => text.green().to_string(),
            ConditionClass::Fair => text.yellow().to_string(),
            ConditionClass::Poor => text.red().to_string(),
            ConditionClass::Worst => text.bright_red().bold().to_string(),
        }
    }
}

fn detect_color_support() -> bool {
    if env::var("TERM").is_ok_and(|term| term == "dumb") {
        return false;
    }
    std::io::stdout().is_terminal()
}
