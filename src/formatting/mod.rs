use colored::Color;
use serde::{Deserialize, Serialize};
use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto, // Detect based on terminal
    Always, // Force colors on
    Never,  // Force colors off
}

impl ColorMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "always" => Some(Self::Always),
            "never" => Some(Self::Never),
            _ => None,
        }
    }

    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }

    /// Apply `NO_COLOR`, `CLICOLOR` and `CLICOLOR_FORCE` on top of `self`.
    pub fn with_env_overrides(self) -> Self {
        let mut mode = self;

        // Check NO_COLOR environment variable (per no-color.org standard)
        if env::var("NO_COLOR").is_ok() {
            mode = Self::Never;
        }

        if let Ok(val) = env::var("CLICOLOR") {
            if val == "0" {
                mode = Self::Never;
            }
        }

        if let Ok(val) = env::var("CLICOLOR_FORCE") {
            if val == "1" {
                mode = Self::Always;
            }
        }

        mode
    }
}

/// Syntax classes recognised by the code frame highlighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Keyword,
    String,
    Number,
    Comment,
    Capitalized,
    Punctuation,
    Plain,
}

/// Applies terminal styles when colour output is enabled.
///
/// Styling depends only on the mode the painter was built with; `colored`'s
/// process-wide colorize switch is neither read nor changed.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    enabled: bool,
}

const BOLD: &str = "1";
const DIMMED: &str = "2";

impl Painter {
    pub fn new(mode: ColorMode) -> Self {
        Self {
            enabled: mode.should_use_color(),
        }
    }

    pub fn plain() -> Self {
        Self { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn error(&self, text: &str) -> String {
        self.paint(text, Some(Color::Red), None)
    }

    pub fn marker(&self, text: &str) -> String {
        self.paint(text, Some(Color::Red), Some(BOLD))
    }

    pub fn warning(&self, text: &str) -> String {
        self.paint(text, Some(Color::Yellow), None)
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint(text, None, Some(DIMMED))
    }

    pub fn token(&self, text: &str, class: TokenClass) -> String {
        let color = match class {
            TokenClass::Keyword => Color::Cyan,
            TokenClass::String => Color::Green,
            TokenClass::Number => Color::Magenta,
            TokenClass::Comment => Color::BrightBlack,
            TokenClass::Capitalized | TokenClass::Punctuation => Color::Yellow,
            TokenClass::Plain => return text.to_string(),
        };
        self.paint(text, Some(color), None)
    }

    fn paint(&self, text: &str, color: Option<Color>, style: Option<&str>) -> String {
        if !self.enabled || text.is_empty() {
            return text.to_string();
        }
        let mut codes: Vec<String> = style.map(str::to_string).into_iter().collect();
        codes.extend(color.map(|c| c.to_fg_str().into_owned()));
        format!("\x1b[{}m{}\x1b[0m", codes.join(";"), text)
    }
}

fn detect_color_support() -> bool {
    // Check if we're in a dumb terminal
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    // Logs go to stderr
    std::io::stderr().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_mode_parse() {
        assert_eq!(ColorMode::parse("ALWAYS"), Some(ColorMode::Always));
        assert_eq!(ColorMode::parse("never"), Some(ColorMode::Never));
        assert_eq!(ColorMode::parse("auto"), Some(ColorMode::Auto));
        assert_eq!(ColorMode::parse("sometimes"), None);
    }

    #[test]
    fn test_color_mode_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            color: ColorMode,
        }
        let parsed: Wrapper = toml::from_str("color = \"never\"").unwrap();
        assert_eq!(parsed.color, ColorMode::Never);
    }

    #[test]
    fn test_plain_painter_leaves_text_untouched() {
        let painter = Painter::plain();
        assert!(!painter.is_enabled());
        assert_eq!(painter.error("boom"), "boom");
        assert_eq!(painter.token("const", TokenClass::Keyword), "const");
        assert_eq!(painter.dim(" 1 |"), " 1 |");
    }

    #[test]
    fn test_never_mode_disables_painter() {
        assert!(!Painter::new(ColorMode::Never).is_enabled());
    }

    #[test]
    fn test_always_mode_emits_styles() {
        let painter = Painter::new(ColorMode::Always);
        assert_eq!(painter.error("boom"), "\x1b[31mboom\x1b[0m");
        assert_eq!(painter.marker("^"), "\x1b[1;31m^\x1b[0m");
        assert_eq!(painter.dim(" 1 |"), "\x1b[2m 1 |\x1b[0m");
        assert_eq!(painter.token("", TokenClass::Keyword), "");
        assert_eq!(painter.token("x", TokenClass::Plain), "x");
    }

    #[test]
    fn test_building_a_painter_leaves_colored_switch_alone() {
        colored::control::set_override(false);
        let _ = Painter::new(ColorMode::Always);
        assert!(!colored::control::SHOULD_COLORIZE.should_colorize());
        colored::control::unset_override();
    }
}
