use std::env;

use aios_core::CommandStatus;
use color_eyre::owo_colors::{OwoColorize, Style as Ansi};

/// Terminal coloring, off for pipes, `--no-color` and `NO_COLOR`.
pub struct Style {
    enabled: bool,
}

impl Style {
    pub fn new(force_no_color: bool, is_tty: bool) -> Self {
        Self {
            enabled: is_tty && !force_no_color && env::var_os("NO_COLOR").is_none(),
        }
    }

    pub fn status(&self, status: &CommandStatus, text: &str) -> String {
        let (symbol, ansi) = match status {
            CommandStatus::Ok => ("✔", Ansi::new().green().bold()),
            CommandStatus::UserError => ("✗", Ansi::new().yellow().bold()),
            CommandStatus::Failure => ("✖", Ansi::new().red().bold()),
        };
        self.apply(&format!("{symbol} {text}"), ansi)
    }

    /// Left-aligned label for a link status, plan action or hint line.
    pub fn label(&self, label: &str) -> String {
        let ansi = match label {
            "ok" | "skip" => Ansi::new().green(),
            "missing" | "create" | "Hint:" => Ansi::new().cyan(),
            "broken" | "repair" => Ansi::new().yellow(),
            _ => Ansi::new().red(),
        };
        self.apply(&format!("{label:<8}"), ansi)
    }

    fn apply(&self, text: &str, ansi: Ansi) -> String {
        if self.enabled {
            text.style(ansi).to_string()
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_output_without_a_terminal() {
        let style = Style::new(false, false);
        assert_eq!(style.label("ok"), "ok      ");
        assert_eq!(style.label("Hint:"), "Hint:   ");
        assert_eq!(
            style.status(&CommandStatus::UserError, "aios project track"),
            "✗ aios project track"
        );
    }

    #[test]
    fn terminal_output_is_colored_unless_disabled() {
        let forced_off = Style::new(true, true);
        assert_eq!(forced_off.label("broken"), "broken  ");
        if env::var_os("NO_COLOR").is_none() {
            let colored = Style::new(false, true).label("broken");
            assert!(colored.contains("\u{1b}["), "{colored:?}");
            assert!(colored.contains("broken"));
        }
    }
}
