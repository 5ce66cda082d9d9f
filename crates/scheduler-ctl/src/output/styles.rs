//! Style constants and clap help styling.

use anstyle::{AnsiColor, Color, Effects, Style};

const fn fg(color: AnsiColor) -> Style {
    Style::new().fg_color(Some(Color::Ansi(color)))
}

/// Green: confirmations.
pub(crate) const SUCCESS: Style = fg(AnsiColor::Green);

/// Red: failures, written to stderr.
pub(crate) const ERROR: Style = fg(AnsiColor::Red);

/// Yellow: responses the CLI could not interpret.
pub(crate) const WARNING: Style = fg(AnsiColor::Yellow);

/// Dimmed: secondary information such as totals.
pub(crate) const DIM: Style = Style::new().effects(Effects::DIMMED);

/// Help output palette for clap.
pub(crate) fn clap_styles() -> clap::builder::Styles {
    let heading = fg(AnsiColor::Green).effects(Effects::BOLD);
    clap::builder::Styles::styled()
        .header(heading)
        .usage(heading)
        .literal(fg(AnsiColor::Cyan))
        .placeholder(fg(AnsiColor::Cyan))
        .error(fg(AnsiColor::Red).effects(Effects::BOLD))
        .valid(fg(AnsiColor::Green))
        .invalid(fg(AnsiColor::Yellow))
}
