//! Status bar widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl StatusLevel {
    /// Text colour for the level.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Info => Color::Cyan,
            Self::Success => Color::Green,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
        }
    }
}

/// Transient message shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// Message text.
    pub text: String,
    /// Severity.
    pub level: StatusLevel,
}

impl StatusMessage {
    /// Neutral message.
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: StatusLevel::Info,
        }
    }

    /// Success message.
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: StatusLevel::Success,
        }
    }

    /// Warning message.
    #[must_use]
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: StatusLevel::Warning,
        }
    }

    /// Error message.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: StatusLevel::Error,
        }
    }
}

/// Bottom line: message on the left, key hints on the right.
#[derive(Debug, Clone, Default)]
pub struct StatusBar<'a> {
    message: Option<&'a StatusMessage>,
    hints: &'a str,
}

impl<'a> StatusBar<'a> {
    /// Footer with an optional message and key hints.
    #[must_use]
    pub const fn new(message: Option<&'a StatusMessage>, hints: &'a str) -> Self {
        Self { message, hints }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = usize::from(area.width);
        let hint_style = Style::default().fg(Color::DarkGray);

        let mut spans = Vec::new();
        let mut used = 0;

        if let Some(message) = self.message {
            let style = Style::default()
                .fg(message.level.color())
                .add_modifier(Modifier::BOLD);
            used = message.text.width();
            spans.push(Span::styled(message.text.as_str(), style));
        }

        let hints_width = self.hints.width();
        if used + hints_width < width {
            spans.push(Span::raw(" ".repeat(width - used - hints_width)));
            spans.push(Span::styled(self.hints, hint_style));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
