//! Top bar: app name, section tabs and session indicator.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

/// Top-level sections of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(missing_docs)]
pub enum Tab {
    #[default]
    Courses,
    Weather,
    Budget,
}

impl Tab {
    /// Tabs in display order.
    pub const ALL: [Self; 3] = [Self::Courses, Self::Weather, Self::Budget];

    /// Label shown in the header.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Courses => "Courses",
            Self::Weather => "Weather",
            Self::Budget => "Budget",
        }
    }

    /// Tab selected by a number key, `'1'` being the first.
    #[must_use]
    pub fn from_digit(c: char) -> Option<Self> {
        let index = c.to_digit(10)?.checked_sub(1)?;
        Self::ALL.get(usize::try_from(index).ok()?).copied()
    }

    /// The tab to the right, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Courses => Self::Weather,
            Self::Weather => Self::Budget,
            Self::Budget => Self::Courses,
        }
    }
}

/// Top line with the app name, tabs and user.
pub struct HeaderBar<'a> {
    app_name: &'a str,
    version: &'a str,
    active: Tab,
    user: Option<&'a str>,
}

impl<'a> HeaderBar<'a> {
    /// A header with no active user.
    #[must_use]
    pub const fn new(app_name: &'a str, version: &'a str) -> Self {
        Self {
            app_name,
            version,
            active: Tab::Courses,
            user: None,
        }
    }

    /// Highlights `tab`.
    #[must_use]
    pub const fn active(mut self, tab: Tab) -> Self {
        self.active = tab;
        self
    }

    /// Email of the signed-in user, `None` when signed out.
    #[must_use]
    pub const fn user(mut self, email: Option<&'a str>) -> Self {
        self.user = email;
        self
    }

    fn session_span(&self) -> Span<'static> {
        match self.user {
            Some(email) => Span::styled(
                format!(" ● {email} "),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            None => Span::styled(" ○ signed out ", Style::default().fg(Color::DarkGray)),
        }
    }
}

impl Widget for HeaderBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.app_name.to_uppercase()),
                Style::default()
                    .bg(Color::Cyan)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" v{} ", self.version), Style::default().fg(Color::DarkGray)),
        ];

        for (index, tab) in Tab::ALL.iter().enumerate() {
            let style = if *tab == self.active {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::raw(" "));
            spans.push(Span::styled(format!("{} {}", index + 1, tab.title()), style));
        }

        let left = Line::from(spans);
        let left_width = left.width();
        Paragraph::new(left).render(area, buf);

        let session = self.session_span();
        let session_width = session.content.width();
        if left_width + session_width < usize::from(area.width) {
            let width = u16::try_from(session_width).unwrap_or(area.width);
            let right = Rect::new(area.right().saturating_sub(width), area.y, width, 1);
            Paragraph::new(Line::from(session)).render(right, buf);
        }
    }
}
