//! Page position and navigation hints for a paginated list.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::application::services::PageView;

/// "Page X of Y" line for a [`PageView`].
pub struct PaginationBar<'a, T> {
    view: &'a PageView<T>,
}

impl<'a, T> PaginationBar<'a, T> {
    /// Renders the position in `view`.
    #[must_use]
    pub const fn new(view: &'a PageView<T>) -> Self {
        Self { view }
    }

    fn position(&self) -> String {
        if self.view.total_pages == 0 {
            format!("Page {}", self.view.current_page)
        } else {
            format!(
                "Page {} of {}",
                self.view.current_page, self.view.total_pages
            )
        }
    }
}

fn hint(label: &'static str, enabled: bool) -> Span<'static> {
    if enabled {
        Span::styled(label, Style::default().fg(Color::Cyan))
    } else {
        Span::styled(label, Style::default().fg(Color::DarkGray))
    }
}

impl<T> Widget for PaginationBar<'_, T> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![
            hint("◀ p ", self.view.has_previous),
            Span::styled(
                self.position(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            hint(" n ▶", self.view.has_more),
        ];

        if self.view.loading {
            spans.push(Span::styled(
                "  loading…",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            ));
        }

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}
