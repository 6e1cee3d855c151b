//! Randomized budget dashboard. Only shown to signed-in users.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Widget},
};

use crate::domain::entities::{BudgetCategory, BudgetReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum BudgetAction {
    None,
    Regenerate,
    RequireLogin,
}

/// Budget tab.
#[derive(Default)]
pub struct BudgetScreen {
    report: Option<BudgetReport>,
    signed_in: bool,
}

impl BudgetScreen {
    /// A signed-out screen without a report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets the report on sign-out.
    pub fn set_signed_in(&mut self, signed_in: bool) {
        self.signed_in = signed_in;
        if !signed_in {
            self.report = None;
        }
    }

    /// Whether a report should be generated before the tab is shown.
    #[must_use]
    pub const fn needs_report(&self) -> bool {
        self.signed_in && self.report.is_none()
    }

    /// Shows `report`; ignored while signed out.
    pub fn set_report(&mut self, report: BudgetReport) {
        if self.signed_in {
            self.report = Some(report);
        }
    }

    /// The report on screen.
    #[must_use]
    pub const fn report(&self) -> Option<&BudgetReport> {
        self.report.as_ref()
    }

    /// Maps a key press to an action.
    pub fn handle_key(&mut self, key: KeyEvent) -> BudgetAction {
        match key.code {
            KeyCode::Char('g' | 'r') if self.signed_in => BudgetAction::Regenerate,
            KeyCode::Enter | KeyCode::Char('l') if !self.signed_in => BudgetAction::RequireLogin,
            _ => BudgetAction::None,
        }
    }

    /// Draws the tab.
    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let Some(report) = &self.report else {
            let text = if self.signed_in {
                "Generating budget..."
            } else {
                "Sign in to view the budget. Press Enter to sign in."
            };
            Paragraph::new(text)
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL).title(" Budget "))
                .render(area, buf);
            return;
        };

        let [summary, charts] =
            Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(area);
        let [categories, trend] =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .areas(charts);

        render_summary(report, summary, buf);
        render_categories(&report.categories, categories, buf);
        render_trend(&report.income_trend, trend, buf);
    }
}

/// Formats an amount with thousands separators.
fn money(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn render_summary(report: &BudgetReport, area: Rect, buf: &mut Buffer) {
    let balance = report.balance();
    let balance_style = if balance >= 0 {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Red)
    };
    let sign = if balance < 0 { "-" } else { "" };

    let line = Line::from(vec![
        Span::styled("Income ", Style::default().fg(Color::Gray)),
        Span::styled(money(report.income), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled("   Expenditures ", Style::default().fg(Color::Gray)),
        Span::styled(
            money(report.expenditures),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled("   Balance ", Style::default().fg(Color::Gray)),
        Span::styled(format!("{sign}{}", money(balance.unsigned_abs())), balance_style),
    ]);

    Paragraph::new(line)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Overview "),
        )
        .render(area, buf);
}

fn render_categories(categories: &[BudgetCategory], area: Rect, buf: &mut Buffer) {
    let bars: Vec<Bar> = categories
        .iter()
        .map(|category| {
            let color = category
                .rgb()
                .map_or(Color::White, |(r, g, b)| Color::Rgb(r, g, b));
            Bar::default()
                .value(category.amount)
                .label(Line::from(category.name.clone()))
                .text_value(money(category.amount))
                .style(Style::default().fg(color))
        })
        .collect();

    BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Spending by category "),
        )
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars))
        .render(area, buf);
}

fn render_trend(trend: &[(String, u64)], area: Rect, buf: &mut Buffer) {
    let floor = trend.iter().map(|(_, v)| *v).min().unwrap_or_default();
    // Bars show the variation above the lowest month; the absolute value is
    // in the bar text.
    let bars: Vec<Bar> = trend
        .iter()
        .map(|(month, amount)| {
            Bar::default()
                .value(amount - floor + 1)
                .label(Line::from(month.clone()))
                .text_value(format!("{}k", amount / 1000))
        })
        .collect();

    BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Monthly income "),
        )
        .bar_width(5)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Green))
        .data(BarGroup::default().bars(&bars))
        .render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::generate_budget;
    use crossterm::event::KeyModifiers;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use test_case::test_case;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test_case(0, "$0" ; "zero")]
    #[test_case(999, "$999" ; "hundreds")]
    #[test_case(1_000, "$1,000" ; "thousand")]
    #[test_case(4_250_317, "$4,250,317" ; "millions")]
    fn test_money(amount: u64, expected: &str) {
        assert_eq!(money(amount), expected);
    }

    #[test]
    fn test_signed_out_requires_login() {
        let mut screen = BudgetScreen::new();
        assert!(!screen.needs_report());
        assert_eq!(screen.handle_key(key(KeyCode::Enter)), BudgetAction::RequireLogin);
        assert_eq!(screen.handle_key(key(KeyCode::Char('g'))), BudgetAction::None);

        screen.set_report(generate_budget(&mut StdRng::seed_from_u64(1)));
        assert!(screen.report().is_none());
    }

    #[test]
    fn test_sign_out_drops_report() {
        let mut screen = BudgetScreen::new();
        screen.set_signed_in(true);
        assert!(screen.needs_report());

        screen.set_report(generate_budget(&mut StdRng::seed_from_u64(1)));
        assert_eq!(screen.handle_key(key(KeyCode::Char('g'))), BudgetAction::Regenerate);

        screen.set_signed_in(false);
        assert!(screen.report().is_none());
    }

    #[test]
    fn test_renders_categories() {
        let mut screen = BudgetScreen::new();
        screen.set_signed_in(true);
        screen.set_report(generate_budget(&mut StdRng::seed_from_u64(3)));

        let area = Rect::new(0, 0, 100, 20);
        let mut buf = Buffer::empty(area);
        screen.render(area, &mut buf);

        let text: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|(x, y)| buf[(x, y)].symbol().to_string())
            .collect();
        assert!(text.contains("Income"));
        assert!(text.contains("Spending by category"));
    }
}
