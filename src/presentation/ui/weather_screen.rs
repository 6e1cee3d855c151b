//! City weather lookup.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, Widget},
};

use crate::domain::entities::{CurrentWeather, Forecast};
use crate::presentation::widgets::TextInput;

/// Forecast rows shown; the API returns 3-hourly samples.
const FORECAST_ROWS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum WeatherAction {
    None,
    Lookup(String),
}

/// Weather tab.
pub struct WeatherScreen {
    city: TextInput,
    current: Option<CurrentWeather>,
    forecast: Option<Forecast>,
    loading: bool,
    error: Option<String>,
}

impl WeatherScreen {
    /// A screen with `initial_city` in the input.
    #[must_use]
    pub fn new(initial_city: &str) -> Self {
        let mut city = TextInput::new("City").placeholder("e.g. London");
        city.set_value(initial_city);
        city.set_focused(true);
        Self {
            city,
            current: None,
            forecast: None,
            loading: false,
            error: None,
        }
    }

    /// Text of the city input.
    #[must_use]
    pub fn city(&self) -> &str {
        self.city.value().trim()
    }

    /// Whether a reading is on screen.
    #[must_use]
    pub const fn has_result(&self) -> bool {
        self.current.is_some()
    }

    /// Marks a lookup as running.
    pub fn set_loading(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Shows a reading; a missing forecast hides the table.
    pub fn set_result(&mut self, current: CurrentWeather, forecast: Option<Forecast>) {
        self.loading = false;
        self.current = Some(current);
        self.forecast = forecast;
    }

    /// Keeps the last successful reading on screen.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    /// Maps a key press to an action.
    pub fn handle_key(&mut self, key: KeyEvent) -> WeatherAction {
        match key.code {
            KeyCode::Enter if !self.loading => {
                let city = self.city();
                if city.is_empty() {
                    self.error = Some("Enter a city name".to_string());
                } else {
                    return WeatherAction::Lookup(city.to_string());
                }
            }
            KeyCode::Esc => self.city.clear(),
            _ => {
                self.city.handle_key(key);
            }
        }
        WeatherAction::None
    }

    /// Draws the tab.
    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let [input, status, current, forecast] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(7),
            Constraint::Fill(1),
        ])
        .areas(area);

        (&self.city).render(input, buf);

        let status_line = if self.loading {
            Line::from(Span::styled(
                "Fetching weather...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            ))
        } else if let Some(error) = &self.error {
            Line::from(Span::styled(error.as_str(), Style::default().fg(Color::Red)))
        } else {
            Line::default()
        };
        Paragraph::new(status_line).render(status, buf);

        self.render_current(current, buf);
        self.render_forecast(forecast, buf);
    }

    fn render_current(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Now ");

        let Some(weather) = &self.current else {
            Paragraph::new("Press Enter to look up the weather.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block)
                .render(area, buf);
            return;
        };

        let label = Style::default().fg(Color::Gray);
        let lines = vec![
            Line::from(Span::styled(
                weather.city.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("Temperature: ", label),
                Span::raw(format!("{:.1}°C", weather.temperature)),
            ]),
            Line::from(vec![
                Span::styled("Humidity: ", label),
                Span::raw(format!("{}%", weather.humidity)),
            ]),
            Line::from(vec![
                Span::styled("Conditions: ", label),
                Span::raw(weather.description.clone()),
            ]),
            Line::from(vec![
                Span::styled("Wind: ", label),
                Span::raw(format!("{:.1} m/s", weather.wind_speed)),
            ]),
        ];
        Paragraph::new(lines).block(block).render(area, buf);
    }

    fn render_forecast(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Forecast ");

        let Some(forecast) = &self.forecast else {
            block.render(area, buf);
            return;
        };

        let rows = forecast.samples.iter().take(FORECAST_ROWS).map(|sample| {
            Row::new(vec![
                sample.timestamp.format("%a %H:%M").to_string(),
                format!("{:.1}°C", sample.temperature),
                sample.description.clone(),
            ])
        });

        Table::new(
            rows,
            [
                Constraint::Length(10),
                Constraint::Length(8),
                Constraint::Fill(1),
            ],
        )
        .header(Row::new(vec!["When", "Temp", "Conditions"]).style(Style::default().fg(Color::Gray)))
        .block(block)
        .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn london() -> CurrentWeather {
        CurrentWeather {
            city: "London".into(),
            temperature: 11.5,
            humidity: 81,
            description: "light rain".into(),
            wind_speed: 4.1,
        }
    }

    #[test]
    fn test_enter_looks_up_trimmed_city() {
        let mut screen = WeatherScreen::new("London ");
        assert_eq!(
            screen.handle_key(key(KeyCode::Enter)),
            WeatherAction::Lookup("London".into())
        );
    }

    #[test]
    fn test_blank_city_sets_error() {
        let mut screen = WeatherScreen::new("");
        assert_eq!(screen.handle_key(key(KeyCode::Enter)), WeatherAction::None);
        assert!(screen.error.is_some());
    }

    #[test]
    fn test_no_lookup_while_loading() {
        let mut screen = WeatherScreen::new("Paris");
        screen.set_loading();
        assert_eq!(screen.handle_key(key(KeyCode::Enter)), WeatherAction::None);
    }

    #[test]
    fn test_error_keeps_previous_reading() {
        let mut screen = WeatherScreen::new("London");
        screen.set_result(london(), None);
        screen.set_loading();
        screen.set_error("city 'Atlantis' not found");

        assert!(screen.has_result());
        assert!(!screen.loading);
    }
}
