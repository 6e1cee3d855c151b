//! Email and password login form.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::application::dto::{LoginMode, LoginRequest};
use crate::presentation::widgets::TextInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum LoginState {
    Input,
    Validating,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Email,
    Password,
}

#[derive(Debug, Clone)]
#[allow(missing_docs)]
pub enum LoginAction {
    None,
    Submit(LoginRequest),
    Cancel,
}

/// Login form UI.
pub struct LoginScreen {
    email: TextInput,
    password: TextInput,
    focus: Field,
    mode: LoginMode,
    state: LoginState,
    error_message: Option<String>,
}

impl LoginScreen {
    /// An empty sign-in form.
    #[must_use]
    pub fn new() -> Self {
        let mut email = TextInput::new("Email").placeholder("you@university.edu");
        email.set_focused(true);

        Self {
            email,
            password: TextInput::new("Password").password(),
            focus: Field::Email,
            mode: LoginMode::SignIn,
            state: LoginState::Input,
            error_message: None,
        }
    }

    /// Form state.
    #[must_use]
    pub const fn state(&self) -> LoginState {
        self.state
    }

    /// Sign in or sign up.
    #[must_use]
    pub const fn mode(&self) -> LoginMode {
        self.mode
    }

    /// Marks the form as waiting for the server.
    pub fn set_validating(&mut self) {
        self.state = LoginState::Validating;
        self.error_message = None;
    }

    /// Shows `message` and clears the password.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.state = LoginState::Error;
        self.error_message = Some(message.into());
        self.password.clear();
    }

    fn focus(&mut self, field: Field) {
        self.focus = field;
        self.email.set_focused(field == Field::Email);
        self.password.set_focused(field == Field::Password);
    }

    fn focused_input(&mut self) -> &mut TextInput {
        match self.focus {
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
        }
    }

    /// Maps a key press to an action.
    pub fn handle_key(&mut self, key: KeyEvent) -> LoginAction {
        if self.state == LoginState::Validating {
            return LoginAction::None;
        }
        if self.state == LoginState::Error {
            self.state = LoginState::Input;
            self.error_message = None;
        }

        match key.code {
            KeyCode::Esc => return LoginAction::Cancel,
            KeyCode::Tab | KeyCode::Down | KeyCode::BackTab | KeyCode::Up => {
                let next = match self.focus {
                    Field::Email => Field::Password,
                    Field::Password => Field::Email,
                };
                self.focus(next);
            }
            KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.mode = self.mode.toggled();
            }
            KeyCode::Enter => match self.focus {
                Field::Email => self.focus(Field::Password),
                Field::Password => {
                    let request = LoginRequest::new(self.email.value(), self.password.value())
                        .with_mode(self.mode);
                    return LoginAction::Submit(request);
                }
            },
            _ => {
                self.focused_input().handle_key(key);
            }
        }

        LoginAction::None
    }

    fn render_inner(&self, area: Rect, buf: &mut Buffer) {
        let [_, center, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(14),
            Constraint::Fill(1),
        ])
        .areas(area);
        let [_, content_area, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Min(50),
            Constraint::Fill(1),
        ])
        .areas(center);

        Clear.render(content_area, buf);

        let title = match self.mode {
            LoginMode::SignIn => " Sign in ",
            LoginMode::SignUp => " Create account ",
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title);
        let inner = block.inner(content_area);
        block.render(content_area, buf);

        let [intro, _, email, password, _, hints, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        Paragraph::new("Sign in to manage courses and view the budget")
            .style(Style::default().fg(Color::White))
            .render(intro, buf);
        (&self.email).render(email, buf);
        (&self.password).render(password, buf);

        let dim = Style::default().fg(Color::DarkGray);
        Paragraph::new(Line::from(vec![
            Span::styled("Enter: Submit", dim),
            Span::raw(" | "),
            Span::styled("Tab: Next field", dim),
            Span::raw(" | "),
            Span::styled(format!("Ctrl+T: {}", self.mode.toggled()), dim),
            Span::raw(" | "),
            Span::styled("Esc: Back", dim),
        ]))
        .render(hints, buf);

        let status_line = match self.state {
            LoginState::Input => Line::default(),
            LoginState::Validating => Line::from(Span::styled(
                "Contacting the auth service...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )),
            LoginState::Error => Line::from(Span::styled(
                format!(
                    "Error: {}",
                    self.error_message.as_deref().unwrap_or("Unknown error")
                ),
                Style::default().fg(Color::Red),
            )),
        };
        Paragraph::new(status_line).render(status, buf);
    }
}

impl Default for LoginScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for &LoginScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.render_inner(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(screen: &mut LoginScreen, text: &str) {
        for c in text.chars() {
            screen.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_initial_state() {
        let screen = LoginScreen::new();
        assert_eq!(screen.state(), LoginState::Input);
        assert_eq!(screen.mode(), LoginMode::SignIn);
    }

    #[test]
    fn test_enter_moves_to_password_then_submits() {
        let mut screen = LoginScreen::new();
        type_text(&mut screen, "ada@uni.edu");
        assert!(matches!(
            screen.handle_key(key(KeyCode::Enter)),
            LoginAction::None
        ));
        type_text(&mut screen, "pw1234");

        let LoginAction::Submit(request) = screen.handle_key(key(KeyCode::Enter)) else {
            panic!("expected submit");
        };
        assert_eq!(request.email, "ada@uni.edu");
        assert_eq!(request.password, "pw1234");
        assert_eq!(request.mode, LoginMode::SignIn);
    }

    #[test]
    fn test_toggle_mode() {
        let mut screen = LoginScreen::new();
        screen.handle_key(KeyEvent::new(KeyCode::Char('t'), KeyModifiers::CONTROL));
        assert_eq!(screen.mode(), LoginMode::SignUp);
        assert!(screen.email.value().is_empty());
    }

    #[test]
    fn test_error_clears_password_and_next_key_resets() {
        let mut screen = LoginScreen::new();
        screen.handle_key(key(KeyCode::Tab));
        type_text(&mut screen, "wrong");
        screen.set_error("invalid email or password");
        assert!(screen.password.value().is_empty());

        screen.handle_key(key(KeyCode::Char('x')));
        assert_eq!(screen.state(), LoginState::Input);
    }

    #[test]
    fn test_keys_ignored_while_validating() {
        let mut screen = LoginScreen::new();
        screen.set_validating();
        assert!(matches!(
            screen.handle_key(key(KeyCode::Esc)),
            LoginAction::None
        ));
    }

    #[test]
    fn test_escape_cancels() {
        let mut screen = LoginScreen::new();
        assert!(matches!(
            screen.handle_key(key(KeyCode::Esc)),
            LoginAction::Cancel
        ));
    }
}
