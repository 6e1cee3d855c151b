//! Main application orchestrator.

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent};
use futures_util::StreamExt;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::backend::{Action, Backend, BackendCommand, BackendServices};
use super::budget_screen::{BudgetAction, BudgetScreen};
use super::courses_screen::{CoursesAction, CoursesScreen};
use super::login_screen::{LoginAction, LoginScreen};
use super::weather_screen::{WeatherAction, WeatherScreen};
use crate::application::services::{BudgetService, Navigation, Subscription};
use crate::domain::entities::User;
use crate::domain::errors::AuthError;
use crate::presentation::events::{EventHandler, EventResult};
use crate::presentation::widgets::{HeaderBar, StatusBar, StatusMessage, Tab};

const GLOBAL_HINTS: &str = "1-3 tabs  l login  o sign out  q quit";

/// Start-up options that are not services.
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// City looked up when the app starts; blank skips the lookup.
    pub initial_city: String,
    /// Try to restore the stored session on start-up.
    pub restore_session: bool,
}

/// Top-level UI state and event loop.
pub struct App {
    tab: Tab,
    login: Option<LoginScreen>,
    courses: CoursesScreen,
    weather: WeatherScreen,
    budget: BudgetScreen,
    budget_service: BudgetService,
    user: Option<User>,
    status: Option<StatusMessage>,
    reload_courses_on_auth: bool,
    command_tx: mpsc::UnboundedSender<BackendCommand>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    _auth_subscription: Subscription,
    exiting: bool,
}

impl App {
    /// Wires the UI to the worker. Must be called inside a tokio runtime.
    #[must_use]
    pub fn new(services: BackendServices, options: &AppOptions) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let auth_tx = action_tx.clone();
        let auth_subscription = services.session.on_state_change(move |user| {
            let _ = auth_tx.send(Action::AuthChanged(user));
        });
        let reload_courses_on_auth = services.courses.config().require_auth;

        tokio::spawn(Backend::new(services, command_rx, action_tx).run());

        let app = Self {
            tab: Tab::Courses,
            login: None,
            courses: CoursesScreen::new(),
            weather: WeatherScreen::new(&options.initial_city),
            budget: BudgetScreen::new(),
            budget_service: BudgetService,
            user: None,
            status: None,
            reload_courses_on_auth,
            command_tx,
            action_rx,
            _auth_subscription: auth_subscription,
            exiting: false,
        };

        if options.restore_session {
            app.dispatch(BackendCommand::RestoreSession);
        }
        app.dispatch(BackendCommand::Courses(Navigation::First));
        if !app.weather.city().is_empty() {
            app.dispatch(BackendCommand::Weather(app.weather.city().to_string()));
        }
        app
    }

    /// Runs until the user quits. Returns the city last typed on the
    /// weather tab.
    ///
    /// # Errors
    /// Returns error if drawing to the terminal fails.
    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<String> {
        let mut terminal_events = EventStream::new();
        terminal.draw(|frame| self.render(frame))?;

        while !self.exiting {
            tokio::select! {
                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action);
                }
                event = terminal_events.next() => match event {
                    Some(Ok(Event::Key(key))) => {
                        if self.handle_key(key) == EventResult::Exit {
                            self.exiting = true;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "Terminal event error");
                    }
                    None => self.exiting = true,
                },
            }
            terminal.draw(|frame| self.render(frame))?;
        }

        info!("Application exiting normally");
        Ok(self.weather.city().to_string())
    }

    fn dispatch(&self, command: BackendCommand) {
        if self.command_tx.send(command).is_err() {
            warn!("Backend worker is gone");
        }
    }

    fn open_login(&mut self) {
        if self.user.is_some() {
            self.status = Some(StatusMessage::info("Already signed in"));
        } else if self.login.is_none() {
            self.login = Some(LoginScreen::new());
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.ensure_budget();
    }

    fn ensure_budget(&mut self) {
        if self.tab == Tab::Budget && self.budget.needs_report() {
            self.budget.set_report(self.budget_service.regenerate());
        }
    }

    fn is_editing(&self) -> bool {
        match self.tab {
            Tab::Courses => self.courses.is_editing(),
            Tab::Weather => true,
            Tab::Budget => false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> EventResult {
        if !EventHandler::is_press(&key) {
            return EventResult::Continue;
        }
        if EventHandler::is_force_quit_event(&key) {
            return EventResult::Exit;
        }

        if let Some(login) = &mut self.login {
            match login.handle_key(key) {
                LoginAction::Submit(request) => {
                    login.set_validating();
                    self.dispatch(BackendCommand::Login(request));
                }
                LoginAction::Cancel => self.login = None,
                LoginAction::None => {}
            }
            return EventResult::Continue;
        }

        if let KeyCode::F(n) = key.code
            && let Some(tab) = char::from_digit(u32::from(n), 10).and_then(Tab::from_digit)
        {
            self.switch_tab(tab);
            return EventResult::Continue;
        }

        if !self.is_editing() {
            if EventHandler::is_quit_event(&key) {
                return EventResult::Exit;
            }
            match key.code {
                KeyCode::Char(c @ '1'..='9') => {
                    if let Some(tab) = Tab::from_digit(c) {
                        self.switch_tab(tab);
                    }
                    return EventResult::Continue;
                }
                KeyCode::Tab => {
                    self.switch_tab(self.tab.next());
                    return EventResult::Continue;
                }
                KeyCode::Char('l') => {
                    self.open_login();
                    return EventResult::Continue;
                }
                KeyCode::Char('o') if self.user.is_some() => {
                    self.dispatch(BackendCommand::SignOut);
                    return EventResult::Continue;
                }
                _ => {}
            }
        } else if self.tab == Tab::Weather && key.code == KeyCode::Tab {
            self.switch_tab(self.tab.next());
            return EventResult::Continue;
        }

        match self.tab {
            Tab::Courses => {
                let action = self.courses.handle_key(key);
                self.handle_courses_action(action);
            }
            Tab::Weather => {
                if let WeatherAction::Lookup(city) = self.weather.handle_key(key) {
                    self.weather.set_loading();
                    self.dispatch(BackendCommand::Weather(city));
                }
            }
            Tab::Budget => match self.budget.handle_key(key) {
                BudgetAction::Regenerate => {
                    self.budget.set_report(self.budget_service.regenerate());
                }
                BudgetAction::RequireLogin => self.open_login(),
                BudgetAction::None => {}
            },
        }
        EventResult::Continue
    }

    fn handle_courses_action(&mut self, action: CoursesAction) {
        match action {
            CoursesAction::None => {}
            CoursesAction::Navigate(navigation) => {
                self.dispatch(BackendCommand::Courses(navigation));
            }
            CoursesAction::Add(course) => self.dispatch(BackendCommand::AddCourse(course)),
            CoursesAction::Remove(ids) => {
                self.status = Some(StatusMessage::info(format!(
                    "Removing {} course(s)...",
                    ids.len()
                )));
                self.dispatch(BackendCommand::RemoveCourses(ids));
            }
            CoursesAction::Open(id) => self.dispatch(BackendCommand::GetCourse(id)),
            CoursesAction::RequireLogin => {
                self.status = Some(StatusMessage::warning("Sign in to manage courses"));
                self.open_login();
            }
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::AuthChanged(user) => self.handle_auth_changed(user),
            Action::SessionRestoreFailed(e) => {
                let message = if matches!(e, AuthError::SessionExpired) {
                    "Saved session expired, please sign in again".to_string()
                } else {
                    format!("Could not restore session: {e}")
                };
                self.status = Some(StatusMessage::warning(message));
            }
            Action::LoginSucceeded(response) => {
                info!(uid = response.user.uid(), mode = %response.mode, "Login successful");
                self.login = None;
                self.status = Some(StatusMessage::success(format!(
                    "Welcome, {}",
                    response.user.display_name()
                )));
            }
            Action::LoginFailed(e) => {
                if let Some(login) = &mut self.login {
                    login.set_error(e.to_string());
                }
            }
            Action::SignOutFailed(e) => {
                self.status = Some(StatusMessage::error(format!(
                    "Signed out, but the saved session could not be removed: {e}"
                )));
            }
            Action::CoursesUpdated(view) => self.courses.set_view(view),
            Action::CourseAdded(id) => {
                debug!(id = %id, "Course added");
                self.courses.course_added();
                self.status = Some(StatusMessage::success("Course added"));
            }
            Action::CourseAddFailed(e) => {
                self.courses.course_add_failed(e.to_string());
            }
            Action::CoursesRemoved(removed) => {
                self.courses.courses_removed();
                self.status = Some(StatusMessage::success(format!(
                    "Removed {removed} course(s)"
                )));
            }
            Action::CourseRemoveFailed(e) => {
                self.status = Some(StatusMessage::error(e.to_string()));
            }
            Action::CourseLoaded(course) => self.courses.course_loaded(course),
            Action::CourseLoadFailed(e) => self.courses.course_load_failed(e.to_string()),
            Action::WeatherLoaded { current, forecast } => {
                self.weather.set_result(current, forecast);
            }
            Action::WeatherFailed(e) => self.weather.set_error(e.to_string()),
        }
    }

    fn handle_auth_changed(&mut self, user: Option<User>) {
        let was_signed_in = self.user.is_some();
        let signed_in = user.is_some();
        self.user = user;

        self.courses.set_signed_in(signed_in);
        self.budget.set_signed_in(signed_in);
        self.ensure_budget();

        if was_signed_in && !signed_in {
            self.status = Some(StatusMessage::info("Signed out"));
        }
        if was_signed_in != signed_in && self.reload_courses_on_auth {
            self.dispatch(BackendCommand::Courses(Navigation::First));
        }
    }

    fn hints(&self) -> &'static str {
        if self.login.is_some() {
            return "ctrl+c quit";
        }
        match self.tab {
            Tab::Courses => self.courses.hints(),
            Tab::Weather => "enter look up  esc clear  tab next tab  ctrl+c quit",
            Tab::Budget if self.user.is_some() => "g regenerate  o sign out  1-3 tabs  q quit",
            Tab::Budget => GLOBAL_HINTS,
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(
            HeaderBar::new(crate::NAME, crate::VERSION)
                .active(self.tab)
                .user(self.user.as_ref().map(User::email)),
            header,
        );

        let buf = frame.buffer_mut();
        match self.tab {
            Tab::Courses => self.courses.render(body, buf),
            Tab::Weather => self.weather.render(body, buf),
            Tab::Budget => self.budget.render(body, buf),
        }

        if let Some(login) = &self.login {
            frame.render_widget(login, body);
        }

        frame.render_widget(StatusBar::new(self.status.as_ref(), self.hints()), footer);
    }
}
