//! Background worker that runs store, auth and weather calls off the UI loop.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::application::dto::{LoginRequest, LoginResponse};
use crate::application::services::pagination::ApplyOutcome;
use crate::application::services::{
    CollectionFetcher, Navigation, PageView, SessionService, WeatherService,
};
use crate::application::use_cases::{
    AddCourseUseCase, GetCourseUseCase, LoginUseCase, RemoveCoursesUseCase,
};
use crate::domain::entities::{Course, CurrentWeather, DocumentId, Forecast, NewCourse, User};
use crate::domain::errors::{AuthError, CourseError, WeatherError};

/// Results posted back to the UI loop.
#[derive(Debug)]
#[allow(missing_docs)]
pub enum Action {
    AuthChanged(Option<User>),
    SessionRestoreFailed(AuthError),
    LoginSucceeded(LoginResponse),
    LoginFailed(AuthError),
    SignOutFailed(AuthError),
    CoursesUpdated(PageView<Course>),
    CourseAdded(DocumentId),
    CourseAddFailed(CourseError),
    CoursesRemoved(usize),
    CourseRemoveFailed(CourseError),
    CourseLoaded(Course),
    CourseLoadFailed(CourseError),
    WeatherLoaded {
        current: CurrentWeather,
        forecast: Option<Forecast>,
    },
    WeatherFailed(WeatherError),
}

/// Requests from the UI loop to the worker.
#[derive(Debug)]
#[allow(missing_docs)]
pub enum BackendCommand {
    RestoreSession,
    Login(LoginRequest),
    SignOut,
    Courses(Navigation),
    AddCourse(NewCourse),
    RemoveCourses(Vec<DocumentId>),
    GetCourse(DocumentId),
    Weather(String),
}

/// Everything the worker talks to.
#[allow(missing_docs)]
pub struct BackendServices {
    pub session: Arc<SessionService>,
    pub login: LoginUseCase,
    pub courses: Arc<CollectionFetcher<Course>>,
    pub add_course: AddCourseUseCase,
    pub remove_courses: RemoveCoursesUseCase,
    pub get_course: GetCourseUseCase,
    pub weather: Arc<WeatherService>,
}

/// Worker that owns the services.
pub struct Backend {
    services: BackendServices,
    command_rx: mpsc::UnboundedReceiver<BackendCommand>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl Backend {
    /// Creates a worker reading `command_rx` and answering on `action_tx`.
    pub fn new(
        services: BackendServices,
        command_rx: mpsc::UnboundedReceiver<BackendCommand>,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        Self {
            services,
            command_rx,
            action_tx,
        }
    }

    /// Handles commands until the sender is dropped.
    pub async fn run(mut self) {
        info!("Backend worker started");
        while let Some(command) = self.command_rx.recv().await {
            self.handle_command(command).await;
        }
        info!("Backend worker stopped");
    }

    fn send(&self, action: Action) {
        if self.action_tx.send(action).is_err() {
            debug!("UI loop gone, dropping action");
        }
    }

    async fn handle_command(&self, command: BackendCommand) {
        match command {
            BackendCommand::RestoreSession => match self.services.session.restore().await {
                Ok(Some(user)) => debug!(uid = user.uid(), "Restored session"),
                Ok(None) => {}
                Err(e) => {
                    warn!(error = %e, "Failed to restore session");
                    self.send(Action::SessionRestoreFailed(e));
                }
            },
            BackendCommand::Login(request) => match self.services.login.execute(request).await {
                Ok(response) => self.send(Action::LoginSucceeded(response)),
                Err(e) => self.send(Action::LoginFailed(e)),
            },
            BackendCommand::SignOut => {
                if let Err(e) = self.services.session.sign_out().await {
                    error!(error = %e, "Failed to clear stored session");
                    self.send(Action::SignOutFailed(e));
                }
            }
            BackendCommand::Courses(navigation) => self.navigate(navigation),
            BackendCommand::AddCourse(course) => {
                match self.services.add_course.execute(course).await {
                    Ok(id) => {
                        info!(id = %id, "Course added");
                        self.send(Action::CourseAdded(id));
                        self.navigate(Navigation::Refresh);
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to add course");
                        self.send(Action::CourseAddFailed(e));
                    }
                }
            }
            BackendCommand::RemoveCourses(ids) => {
                match self.services.remove_courses.execute(&ids).await {
                    Ok(removed) => self.send(Action::CoursesRemoved(removed)),
                    Err(e) => {
                        warn!(error = %e, "Failed to remove courses");
                        self.send(Action::CourseRemoveFailed(e));
                    }
                }
                self.navigate(Navigation::Refresh);
            }
            BackendCommand::GetCourse(id) => match self.services.get_course.execute(&id).await {
                Ok(course) => self.send(Action::CourseLoaded(course)),
                Err(e) => {
                    warn!(id = %id, error = %e, "Failed to load course");
                    self.send(Action::CourseLoadFailed(e));
                }
            },
            BackendCommand::Weather(city) => {
                let weather = &self.services.weather;
                let (current, forecast) =
                    tokio::join!(weather.get_weather(&city), weather.get_forecast(&city));
                match current {
                    Ok(current) => {
                        let forecast = forecast
                            .inspect_err(|e| warn!(city, error = %e, "Forecast unavailable"))
                            .ok();
                        self.send(Action::WeatherLoaded { current, forecast });
                    }
                    Err(e) => {
                        warn!(city, error = %e, "Failed to load weather");
                        self.send(Action::WeatherFailed(e));
                    }
                }
            }
        }
    }

    /// Publishes the loading state, then completes the page query on its own
    /// task so a newer navigation can supersede it.
    fn navigate(&self, navigation: Navigation) {
        let Some(request) = self.services.courses.begin(navigation) else {
            debug!(?navigation, "Navigation is a no-op");
            return;
        };
        self.send(Action::CoursesUpdated(self.services.courses.view()));

        let courses = Arc::clone(&self.services.courses);
        let action_tx = self.action_tx.clone();
        tokio::spawn(async move {
            if courses.complete(&request).await == ApplyOutcome::Stale {
                return;
            }
            let _ = action_tx.send(Action::CoursesUpdated(courses.view()));
        });
    }
}
