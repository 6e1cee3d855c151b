//! Course catalogue: paged list, multi-select removal, add form and detail
//! view.

use std::collections::BTreeSet;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, List, ListItem, ListState, Paragraph, StatefulWidget, Widget, Wrap,
    },
};

use crate::application::services::{Navigation, PageView};
use crate::domain::entities::{Course, DocumentId, NewCourse};
use crate::presentation::widgets::{PaginationBar, TextInput};

const FORM_FIELDS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum CoursesAction {
    None,
    Navigate(Navigation),
    Add(NewCourse),
    Remove(Vec<DocumentId>),
    Open(DocumentId),
    /// A signed-in user is needed for the requested operation.
    RequireLogin,
}

/// Add-course form.
pub struct CourseForm {
    inputs: [TextInput; FORM_FIELDS],
    focus: usize,
    submitting: bool,
    error: Option<String>,
}

impl CourseForm {
    fn new() -> Self {
        let mut inputs = [
            TextInput::new("Title"),
            TextInput::new("Description"),
            TextInput::new("Instructor"),
        ];
        inputs[0].set_focused(true);
        Self {
            inputs,
            focus: 0,
            submitting: false,
            error: None,
        }
    }

    fn focus(&mut self, index: usize) {
        self.focus = index % FORM_FIELDS;
        for (i, input) in self.inputs.iter_mut().enumerate() {
            input.set_focused(i == self.focus);
        }
    }

    fn course(&self) -> NewCourse {
        let [title, description, instructor] = &self.inputs;
        NewCourse::new(title.value(), description.value(), instructor.value())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<CoursesAction> {
        if self.submitting {
            return None;
        }
        self.error = None;

        match key.code {
            KeyCode::Esc => return Some(CoursesAction::None),
            KeyCode::Tab | KeyCode::Down => self.focus(self.focus + 1),
            KeyCode::BackTab | KeyCode::Up => self.focus(self.focus + FORM_FIELDS - 1),
            KeyCode::Enter if self.focus + 1 < FORM_FIELDS => self.focus(self.focus + 1),
            KeyCode::Enter => {
                let course = self.course();
                if let Some(field) = course.first_blank_field() {
                    self.error = Some(format!("{field} is required"));
                } else {
                    self.submitting = true;
                    return Some(CoursesAction::Add(course));
                }
            }
            _ => {
                self.inputs[self.focus].handle_key(key);
            }
        }
        None
    }
}

enum Detail {
    Loading(DocumentId),
    Loaded(Course),
    Failed(String),
}

enum Mode {
    Browse,
    Form(CourseForm),
    Detail(Detail),
}

/// State of the courses tab.
pub struct CoursesScreen {
    view: PageView<Course>,
    list_state: ListState,
    marked: BTreeSet<DocumentId>,
    mode: Mode,
    signed_in: bool,
}

impl CoursesScreen {
    /// An empty, signed-out screen.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view: PageView {
                loading: true,
                ..PageView::default()
            },
            list_state: ListState::default(),
            marked: BTreeSet::new(),
            mode: Mode::Browse,
            signed_in: false,
        }
    }

    /// Replaces the displayed page. Marks on courses that are no longer
    /// visible are dropped.
    pub fn set_view(&mut self, view: PageView<Course>) {
        let page_changed = view.current_page != self.view.current_page;
        self.marked
            .retain(|id| view.items.iter().any(|c| c.id() == id));
        self.view = view;

        let len = self.view.items.len();
        let selected = match self.list_state.selected() {
            _ if len == 0 => None,
            Some(_) if page_changed => Some(0),
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
        self.list_state.select(selected);
    }

    /// The page on screen.
    #[must_use]
    pub const fn view(&self) -> &PageView<Course> {
        &self.view
    }

    /// Enables or disables the editing keys.
    pub fn set_signed_in(&mut self, signed_in: bool) {
        self.signed_in = signed_in;
        if !signed_in && matches!(self.mode, Mode::Form(_)) {
            self.mode = Mode::Browse;
        }
    }

    /// Whether a text field currently has focus.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        matches!(self.mode, Mode::Form(_))
    }

    /// Ids marked for removal on the visible page.
    #[must_use]
    pub fn marked(&self) -> Vec<DocumentId> {
        self.marked.iter().cloned().collect()
    }

    fn highlighted(&self) -> Option<&Course> {
        self.view.items.get(self.list_state.selected()?)
    }

    /// Closes the add form.
    pub fn course_added(&mut self) {
        self.mode = Mode::Browse;
    }

    /// Keeps the add form open with an error.
    pub fn course_add_failed(&mut self, message: impl Into<String>) {
        if let Mode::Form(form) = &mut self.mode {
            form.submitting = false;
            form.error = Some(message.into());
        }
    }

    /// Clears the marks.
    pub fn courses_removed(&mut self) {
        self.marked.clear();
    }

    /// Shows `course` if it is the one being opened.
    pub fn course_loaded(&mut self, course: Course) {
        if let Mode::Detail(Detail::Loading(id)) = &self.mode
            && id == course.id()
        {
            self.mode = Mode::Detail(Detail::Loaded(course));
        }
    }

    /// Shows why the detail view is empty.
    pub fn course_load_failed(&mut self, message: impl Into<String>) {
        if matches!(self.mode, Mode::Detail(Detail::Loading(_))) {
            self.mode = Mode::Detail(Detail::Failed(message.into()));
        }
    }

    /// Maps a key press to an action.
    pub fn handle_key(&mut self, key: KeyEvent) -> CoursesAction {
        match &mut self.mode {
            Mode::Form(form) => {
                return match form.handle_key(key) {
                    Some(CoursesAction::None) => {
                        self.mode = Mode::Browse;
                        CoursesAction::None
                    }
                    Some(action) => action,
                    None => CoursesAction::None,
                };
            }
            Mode::Detail(_) => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace) {
                    self.mode = Mode::Browse;
                }
                return CoursesAction::None;
            }
            Mode::Browse => {}
        }

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.list_state.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.list_state.select_previous(),
            KeyCode::Char('n') | KeyCode::Right | KeyCode::PageDown if self.view.has_more => {
                return CoursesAction::Navigate(Navigation::Next);
            }
            KeyCode::Char('p') | KeyCode::Left | KeyCode::PageUp if self.view.has_previous => {
                return CoursesAction::Navigate(Navigation::Previous);
            }
            KeyCode::Char('r') => return CoursesAction::Navigate(Navigation::Refresh),
            KeyCode::Char('g') => return CoursesAction::Navigate(Navigation::First),
            KeyCode::Char(' ') => {
                if let Some(id) = self.highlighted().map(|c| c.id().clone())
                    && !self.marked.remove(&id)
                {
                    self.marked.insert(id);
                }
            }
            KeyCode::Enter => {
                if let Some(id) = self.highlighted().map(|c| c.id().clone()) {
                    self.mode = Mode::Detail(Detail::Loading(id.clone()));
                    return CoursesAction::Open(id);
                }
            }
            KeyCode::Char('a') => {
                if !self.signed_in {
                    return CoursesAction::RequireLogin;
                }
                self.mode = Mode::Form(CourseForm::new());
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if !self.signed_in {
                    return CoursesAction::RequireLogin;
                }
                let ids = if self.marked.is_empty() {
                    self.highlighted().map(|c| vec![c.id().clone()]).unwrap_or_default()
                } else {
                    self.marked()
                };
                if !ids.is_empty() {
                    return CoursesAction::Remove(ids);
                }
            }
            _ => {}
        }
        CoursesAction::None
    }

    /// Key hints for the footer.
    #[must_use]
    pub const fn hints(&self) -> &'static str {
        match self.mode {
            Mode::Browse => "n/p page  r refresh  space mark  a add  d delete  enter open",
            Mode::Form(_) => "tab next field  enter submit  esc cancel",
            Mode::Detail(_) => "esc back",
        }
    }

    /// Draws the tab.
    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let [list_area, pager_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);

        self.render_list(list_area, buf);
        PaginationBar::new(&self.view).render(pager_area, buf);

        match &self.mode {
            Mode::Browse => {}
            Mode::Form(form) => render_form(form, area, buf),
            Mode::Detail(detail) => render_detail(detail, area, buf),
        }
    }

    fn render_list(&mut self, area: Rect, buf: &mut Buffer) {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Courses ");
        if let Some(error) = &self.view.error {
            block = block.title_bottom(Line::from(Span::styled(
                format!(" {error} "),
                Style::default().fg(Color::Red),
            )));
        }

        if self.view.items.is_empty() {
            let text = if self.view.loading {
                "Loading courses..."
            } else if self.view.error.is_some() {
                "Could not load courses. Press r to retry."
            } else {
                "No courses yet."
            };
            Paragraph::new(text)
                .style(Style::default().fg(Color::DarkGray))
                .block(block)
                .render(area, buf);
            return;
        }

        let items: Vec<ListItem> = self
            .view
            .items
            .iter()
            .map(|course| {
                let mark = if self.marked.contains(course.id()) {
                    "[x] "
                } else {
                    "[ ] "
                };
                ListItem::new(Line::from(vec![
                    Span::styled(mark, Style::default().fg(Color::Yellow)),
                    Span::styled(
                        course.title().to_string(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  {}", course.instructor()),
                        Style::default().fg(Color::Gray),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("> ");
        StatefulWidget::render(list, area, buf, &mut self.list_state);
    }
}

impl Default for CoursesScreen {
    fn default() -> Self {
        Self::new()
    }
}

fn popup(area: Rect, width: u16, height: u16) -> Rect {
    let [_, vertical, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .areas(area);
    let [_, popup, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width),
        Constraint::Fill(1),
    ])
    .areas(vertical);
    popup
}

fn render_form(form: &CourseForm, area: Rect, buf: &mut Buffer) {
    let area = popup(area, 60, 13);
    Clear.render(area, buf);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Add course ");
    let inner = block.inner(area);
    block.render(area, buf);

    let [title, description, instructor, status] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(inner);
    for (input, slot) in form.inputs.iter().zip([title, description, instructor]) {
        input.render(slot, buf);
    }

    let line = if form.submitting {
        Line::from(Span::styled("Saving...", Style::default().fg(Color::Yellow)))
    } else if let Some(error) = &form.error {
        Line::from(Span::styled(error.as_str(), Style::default().fg(Color::Red)))
    } else {
        Line::default()
    };
    Paragraph::new(line).render(status, buf);
}

fn render_detail(detail: &Detail, area: Rect, buf: &mut Buffer) {
    let area = popup(area, 70, 14);
    Clear.render(area, buf);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Course ");

    let lines = match detail {
        Detail::Loading(_) => vec![Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::Yellow),
        ))],
        Detail::Failed(error) => vec![Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        ))],
        Detail::Loaded(course) => {
            let label = Style::default().fg(Color::Gray);
            let created = course
                .created_at()
                .map_or_else(|| "unknown".to_string(), |at| at.format("%Y-%m-%d %H:%M").to_string());
            vec![
                Line::from(Span::styled(
                    course.title().to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(vec![
                    Span::styled("Instructor: ", label),
                    Span::raw(course.instructor().to_string()),
                ]),
                Line::from(vec![Span::styled("Created: ", label), Span::raw(created)]),
                Line::default(),
                Line::from(course.description().to_string()),
            ]
        }
    };

    Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}
