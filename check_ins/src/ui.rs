//! State machine behind the check-ins page.
//!
//! The page script keeps one [`UiState`] value and routes every user action
//! and every API response through it. Event methods mutate the state and
//! return the [`Command`] (API call) the page has to dispatch next, so the
//! whole flow can be exercised without a browser.
//!
//! `assets/checkins.js` is the browser copy of this controller. Its event
//! functions mirror the methods here one for one; change both together.

use crate::{api::CHECK_INS_PATH, pagination::Page, resource::CheckInResource};
use std::collections::BTreeMap;

pub const CREATE_TITLE: &str = "Create Check-In";
pub const UPDATE_TITLE: &str = "Update Check-In";
pub const SUBMIT_LABEL: &str = "Submit";
pub const UPDATE_LABEL: &str = "Update";
pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this check-in?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Edit(i64),
}

/// Raw text of the form inputs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormFields {
    pub description: String,
    pub lat: String,
    pub lng: String,
    pub notes: String,
}

impl FormFields {
    pub fn value(&self, field: &str) -> Option<&str> {
        match field {
            "description" => Some(&self.description),
            "lat" => Some(&self.lat),
            "lng" => Some(&self.lng),
            "notes" => Some(&self.notes),
            _ => None,
        }
    }

    fn from_resource(check_in: &CheckInResource) -> Self {
        Self {
            description: check_in.description.clone(),
            lat: check_in.lat.map(|lat| lat.to_string()).unwrap_or_default(),
            lng: check_in.lng.map(|lng| lng.to_string()).unwrap_or_default(),
            notes: check_in.notes.clone().unwrap_or_default(),
        }
    }
}

/// One rendered table row
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: i64,
    pub description: String,
    pub location: String,
    pub created_at: String,
}

impl From<&CheckInResource> for Row {
    fn from(check_in: &CheckInResource) -> Self {
        let coordinate = |value: Option<f64>| value.map_or_else(|| "-".to_string(), |v| v.to_string());
        Self {
            id: check_in.id,
            description: check_in.description.clone(),
            location: format!("{}, {}", coordinate(check_in.lat), coordinate(check_in.lng)),
            created_at: check_in.created_at.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FetchPage(String),
    FetchCheckIn(i64),
    Create(FormFields),
    Update(i64, FormFields),
    Delete(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Prev,
    Next,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    pub mode: Mode,
    /// URL of the page currently shown, refetched after every mutation
    pub page_url: String,
    pub form: FormFields,
    /// First error message per field, shown next to the input
    pub errors: BTreeMap<String, String>,
    pub rows: Vec<Row>,
    pub prev: Option<String>,
    pub next: Option<String>,
    pub last_failure: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            mode: Mode::Create,
            page_url: CHECK_INS_PATH.to_string(),
            form: FormFields::default(),
            errors: BTreeMap::new(),
            rows: Vec::new(),
            prev: None,
            next: None,
            last_failure: None,
        }
    }
}

impl UiState {
    /// Initial state and the first page fetch
    pub fn load() -> (Self, Command) {
        let state = Self::default();
        let command = state.refresh();
        (state, command)
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            Mode::Create => CREATE_TITLE,
            Mode::Edit(_) => UPDATE_TITLE,
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            Mode::Create => SUBMIT_LABEL,
            Mode::Edit(_) => UPDATE_LABEL,
        }
    }

    pub fn refresh(&self) -> Command {
        Command::FetchPage(self.page_url.clone())
    }

    /// Replace the table and pagination controls with a fetched page.
    pub fn page_loaded(&mut self, page_url: &str, page: &Page<CheckInResource>) {
        self.page_url = page_url.to_string();
        self.rows = page.data.iter().map(Row::from).collect();
        self.prev = page.links.prev.clone();
        self.next = page.links.next.clone();
    }

    /// `None` when the API did not provide the link.
    pub fn follow(&self, link: PageLink) -> Option<Command> {
        let url = match link {
            PageLink::Prev => self.prev.as_ref(),
            PageLink::Next => self.next.as_ref(),
        };
        url.map(|url| Command::FetchPage(url.clone()))
    }

    pub fn submit(&self) -> Command {
        match self.mode {
            Mode::Create => Command::Create(self.form.clone()),
            Mode::Edit(id) => Command::Update(id, self.form.clone()),
        }
    }

    /// Create or Update succeeded: back to an empty create form and a
    /// refreshed list.
    pub fn saved(&mut self) -> Command {
        self.reset();
        self.refresh()
    }

    /// Show the first message of each failed field, but only next to inputs
    /// that are still empty. The form keeps its values for correction.
    pub fn validation_failed(&mut self, errors: &BTreeMap<String, Vec<String>>) {
        self.errors.clear();
        for (field, messages) in errors {
            let empty_input = self.form.value(field).is_some_and(str::is_empty);
            if let (true, Some(message)) = (empty_input, messages.first()) {
                self.errors.insert(field.clone(), message.clone());
            }
        }
    }

    pub fn view(&self, id: i64) -> Command {
        Command::FetchCheckIn(id)
    }

    pub fn viewed(&mut self, check_in: &CheckInResource) {
        self.form = FormFields::from_resource(check_in);
        self.errors.clear();
        self.mode = Mode::Edit(check_in.id);
    }

    /// Deleting requires the user to have confirmed [`DELETE_CONFIRMATION`].
    pub fn delete(&self, id: i64, confirmed: bool) -> Option<Command> {
        confirmed.then_some(Command::Delete(id))
    }

    pub fn deleted(&mut self) -> Command {
        self.refresh()
    }

    /// Not found or server failures are logged, never shown as field errors.
    pub fn failed(&mut self, message: impl Into<String>) {
        self.last_failure = Some(message.into());
    }

    pub fn reset(&mut self) {
        self.mode = Mode::Create;
        self.form = FormFields::default();
        self.errors.clear();
    }
}
