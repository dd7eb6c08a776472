use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::models::SearchQuery;

/// Message shown under a field that fails the `required` rule.
pub(crate) const REQUIRED: &str = "Required";

/// Raw contents of the two search fields.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct FormValues {
    pub(crate) artist: String,
    pub(crate) song: String,
}

/// Fails when the value is empty or whitespace only.
pub(crate) fn required(value: &str) -> Option<&'static str> {
    if value.trim().is_empty() {
        Some(REQUIRED)
    } else {
        None
    }
}

/// Per-field validation outcome.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ValidationResult {
    pub(crate) artist: Option<&'static str>,
    pub(crate) song: Option<&'static str>,
}

impl ValidationResult {
    pub(crate) fn is_valid(&self) -> bool {
        self.artist.is_none() && self.song.is_none()
    }

    pub(crate) fn error_for(&self, field: SearchField) -> Option<&'static str> {
        match field {
            SearchField::Artist => self.artist,
            SearchField::Song => self.song,
        }
    }
}

/// Run every field rule against the current values.
pub(crate) fn validate(values: &FormValues) -> ValidationResult {
    ValidationResult {
        artist: required(&values.artist),
        song: required(&values.song),
    }
}

/// Fields available within the search form.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum SearchField {
    #[default]
    Artist,
    Song,
}

impl SearchField {
    pub(crate) fn label(self) -> &'static str {
        match self {
            SearchField::Artist => "Artist",
            SearchField::Song => "Song",
        }
    }
}

/// Form state for the search screen. Lives as long as the app, so values
/// survive trips to the lyrics screen and back.
#[derive(Debug, Clone)]
pub(crate) struct SearchForm {
    values: FormValues,
    active: SearchField,
    touched_artist: bool,
    touched_song: bool,
    keyboard_visible: bool,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            values: FormValues::default(),
            active: SearchField::Artist,
            touched_artist: false,
            touched_song: false,
            keyboard_visible: true,
        }
    }
}

impl SearchForm {
    pub(crate) fn values(&self) -> &FormValues {
        &self.values
    }

    pub(crate) fn active(&self) -> SearchField {
        self.active
    }

    pub(crate) fn keyboard_visible(&self) -> bool {
        self.keyboard_visible
    }

    pub(crate) fn validation(&self) -> ValidationResult {
        validate(&self.values)
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.validation().is_valid()
    }

    /// Trimmed query, or `None` while the form is invalid.
    pub(crate) fn query(&self) -> Option<SearchQuery> {
        SearchQuery::new(&self.values.artist, &self.values.song)
    }

    /// Error to render under `field`. Untouched fields stay quiet.
    pub(crate) fn field_error(&self, field: SearchField) -> Option<&'static str> {
        if self.is_touched(field) {
            self.validation().error_for(field)
        } else {
            None
        }
    }

    /// Move focus to the other field; the field being left counts as touched.
    pub(crate) fn toggle_field(&mut self) {
        self.touch(self.active);
        self.active = match self.active {
            SearchField::Artist => SearchField::Song,
            SearchField::Song => SearchField::Artist,
        };
        self.keyboard_visible = true;
    }

    /// Append a character to the active field. Control characters are refused.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.value_mut(self.active).push(ch);
        self.touch(self.active);
        self.keyboard_visible = true;
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.value_mut(self.active).pop();
        self.touch(self.active);
        self.keyboard_visible = true;
    }

    /// Surface every field error, as a rejected submit does.
    pub(crate) fn touch_all(&mut self) {
        self.touched_artist = true;
        self.touched_song = true;
    }

    pub(crate) fn dismiss_keyboard(&mut self) {
        self.keyboard_visible = false;
    }

    /// Replace both fields with a previous search.
    pub(crate) fn fill(&mut self, query: &SearchQuery) {
        self.values.artist = query.artist.clone();
        self.values.song = query.song.clone();
        self.touch_all();
    }

    /// Terminal columns taken by the field value, for cursor placement.
    pub(crate) fn value_width(&self, field: SearchField) -> usize {
        self.value(field).width()
    }

    /// Render a single `Label: value` line for the form widget.
    pub(crate) fn build_line(&self, field: SearchField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.keyboard_visible && self.active == field;

        let display = if value.is_empty() {
            format!("<{}>", field.label().to_lowercase())
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    fn value(&self, field: SearchField) -> &str {
        match field {
            SearchField::Artist => &self.values.artist,
            SearchField::Song => &self.values.song,
        }
    }

    fn value_mut(&mut self, field: SearchField) -> &mut String {
        match field {
            SearchField::Artist => &mut self.values.artist,
            SearchField::Song => &mut self.values.song,
        }
    }

    fn is_touched(&self, field: SearchField) -> bool {
        match field {
            SearchField::Artist => self.touched_artist,
            SearchField::Song => self.touched_song,
        }
    }

    fn touch(&mut self, field: SearchField) {
        match field {
            SearchField::Artist => self.touched_artist = true,
            SearchField::Song => self.touched_song = true,
        }
    }
}
