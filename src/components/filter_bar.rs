//! Filter bar for the names explorer
//!
//! Owns the editable filter state and turns it into request parameters.
//! Any change that affects the request is reported as
//! [`Action::FiltersChanged`] so the explorer can go back to page 1.

use crate::action::Action;
use crate::components::countries_picker::countries_label;
use crate::components::gender_slider::{GenderBalanceSlider, LARGE_STEP};
use crate::model::api::MetaYearsResponse;
use crate::model::filters::{NamesFilterParams, SortBy, SortOrder};
use crate::model::popularity::{EditOutcome, PopularityField, PopularityFilter};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const YEAR_DIGITS: usize = 4;

/// A focusable field of the filter bar, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterField {
    #[default]
    Search,
    Countries,
    YearMin,
    YearMax,
    GenderBalance,
    MinCount,
    TopN,
    CoveragePercent,
    SortBy,
    SortOrder,
}

impl FilterField {
    pub fn all() -> [FilterField; 10] {
        [
            FilterField::Search,
            FilterField::Countries,
            FilterField::YearMin,
            FilterField::YearMax,
            FilterField::GenderBalance,
            FilterField::MinCount,
            FilterField::TopN,
            FilterField::CoveragePercent,
            FilterField::SortBy,
            FilterField::SortOrder,
        ]
    }

    pub fn next(&self) -> FilterField {
        let all = Self::all();
        let idx = all.iter().position(|f| f == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn prev(&self) -> FilterField {
        let all = Self::all();
        let idx = all.iter().position(|f| f == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilterField::Search => "Search",
            FilterField::Countries => "Countries",
            FilterField::YearMin => "Year from",
            FilterField::YearMax => "Year to",
            FilterField::GenderBalance => "Gender balance",
            FilterField::MinCount => PopularityField::MinCount.label(),
            FilterField::TopN => PopularityField::TopN.label(),
            FilterField::CoveragePercent => PopularityField::CoveragePercent.label(),
            FilterField::SortBy => "Sort by",
            FilterField::SortOrder => "Order",
        }
    }

    /// The popularity field behind this filter field, if any
    pub fn popularity(&self) -> Option<PopularityField> {
        match self {
            FilterField::MinCount => Some(PopularityField::MinCount),
            FilterField::TopN => Some(PopularityField::TopN),
            FilterField::CoveragePercent => Some(PopularityField::CoveragePercent),
            _ => None,
        }
    }
}

/// Editable filter state
#[derive(Debug, Clone, Default)]
pub struct FilterBar {
    pub focused: FilterField,
    pub search: String,
    pub countries: Vec<String>,
    year_min_text: String,
    year_max_text: String,
    pub gender: GenderBalanceSlider,
    pub popularity: PopularityFilter,
    /// Text typed into the driving popularity field
    popularity_input: Option<(PopularityField, String)>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    /// Feedback for rejected input
    pub notice: Option<String>,
}

impl FilterBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset every filter, keeping focus where it is
    pub fn clear(&mut self) {
        let focused = self.focused;
        *self = Self::default();
        self.focused = focused;
    }

    pub fn set_countries(&mut self, countries: Vec<String>) -> bool {
        if self.countries == countries {
            return false;
        }
        self.countries = countries;
        true
    }

    pub fn cycle_sort_by(&mut self) {
        self.sort_by = self.sort_by.next();
    }

    pub fn toggle_sort_order(&mut self) {
        self.sort_order = self.sort_order.toggle();
    }

    /// Years are applied once all four digits are typed
    fn parse_year(text: &str) -> Option<i32> {
        if text.len() == YEAR_DIGITS {
            text.parse().ok()
        } else {
            None
        }
    }

    /// Effective year bounds, clamped to the dataset and ordered
    pub fn year_range(&self, years: Option<&MetaYearsResponse>) -> (Option<i32>, Option<i32>) {
        let clamp = |y: i32| years.map(|m| m.clamp(y)).unwrap_or(y);
        let min = Self::parse_year(&self.year_min_text).map(clamp);
        let max = Self::parse_year(&self.year_max_text).map(clamp);
        match (min, max) {
            (Some(a), Some(b)) if a > b => (Some(b), Some(a)),
            other => other,
        }
    }

    /// Request parameters for the given page
    pub fn to_params(
        &self,
        page: u32,
        page_size: u32,
        years: Option<&MetaYearsResponse>,
    ) -> NamesFilterParams {
        let (year_min, year_max) = self.year_range(years);
        let search = self.search.trim();

        let mut params = NamesFilterParams {
            page: Some(page),
            page_size: Some(page_size),
            countries: self.countries.clone(),
            year_min,
            year_max,
            sort_by: Some(self.sort_by),
            sort_order: Some(self.sort_order),
            search: (!search.is_empty()).then(|| search.to_string()),
            ..Default::default()
        };

        if let Some((low, high)) = self.gender.range() {
            params.gender_balance_min = Some(low);
            params.gender_balance_max = Some(high);
        }

        self.popularity.apply_to(&mut params);
        params
    }

    /// Text shown for a popularity field
    pub fn popularity_text(&self, field: PopularityField) -> String {
        match &self.popularity_input {
            Some((input_field, text))
                if *input_field == field && self.popularity.is_editable(field) =>
            {
                text.clone()
            }
            _ => self.popularity.display_value(field),
        }
    }

    pub fn year_text(&self, field: FilterField) -> &str {
        match field {
            FilterField::YearMax => &self.year_max_text,
            _ => &self.year_min_text,
        }
    }

    /// Handle a key while the filter bar has focus
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        self.notice = None;

        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focused = self.focused.next();
                return Ok(None);
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focused = self.focused.prev();
                return Ok(None);
            }
            KeyCode::Esc => return Ok(Some(Action::FocusTable)),
            KeyCode::Enter if self.focused == FilterField::Countries => {
                return Ok(Some(Action::OpenCountriesPicker))
            }
            KeyCode::Enter => return Ok(Some(Action::FocusTable)),
            _ => {}
        }

        let action = match self.focused {
            FilterField::Search => self.edit_search(key),
            FilterField::Countries => match key.code {
                KeyCode::Char(' ') => Some(Action::OpenCountriesPicker),
                KeyCode::Backspace | KeyCode::Delete => self
                    .set_countries(Vec::new())
                    .then_some(Action::FiltersChanged),
                _ => None,
            },
            FilterField::YearMin | FilterField::YearMax => self.edit_year(self.focused, key),
            FilterField::GenderBalance => self.edit_gender(key),
            FilterField::MinCount | FilterField::TopN | FilterField::CoveragePercent => {
                match self.focused.popularity() {
                    Some(field) => self.edit_popularity(field, key),
                    None => None,
                }
            }
            FilterField::SortBy => match key.code {
                KeyCode::Left => {
                    self.sort_by = self.sort_by.prev();
                    Some(Action::FiltersChanged)
                }
                KeyCode::Right | KeyCode::Char(' ') => Some(Action::CycleSortBy),
                _ => None,
            },
            FilterField::SortOrder => match key.code {
                KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => Some(Action::ToggleSortOrder),
                _ => None,
            },
        };

        Ok(action)
    }

    fn edit_search(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char(c) => {
                self.search.push(c);
                Some(Action::FiltersChanged)
            }
            KeyCode::Backspace => self.search.pop().map(|_| Action::FiltersChanged),
            _ => None,
        }
    }

    fn edit_year(&mut self, field: FilterField, key: KeyEvent) -> Option<Action> {
        let before = self.year_range(None);
        let text = match field {
            FilterField::YearMax => &mut self.year_max_text,
            _ => &mut self.year_min_text,
        };

        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() && text.len() < YEAR_DIGITS => text.push(c),
            KeyCode::Char(_) => {
                self.notice = Some("Years are four digits".to_string());
                return None;
            }
            KeyCode::Backspace => {
                text.pop();
            }
            _ => return None,
        }

        (self.year_range(None) != before).then_some(Action::FiltersChanged)
    }

    fn edit_gender(&mut self, key: KeyEvent) -> Option<Action> {
        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
            LARGE_STEP
        } else {
            1
        };
        match key.code {
            KeyCode::Left => self.gender.move_active(-step).then_some(Action::FiltersChanged),
            KeyCode::Right => self.gender.move_active(step).then_some(Action::FiltersChanged),
            KeyCode::Char(' ') => {
                self.gender.toggle_handle();
                None
            }
            KeyCode::Backspace | KeyCode::Delete => {
                let was_full = self.gender.is_full_range();
                self.gender.reset();
                (!was_full).then_some(Action::FiltersChanged)
            }
            _ => None,
        }
    }

    fn edit_popularity(&mut self, field: PopularityField, key: KeyEvent) -> Option<Action> {
        if !self.popularity.is_editable(field) {
            if matches!(key.code, KeyCode::Char(_) | KeyCode::Backspace) {
                let driver = self.popularity.driver().map(|d| d.label()).unwrap_or_default();
                self.notice = Some(format!(
                    "{} is derived from results; clear {} to edit it",
                    field.label(),
                    driver
                ));
            }
            return None;
        }

        let mut text = self.popularity_text(field);
        match key.code {
            KeyCode::Char(c) => {
                text.push(c);
                if !field.accepts_partial(&text) {
                    self.notice = Some(format!("Invalid {} value", field.label()));
                    return None;
                }
            }
            KeyCode::Backspace => {
                text.pop();
            }
            _ => return None,
        }

        match self.popularity.edit_text(field, &text) {
            EditOutcome::Applied => {
                self.popularity_input = Some((field, text));
                Some(Action::FiltersChanged)
            }
            EditOutcome::Released => {
                self.popularity_input = None;
                Some(Action::FiltersChanged)
            }
            EditOutcome::Invalid => {
                self.notice = Some(match field {
                    PopularityField::TopN => "Top N must be at least 1".to_string(),
                    PopularityField::CoveragePercent => "Coverage must be between 0 and 100".to_string(),
                    PopularityField::MinCount => "Invalid min count".to_string(),
                });
                None
            }
            EditOutcome::ReadOnly => None,
        }
    }

    /// Draw the two rows of filter fields
    pub fn draw(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(3)])
            .split(area);

        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(26),
                Constraint::Percentage(18),
                Constraint::Percentage(12),
                Constraint::Percentage(12),
                Constraint::Percentage(32),
            ])
            .split(rows[0]);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(20),
                Constraint::Percentage(20),
                Constraint::Percentage(20),
                Constraint::Percentage(24),
                Constraint::Percentage(16),
            ])
            .split(rows[1]);

        let areas = [
            (FilterField::Search, top[0]),
            (FilterField::Countries, top[1]),
            (FilterField::YearMin, top[2]),
            (FilterField::YearMax, top[3]),
            (FilterField::GenderBalance, top[4]),
            (FilterField::MinCount, bottom[0]),
            (FilterField::TopN, bottom[1]),
            (FilterField::CoveragePercent, bottom[2]),
            (FilterField::SortBy, bottom[3]),
            (FilterField::SortOrder, bottom[4]),
        ];

        for (field, field_area) in areas {
            self.draw_field(frame, field_area, field, focused && self.focused == field);
        }
    }

    fn draw_field(&self, frame: &mut Frame, area: Rect, field: FilterField, is_focused: bool) {
        let inner_width = area.width.saturating_sub(2) as usize;
        let popularity = field.popularity();
        let is_driver = popularity.is_some() && popularity == self.popularity.driver();
        let is_read_only = popularity.is_some_and(|p| !self.popularity.is_editable(p));

        let mut title = vec![Span::raw(format!(" {}", field.label()))];
        if is_driver {
            title.push(Span::styled(" ●", Style::default().fg(Color::Green)));
        } else if is_read_only {
            title.push(Span::styled(" (derived)", Style::default().fg(Color::DarkGray)));
        }
        title.push(Span::raw(" "));

        let border_color = if is_focused {
            Color::Yellow
        } else if is_driver {
            Color::Green
        } else {
            Color::DarkGray
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(Line::from(title))
            .border_style(Style::default().fg(border_color));

        let value_style = if is_read_only {
            Style::default().fg(Color::DarkGray)
        } else if is_driver {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let placeholder_style = Style::default().fg(Color::DarkGray);
        let cursor = if is_focused { "▏" } else { "" };

        let content = match field {
            FilterField::Search => text_line(&self.search, "Name contains…", cursor, inner_width, value_style),
            FilterField::Countries => Line::from(Span::styled(
                countries_label(&self.countries),
                if self.countries.is_empty() { placeholder_style } else { value_style },
            )),
            FilterField::YearMin | FilterField::YearMax => {
                text_line(self.year_text(field), "any", cursor, inner_width, value_style)
            }
            FilterField::GenderBalance => {
                let label = format!(" {}", self.gender.label());
                let track_width = inner_width.saturating_sub(label.width() + 4);
                let mut spans = vec![Span::styled("♀ ", Style::default().fg(Color::Magenta))];
                spans.extend(self.gender.render_track(track_width, is_focused).spans);
                spans.push(Span::styled(" ♂", Style::default().fg(Color::Blue)));
                spans.push(Span::styled(label, value_style));
                Line::from(spans)
            }
            FilterField::MinCount | FilterField::TopN | FilterField::CoveragePercent => {
                let text = popularity.map(|p| self.popularity_text(p)).unwrap_or_default();
                text_line(&text, "—", if is_read_only { "" } else { cursor }, inner_width, value_style)
            }
            FilterField::SortBy => Line::from(Span::styled(
                format!("◂ {} ▸", self.sort_by.label()),
                value_style,
            )),
            FilterField::SortOrder => Line::from(Span::styled(
                format!(
                    "{} {}",
                    self.sort_order.arrow(),
                    match self.sort_order {
                        SortOrder::Asc => "Asc",
                        SortOrder::Desc => "Desc",
                    }
                ),
                value_style,
            )),
        };

        frame.render_widget(Paragraph::new(content).block(block), area);
    }
}

/// Popularity trio hint line
pub fn popularity_hint(filter: &PopularityFilter) -> Line<'static> {
    match filter.driver() {
        Some(driver) => Line::from(vec![
            Span::styled(" Active filter: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                driver.label(),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                " • Other values are derived from results",
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        None => Line::from(Span::styled(
            " Popularity: set one of Min count, Top N or Coverage % (the others follow)",
            Style::default().fg(Color::DarkGray),
        )),
    }
}

/// Text with placeholder, keeping the end visible when it overflows
fn text_line(text: &str, placeholder: &str, cursor: &str, width: usize, style: Style) -> Line<'static> {
    if text.is_empty() {
        return Line::from(vec![
            Span::styled(cursor.to_string(), Style::default().fg(Color::Yellow)),
            Span::styled(placeholder.to_string(), Style::default().fg(Color::DarkGray)),
        ]);
    }
    let visible = fit_tail(text, width.saturating_sub(cursor.width()));
    Line::from(vec![
        Span::styled(visible, style),
        Span::styled(cursor.to_string(), Style::default().fg(Color::Yellow)),
    ])
}

/// Longest suffix of `text` that fits in `width` columns
pub fn fit_tail(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut used = 0;
    let mut start = text.len();
    for (idx, c) in text.char_indices().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = idx;
    }
    text[start..].to_string()
}
