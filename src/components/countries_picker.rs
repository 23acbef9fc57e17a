//! Countries multi-select dialog
//!
//! Space toggles a country, Enter applies the selection. The first row
//! clears everything.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::api::Country;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Flag emoji for the countries the dataset covers
pub fn country_flag(code: &str) -> Option<&'static str> {
    let flag = match code {
        "US" => "🇺🇸",
        "UK" => "🇬🇧",
        "CA" => "🇨🇦",
        "AU" => "🇦🇺",
        "IE" => "🇮🇪",
        "NZ" => "🇳🇿",
        "SE" => "🇸🇪",
        "NO" => "🇳🇴",
        "DK" => "🇩🇰",
        "FI" => "🇫🇮",
        _ => return None,
    };
    Some(flag)
}

/// Collapsed label for a selection: all, up to two flags, or two plus a count
///
/// Codes without a known flag are shown as-is.
pub fn countries_label(selected: &[String]) -> String {
    let shown = |codes: &[String]| {
        codes
            .iter()
            .map(|c| country_flag(c).unwrap_or(c.as_str()))
            .collect::<Vec<_>>()
            .join(" ")
    };
    match selected.len() {
        0 => "All countries".to_string(),
        1 | 2 => shown(selected),
        n => format!("{} +{}", shown(&selected[..2]), n - 2),
    }
}

/// Countries multi-select dialog
pub struct CountriesPicker {
    pub countries: Vec<Country>,
    /// Selected codes in the order they were picked
    pub selected: Vec<String>,
    /// Row 0 is "Clear all", row i+1 is `countries[i]`
    pub cursor: usize,
    pub list_state: ListState,
    /// Message shown instead of the list while countries are unavailable
    pub notice: Option<String>,
}

impl Default for CountriesPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl CountriesPicker {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            countries: Vec::new(),
            selected: Vec::new(),
            cursor: 0,
            list_state,
            notice: None,
        }
    }

    /// Prepare the dialog with the available countries and current selection
    pub fn open(&mut self, countries: Vec<Country>, selected: &[String]) {
        self.countries = countries;
        self.selected = selected.to_vec();
        self.notice = None;
        self.cursor = if self.countries.is_empty() { 0 } else { 1 };
        self.list_state.select(Some(self.cursor));
    }

    /// Open without a country list, e.g. while it is still loading
    pub fn open_with_notice(&mut self, notice: impl Into<String>, selected: &[String]) {
        self.open(Vec::new(), selected);
        self.notice = Some(notice.into());
    }

    pub fn is_selected(&self, code: &str) -> bool {
        self.selected.iter().any(|c| c == code)
    }

    /// Toggle the row under the cursor; on the first row, clear everything
    pub fn toggle_current(&mut self) {
        if self.notice.is_some() {
            return;
        }
        if self.cursor == 0 {
            self.selected.clear();
            return;
        }
        let Some(country) = self.countries.get(self.cursor - 1) else {
            return;
        };
        if let Some(idx) = self.selected.iter().position(|c| *c == country.code) {
            self.selected.remove(idx);
        } else {
            self.selected.push(country.code.clone());
        }
    }

    fn select_next(&mut self) {
        if self.cursor < self.countries.len() {
            self.cursor += 1;
            self.list_state.select(Some(self.cursor));
        }
    }

    fn select_prev(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.list_state.select(Some(self.cursor));
        }
    }
}

impl Component for CountriesPicker {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseModal),
            KeyCode::Enter => Some(Action::ApplyCountries(self.selected.clone())),
            KeyCode::Char(' ') => {
                self.toggle_current();
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_prev();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let popup_width = 50u16.min(area.width.saturating_sub(4));
        let content_height = self.countries.len().max(3) as u16 + 3;
        let popup_height = (content_height + 6).min(area.height.saturating_sub(2)).max(12);
        let popup_area = centered_popup(area, popup_width, popup_height);

        frame.render_widget(Clear, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(3),    // Country list
                Constraint::Length(3), // Help bar
            ])
            .split(popup_area);

        let summary = if self.selected.is_empty() {
            "All countries selected".to_string()
        } else {
            format!("{} of {} selected", self.selected.len(), self.countries.len())
        };
        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                countries_label(&self.selected),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  ({})", summary), Style::default().fg(Color::DarkGray)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Countries ")
                .title_style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)),
        );
        frame.render_widget(header, chunks[0]);

        if let Some(ref notice) = self.notice {
            let message = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(notice.clone(), Style::default().fg(Color::Yellow))),
            ])
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
            frame.render_widget(message, chunks[1]);
        } else {
            let mut items: Vec<ListItem> = vec![ListItem::new(Line::from(Span::styled(
                "  Clear all",
                Style::default().fg(Color::DarkGray),
            )))];

            for country in &self.countries {
                let checked = self.is_selected(&country.code);
                items.push(ListItem::new(Line::from(vec![
                    Span::styled(
                        if checked { "[x] " } else { "[ ] " },
                        Style::default().fg(Color::Green),
                    ),
                    Span::raw(format!("{} ", country_flag(&country.code).unwrap_or("🌐"))),
                    Span::styled(
                        format!("{:<3}", country.code),
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!(" {}", country.name),
                        if checked {
                            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                        } else {
                            Style::default().fg(Color::White)
                        },
                    ),
                ])));
            }

            let list = List::new(items)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::DarkGray)),
                )
                .highlight_style(
                    Style::default()
                        .bg(Color::Blue)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("▶ ");

            frame.render_stateful_widget(list, chunks[1], &mut self.list_state);
        }

        let help = Paragraph::new(Line::from(vec![
            Span::styled(" Space ", Style::default().fg(Color::Green)),
            Span::raw("Toggle  "),
            Span::styled(" Enter ", Style::default().fg(Color::Yellow)),
            Span::raw("Apply  "),
            Span::styled(" Esc ", Style::default().fg(Color::Yellow)),
            Span::raw("Cancel"),
        ]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[2]);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures;
    use crossterm::event::KeyModifiers;

    fn codes(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn picker() -> CountriesPicker {
        let mut picker = CountriesPicker::new();
        picker.open(fixtures::countries().unwrap().countries, &[]);
        picker
    }

    #[test]
    fn test_countries_label() {
        assert_eq!(countries_label(&[]), "All countries");
        assert_eq!(countries_label(&codes(&["US"])), "🇺🇸");
        assert_eq!(countries_label(&codes(&["US", "UK"])), "🇺🇸 🇬🇧");
        assert_eq!(countries_label(&codes(&["US", "UK", "CA", "AU"])), "🇺🇸 🇬🇧 +2");
        assert_eq!(countries_label(&codes(&["XX", "FI"])), "XX 🇫🇮");
    }

    #[test]
    fn test_space_ignored_while_loading() {
        let mut picker = CountriesPicker::new();
        picker.open_with_notice("Loading countries…", &codes(&["UK"]));
        picker.handle_key_event(key(KeyCode::Char(' '))).unwrap();

        let action = picker.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(action, Some(Action::ApplyCountries(codes(&["UK"]))));
    }

    #[test]
    fn test_toggle_keeps_pick_order() {
        let mut picker = picker();
        picker.handle_key_event(key(KeyCode::Down)).unwrap();
        picker.handle_key_event(key(KeyCode::Char(' '))).unwrap();
        picker.handle_key_event(key(KeyCode::Up)).unwrap();
        picker.handle_key_event(key(KeyCode::Char(' '))).unwrap();

        let first = picker.countries[1].code.clone();
        let second = picker.countries[0].code.clone();
        assert_eq!(picker.selected, vec![first.clone(), second]);

        picker.handle_key_event(key(KeyCode::Down)).unwrap();
        picker.handle_key_event(key(KeyCode::Char(' '))).unwrap();
        assert_eq!(picker.selected.len(), 1);
        assert!(!picker.is_selected(&first));
    }

    #[test]
    fn test_clear_all_row() {
        let mut picker = CountriesPicker::new();
        picker.open(fixtures::countries().unwrap().countries, &codes(&["US", "UK"]));
        picker.handle_key_event(key(KeyCode::Up)).unwrap();
        picker.handle_key_event(key(KeyCode::Char(' '))).unwrap();

        let action = picker.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(action, Some(Action::ApplyCountries(vec![])));
    }

    #[test]
    fn test_escape_cancels() {
        let mut picker = picker();
        assert_eq!(
            picker.handle_key_event(key(KeyCode::Esc)).unwrap(),
            Some(Action::CloseModal)
        );
    }
}
