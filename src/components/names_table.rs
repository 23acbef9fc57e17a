//! Names table for the explorer
//!
//! Renders one page of names with its loading, error and empty states.

use crate::action::Action;
use crate::component::Component;
use crate::model::api::{NameEntry, NamesListResponse};
use crate::model::format::{format_balance, format_count, format_percent, format_years};
use crate::services::query_cache::QueryState;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use std::sync::Arc;

const HEADERS: [&str; 8] = [
    "#", "Name", "Total", "Female", "Male", "Balance", "Coverage", "Years",
];

/// Table of names on the current page
pub struct NamesTable {
    state: QueryState<NamesListResponse>,
    updating: bool,
    pub table_state: TableState,
    pub focused: bool,
}

impl Default for NamesTable {
    fn default() -> Self {
        Self::new()
    }
}

impl NamesTable {
    pub fn new() -> Self {
        Self {
            state: QueryState::Idle,
            updating: false,
            table_state: TableState::default(),
            focused: true,
        }
    }

    /// Replace the data shown, keeping the selection within bounds
    pub fn set_query(&mut self, state: QueryState<NamesListResponse>, updating: bool) {
        self.state = state;
        self.updating = updating;

        let len = self.rows().len();
        let selected = match self.table_state.selected() {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
        self.table_state.select(selected);
    }

    pub fn state(&self) -> &QueryState<NamesListResponse> {
        &self.state
    }

    pub fn data(&self) -> Option<&Arc<NamesListResponse>> {
        self.state.data()
    }

    /// Whether newer rows are on the way
    pub fn is_updating(&self) -> bool {
        self.updating
    }

    fn rows(&self) -> &[NameEntry] {
        self.state.data().map(|d| d.names.as_slice()).unwrap_or(&[])
    }

    pub fn selected_entry(&self) -> Option<&NameEntry> {
        self.table_state.selected().and_then(|i| self.rows().get(i))
    }

    /// Go back to the first row, e.g. after the page changed
    pub fn reset_selection(&mut self) {
        let first = (!self.rows().is_empty()).then_some(0);
        self.table_state.select(first);
        *self.table_state.offset_mut() = 0;
    }

    fn select_next(&mut self) {
        let len = self.rows().len();
        if len == 0 {
            return;
        }
        let next = self.table_state.selected().map_or(0, |i| (i + 1).min(len - 1));
        self.table_state.select(Some(next));
    }

    fn select_prev(&mut self) {
        if self.rows().is_empty() {
            return;
        }
        let prev = self.table_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.table_state.select(Some(prev));
    }

    fn draw_message(&self, frame: &mut Frame, area: Rect, block: Block, message: Line) {
        let paragraph = Paragraph::new(vec![Line::from(""), message])
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
    }
}

fn entry_row(entry: &NameEntry) -> Row<'static> {
    let balance_style = match entry.gender_balance {
        Some(b) if b < 40.0 => Style::default().fg(Color::Magenta),
        Some(b) if b > 60.0 => Style::default().fg(Color::Cyan),
        Some(_) => Style::default().fg(Color::Green),
        None => Style::default().fg(Color::DarkGray),
    };

    Row::new(vec![
        Cell::from(entry.rank.to_string()).style(Style::default().fg(Color::DarkGray)),
        Cell::from(entry.name.clone()).style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        Cell::from(format_count(entry.total_count)),
        Cell::from(format_count(entry.female_count)),
        Cell::from(format_count(entry.male_count)),
        Cell::from(format_balance(entry.gender_balance)).style(balance_style),
        Cell::from(format_percent(entry.cumulative_share)),
        Cell::from(format_years(entry.name_start, entry.name_end)),
    ])
}

impl Component for NamesTable {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextRow),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevRow),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::FirstRow),
            KeyCode::Char('G') | KeyCode::End => Some(Action::LastRow),
            KeyCode::Enter => Some(Action::OpenSelectedName),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::NextRow => self.select_next(),
            Action::PrevRow => self.select_prev(),
            Action::FirstRow => self.reset_selection(),
            Action::LastRow => {
                let len = self.rows().len();
                if len > 0 {
                    self.table_state.select(Some(len - 1));
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let border_color = if self.focused { Color::Cyan } else { Color::DarkGray };
        let mut title = vec![Span::raw(" Names ")];
        if self.updating {
            title.push(Span::styled("⟳ updating ", Style::default().fg(Color::Yellow)));
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Line::from(title))
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .border_style(Style::default().fg(border_color));

        match &self.state {
            QueryState::Idle | QueryState::Loading => {
                self.draw_message(
                    frame,
                    area,
                    block,
                    Line::from(Span::styled("⟳ Loading names…", Style::default().fg(Color::Yellow))),
                );
                return Ok(());
            }
            QueryState::Error(message) => {
                let line = Line::from(vec![
                    Span::styled("✗ Error: ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                    Span::styled(message.clone(), Style::default().fg(Color::Red)),
                ]);
                self.draw_message(frame, area, block, line);
                return Ok(());
            }
            QueryState::Data(data) if data.is_empty() => {
                self.draw_message(
                    frame,
                    area,
                    block,
                    Line::from(Span::styled(
                        "No names match these filters",
                        Style::default().fg(Color::DarkGray),
                    )),
                );
                return Ok(());
            }
            QueryState::Data(_) => {}
        }

        let header = Row::new(HEADERS.iter().map(|h| {
            Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        }))
        .bottom_margin(0);

        let rows: Vec<Row> = self.rows().iter().map(entry_row).collect();
        let widths = [
            Constraint::Length(5),
            Constraint::Min(12),
            Constraint::Length(11),
            Constraint::Length(11),
            Constraint::Length(11),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(10),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(table, area, &mut self.table_state);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures;
    use ratatui::{backend::TestBackend, Terminal};

    fn loaded() -> NamesTable {
        let mut table = NamesTable::new();
        table.set_query(QueryState::Data(Arc::new(fixtures::names_list().unwrap())), false);
        table
    }

    fn render(table: &mut NamesTable) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal
            .draw(|frame| {
                table.draw(frame, frame.area()).unwrap();
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_selection_moves_within_rows() {
        let mut table = loaded();
        assert_eq!(table.selected_entry().map(|e| e.rank), Some(1));

        table.update(Action::PrevRow).unwrap();
        assert_eq!(table.table_state.selected(), Some(0));

        table.update(Action::LastRow).unwrap();
        let last = table.rows().len() - 1;
        table.update(Action::NextRow).unwrap();
        assert_eq!(table.table_state.selected(), Some(last));

        table.update(Action::FirstRow).unwrap();
        assert_eq!(table.table_state.selected(), Some(0));
    }

    #[test]
    fn test_selection_clamped_to_new_data() {
        let mut table = loaded();
        table.update(Action::LastRow).unwrap();

        table.set_query(QueryState::Data(Arc::new(fixtures::names_list_empty().unwrap())), false);
        assert_eq!(table.table_state.selected(), None);
        assert!(table.selected_entry().is_none());
    }

    #[test]
    fn test_enter_opens_selected_name() {
        let mut table = loaded();
        let key = KeyEvent::new(KeyCode::Enter, crossterm::event::KeyModifiers::NONE);
        assert_eq!(table.handle_key_event(key).unwrap(), Some(Action::OpenSelectedName));
    }

    #[test]
    fn test_draw_states() {
        let mut table = NamesTable::new();
        table.set_query(QueryState::Loading, false);
        assert!(render(&mut table).contains("Loading names"));

        table.set_query(QueryState::Error("HTTP 500: Internal Server Error".to_string()), false);
        assert!(render(&mut table).contains("HTTP 500"));

        table.set_query(QueryState::Data(Arc::new(fixtures::names_list_empty().unwrap())), false);
        assert!(render(&mut table).contains("No names match these filters"));

        let mut table = loaded();
        let text = render(&mut table);
        assert!(text.contains("Jordan"));
        assert!(text.contains("412,345"));
        assert!(text.contains("63.20"));
    }

    #[test]
    fn test_updating_marker() {
        let mut table = NamesTable::new();
        table.set_query(QueryState::Data(Arc::new(fixtures::names_list().unwrap())), true);
        assert!(render(&mut table).contains("updating"));
    }
}
