//! Help dialog component
//!
//! Lists the keyboard shortcuts of every screen.

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

#[derive(Default)]
pub struct HelpDialog {
    pub scroll_offset: usize,
}

impl Component for HelpDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(10);
                None
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let dialog_area = area.inner(Margin {
            vertical: 2,
            horizontal: 4,
        });
        frame.render_widget(Clear, dialog_area);

        let content = build_help_content();
        let total = content.len();
        let visible_height = dialog_area.height.saturating_sub(2) as usize;

        let max_scroll = total.saturating_sub(visible_height);
        self.scroll_offset = self.scroll_offset.min(max_scroll);

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Keyboard Shortcuts ")
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((self.scroll_offset as u16, 0));
        frame.render_widget(paragraph, dialog_area);

        if total > visible_height {
            let mut scrollbar_state = ScrollbarState::new(max_scroll).position(self.scroll_offset);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                dialog_area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

fn section(lines: &mut Vec<Line<'static>>, title: &str) {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("  {} ", title),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        format!("  {}", "─".repeat(title.len() + 2)),
        Style::default().fg(Color::DarkGray),
    )));
}

fn shortcut(lines: &mut Vec<Line<'static>>, key: &str, description: &str) {
    lines.push(Line::from(vec![
        Span::styled(
            format!("  {:14}", key),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(description.to_string(), Style::default().fg(Color::White)),
    ]));
}

fn build_help_content() -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    section(&mut lines, "Global");
    shortcut(&mut lines, "1 / 2", "Home / Explore names");
    shortcut(&mut lines, "Esc / Backspace", "Go back");
    shortcut(&mut lines, "r", "Refresh data");
    shortcut(&mut lines, "?", "Show this help");
    shortcut(&mut lines, "q", "Quit");
    shortcut(&mut lines, "Ctrl+c", "Quit immediately");

    section(&mut lines, "Names table");
    shortcut(&mut lines, "j / ↓", "Next name");
    shortcut(&mut lines, "k / ↑", "Previous name");
    shortcut(&mut lines, "g / G", "First / last name on the page");
    shortcut(&mut lines, "n / →", "Next page");
    shortcut(&mut lines, "p / ←", "Previous page");
    shortcut(&mut lines, "Enter", "Show the trend for the selected name");
    shortcut(&mut lines, "s", "Sort by the next column");
    shortcut(&mut lines, "o", "Flip sort order");
    shortcut(&mut lines, "c", "Pick countries");
    shortcut(&mut lines, "x", "Clear all filters");
    shortcut(&mut lines, "/ or f", "Edit filters");

    section(&mut lines, "Filters");
    shortcut(&mut lines, "Tab / ↓", "Next field");
    shortcut(&mut lines, "Shift+Tab / ↑", "Previous field");
    shortcut(&mut lines, "Esc / Enter", "Back to the table");
    shortcut(&mut lines, "← / →", "Move slider handle, change sort");
    shortcut(&mut lines, "Shift+← / →", "Move slider handle by 10");
    shortcut(&mut lines, "Space", "Switch slider handle, open countries");
    shortcut(&mut lines, "Backspace", "Delete a character or reset the field");

    section(&mut lines, "Popularity");
    lines.push(Line::from(Span::styled(
        "  Min count, Top N and Coverage % describe the same cut-off.",
        Style::default().fg(Color::Gray),
    )));
    lines.push(Line::from(Span::styled(
        "  Type into one of them; the other two are filled in from the results.",
        Style::default().fg(Color::Gray),
    )));
    lines.push(Line::from(Span::styled(
        "  Clear it to pick a different one.",
        Style::default().fg(Color::Gray),
    )));

    section(&mut lines, "Countries");
    shortcut(&mut lines, "Space", "Toggle country");
    shortcut(&mut lines, "Enter", "Apply selection");
    shortcut(&mut lines, "Esc", "Cancel");

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press q, Esc, or ? to close",
        Style::default().fg(Color::DarkGray),
    )));

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_scroll_clamped_on_draw() {
        let mut dialog = HelpDialog::default();
        for _ in 0..20 {
            dialog
                .handle_key_event(KeyEvent::new(KeyCode::PageDown, KeyModifiers::NONE))
                .unwrap();
        }
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|frame| {
                dialog.draw(frame, frame.area()).unwrap();
            })
            .unwrap();

        let visible = 20 - 4 - 2;
        assert_eq!(dialog.scroll_offset, build_help_content().len() - visible);
    }

    #[test]
    fn test_close_keys() {
        let mut dialog = HelpDialog::default();
        for code in [KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('?')] {
            let key = KeyEvent::new(code, KeyModifiers::NONE);
            assert_eq!(dialog.handle_key_event(key).unwrap(), Some(Action::CloseModal));
        }
    }
}
