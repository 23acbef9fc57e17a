//! Landing screen
//!
//! Title, a short mission statement, the feature list and a prompt to
//! open the explorer.

use crate::action::Action;
use crate::component::Component;
use crate::model::ui::Route;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const TITLE: &str = "Names, across time and gender";
const TAGLINE: &str = "Explore how given names are used by people of every gender";
const MISSION: &str = "Birth registries record how many people received each name, year by year. \
This explorer brings those counts together so you can see which names are shared across \
genders, how that balance shifted over the decades, and how popular a name really is.";

const FEATURES: [(&str, &str); 4] = [
    ("Explore", "Browse names ranked by popularity, with counts per gender"),
    ("Filter", "Narrow by country, years, gender balance and popularity"),
    ("Trends", "Follow a single name through time and across countries"),
    ("Affirming", "Find names that fit, whatever your gender"),
];

#[derive(Default)]
pub struct Landing;

impl Landing {
    pub fn new() -> Self {
        Self
    }
}

impl Component for Landing {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Enter | KeyCode::Char('e') => Some(Action::Navigate(Route::Names)),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let width = area.width.min(80);
        let column = Rect::new(area.x + (area.width - width) / 2, area.y, width, area.height);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Hero
                Constraint::Length(6), // Mission
                Constraint::Length(6), // Features
                Constraint::Length(3), // Call to action
                Constraint::Min(0),
            ])
            .split(column);

        let hero = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                TITLE,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(TAGLINE, Style::default().fg(Color::Gray))),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(hero, chunks[0]);

        let mission = Paragraph::new(MISSION)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Our mission ")
                    .title_style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        frame.render_widget(mission, chunks[1]);

        let features: Vec<Line> = FEATURES
            .iter()
            .map(|(name, text)| {
                Line::from(vec![
                    Span::styled("● ", Style::default().fg(Color::Green)),
                    Span::styled(
                        format!("{:<10}", name),
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(*text),
                ])
            })
            .collect();
        let features = Paragraph::new(features).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" What you can do ")
                .title_style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD))
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(features, chunks[2]);

        let cta = Paragraph::new(Line::from(vec![
            Span::raw("Ready to look around?  "),
            Span::styled(
                " Enter ",
                Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" Explore names", Style::default().fg(Color::Green)),
        ]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Green)));
        frame.render_widget(cta, chunks[3]);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_enter_opens_explorer() {
        let mut landing = Landing::new();
        let key = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(
            landing.handle_key_event(key).unwrap(),
            Some(Action::Navigate(Route::Names))
        );
    }

    #[test]
    fn test_draw_lists_features() {
        let mut landing = Landing::new();
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal
            .draw(|frame| {
                landing.draw(frame, frame.area()).unwrap();
            })
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();

        assert!(text.contains(TITLE));
        for (name, _) in FEATURES {
            assert!(text.contains(name));
        }
        assert!(text.contains("Explore names"));
    }
}
