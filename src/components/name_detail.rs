//! Trend view for a single name
//!
//! Shows summary statistics, the yearly female/male chart and the
//! per-country breakdown for the name in the current route.

use crate::action::Action;
use crate::component::Component;
use crate::components::layout::calculate_detail_layout;
use crate::components::trend_chart::draw_trend_chart;
use crate::model::api::NameTrendResponse;
use crate::model::filters::NameTrendParams;
use crate::model::format::{format_balance, format_count, format_years};
use crate::services::query_cache::QueryState;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

pub struct NameDetail {
    params: NameTrendParams,
    state: QueryState<NameTrendResponse>,
}

impl Default for NameDetail {
    fn default() -> Self {
        Self::new()
    }
}

impl NameDetail {
    pub fn new() -> Self {
        Self {
            params: NameTrendParams::default(),
            state: QueryState::Idle,
        }
    }

    pub fn set_trend(&mut self, params: NameTrendParams, state: QueryState<NameTrendResponse>) {
        self.params = params;
        self.state = state;
    }

    pub fn name(&self) -> &str {
        &self.params.name
    }

    pub fn state(&self) -> &QueryState<NameTrendResponse> {
        &self.state
    }

    fn filter_context(&self) -> Option<String> {
        let mut parts = Vec::new();
        if !self.params.countries.is_empty() {
            parts.push(self.params.countries.join(" "));
        }
        match (self.params.year_min, self.params.year_max) {
            (Some(a), Some(b)) => parts.push(format!("{} - {}", a, b)),
            (Some(a), None) => parts.push(format!("from {}", a)),
            (None, Some(b)) => parts.push(format!("until {}", b)),
            (None, None) => {}
        }
        (!parts.is_empty()).then(|| parts.join(" • "))
    }

    fn draw_summary(&self, frame: &mut Frame, area: Rect, trend: &NameTrendResponse) {
        let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        let value = Style::default().fg(Color::White);
        let summary = &trend.summary;

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Total Count: ", label),
                Span::styled(format_count(summary.total_count), value),
                Span::raw("   "),
                Span::styled("Female Count: ", label),
                Span::styled(format_count(summary.female_count), Style::default().fg(Color::Magenta)),
                Span::raw("   "),
                Span::styled("Male Count: ", label),
                Span::styled(format_count(summary.male_count), Style::default().fg(Color::Cyan)),
            ]),
            Line::from(vec![
                Span::styled("Gender Balance: ", label),
                Span::styled(format_balance(summary.gender_balance), value),
                Span::styled("  (0 = female, 100 = male)", Style::default().fg(Color::DarkGray)),
            ]),
            Line::from(vec![
                Span::styled("Years: ", label),
                Span::styled(format_years(summary.name_start, summary.name_end), value),
                Span::raw("   "),
                Span::styled("Countries: ", label),
                Span::styled(summary.countries.join(", "), value),
            ]),
            Line::from(Span::styled(
                format!(
                    "Data available for {} years • Data available for {} countries",
                    trend.time_series.len(),
                    trend.by_country.len()
                ),
                Style::default().fg(Color::DarkGray),
            )),
        ];
        if summary.has_unknown_data {
            lines.push(Line::from(Span::styled(
                format!("Includes {} records with unknown gender", format_count(summary.unknown_count)),
                Style::default().fg(Color::DarkGray),
            )));
        }

        let paragraph = Paragraph::new(lines).block(self.summary_block());
        frame.render_widget(paragraph, area);
    }

    fn summary_block(&self) -> Block<'static> {
        let mut title = vec![Span::styled(
            format!(" {} ", self.params.name),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )];
        if let Some(context) = self.filter_context() {
            title.push(Span::styled(format!("[{}] ", context), Style::default().fg(Color::DarkGray)));
        }
        Block::default()
            .borders(Borders::ALL)
            .title(Line::from(title))
            .title_bottom(Line::from(Span::styled(
                " ← Back to names (Esc) ",
                Style::default().fg(Color::DarkGray),
            )))
            .border_style(Style::default().fg(Color::Cyan))
    }

    fn draw_countries(&self, frame: &mut Frame, area: Rect, trend: &NameTrendResponse) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" By country ")
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .border_style(Style::default().fg(Color::DarkGray));

        if trend.by_country.is_empty() {
            let paragraph = Paragraph::new(Line::from(Span::styled(
                "No country breakdown",
                Style::default().fg(Color::DarkGray),
            )))
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let header = Row::new(["Country", "Total", "Balance"].map(|h| {
            Cell::from(h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        }));
        let rows: Vec<Row> = trend
            .by_country
            .iter()
            .map(|c| {
                Row::new(vec![
                    Cell::from(format!("{} {}", c.country_code, c.country_name)),
                    Cell::from(format_count(c.total_count)),
                    Cell::from(format_balance(c.gender_balance)),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [Constraint::Min(10), Constraint::Length(10), Constraint::Length(7)],
        )
        .header(header)
        .block(block);
        frame.render_widget(table, area);
    }

    fn draw_message(&self, frame: &mut Frame, area: Rect, message: Line) {
        let paragraph = Paragraph::new(vec![Line::from(""), message])
            .alignment(Alignment::Center)
            .block(self.summary_block());
        frame.render_widget(paragraph, area);
    }
}

impl Component for NameDetail {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => Some(Action::Back),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        match &self.state {
            QueryState::Idle | QueryState::Loading => self.draw_message(
                frame,
                area,
                Line::from(Span::styled(
                    format!("⟳ Loading trend for {}…", self.params.name),
                    Style::default().fg(Color::Yellow),
                )),
            ),
            QueryState::Error(message) => self.draw_message(
                frame,
                area,
                Line::from(vec![
                    Span::styled("✗ Error: ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                    Span::styled(message.clone(), Style::default().fg(Color::Red)),
                ]),
            ),
            QueryState::Data(trend) => {
                let layout = calculate_detail_layout(area);
                self.draw_summary(frame, layout.summary, trend);
                draw_trend_chart(frame, layout.chart, &trend.name, &trend.time_series);
                self.draw_countries(frame, layout.countries, trend);
            }
        }
        Ok(())
    }
}
