//! Yearly trend chart for a single name

use crate::model::api::TimeSeriesPoint;
use crate::model::format::format_count;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

/// X bounds widened to whole decades, Y bounds from zero to the largest count
pub fn axis_bounds(series: &[TimeSeriesPoint]) -> Option<([f64; 2], [f64; 2])> {
    let first = series.first()?;
    let (mut min_year, mut max_year) = (first.year, first.year);
    let mut max_count = 0u64;
    for point in series {
        min_year = min_year.min(point.year);
        max_year = max_year.max(point.year);
        max_count = max_count.max(point.female_count).max(point.male_count);
    }

    let start = min_year.div_euclid(10) * 10;
    let mut end = (max_year + 9).div_euclid(10) * 10;
    if end == start {
        end = start + 10;
    }
    let top = (max_count.max(1) + max_count / 10) as f64;

    Some(([start as f64, end as f64], [0.0, top]))
}

/// Labels for every decade between the bounds, thinned to fit `max_labels`
pub fn decade_labels(x_bounds: [f64; 2], max_labels: usize) -> Vec<String> {
    let start = x_bounds[0] as i32;
    let end = x_bounds[1] as i32;
    let decades: Vec<i32> = (start..=end).step_by(10).collect();
    let step = decades.len().div_ceil(max_labels.max(2)).max(1);

    let mut labels: Vec<String> = decades.iter().step_by(step).map(|y| y.to_string()).collect();
    if let Some(last) = decades.last() {
        if labels.last() != Some(&last.to_string()) {
            labels.push(last.to_string());
        }
    }
    labels
}

/// Female and male counts per year
pub fn draw_trend_chart(frame: &mut Frame, area: Rect, name: &str, series: &[TimeSeriesPoint]) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Popularity of {} over time ", name))
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .border_style(Style::default().fg(Color::DarkGray));

    let Some((x_bounds, y_bounds)) = axis_bounds(series) else {
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No yearly data for this name with the current filters",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let female: Vec<(f64, f64)> = series
        .iter()
        .map(|p| (p.year as f64, p.female_count as f64))
        .collect();
    let male: Vec<(f64, f64)> = series
        .iter()
        .map(|p| (p.year as f64, p.male_count as f64))
        .collect();

    let datasets = vec![
        Dataset::default()
            .name("♀ Female")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Magenta))
            .data(&female),
        Dataset::default()
            .name("♂ Male")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&male),
    ];

    let max_labels = (area.width / 8).max(2) as usize;
    let x_labels: Vec<Span> = decade_labels(x_bounds, max_labels)
        .into_iter()
        .map(Span::raw)
        .collect();
    let y_labels = vec![
        Span::raw("0"),
        Span::raw(format_count((y_bounds[1] / 2.0) as u64)),
        Span::raw(format_count(y_bounds[1] as u64)),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("Year")
                .style(Style::default().fg(Color::Gray))
                .bounds(x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("Count")
                .style(Style::default().fg(Color::Gray))
                .bounds(y_bounds)
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures;
    use ratatui::{backend::TestBackend, Terminal};

    fn point(year: i32, female: u64, male: u64) -> TimeSeriesPoint {
        TimeSeriesPoint {
            year,
            total_count: female + male,
            female_count: female,
            male_count: male,
            unknown_count: 0,
            gender_balance: None,
        }
    }

    #[test]
    fn test_axis_bounds_align_to_decades() {
        let series = vec![point(1993, 10, 20), point(2007, 50, 5)];
        let (x, y) = axis_bounds(&series).unwrap();
        assert_eq!(x, [1990.0, 2010.0]);
        assert_eq!(y, [0.0, 55.0]);
    }

    #[test]
    fn test_axis_bounds_single_decade_year() {
        let (x, _) = axis_bounds(&[point(2000, 1, 1)]).unwrap();
        assert_eq!(x, [2000.0, 2010.0]);
        assert!(axis_bounds(&[]).is_none());
    }

    #[test]
    fn test_decade_labels_thinned() {
        assert_eq!(decade_labels([1990.0, 2010.0], 10), vec!["1990", "2000", "2010"]);

        let labels = decade_labels([1880.0, 2030.0], 4);
        assert!(labels.len() <= 5);
        assert_eq!(labels.first().map(String::as_str), Some("1880"));
        assert_eq!(labels.last().map(String::as_str), Some("2030"));
    }

    #[test]
    fn test_empty_series_note() {
        let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
        terminal
            .draw(|frame| draw_trend_chart(frame, frame.area(), "Sam", &[]))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("No yearly data"));
    }

    #[test]
    fn test_chart_renders_fixture() {
        let detail = fixtures::name_detail().unwrap();
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal
            .draw(|frame| draw_trend_chart(frame, frame.area(), &detail.name, &detail.time_series))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Popularity of Alex over time"));
        assert!(text.contains("1990"));
    }
}
