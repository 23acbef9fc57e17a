//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen areas shared by every route
pub struct MainLayout {
    pub header: Rect,
    pub body: Rect,
    pub status: Rect,
    pub help: Rect,
}

/// Explorer screen areas
pub struct ExplorerLayout {
    pub filters: Rect,
    pub popularity_hint: Rect,
    pub table: Rect,
    pub pagination: Rect,
}

/// Name detail screen areas
pub struct DetailLayout {
    pub summary: Rect,
    pub chart: Rect,
    pub countries: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Header tabs, body, one status line and the help bar
pub fn calculate_main_layout(area: Rect) -> MainLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    MainLayout {
        header: chunks[0],
        body: chunks[1],
        status: chunks[2],
        help: chunks[3],
    }
}

/// Two rows of filter fields, the popularity hint, the table and pagination
pub fn calculate_explorer_layout(area: Rect) -> ExplorerLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    ExplorerLayout {
        filters: chunks[0],
        popularity_hint: chunks[1],
        table: chunks[2],
        pagination: chunks[3],
    }
}

/// Summary on top, then the chart beside the per-country table
pub fn calculate_detail_layout(area: Rect) -> DetailLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(8)])
        .split(area);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(rows[1]);

    DetailLayout {
        summary: rows[0],
        chart: bottom[0],
        countries: bottom[1],
    }
}
