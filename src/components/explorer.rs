//! Names explorer screen
//!
//! Combines the filter bar, the names table and pagination. The explorer
//! owns the current page; every filter change sends it back to page 1.

use crate::action::Action;
use crate::component::Component;
use crate::components::filter_bar::{popularity_hint, FilterBar};
use crate::components::layout::calculate_explorer_layout;
use crate::components::names_table::NamesTable;
use crate::model::api::MetaYearsResponse;
use crate::model::filters::{NameTrendParams, NamesFilterParams};
use crate::model::format::format_count;
use crate::model::popularity::PopularityField;
use crate::model::ui::{build_url_with_params, Route};
use crate::services::queries::NamesQuery;
use crate::services::query_cache::QueryState;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tracing::{debug, warn};

/// Which part of the explorer receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExplorerFocus {
    #[default]
    Table,
    Filters,
}

pub struct Explorer {
    pub filters: FilterBar,
    pub table: NamesTable,
    pub page: u32,
    pub page_size: u32,
    pub focus: ExplorerFocus,
    years: Option<MetaYearsResponse>,
}

impl Explorer {
    pub fn new(page_size: u32) -> Self {
        Self {
            filters: FilterBar::new(),
            table: NamesTable::new(),
            page: 1,
            page_size,
            focus: ExplorerFocus::Table,
            years: None,
        }
    }

    /// Parameters for the names request of the current page
    pub fn params(&self) -> NamesFilterParams {
        self.filters.to_params(self.page, self.page_size, self.years.as_ref())
    }

    /// Trend request for `name`, scoped by the current countries and years
    pub fn trend_params(&self, name: &str) -> NameTrendParams {
        let (year_min, year_max) = self.filters.year_range(self.years.as_ref());
        NameTrendParams {
            name: name.to_string(),
            countries: self.filters.countries.clone(),
            year_min,
            year_max,
        }
    }

    /// Explorer path with the page, search and countries, e.g. `/names?page=2&search=al`
    pub fn location(&self) -> String {
        let params = self.params();
        build_url_with_params(
            Route::NAMES_EXPLORER,
            &[
                ("page", (self.page > 1).then(|| self.page.to_string())),
                ("search", params.search_term().map(str::to_string)),
                (
                    "countries",
                    (!params.countries.is_empty()).then(|| params.countries.join(",")),
                ),
            ],
        )
    }

    pub fn is_editing(&self) -> bool {
        self.focus == ExplorerFocus::Filters
    }

    pub fn set_years(&mut self, years: &QueryState<MetaYearsResponse>) {
        if let Some(data) = years.data() {
            self.years = Some(data.as_ref().clone());
        }
    }

    /// Show a names result; fresh results also refresh the derived popularity values
    pub fn set_names(&mut self, query: NamesQuery) {
        if !query.is_placeholder {
            if let Some(data) = query.state.data() {
                let summary = &data.meta.popularity_summary;
                let applied = summary.active_driver.as_deref().and_then(PopularityField::parse);
                if applied != self.filters.popularity.driver() {
                    warn!(
                        server = ?summary.active_driver,
                        local = ?self.filters.popularity.driver().map(|f| f.as_str()),
                        "server applied a different popularity filter"
                    );
                }
                self.filters.popularity.apply_summary(summary);
            }
        }
        let updating = query.is_placeholder || query.is_fetching;
        self.table.set_query(query.state, updating);
    }

    fn total_pages(&self) -> u32 {
        self.table.data().map(|d| d.meta.total_pages).unwrap_or(0)
    }

    fn set_page(&mut self, page: u32) {
        if page != self.page {
            debug!(from = self.page, to = page, "page changed");
            self.page = page;
            self.table.reset_selection();
        }
    }

    fn set_focus(&mut self, focus: ExplorerFocus) {
        self.focus = focus;
        self.table.focused = focus == ExplorerFocus::Table;
    }

    fn draw_pagination(&self, frame: &mut Frame, area: Rect) {
        let Some(data) = self.table.data() else {
            return;
        };
        let meta = &data.meta;
        let key = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
        let muted = Style::default().fg(Color::DarkGray);

        let mut spans = Vec::new();
        if meta.has_prev_page() {
            spans.push(Span::styled(" p ", key));
            spans.push(Span::raw("← Previous  "));
        }
        spans.push(Span::styled(
            format!("Page {} of {}", meta.page, meta.total_pages.max(1)),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!("  •  {} names", format_count(meta.total_count)),
            muted,
        ));
        if meta.has_next_page() {
            spans.push(Span::raw("  Next →"));
            spans.push(Span::styled(" n ", key));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), area);
    }
}

impl Component for Explorer {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.is_editing() {
            return self.filters.handle_key_event(key);
        }

        let action = match key.code {
            KeyCode::Char('n') | KeyCode::Right => Some(Action::NextPage),
            KeyCode::Char('p') | KeyCode::Left => Some(Action::PrevPage),
            KeyCode::Char('/') | KeyCode::Char('f') => Some(Action::FocusFilters),
            KeyCode::Char('s') => Some(Action::CycleSortBy),
            KeyCode::Char('o') => Some(Action::ToggleSortOrder),
            KeyCode::Char('c') => Some(Action::OpenCountriesPicker),
            KeyCode::Char('x') => Some(Action::ClearFilters),
            _ => return self.table.handle_key_event(key),
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::NextRow | Action::PrevRow | Action::FirstRow | Action::LastRow => {
                return self.table.update(action);
            }
            Action::NextPage => {
                if self.page < self.total_pages() {
                    self.set_page(self.page + 1);
                }
            }
            Action::PrevPage => {
                if self.page > 1 {
                    self.set_page(self.page - 1);
                }
            }
            Action::OpenSelectedName => {
                if let Some(entry) = self.table.selected_entry() {
                    return Ok(Some(Action::Navigate(Route::NameDetail(entry.name.clone()))));
                }
            }
            Action::FocusFilters => self.set_focus(ExplorerFocus::Filters),
            Action::FocusTable => self.set_focus(ExplorerFocus::Table),
            Action::CycleSortBy => {
                self.filters.cycle_sort_by();
                self.set_page(1);
            }
            Action::ToggleSortOrder => {
                self.filters.toggle_sort_order();
                self.set_page(1);
            }
            Action::ApplyCountries(codes) => {
                if self.filters.set_countries(codes) {
                    self.set_page(1);
                }
            }
            Action::FiltersChanged => self.set_page(1),
            Action::ClearFilters => {
                self.filters.clear();
                self.set_page(1);
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let layout = calculate_explorer_layout(area);

        self.filters.draw(frame, layout.filters, self.is_editing());

        let hint = match &self.filters.notice {
            Some(notice) => Line::from(Span::styled(
                format!(" {}", notice),
                Style::default().fg(Color::Yellow),
            )),
            None => popularity_hint(&self.filters.popularity),
        };
        frame.render_widget(Paragraph::new(hint), layout.popularity_hint);

        self.table.draw(frame, layout.table)?;
        self.draw_pagination(frame, layout.pagination);
        Ok(())
    }
}
