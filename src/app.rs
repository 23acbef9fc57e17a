//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to child components. It owns
//! the route, the back stack and the query hooks; after every action it asks
//! the hooks for the data the current screen needs and hands the results to
//! the screen components, so drawing never triggers a fetch.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    calculate_main_layout, CountriesPicker, Explorer, HelpDialog, Landing, NameDetail, QuitDialog,
};
use crate::config::{ApiMode, Config};
use crate::model::api::{CountriesResponse, MetaYearsResponse};
use crate::model::{History, Modal, ModalStack, Route, NAV_TABS};
use crate::services::query_cache::DEFAULT_RETRY_DELAY;
use crate::services::{NamesApi, Queries, QueryState};
use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};
use std::sync::Arc;
use tracing::{debug, info};

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state - coordinates between components
pub struct App {
    pub config: Config,

    /// Screen currently shown
    pub route: Route,

    /// Screens to return to with Back
    pub history: History,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// Cached, background-fetched API data
    pub queries: Queries,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// When a fetch last completed
    pub last_updated: Option<DateTime<Local>>,

    years: QueryState<MetaYearsResponse>,
    countries: QueryState<CountriesResponse>,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub landing: Landing,
    pub explorer: Explorer,
    pub detail: NameDetail,
    pub countries_picker: CountriesPicker,
    pub help_dialog: HelpDialog,
    pub quit_dialog: QuitDialog,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    pub fn new(config: Config, api: Arc<dyn NamesApi>, route: Route) -> App {
        let explorer = Explorer::new(config.page_size);
        let queries = Queries::new(api).with_retry(config.query_retry, DEFAULT_RETRY_DELAY);
        App {
            config,
            route,
            history: History::new(),
            modals: ModalStack::new(),
            queries,
            should_quit: false,
            last_updated: None,
            years: QueryState::Idle,
            countries: QueryState::Idle,
            landing: Landing::new(),
            explorer,
            detail: NameDetail::new(),
            countries_picker: CountriesPicker::new(),
            help_dialog: HelpDialog::default(),
            quit_dialog: QuitDialog,
        }
    }

    /// Run the query hooks for the current screen and pass the results down
    pub fn refresh_view(&mut self) {
        self.years = self.queries.meta_years();
        self.countries = self.queries.countries();
        self.explorer.set_years(&self.years);
        if self.modals.top() == Some(&Modal::CountriesPicker) && self.countries_picker.notice.is_some() {
            self.load_countries_picker();
        }

        match &self.route {
            Route::Home => {}
            Route::Names => {
                let params = self.explorer.params();
                let names = self.queries.names(&params);
                self.explorer.set_names(names);
            }
            Route::NameDetail(name) => {
                let params = self.explorer.trend_params(name);
                let enabled = !params.name.trim().is_empty();
                let trend = self.queries.name_trend(&params, enabled);
                self.detail.set_trend(params, trend);
            }
        }
    }

    fn navigate(&mut self, route: Route) {
        if route == self.route {
            return;
        }
        info!(from = %self.route, to = %route, depth = self.history.len() + 1, "navigate");
        let previous = std::mem::replace(&mut self.route, route);
        self.history.push(previous);
    }

    fn back(&mut self) {
        let target = match self.history.pop() {
            Some(route) => route,
            None => match self.route {
                Route::NameDetail(_) => Route::Names,
                Route::Names => Route::Home,
                Route::Home => return,
            },
        };
        info!(from = %self.route, to = %target, "back");
        self.route = target;
    }

    fn open_countries_picker(&mut self) {
        self.countries_picker.selected = self.explorer.filters.countries.clone();
        self.load_countries_picker();
        self.modals.push(Modal::CountriesPicker);
    }

    /// Fill the picker from the countries query, keeping its selection
    fn load_countries_picker(&mut self) {
        let selected = std::mem::take(&mut self.countries_picker.selected);
        match &self.countries {
            QueryState::Data(data) => self.countries_picker.open(data.countries.clone(), &selected),
            QueryState::Error(message) => self
                .countries_picker
                .open_with_notice(format!("Could not load countries: {}", message), &selected),
            QueryState::Idle | QueryState::Loading => self
                .countries_picker
                .open_with_notice("Loading countries…", &selected),
        }
    }

    fn handle_global_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('1') => Some(Action::Navigate(Route::Home)),
            KeyCode::Char('2') => Some(Action::Navigate(Route::Names)),
            KeyCode::Esc | KeyCode::Backspace if self.route != Route::Home => Some(Action::Back),
            _ => match self.route {
                Route::Home => self.landing.handle_key_event(key)?,
                Route::Names => self.explorer.handle_key_event(key)?,
                Route::NameDetail(_) => self.detail.handle_key_event(key)?,
            },
        };
        Ok(action)
    }

    fn dispatch(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                if self.queries.poll() {
                    self.last_updated = Some(Local::now());
                }
            }
            Action::Resize(w, h) => debug!(width = w, height = h, "resize"),
            Action::ForceQuit => self.should_quit = true,

            // ─────────────────────────────────────────────────────────────────
            // Routing
            // ─────────────────────────────────────────────────────────────────
            Action::Navigate(route) => self.navigate(route),
            Action::Back => self.back(),

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => self.modals.push(Modal::QuitConfirm),
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.toggle(Modal::Help);
            }
            Action::CloseModal => {
                self.modals.pop();
            }
            Action::OpenCountriesPicker => self.open_countries_picker(),
            Action::ApplyCountries(codes) => {
                self.modals.pop();
                info!(countries = %codes.join(","), "countries applied");
                return self.explorer.update(Action::ApplyCountries(codes));
            }

            // ─────────────────────────────────────────────────────────────────
            // Data
            // ─────────────────────────────────────────────────────────────────
            Action::Refresh => {
                info!(route = %self.route, "refresh");
                match &self.route {
                    Route::NameDetail(name) => {
                        let params = self.explorer.trend_params(name);
                        self.queries.refresh_trend(&params);
                    }
                    _ => self.queries.refresh(),
                }
                debug!(workers = ?self.queries.spawn_counts(), "fetch workers started so far");
            }

            // Table and filter actions belong to the explorer
            other => return self.explorer.update(other),
        }
        Ok(None)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn init(&mut self) -> Result<()> {
        info!(
            mode = %self.config.api_mode,
            route = %self.route,
            page_size = self.config.page_size,
            "starting"
        );
        self.refresh_view();
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(Some(Action::ForceQuit));
        }

        if let Some(modal) = self.modals.top().cloned() {
            return self.handle_modal_key_event(&modal, key);
        }

        if self.route == Route::Names && self.explorer.is_editing() {
            return self.explorer.handle_key_event(key);
        }

        self.handle_global_key_event(key)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if action != Action::Tick {
            debug!(action = %action, "update");
        }
        let next = self.dispatch(action)?;
        self.refresh_view();
        Ok(next)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let layout = calculate_main_layout(area);

        self.draw_header(frame, layout.header);

        match self.route {
            Route::Home => self.landing.draw(frame, layout.body)?,
            Route::Names => self.explorer.draw(frame, layout.body)?,
            Route::NameDetail(_) => self.detail.draw(frame, layout.body)?,
        }

        self.draw_status(frame, layout.status);
        self.draw_help_bar(frame, layout.help);

        if let Some(modal) = self.modals.top().cloned() {
            self.draw_modal(frame, area, &modal)?;
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helper Methods
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::CountriesPicker => self.countries_picker.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
        }
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.draw(frame, area),
            Modal::CountriesPicker => self.countries_picker.draw(frame, area),
            Modal::Help => self.help_dialog.draw(frame, area),
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Names Explorer · {} ", self.route.title()))
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(40)])
            .split(inner);

        let titles: Vec<Line> = NAV_TABS
            .iter()
            .enumerate()
            .map(|(i, t)| Line::from(format!("{} {}", i + 1, t)))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.route.tab_index())
            .style(Style::default().fg(Color::Gray))
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .divider(Span::styled("│", Style::default().fg(Color::DarkGray)));
        frame.render_widget(tabs, chunks[0]);

        let location = match &self.route {
            Route::Home => String::new(),
            Route::Names => format!("{} ", self.explorer.location()),
            Route::NameDetail(_) => format!("{} ", self.route.path()),
        };
        let source = match self.config.api_mode {
            ApiMode::Mock => "mock data".to_string(),
            ApiMode::Real => self.config.api_base_url.clone(),
        };
        let right = Paragraph::new(Line::from(vec![
            Span::styled(location, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled(format!("[{}]", source), Style::default().fg(Color::DarkGray)),
        ]))
        .alignment(ratatui::layout::Alignment::Right);
        frame.render_widget(right, chunks[1]);
    }

    /// Status line for the current screen
    pub fn status_line(&self) -> Line<'static> {
        let mut spans = match &self.route {
            Route::Home => vec![query_status(&self.years, |years| {
                format!("API Connected - data from {} to {}", years.min_year, years.max_year)
            })],
            Route::Names => {
                let mut spans = vec![query_status(self.explorer.table.state(), |data| {
                    format!("API Connected - {} names loaded", data.names.len())
                })];
                if self.explorer.table.is_updating() && self.explorer.table.data().is_some() {
                    spans.push(Span::styled("  ⟳ updating", Style::default().fg(Color::Yellow)));
                }
                spans
            }
            Route::NameDetail(name) => vec![query_status(self.detail.state(), |trend| {
                format!("{} - {} yearly points", name, trend.time_series.len())
            })],
        };

        if let Some(at) = self.last_updated {
            spans.push(Span::styled(
                format!("  •  Last updated {}", at.format("%H:%M:%S")),
                Style::default().fg(Color::DarkGray),
            ));
        }
        Line::from(spans)
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Paragraph::new(self.status_line()), area);
    }

    fn draw_help_bar(&self, frame: &mut Frame, area: Rect) {
        let key = |k: &'static str, color: Color| {
            Span::styled(k, Style::default().fg(color).add_modifier(Modifier::BOLD))
        };

        let mut spans = Vec::new();
        match &self.route {
            Route::Home => {
                spans.extend([key(" Enter ", Color::Green), Span::raw("Explore names  ")]);
            }
            Route::Names if self.explorer.is_editing() => {
                spans.extend([
                    key(" Tab ", Color::Cyan),
                    Span::raw("Next field  "),
                    key(" ←/→ ", Color::Cyan),
                    Span::raw("Adjust  "),
                    key(" Esc ", Color::Yellow),
                    Span::raw("Back to table  "),
                ]);
            }
            Route::Names => {
                spans.extend([
                    key(" Enter ", Color::Green),
                    Span::raw("Trend  "),
                    key(" n/p ", Color::Cyan),
                    Span::raw("Page  "),
                    key(" / ", Color::Cyan),
                    Span::raw("Filters  "),
                    key(" c ", Color::Cyan),
                    Span::raw("Countries  "),
                    key(" s/o ", Color::Cyan),
                    Span::raw("Sort  "),
                    key(" x ", Color::Cyan),
                    Span::raw("Clear  "),
                ]);
            }
            Route::NameDetail(_) => {
                spans.extend([key(" Esc ", Color::Yellow), Span::raw("Back to names  ")]);
            }
        }
        spans.extend([
            key(" r ", Color::Cyan),
            Span::raw("Refresh  "),
            key(" ? ", Color::Cyan),
            Span::raw("Help  "),
            key(" q ", Color::Yellow),
            Span::raw("Quit"),
        ]);

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

/// One status span for a query: its data summary, its error, or a loading note
fn query_status<V>(state: &QueryState<V>, describe: impl FnOnce(&V) -> String) -> Span<'static> {
    if let Some(data) = state.data() {
        return Span::styled(format!(" ✓ {}", describe(&**data)), Style::default().fg(Color::Green));
    }
    match state.error() {
        Some(e) => Span::styled(format!(" ✗ Error: {}", e), Style::default().fg(Color::Red)),
        None => Span::styled(" ⟳ Loading…", Style::default().fg(Color::Yellow)),
    }
}
