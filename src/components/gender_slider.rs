//! Dual-handle gender balance slider
//!
//! Range on 0-100 where 0 is all female and 100 is all male.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

pub const BALANCE_MIN: u8 = 0;
pub const BALANCE_MAX: u8 = 100;

/// Step used when Shift is held
pub const LARGE_STEP: i16 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Handle {
    #[default]
    Low,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenderBalanceSlider {
    low: u8,
    high: u8,
    active: Handle,
}

impl Default for GenderBalanceSlider {
    fn default() -> Self {
        Self {
            low: BALANCE_MIN,
            high: BALANCE_MAX,
            active: Handle::Low,
        }
    }
}

impl GenderBalanceSlider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_handle(&mut self) {
        self.active = match self.active {
            Handle::Low => Handle::High,
            Handle::High => Handle::Low,
        };
    }

    /// Move the active handle by `delta`, stopping at the other handle
    ///
    /// Returns whether the range changed.
    pub fn move_active(&mut self, delta: i16) -> bool {
        let before = (self.low, self.high);
        match self.active {
            Handle::Low => {
                let next = (self.low as i16 + delta).clamp(BALANCE_MIN as i16, self.high as i16);
                self.low = next as u8;
            }
            Handle::High => {
                let next = (self.high as i16 + delta).clamp(self.low as i16, BALANCE_MAX as i16);
                self.high = next as u8;
            }
        }
        before != (self.low, self.high)
    }

    /// Whether the full 0-100 range is selected
    pub fn is_full_range(&self) -> bool {
        self.low == BALANCE_MIN && self.high == BALANCE_MAX
    }

    /// Range to send, or `None` when nothing is filtered out
    pub fn range(&self) -> Option<(u8, u8)> {
        if self.is_full_range() {
            None
        } else {
            Some((self.low, self.high))
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Track of `width` cells with both handles
    pub fn render_track(&self, width: usize, focused: bool) -> Line<'static> {
        let width = width.max(2);
        let last = (width - 1) as f64;
        let low_pos = ((self.low as f64 / BALANCE_MAX as f64) * last).round() as usize;
        let high_pos = ((self.high as f64 / BALANCE_MAX as f64) * last).round() as usize;

        let handle_style = |handle: Handle| {
            let base = match handle {
                Handle::Low => Style::default().fg(Color::Magenta),
                Handle::High => Style::default().fg(Color::Blue),
            };
            if focused && handle == self.active {
                base.add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                base.add_modifier(Modifier::BOLD)
            }
        };

        let mut spans = Vec::with_capacity(width);
        for i in 0..width {
            let span = if i == low_pos {
                Span::styled("●", handle_style(Handle::Low))
            } else if i == high_pos {
                Span::styled("●", handle_style(Handle::High))
            } else if i > low_pos && i < high_pos {
                Span::styled("━", Style::default().fg(Color::Yellow))
            } else {
                Span::styled("─", Style::default().fg(Color::DarkGray))
            };
            spans.push(span);
        }
        Line::from(spans)
    }

    /// Label such as `40% - 60%`
    pub fn label(&self) -> String {
        format!("{}% - {}%", self.low, self.high)
    }
}
