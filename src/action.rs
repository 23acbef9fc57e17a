//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use crate::model::ui::Route;
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick; drains finished fetches
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Force quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Routing
    // ─────────────────────────────────────────────────────────────────────────
    /// Go to a screen, remembering the current one
    Navigate(Route),
    /// Return to the previous screen
    Back,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    /// Open quit confirmation dialog
    OpenQuitDialog,
    /// Open help dialog showing all keyboard shortcuts
    OpenHelp,
    /// Close the current modal
    CloseModal,
    /// Open the countries multi-select
    OpenCountriesPicker,
    /// Replace the selected country codes
    ApplyCountries(Vec<String>),

    // ─────────────────────────────────────────────────────────────────────────
    // Names Table
    // ─────────────────────────────────────────────────────────────────────────
    /// Move to next row
    NextRow,
    /// Move to previous row
    PrevRow,
    /// Jump to first row
    FirstRow,
    /// Jump to last row
    LastRow,
    /// Load the next page of names
    NextPage,
    /// Load the previous page of names
    PrevPage,
    /// Open the trend view for the selected row
    OpenSelectedName,

    // ─────────────────────────────────────────────────────────────────────────
    // Filters
    // ─────────────────────────────────────────────────────────────────────────
    /// Move keyboard focus into the filter bar
    FocusFilters,
    /// Move keyboard focus back to the table
    FocusTable,
    /// Sort by the next column
    CycleSortBy,
    /// Flip ascending/descending
    ToggleSortOrder,
    /// A filter value changed; resets to the first page
    FiltersChanged,
    /// Reset every filter
    ClearFilters,

    // ─────────────────────────────────────────────────────────────────────────
    // Data
    // ─────────────────────────────────────────────────────────────────────────
    /// Refetch the data on screen
    Refresh,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::Navigate(route) => write!(f, "Navigate({})", route),
            Action::Back => write!(f, "Back"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::OpenCountriesPicker => write!(f, "OpenCountriesPicker"),
            Action::ApplyCountries(codes) => write!(f, "ApplyCountries({})", codes.join(",")),
            Action::NextRow => write!(f, "NextRow"),
            Action::PrevRow => write!(f, "PrevRow"),
            Action::FirstRow => write!(f, "FirstRow"),
            Action::LastRow => write!(f, "LastRow"),
            Action::NextPage => write!(f, "NextPage"),
            Action::PrevPage => write!(f, "PrevPage"),
            Action::OpenSelectedName => write!(f, "OpenSelectedName"),
            Action::FocusFilters => write!(f, "FocusFilters"),
            Action::FocusTable => write!(f, "FocusTable"),
            Action::CycleSortBy => write!(f, "CycleSortBy"),
            Action::ToggleSortOrder => write!(f, "ToggleSortOrder"),
            Action::FiltersChanged => write!(f, "FiltersChanged"),
            Action::ClearFilters => write!(f, "ClearFilters"),
            Action::Refresh => write!(f, "Refresh"),
        }
    }
}
