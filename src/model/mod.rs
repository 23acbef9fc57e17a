//! Model layer
//!
//! - `api` - response types of the names API
//! - `filters` - request parameters and their query-string encoding
//! - `popularity` - the three linked popularity filters
//! - `format` - number formatting for tables and summaries
//! - `ui` - routes and navigation history
//! - `modal` - modal overlay management

pub mod api;
pub mod filters;
pub mod format;
pub mod modal;
pub mod popularity;
pub mod ui;

// Re-export commonly used types
pub use modal::{Modal, ModalStack};
pub use ui::{History, Route, NAV_TABS};
