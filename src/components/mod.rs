//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod countries_picker;
pub mod explorer;
pub mod filter_bar;
pub mod gender_slider;
pub mod help_dialog;
pub mod landing;
pub mod layout;
pub mod name_detail;
pub mod names_table;
pub mod quit_dialog;
pub mod trend_chart;

pub use countries_picker::CountriesPicker;
pub use explorer::Explorer;
pub use help_dialog::HelpDialog;
pub use landing::Landing;
pub use layout::{calculate_main_layout, centered_popup};
pub use name_detail::NameDetail;
pub use quit_dialog::QuitDialog;
