mod app;
mod date_range;
mod theme;
mod views;

pub use app::CaseDeskApp;
pub use theme::{setup_fonts, setup_theme};
