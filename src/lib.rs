pub mod api;
pub mod cli;
pub mod feedback;
pub mod format;
pub mod logging;
pub mod models;
pub mod panel;
pub mod render;
pub mod shell;
pub mod state;
pub mod submit;
pub mod video;
pub mod view;

mod browser;
mod connection;
mod dashboard;

pub use panel::Panel;
pub use submit::SubmitOutcome;
