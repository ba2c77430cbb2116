//! Shared data models for cellular connectivity providers

mod locale;
mod package;
mod state;
mod terminal;

pub use locale::*;
pub use package::*;
pub use state::*;
pub use terminal::*;
