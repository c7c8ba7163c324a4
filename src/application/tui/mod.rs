pub mod filter_panel;
pub mod theme;

pub use filter_panel::*;
pub use theme::*;
