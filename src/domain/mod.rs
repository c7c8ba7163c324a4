pub mod controller;
pub mod date_range;
pub mod days_of_week;
pub mod draft;
pub mod graph_params;
pub mod time_range;
pub mod validator;

pub use controller::*;
pub use date_range::*;
pub use days_of_week::*;
pub use draft::*;
pub use graph_params::*;
pub use time_range::*;
pub use validator::*;
