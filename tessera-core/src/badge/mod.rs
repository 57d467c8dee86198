//! Badge application
//!
//! The state the buttons act on, the default key map, and the glue that
//! lets the input [`Dispatcher`](crate::input::Dispatcher) drive it.

pub mod app;
pub mod state;

pub use app::{Badge, PageRenderer};
pub use state::{BadgeState, Page};
