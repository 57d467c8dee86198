//! Embassy async tasks
//!
//! Button tasks run on the interrupt executor; the rest run on the thread
//! executor started by `main`.

pub mod battery;
pub mod buttons;
pub mod dispatch;

pub use battery::{battery_task, BatteryPins};
pub use buttons::button_task;
pub use dispatch::{dispatch_task, BadgeApp};
