//! Button input pipeline
//!
//! Interrupt context only ever touches the [`EventQueue`] (through a
//! [`ButtonProducer`]) and a [`WakeSignal`]. Everything else - debounce,
//! handler lookup, handler invocation - runs in the main context inside
//! [`Dispatcher::run`].

pub mod button;
pub mod clock;
pub mod dispatcher;
pub mod producer;
pub mod queue;
pub mod registry;
pub mod wake;

pub use button::ButtonId;
pub use clock::{Clock, Timestamp};
pub use dispatcher::{DispatchStats, Dispatcher, Verdict};
pub use producer::ButtonProducer;
pub use queue::{EventQueue, QueueEntry};
pub use registry::{Action, HandlerHost, HandlerRegistry};
pub use wake::{DispatchRequest, WakeSignal};
