//! Configuration types
//!
//! Board-agnostic configuration structures. Values are fixed when the
//! input pipeline is constructed and never change at runtime.

pub mod types;

pub use types::*;
