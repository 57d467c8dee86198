//! Board-agnostic core logic for the badge firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Button input pipeline (interrupt-fed event queue, debounce, dispatch)
//! - Badge application state and key map
//! - Card records
//! - Battery voltage scaling
//! - Display surface trait
//! - Configuration type definitions
//!
//! # Input pipeline
//!
//! ```text
//! rising edge ─▶ ButtonProducer ─▶ EventQueue ─▶ (wake) ─▶ Dispatcher
//!                 (interrupt)       (static)                (main)
//!                                                             │
//!                                               debounce ─▶ HandlerRegistry ─▶ action
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod badge;
pub mod battery;
pub mod card;
pub mod config;
pub mod input;
pub mod traits;
