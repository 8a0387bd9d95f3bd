//! Learn the scancodes of an infrared remote control and bind them to the
//! buttons of a remote control diagram.
//!
//! Scancodes are read from a linux input device, which the kernel creates for
//! each infrared receiver with a decoder enabled. See [`analyzer::Analyzer`]
//! for the operations a front end may use.

pub mod analyzer;
pub mod bindings;
pub mod buttons;
pub mod config;
pub mod dedup;
mod error;
pub mod input;
pub mod rcdev;
pub mod signal;

pub use error::Error;
