//! Vireo compiler driver library.
//!
//! The binary in `main.rs` dispatches to the command handlers in
//! [`commands`]; keeping them in a library crate lets integration tests
//! exercise the same code paths.

pub mod commands;
