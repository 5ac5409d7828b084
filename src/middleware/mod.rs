// src/middleware/mod.rs

//! Middleware opcional para montar en un router o en la shell.

pub mod error_handler;
pub mod recoverer;

pub use error_handler::{CaughtError, ErrorHandler, error_handler_caught_error};
pub use recoverer::Recoverer;
