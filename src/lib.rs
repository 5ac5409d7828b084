// src/lib.rs

//! Enrutador de comandos para CLIs y shells interactivas.
//!
//! Un `Shell` posee un `Router` raíz; cada router asocia nombres de comando a handlers,
//! sub-routers y grupos, con flags y middleware propios por nivel.

pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod core;
pub mod errors;
pub mod flags;
pub mod middleware;
pub mod models;
pub mod system;

pub use crate::commands::{Command, CommandHandler, CommandRouter, HelpCommand};
pub use crate::core::{
    BufferWriter, Context, Handler, HandlerFunction, Middleware, MiddlewareFunction, Request,
    ResponseWriter, Router, Routes, WrapperWriter,
};
pub use crate::errors::{ShellError, ShellResult, is_help_requested};
pub use crate::flags::{
    DefaultFlagSet, FlagDefiner, FlagHandler, FlagHandlerFunction, FlagSet, FlagValue,
    FlagValues,
};
pub use crate::system::{Shell, ShellOption};
