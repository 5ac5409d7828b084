// src/commands/mod.rs

//! Handlers con metadatos, listos para la ayuda.

pub mod command;
pub mod command_router;
pub mod help;

pub use command::Command;
pub use command_router::CommandRouter;
pub use help::HelpCommand;

use crate::core::Handler;

/// Un handler que se describe a sí mismo para `HelpCommand`.
pub trait CommandHandler: Handler {
    fn name(&self) -> &str;

    /// Resumen de una línea.
    fn summary(&self) -> &str;

    fn description(&self) -> &str;

    /// Ejemplo de invocación.
    fn usage(&self) -> &str;
}
