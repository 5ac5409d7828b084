// src/core/handler.rs

use std::fmt;
use std::sync::Arc;

use super::request::Request;
use super::router::Routes;
use super::writer::ResponseWriter;
use crate::commands::CommandHandler;
use crate::errors::ShellResult;
use crate::flags::FlagHandler;

/// Algo capaz de responder a una petición.
///
/// Las capacidades opcionales (definir flags, exponer sub-rutas, describirse como comando)
/// se descubren a través de los métodos `flag_handler`, `as_routes` y `command`.
pub trait Handler: Send + Sync {
    fn execute(&self, writer: &mut dyn ResponseWriter, request: &Request<'_>) -> ShellResult;

    fn flag_handler(&self) -> Option<&dyn FlagHandler> {
        None
    }

    fn as_routes(&self) -> Option<&dyn Routes> {
        None
    }

    fn command(&self) -> Option<&dyn CommandHandler> {
        None
    }
}

type HandlerFn = dyn Fn(&mut dyn ResponseWriter, &Request<'_>) -> ShellResult + Send + Sync;

/// Adaptador para usar una función o closure como `Handler`.
#[derive(Clone)]
pub struct HandlerFunction(Arc<HandlerFn>);

impl HandlerFunction {
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(&mut dyn ResponseWriter, &Request<'_>) -> ShellResult + Send + Sync + 'static,
    {
        Self(Arc::new(function))
    }
}

impl Handler for HandlerFunction {
    fn execute(&self, writer: &mut dyn ResponseWriter, request: &Request<'_>) -> ShellResult {
        (self.0)(writer, request)
    }
}

impl fmt::Debug for HandlerFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HandlerFunction")
    }
}
