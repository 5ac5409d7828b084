// src/core/middleware.rs

use std::fmt;
use std::sync::Arc;

use super::handler::Handler;
use super::request::Request;
use super::router::Routes;
use super::writer::ResponseWriter;
use crate::commands::CommandHandler;
use crate::errors::ShellResult;
use crate::flags::FlagHandler;

/// Envuelve un handler para producir otro.
pub trait Middleware: Send + Sync {
    fn handle(&self, next: Arc<dyn Handler>) -> Arc<dyn Handler>;
}

type MiddlewareFn = dyn Fn(Arc<dyn Handler>) -> Arc<dyn Handler> + Send + Sync;

/// Adaptador para usar una función o closure como `Middleware`.
#[derive(Clone)]
pub struct MiddlewareFunction(Arc<MiddlewareFn>);

impl MiddlewareFunction {
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(Arc<dyn Handler>) -> Arc<dyn Handler> + Send + Sync + 'static,
    {
        Self(Arc::new(function))
    }
}

impl Middleware for MiddlewareFunction {
    fn handle(&self, next: Arc<dyn Handler>) -> Arc<dyn Handler> {
        (self.0)(next)
    }
}

impl fmt::Debug for MiddlewareFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MiddlewareFunction")
    }
}

/// Compone `[m0, m1, ..., mn]` sobre `handler` como `m0(m1(...mn(handler)))`.
///
/// `m0` es la capa exterior: ve la petición la primera y el resultado el último.
pub fn chain(handler: Arc<dyn Handler>, middlewares: &[Arc<dyn Middleware>]) -> Arc<dyn Handler> {
    middlewares
        .iter()
        .rev()
        .fold(handler, |next, middleware| middleware.handle(next))
}

/// Un handler junto con el middleware de su nivel, compuesto en el momento de ejecutar.
///
/// Las capacidades opcionales se consultan al handler envuelto.
pub struct ChainHandler {
    handler: Arc<dyn Handler>,
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl ChainHandler {
    pub fn new(handler: Arc<dyn Handler>, middlewares: Vec<Arc<dyn Middleware>>) -> Self {
        Self {
            handler,
            middlewares,
        }
    }
}

impl Handler for ChainHandler {
    fn execute(&self, writer: &mut dyn ResponseWriter, request: &Request<'_>) -> ShellResult {
        chain(Arc::clone(&self.handler), &self.middlewares).execute(writer, request)
    }

    fn flag_handler(&self) -> Option<&dyn FlagHandler> {
        self.handler.flag_handler()
    }

    fn as_routes(&self) -> Option<&dyn Routes> {
        self.handler.as_routes()
    }

    fn command(&self) -> Option<&dyn CommandHandler> {
        self.handler.command()
    }
}
