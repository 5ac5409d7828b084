// src/middleware/error_handler.rs

use std::fmt;
use std::sync::Arc;

use crate::core::{Context, Handler, HandlerFunction, Middleware};
use crate::errors::ShellError;

/// Error capturado por `ErrorHandler`, guardado en el contexto de la petición.
#[derive(Debug, Clone)]
pub struct CaughtError(pub Arc<ShellError>);

type Validate = dyn Fn(&ShellError) -> bool + Send + Sync;

/// Intercepta los errores aceptados por `validate` y ejecuta `handler` en su lugar.
///
/// El error original queda disponible con `error_handler_caught_error`.
#[derive(Clone)]
pub struct ErrorHandler {
    validate: Arc<Validate>,
    handler: Arc<dyn Handler>,
}

impl ErrorHandler {
    pub fn new<V>(validate: V, handler: impl Handler + 'static) -> Self
    where
        V: Fn(&ShellError) -> bool + Send + Sync + 'static,
    {
        Self {
            validate: Arc::new(validate),
            handler: Arc::new(handler),
        }
    }
}

impl Middleware for ErrorHandler {
    fn handle(&self, next: Arc<dyn Handler>) -> Arc<dyn Handler> {
        let validate = Arc::clone(&self.validate);
        let handler = Arc::clone(&self.handler);
        Arc::new(HandlerFunction::new(move |writer, request| {
            match next.execute(writer, request) {
                Err(err) if validate(&err) => {
                    log::debug!("Error interceptado: {}", err);
                    let ctx = request.context().with_value(CaughtError(Arc::new(err)));
                    handler.execute(writer, &request.with_context(ctx))
                }
                other => other,
            }
        }))
    }
}

impl fmt::Debug for ErrorHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ErrorHandler")
    }
}

/// El error capturado por `ErrorHandler`, si lo hay.
pub fn error_handler_caught_error(ctx: &Context) -> Option<Arc<ShellError>> {
    ctx.value::<CaughtError>().map(|caught| Arc::clone(&caught.0))
}
