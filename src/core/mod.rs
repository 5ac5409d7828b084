// src/core/mod.rs

pub mod context;
pub mod handler;
pub mod middleware;
pub mod request;
pub mod router;
pub mod writer;

pub use context::Context;
pub use handler::{Handler, HandlerFunction};
pub use middleware::{ChainHandler, Middleware, MiddlewareFunction, chain};
pub use request::Request;
pub use router::{Router, Routes};
pub use writer::{BufferWriter, ResponseWriter, WrapperWriter};

/// Los nombres de comando se comparan sin distinguir mayúsculas.
pub(crate) fn same_command(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}
