// src/commands/command_router.rs

use std::ops::{Deref, DerefMut};

use super::CommandHandler;
use crate::core::{Handler, Request, ResponseWriter, Router, Routes};
use crate::errors::ShellResult;
use crate::flags::FlagHandler;

/// Un `Router` con metadatos de comando, para agrupar sub-comandos visibles en la ayuda.
#[derive(Debug, Default)]
pub struct CommandRouter {
    router: Router,
    pub name: String,
    pub summary: String,
    pub description: String,
    pub usage: String,
}

impl CommandRouter {
    pub fn new(
        name: impl Into<String>,
        summary: impl Into<String>,
        description: impl Into<String>,
        usage: impl Into<String>,
        setup: impl FnOnce(&mut Router),
    ) -> Self {
        let mut router = Router::new();
        setup(&mut router);
        Self {
            router,
            name: name.into(),
            summary: summary.into(),
            description: description.into(),
            usage: usage.into(),
        }
    }
}

impl Deref for CommandRouter {
    type Target = Router;

    fn deref(&self) -> &Router {
        &self.router
    }
}

impl DerefMut for CommandRouter {
    fn deref_mut(&mut self) -> &mut Router {
        &mut self.router
    }
}

impl Handler for CommandRouter {
    fn execute(&self, writer: &mut dyn ResponseWriter, request: &Request<'_>) -> ShellResult {
        self.router.execute(writer, request)
    }

    fn flag_handler(&self) -> Option<&dyn FlagHandler> {
        self.router.flag_handler()
    }

    fn as_routes(&self) -> Option<&dyn Routes> {
        Some(&self.router)
    }

    fn command(&self) -> Option<&dyn CommandHandler> {
        Some(self)
    }
}

impl CommandHandler for CommandRouter {
    fn name(&self) -> &str {
        &self.name
    }

    fn summary(&self) -> &str {
        &self.summary
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn usage(&self) -> &str {
        &self.usage
    }
}
