// src/commands/command.rs

use std::fmt;

use super::CommandHandler;
use crate::core::{Handler, HandlerFunction, Request, ResponseWriter};
use crate::errors::{ShellError, ShellResult};
use crate::flags::{FlagDefiner, FlagHandler, FlagHandlerFunction};

/// Un comando terminal con nombre, textos de ayuda y flags propios.
#[derive(Clone, Default)]
pub struct Command {
    pub name: String,
    pub summary: String,
    pub description: String,
    pub usage: String,
    pub flags: Option<FlagHandlerFunction>,
    pub function: Option<HandlerFunction>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    pub fn with_flags<F>(mut self, define: F) -> Self
    where
        F: Fn(&dyn FlagDefiner) + Send + Sync + 'static,
    {
        self.flags = Some(FlagHandlerFunction::new(define));
        self
    }

    pub fn with_function<F>(mut self, function: F) -> Self
    where
        F: Fn(&mut dyn ResponseWriter, &Request<'_>) -> ShellResult + Send + Sync + 'static,
    {
        self.function = Some(HandlerFunction::new(function));
        self
    }
}

impl Handler for Command {
    fn execute(&self, writer: &mut dyn ResponseWriter, request: &Request<'_>) -> ShellResult {
        match &self.function {
            Some(function) => function.execute(writer, request),
            None => Err(ShellError::CommandNotFound(self.name.clone())),
        }
    }

    fn flag_handler(&self) -> Option<&dyn FlagHandler> {
        self.flags.as_ref().map(|flags| flags as &dyn FlagHandler)
    }

    fn command(&self) -> Option<&dyn CommandHandler> {
        Some(self)
    }
}

impl CommandHandler for Command {
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

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("summary", &self.summary)
            .field("usage", &self.usage)
            .finish()
    }
}
