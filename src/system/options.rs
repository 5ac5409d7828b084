// src/system/options.rs

use std::fmt;
use std::io::{BufRead, BufReader, Read, Write};
use std::sync::Arc;

use super::shell::Shell;
use crate::core::Handler;
use crate::errors::{ShellError, ShellResult};
use crate::flags::FlagSet;

/// Opciones de configuración de la shell.
///
/// Se aplican una sola vez y antes de registrar comandos; aplicar una opción ya usada
/// devuelve `ShellError::OptionIsSet`.
pub enum ShellOption {
    Input(Box<dyn BufRead + Send>),
    OutputWriter(Box<dyn Write + Send>),
    ErrorWriter(Box<dyn Write + Send>),
    ShellPrompt(String),
    /// Handler ejecutado cuando se solicita la ayuda.
    HelpHandler(Arc<dyn Handler>),
    /// Si es `true`, la sesión interactiva termina con el primer error de un handler.
    ExitOnError(bool),
    FlagSet(Arc<dyn FlagSet>),
}

impl ShellOption {
    pub fn input(reader: impl Read + Send + 'static) -> Self {
        ShellOption::Input(Box::new(BufReader::new(reader)))
    }

    pub fn output_writer(writer: impl Write + Send + 'static) -> Self {
        ShellOption::OutputWriter(Box::new(writer))
    }

    pub fn error_writer(writer: impl Write + Send + 'static) -> Self {
        ShellOption::ErrorWriter(Box::new(writer))
    }

    /// # Panics
    ///
    /// Si `prompt` está vacío.
    pub fn shell_prompt(prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        if prompt.is_empty() {
            panic!("{}", ShellError::OptionIsInvalid("ShellPrompt".to_string()));
        }
        ShellOption::ShellPrompt(prompt)
    }

    pub fn help_handler(handler: impl Handler + 'static) -> Self {
        ShellOption::HelpHandler(Arc::new(handler))
    }

    pub fn exit_on_error(exit_on_error: bool) -> Self {
        ShellOption::ExitOnError(exit_on_error)
    }

    pub fn flag_set(flag_set: Arc<dyn FlagSet>) -> Self {
        ShellOption::FlagSet(flag_set)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShellOption::Input(_) => "Input",
            ShellOption::OutputWriter(_) => "OutputWriter",
            ShellOption::ErrorWriter(_) => "ErrorWriter",
            ShellOption::ShellPrompt(_) => "ShellPrompt",
            ShellOption::HelpHandler(_) => "HelpHandler",
            ShellOption::ExitOnError(_) => "ExitOnError",
            ShellOption::FlagSet(_) => "FlagSet",
        }
    }

    pub(crate) fn apply(self, shell: &mut Shell) -> ShellResult {
        let name = self.name();
        // ExitOnError puede cambiarse siempre.
        if let ShellOption::ExitOnError(exit_on_error) = self {
            shell.set_exit_on_error(exit_on_error);
            return Ok(());
        }

        shell.claim_option(name)?;
        match self {
            ShellOption::Input(reader) => shell.set_input(reader),
            ShellOption::OutputWriter(writer) => shell.set_output(writer),
            ShellOption::ErrorWriter(writer) => shell.set_error(writer),
            ShellOption::ShellPrompt(prompt) => shell.set_prompt(prompt),
            ShellOption::HelpHandler(handler) => shell.set_help_handler(handler),
            ShellOption::FlagSet(flag_set) => shell.set_flag_set(flag_set),
            ShellOption::ExitOnError(_) => {}
        }
        Ok(())
    }
}

impl fmt::Debug for ShellOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellOption::ShellPrompt(prompt) => write!(f, "ShellPrompt({:?})", prompt),
            ShellOption::ExitOnError(value) => write!(f, "ExitOnError({})", value),
            other => f.write_str(other.name()),
        }
    }
}
