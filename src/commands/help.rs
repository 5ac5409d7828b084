// src/commands/help.rs

use std::collections::BTreeMap;
use std::io::Write;

use super::CommandHandler;
use crate::core::{Handler, Request, ResponseWriter, Routes};
use crate::errors::ShellResult;

/// Muestra la lista de comandos de un nivel o el detalle de un comando concreto.
///
/// Sirve tanto como comando (`help <comando> [<sub-comando>...]`) como de handler de ayuda
/// de la shell: un primer argumento igual a `usage` se ignora.
#[derive(Debug, Clone, Default)]
pub struct HelpCommand {
    /// Cómo se invoca la ayuda. Vacío: el último segmento de la ruta.
    pub usage: String,
}

impl HelpCommand {
    pub fn new(usage: impl Into<String>) -> Self {
        Self {
            usage: usage.into(),
        }
    }

    fn print_details(
        &self,
        writer: &mut dyn ResponseWriter,
        request: &Request<'_>,
        command: &dyn CommandHandler,
        args: &[String],
    ) -> ShellResult {
        let sub_commands = command.as_routes().map(command_handlers).unwrap_or_default();

        if let Some(sub) = args.first().and_then(|name| sub_commands.get(name.as_str())) {
            return self.print_details(writer, request, *sub, &args[1..]);
        }

        let flag_set = request.flag_set.sub_flag_set(command.name());
        if let Some(flags) = command.flag_handler() {
            flags.define(flag_set.as_definer());
        }

        writeln!(writer)?;
        writeln!(writer, "{}", command.name())?;
        writeln!(writer, "  Uso: {}", command.usage())?;
        writeln!(writer, "  {}", command.summary())?;
        writeln!(writer)?;
        writeln!(writer, "{}", command.description())?;
        writeln!(writer)?;

        print_command_list(writer, &sub_commands)?;
        print_flag_usage(writer, &flag_set.default_usage())
    }
}

impl Handler for HelpCommand {
    fn execute(&self, writer: &mut dyn ResponseWriter, request: &Request<'_>) -> ShellResult {
        let usage = match (self.usage.is_empty(), request.path.last()) {
            (true, Some(last)) => last.clone(),
            _ => self.usage.clone(),
        };
        let commands = command_handlers(request.routes);

        let mut args = request.args.as_slice();
        if args.len() > 1 && args[0] == usage {
            args = &args[1..];
        }
        if let Some(command) = args.first().and_then(|name| commands.get(name.as_str())) {
            return self.print_details(writer, request, *command, &args[1..]);
        }

        writeln!(writer)?;
        writeln!(writer, "{}: {} o {} <comando>", usage, usage, usage)?;
        print_command_list(writer, &commands)?;
        print_flag_usage(writer, &request.flag_set.default_usage())?;
        writeln!(writer)?;
        writeln!(
            writer,
            "Usa \"{} <comando>\" para ver el detalle del comando",
            usage
        )?;
        Ok(())
    }
}

/// Los handlers de `routes` que se describen como comando, ordenados por nombre.
fn command_handlers(routes: &dyn Routes) -> BTreeMap<&str, &dyn CommandHandler> {
    routes
        .routes()
        .iter()
        .filter_map(|(name, handler)| handler.command().map(|command| (name.as_str(), command)))
        .collect()
}

fn print_command_list(
    writer: &mut dyn ResponseWriter,
    commands: &BTreeMap<&str, &dyn CommandHandler>,
) -> ShellResult {
    if commands.is_empty() {
        return Ok(());
    }
    writeln!(writer)?;
    writeln!(writer, "Comandos")?;
    writeln!(writer, "------------------")?;
    for (name, command) in commands {
        writeln!(writer, "{:>12}:\t{}", name, command.summary())?;
    }
    Ok(())
}

fn print_flag_usage(writer: &mut dyn ResponseWriter, usage: &str) -> ShellResult {
    if !usage.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Flags")?;
        writeln!(writer, "{}", usage)?;
    }
    Ok(())
}
