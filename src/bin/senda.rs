// src/bin/senda.rs

use clap::Parser;
use crossbeam_channel::Sender;
use dialoguer::{Input, Password, theme::ColorfulTheme};
use std::io::Write;

use senda::cli::Cli;
use senda::commands::{Command, CommandRouter, HelpCommand};
use senda::config;
use senda::errors::{BoxError, ShellError, ShellResult};
use senda::flags::{FlagDefiner, FlagHandlerFunction, FlagValues};
use senda::middleware::Recoverer;
use senda::system::{Shell, ShellOption};

/// El punto de entrada del binario de demostración.
fn main() {
    // Para ver los logs, ejecuta con `RUST_LOG=debug senda ...`
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run_cli(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<(), BoxError> {
    log::debug!("CLI args parsed: {:?}", cli);

    let settings = config::load_shell_config(cli.config.as_deref())?;
    let (cancel_tx, cancel_rx) = crossbeam_channel::unbounded();
    let mut shell = build_shell(settings.options(), cancel_tx)?;

    if cli.interactive {
        shell.start(&cancel_rx)?;
    } else {
        shell.execute_args(cli.args)?;
    }
    Ok(())
}

fn build_shell(options: Vec<ShellOption>, cancel: Sender<()>) -> ShellResult<Shell> {
    let mut shell = Shell::new();
    shell.options([ShellOption::help_handler(HelpCommand::new("help"))])?;
    shell.options(options)?;

    shell.flags(FlagHandlerFunction::new(|fd| {
        fd.bool("toUpper", false, "respuesta en mayúsculas")
    }));
    shell.use_middleware(Recoverer);

    shell.handle("ping", ping_command());
    shell.handle("users", users_router());
    shell.handle("login", login_command());
    shell.handle_function("secret", |_, _| panic!("this command should not be called."));
    shell.handle_function("help", |_, _| {
        Err(ShellError::HelpRequested("help command".to_string()))
    });
    shell.handle_function("exit", move |writer, _| {
        writeln!(writer, "Hasta luego.")?;
        // sin sesión interactiva nadie escucha; no es un error
        let _ = cancel.send(());
        Ok(())
    });
    shell.not_found(senda::HandlerFunction::new(|_, request| {
        match request.args.first() {
            Some(command) => Err(ShellError::CommandNotFound(command.clone())),
            None => Ok(()),
        }
    }));

    Ok(shell)
}

// --- COMANDOS ---

fn ping_command() -> Command {
    Command::new("Ping")
        .with_summary("Comando ping pong sencillo")
        .with_description("Responde con la palabra pong")
        .with_usage("ping [-suffix texto]")
        .with_flags(|fd| fd.string("suffix", "", "añade un `texto` al final de la respuesta"))
        .with_function(|writer, request| {
            let flags = request.flag_values();
            let mut message = format!("pong{}", flags.get_string("suffix").unwrap_or_default());
            if flags.get_bool("toUpper") == Some(true) {
                message = message.to_uppercase();
            }
            writeln!(writer, "{}", message)?;
            Ok(())
        })
}

fn users_router() -> CommandRouter {
    CommandRouter::new(
        "Users",
        "Comandos para gestionar usuarios",
        "Una serie de comandos para ayudar a gestionar usuarios",
        "users add|delete|list",
        |r| {
            r.handle(
                "list",
                Command::new("List")
                    .with_summary("Lista los usuarios")
                    .with_description("Muestra todos los usuarios válidos")
                    .with_usage("list")
                    .with_function(|writer, _| {
                        writeln!(writer, "No hay usuarios registrados.")?;
                        Ok(())
                    }),
            );
            r.handle(
                "add",
                Command::new("Add")
                    .with_summary("Añade un usuario")
                    .with_description("Da de alta un usuario nuevo")
                    .with_usage("add email@example.com")
                    .with_function(|writer, request| user_action(writer, request, "añadido")),
            );
            r.handle(
                "delete",
                Command::new("Delete")
                    .with_summary("Elimina un usuario")
                    .with_description("Elimina un usuario existente")
                    .with_usage("delete email@example.com")
                    .with_function(|writer, request| user_action(writer, request, "eliminado")),
            );
        },
    )
}

fn user_action(
    writer: &mut dyn senda::ResponseWriter,
    request: &senda::Request<'_>,
    action: &str,
) -> ShellResult {
    let Some(email) = request.args.first() else {
        return Err(ShellError::HelpRequested(request.path.join(" ")));
    };
    writeln!(writer, "Usuario {} {}.", email, action)?;
    Ok(())
}

fn login_command() -> Command {
    Command::new("Login")
        .with_summary("Inicia sesión")
        .with_description("Pide usuario y contraseña de forma interactiva")
        .with_usage("login")
        .with_function(|writer, _| {
            let theme = ColorfulTheme::default();
            let user = Input::<String>::with_theme(&theme)
                .with_prompt("Usuario")
                .interact_text()
                .map_err(|e| ShellError::Other(Box::new(e)))?;
            let _password = Password::with_theme(&theme)
                .with_prompt("Contraseña")
                .interact()
                .map_err(|e| ShellError::Other(Box::new(e)))?;
            writeln!(writer, "Bienvenido, {}.", user)?;
            Ok(())
        })
}
