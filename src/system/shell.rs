// src/system/shell.rs

use crossbeam_channel::{Receiver, Sender, select};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::env;
use std::io::{self, BufRead, BufReader, Write};
use std::sync::Arc;
use std::thread;

use super::io::{read_line, split_args};
use super::options::ShellOption;
use crate::constants::DEFAULT_SHELL_PROMPT;
use crate::core::{Handler, Middleware, Request, ResponseWriter, Router, WrapperWriter};
use crate::errors::{ShellError, ShellResult, is_help_requested};
use crate::flags::{DefaultFlagSet, FlagHandler, FlagSet};

type SharedReader = Arc<Mutex<Box<dyn BufRead + Send>>>;

/// Punto de entrada: ejecuta un comando a partir de argumentos (`execute`) o abre una
/// sesión interactiva (`start`).
///
/// Las opciones se aplican antes de registrar comandos.
pub struct Shell {
    router: Router,
    reader: SharedReader,
    output: Box<dyn Write + Send>,
    error: Box<dyn Write + Send>,
    prompt: String,
    help_handler: Option<Arc<dyn Handler>>,
    flag_set: Arc<dyn FlagSet>,
    exit_on_error: bool,
    applied: HashSet<&'static str>,
    initialized: bool,
    closed_tx: Option<Sender<()>>,
    closed_rx: Receiver<()>,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    pub fn new() -> Self {
        let (closed_tx, closed_rx) = crossbeam_channel::bounded(0);
        Self {
            router: Router::new(),
            reader: Arc::new(Mutex::new(Box::new(BufReader::new(io::stdin())))),
            output: Box::new(io::stdout()),
            error: Box::new(io::stderr()),
            prompt: DEFAULT_SHELL_PROMPT.to_string(),
            help_handler: None,
            flag_set: Arc::new(DefaultFlagSet::new("")),
            exit_on_error: false,
            applied: HashSet::new(),
            initialized: false,
            closed_tx: Some(closed_tx),
            closed_rx,
        }
    }

    // --- OPCIONES ---

    pub fn options(&mut self, options: impl IntoIterator<Item = ShellOption>) -> ShellResult {
        for option in options {
            log::debug!("Aplicando la opción {:?}.", option);
            option.apply(self)?;
        }
        Ok(())
    }

    /// Marca la opción como usada. Falla si ya lo estaba o si la shell ya se inicializó.
    pub(crate) fn claim_option(&mut self, name: &'static str) -> ShellResult {
        if self.initialized || !self.applied.insert(name) {
            return Err(ShellError::OptionIsSet(name.to_string()));
        }
        Ok(())
    }

    pub(crate) fn set_input(&mut self, reader: Box<dyn BufRead + Send>) {
        self.reader = Arc::new(Mutex::new(reader));
    }

    pub(crate) fn set_output(&mut self, writer: Box<dyn Write + Send>) {
        self.output = writer;
    }

    pub(crate) fn set_error(&mut self, writer: Box<dyn Write + Send>) {
        self.error = writer;
    }

    pub(crate) fn set_prompt(&mut self, prompt: String) {
        self.prompt = prompt;
    }

    pub(crate) fn set_help_handler(&mut self, handler: Arc<dyn Handler>) {
        self.help_handler = Some(handler);
    }

    pub(crate) fn set_flag_set(&mut self, flag_set: Arc<dyn FlagSet>) {
        self.flag_set = flag_set;
    }

    pub(crate) fn set_exit_on_error(&mut self, exit_on_error: bool) {
        self.exit_on_error = exit_on_error;
    }

    /// A partir de aquí las opciones ya no se pueden cambiar.
    fn setup(&mut self) {
        if !self.initialized {
            log::debug!("Shell inicializada con el prompt '{}'.", self.prompt);
            self.initialized = true;
        }
    }

    // --- REGISTRO (delegado al router raíz) ---

    pub fn use_middleware(&mut self, middleware: impl Middleware + 'static) {
        self.setup();
        self.router.use_middleware(middleware);
    }

    pub fn flags(&mut self, handler: impl FlagHandler + 'static) {
        self.setup();
        self.router.flags(handler);
    }

    pub fn group(&mut self, setup: impl FnOnce(&mut Router)) -> &mut Router {
        self.setup();
        self.router.group(setup)
    }

    pub fn route(&mut self, command: &str, setup: impl FnOnce(&mut Router)) {
        self.setup();
        self.router.route(command, setup);
    }

    pub fn mount(&mut self, command: &str, router: Router) {
        self.setup();
        self.router.mount(command, router);
    }

    pub fn handle(&mut self, command: &str, handler: impl Handler + 'static) {
        self.setup();
        self.router.handle(command, handler);
    }

    pub fn handle_function<F>(&mut self, command: &str, function: F)
    where
        F: Fn(&mut dyn ResponseWriter, &Request<'_>) -> ShellResult + Send + Sync + 'static,
    {
        self.setup();
        self.router.handle_function(command, function);
    }

    pub fn not_found(&mut self, handler: impl Handler + 'static) {
        self.setup();
        self.router.not_found(handler);
    }

    // --- EJECUCIÓN ---

    /// Ejecuta los argumentos del proceso (sin el nombre del programa).
    pub fn execute(&mut self) -> ShellResult {
        self.execute_args(env::args().skip(1).collect())
    }

    /// Ejecuta un comando.
    ///
    /// Una solicitud de ayuda, ya sea de los flags globales o de un handler, se redirige al
    /// handler de ayuda; sin él, se devuelve como error.
    pub fn execute_args(&mut self, args: Vec<String>) -> ShellResult {
        self.setup();
        log::debug!("Ejecutando {:?}.", args);

        let mut writer = WrapperWriter::new(&mut *self.output, &mut *self.error);

        let flag_set = self.flag_set.sub_flag_set("");
        if let Some(flag_handler) = self.router.flag_handler() {
            flag_handler.define(flag_set.as_definer());
        }
        let (args, parsed) = flag_set.parse(&args);
        if let Err(err) = parsed {
            if !is_help_requested(&err) {
                log::warn!("Flags globales inválidos: {}", err);
                writeln!(writer.error_writer(), "{}", err)?;
            } else if let Some(help) = &self.help_handler {
                let request = Request::new(vec![], args, flag_set, &self.router);
                return help.execute(&mut writer, &request);
            } else {
                return Err(err);
            }
        }

        let request = Request::new(vec![], args, flag_set, &self.router);
        match self.router.execute(&mut writer, &request) {
            Err(err) if is_help_requested(&err) => match &self.help_handler {
                Some(help) => {
                    log::debug!("Ayuda solicitada: {}", err);
                    help.execute(&mut writer, &request)
                }
                None => Err(err),
            },
            result => result,
        }
    }

    /// Abre una sesión interactiva hasta que llegue algo por `cancel`, se agote la entrada,
    /// o falle un handler con `ExitOnError` activo.
    ///
    /// Una lectura bloqueada cuando llega la cancelación se abandona.
    pub fn start(&mut self, cancel: &Receiver<()>) -> ShellResult {
        self.setup();
        log::info!("Sesión interactiva iniciada.");

        let (line_tx, line_rx) = crossbeam_channel::bounded::<io::Result<Option<String>>>(1);
        loop {
            write!(self.output, "{} ", self.prompt)?;
            self.output.flush()?;

            let reader = Arc::clone(&self.reader);
            let line_tx = line_tx.clone();
            thread::spawn(move || {
                let mut input = reader.lock();
                let line = read_line(&mut **input);
                // el receptor ya no existe si la sesión terminó
                let _ = line_tx.send(line);
            });

            select! {
                recv(cancel) -> _ => {
                    log::info!("Sesión cancelada.");
                    self.close();
                    return Ok(());
                }
                recv(line_rx) -> message => {
                    let line = match message {
                        Ok(Ok(Some(line))) => line,
                        Ok(Ok(None)) | Err(_) => {
                            log::info!("Fin de la entrada, cerrando la sesión.");
                            self.close();
                            return Ok(());
                        }
                        Ok(Err(err)) => {
                            log::error!("Error leyendo la entrada: {}", err);
                            self.close();
                            return Err(err.into());
                        }
                    };

                    if let Err(err) = self.execute_args(split_args(&line)) {
                        log::error!("El comando {:?} falló: {}", line.trim(), err);
                        writeln!(self.error, "{}", err)?;
                        if self.exit_on_error {
                            self.close();
                            return Err(err);
                        }
                    }
                }
            }
        }
    }

    /// Se desconecta cuando la sesión interactiva termina.
    pub fn closed(&self) -> Receiver<()> {
        self.closed_rx.clone()
    }

    fn close(&mut self) {
        if self.closed_tx.take().is_some() {
            log::debug!("Sesión cerrada.");
        }
        let _ = self.output.flush();
        let _ = self.error.flush();
    }
}
