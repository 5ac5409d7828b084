// src/core/router.rs

use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::sync::Arc;

use super::handler::{Handler, HandlerFunction};
use super::middleware::{ChainHandler, Middleware};
use super::request::Request;
use super::same_command;
use super::writer::ResponseWriter;
use crate::errors::{ShellError, ShellResult, is_help_requested};
use crate::flags::FlagHandler;

/// Recorrido del árbol de rutas.
pub trait Routes: Send + Sync {
    /// Los handlers registrados directamente en este nivel.
    fn routes(&self) -> &HashMap<String, Arc<dyn Handler>>;

    fn middlewares(&self) -> &[Arc<dyn Middleware>];

    /// Busca el handler para `args`, envuelto en el middleware que le corresponde.
    fn match_route(&self, args: &[String]) -> Option<Arc<dyn Handler>>;
}

/// Un nivel del árbol de comandos.
///
/// Se configura por completo antes de la primera ejecución; durante el despacho es de solo lectura.
#[derive(Default)]
pub struct Router {
    handlers: HashMap<String, Arc<dyn Handler>>,
    children: Vec<Router>,
    middleware: Vec<Arc<dyn Middleware>>,
    not_found: Option<Arc<dyn Handler>>,
    flags: Option<Arc<dyn FlagHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Router hijo que hereda el handler de "no encontrado" tal y como está ahora.
    fn inheriting(&self) -> Self {
        Self {
            not_found: self.not_found.clone(),
            ..Self::default()
        }
    }

    fn ensure_unique(&self, command: &str) {
        if self.match_route(&[command.to_string()]).is_some() {
            panic!("{}", ShellError::DuplicateCommand(command.to_string()));
        }
    }

    /// Define los flags del router, aplicados antes de buscar el comando.
    pub fn flags(&mut self, handler: impl FlagHandler + 'static) {
        self.flags = Some(Arc::new(handler));
    }

    /// Añade un router en línea. Sus rutas se consultan como si fueran de este nivel.
    pub fn group(&mut self, setup: impl FnOnce(&mut Router)) -> &mut Router {
        let mut child = self.inheriting();
        setup(&mut child);
        let index = self.children.len();
        self.children.push(child);
        &mut self.children[index]
    }

    /// Registra `handler` bajo `command`.
    ///
    /// # Panics
    ///
    /// Si `command` ya está registrado en este nivel o en uno de sus grupos.
    pub fn handle(&mut self, command: &str, handler: impl Handler + 'static) {
        self.handle_arc(command, Arc::new(handler));
    }

    pub fn handle_arc(&mut self, command: &str, handler: Arc<dyn Handler>) {
        self.ensure_unique(command);
        log::debug!("Registrando el comando '{}'.", command);
        self.handlers.insert(command.to_string(), handler);
    }

    pub fn handle_function<F>(&mut self, command: &str, function: F)
    where
        F: Fn(&mut dyn ResponseWriter, &Request<'_>) -> ShellResult + Send + Sync + 'static,
    {
        self.handle(command, HandlerFunction::new(function));
    }

    /// Handler usado cuando ninguna ruta coincide.
    pub fn not_found(&mut self, handler: impl Handler + 'static) {
        self.not_found = Some(Arc::new(handler));
    }

    /// Añade un sub-router bajo `command`.
    ///
    /// El sub-router copia el handler de "no encontrado" actual; los cambios posteriores no le llegan.
    pub fn route(&mut self, command: &str, setup: impl FnOnce(&mut Router)) {
        self.ensure_unique(command);
        let mut sub = self.inheriting();
        setup(&mut sub);
        log::debug!("Registrando el sub-router '{}'.", command);
        self.handlers.insert(command.to_string(), Arc::new(sub));
    }

    /// Monta un router construido por separado. No hereda nada de este nivel.
    pub fn mount(&mut self, command: &str, router: Router) {
        self.ensure_unique(command);
        log::debug!("Montando el router '{}'.", command);
        self.handlers.insert(command.to_string(), Arc::new(router));
    }

    pub fn use_middleware(&mut self, middleware: impl Middleware + 'static) {
        self.middleware.push(Arc::new(middleware));
    }
}

impl Routes for Router {
    fn routes(&self) -> &HashMap<String, Arc<dyn Handler>> {
        &self.handlers
    }

    fn middlewares(&self) -> &[Arc<dyn Middleware>] {
        &self.middleware
    }

    fn match_route(&self, args: &[String]) -> Option<Arc<dyn Handler>> {
        let command = args.first()?;

        let matched = self
            .handlers
            .iter()
            .find(|(name, _)| same_command(name, command))
            .map(|(_, handler)| Arc::clone(handler))
            .or_else(|| self.children.iter().find_map(|child| child.match_route(args)))?;

        Some(Arc::new(ChainHandler::new(matched, self.middleware.clone())))
    }
}

impl Handler for Router {
    fn execute(&self, writer: &mut dyn ResponseWriter, request: &Request<'_>) -> ShellResult {
        let args = &request.args;

        if let (Some(handler), Some(current)) = (self.match_route(args), args.first()) {
            let flag_set = request.flag_set.sub_flag_set(current);
            if let Some(flag_handler) = handler.flag_handler() {
                flag_handler.define(flag_set.as_definer());
            }

            let (remaining, parsed) = flag_set.parse(&args[1..]);
            if let Err(err) = parsed {
                if is_help_requested(&err) {
                    return Err(err);
                }
                log::warn!("Flags inválidos para '{}': {}", current, err);
                writeln!(writer.error_writer(), "{}", err)?;
            }

            // la ruta vuelve a la cabeza para que `update_request` la quite una sola vez
            let mut advanced = Vec::with_capacity(remaining.len() + 1);
            advanced.push(current.clone());
            advanced.extend(remaining);
            let request = request.update_request(current, Some(advanced), Some(flag_set), Some(self));
            log::debug!("Ejecutando la ruta {:?}.", request.path);
            return handler.execute(writer, &request);
        }

        if let Some(not_found) = &self.not_found {
            log::debug!("Sin coincidencias para {:?}, usando el handler de no encontrado.", args);
            let handler = ChainHandler::new(Arc::clone(not_found), self.middleware.clone());
            let request = request.with_routes(self);
            return handler.execute(writer, &request);
        }

        Ok(())
    }

    fn flag_handler(&self) -> Option<&dyn FlagHandler> {
        self.flags.as_deref()
    }

    fn as_routes(&self) -> Option<&dyn Routes> {
        Some(self)
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut commands: Vec<&String> = self.handlers.keys().collect();
        commands.sort();
        f.debug_struct("Router")
            .field("commands", &commands)
            .field("groups", &self.children)
            .field("middleware", &self.middleware.len())
            .field("not_found", &self.not_found.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BufferWriter, MiddlewareFunction, WrapperWriter};
    use crate::flags::{DefaultFlagSet, FlagDefiner, FlagHandlerFunction, FlagSet, FlagValues};
    use parking_lot::Mutex;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn reply(text: &'static str) -> HandlerFunction {
        HandlerFunction::new(move |writer, _| {
            write!(writer, "{}", text)?;
            Ok(())
        })
    }

    /// Ejecuta `router` con `args` y devuelve (resultado, salida, errores).
    fn run(router: &Router, args: &[&str]) -> (ShellResult, String, String) {
        run_with_flags(router, args, Arc::new(DefaultFlagSet::new("")))
    }

    fn run_with_flags(
        router: &Router,
        args: &[&str],
        flag_set: Arc<dyn FlagSet>,
    ) -> (ShellResult, String, String) {
        let (mut output, mut error) = (BufferWriter::new(), BufferWriter::new());
        let result = {
            let mut writer = WrapperWriter::new(&mut output, &mut error);
            let request = Request::new(vec![], strings(args), flag_set, router);
            router.execute(&mut writer, &request)
        };
        (result, output.contents(), error.contents())
    }

    #[test]
    fn matches_commands_ignoring_case() {
        let mut router = Router::new();
        router.handle("ping", reply("pong"));

        for name in ["ping", "PING", "Ping"] {
            assert!(router.match_route(&strings(&[name])).is_some(), "{}", name);
        }
        assert!(router.match_route(&strings(&["pong"])).is_none());
        assert!(router.match_route(&[]).is_none());
    }

    #[test]
    fn ping_group_and_missing_scenario() {
        let mut router = Router::new();
        router.handle("ping", reply("pong"));
        router.group(|group| group.handle("a", reply("A")));

        let (result, output, _) = run(&router, &["ping"]);
        assert!(result.is_ok());
        assert_eq!(output, "pong");

        let (result, output, _) = run(&router, &["a"]);
        assert!(result.is_ok());
        assert_eq!(output, "A");

        assert!(router.match_route(&strings(&["missing"])).is_none());
        let (result, output, errors) = run(&router, &["missing"]);
        assert!(result.is_ok());
        assert_eq!(output, "");
        assert_eq!(errors, "");
    }

    #[test]
    fn nested_routes_consume_the_path() {
        let seen = Arc::new(Mutex::new((Vec::new(), Vec::new())));
        let captured = Arc::clone(&seen);

        let mut router = Router::new();
        router.route("users", |users| {
            users.handle_function("add", move |_, request| {
                *captured.lock() = (request.path.clone(), request.args.clone());
                Ok(())
            });
            users.handle("list", reply("lista"));
        });

        let (result, _, _) = run(&router, &["users", "add", "x@example.com"]);
        assert!(result.is_ok());
        let (path, args) = seen.lock().clone();
        assert_eq!(path, strings(&["users", "add"]));
        assert_eq!(args, strings(&["x@example.com"]));
    }

    #[test]
    fn repeated_route_token_stays_in_the_args() {
        let mut router = Router::new();
        router.handle_function("echo", |writer, request| {
            write!(writer, "{:?} {:?}", request.path, request.args)?;
            Ok(())
        });

        let (result, output, _) = run(&router, &["echo", "echo", "x"]);
        assert!(result.is_ok());
        assert_eq!(output, r#"["echo"] ["echo", "x"]"#);

        let (_, output, _) = run(&router, &["ECHO", "-v", "echo"]);
        assert_eq!(output, r#"["ECHO"] ["echo"]"#);
    }

    #[test]
    fn group_handlers_see_the_parent_as_routes() {
        let mut router = Router::new();
        router.handle("ping", reply("pong"));
        router.group(|group| {
            group.handle_function("count", |writer, request| {
                write!(writer, "{}", request.routes.routes().len())?;
                Ok(())
            });
        });

        let (_, output, _) = run(&router, &["count"]);
        assert_eq!(output, "1");
    }

    #[test]
    #[should_panic(expected = "'PING' el comando ya ha sido declarado")]
    fn duplicate_handlers_panic() {
        let mut router = Router::new();
        router.handle("ping", reply("pong"));
        router.handle_function("PING", |_, _| Ok(()));
    }

    #[test]
    #[should_panic(expected = "'users' el comando ya ha sido declarado")]
    fn duplicate_route_after_handler_panics() {
        let mut router = Router::new();
        router.handle("users", reply("users"));
        router.route("users", |_| {});
    }

    #[test]
    #[should_panic(expected = "'users' el comando ya ha sido declarado")]
    fn duplicate_mount_after_route_panics() {
        let mut router = Router::new();
        router.route("users", |_| {});
        router.mount("users", Router::new());
    }

    #[test]
    #[should_panic(expected = "'a' el comando ya ha sido declarado")]
    fn group_commands_count_as_duplicates() {
        let mut router = Router::new();
        router.group(|group| group.handle("a", reply("A")));
        router.handle("a", reply("otra"));
    }

    #[test]
    fn middleware_wraps_from_the_outside_in() {
        let log = Arc::new(Mutex::new(Vec::<String>::new()));
        let tag = |name: &'static str, log: Arc<Mutex<Vec<String>>>| {
            MiddlewareFunction::new(move |next| {
                let log = Arc::clone(&log);
                Arc::new(HandlerFunction::new(move |writer, request| {
                    log.lock().push(format!(">{}", name));
                    let result = next.execute(writer, request);
                    log.lock().push(format!("<{}", name));
                    result
                }))
            })
        };

        let mut router = Router::new();
        router.use_middleware(tag("root", Arc::clone(&log)));
        let handler_log = Arc::clone(&log);
        router.group(|group| {
            group.use_middleware(tag("A", Arc::clone(&log)));
            group.use_middleware(tag("B", Arc::clone(&log)));
            group.handle_function("cmd", move |_, _| {
                handler_log.lock().push("cmd".to_string());
                Ok(())
            });
        });

        let (result, _, _) = run(&router, &["cmd"]);
        assert!(result.is_ok());
        assert_eq!(
            *log.lock(),
            vec![">root", ">A", ">B", "cmd", "<B", "<A", "<root"]
        );
    }

    #[test]
    fn not_found_handler_gets_the_unmatched_args() {
        let mut router = Router::new();
        router.not_found(HandlerFunction::new(|writer, request| {
            write!(writer, "no encontrado: {}", request.args.join(" "))?;
            Ok(())
        }));
        router.route("users", |users| users.handle("list", reply("lista")));

        let (result, output, _) = run(&router, &["nada", "x"]);
        assert!(result.is_ok());
        assert_eq!(output, "no encontrado: nada x");

        // el sub-router heredó el handler al crearse
        let (_, output, _) = run(&router, &["users", "borrar"]);
        assert_eq!(output, "no encontrado: borrar");
    }

    #[test]
    fn not_found_is_captured_when_the_sub_router_is_created() {
        let mut router = Router::new();
        router.route("early", |early| early.handle("x", reply("x")));
        router.not_found(reply("fallback"));
        router.route("late", |late| late.handle("x", reply("x")));

        let (_, output, _) = run(&router, &["early", "nada"]);
        assert_eq!(output, "");
        let (_, output, _) = run(&router, &["late", "nada"]);
        assert_eq!(output, "fallback");
    }

    #[test]
    fn mounted_routers_do_not_inherit_not_found() {
        let mut router = Router::new();
        router.not_found(reply("fallback"));
        let mut mounted = Router::new();
        mounted.handle("x", reply("x"));
        router.mount("ext", mounted);

        let (result, output, _) = run(&router, &["ext", "nada"]);
        assert!(result.is_ok());
        assert_eq!(output, "");
    }

    #[test]
    fn route_flags_are_parsed_before_the_handler_runs() {
        let mut router = Router::new();
        router.handle(
            "greet",
            GreetCommand {
                flags: FlagHandlerFunction::new(|fd| fd.string("name", "mundo", "a quién saludar")),
            },
        );

        let (result, output, _) = run(&router, &["greet", "-name", "ana", "resto"]);
        assert!(result.is_ok());
        assert_eq!(output, "hola ana [resto]");

        let (_, output, _) = run(&router, &["greet"]);
        assert_eq!(output, "hola mundo []");
    }

    #[test]
    fn parse_errors_are_reported_but_not_fatal() {
        let mut router = Router::new();
        router.handle_function("echo", |writer, request| {
            write!(writer, "{}", request.args.join(" "))?;
            Ok(())
        });

        let (result, output, errors) = run(&router, &["echo", "-nope", "x"]);
        assert!(result.is_ok());
        assert_eq!(output, "x");
        assert!(errors.contains("flag provided but not defined: -nope"));
    }

    #[test]
    fn help_flag_stops_the_dispatch() {
        let mut router = Router::new();
        router.handle("ping", reply("pong"));

        let (result, output, _) = run(&router, &["ping", "-h"]);
        assert!(matches!(result, Err(ShellError::HelpRequested(_))));
        assert_eq!(output, "");
    }

    #[test]
    fn flags_follow_the_routing_levels() {
        let root: Arc<dyn FlagSet> = Arc::new(DefaultFlagSet::new(""));
        root.bool("loud", false, "en mayúsculas");

        let mut router = Router::new();
        router.route("users", |users| {
            users.flags(FlagHandlerFunction::new(|fd| fd.string("org", "", "organización")));
            users.handle_function("add", |writer, request| {
                let flags = request.flag_values();
                write!(
                    writer,
                    "{:?} {:?}",
                    flags.get_bool("loud"),
                    flags.get_string("org")
                )?;
                Ok(())
            });
        });

        let (result, output, _) = run_with_flags(
            &router,
            &["users", "-org", "acme", "add", "x"],
            Arc::clone(&root),
        );
        assert!(result.is_ok());
        assert_eq!(output, "Some(false) Some(\"acme\")");

        // lo definido en un nivel interior no es visible fuera
        assert_eq!(root.get_string("org"), None);
    }

    struct GreetCommand {
        flags: FlagHandlerFunction,
    }

    impl Handler for GreetCommand {
        fn execute(&self, writer: &mut dyn ResponseWriter, request: &Request<'_>) -> ShellResult {
            let name = request.flag_values().get_string("name").unwrap_or_default();
            write!(writer, "hola {} [{}]", name, request.args.join(" "))?;
            Ok(())
        }

        fn flag_handler(&self) -> Option<&dyn FlagHandler> {
            Some(&self.flags)
        }
    }
}
