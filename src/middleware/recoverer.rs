// src/middleware/recoverer.rs

use std::any::Any;
use std::backtrace::Backtrace;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::core::{Handler, HandlerFunction, Middleware};
use crate::errors::ShellError;

/// Convierte un pánico del handler en un mensaje (con backtrace) en la salida de errores.
///
/// La petición termina sin error.
///
/// El hook de pánico del proceso se ejecuta antes que este middleware, así que con el hook
/// por defecto el pánico aparece también en stderr en su formato habitual. Quien quiera
/// solo la salida del recoverer debe instalar su propio hook con `std::panic::set_hook`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Recoverer;

impl Middleware for Recoverer {
    fn handle(&self, next: Arc<dyn Handler>) -> Arc<dyn Handler> {
        Arc::new(HandlerFunction::new(move |writer, request| {
            match panic::catch_unwind(AssertUnwindSafe(|| next.execute(writer, request))) {
                Ok(result) => result,
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    log::error!("Pánico recuperado en {:?}: {}", request.path, message);
                    let errors = writer.error_writer();
                    writeln!(errors, "{}", message)?;
                    writeln!(errors, "{}", Backtrace::force_capture())?;
                    Ok(())
                }
            }
        }))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(err) = payload.downcast_ref::<ShellError>() {
        err.to_string()
    } else {
        "pánico sin mensaje".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BufferWriter, Request, ResponseWriter, Router, WrapperWriter};
    use crate::errors::ShellResult;
    use crate::flags::DefaultFlagSet;

    fn run(router: &Router, command: &str) -> (ShellResult, String, String) {
        let (mut output, mut error) = (BufferWriter::new(), BufferWriter::new());
        let result = {
            let mut writer = WrapperWriter::new(&mut output, &mut error);
            let request = Request::new(
                vec![],
                vec![command.to_string()],
                Arc::new(DefaultFlagSet::new("")),
                router,
            );
            router.execute(&mut writer, &request)
        };
        (result, output.contents(), error.contents())
    }

    #[test]
    fn panics_become_error_output() {
        let mut router = Router::new();
        router.use_middleware(Recoverer);
        router.handle_function("secret", |writer: &mut dyn ResponseWriter, _: &Request<'_>| {
            write!(writer, "antes")?;
            panic!("this command should not be called.");
        });

        let (result, output, errors) = run(&router, "secret");
        assert!(result.is_ok());
        assert_eq!(output, "antes");
        assert!(errors.starts_with("this command should not be called.\n"));
    }

    #[test]
    fn results_pass_through_untouched() {
        let mut router = Router::new();
        router.use_middleware(Recoverer);
        router.handle_function("fail", |_, _| Err(ShellError::msg("fallo")));

        let (result, _, errors) = run(&router, "fail");
        assert!(matches!(result, Err(ShellError::Message(m)) if m == "fallo"));
        assert_eq!(errors, "");
    }

    #[test]
    fn payload_messages_are_extracted() {
        assert_eq!(panic_message(&"texto"), "texto");
        assert_eq!(panic_message(&String::from("propio")), "propio");
        assert_eq!(
            panic_message(&ShellError::CommandNotFound("x".into())),
            "'x' comando no encontrado"
        );
        assert_eq!(panic_message(&42_u8), "pánico sin mensaje");
    }
}
