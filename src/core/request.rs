// src/core/request.rs

use std::fmt;
use std::sync::Arc;

use super::context::Context;
use super::router::Routes;
use super::same_command;
use crate::flags::FlagSet;

/// La petición que recorre el árbol de rutas.
///
/// `args` nunca contiene los segmentos ya consumidos en `path`.
#[derive(Clone)]
pub struct Request<'a> {
    ctx: Context,
    /// Argumentos todavía sin consumir.
    pub args: Vec<String>,
    /// Segmentos de ruta reconocidos hasta ahora.
    pub path: Vec<String>,
    /// Flag set del nivel actual.
    pub flag_set: Arc<dyn FlagSet>,
    /// Las rutas del router que atiende la petición.
    pub routes: &'a dyn Routes,
}

impl<'a> Request<'a> {
    pub fn new(
        path: Vec<String>,
        args: Vec<String>,
        flag_set: Arc<dyn FlagSet>,
        routes: &'a dyn Routes,
    ) -> Self {
        Self::with_context_parts(Context::new(), path, args, flag_set, routes)
    }

    pub fn with_context_parts(
        ctx: Context,
        path: Vec<String>,
        args: Vec<String>,
        flag_set: Arc<dyn FlagSet>,
        routes: &'a dyn Routes,
    ) -> Self {
        Self {
            ctx,
            args,
            path,
            flag_set,
            routes,
        }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Los valores parseados del flag set de la petición.
    pub fn flag_values(&self) -> &dyn FlagSet {
        self.flag_set.as_ref()
    }

    pub fn with_context(&self, ctx: Context) -> Self {
        Self {
            ctx,
            ..self.clone()
        }
    }

    pub fn with_args(&self, args: Vec<String>) -> Self {
        Self {
            args,
            ..self.clone()
        }
    }

    pub fn with_flag_set(&self, flag_set: Arc<dyn FlagSet>) -> Self {
        Self {
            flag_set,
            ..self.clone()
        }
    }

    pub fn with_routes<'b>(&self, routes: &'b dyn Routes) -> Request<'b>
    where
        'a: 'b,
    {
        self.update_request("", None, None, Some(routes))
    }

    /// Avanza la petición a la ruta `route`.
    ///
    /// Una ruta no vacía se añade a `path` y, si coincide con la cabeza de `args`, se quita de ahí.
    /// Los valores `None` conservan los de la petición actual.
    pub fn update_request<'b>(
        &self,
        route: &str,
        args: Option<Vec<String>>,
        flag_set: Option<Arc<dyn FlagSet>>,
        routes: Option<&'b dyn Routes>,
    ) -> Request<'b>
    where
        'a: 'b,
    {
        let mut args = args.unwrap_or_else(|| self.args.clone());
        let mut path = self.path.clone();

        if !route.is_empty() {
            path.push(route.to_string());
            if args.first().is_some_and(|head| same_command(head, route)) {
                args.remove(0);
            }
        }

        Request {
            ctx: self.ctx.clone(),
            args,
            path,
            flag_set: flag_set.unwrap_or_else(|| Arc::clone(&self.flag_set)),
            routes: routes.unwrap_or(self.routes),
        }
    }
}

impl fmt::Debug for Request<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("args", &self.args)
            .field("path", &self.path)
            .field("flag_set", &self.flag_set.name())
            .finish()
    }
}
