// src/flags/mod.rs

//! Definición, almacenamiento y parseo de flags por nivel de enrutado.

pub mod flagset;
pub mod handler;
pub mod value;

use std::sync::Arc;
use std::time::Duration;

use crate::errors::ShellResult;

pub use flagset::{DefaultFlagSet, Flag};
pub use handler::{FlagHandler, FlagHandlerFunction};
pub use value::{FlagValue, Value};

/// Permite definir los flags gestionados por un flag set.
pub trait FlagDefiner {
    fn bool(&self, name: &str, default_value: bool, usage: &str);
    fn int(&self, name: &str, default_value: i64, usage: &str);
    fn uint(&self, name: &str, default_value: u64, usage: &str);
    fn string(&self, name: &str, default_value: &str, usage: &str);
    fn string_array(&self, name: &str, default_value: &[String], usage: &str);
    fn float(&self, name: &str, default_value: f64, usage: &str);
    fn duration(&self, name: &str, default_value: Duration, usage: &str);
    /// Define un flag con un `Value` propio.
    fn var(&self, value: Box<dyn Value>, name: &str, usage: &str);
}

/// Acceso de lectura/escritura a los valores de los flags.
///
/// Los getters tipados devuelven `None` si el flag no existe o si el tipo no coincide.
pub trait FlagValues {
    fn get(&self, name: &str) -> Option<FlagValue>;

    /// Asigna el valor del flag como si viniera de la línea de comandos.
    fn set(&self, name: &str, value: &str) -> ShellResult;

    fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            FlagValue::Bool(value) => Some(value),
            _ => None,
        }
    }

    fn get_int(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            FlagValue::Int(value) => Some(value),
            _ => None,
        }
    }

    fn get_uint(&self, name: &str) -> Option<u64> {
        match self.get(name)? {
            FlagValue::Uint(value) => Some(value),
            _ => None,
        }
    }

    fn get_string(&self, name: &str) -> Option<String> {
        match self.get(name)? {
            FlagValue::String(value) => Some(value),
            _ => None,
        }
    }

    fn get_string_array(&self, name: &str) -> Option<Vec<String>> {
        match self.get(name)? {
            FlagValue::StringArray(value) => Some(value),
            _ => None,
        }
    }

    fn get_float(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            FlagValue::Float(value) => Some(value),
            _ => None,
        }
    }

    fn get_duration(&self, name: &str) -> Option<Duration> {
        match self.get(name)? {
            FlagValue::Duration(value) => Some(value),
            _ => None,
        }
    }
}

/// Un conjunto de flags definidos para un nivel del árbol de rutas.
pub trait FlagSet: FlagDefiner + FlagValues + Send + Sync {
    fn name(&self) -> &str;

    /// Vista del flag set como `FlagDefiner`, para pasarlo a un `FlagHandler`.
    fn as_definer(&self) -> &dyn FlagDefiner;

    /// Crea un flag set nuevo que comparte el almacenamiento de todos los flags
    /// definidos hasta ahora en `self`.
    fn sub_flag_set(&self, name: &str) -> Arc<dyn FlagSet>;

    /// Consume los flags iniciales de `args` y devuelve los argumentos restantes.
    ///
    /// Los argumentos restantes se devuelven también cuando hay error.
    fn parse(&self, args: &[String]) -> (Vec<String>, ShellResult);

    fn parsed(&self) -> bool;

    /// Texto de uso con los valores por defecto de todos los flags definidos.
    fn default_usage(&self) -> String;
}
