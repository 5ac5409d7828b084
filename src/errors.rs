// src/errors.rs

use std::error::Error as StdError;
use std::path::PathBuf;
use thiserror::Error;

/// Error genérico que un handler puede devolver envuelto en `ShellError::Other`.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("'{0}' comando no encontrado")]
    CommandNotFound(String),
    #[error("'{0}' el comando ya ha sido declarado")]
    DuplicateCommand(String),
    #[error("fallo al parsear el flagset: {0}")]
    FlagsetParseFailed(String),
    #[error("ayuda solicitada: {0}")]
    HelpRequested(String),
    #[error("'{0}' la opción ya fue usada o la shell ya fue inicializada")]
    OptionIsSet(String),
    #[error("'{0}' los parámetros de la opción no están definidos o son inválidos")]
    OptionIsInvalid(String),
    #[error("Error de entrada/salida: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Other(#[from] BoxError),
}

pub type ShellResult<T = ()> = Result<T, ShellError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No se pudo encontrar el directorio de configuración del sistema.")]
    ConfigDirNotFound,
    #[error("Error de entrada/salida: {0}")]
    Io(#[from] std::io::Error),
    #[error("Error al parsear el archivo de configuración {path:?}: {source}")]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ShellError {
    /// Atajo para errores de texto libre dentro de un handler.
    pub fn msg(message: impl Into<String>) -> Self {
        ShellError::Message(message.into())
    }
}

/// Determina si el error (o cualquier error que envuelva) es una solicitud de ayuda.
///
/// Se recorre toda la cadena de `source()`, así que un `HelpRequested` envuelto
/// por otro error sigue siendo detectado.
pub fn is_help_requested(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        match e.downcast_ref::<ShellError>() {
            Some(ShellError::HelpRequested(_)) => return true,
            // `transparent` delega `source()` al interior, así que hay que mirar el interior directamente.
            Some(ShellError::Other(inner)) => {
                current = Some(inner.as_ref() as &(dyn StdError + 'static));
                continue;
            }
            _ => {}
        }
        current = e.source();
    }
    false
}
