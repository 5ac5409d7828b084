// src/config.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{APP_DIR, CONFIG_FILENAME};
use crate::errors::ConfigError;
use crate::models::ShellConfig;

/// Devuelve la ruta al directorio de configuración de senda.
pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    let config_path = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join(APP_DIR);
    log::debug!("Directorio de config: {:?}", config_path);
    Ok(config_path)
}

/// Devuelve la ruta al archivo senda.toml.
pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILENAME))
}

/// Carga la configuración de la shell.
///
/// Con `path` el archivo debe existir. Sin él se usa la ruta por defecto, y si el archivo
/// no existe se devuelven los valores por defecto.
pub fn load_shell_config(path: Option<&Path>) -> Result<ShellConfig, ConfigError> {
    match path {
        Some(path) => read_shell_config(path),
        None => {
            let path = get_config_path()?;
            if !path.exists() {
                log::info!("No hay configuración en {:?}, usando valores por defecto.", path);
                return Ok(ShellConfig::default());
            }
            read_shell_config(&path)
        }
    }
}

fn read_shell_config(path: &Path) -> Result<ShellConfig, ConfigError> {
    log::info!("Leyendo configuración de {:?}", path);
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })
}
