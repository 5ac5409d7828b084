// src/constants.rs

/// El nombre del directorio de configuración de senda (en ~/.config/).
pub const APP_DIR: &str = "senda";

/// El nombre del archivo de configuración de la shell (dentro de ~/.config/senda/).
pub const CONFIG_FILENAME: &str = "senda.toml";

/// Prompt por defecto de la shell interactiva.
pub const DEFAULT_SHELL_PROMPT: &str = "shell>";

/// Flags que solicitan la ayuda cuando no han sido declarados explícitamente.
pub const HELP_FLAG_NAMES: [&str; 2] = ["h", "help"];
