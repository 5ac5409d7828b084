// src/models.rs

use serde::{Deserialize, Serialize};

use crate::system::ShellOption;

// --- MODELO DE `senda.toml` ---

/// Ajustes de la shell leídos del archivo de configuración.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ShellConfig {
    pub prompt: Option<String>,
    pub exit_on_error: Option<bool>,
}

impl ShellConfig {
    /// Convierte los ajustes presentes en opciones de la shell. Un prompt vacío se ignora.
    pub fn options(&self) -> Vec<ShellOption> {
        let mut options = Vec::new();
        if let Some(prompt) = self.prompt.as_deref().filter(|p| !p.is_empty()) {
            options.push(ShellOption::shell_prompt(prompt));
        }
        if let Some(exit_on_error) = self.exit_on_error {
            options.push(ShellOption::exit_on_error(exit_on_error));
        }
        options
    }
}
