// src/cli.rs

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Senda: demostración de un enrutador de comandos.", long_about = None)]
// `-h` y `-help` los gestiona la propia shell.
#[command(disable_help_flag = true)]
pub struct Cli {
    /// Abre una sesión interactiva en lugar de ejecutar un único comando.
    #[arg(short, long)]
    pub interactive: bool,

    /// Archivo de configuración (por defecto ~/.config/senda/senda.toml).
    #[arg(long, value_name = "RUTA")]
    pub config: Option<PathBuf>,

    /// Comando y argumentos que se pasan a la shell.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
