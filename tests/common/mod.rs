//! Utilidades compartidas por los tests de integración.

use std::io::Cursor;

use senda::{BufferWriter, Shell, ShellOption};

/// Una shell que lee de `input` y escribe en búferes que el test puede inspeccionar.
pub fn shell_with(input: &str) -> (Shell, BufferWriter, BufferWriter) {
    let (output, error) = (BufferWriter::new(), BufferWriter::new());
    let mut shell = Shell::new();
    shell
        .options([
            ShellOption::input(Cursor::new(input.to_string())),
            ShellOption::output_writer(output.clone()),
            ShellOption::error_writer(error.clone()),
        ])
        .unwrap();
    (shell, output, error)
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
