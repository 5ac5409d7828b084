// src/system/io.rs

use std::io::{self, BufRead};

/// Lee una línea de `reader`. `None` indica fin de la entrada.
pub fn read_line(reader: &mut dyn BufRead) -> io::Result<Option<String>> {
    let mut buffer = String::new();
    let read = reader.read_line(&mut buffer)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(buffer))
}

/// Separa una línea de la shell en argumentos.
pub fn split_args(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}
