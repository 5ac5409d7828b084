// src/core/writer.rs

use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// Salida que recibe un handler: escritura normal por `io::Write` y un canal de errores aparte.
pub trait ResponseWriter: Write {
    fn write_error(&mut self, buf: &[u8]) -> io::Result<usize>;

    fn error_writer(&mut self) -> &mut dyn Write;

    /// Vacía ambas salidas.
    fn close(&mut self) -> io::Result<()>;
}

/// `ResponseWriter` sencillo sobre un par de escritores prestados.
pub struct WrapperWriter<'a> {
    output: &'a mut dyn Write,
    error: &'a mut dyn Write,
}

impl<'a> WrapperWriter<'a> {
    pub fn new(output: &'a mut dyn Write, error: &'a mut dyn Write) -> Self {
        Self { output, error }
    }
}

impl Write for WrapperWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }
}

impl ResponseWriter for WrapperWriter<'_> {
    fn write_error(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.error.write(buf)
    }

    fn error_writer(&mut self) -> &mut dyn Write {
        &mut *self.error
    }

    fn close(&mut self) -> io::Result<()> {
        self.error.flush()?;
        self.output.flush()
    }
}

/// Búfer en memoria que se puede clonar y leer después de entregárselo a la shell.
#[derive(Clone, Default, Debug)]
pub struct BufferWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl BufferWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
