// src/system/mod.rs

pub mod io;
pub mod options;
pub mod shell;

pub use options::ShellOption;
pub use shell::Shell;
