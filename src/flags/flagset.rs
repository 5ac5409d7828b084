// src/flags/flagset.rs

use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::value::{
    BoolValue, DurationValue, FloatValue, IntValue, StringArrayValue, StringValue, UintValue,
};
use super::{FlagDefiner, FlagSet, FlagValue, FlagValues, Value};
use crate::constants::HELP_FLAG_NAMES;
use crate::errors::{ShellError, ShellResult};

/// Un flag definido. El valor se comparte (por referencia) con los sub flag sets
/// creados después de su definición.
#[derive(Clone)]
pub struct Flag {
    pub name: String,
    pub usage: String,
    pub default_value: String,
    value: Arc<Mutex<Box<dyn Value>>>,
}

impl Flag {
    fn new(value: Box<dyn Value>, name: &str, usage: &str) -> Self {
        Self {
            name: name.to_string(),
            usage: usage.to_string(),
            default_value: value.to_string(),
            value: Arc::new(Mutex::new(value)),
        }
    }

    pub fn value(&self) -> FlagValue {
        self.value.lock().get()
    }

    fn set(&self, text: &str) -> Result<(), String> {
        self.value.lock().set(text)
    }

    fn is_bool_flag(&self) -> bool {
        self.value.lock().is_bool_flag()
    }

    /// Devuelve el nombre del tipo y el texto de uso sin comillas invertidas.
    /// Un nombre entre `comillas invertidas` en el uso sustituye al nombre del tipo.
    fn unquote_usage(&self) -> (String, String) {
        let usage = &self.usage;
        if let Some(start) = usage.find('`') {
            if let Some(len) = usage[start + 1..].find('`') {
                let name = &usage[start + 1..start + 1 + len];
                let unquoted = format!(
                    "{}{}{}",
                    &usage[..start],
                    name,
                    &usage[start + 2 + len..]
                );
                return (name.to_string(), unquoted);
            }
        }
        (self.value.lock().type_name().to_string(), usage.clone())
    }
}

/// Implementación por defecto de `FlagSet`, con la sintaxis clásica de un solo guion:
/// `-flag`, `-flag=valor` y `-flag valor` (también se acepta `--flag`).
pub struct DefaultFlagSet {
    name: String,
    flags: RwLock<BTreeMap<String, Flag>>,
    parsed: AtomicBool,
}

impl DefaultFlagSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: RwLock::new(BTreeMap::new()),
            parsed: AtomicBool::new(false),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Flag> {
        self.flags.read().get(name).cloned()
    }

    fn insert(&self, value: Box<dyn Value>, name: &str, usage: &str) {
        let flag = Flag::new(value, name, usage);
        if self.flags.write().insert(name.to_string(), flag).is_some() {
            log::debug!("Flag '-{}' redefinido en el flag set '{}'.", name, self.name);
        }
    }

    /// Procesa un único argumento. Devuelve `Ok(false)` cuando ya no quedan flags.
    fn parse_one(&self, args: &mut Vec<String>) -> ShellResult<bool> {
        let Some(token) = args.first().cloned() else {
            return Ok(false);
        };
        if token.len() < 2 || !token.starts_with('-') {
            return Ok(false);
        }

        let mut minuses = 1;
        if token.as_bytes()[1] == b'-' {
            minuses += 1;
            if token.len() == 2 {
                // "--" termina los flags
                args.remove(0);
                return Ok(false);
            }
        }

        let body = &token[minuses..];
        if body.is_empty() || body.starts_with('-') || body.starts_with('=') {
            return Err(ShellError::FlagsetParseFailed(format!(
                "bad flag syntax: {}",
                token
            )));
        }
        args.remove(0);

        // el primer carácter ya no puede ser '='
        let (name, inline_value) = match body.char_indices().skip(1).find(|&(_, c)| c == '=') {
            Some((pos, _)) => (&body[..pos], Some(body[pos + 1..].to_string())),
            None => (body, None),
        };

        let Some(flag) = self.lookup(name) else {
            if HELP_FLAG_NAMES.contains(&name) {
                return Err(ShellError::HelpRequested("flags".to_string()));
            }
            return Err(ShellError::FlagsetParseFailed(format!(
                "flag provided but not defined: -{}",
                name
            )));
        };

        if flag.is_bool_flag() {
            match inline_value {
                Some(value) => flag.set(&value).map_err(|e| {
                    ShellError::FlagsetParseFailed(format!(
                        "invalid boolean value {:?} for -{}: {}",
                        value, name, e
                    ))
                })?,
                None => flag.set("true").map_err(|e| {
                    ShellError::FlagsetParseFailed(format!(
                        "invalid boolean flag {}: {}",
                        name, e
                    ))
                })?,
            }
            return Ok(true);
        }

        let value = match inline_value {
            Some(value) => value,
            None if !args.is_empty() => args.remove(0),
            None => {
                return Err(ShellError::FlagsetParseFailed(format!(
                    "flag needs an argument: -{}",
                    name
                )));
            }
        };
        flag.set(&value).map_err(|e| {
            ShellError::FlagsetParseFailed(format!(
                "invalid value {:?} for flag -{}: {}",
                value, name, e
            ))
        })?;
        Ok(true)
    }
}

impl Default for DefaultFlagSet {
    fn default() -> Self {
        Self::new("")
    }
}

impl FlagDefiner for DefaultFlagSet {
    fn bool(&self, name: &str, default_value: bool, usage: &str) {
        self.insert(Box::new(BoolValue(default_value)), name, usage);
    }

    fn int(&self, name: &str, default_value: i64, usage: &str) {
        self.insert(Box::new(IntValue(default_value)), name, usage);
    }

    fn uint(&self, name: &str, default_value: u64, usage: &str) {
        self.insert(Box::new(UintValue(default_value)), name, usage);
    }

    fn string(&self, name: &str, default_value: &str, usage: &str) {
        self.insert(
            Box::new(StringValue(default_value.to_string())),
            name,
            usage,
        );
    }

    fn string_array(&self, name: &str, default_value: &[String], usage: &str) {
        self.insert(
            Box::new(StringArrayValue::with_defaults(default_value)),
            name,
            usage,
        );
    }

    fn float(&self, name: &str, default_value: f64, usage: &str) {
        self.insert(Box::new(FloatValue(default_value)), name, usage);
    }

    fn duration(&self, name: &str, default_value: Duration, usage: &str) {
        self.insert(Box::new(DurationValue(default_value)), name, usage);
    }

    fn var(&self, value: Box<dyn Value>, name: &str, usage: &str) {
        self.insert(value, name, usage);
    }
}

impl FlagValues for DefaultFlagSet {
    fn get(&self, name: &str) -> Option<FlagValue> {
        self.lookup(name).map(|flag| flag.value())
    }

    fn set(&self, name: &str, value: &str) -> ShellResult {
        let flag = self
            .lookup(name)
            .ok_or_else(|| ShellError::FlagsetParseFailed(format!("no such flag -{}", name)))?;
        flag.set(value).map_err(|e| {
            ShellError::FlagsetParseFailed(format!(
                "invalid value {:?} for flag -{}: {}",
                value, name, e
            ))
        })
    }
}

impl FlagSet for DefaultFlagSet {
    fn name(&self) -> &str {
        &self.name
    }

    fn as_definer(&self) -> &dyn FlagDefiner {
        self
    }

    fn sub_flag_set(&self, name: &str) -> Arc<dyn FlagSet> {
        // Copia del mapa: los `Flag` comparten el valor, pero las nuevas definiciones no se propagan.
        let inherited = self.flags.read().clone();
        Arc::new(DefaultFlagSet {
            name: name.to_string(),
            flags: RwLock::new(inherited),
            parsed: AtomicBool::new(false),
        })
    }

    fn parse(&self, args: &[String]) -> (Vec<String>, ShellResult) {
        self.parsed.store(true, Ordering::SeqCst);
        let mut remaining = args.to_vec();
        loop {
            match self.parse_one(&mut remaining) {
                Ok(true) => continue,
                Ok(false) => return (remaining, Ok(())),
                Err(err) => return (remaining, Err(err)),
            }
        }
    }

    fn parsed(&self) -> bool {
        self.parsed.load(Ordering::SeqCst)
    }

    fn default_usage(&self) -> String {
        let mut out = String::new();
        for flag in self.flags.read().values() {
            let mut line = format!("  -{}", flag.name);
            let (type_name, usage) = flag.unquote_usage();
            if !type_name.is_empty() {
                line.push(' ');
                line.push_str(&type_name);
            }
            if line.len() <= 4 {
                line.push('\t');
            } else {
                line.push_str("\n    \t");
            }
            line.push_str(&usage.replace('\n', "\n    \t"));

            let is_zero = flag.value.lock().is_zero(&flag.default_value);
            if !is_zero {
                if matches!(flag.value(), FlagValue::String(_)) {
                    let _ = write!(line, " (default {:?})", flag.default_value);
                } else {
                    let _ = write!(line, " (default {})", flag.default_value);
                }
            }
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}
