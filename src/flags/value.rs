// src/flags/value.rs

use std::fmt;
use std::time::Duration;

/// El valor tipado de un flag, tal y como lo devuelve `FlagValues::get`.
#[derive(Debug, Clone, PartialEq)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
    Uint(u64),
    String(String),
    StringArray(Vec<String>),
    Float(f64),
    Duration(Duration),
    /// Valores definidos por el usuario, representados por su texto.
    Custom(String),
}

/// El valor dinámico almacenado en un flag.
///
/// Implementa este trait para definir flags propios con `FlagDefiner::var`.
pub trait Value: fmt::Display + Send + Sync {
    /// Asigna el valor a partir del texto recibido en la línea de comandos.
    fn set(&mut self, value: &str) -> Result<(), String>;

    fn get(&self) -> FlagValue {
        FlagValue::Custom(self.to_string())
    }

    /// Los flags booleanos aceptan `-flag` sin valor.
    fn is_bool_flag(&self) -> bool {
        false
    }

    /// Nombre del tipo mostrado en el texto de uso.
    fn type_name(&self) -> &'static str {
        "value"
    }

    /// Indica si `text` es la representación del valor cero del tipo.
    fn is_zero(&self, text: &str) -> bool {
        text.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct BoolValue(pub bool);

impl fmt::Display for BoolValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Value for BoolValue {
    fn set(&mut self, value: &str) -> Result<(), String> {
        self.0 = parse_bool(value)?;
        Ok(())
    }

    fn get(&self) -> FlagValue {
        FlagValue::Bool(self.0)
    }

    fn is_bool_flag(&self) -> bool {
        true
    }

    fn type_name(&self) -> &'static str {
        ""
    }

    fn is_zero(&self, text: &str) -> bool {
        text == "false"
    }
}

#[derive(Debug, Clone, Default)]
pub struct IntValue(pub i64);

impl fmt::Display for IntValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Value for IntValue {
    fn set(&mut self, value: &str) -> Result<(), String> {
        self.0 = parse_int(value)?;
        Ok(())
    }

    fn get(&self) -> FlagValue {
        FlagValue::Int(self.0)
    }

    fn type_name(&self) -> &'static str {
        "int"
    }

    fn is_zero(&self, text: &str) -> bool {
        text == "0"
    }
}

#[derive(Debug, Clone, Default)]
pub struct UintValue(pub u64);

impl fmt::Display for UintValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Value for UintValue {
    fn set(&mut self, value: &str) -> Result<(), String> {
        self.0 = parse_uint(value)?;
        Ok(())
    }

    fn get(&self) -> FlagValue {
        FlagValue::Uint(self.0)
    }

    fn type_name(&self) -> &'static str {
        "uint"
    }

    fn is_zero(&self, text: &str) -> bool {
        text == "0"
    }
}

#[derive(Debug, Clone, Default)]
pub struct StringValue(pub String);

impl fmt::Display for StringValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Value for StringValue {
    fn set(&mut self, value: &str) -> Result<(), String> {
        self.0 = value.to_string();
        Ok(())
    }

    fn get(&self) -> FlagValue {
        FlagValue::String(self.0.clone())
    }

    fn type_name(&self) -> &'static str {
        "string"
    }
}

/// Lista de cadenas. Admite usar el flag varias veces y listas separadas por comas.
///
/// El primer `set` sustituye los valores por defecto; los siguientes se acumulan.
#[derive(Debug, Clone, Default)]
pub struct StringArrayValue {
    values: Vec<String>,
    explicit: bool,
}

impl StringArrayValue {
    pub fn with_defaults(defaults: &[String]) -> Self {
        Self {
            values: defaults.to_vec(),
            explicit: false,
        }
    }
}

impl fmt::Display for StringArrayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.values.join(","))
    }
}

impl Value for StringArrayValue {
    fn set(&mut self, value: &str) -> Result<(), String> {
        if !self.explicit {
            self.values.clear();
            self.explicit = true;
        }
        self.values.extend(value.split(',').map(str::to_string));
        Ok(())
    }

    fn get(&self) -> FlagValue {
        FlagValue::StringArray(self.values.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct FloatValue(pub f64);

impl fmt::Display for FloatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Value for FloatValue {
    fn set(&mut self, value: &str) -> Result<(), String> {
        self.0 = value
            .parse::<f64>()
            .map_err(|_| "parse error".to_string())?;
        Ok(())
    }

    fn get(&self) -> FlagValue {
        FlagValue::Float(self.0)
    }

    fn type_name(&self) -> &'static str {
        "float"
    }

    fn is_zero(&self, text: &str) -> bool {
        text == "0"
    }
}

#[derive(Debug, Clone, Default)]
pub struct DurationValue(pub Duration);

impl fmt::Display for DurationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_duration(self.0))
    }
}

impl Value for DurationValue {
    fn set(&mut self, value: &str) -> Result<(), String> {
        self.0 = parse_duration(value)?;
        Ok(())
    }

    fn get(&self) -> FlagValue {
        FlagValue::Duration(self.0)
    }

    fn type_name(&self) -> &'static str {
        "duration"
    }

    fn is_zero(&self, text: &str) -> bool {
        text == "0s"
    }
}

// --- PARSEO DE TEXTO ---

pub fn parse_bool(text: &str) -> Result<bool, String> {
    match text {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err("parse error".to_string()),
    }
}

/// Separa el prefijo de base (`0x`, `0o`, `0b`, o `0` octal) de los dígitos.
fn split_radix(digits: &str) -> (u32, &str) {
    let lower = digits.get(..2).map(str::to_ascii_lowercase);
    match lower.as_deref() {
        Some("0x") => (16, &digits[2..]),
        Some("0o") => (8, &digits[2..]),
        Some("0b") => (2, &digits[2..]),
        _ if digits.len() > 1 && digits.starts_with('0') => (8, &digits[1..]),
        _ => (10, digits),
    }
}

fn parse_magnitude(text: &str) -> Result<u64, String> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let (radix, digits) = split_radix(&cleaned);
    if digits.is_empty() {
        return Err("parse error".to_string());
    }
    u64::from_str_radix(digits, radix).map_err(|e| match e.kind() {
        std::num::IntErrorKind::PosOverflow => "value out of range".to_string(),
        _ => "parse error".to_string(),
    })
}

pub fn parse_int(text: &str) -> Result<i64, String> {
    let (negative, magnitude) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let value = parse_magnitude(magnitude)?;
    if negative {
        if value > i64::MAX as u64 + 1 {
            return Err("value out of range".to_string());
        }
        Ok((value as i128).wrapping_neg() as i64)
    } else {
        i64::try_from(value).map_err(|_| "value out of range".to_string())
    }
}

pub fn parse_uint(text: &str) -> Result<u64, String> {
    if text.starts_with('-') || text.starts_with('+') {
        return Err("parse error".to_string());
    }
    parse_magnitude(text)
}

/// Parsea duraciones como `300ms`, `1.5h` o `2h45m`.
/// Unidades válidas: `ns`, `us` (o `µs`), `ms`, `s`, `m`, `h`.
pub fn parse_duration(text: &str) -> Result<Duration, String> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let duration = parse_unsigned_duration(rest).map_err(|e| format!("{} {:?}", e, text))?;
    // Las duraciones negativas no existen en `std::time::Duration`.
    if negative && !duration.is_zero() {
        return Err(format!("invalid duration {:?}", text));
    }
    Ok(duration)
}

fn parse_unsigned_duration(mut rest: &str) -> Result<Duration, String> {
    let invalid = || "invalid duration".to_string();

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total_nanos: f64 = 0.0;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let number = &rest[..number_len];
        if number.is_empty() || number == "." {
            return Err(invalid());
        }
        let amount: f64 = number.parse().map_err(|_| invalid())?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit = &rest[..unit_len];
        rest = &rest[unit_len..];

        let scale: f64 = match unit {
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            "" => return Err("missing unit in duration".to_string()),
            other => return Err(format!("unknown unit {:?} in duration", other)),
        };
        total_nanos += amount * scale;
    }

    if !total_nanos.is_finite() || total_nanos > u64::MAX as f64 {
        return Err(invalid());
    }
    Ok(Duration::from_nanos(total_nanos.round() as u64))
}

/// Formatea una duración al estilo `1h30m0s`, `1.5s` o `250ms`.
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000 {
        return format!("{}ns", nanos);
    }
    if nanos < 1_000_000 {
        return format!("{}µs", with_fraction(nanos / 1_000, nanos % 1_000, 3));
    }
    if nanos < 1_000_000_000 {
        return format!("{}ms", with_fraction(nanos / 1_000_000, nanos % 1_000_000, 6));
    }

    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = with_fraction(
        (total_secs % 60) as u128,
        duration.subsec_nanos() as u128,
        9,
    );

    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

fn with_fraction(whole: u128, fraction: u128, digits: usize) -> String {
    if fraction == 0 {
        return whole.to_string();
    }
    let fraction = format!("{:0width$}", fraction, width = digits);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_accepts_the_usual_spellings() {
        for text in ["1", "t", "T", "true", "TRUE", "True"] {
            assert_eq!(parse_bool(text), Ok(true), "{}", text);
        }
        for text in ["0", "f", "F", "false", "FALSE", "False"] {
            assert_eq!(parse_bool(text), Ok(false), "{}", text);
        }
        assert!(parse_bool("yes").is_err());
    }

    #[test]
    fn integers_accept_base_prefixes() {
        assert_eq!(parse_int("42"), Ok(42));
        assert_eq!(parse_int("-42"), Ok(-42));
        assert_eq!(parse_int("0x1f"), Ok(31));
        assert_eq!(parse_int("0o17"), Ok(15));
        assert_eq!(parse_int("017"), Ok(15));
        assert_eq!(parse_int("0b101"), Ok(5));
        assert_eq!(parse_int("1_000"), Ok(1000));
        assert_eq!(parse_int("-9223372036854775808"), Ok(i64::MIN));
        assert!(parse_int("9223372036854775808").is_err());
        assert!(parse_int("abc").is_err());

        assert_eq!(parse_uint("18446744073709551615"), Ok(u64::MAX));
        assert!(parse_uint("-1").is_err());
    }

    #[test]
    fn durations_parse_compound_values() {
        assert_eq!(parse_duration("0"), Ok(Duration::ZERO));
        assert_eq!(parse_duration("300ms"), Ok(Duration::from_millis(300)));
        assert_eq!(parse_duration("1.5h"), Ok(Duration::from_secs(5400)));
        assert_eq!(
            parse_duration("2h45m"),
            Ok(Duration::from_secs(2 * 3600 + 45 * 60))
        );
        assert_eq!(parse_duration("10us"), Ok(Duration::from_micros(10)));
        assert!(parse_duration("10").is_err());
        assert!(parse_duration("10x").is_err());
        assert!(parse_duration("").is_err());
        assert!(parse_duration("-5s").is_err());
    }

    #[test]
    fn durations_format_like_the_command_line_expects() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::from_nanos(12)), "12ns");
        assert_eq!(format_duration(Duration::from_micros(1500)), "1.5ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
        assert_eq!(format_duration(Duration::from_secs(60)), "1m0s");
        assert_eq!(format_duration(Duration::from_secs(5400)), "1h30m0s");
    }

    #[test]
    fn string_array_replaces_defaults_then_accumulates() {
        let mut value = StringArrayValue::with_defaults(&["a".to_string()]);
        assert_eq!(value.to_string(), "a");

        value.set("b,c").unwrap();
        value.set("d").unwrap();
        assert_eq!(
            value.get(),
            FlagValue::StringArray(vec!["b".into(), "c".into(), "d".into()])
        );
        assert_eq!(value.to_string(), "b,c,d");
    }
}
