//! Typed views over the string values stored by an [`Argument`](crate::Argument)
//!
//! Every value is kept as the string it was given on the command line (or declared as a
//! default). Conversion happens on each read, never ahead of time.

/// The types a stored value can be read as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    Int,
    Double,
    Bool,
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::String => write!(f, "string"),
            ValueType::Int => write!(f, "int"),
            ValueType::Double => write!(f, "double"),
            ValueType::Bool => write!(f, "bool"),
        }
    }
}

/// A stored value converted to one of the [`ValueType`]s
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i32),
    Double(f64),
    Bool(bool),
}

impl Value {
    /// Converts `raw` to `ty`.
    ///
    /// Numbers are read from the longest numeric prefix after any leading whitespace, so
    /// `8080ms` reads as the int `8080` and `3.7` as the int `3`. A value without such a prefix,
    /// or one out of range, produces `None`. Booleans never fail: anything that isn't one of the
    /// recognized truthy spellings reads as `false`.
    pub fn convert(raw: &str, ty: ValueType) -> Option<Value> {
        match ty {
            ValueType::String => Some(Value::String(raw.to_string())),
            ValueType::Int => parse_int_prefix(raw).map(Value::Int),
            ValueType::Double => parse_double_prefix(raw).map(Value::Double),
            ValueType::Bool => Some(Value::Bool(is_truthy(raw))),
        }
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Value::String(_) => ValueType::String,
            Value::Int(_) => ValueType::Int,
            Value::Double(_) => ValueType::Double,
            Value::Bool(_) => ValueType::Bool,
        }
    }
}

// Length of the run of ASCII digits at the start of `s`
fn digits(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}

// Length of an optional leading `+` or `-`
fn sign(s: &str) -> usize {
    usize::from(s.starts_with(['+', '-']))
}

fn parse_int_prefix(raw: &str) -> Option<i32> {
    let s = raw.trim_start();
    let sign_len = sign(s);
    let digit_len = digits(&s[sign_len..]);
    if digit_len == 0 {
        return None;
    }
    s[..sign_len + digit_len].parse().ok()
}

fn parse_double_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let sign_len = sign(s);
    let unsigned = &s[sign_len..];

    // inf, infinity and nan are accepted in any case
    let lower = unsigned.get(..3).unwrap_or(unsigned).to_ascii_lowercase();
    let special = if lower == "inf" {
        Some(f64::INFINITY)
    } else if lower == "nan" {
        Some(f64::NAN)
    } else {
        None
    };
    if let Some(special) = special {
        return Some(if s.starts_with('-') { -special } else { special });
    }

    // mantissa: digits, optionally followed by a fraction; at least one digit overall
    let int_len = digits(unsigned);
    let mut len = int_len;
    let mut mantissa_digits = int_len;
    if unsigned[len..].starts_with('.') {
        let frac_len = digits(&unsigned[len + 1..]);
        mantissa_digits += frac_len;
        len += 1 + frac_len;
    }
    if mantissa_digits == 0 {
        return None;
    }

    // exponent only counts when digits follow it
    let rest = &unsigned[len..];
    if rest.starts_with(['e', 'E']) {
        let exp_sign = sign(&rest[1..]);
        let exp_digits = digits(&rest[1 + exp_sign..]);
        if exp_digits > 0 {
            len += 1 + exp_sign + exp_digits;
        }
    }

    let value: f64 = s[..sign_len + len].parse().ok()?;
    // out of range, like a literal too large for a double
    value.is_finite().then_some(value)
}

/// Case-insensitive match against `true`, `1`, `yes` and `on`
pub fn is_truthy(raw: &str) -> bool {
    ["true", "1", "yes", "on"]
        .iter()
        .any(|t| raw.eq_ignore_ascii_case(t))
}

/// Rust types that can be read out of a [`Value`]
pub trait FromValue: Sized {
    const TYPE: ValueType;

    fn from_value(value: Value) -> Option<Self>;
}

impl FromValue for String {
    const TYPE: ValueType = ValueType::String;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl FromValue for i32 {
    const TYPE: ValueType = ValueType::Int;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(i),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    const TYPE: ValueType = ValueType::Double;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Double(d) => Some(d),
            _ => None,
        }
    }
}

impl FromValue for bool {
    const TYPE: ValueType = ValueType::Bool;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }
}
