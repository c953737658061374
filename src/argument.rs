use crate::error::{Error, Result};
use crate::value::{FromValue, Value, ValueType};
use log::{trace, warn};

/// What an [`Argument`] looks like on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentKind {
    /// A switch without a value (e.g. `-v` or `--verbose`)
    Flag,
    /// A named argument that takes exactly one value (e.g. `-o out.txt` or `--output=out.txt`)
    Option,
    /// An argument identified by its position among the non-option tokens
    Positional,
}

impl std::fmt::Display for ArgumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArgumentKind::Flag => write!(f, "flag"),
            ArgumentKind::Option => write!(f, "option"),
            ArgumentKind::Positional => write!(f, "positional argument"),
        }
    }
}

/// Predicate run against every value before it is stored
pub type Validator = Box<dyn Fn(&str) -> bool>;

/// The declaration of one flag, option or positional argument, together with the value it
/// received during parsing
pub struct Argument {
    kind: ArgumentKind,
    short: Option<String>,
    long: Option<String>,
    name: Option<String>,
    description: String,
    default: Option<String>,
    current: String,
    required: bool,
    set: bool,
    validator: Option<Validator>,
}

impl std::fmt::Debug for Argument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argument")
            .field("kind", &self.kind)
            .field("short", &self.short)
            .field("long", &self.long)
            .field("name", &self.name)
            .field("default", &self.default)
            .field("current", &self.current)
            .field("required", &self.required)
            .field("set", &self.set)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

impl Argument {
    /// Declares a flag. At least one of `short` and `long` must be non-empty.
    pub fn flag(short: &str, long: &str, description: &str) -> Result<Self> {
        Self::named(ArgumentKind::Flag, short, long, description)
    }

    /// Declares an option. At least one of `short` and `long` must be non-empty.
    pub fn option(short: &str, long: &str, description: &str) -> Result<Self> {
        Self::named(ArgumentKind::Option, short, long, description)
    }

    /// Declares a positional argument
    pub fn positional(name: &str, description: &str, required: bool) -> Result<Self> {
        if name.is_empty() || name.starts_with('-') {
            return Err(Error::InvalidDeclaration(format!(
                "positional name '{name}' must be non-empty and not start with '-'"
            )));
        }

        let mut arg = Self::blank(ArgumentKind::Positional, description);
        arg.name = Some(name.to_string());
        arg.required = required;
        Ok(arg)
    }

    fn named(kind: ArgumentKind, short: &str, long: &str, description: &str) -> Result<Self> {
        if short.is_empty() && long.is_empty() {
            return Err(Error::InvalidDeclaration(format!(
                "a {kind} needs a short or a long name"
            )));
        }

        if !short.is_empty() && (short.chars().count() != 1 || short == "-") {
            return Err(Error::InvalidDeclaration(format!(
                "short name '{short}' must be a single character other than '-'"
            )));
        }

        if long.starts_with('-') || long.contains('=') {
            return Err(Error::InvalidDeclaration(format!(
                "long name '{long}' may not start with '-' or contain '='"
            )));
        }

        let mut arg = Self::blank(kind, description);
        arg.short = non_empty(short);
        arg.long = non_empty(long);
        Ok(arg)
    }

    fn blank(kind: ArgumentKind, description: &str) -> Self {
        Argument {
            kind,
            short: None,
            long: None,
            name: None,
            description: description.to_string(),
            default: None,
            current: String::new(),
            required: false,
            set: false,
            validator: None,
        }
    }

    /// Marks this argument as required (or not)
    pub fn required(&mut self, required: bool) -> &mut Self {
        self.required = required;
        self
    }

    /// Sets the value reported when the argument is absent from the command line. Numbers are
    /// stored in their string form. An empty string clears the default.
    ///
    /// Flags have no default; calling this on a flag has no effect.
    pub fn default_value(&mut self, value: impl ToString) -> &mut Self {
        if self.kind == ArgumentKind::Flag {
            warn!("ignoring default value for flag {}", self.display_name());
            return self;
        }
        self.default = non_empty(&value.to_string());
        self
    }

    /// Replaces the description shown in the help text
    pub fn help(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    /// Attaches a predicate every value must satisfy before it is stored
    pub fn validator(&mut self, validator: impl Fn(&str) -> bool + 'static) -> &mut Self {
        self.validator = Some(Box::new(validator));
        self
    }

    pub fn kind(&self) -> ArgumentKind {
        self.kind
    }

    pub fn short_name(&self) -> Option<&str> {
        self.short.as_deref()
    }

    pub fn long_name(&self) -> Option<&str> {
        self.long.as_deref()
    }

    /// Returns the primary name: the positional name, else the long name, else the short name
    pub fn name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.long.as_deref())
            .or(self.short.as_deref())
            .unwrap_or_default()
    }

    /// Returns the name as it is written on the command line (`--long`, `-s` or `name`)
    pub fn display_name(&self) -> String {
        match (&self.name, &self.long, &self.short) {
            (Some(name), _, _) => name.clone(),
            (None, Some(long), _) => format!("--{long}"),
            (None, None, Some(short)) => format!("-{short}"),
            (None, None, None) => String::new(),
        }
    }

    /// Every name this argument can be looked up by
    pub(crate) fn keys(&self) -> impl Iterator<Item = &str> {
        [&self.short, &self.long, &self.name]
            .into_iter()
            .filter_map(|k| k.as_deref())
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_set(&self) -> bool {
        self.set
    }

    /// Stores `value` as this argument's value
    pub fn set_value(&mut self, value: &str) -> Result<()> {
        if self.kind == ArgumentKind::Flag {
            return Err(Error::Validation(format!(
                "Cannot set value for flag argument {}",
                self.display_name()
            )));
        }

        if !self.validate(value) {
            return Err(Error::Validation(format!(
                "Invalid value for argument {}: {value}",
                self.display_name()
            )));
        }

        trace!("{} = {value:?}", self.display_name());
        self.current = value.to_string();
        self.set = true;
        Ok(())
    }

    /// Turns this flag on or off
    pub fn set_flag(&mut self, value: bool) -> Result<()> {
        if self.kind != ArgumentKind::Flag {
            return Err(Error::Validation(format!(
                "Cannot set flag for non-flag argument {}",
                self.display_name()
            )));
        }

        trace!("{} = {value}", self.display_name());
        self.set = value;
        Ok(())
    }

    /// Forgets anything set by a previous parse
    pub(crate) fn reset(&mut self) {
        self.current.clear();
        self.set = false;
    }

    /// Runs the attached validator against `value`; true when there is none
    pub fn validate(&self, value: &str) -> bool {
        self.validator.as_ref().map_or(true, |v| v(value))
    }

    /// The string a typed read starts from: the parsed value, or the default when unset
    pub fn raw_value(&self) -> Option<&str> {
        match self.kind {
            ArgumentKind::Flag => None,
            _ if self.set => Some(self.current.as_str()),
            _ => self.default.as_deref(),
        }
    }

    /// Reads this argument's value as `ty`.
    ///
    /// A flag reads as a [`Value::Bool`] of whether it was set and as nothing otherwise.
    pub fn value(&self, ty: ValueType) -> Option<Value> {
        if self.kind == ArgumentKind::Flag {
            return match ty {
                ValueType::Bool => Some(Value::Bool(self.set)),
                _ => None,
            };
        }

        Value::convert(self.raw_value()?, ty)
    }

    pub fn get<T: FromValue>(&self) -> Option<T> {
        self.value(T::TYPE).and_then(T::from_value)
    }

    /// Returns the value as a string, or `""` when there is none
    pub fn get_string(&self) -> String {
        self.get::<String>().unwrap_or_default()
    }

    /// Returns the value as an int. Unlike [`get`](Self::get), a missing or unparsable value is
    /// an error.
    pub fn get_int(&self) -> Result<i32> {
        self.get::<i32>().ok_or_else(|| {
            Error::Validation(format!(
                "Cannot convert value of {} to {}",
                self.display_name(),
                ValueType::Int
            ))
        })
    }

    /// Returns the value as a double. A missing or unparsable value is an error.
    pub fn get_double(&self) -> Result<f64> {
        self.get::<f64>().ok_or_else(|| {
            Error::Validation(format!(
                "Cannot convert value of {} to {}",
                self.display_name(),
                ValueType::Double
            ))
        })
    }

    /// Returns the value as a bool, or `false` when there is none
    pub fn get_bool(&self) -> bool {
        self.get::<bool>().unwrap_or_default()
    }
}
