//! A parser for GNU-style command lines
//!
//! An application declares flags, options and positional arguments on an [`ArgParser`], parses
//! the raw argument list once, and then reads values back by name, converted to the type it
//! asks for.
//!
//! ```
//! use argparser::{ArgParser, Outcome};
//!
//! let mut app = ArgParser::new("serve", "Serves files");
//! app.add_flag("v", "verbose", "Log every request").unwrap();
//! app.add_option("p", "port", "Port to listen on").unwrap().default_value(8080);
//! app.add_positional("root", "Directory to serve", true).unwrap();
//!
//! let outcome = app.parse_tokens(["-v", "public"]).unwrap();
//! assert_eq!(outcome, Outcome::Parsed);
//! assert!(app.get_bool("verbose"));
//! assert_eq!(app.get_int("port").unwrap(), 8080);
//! assert_eq!(app.get_string("root"), "public");
//! ```
//!
//! # Syntax
//!
//! Form | Meaning
//! -|-
//! `--name`, `-n` | Sets a flag, or starts an option whose value is the next argument
//! `--name=value` | Sets an option. Everything after the first `=` is the value
//! `-nvalue` | Sets option `n` to `value`. Short options never cluster: `-abc` is option `a` with value `bc`
//! `-h`, `--help` | Stops parsing and returns [`Outcome::Help`]
//! anything else | A positional value
//!
//! Positional values are handed to the declared positional arguments in declaration order,
//! regardless of where options appear between them.
//!
//! # Values
//!
//! Every value is stored as the string it was given. [`Argument::get`] converts it on each read:
//! numbers that don't parse read as `None`, and booleans are `true` only for `true`, `1`, `yes`
//! or `on` (ignoring case). A flag reads as whether it was set.
//!
//! # Threading
//!
//! A parser is built and parsed by one owner. It holds no shared state, so independent parsers
//! may live on different threads.

mod argument;
mod cmdline;
mod error;
mod parser;
mod registry;
mod value;

pub use argument::{Argument, ArgumentKind, Validator};
pub use cmdline::Token;
pub use error::{Error, Result};
pub use parser::help::{usage, write_help};
pub use parser::{ArgParser, Outcome};
pub use registry::Registry;
pub use value::{is_truthy, FromValue, Value, ValueType};
