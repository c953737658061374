use crate::argument::{Argument, ArgumentKind};
use crate::cmdline::Token;
use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::value::FromValue;
use log::{debug, trace};
use std::io::stdout;

pub mod help;

/// What a successful parse produced
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every token was bound and all required arguments are present
    Parsed,
    /// `-h` or `--help` was seen. Parsing stopped there and required arguments were not checked.
    Help,
}

/// A blueprint for what a valid command line looks like, and the values bound by the last parse
#[derive(Debug, Default)]
pub struct ArgParser {
    program_name: String,
    description: String,
    version: String,

    registry: Registry,
    positional_values: Vec<String>,
}

impl ArgParser {
    /// Creates a new parser. An empty `program_name` is filled in from the first item given to
    /// [`parse_from`](Self::parse_from).
    pub fn new(program_name: &str, description: &str) -> Self {
        Self {
            program_name: program_name.to_string(),
            description: description.to_string(),
            ..Self::default()
        }
    }

    pub fn set_program_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.program_name = name.into();
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    /// Sets the version printed at the bottom of the help text
    pub fn set_version(&mut self, version: impl Into<String>) -> &mut Self {
        self.version = version.into();
        self
    }

    pub fn program_name(&self) -> &str {
        &self.program_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Defines a flag (e.g. `-v`/`--verbose`)
    pub fn add_flag(&mut self, short: &str, long: &str, description: &str) -> Result<&mut Argument> {
        self.registry.add_flag(short, long, description)
    }

    /// Defines an option taking one value (e.g. `-o out`/`--output=out`)
    pub fn add_option(
        &mut self,
        short: &str,
        long: &str,
        description: &str,
    ) -> Result<&mut Argument> {
        self.registry.add_option(short, long, description)
    }

    /// Defines a positional argument
    pub fn add_positional(
        &mut self,
        name: &str,
        description: &str,
        required: bool,
    ) -> Result<&mut Argument> {
        self.registry.add_positional(name, description, required)
    }

    /// Returns the argument with the given short, long or positional name
    pub fn argument(&self, name: &str) -> Option<&Argument> {
        self.registry.find(name)
    }

    /// Returns all arguments in declaration order
    pub fn arguments(&self) -> impl Iterator<Item = &Argument> {
        self.registry.iter()
    }

    /// Parses `items` as command line arguments. The input is expected to be in the same format
    /// that [args()](std::env::args) returns (i.e. the name of the executable is first)
    pub fn parse_from<I, T>(&mut self, items: I) -> Result<Outcome>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut iter = items.into_iter().map(Into::into);
        let program = iter.next().unwrap_or_default();
        if self.program_name.is_empty() {
            self.program_name = program;
        }

        self.parse_tokens(iter)
    }

    /// Parses the arguments of the current process
    pub fn parse_env(&mut self) -> Result<Outcome> {
        self.parse_from(std::env::args())
    }

    /// Parses `tokens`, which must not include the program name
    pub fn parse_tokens<I, T>(&mut self, tokens: I) -> Result<Outcome>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let tokens = tokens.into_iter().map(Into::into).collect::<Vec<String>>();

        self.registry.reset();
        self.positional_values.clear();

        let mut rest = tokens.iter();
        while let Some(arg) = rest.next() {
            match Token::classify(arg) {
                Token::Help => {
                    debug!("help requested, skipping the remaining arguments");
                    return Ok(Outcome::Help);
                }
                Token::Long { name, value } => self.dispatch(arg, name, value, &mut rest)?,
                Token::Short { name, attached } => {
                    self.dispatch(arg, name, attached, &mut rest)?
                }
                Token::Positional(value) => {
                    trace!("positional value {value:?}");
                    self.positional_values.push(value.to_string());
                }
            }
        }

        self.bind_positionals()?;
        self.registry.validate_required()?;
        Ok(Outcome::Parsed)
    }

    /// Parses the process arguments. Prints the help and exits if the user requested it; prints
    /// the error and exits if the command line is invalid.
    pub fn parse_env_or_exit(&mut self) {
        let code = match self.parse_env() {
            Ok(Outcome::Parsed) => return,
            Ok(Outcome::Help) => match self.print_help() {
                Ok(_) => 0,
                Err(e) => {
                    eprintln!("could not write to stdout\n{e}");
                    1
                }
            },
            Err(e) => {
                eprintln!("{e}\n\n{}", help::usage(self));
                2
            }
        };
        std::process::exit(code);
    }

    // Routes one `--name[=value]` or `-n[value]` token to the argument it names. `inline` is the
    // value carried by the token itself, if any.
    fn dispatch<'t>(
        &mut self,
        arg: &str,
        name: &str,
        inline: Option<&str>,
        rest: &mut impl Iterator<Item = &'t String>,
    ) -> Result<()> {
        // Positional names share the lookup, so `--input x` sets positional `input` like an option.
        let argument = self
            .registry
            .find_mut(name)
            .ok_or_else(|| Error::UnknownArgument(arg.to_string()))?;

        if argument.kind() == ArgumentKind::Flag {
            let is_long = arg.starts_with("--");
            match inline {
                Some(_) if is_long => {
                    return Err(Error::Parse(format!(
                        "Flag argument cannot have a value: {arg}"
                    )));
                }
                Some(extra) => debug!("ignoring {extra:?} after flag {arg}"),
                None => {}
            }
            return argument.set_flag(true);
        }

        let value = match inline {
            Some(value) => value,
            None => {
                let value = rest
                    .next()
                    .ok_or_else(|| Error::Parse(format!("Missing value for option: {arg}")))?;
                if Token::classify(value).looks_like_option() {
                    debug!("option {arg} takes {value:?} as its value");
                }
                value.as_str()
            }
        };

        argument.set_value(value)
    }

    // Positionals take the collected values in declaration order. Surplus values stay available
    // through `positional_arguments`.
    fn bind_positionals(&mut self) -> Result<()> {
        let values = &self.positional_values;
        let mut bound = 0;
        for (argument, value) in self.registry.positionals_mut().zip(values) {
            argument.set_value(value)?;
            bound += 1;
        }

        if bound < values.len() {
            debug!("{} positional values left unbound", values.len() - bound);
        }
        Ok(())
    }

    /// Reads the value of `name` as `T`. Returns `None` when the name is unknown, the argument has
    /// no value, or the value doesn't parse as `T`.
    pub fn get<T: FromValue>(&self, name: &str) -> Option<T> {
        self.argument(name)?.get()
    }

    /// Returns the value of `name` as a string, or `""`
    pub fn get_string(&self, name: &str) -> String {
        self.argument(name)
            .map(Argument::get_string)
            .unwrap_or_default()
    }

    pub fn get_int(&self, name: &str) -> Result<i32> {
        self.require(name)?.get_int()
    }

    pub fn get_double(&self, name: &str) -> Result<f64> {
        self.require(name)?.get_double()
    }

    /// Returns the value of `name` as a bool, or `false` when the name is unknown
    pub fn get_bool(&self, name: &str) -> bool {
        self.argument(name).is_some_and(Argument::get_bool)
    }

    /// Returns true if `name` was given on the command line
    pub fn is_set(&self, name: &str) -> bool {
        self.argument(name).is_some_and(Argument::is_set)
    }

    /// Every non-option token of the last parse, in order, including those that were not bound
    /// to a declared positional
    pub fn positional_arguments(&self) -> &[String] {
        &self.positional_values
    }

    /// Renders the help text
    pub fn help(&self) -> String {
        let mut buf = vec![];
        // io::Write for Vec<u8> never returns an error
        help::write_help(&mut buf, self).expect("writing to a Vec cannot fail");
        String::from_utf8_lossy(&buf).into_owned()
    }

    pub fn print_help(&self) -> std::io::Result<()> {
        help::write_help(stdout().lock(), self)
    }

    fn require(&self, name: &str) -> Result<&Argument> {
        self.argument(name)
            .ok_or_else(|| Error::ArgumentNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> ArgParser {
        let mut app = ArgParser::new("app", "");
        app.add_flag("v", "verbose", "").unwrap();
        app.add_option("o", "output", "").unwrap();
        app.add_option("p", "port", "").unwrap().default_value(8080);
        app.add_positional("input", "", false).unwrap();
        app.add_positional("target", "", false).unwrap();
        app
    }

    #[test]
    fn defaults_apply_when_absent() {
        let mut app = app();
        assert_eq!(app.parse_tokens(["a.txt"]).unwrap(), Outcome::Parsed);
        assert_eq!(app.get::<i32>("port"), Some(8080));
        assert_eq!(app.get::<f64>("p"), Some(8080.0));
        assert_eq!(app.get_string("port"), "8080");
        assert!(!app.is_set("port"));
    }

    #[test]
    fn unmentioned_flags_are_false() {
        let mut app = app();
        let _ = app.parse_tokens(Vec::<String>::new()).unwrap();
        assert!(!app.is_set("verbose"));
        assert_eq!(app.get::<bool>("verbose"), Some(false));
        assert!(!app.get_bool("v"));
    }

    #[test]
    fn long_equals_and_space_forms_are_equivalent() {
        let mut app = app();
        let _ = app.parse_tokens(["--output=result.txt"]).unwrap();
        let joined = app.get_string("output");

        let _ = app.parse_tokens(["--output", "result.txt"]).unwrap();
        let spaced = app.get_string("output");

        assert_eq!(joined, "result.txt");
        assert_eq!(joined, spaced);
    }

    #[test]
    fn short_attached_and_space_forms_are_equivalent() {
        let mut app = app();
        let _ = app.parse_tokens(["-p8080"]).unwrap();
        assert_eq!(app.get_string("p"), "8080");
        assert!(app.is_set("port"));

        let _ = app.parse_tokens(["-p", "8080"]).unwrap();
        assert_eq!(app.get_string("p"), "8080");
        assert_eq!(app.get_int("port").unwrap(), 8080);
    }

    #[test]
    fn positionals_bind_by_index() {
        let mut app = app();
        let _ = app
            .parse_tokens(["--verbose", "a.txt", "-o", "x", "b.txt"])
            .unwrap();
        assert_eq!(app.get_string("input"), "a.txt");
        assert_eq!(app.get_string("target"), "b.txt");
        assert_eq!(app.get_string("output"), "x");
        assert!(app.get_bool("verbose"));
    }

    #[test]
    fn surplus_positionals_are_kept_but_unbound() {
        let mut app = app();
        let _ = app.parse_tokens(["a", "b", "c", "d"]).unwrap();
        assert_eq!(app.get_string("input"), "a");
        assert_eq!(app.get_string("target"), "b");
        assert_eq!(app.positional_arguments(), ["a", "b", "c", "d"]);
    }

    #[test]
    fn missing_positionals_stay_unset() {
        let mut app = app();
        let _ = app.parse_tokens(["a"]).unwrap();
        assert!(app.is_set("input"));
        assert!(!app.is_set("target"));
        assert_eq!(app.get::<String>("target"), None);
    }

    #[test]
    fn missing_required_positional() {
        let mut app = ArgParser::new("app", "");
        app.add_positional("input", "", true).unwrap();
        app.add_flag("v", "", "").unwrap();

        let err = app.parse_tokens(["-v"]).unwrap_err();
        assert!(matches!(err, Error::MissingArgument(name) if name == "input"));

        // The pass completed before validation, so earlier tokens were applied
        assert!(app.is_set("v"));
    }

    #[test]
    fn missing_required_option_prefers_long_name() {
        let mut app = ArgParser::new("app", "");
        app.add_option("o", "output", "").unwrap().required(true);
        let err = app.parse_tokens(Vec::<String>::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Argument Error: Missing required argument: --output"
        );

        let mut app = ArgParser::new("app", "");
        app.add_option("o", "", "").unwrap().required(true);
        let err = app.parse_tokens(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, Error::MissingArgument(name) if name == "-o"));
    }

    #[test]
    fn unknown_option_stops_the_pass() {
        let mut app = app();
        let err = app.parse_tokens(["-v", "--bogus", "-o", "x"]).unwrap_err();
        assert!(matches!(err, Error::UnknownArgument(ref token) if token == "--bogus"));
        assert!(err.is_argument_error());

        // Tokens before the failure stay applied, tokens after it were never seen
        assert!(app.is_set("verbose"));
        assert!(!app.is_set("output"));
    }

    #[test]
    fn unknown_short_option_reports_the_whole_token() {
        let mut app = app();
        let err = app.parse_tokens(["-xyz"]).unwrap_err();
        assert!(matches!(err, Error::UnknownArgument(token) if token == "-xyz"));
    }

    #[test]
    fn long_lookup_is_not_prefix_based() {
        let mut app = app();
        let err = app.parse_tokens(["--verb"]).unwrap_err();
        assert!(matches!(err, Error::UnknownArgument(_)));
    }

    #[test]
    fn positionals_can_be_set_by_name() {
        let mut app = ArgParser::new("app", "");
        app.add_positional("input", "", true).unwrap();

        assert_eq!(app.parse_tokens(["--input", "a.txt"]).unwrap(), Outcome::Parsed);
        assert_eq!(app.get_string("input"), "a.txt");
        assert!(app.positional_arguments().is_empty());

        let _ = app.parse_tokens(["--input=b.txt"]).unwrap();
        assert_eq!(app.get_string("input"), "b.txt");

        let err = app.parse_tokens(["--input"]).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn bare_positional_values_bind_after_named_ones() {
        let mut app = ArgParser::new("app", "");
        app.add_positional("input", "", false).unwrap();

        let _ = app.parse_tokens(["--input", "a.txt", "b.txt"]).unwrap();
        assert_eq!(app.get_string("input"), "b.txt");
    }

    #[test]
    fn option_at_end_of_input_is_missing_its_value() {
        let mut app = app();
        let err = app.parse_tokens(["--output"]).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));

        let err = app.parse_tokens(["a", "-o"]).unwrap_err();
        assert_eq!(err.to_string(), "Parse Error: Missing value for option: -o");
    }

    #[test]
    fn options_consume_the_next_token_whatever_it_looks_like() {
        let mut app = app();
        let _ = app.parse_tokens(["-o", "--verbose"]).unwrap();
        assert_eq!(app.get_string("output"), "--verbose");
        assert!(!app.is_set("verbose"));
    }

    #[test]
    fn long_flags_reject_inline_values() {
        let mut app = app();
        let err = app.parse_tokens(["--verbose=yes"]).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn short_tokens_do_not_cluster() {
        let mut app = ArgParser::new("app", "");
        app.add_option("a", "", "").unwrap();
        app.add_flag("b", "", "").unwrap();
        app.add_flag("c", "", "").unwrap();

        let _ = app.parse_tokens(["-abc"]).unwrap();
        assert_eq!(app.get_string("a"), "bc");
        assert!(!app.is_set("b"));
        assert!(!app.is_set("c"));
    }

    #[test]
    fn trailing_characters_after_a_short_flag_are_ignored() {
        let mut app = ArgParser::new("app", "");
        app.add_flag("b", "", "").unwrap();
        app.add_flag("c", "", "").unwrap();

        let _ = app.parse_tokens(["-bc"]).unwrap();
        assert!(app.is_set("b"));
        assert!(!app.is_set("c"));
    }

    #[test]
    fn equals_inside_long_value_is_kept() {
        let mut app = ArgParser::new("app", "");
        app.add_option("D", "define", "").unwrap();
        let _ = app.parse_tokens(["--define=key=value"]).unwrap();
        assert_eq!(app.get_string("define"), "key=value");
    }

    #[test]
    fn last_occurrence_wins() {
        let mut app = app();
        let _ = app.parse_tokens(["-o", "first", "--output=second"]).unwrap();
        assert_eq!(app.get_string("output"), "second");
    }

    #[test]
    fn validators_run_during_parsing() {
        let mut app = ArgParser::new("app", "");
        app.add_option("p", "port", "")
            .unwrap()
            .validator(|v| v.parse::<u16>().is_ok());
        app.add_positional("mode", "", false)
            .unwrap()
            .validator(|v| v == "fast" || v == "slow");

        let _ = app.parse_tokens(["-p", "443", "fast"]).unwrap();
        assert_eq!(app.get_int("port").unwrap(), 443);

        let err = app.parse_tokens(["-p", "99999"]).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = app.parse_tokens(["medium"]).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn help_short_circuits() {
        let mut app = ArgParser::new("app", "");
        app.add_positional("input", "", true).unwrap();
        app.add_flag("v", "", "").unwrap();

        assert_eq!(app.parse_tokens(["-v", "-h", "--bogus"]).unwrap(), Outcome::Help);
        assert_eq!(app.parse_tokens(["--help"]).unwrap(), Outcome::Help);
        assert!(app.parse_tokens(["--bogus", "--help"]).is_err());
    }

    #[test]
    fn numeric_getters() {
        let mut app = app();
        let _ = app.parse_tokens(["-o", "abc"]).unwrap();

        assert_eq!(app.get::<i32>("output"), None);
        assert!(matches!(app.get_int("output"), Err(Error::Validation(_))));
        assert!(matches!(app.get_double("output"), Err(Error::Validation(_))));
        assert!(matches!(
            app.get_int("nope"),
            Err(Error::ArgumentNotFound(name)) if name == "nope"
        ));
    }

    #[test]
    fn numbers_read_the_leading_numeric_prefix() {
        let mut app = ArgParser::new("app", "");
        app.add_option("", "num", "").unwrap();

        let _ = app.parse_tokens(["--num", "12abc"]).unwrap();
        assert_eq!(app.get::<i32>("num"), Some(12));

        let _ = app.parse_tokens(["--num=3.7"]).unwrap();
        assert_eq!(app.get::<i32>("num"), Some(3));
        assert_eq!(app.get_double("num").unwrap(), 3.7);

        let _ = app.parse_tokens(["--num", "2.5x"]).unwrap();
        assert_eq!(app.get::<f64>("num"), Some(2.5));

        let _ = app.parse_tokens(["--num", "x2"]).unwrap();
        assert_eq!(app.get::<i32>("num"), None);
        assert!(matches!(app.get_int("num"), Err(Error::Validation(_))));
    }

    #[test]
    fn unknown_names_read_as_empty() {
        let app = app();
        assert_eq!(app.get::<String>("nope"), None);
        assert_eq!(app.get_string("nope"), "");
        assert!(!app.get_bool("nope"));
        assert!(!app.is_set("nope"));
    }

    #[test]
    fn getters_do_not_mutate() {
        let mut app = app();
        let _ = app.parse_tokens(["-o", "x", "-p", "1"]).unwrap();
        assert_eq!(app.get::<i32>("port"), app.get::<i32>("port"));
        assert_eq!(app.get_string("o"), app.get_string("o"));
    }

    #[test]
    fn reparsing_starts_from_scratch() {
        let mut app = app();
        let _ = app.parse_tokens(["-v", "-o", "x", "a"]).unwrap();
        let _ = app.parse_tokens(["b"]).unwrap();
        assert!(!app.is_set("verbose"));
        assert!(!app.is_set("output"));
        assert_eq!(app.positional_arguments(), ["b"]);
        assert_eq!(app.get_string("input"), "b");
    }

    #[test]
    fn program_name_comes_from_argv_when_unset() {
        let mut app = ArgParser::new("", "");
        let _ = app.parse_from(["/usr/bin/tool", "x"]).unwrap();
        assert_eq!(app.program_name(), "/usr/bin/tool");
        assert_eq!(app.positional_arguments(), ["x"]);

        let mut app = ArgParser::new("named", "");
        let _ = app.parse_from(["/usr/bin/tool"]).unwrap();
        assert_eq!(app.program_name(), "named");
    }

    #[test]
    fn lone_dash_is_positional() {
        let mut app = app();
        let _ = app.parse_tokens(["-"]).unwrap();
        assert_eq!(app.get_string("input"), "-");
    }
}
