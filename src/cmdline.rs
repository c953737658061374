/// How a single raw command line token is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// `-h` or `--help`
    Help,
    /// `--name` or `--name=value`
    Long {
        name: &'a str,
        value: Option<&'a str>,
    },
    /// `-n` or `-nVALUE`. The name is always exactly one character.
    Short {
        name: &'a str,
        attached: Option<&'a str>,
    },
    /// Anything else, including a lone `-`
    Positional(&'a str),
}

impl<'a> Token<'a> {
    pub fn classify(arg: &'a str) -> Self {
        // -h and --help are recognized before anything else, wherever they appear.
        if arg == "-h" || arg == "--help" {
            return Token::Help;
        }

        if let Some(long) = arg.strip_prefix("--") {
            // The value of the option is in the same argument.
            // e.g. --message=hello
            //        ^^^^^^^ ^^^^^
            //         name   value
            return match long.split_once('=') {
                Some((name, value)) => Token::Long {
                    name,
                    value: Some(value),
                },
                None => Token::Long {
                    name: long,
                    value: None,
                },
            };
        }

        if let Some(short) = arg.strip_prefix('-') {
            if let Some(c) = short.chars().next() {
                // Everything after the first character is an attached value.
                // e.g. -p8080
                //       ^^^^^
                //       name + attached
                let (name, rest) = short.split_at(c.len_utf8());
                let attached = if rest.is_empty() { None } else { Some(rest) };
                return Token::Short { name, attached };
            }
        }

        Token::Positional(arg)
    }

    /// Returns true if this token can never be the value of a preceding option.
    ///
    /// Only used for diagnostics: an option consumes the next token as its value no matter what
    /// it looks like.
    pub fn looks_like_option(&self) -> bool {
        !matches!(self, Token::Positional(_))
    }
}
