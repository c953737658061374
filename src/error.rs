pub type Result<T> = std::result::Result<T, Error>;

/// A variant of this enum is returned when a declaration or a command line doesn't fit the
/// parser definition
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A token named an option that was never declared
    #[error("Argument Error: Unknown argument: {0}")]
    UnknownArgument(String),

    /// The command line is structurally malformed (e.g. an option is missing its value)
    #[error("Parse Error: {0}")]
    Parse(String),

    /// A value was rejected by a validator, or could not be converted to the requested type
    #[error("Validation Error: {0}")]
    Validation(String),

    /// A required argument was not present on the command line
    #[error("Argument Error: Missing required argument: {0}")]
    MissingArgument(String),

    /// A getter was asked for a name that was never declared
    #[error("Argument Error: Argument not found: {0}")]
    ArgumentNotFound(String),

    /// Two declarations share a short, long or positional name
    #[error("Argument Error: Duplicate argument name: {0}")]
    DuplicateName(String),

    #[error("Argument Error: Invalid declaration: {0}")]
    InvalidDeclaration(String),
}

impl Error {
    /// Returns true for errors about an argument named on the command line or by a getter
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            Error::UnknownArgument(_) | Error::MissingArgument(_) | Error::ArgumentNotFound(_)
        )
    }
}
