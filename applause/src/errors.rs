/*!
Error types for schema construction and argument parsing.

[`SchemaError`]s are programmer errors: they describe a malformed field
list and are raised before any token is looked at. [`ParseError`]s describe
a bad command line and carry the path of subcommands that was entered
before the error occurred, so that the relevant usage message can be found.
*/

use std::io;

use thiserror::Error;

use crate::value::CoercionError;

/// A field list couldn't be turned into a [`Schema`][crate::schema::Schema].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("field `{field}`: the name `help` is reserved for the --help option")]
    ReservedName { field: String },

    #[error("field `{field}`: the short form `h` is reserved for the --help option")]
    ReservedShort { field: String },

    #[error("field `{field}`: {short:?} can't be used as a short form")]
    InvalidShort { field: String, short: char },

    #[error("field `{field}`: empty name; only options with a short form can omit it")]
    EmptyName { field: String },

    #[error("field `{field}`: the name `{name}` is already in use")]
    DuplicateName { field: String, name: String },

    #[error("field `{field}`: the short form `-{short}` is already in use")]
    DuplicateShort { field: String, short: char },

    #[error("field `{field}`: the command `{name}` is already declared")]
    DuplicateCommand { field: String, name: String },

    #[error("field `{field}`: only one positional can take multiple values")]
    MultipleMulti { field: String },

    #[error("field `{field}`: commands can't be declared alongside positionals or options")]
    MixedCommands { field: String },

    #[error("field `{field}`: default value is a {found}, but the option holds a {expected}")]
    InvalidDefault {
        field: String,
        expected: crate::value::ValueKind,
        found: String,
    },

    #[error("in command `{command}`: {error}")]
    Nested {
        command: String,
        error: Box<SchemaError>,
    },
}

/// The specific thing that went wrong while parsing the command line.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseErrorKind {
    /// A `--long` or `-s` token didn't match any declared option
    #[error("`{option}` is not a recognised option")]
    UnrecognizedOption { option: String },

    /// An option that takes a value was last on the command line, or was
    /// followed by `--` or another recognised option
    #[error("value not provided for option `{option}`")]
    MissingOptionValue { option: String },

    /// Fewer positional tokens than declared positionals. `missing` is the
    /// first positional that didn't get a value.
    #[error("not enough arguments provided: missing <{missing}>")]
    NotEnoughArguments { missing: String },

    /// More positional tokens than declared positionals
    #[error("extra argument: `{argument}`")]
    ExtraArgument { argument: String },

    /// A token couldn't be coerced into its field's kind
    #[error("{name}: {error}")]
    Coercion {
        name: String,
        #[source]
        error: CoercionError,
    },

    /// The first token at a command level didn't name a declared command
    #[error("`{command}` is not a recognised command")]
    UnknownCommand { command: String },

    /// A `-` positional asked for a line of standard input, and there
    /// wasn't one
    #[error("failed to read <{name}> from standard input")]
    Stdin {
        name: String,
        #[source]
        error: io::Error,
    },
}

/// A command line couldn't be parsed.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct ParseError {
    kind: ParseErrorKind,
    commands: Vec<String>,
}

impl ParseError {
    #[must_use]
    pub fn new(kind: ParseErrorKind) -> Self {
        Self {
            kind,
            commands: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// The names of the subcommands that were entered before this error,
    /// outermost first.
    #[inline]
    #[must_use]
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Mark this error as having happened inside the given subcommand
    #[must_use]
    pub(crate) fn within(mut self, command: &str) -> Self {
        self.commands.insert(0, command.to_owned());
        self
    }
}

impl From<ParseErrorKind> for ParseError {
    #[inline]
    fn from(kind: ParseErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Anything that can go wrong between a field list and parsed values.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
