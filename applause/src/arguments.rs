use std::{env, io, path::Path, process};

use crate::{
    engine::{self, Outcome},
    errors::{Error, ParseError, ParseErrorKind, SchemaError},
    field::FieldDescriptor,
    parsed::ParsedValues,
    schema::Schema,
};

/// Helper type for loading arguments from the environment.
///
/// The first argument is the program path; its file name is used as the
/// command path in usage and help text. Arguments that aren't valid UTF-8
/// are converted lossily.
#[derive(Debug, Clone)]
pub struct LoadedArguments {
    arguments: Vec<String>,
}

impl LoadedArguments {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(env::args_os().map(|arg| arg.to_string_lossy().into_owned()))
    }

    /// Arguments from some other source. As with [`from_env`][Self::from_env],
    /// the first one is the program path.
    #[must_use]
    pub fn new(arguments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn argv0(&self) -> &str {
        self.arguments.first().map_or("", String::as_str)
    }

    /// The program's name, without any leading directories
    #[must_use]
    pub fn command_name(&self) -> &str {
        let argv0 = self.argv0();

        Path::new(argv0)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(argv0)
    }

    /// Every argument after the program path
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        self.arguments.get(1..).unwrap_or(&[])
    }

    /// Build a schema for this program from a field list
    pub fn schema(
        &self,
        fields: impl IntoIterator<Item = FieldDescriptor>,
    ) -> Result<Schema, SchemaError> {
        Schema::build(self.command_name(), fields)
    }

    pub fn try_parse(&self, schema: &Schema) -> Result<Outcome, ParseError> {
        engine::parse(schema, self.tokens())
    }

    /// Build the schema and parse, reporting either kind of failure as an
    /// [`Error`].
    pub fn try_run(
        &self,
        fields: impl IntoIterator<Item = FieldDescriptor>,
    ) -> Result<Outcome, Error> {
        let schema = self.schema(fields)?;
        Ok(self.try_parse(&schema)?)
    }

    /// Parse the arguments. If help was requested, print it to stdout and
    /// exit with status 0; if they couldn't be parsed, print the error and
    /// a usage message to stderr and exit with status 1.
    pub fn parse_or_exit(&self, schema: &Schema) -> ParsedValues {
        match self.try_parse(schema) {
            Ok(Outcome::Parsed(values)) => values,
            Ok(Outcome::Terminal(action)) => {
                use io::Write as _;

                let _ = writeln!(io::stdout().lock(), "{}", action.help());
                process::exit(0);
            }
            Err(error) => {
                let _ = report(&error, schema, &mut io::stderr().lock());
                process::exit(1);
            }
        }
    }
}

/// Write a parse error, followed by the usage line of the command level
/// where it happened. An unknown command gets that level's full help
/// instead, since the list of commands is what the user is missing.
pub fn report(error: &ParseError, schema: &Schema, out: &mut impl io::Write) -> io::Result<()> {
    let schema = schema.descend(error.commands()).unwrap_or(schema);

    writeln!(out, "ERROR: {error}")?;

    match *error.kind() {
        ParseErrorKind::UnknownCommand { .. } => writeln!(out, "\n{}", schema.help()),
        _ => writeln!(out, "{}", schema.usage()),
    }
}
