/*!
Field descriptors: the declarative description of a single field in a
caller's argument structure.

A field list is written out explicitly (or generated) by the caller, and
then handed to [`Schema::build`][crate::schema::Schema::build]. Descriptors
are plain data; nothing is validated until the schema is built.

```
use applause::field::FieldDescriptor;
use applause::value::ValueKind;

let fields = [
    FieldDescriptor::positional("packageName").help("The name of the package"),
    FieldDescriptor::option("skipPeer")
        .short('p')
        .help("Skip counting peer dependencies"),
    FieldDescriptor::option("version")
        .kind(ValueKind::String)
        .value("version"),
];
```
*/

use core::fmt;
use core::str::FromStr;

use thiserror::Error;

use crate::value::{Value, ValueKind};

/// How a field appears on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldKind {
    /// Identified by its position among the non-option tokens
    #[default]
    Positional,

    /// Identified by `--long` or `-s`
    Option,

    /// A subcommand with its own nested fields
    Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown field type {0:?}; expected `arg`, `option`, or `command`")]
pub struct UnknownFieldKind(pub String);

/// Parses the `type` annotation: `arg`, `option`, or `command`.
impl FromStr for FieldKind {
    type Err = UnknownFieldKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "arg" => Ok(Self::Positional),
            "option" => Ok(Self::Option),
            "command" => Ok(Self::Command),
            other => Err(UnknownFieldKind(other.to_owned())),
        }
    }
}

/**
A hint for an external shell-completion generator. The parser itself never
looks at this; it's carried through the schema so that completion scripts
can be rendered from it.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// `files`: complete file paths
    Files,

    /// `files[<glob>]`: complete file paths matching a glob
    FilesGlob(String),

    /// `$( ... )`: run a shell command at completion time and complete its
    /// output
    Command(String),

    /// A space-separated list of static values
    Values(Vec<String>),
}

impl Completion {
    /// Parse a completion annotation. Returns `None` for an empty (or
    /// all-whitespace) hint.
    #[must_use]
    pub fn parse(hint: &str) -> Option<Self> {
        let trimmed = hint.trim();

        if trimmed == "files" {
            Some(Self::Files)
        } else if let Some(glob) = trimmed
            .strip_prefix("files[")
            .and_then(|rest| rest.strip_suffix(']'))
        {
            Some(Self::FilesGlob(glob.to_owned()))
        } else if trimmed.starts_with("$(") && trimmed.ends_with(')') {
            Some(Self::Command(trimmed.to_owned()))
        } else {
            let values: Vec<String> = trimmed.split_whitespace().map(str::to_owned).collect();
            (!values.is_empty()).then_some(Self::Values(values))
        }
    }
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Files => f.write_str("files"),
            Self::FilesGlob(ref glob) => write!(f, "files[{glob}]"),
            Self::Command(ref command) => f.write_str(command),
            Self::Values(ref values) => f.write_str(&values.join(" ")),
        }
    }
}

/// One entry in a field list.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub(crate) origin: String,
    pub(crate) name: Option<String>,
    pub(crate) kind: FieldKind,
    pub(crate) help: String,
    pub(crate) value_kind: ValueKind,
    pub(crate) multi: bool,
    pub(crate) short: Option<char>,
    pub(crate) placeholder: Option<String>,
    pub(crate) default: Option<Value>,
    pub(crate) completion: Option<Completion>,
    pub(crate) fields: Vec<FieldDescriptor>,
    pub(crate) allow_empty: bool,
}

impl FieldDescriptor {
    /// A field with the given origin identifier (the name of the field in
    /// the caller's structure) and kind. Positionals default to strings,
    /// options to booleans.
    #[must_use]
    pub fn new(origin: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            origin: origin.into(),
            name: None,
            kind,
            help: String::new(),
            value_kind: match kind {
                FieldKind::Option => ValueKind::Bool,
                FieldKind::Positional | FieldKind::Command => ValueKind::String,
            },
            multi: false,
            short: None,
            placeholder: None,
            default: None,
            completion: None,
            fields: Vec::new(),
            allow_empty: false,
        }
    }

    #[must_use]
    pub fn positional(origin: impl Into<String>) -> Self {
        Self::new(origin, FieldKind::Positional)
    }

    #[must_use]
    pub fn option(origin: impl Into<String>) -> Self {
        Self::new(origin, FieldKind::Option)
    }

    /// A subcommand, whose own arguments are described by `fields`
    #[must_use]
    pub fn command(origin: impl Into<String>, fields: impl IntoIterator<Item = Self>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
            ..Self::new(origin, FieldKind::Command)
        }
    }

    /// Override the public name. By default it's the origin identifier in
    /// kebab-case. For options, an empty name means "short form only".
    #[must_use]
    pub fn name(self, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..self
        }
    }

    #[must_use]
    pub fn help(self, help: impl Into<String>) -> Self {
        Self {
            help: help.into(),
            ..self
        }
    }

    #[must_use]
    pub fn kind(self, value_kind: ValueKind) -> Self {
        Self { value_kind, ..self }
    }

    /// This positional accepts a variable-length sequence of values
    #[must_use]
    pub fn multi(self) -> Self {
        Self {
            multi: true,
            ..self
        }
    }

    #[must_use]
    pub fn short(self, short: char) -> Self {
        Self {
            short: Some(short),
            ..self
        }
    }

    /// The placeholder displayed for an option's value, as in
    /// `--output <value>`. Ignored for boolean options.
    #[must_use]
    pub fn value(self, placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: Some(placeholder.into()),
            ..self
        }
    }

    /// A default for an option. Shown in help; applied with
    /// [`ParsedValues::with_defaults`][crate::parsed::ParsedValues::with_defaults].
    #[must_use]
    pub fn default(self, default: impl Into<Value>) -> Self {
        Self {
            default: Some(default.into()),
            ..self
        }
    }

    /// A completion hint, in the annotation syntax accepted by
    /// [`Completion::parse`]
    #[must_use]
    pub fn completion(self, hint: &str) -> Self {
        Self {
            completion: Completion::parse(hint),
            ..self
        }
    }

    /// For commands: the command may be given with no further tokens
    #[must_use]
    pub fn allow_empty(self) -> Self {
        Self {
            allow_empty: true,
            ..self
        }
    }

    #[inline]
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    #[inline]
    #[must_use]
    pub fn field_kind(&self) -> FieldKind {
        self.kind
    }
}
