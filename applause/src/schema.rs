/*!
The validated description of one command level: its positionals, options,
and subcommands, along with the usage and help text derived from them.
*/

use std::collections::BTreeSet;

use heck::ToKebabCase as _;
use tracing::debug;

use crate::engine::{self, Outcome};
use crate::errors::{ParseError, SchemaError};
use crate::field::{Completion, FieldDescriptor, FieldKind};
use crate::help::{self, Layout};
use crate::value::{Value, ValueKind};

/// The set of tags that identify a particular option (`-short`, `--long`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tags {
    /// This option uses only a long tag
    Long { long: String },

    /// This option uses only a short tag
    Short { short: char },

    /// This option uses both a long and short tag
    LongShort { long: String, short: char },
}

impl Tags {
    /// Get the long tag, if any
    #[inline]
    #[must_use]
    pub fn long(&self) -> Option<&str> {
        match *self {
            Tags::Long { ref long } | Tags::LongShort { ref long, .. } => Some(long),
            Tags::Short { .. } => None,
        }
    }

    /// Get the short tag, if any
    #[inline]
    #[must_use]
    pub const fn short(&self) -> Option<char> {
        match *self {
            Tags::Short { short } | Tags::LongShort { short, .. } => Some(short),
            Tags::Long { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Positional {
    pub name: String,
    pub help: String,
    pub kind: ValueKind,

    /// Accepts a variable-length sequence. At most one positional in a
    /// schema is multi-valued; it takes whatever tokens the positionals
    /// after it don't need.
    pub multi: bool,
    pub completion: Option<Completion>,
}

#[derive(Debug, Clone)]
pub struct OptionParameter {
    /// The key under which this option's value is stored. This is the long
    /// tag, or for short-only options, the kebab-cased origin identifier.
    pub name: String,
    pub tags: Tags,
    pub kind: ValueKind,
    pub help: String,
    pub default: Option<Value>,

    /// Always `None` for boolean options, which take no value.
    pub placeholder: Option<String>,
    pub completion: Option<Completion>,
}

#[derive(Debug, Clone)]
pub struct Command {
    pub name: String,
    pub help: String,
    pub schema: Schema,
}

#[derive(Debug, Clone)]
pub struct Schema {
    path: String,
    positionals: Vec<Positional>,
    options: Vec<OptionParameter>,
    commands: Vec<Command>,
    allow_empty: bool,
    usage: String,
    help: String,
}

impl Schema {
    /// Build a schema from a field list. `path` is the command as it should
    /// appear in usage text, usually the program name.
    pub fn build(
        path: impl Into<String>,
        fields: impl IntoIterator<Item = FieldDescriptor>,
    ) -> Result<Self, SchemaError> {
        Self::builder(path).fields(fields).build()
    }

    #[must_use]
    pub fn builder(path: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            path: path.into(),
            fields: Vec::new(),
            allow_empty: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    #[must_use]
    pub fn positionals(&self) -> &[Positional] {
        &self.positionals
    }

    #[inline]
    #[must_use]
    pub fn options(&self) -> &[OptionParameter] {
        &self.options
    }

    #[inline]
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// If true, an empty token list is parsed normally instead of being
    /// treated as a request for help.
    #[inline]
    #[must_use]
    pub fn allows_empty(&self) -> bool {
        self.allow_empty
    }

    #[inline]
    #[must_use]
    pub fn usage(&self) -> &str {
        &self.usage
    }

    #[inline]
    #[must_use]
    pub fn help(&self) -> &str {
        &self.help
    }

    /// Parse a token list, which should not include the program name.
    /// Shorthand for [`engine::parse`].
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Outcome, ParseError> {
        engine::parse(self, tokens)
    }

    /// Render the help text again with a non-default layout
    #[must_use]
    pub fn render_help(&self, layout: &Layout) -> String {
        help::help(self, layout).to_string()
    }

    #[must_use]
    pub fn find_long(&self, long: &str) -> Option<&OptionParameter> {
        self.options
            .iter()
            .find(|option| option.tags.long() == Some(long))
    }

    #[must_use]
    pub fn find_short(&self, short: char) -> Option<&OptionParameter> {
        self.options
            .iter()
            .find(|option| option.tags.short() == Some(short))
    }

    #[must_use]
    pub fn find_command(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|command| command.name == name)
    }

    /// True if `token` is a `--long` or `-s` reference to one of this
    /// schema's options. Used to detect options given where a value was
    /// expected.
    #[must_use]
    pub fn is_option_token(&self, token: &str) -> bool {
        if let Some(long) = token.strip_prefix("--") {
            let long = long.split_once('=').map_or(long, |(long, _)| long);
            !long.is_empty() && self.find_long(long).is_some()
        } else if let Some(short) = token.strip_prefix('-') {
            short
                .chars()
                .next()
                .is_some_and(|short| self.find_short(short).is_some())
        } else {
            false
        }
    }

    /// Follow a chain of subcommand names down to a nested schema. An empty
    /// chain is `self`.
    #[must_use]
    pub fn descend<S: AsRef<str>>(&self, commands: &[S]) -> Option<&Schema> {
        commands.iter().try_fold(self, |schema, name| {
            schema
                .find_command(name.as_ref())
                .map(|command| &command.schema)
        })
    }
}

/// Incrementally assemble the field list of a [`Schema`].
#[derive(Debug, Clone)]
#[must_use]
pub struct SchemaBuilder {
    path: String,
    fields: Vec<FieldDescriptor>,
    allow_empty: bool,
}

impl SchemaBuilder {
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Parse an empty token list normally instead of showing help
    pub fn allow_empty(self, allow_empty: bool) -> Self {
        Self {
            allow_empty,
            ..self
        }
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        build_level(self.path, self.fields, self.allow_empty)
    }
}

fn check_short(field: &FieldDescriptor, short: char) -> Result<char, SchemaError> {
    if short == 'h' {
        Err(SchemaError::ReservedShort {
            field: field.origin.clone(),
        })
    } else if short == '-' || short == '=' || short.is_whitespace() || short.is_control() {
        Err(SchemaError::InvalidShort {
            field: field.origin.clone(),
            short,
        })
    } else {
        Ok(short)
    }
}

fn build_level(
    path: String,
    fields: Vec<FieldDescriptor>,
    allow_empty: bool,
) -> Result<Schema, SchemaError> {
    let mut positionals: Vec<Positional> = Vec::new();
    let mut options: Vec<OptionParameter> = Vec::new();
    let mut commands: Vec<Command> = Vec::new();

    let mut names = BTreeSet::new();
    let mut shorts = BTreeSet::new();

    let mut multi = false;

    for field in fields {
        let name = field
            .name
            .clone()
            .unwrap_or_else(|| field.origin.to_kebab_case());

        let mixed = match field.kind {
            FieldKind::Command => !positionals.is_empty() || !options.is_empty(),
            FieldKind::Positional | FieldKind::Option => !commands.is_empty(),
        };

        if mixed {
            return Err(SchemaError::MixedCommands {
                field: field.origin,
            });
        }

        match field.kind {
            FieldKind::Positional => {
                if name.is_empty() {
                    return Err(SchemaError::EmptyName {
                        field: field.origin,
                    });
                }

                if name == "help" {
                    return Err(SchemaError::ReservedName {
                        field: field.origin,
                    });
                }

                if !names.insert(name.clone()) {
                    return Err(SchemaError::DuplicateName {
                        field: field.origin,
                        name,
                    });
                }

                if field.multi {
                    if multi {
                        return Err(SchemaError::MultipleMulti {
                            field: field.origin,
                        });
                    }
                    multi = true;
                }

                positionals.push(Positional {
                    name,
                    help: field.help,
                    kind: field.value_kind,
                    multi: field.multi,
                    completion: field.completion,
                });
            }
            FieldKind::Option => {
                if name == "help" {
                    return Err(SchemaError::ReservedName {
                        field: field.origin,
                    });
                }

                let short = field
                    .short
                    .map(|short| check_short(&field, short))
                    .transpose()?;

                if let Some(short) = short {
                    if !shorts.insert(short) {
                        return Err(SchemaError::DuplicateShort {
                            field: field.origin,
                            short,
                        });
                    }
                }

                let tags = match (name.is_empty(), short) {
                    (false, None) => Tags::Long { long: name.clone() },
                    (false, Some(short)) => Tags::LongShort {
                        long: name.clone(),
                        short,
                    },
                    (true, Some(short)) => Tags::Short { short },
                    (true, None) => {
                        return Err(SchemaError::EmptyName {
                            field: field.origin,
                        });
                    }
                };

                let key = match name.is_empty() {
                    false => name,
                    true => field.origin.to_kebab_case(),
                };

                if !names.insert(key.clone()) {
                    return Err(SchemaError::DuplicateName {
                        field: field.origin,
                        name: key,
                    });
                }

                if let Some(ref default) = field.default {
                    if default.kind() != Some(field.value_kind) {
                        return Err(SchemaError::InvalidDefault {
                            field: field.origin,
                            expected: field.value_kind,
                            found: default
                                .kind()
                                .map_or("list", |kind| kind.name())
                                .to_owned(),
                        });
                    }
                }

                let placeholder = match field.value_kind.is_bool() {
                    true => None,
                    false => Some(field.placeholder.unwrap_or_else(|| key.clone())),
                };

                options.push(OptionParameter {
                    name: key,
                    tags,
                    kind: field.value_kind,
                    help: field.help,
                    default: field.default,
                    placeholder,
                    completion: field.completion,
                });
            }
            FieldKind::Command => {
                if commands.iter().any(|command| command.name == name) {
                    return Err(SchemaError::DuplicateCommand {
                        field: field.origin,
                        name,
                    });
                }

                let schema = build_level(format!("{path} {name}"), field.fields, field.allow_empty)
                    .map_err(|error| SchemaError::Nested {
                        command: name.clone(),
                        error: Box::new(error),
                    })?;

                commands.push(Command {
                    name,
                    help: field.help,
                    schema,
                });
            }
        }
    }

    debug!(
        path = %path,
        positionals = positionals.len(),
        options = options.len(),
        commands = commands.len(),
        "built schema"
    );

    let mut schema = Schema {
        path,
        positionals,
        options,
        commands,
        allow_empty,
        usage: String::new(),
        help: String::new(),
    };

    let usage = help::usage(&schema).to_string();
    schema.usage = usage;

    let help = help::help(&schema, &Layout::default()).to_string();
    schema.help = help;

    Ok(schema)
}
