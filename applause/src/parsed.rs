use std::collections::BTreeMap;

use crate::schema::Schema;
use crate::value::{FromValue, Value};

/// The values produced by a successful parse of one command level, keyed by
/// public name. Every positional has an entry; options have an entry only if
/// they were given on the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedValues {
    values: BTreeMap<String, Value>,
    command: Option<Box<SelectedCommand>>,
}

/// The subcommand chosen at a command level, along with its own values.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedCommand {
    name: String,
    values: ParsedValues,
}

impl SelectedCommand {
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn values(&self) -> &ParsedValues {
        &self.values
    }

    #[inline]
    #[must_use]
    pub fn into_values(self) -> ParsedValues {
        self.values
    }
}

impl ParsedValues {
    /// Get a value, converted to `T`. Returns `None` if there's no value
    /// with this name, or it's of a different kind.
    ///
    /// ```
    /// use applause::{FieldDescriptor, Schema, ValueKind};
    ///
    /// let schema = Schema::build(
    ///     "serve",
    ///     [FieldDescriptor::option("port").kind(ValueKind::U16)],
    /// )
    /// .unwrap();
    ///
    /// let values = applause::parse(&schema, &["--port", "8080"])
    ///     .unwrap()
    ///     .into_parsed()
    ///     .unwrap();
    ///
    /// assert_eq!(values.get::<u16>("port"), Some(8080));
    /// assert_eq!(values.get::<String>("port"), None);
    /// ```
    #[must_use]
    pub fn get<T: FromValue>(&self, name: &str) -> Option<T> {
        self.values.get(name).and_then(T::from_value)
    }

    #[inline]
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// True if a boolean option was given
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.command.is_none()
    }

    /// The subcommand that was selected, if this level has commands
    #[inline]
    #[must_use]
    pub fn command(&self) -> Option<&SelectedCommand> {
        self.command.as_deref()
    }

    /// Fill in the declared default of every option that wasn't given,
    /// including in the selected subcommand.
    #[must_use]
    pub fn with_defaults(mut self, schema: &Schema) -> Self {
        schema.options().iter().for_each(|option| {
            if let Some(ref default) = option.default {
                self.values
                    .entry(option.name.clone())
                    .or_insert_with(|| default.clone());
            }
        });

        if let Some(ref mut command) = self.command {
            if let Some(nested) = schema.find_command(&command.name) {
                command.values = core::mem::take(&mut command.values).with_defaults(&nested.schema);
            }
        }

        self
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub(crate) fn select(&mut self, name: impl Into<String>, values: ParsedValues) {
        self.command = Some(Box::new(SelectedCommand {
            name: name.into(),
            values,
        }));
    }
}

#[cfg(test)]
mod tests {
    use crate::field::FieldDescriptor;
    use crate::value::ValueKind;

    use super::*;

    #[test]
    fn typed_access() {
        let mut values = ParsedValues::default();
        values.insert("name", Value::from("left-pad"));
        values.insert("force", Value::Bool(true));
        values.insert(
            "files",
            Value::List(vec![Value::from("a"), Value::from("b")]),
        );

        assert_eq!(values.get::<String>("name").as_deref(), Some("left-pad"));
        assert_eq!(values.get::<bool>("name"), None);
        assert!(values.flag("force"));
        assert!(!values.flag("missing"));
        assert_eq!(
            values.get::<Vec<String>>("files"),
            Some(vec!["a".to_owned(), "b".to_owned()])
        );
    }

    #[test]
    fn defaults_fill_gaps_only() {
        let schema = Schema::build(
            "pkg",
            [FieldDescriptor::command(
                "add",
                [
                    FieldDescriptor::option("registry")
                        .kind(ValueKind::String)
                        .default("npm"),
                    FieldDescriptor::option("jobs")
                        .kind(ValueKind::U8)
                        .default(4u8),
                ],
            )],
        )
        .unwrap();

        let mut nested = ParsedValues::default();
        nested.insert("jobs", Value::U8(8));

        let mut values = ParsedValues::default();
        values.select("add", nested);

        let values = values.with_defaults(&schema);
        let add = values.command().unwrap();

        assert_eq!(add.name(), "add");
        assert_eq!(add.values().get::<String>("registry").as_deref(), Some("npm"));
        assert_eq!(add.values().get::<u8>("jobs"), Some(8));
    }
}
