/*!
Declarative command-line parsing. Describe the fields of your program's
arguments, and `applause` builds a parser for them, complete with typed
values, usage and help text, and nested subcommands.

A program declares a list of [`FieldDescriptor`]s, each of which is a
positional, an option, or a subcommand with fields of its own. These are
validated and assembled into a [`Schema`], which can then parse any number
of command lines into [`ParsedValues`].

```
use applause::{FieldDescriptor, Outcome, Schema, ValueKind};

let schema = Schema::build(
    "pkg",
    [
        FieldDescriptor::command(
            "add",
            [
                FieldDescriptor::positional("packageName")
                    .help("The name of the package to add"),
                FieldDescriptor::option("version")
                    .short('v')
                    .kind(ValueKind::String)
                    .help("The version to install"),
                FieldDescriptor::option("dev").short('D'),
            ],
        )
        .help("Add a package"),
        FieldDescriptor::command("list", [])
            .help("List installed packages")
            .allow_empty(),
    ],
)
.unwrap();

let values = match schema.parse(&["add", "left-pad", "-Dv", "1.3.0"]).unwrap() {
    Outcome::Parsed(values) => values,
    Outcome::Terminal(action) => panic!("{}", action.help()),
};

let add = values.command().unwrap();
assert_eq!(add.name(), "add");
assert_eq!(add.values().get::<String>("package-name").unwrap(), "left-pad");
assert_eq!(add.values().get::<String>("version").unwrap(), "1.3.0");
assert!(add.values().flag("dev"));
```

Typically a `main` function uses [`LoadedArguments`], which prints help or
error messages and exits the process when appropriate.
*/

pub mod arguments;
pub mod engine;
pub mod errors;
pub mod field;
pub mod help;
pub mod parsed;
pub mod schema;
pub mod value;

pub use arguments::LoadedArguments;
pub use engine::{Outcome, TerminalAction, parse};
pub use errors::{Error, ParseError, ParseErrorKind, SchemaError};
pub use field::{Completion, FieldDescriptor, FieldKind};
pub use parsed::{ParsedValues, SelectedCommand};
pub use schema::{Schema, SchemaBuilder, Tags};
pub use value::{FromValue, Value, ValueKind};
