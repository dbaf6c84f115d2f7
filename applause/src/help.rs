/*!
Rendering of usage lines and help text. Everything here is a pure function
of a [`Schema`]; the schema renders both once, when it's built.

```text
USAGE: pkg <name> [--skip-peer] [--version <version>]

ARGUMENTS:
  <name>                     The name of the package

OPTIONS:
  -p, --skip-peer            Skip counting peer dependencies
  --version <version>        Version to install (default: latest)
  -h, --help                 Display this help and exit.
```
*/

use core::fmt::{self, Display, Write as _};

use indent_write::fmt::IndentWriter;
use joinery::JoinableIterator as _;
use lazy_format::lazy_format;

use crate::schema::{OptionParameter, Positional, Schema, Tags};

const HELP_LABEL: &str = "-h, --help";
const HELP_DESCRIPTION: &str = "Display this help and exit.";

/// Column layout of the help text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Spaces before each entry in a section
    pub indent: usize,

    /// Spaces between the widest label and the descriptions
    pub gutter: usize,

    /// Descriptions longer than this are wrapped
    pub wrap_width: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            indent: 2,
            gutter: 8,
            wrap_width: 80,
        }
    }
}

fn positional_label(positional: &Positional) -> impl Display + '_ {
    let name = positional.name.as_str();

    lazy_format!(match (positional.multi) {
        false => "<{name}>",
        true => "[{name}...]",
    })
}

fn option_label(option: &OptionParameter) -> impl Display + '_ {
    let tags = lazy_format!(match (option.tags) {
        Tags::Short { short } => "-{short}",
        Tags::Long { ref long } => "--{long}",
        Tags::LongShort { short, ref long } => "-{short}, --{long}",
    });

    lazy_format!(match (option.placeholder) {
        None => "{tags}",
        Some(ref placeholder) => "{tags} <{placeholder}>",
    })
}

fn option_synopsis(option: &OptionParameter) -> impl Display + '_ {
    let tag = lazy_format!(match (option.tags) {
        Tags::Long { ref long } | Tags::LongShort { ref long, .. } => "--{long}",
        Tags::Short { short } => "-{short}",
    });

    lazy_format!(match (option.placeholder) {
        None => "[{tag}]",
        Some(ref placeholder) => "[{tag} <{placeholder}>]",
    })
}

/// The one-line usage synopsis:
/// `USAGE: <path> [a | b] <positional> [multi...] [--option <value>]`
pub fn usage(schema: &Schema) -> impl Display + '_ {
    let commands = lazy_format!(match (schema.commands().is_empty()) {
        true => "",
        false => (
            " [{names}]",
            names = schema
                .commands()
                .iter()
                .map(|command| command.name.as_str())
                .join_with(" | ")
        ),
    });

    let positionals = lazy_format!(
        " {label}" for label in schema.positionals().iter().map(positional_label)
    );

    let options = lazy_format!(
        " {synopsis}" for synopsis in schema.options().iter().map(option_synopsis)
    );

    lazy_format!(
        "USAGE: {path}{commands}{positionals}{options}",
        path = schema.path()
    )
}

/// The full help text: the usage line followed by the `COMMANDS`,
/// `ARGUMENTS` and `OPTIONS` sections. There's no trailing newline.
pub fn help<'a>(schema: &'a Schema, layout: &'a Layout) -> impl Display + 'a {
    Help { schema, layout }
}

struct Entry {
    label: String,
    description: String,
}

impl Entry {
    fn new(label: impl Display, description: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            description: description.into(),
        }
    }
}

struct Help<'a> {
    schema: &'a Schema,
    layout: &'a Layout,
}

impl Display for Help<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let commands: Vec<Entry> = self
            .schema
            .commands()
            .iter()
            .map(|command| Entry::new(&command.name, command.help.as_str()))
            .collect();

        let positionals: Vec<Entry> = self
            .schema
            .positionals()
            .iter()
            .map(|positional| Entry::new(positional_label(positional), positional.help.as_str()))
            .collect();

        let options: Vec<Entry> = self
            .schema
            .options()
            .iter()
            .map(|option| {
                let description = match (option.help.as_str(), &option.default) {
                    (help, None) => help.to_owned(),
                    ("", Some(default)) => format!("(default: {default})"),
                    (help, Some(default)) => format!("{help} (default: {default})"),
                };

                Entry::new(option_label(option), description)
            })
            .chain([Entry::new(HELP_LABEL, HELP_DESCRIPTION)])
            .collect();

        let width = commands
            .iter()
            .chain(&positionals)
            .chain(&options)
            .map(|entry| entry.label.chars().count())
            .max()
            .unwrap_or(HELP_LABEL.len());

        f.write_str(self.schema.usage())?;

        let layout = self.layout;
        maybe_section(f, "COMMANDS", &commands, width, layout)?;
        maybe_section(f, "ARGUMENTS", &positionals, width, layout)?;
        maybe_section(f, "OPTIONS", &options, width, layout)
    }
}

/// Write a blank line, the `header`, then each entry on its own indented
/// line. Writes nothing at all if there are no entries.
fn maybe_section(
    out: &mut fmt::Formatter<'_>,
    header: &str,
    entries: &[Entry],
    width: usize,
    layout: &Layout,
) -> fmt::Result {
    if entries.is_empty() {
        return Ok(());
    }

    writeln!(out, "\n\n{header}:")?;

    let indent = " ".repeat(layout.indent);
    let mut out = IndentWriter::new(&indent, out);

    entries.iter().enumerate().try_for_each(|(index, entry)| {
        if index > 0 {
            out.write_char('\n')?;
        }
        describe(&mut out, entry, width, layout)
    })
}

/// Write a label, padded to `width`, and its description. Long descriptions
/// are wrapped, with continuation lines aligned under the first.
fn describe(
    out: &mut impl fmt::Write,
    entry: &Entry,
    width: usize,
    layout: &Layout,
) -> fmt::Result {
    let label = entry.label.as_str();

    if entry.description.is_empty() {
        return out.write_str(label);
    }

    write!(out, "{label:<width$}{:gutter$}", "", gutter = layout.gutter)?;

    let column = width + layout.gutter;
    let lines = textwrap::wrap(&entry.description, layout.wrap_width);

    lines
        .iter()
        .enumerate()
        .try_for_each(|(index, line)| match index {
            0 => out.write_str(line),
            _ => write!(out, "\n{:column$}{line}", ""),
        })
}
