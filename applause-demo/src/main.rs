mod error;

use std::fmt::{self, Display};
use std::io;

use anyhow::Context as _;
use applause::{FieldDescriptor, FromValue, LoadedArguments, ParsedValues, ValueKind};
use lazy_format::lazy_format;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::error::ActionError;

const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org";

fn fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::command(
            "add",
            [
                FieldDescriptor::positional("packages")
                    .multi()
                    .help("Packages to install."),
                FieldDescriptor::option("dev")
                    .short('D')
                    .help("Install as development dependencies."),
                FieldDescriptor::option("registry")
                    .kind(ValueKind::String)
                    .value("url")
                    .default(DEFAULT_REGISTRY)
                    .help("The registry to install from."),
                FieldDescriptor::option("jobs")
                    .short('j')
                    .kind(ValueKind::U8)
                    .default(4u8)
                    .help("How many packages to download at once."),
            ],
        )
        .help("Install packages."),
        FieldDescriptor::command(
            "update",
            [
                FieldDescriptor::positional("packages")
                    .multi()
                    .help("Packages to update. Updates everything if none are given."),
                FieldDescriptor::option("latest")
                    .short('L')
                    .help("Ignore version ranges and update to the latest release."),
            ],
        )
        .help("Update packages.")
        .allow_empty(),
        FieldDescriptor::command(
            "remove",
            [FieldDescriptor::positional("packages")
                .multi()
                .help("Packages to remove.")],
        )
        .help("Remove packages."),
        FieldDescriptor::command(
            "info",
            [
                FieldDescriptor::positional("package")
                    .help("The package to get the info for. Use - to read it from standard input.")
                    .completion("$(pkg list)"),
                FieldDescriptor::option("json").help("Print the info as JSON."),
            ],
        )
        .help("Get the info for a package."),
        FieldDescriptor::command("list", [FieldDescriptor::option("global").short('g')])
            .help("List installed packages.")
            .allow_empty(),
    ]
}

/// What the user asked for, pulled out of the parsed values.
#[derive(Debug)]
enum Action {
    Add {
        packages: Vec<String>,
        dev: bool,
        registry: String,
        jobs: u8,
    },
    Update {
        packages: Vec<String>,
        latest: bool,
    },
    Remove {
        packages: Vec<String>,
    },
    Info {
        package: String,
        json: bool,
    },
    List {
        global: bool,
    },
}

fn require<T: FromValue>(
    values: &ParsedValues,
    command: &'static str,
    field: &'static str,
) -> Result<T, ActionError> {
    values
        .get(field)
        .ok_or(ActionError::Missing { command, field })
}

impl Action {
    fn from_values(values: &ParsedValues) -> Result<Self, ActionError> {
        let command = values.command().ok_or(ActionError::NoCommand)?;
        let values = command.values();

        Ok(match command.name() {
            "add" => Action::Add {
                packages: require(values, "add", "packages")?,
                dev: values.flag("dev"),
                registry: require(values, "add", "registry")?,
                jobs: require(values, "add", "jobs")?,
            },
            "update" => Action::Update {
                packages: values.get("packages").unwrap_or_default(),
                latest: values.flag("latest"),
            },
            "remove" => Action::Remove {
                packages: require(values, "remove", "packages")?,
            },
            "info" => Action::Info {
                package: require(values, "info", "package")?,
                json: values.flag("json"),
            },
            "list" => Action::List {
                global: values.flag("global"),
            },
            other => return Err(ActionError::UnknownCommand(other.to_owned())),
        })
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Action::Add {
                ref packages,
                dev,
                ref registry,
                jobs,
            } => {
                let kind = lazy_format!(match (dev) {
                    true => " (dev)",
                    false => "",
                });
                let packages = lazy_format!(" {package}" for package in packages);

                write!(f, "add{kind}{packages} from {registry} with {jobs} jobs")
            }
            Action::Update {
                ref packages,
                latest,
            } => match packages.is_empty() {
                true => write!(f, "update all (latest: {latest})"),
                false => {
                    let packages = lazy_format!(" {package}" for package in packages);
                    write!(f, "update{packages} (latest: {latest})")
                }
            },
            Action::Remove { ref packages } => {
                let packages = lazy_format!(" {package}" for package in packages);
                write!(f, "remove{packages}")
            }
            Action::Info { ref package, json } => match json {
                true => write!(f, "{{\"info\": {package:?}}}"),
                false => write!(f, "info: {package}"),
            },
            Action::List { global } => match global {
                true => f.write_str("list (global)"),
                false => f.write_str("list"),
            },
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("APPLAUSE_LOG"))
        .with_writer(io::stderr)
        .init();

    let arguments = LoadedArguments::from_env();
    let schema = arguments
        .schema(fields())
        .context("the command-line schema is invalid")?;

    let values = arguments.parse_or_exit(&schema).with_defaults(&schema);
    debug!(?values, "parsed arguments");

    let action = Action::from_values(&values).context("failed to interpret arguments")?;
    println!("{action}");

    Ok(())
}
