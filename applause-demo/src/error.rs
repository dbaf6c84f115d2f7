/// The parsed values didn't have the shape the schema promised. This only
/// happens if `fields()` and `Action::from_values` disagree.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("no subcommand was selected")]
    NoCommand,

    #[error("unknown subcommand {0:?}")]
    UnknownCommand(String),

    #[error("{command}: missing value for {field:?}")]
    Missing {
        command: &'static str,
        field: &'static str,
    },
}
