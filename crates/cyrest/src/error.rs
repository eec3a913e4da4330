use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    /// A `name=value` fragment whose name is empty, e.g. a stray `="x"`.
    MissingParameterName { fragment: String },
    /// A compiled body that could not be serialized.
    Serialization { context: String, reason: String },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::MissingParameterName { fragment } => {
                write!(f, "Missing parameter name in '{fragment}'")
            }
            CommandError::Serialization { context, reason } => {
                write!(f, "Serialization failed in {context}: {reason}")
            }
        }
    }
}

impl std::error::Error for CommandError {}

impl CommandError {
    pub fn is_malformed_command(&self) -> bool {
        matches!(self, CommandError::MissingParameterName { .. })
    }

    pub fn from_serialization_error(e: impl std::fmt::Display, context: &str) -> Self {
        CommandError::Serialization {
            context: context.to_string(),
            reason: e.to_string(),
        }
    }
}
