use super::{collect_parameters, command_url, tokenize};
use crate::error::CommandError;

/// Placeholder sent when a command has no parameters. The command service
/// rejects an empty JSON object, so every POST body carries at least this entry.
pub const SENTINEL_PARAMETER: (&str, &str) = ("atLeastOneArg", "required");

/// A command compiled for transmission as an HTTP POST with a JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    pub url: String,
    /// UTF-8 JSON object, never empty.
    pub body: Vec<u8>,
}

pub fn command_to_post_query(base_url: &str, cmd: &str) -> Result<PostQuery, CommandError> {
    Ok(PostQuery {
        url: command_to_post_url(base_url, cmd),
        body: command_to_post_body(cmd)?,
    })
}

/// Same URL rule as the GET compiler: the command path words become path segments.
pub fn command_to_post_url(base_url: &str, cmd: &str) -> String {
    command_url(base_url, tokenize(cmd).path)
}

/// JSON object holding every inline parameter of `cmd`, quotes squeezed out.
pub fn command_to_post_body(cmd: &str) -> Result<Vec<u8>, CommandError> {
    let tokens = tokenize(cmd);
    let mut params = collect_parameters(&tokens)?;
    if params.is_empty() {
        let (name, value) = SENTINEL_PARAMETER;
        params.insert(name, value);
    }

    serde_json::to_vec(&params)
        .map_err(|e| CommandError::from_serialization_error(e, "command POST body"))
}
