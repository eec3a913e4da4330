use super::{Parameters, collect_parameters, command_url, tokenize};
use crate::error::CommandError;

/// A command compiled for transmission as an HTTP GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetQuery {
    pub url: String,
    /// `None` means the command had no parameters: omit the query string entirely.
    pub params: Option<Parameters>,
}

impl GetQuery {
    /// The URL with its query string attached, if there is one.
    pub fn to_url(&self) -> String {
        match &self.params {
            Some(params) => format!("{}?{}", self.url, params.to_query_string()),
            None => self.url.clone(),
        }
    }
}

/// Compile a command string into a `/commands/...` URL and query parameters.
///
/// ```
/// let query = cyrest::command_to_get_query(
///     "http://localhost:1234/v1",
///     r#"network get attribute network="test" namespace="default" columnList="SUID""#,
/// )
/// .unwrap();
/// assert!(query.url.ends_with("/commands/network/get/attribute"));
/// assert_eq!(query.params.unwrap().get("columnList"), Some("SUID"));
/// ```
pub fn command_to_get_query(base_url: &str, cmd: &str) -> Result<GetQuery, CommandError> {
    let tokens = tokenize(cmd);
    let url = command_url(base_url, tokens.path);

    let params = if tokens.has_parameters() {
        Some(collect_parameters(&tokens)?)
    } else {
        None
    };

    Ok(GetQuery { url, params })
}
