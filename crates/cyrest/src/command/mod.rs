pub mod get_query;
pub mod post_body;
pub mod tokenizer;

pub use get_query::{GetQuery, command_to_get_query};
pub use post_body::{
    PostQuery, SENTINEL_PARAMETER, command_to_post_body, command_to_post_query,
    command_to_post_url,
};
pub use tokenizer::{Fragment, TokenizedCommand, tokenize};

use crate::error::CommandError;
use serde::ser::{Serialize, SerializeMap, Serializer};

// =============================================================================
// PARAMETER MAPPING
// =============================================================================

/// Parameter names to values, in order of first appearance.
///
/// Inserting an existing name replaces its value in place, so every name is
/// unique. Serializes as a map: a JSON object for bodies, `a=1&b=2` for queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    entries: Vec<(String, String)>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter, returning the value it replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// `name1=value1&name2=value2`, both sides percent-encoded.
    pub fn to_query_string(&self) -> String {
        self.iter()
            .map(|(name, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(name),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Parameters::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

impl Serialize for Parameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// =============================================================================
// SHARED COMPILER STEPS
// =============================================================================

/// `<base_url>/commands/<word>/<word>/...`, each word percent-encoded as a
/// path segment. An empty path yields `<base_url>/commands/`.
pub(crate) fn command_url(base_url: &str, path: &str) -> String {
    let segments: Vec<String> = path
        .split_whitespace()
        .map(|word| urlencoding::encode(word).into_owned())
        .collect();
    format!(
        "{}/commands/{}",
        base_url.trim_end_matches('/'),
        segments.join("/")
    )
}

/// Collect every fragment into a mapping, rejecting fragments without a name.
pub(crate) fn collect_parameters(tokens: &TokenizedCommand<'_>) -> Result<Parameters, CommandError> {
    let mut params = Parameters::new();
    for fragment in &tokens.fragments {
        if fragment.name.is_empty() {
            return Err(CommandError::MissingParameterName {
                fragment: fragment.text.to_string(),
            });
        }
        params.insert(fragment.name, fragment.value());
    }
    Ok(params)
}
