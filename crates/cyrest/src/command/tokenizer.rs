//! Two-pass lexer for the command grammar
//! `<word>[ <word>]* [ <name>="<value>"]*`.
//!
//! Pass one records the byte offset of every parameter boundary, i.e. every
//! `[A-Za-z0-9_-]*=` token that starts the string or follows whitespace and is
//! not inside a double-quoted value. A value is quoted only when its first
//! byte is `"`, and the quoted region ends at a `"` that ends a token. Pass two
//! slices the command at those offsets. The lexer never fails: odd input yields odd groupings, and the
//! compilers decide what is an error.

/// One `name=value` fragment, borrowed from the command string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment<'a> {
    /// Parameter name; empty for a stray `=`.
    pub name: &'a str,
    /// Value as written, quotes included.
    pub raw_value: &'a str,
    /// The whole fragment as written, for diagnostics.
    pub text: &'a str,
}

impl Fragment<'_> {
    /// Value with every double quote removed.
    pub fn value(&self) -> String {
        self.raw_value.replace('"', "")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedCommand<'a> {
    /// Leading positional words; empty when the command starts with a parameter.
    pub path: &'a str,
    pub fragments: Vec<Fragment<'a>>,
}

impl TokenizedCommand<'_> {
    pub fn has_parameters(&self) -> bool {
        !self.fragments.is_empty()
    }
}

pub fn tokenize(cmd: &str) -> TokenizedCommand<'_> {
    let boundaries = parameter_boundaries(cmd);

    let path_end = boundaries.first().copied().unwrap_or(cmd.len());
    let path = cmd[..path_end].trim();

    let fragments = boundaries
        .iter()
        .enumerate()
        .map(|(idx, &start)| {
            let end = boundaries.get(idx + 1).copied().unwrap_or(cmd.len());
            let text = cmd[start..end].trim_end();
            // Every boundary was found on a `name=` token, so the split always succeeds.
            let (name, raw_value) = text.split_once('=').unwrap_or((text, ""));
            Fragment {
                name,
                raw_value,
                text,
            }
        })
        .collect();

    TokenizedCommand { path, fragments }
}

fn parameter_boundaries(cmd: &str) -> Vec<usize> {
    let bytes = cmd.as_bytes();
    let mut boundaries = Vec::new();
    let mut in_quotes = false;
    let mut at_token_start = true;
    let mut idx = 0;

    while idx < bytes.len() {
        let byte = bytes[idx];
        if in_quotes {
            // Only a quote that ends a token closes the value.
            if byte == b'"' && bytes.get(idx + 1).is_none_or(|b| b.is_ascii_whitespace()) {
                in_quotes = false;
            }
            idx += 1;
            continue;
        }
        if byte.is_ascii_whitespace() {
            at_token_start = true;
            idx += 1;
            continue;
        }
        if at_token_start {
            if let Some(name_len) = parameter_name_len(&bytes[idx..]) {
                boundaries.push(idx);
                idx += name_len + 1;
                if bytes.get(idx) == Some(&b'"') {
                    in_quotes = true;
                    idx += 1;
                }
                at_token_start = false;
                continue;
            }
        }
        at_token_start = false;
        idx += 1;
    }

    boundaries
}

fn is_name_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-'
}

/// Length of the name in a `name=` token, or `None` if `rest` does not start one.
fn parameter_name_len(rest: &[u8]) -> Option<usize> {
    let name_len = rest.iter().take_while(|b| is_name_byte(**b)).count();
    (rest.get(name_len) == Some(&b'=')).then_some(name_len)
}
