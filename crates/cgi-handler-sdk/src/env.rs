//! CGI environment snapshot
//!
//! The hosting web server passes request metadata to a CGI program through
//! environment variables. `CgiEnv` captures them once, up front, so the rest
//! of the handler works on an immutable map instead of the process globals.

use std::collections::BTreeMap;
use std::ffi::OsString;

/// Prefix the web server puts in front of every forwarded request header.
pub const HEADER_PREFIX: &str = "HTTP_";

/// Request metadata variables that are echoed alongside the headers.
pub const REQUEST_METADATA: [&str; 4] = [
    "REQUEST_METHOD",
    "CONTENT_TYPE",
    "CONTENT_LENGTH",
    "QUERY_STRING",
];

/// Immutable, key-ordered view of the variables a CGI program was started with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CgiEnv {
    vars: BTreeMap<String, String>,
}

impl CgiEnv {
    /// Snapshot the current process environment.
    ///
    /// Names or values that are not valid Unicode are converted lossily.
    pub fn from_process() -> Self {
        Self::from_os_vars(std::env::vars_os())
    }

    /// Build from raw OS strings (lossy UTF-8 conversion).
    pub fn from_os_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        vars.into_iter()
            .map(|(k, v)| {
                (
                    k.to_string_lossy().into_owned(),
                    v.to_string_lossy().into_owned(),
                )
            })
            .collect()
    }

    /// Look up a variable.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Look up a variable, falling back to `default` when it is unset.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// All variables, in lexicographic key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Forwarded headers plus the request metadata variables, in key order.
    pub fn echoable(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(k, _)| is_echoable(k))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Whether a variable name belongs in the echoed environment listing.
pub fn is_echoable(name: &str) -> bool {
    name.starts_with(HEADER_PREFIX) || REQUEST_METADATA.contains(&name)
}

impl<K, V> FromIterator<(K, V)> for CgiEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
