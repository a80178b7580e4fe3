//! Handler configuration

use cgi_handler_sdk::CgiEnv;

/// Heading shown when `ECHO_TITLE` is unset.
pub const DEFAULT_TITLE: &str = "CGI Test Results";

/// Echo configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoConfig {
    /// HTML-escape every value copied from the request into the page.
    /// Off by default so the page shows exactly what was received.
    pub escape_html: bool,

    /// Page heading
    pub title: String,
}

impl EchoConfig {
    /// Load configuration from the request's environment
    pub fn from_env(env: &CgiEnv) -> Self {
        Self {
            escape_html: env
                .get("ECHO_ESCAPE_HTML")
                .map(parse_flag)
                .unwrap_or(false),

            title: env
                .get("ECHO_TITLE")
                .map(str::to_string)
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        }
    }
}

impl Default for EchoConfig {
    fn default() -> Self {
        Self::from_env(&CgiEnv::default())
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
