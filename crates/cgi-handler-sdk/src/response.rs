//! CGI response representation
//!
//! A CGI program answers by writing header lines, a blank line and the body
//! to standard output. The web server turns that into the HTTP response; a
//! `Status:` header overrides the default `200 OK`.

use std::io::{self, Write};

/// Represents an outgoing CGI response.
///
/// # Quick Reference
///
/// | Method | Status | Use Case |
/// |--------|--------|----------|
/// | `html(status, body)` | any | HTML page |
/// | `text(status, body)` | any | Plain text |
/// | `bad_request(msg)` | 400 | Invalid request metadata |
/// | `internal_error(msg)` | 500 | Server error |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code
    pub status: u16,

    /// Response headers, written in insertion order
    pub headers: Vec<(String, String)>,

    /// Response body
    pub body: Vec<u8>,
}

impl Response {
    /// Create a new response with the given status code (no headers, no body).
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Create an HTML response.
    ///
    /// # Example
    /// ```
    /// use cgi_handler_sdk::Response;
    ///
    /// let response = Response::html(200, "<p>Hello!</p>\n");
    /// let mut out = Vec::new();
    /// response.write_to(&mut out).unwrap();
    /// assert_eq!(out, b"Content-Type: text/html\n\n<p>Hello!</p>\n");
    /// ```
    pub fn html(status: u16, body: impl Into<String>) -> Self {
        Self::new(status)
            .with_header("Content-Type", "text/html")
            .with_body(body)
    }

    /// Create a plain text response.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::new(status)
            .with_header("Content-Type", "text/plain; charset=utf-8")
            .with_body(body)
    }

    /// Create a 400 Bad Request response.
    pub fn bad_request(message: impl AsRef<str>) -> Self {
        Self::error_page(400, message.as_ref())
    }

    /// Create a 500 Internal Server Error response.
    pub fn internal_error(message: impl AsRef<str>) -> Self {
        Self::error_page(500, message.as_ref())
    }

    pub(crate) fn error_page(status: u16, message: &str) -> Self {
        Self::html(
            status,
            format!(
                "<h1>{}</h1>\n<p>{}</p>\n",
                reason_phrase(status),
                escape_html(message)
            ),
        )
    }

    /// Add a header to the response (builder pattern).
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Set the body (builder pattern).
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into().into_bytes();
        self
    }

    /// Write the response in CGI framing.
    ///
    /// The `Status:` line is only emitted for non-200 responses, so a normal
    /// response starts directly with its first header.
    pub fn write_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        if self.status != 200 {
            writeln!(out, "Status: {} {}", self.status, reason_phrase(self.status))?;
        }
        for (key, value) in &self.headers {
            writeln!(out, "{}: {}", key, value)?;
        }
        writeln!(out)?;
        out.write_all(&self.body)
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(200)
    }
}

/// Canonical reason phrase for the status codes handlers produce.
pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Escape text for interpolation into HTML element content or attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(response: &Response) -> String {
        let mut out = Vec::new();
        response.write_to(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_ok_response_has_no_status_line() {
        let out = render(&Response::html(200, "<p>hi</p>\n"));
        assert_eq!(out, "Content-Type: text/html\n\n<p>hi</p>\n");
    }

    #[test]
    fn test_error_response_has_status_line() {
        let out = render(&Response::bad_request("nope"));
        assert!(out.starts_with("Status: 400 Bad Request\nContent-Type: text/html\n\n"));
        assert!(out.ends_with("<h1>Bad Request</h1>\n<p>nope</p>\n"));
    }

    #[test]
    fn test_headers_keep_insertion_order() {
        let response = Response::text(200, "x")
            .with_header("X-B", "2")
            .with_header("X-A", "1");
        assert_eq!(
            render(&response),
            "Content-Type: text/plain; charset=utf-8\nX-B: 2\nX-A: 1\n\nx"
        );
    }

    #[test]
    fn test_internal_error_escapes_message() {
        let response = Response::internal_error("<script>");
        assert_eq!(response.status, 500);
        assert!(render(&response).contains("<p>&lt;script&gt;</p>"));
    }

    #[test]
    fn test_unlisted_status_reason() {
        let out = render(&Response::html(404, ""));
        assert!(out.starts_with("Status: 404 Unknown\n"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }
}
