//! CGI request representation for handlers

use std::borrow::Cow;
use std::io::Read;

use crate::env::CgiEnv;
use crate::error::HandlerError;
use crate::form::{FormError, FormFields, FORM_URLENCODED};

/// Upper bound on the buffer reserved up front for a body; the rest grows on demand.
const INITIAL_BODY_CAPACITY: u64 = 64 * 1024;

/// Represents an incoming CGI request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// HTTP method (`REQUEST_METHOD`, "GET" when unset)
    pub method: String,

    /// Body media type (`CONTENT_TYPE`, empty when unset)
    pub content_type: String,

    /// Declared body length. Only interpreted for POST requests.
    pub content_length: Option<u64>,

    /// Raw request body, exactly `content_length` bytes
    pub body: Vec<u8>,

    /// Environment the request arrived with
    pub env: CgiEnv,
}

impl Request {
    /// Build a request from a CGI environment and the body stream.
    ///
    /// The stream is only touched for POST requests with a non-zero
    /// `CONTENT_LENGTH`, and never read past that length.
    ///
    /// # Example
    /// ```
    /// use cgi_handler_sdk::{CgiEnv, Request};
    ///
    /// let env: CgiEnv = [("REQUEST_METHOD", "POST"), ("CONTENT_LENGTH", "3")]
    ///     .into_iter()
    ///     .collect();
    /// let req = Request::from_cgi(env, &b"abcdef"[..]).unwrap();
    /// assert_eq!(req.body, b"abc");
    /// ```
    pub fn from_cgi<R: Read>(env: CgiEnv, input: R) -> Result<Self, HandlerError> {
        let method = env.get_or("REQUEST_METHOD", "GET").to_string();
        let content_type = env.get_or("CONTENT_TYPE", "").to_string();

        let mut content_length = None;
        let mut body = Vec::new();

        if method == "POST" {
            let length = parse_content_length(env.get("CONTENT_LENGTH"))?;
            if length > 0 {
                body = read_body(input, length)?;
            }
            content_length = Some(length);
        }

        Ok(Self {
            method,
            content_type,
            content_length,
            body,
            env,
        })
    }

    /// Body as text; invalid UTF-8 sequences become U+FFFD.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Check if the content type is exactly the URL-encoded form media type.
    pub fn is_form(&self) -> bool {
        self.content_type == FORM_URLENCODED
    }

    /// Parse the body as URL-encoded form fields.
    pub fn form(&self) -> Result<FormFields, FormError> {
        FormFields::parse(&self.body)
    }
}

fn parse_content_length(raw: Option<&str>) -> Result<u64, HandlerError> {
    match raw {
        None => Ok(0),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| HandlerError::InvalidContentLength(raw.to_string())),
    }
}

fn read_body<R: Read>(input: R, length: u64) -> Result<Vec<u8>, HandlerError> {
    let mut body = Vec::with_capacity(length.min(INITIAL_BODY_CAPACITY) as usize);
    input.take(length).read_to_end(&mut body)?;

    let received = body.len() as u64;
    if received < length {
        return Err(HandlerError::TruncatedBody {
            expected: length,
            received,
        });
    }
    Ok(body)
}

impl Default for Request {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            content_type: String::new(),
            content_length: None,
            body: Vec::new(),
            env: CgiEnv::default(),
        }
    }
}
