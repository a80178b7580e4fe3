//! CGI Handler SDK - Types and utilities for writing CGI request handlers
//!
//! This crate provides the request/response types a handler works with and
//! the plumbing that connects them to the CGI process contract.

pub mod cgi;
pub mod env;
pub mod error;
pub mod form;
pub mod request;
pub mod response;

pub mod prelude {
    //! Common imports for CGI handlers
    pub use crate::cgi::{init_logging, read_request, send_response};
    pub use crate::env::CgiEnv;
    pub use crate::error::HandlerError;
    pub use crate::form::{FormError, FormFields, FORM_URLENCODED};
    pub use crate::request::Request;
    pub use crate::response::{escape_html, Response};
}

// Re-export key types at crate root
pub use env::CgiEnv;
pub use error::HandlerError;
pub use form::FormFields;
pub use request::Request;
pub use response::Response;
