//! Process boundary for CGI handlers.
//!
//! The web server starts the handler once per request: request metadata comes
//! in through environment variables, the body through stdin, and whatever is
//! written to stdout becomes the HTTP response. Diagnostics go to stderr,
//! which servers route to their error log.
//!
//! # Example
//! ```ignore
//! use cgi_handler_sdk::prelude::*;
//!
//! fn main() -> std::process::ExitCode {
//!     init_logging();
//!     let response = match read_request() {
//!         Ok(req) => Response::html(200, format!("<p>{}</p>\n", req.method)),
//!         Err(e) => e.to_response(),
//!     };
//!     match send_response(&response) {
//!         Ok(()) => std::process::ExitCode::SUCCESS,
//!         Err(_) => std::process::ExitCode::FAILURE,
//!     }
//! }
//! ```

use std::io::{self, Write};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{CgiEnv, HandlerError, Request, Response};

/// Log filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Install the stderr log subscriber.
///
/// stdout carries the response, so logs must never go there. Calling this
/// more than once is harmless.
pub fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(false),
        )
        .try_init();
}

/// Read the request from the process environment and stdin
pub fn read_request() -> Result<Request, HandlerError> {
    let env = CgiEnv::from_process();
    let stdin = io::stdin();
    let request = Request::from_cgi(env, stdin.lock())?;

    tracing::debug!(
        method = %request.method,
        content_type = %request.content_type,
        content_length = ?request.content_length,
        "Request received"
    );
    Ok(request)
}

/// Send a response to stdout (received by the web server)
pub fn send_response(response: &Response) -> Result<(), HandlerError> {
    let stdout = io::stdout();
    write_response(response, stdout.lock())
}

/// Write a response in CGI framing and flush the writer.
pub fn write_response<W: Write>(response: &Response, mut out: W) -> Result<(), HandlerError> {
    response.write_to(&mut out)?;
    out.flush()?;
    Ok(())
}
