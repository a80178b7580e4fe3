//! request-echo - CGI program that echoes the request back as HTML
//!
//! Install it in the web server's CGI directory. Every invocation handles
//! exactly one request and exits.

mod config;
mod handler;

use std::process::ExitCode;

use anyhow::{Context, Result};
use cgi_handler_sdk::prelude::*;

use crate::config::EchoConfig;

fn main() -> ExitCode {
    init_logging();

    match run() {
        Ok(code) => code,
        Err(e) => {
            // stdout is gone, the server's error log is all that is left
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let (response, code) = match read_request() {
        Ok(request) => {
            let config = EchoConfig::from_env(&request.env);
            tracing::debug!(?config, "Configuration loaded");
            (handler::handle(&config, &request), ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::error!(error = %e, status = e.status_code(), "Rejecting request");
            (e.to_response(), ExitCode::FAILURE)
        }
    };

    send_response(&response).context("failed to write response to stdout")?;
    Ok(code)
}
