use std::borrow::Cow;

use cgi_handler_sdk::prelude::*;

use crate::config::EchoConfig;

/// Request echo handler
///
/// Renders an HTML page describing the request: method, content type, the
/// POST body (and its form fields when it is URL-encoded), and the request
/// related environment variables.
///
/// Example requests:
/// ```text
/// # Echo a GET
/// curl http://localhost/cgi-bin/request-echo
///
/// # Echo a form submission
/// curl -X POST http://localhost/cgi-bin/request-echo \
///   -H "Content-Type: application/x-www-form-urlencoded" \
///   -d 'a=1&b=2&b=3'
/// ```
pub fn handle(config: &EchoConfig, req: &Request) -> Response {
    Response::html(200, render(config, req))
}

/// Render the echo page body
pub fn render(config: &EchoConfig, req: &Request) -> String {
    let mut page = Page::new(config);

    page.line(format!("<h1>{}</h1>", config.title));
    page.line(format!("<p><strong>Method:</strong> {}</p>", page.value(&req.method)));
    page.line(format!(
        "<p><strong>Content-Type:</strong> {}</p>",
        page.value(&req.content_type)
    ));

    if req.method == "POST" {
        render_post(&mut page, req);
    } else {
        // every other verb lands here, not only GET
        page.line("<p>This is a GET request</p>");
    }

    render_environment(&mut page, &req.env);
    page.html
}

fn render_post(page: &mut Page<'_>, req: &Request) {
    let content_length = req.content_length.unwrap_or_default();
    page.line(format!("<p><strong>Content-Length:</strong> {}</p>", content_length));

    if content_length == 0 {
        page.line("<p>No POST data received</p>");
        return;
    }

    page.line("<p><strong>Raw POST Data:</strong></p>");
    page.line(format!("<pre>{}</pre>", page.value(&req.body_text())));

    if !req.is_form() {
        return;
    }

    match req.form() {
        Ok(fields) => {
            page.line("<p><strong>Parsed Form Data:</strong></p>");
            page.line("<ul>");
            for (name, value) in fields.pairs() {
                page.line(format!("<li>{}: {}</li>", page.value(name), page.value(value)));
            }
            page.line("</ul>");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to parse form data");
            page.line(format!(
                "<p>Error parsing form data: {}</p>",
                page.value(&e.to_string())
            ));
        }
    }
}

fn render_environment(page: &mut Page<'_>, env: &CgiEnv) {
    page.line("<h2>Environment Variables</h2>");
    page.line("<ul>");
    for (key, value) in env.echoable() {
        page.line(format!(
            "<li><strong>{}:</strong> {}</li>",
            page.value(key),
            page.value(value)
        ));
    }
    page.line("</ul>");
}

/// HTML output buffer
struct Page<'a> {
    config: &'a EchoConfig,
    html: String,
}

impl<'a> Page<'a> {
    fn new(config: &'a EchoConfig) -> Self {
        Self {
            config,
            html: String::new(),
        }
    }

    fn line(&mut self, line: impl AsRef<str>) {
        self.html.push_str(line.as_ref());
        self.html.push('\n');
    }

    /// A request-supplied value, escaped when configured.
    fn value<'v>(&self, text: &'v str) -> Cow<'v, str> {
        if self.config.escape_html {
            Cow::Owned(escape_html(text))
        } else {
            Cow::Borrowed(text)
        }
    }
}
