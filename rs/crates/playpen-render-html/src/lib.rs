//! playpen-render-html — Compose snippets into renderable HTML documents
//!
//! The composer is a pure textual splice: CSS goes into a `<style>` block in
//! `<head>`, the HTML goes into `<body>` followed by a `<script>` block with the
//! JS. Nothing is escaped or validated. Isolation is the job of the rendering
//! surface, which is why [`render_frame`] hosts the document in a sandboxed
//! iframe.

use playpen_snippet::{Snippet, SourceKind};

/// Sandbox policy applied to the preview iframe.
pub const SANDBOX_POLICY: &str = "allow-scripts allow-forms allow-same-origin";

/// Compose a snippet into a single document string.
pub fn compose_document(snippet: &Snippet) -> String {
    let mut buf = String::with_capacity(
        snippet.html.len() + snippet.css.len() + snippet.js.len() + 128,
    );
    compose_into(snippet, &mut buf);
    buf
}

/// Compose a snippet into `buf`, replacing its contents.
pub fn compose_into(snippet: &Snippet, buf: &mut String) {
    buf.clear();
    buf.push_str("<html>\n<head><style>");
    buf.push_str(&snippet.css);
    buf.push_str("</style></head>\n<body>\n");
    buf.push_str(&snippet.html);
    buf.push_str("\n<script>");
    buf.push_str(&snippet.js);
    buf.push_str("</script>\n</body>\n</html>");
}

/// Options for the page that hosts a composed preview.
pub struct FrameOptions {
    pub title: Option<String>,
    /// Overrides [`SANDBOX_POLICY`]
    pub sandbox: Option<String>,
    /// Link shown above the frame (e.g. the share URL of a saved snippet)
    pub share_url: Option<String>,
    /// Sources to show next to the frame; `None` renders the preview alone
    pub sources: Option<Snippet>,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            title: Some("Live Preview".to_string()),
            sandbox: None,
            share_url: None,
            sources: None,
        }
    }
}

/// Render a full host page embedding `document` in a sandboxed iframe.
///
/// The document travels in the `srcdoc` attribute, so it is attribute-escaped
/// there and comes back out byte-for-byte when the browser parses it.
pub fn render_frame(document: &str, opts: &FrameOptions) -> String {
    let mut html = String::with_capacity(document.len() * 2 + 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\" />\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n");
    if let Some(title) = &opts.title {
        html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    }
    html.push_str("<style>html, body { margin: 0; height: 100%; } iframe { border: 0; width: 100%; height: 100%; } \
        .panes.side { display: flex; height: 100%; } .panes.side > * { flex: 1; overflow: auto; }</style>\n");
    html.push_str("</head>\n<body>\n");

    if let Some(url) = &opts.share_url {
        html.push_str(&format!(
            "<p class=\"share\"><a href=\"{}\">{}</a></p>\n",
            escape_attr(url),
            escape_html(url)
        ));
    }

    let layout = if opts.sources.is_some() { "side" } else { "full" };
    html.push_str(&format!("<div class=\"panes {}\">\n", layout));

    // Read-only source panes
    if let Some(sources) = &opts.sources {
        html.push_str("<div class=\"editors\">\n");
        for kind in SourceKind::ALL {
            html.push_str(&format!(
                "<label>{}</label>\n<pre data-source=\"{}\">{}</pre>\n",
                source_label(kind),
                kind,
                escape_html(sources.source(kind))
            ));
        }
        html.push_str("</div>\n");
    }

    let sandbox = opts.sandbox.as_deref().unwrap_or(SANDBOX_POLICY);
    let title = opts.title.as_deref().unwrap_or("Live Preview");
    html.push_str(&format!(
        "<iframe title=\"{}\" sandbox=\"{}\" srcdoc=\"{}\"></iframe>\n",
        escape_attr(title),
        escape_attr(sandbox),
        escape_attr(document)
    ));
    html.push_str("</div>\n");

    html.push_str("</body>\n</html>");
    html
}

fn source_label(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Html => "HTML",
        SourceKind::Css => "CSS",
        SourceKind::Js => "JavaScript",
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
