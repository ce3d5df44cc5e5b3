//! Server-side view rendering for STACKS.
//!
//! Handlers hand a [`View`] (a logical template identifier plus a
//! named-value bag) to this module, which renders it into a minimal HTML
//! page. The bag is ordinary `serde_json`, so any serializable model slots in
//! without a dedicated view type.

use axum::response::{Html, IntoResponse, Response};
use serde::Serialize;
use serde_json::{Map, Value};

/// A renderable page: logical template id, page title, and context bag.
#[derive(Debug, Clone)]
pub struct View {
    template: &'static str,
    title: String,
    context: Map<String, Value>,
}

impl View {
    pub fn new(template: &'static str, title: impl Into<String>) -> Self {
        Self {
            template,
            title: title.into(),
            context: Map::new(),
        }
    }

    /// Add a named value to the context bag.
    pub fn with(mut self, key: &str, value: impl Serialize) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.context.insert(key.to_string(), value);
            }
            Err(e) => {
                tracing::warn!(template = self.template, key, %e, "unserializable view value");
                self.context.insert(key.to_string(), Value::Null);
            }
        }
        self
    }

    pub fn template(&self) -> &'static str {
        self.template
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn context(&self) -> &Map<String, Value> {
        &self.context
    }

    /// Render the view into an HTML document.
    pub fn render(&self) -> String {
        let mut body = format!("<section data-template=\"{}\">\n", self.template);
        for (key, value) in &self.context {
            body.push_str(&format!("<h2>{}</h2>\n", escape_html(key)));
            render_value(value, &mut body);
        }
        body.push_str("</section>");

        page_shell(&self.title, &body)
    }
}

impl IntoResponse for View {
    fn into_response(self) -> Response {
        Html(self.render()).into_response()
    }
}

/// Wrap a rendered body in the shared document shell.
pub fn page_shell(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n{body}\n</body>\n</html>\n",
        title = escape_html(title),
        body = body,
    )
}

/// Escape text for inclusion in HTML.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

fn render_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("<p class=\"empty\">—</p>\n"),
        Value::Bool(b) => out.push_str(&format!("<p>{b}</p>\n")),
        Value::Number(n) => out.push_str(&format!("<p>{n}</p>\n")),
        Value::String(s) => out.push_str(&format!("<p>{}</p>\n", escape_html(s))),
        Value::Array(items) => {
            out.push_str("<ul>\n");
            for item in items {
                out.push_str("<li>");
                render_value(item, out);
                out.push_str("</li>\n");
            }
            out.push_str("</ul>\n");
        }
        Value::Object(map) => {
            out.push_str("<dl>\n");
            for (key, value) in map {
                out.push_str(&format!("<dt>{}</dt>\n<dd>", escape_html(key)));
                render_value(value, out);
                out.push_str("</dd>\n");
            }
            out.push_str("</dl>\n");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn escape_covers_html_metacharacters() {
        assert_eq!(
            escape_html("<b>\"O'Brien\" & sons</b>"),
            "&lt;b&gt;&quot;O&#x27;Brien&quot; &amp; sons&lt;/b&gt;"
        );
    }

    #[test]
    fn view_renders_template_marker_and_context() {
        let html = View::new("genre_detail", "Genre Detail")
            .with("genre", json!({"name": "Fantasy"}))
            .with("genre_books", json!([{"title": "A"}, {"title": "B"}]))
            .render();

        assert!(html.contains("data-template=\"genre_detail\""));
        assert!(html.contains("<title>Genre Detail</title>"));
        assert!(html.contains("Fantasy"));
        assert!(html.contains("<ul>"));
    }

    #[test]
    fn context_strings_are_escaped_in_output() {
        let html = View::new("genre_form", "Create Genre")
            .with("genre", json!({"name": "<script>alert(1)</script>"}))
            .render();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
