//! Minimal HTML building blocks shared by every page.
//!
//! Pages are assembled from strings; every value that came from a user or the
//! backend goes through [`escape`] exactly once, at the point it is embedded.

use crate::notice::Notice;

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;margin:0;color:#222}\
.top-nav{padding:10px;border-bottom:1px solid #ccc;margin-bottom:20px}\
.top-nav a{margin-right:15px}\
.container{max-width:1100px;margin:0 auto;padding:0 16px}\
.data-table{border-collapse:collapse;width:100%}\
.data-table th,.data-table td{border:1px solid #ddd;padding:6px;text-align:left}\
.error-message{background:#fde2e1;color:#8a1c1c;padding:10px;margin:10px 0}\
.notice{background:#e3f5e1;color:#1d5e1a;padding:10px;margin:10px 0}\
.button{display:inline-block;padding:6px 12px;border:1px solid #2a5db0;border-radius:4px;text-decoration:none;cursor:pointer}\
.button.primary{background:#2a5db0;color:#fff}\
.button.secondary{background:#fff;color:#2a5db0}\
.button.danger{background:#b02a2a;border-color:#b02a2a;color:#fff}\
.admin-nav{display:flex;flex-wrap:wrap;gap:8px;margin-bottom:16px}\
.form-group{margin-bottom:10px}\
.form-group label{display:block;font-weight:600}\
.promoter-card{border:1px solid #ddd;border-radius:6px;padding:12px;margin-bottom:10px}\
.detail-section-card{border:1px solid #eee;padding:8px;margin-top:8px}\
.inline{display:inline}";

/// Escapes text for use in element content and quoted attribute values.
#[must_use]
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Full document with the site-wide navigation bar.
#[must_use]
pub fn layout(title: &str, notice: Option<Notice>, body: &str) -> String {
    let mut page = String::new();
    page.push_str(&format!(
        "<!DOCTYPE html><html lang=\"es\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{} · Chispa</title><style>{STYLE}</style></head><body>\
         <nav class=\"top-nav\"><a href=\"/\">Listado de Visitas</a>\
         <a href=\"/admin\">Panel Admin</a><a href=\"/login\">Login</a></nav>\
         <main class=\"container\">",
        escape(title)
    ));
    if let Some(notice) = notice {
        page.push_str(&notice_banner(notice));
    }
    page.push_str(body);
    page.push_str("</main></body></html>");
    page
}

#[must_use]
pub fn notice_banner(notice: Notice) -> String {
    let class = if notice.is_error() {
        "error-message"
    } else {
        "notice"
    };
    format!("<div class=\"{class}\">{}</div>", escape(notice.message()))
}

#[must_use]
pub fn error_banner(message: &str) -> String {
    format!("<div class=\"error-message\">{}</div>", escape(message))
}

/// A table with escaped headers and pre-rendered row cells.
#[must_use]
pub fn data_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::from("<table class=\"data-table\"><thead><tr>");
    for header in headers {
        out.push_str(&format!("<th>{}</th>", escape(header)));
    }
    out.push_str("</tr></thead><tbody>");
    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            out.push_str(&format!("<td>{cell}</td>"));
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
    out
}

pub struct Input<'a> {
    pub name: &'a str,
    pub label: &'a str,
    pub value: &'a str,
    pub kind: &'a str,
    pub required: bool,
}

impl<'a> Input<'a> {
    #[must_use]
    pub fn text(name: &'a str, label: &'a str, value: &'a str) -> Self {
        Self {
            name,
            label,
            value,
            kind: "text",
            required: false,
        }
    }

    #[must_use]
    pub fn kind(mut self, kind: &'a str) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "<div class=\"form-group\"><label for=\"{name}\">{label}</label>\
             <input id=\"{name}\" name=\"{name}\" type=\"{kind}\" value=\"{value}\"{required}></div>",
            name = escape(self.name),
            label = escape(self.label),
            kind = escape(self.kind),
            value = escape(self.value),
            required = if self.required { " required" } else { "" },
        )
    }
}

#[must_use]
pub fn textarea(name: &str, label: &str, value: &str) -> String {
    format!(
        "<div class=\"form-group\"><label for=\"{name}\">{label}</label>\
         <textarea id=\"{name}\" name=\"{name}\" rows=\"3\">{value}</textarea></div>",
        name = escape(name),
        label = escape(label),
        value = escape(value),
    )
}

/// A `<select>`; `options` are `(value, label)` pairs.
#[must_use]
pub fn select(name: &str, label: &str, options: &[(String, String)], selected: &str) -> String {
    let mut out = format!(
        "<div class=\"form-group\"><label for=\"{name}\">{label}</label>\
         <select id=\"{name}\" name=\"{name}\">",
        name = escape(name),
        label = escape(label),
    );
    for (value, text) in options {
        out.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>",
            escape(value),
            if value == selected { " selected" } else { "" },
            escape(text)
        ));
    }
    out.push_str("</select></div>");
    out
}

#[must_use]
pub fn checkbox(name: &str, label: &str, checked: bool) -> String {
    format!(
        "<div class=\"form-group\"><label><input type=\"checkbox\" name=\"{}\"{}> {}</label></div>",
        escape(name),
        if checked { " checked" } else { "" },
        escape(label)
    )
}

/// A one-button form that posts to `action`, asking first when `confirm` is set.
#[must_use]
pub fn post_button(action: &str, label: &str, class: &str, confirm: Option<&str>) -> String {
    let onsubmit = confirm
        .map(|msg| format!(" onsubmit=\"return confirm('{}')\"", escape(msg)))
        .unwrap_or_default();
    format!(
        "<form class=\"inline\" method=\"post\" action=\"{}\"{onsubmit}>\
         <button type=\"submit\" class=\"button {}\">{}</button></form>",
        escape(action),
        escape(class),
        escape(label)
    )
}
