//! Shared HTML helpers: escaping, inline JSON, and the base document.

use serde::Serialize;

use super::styles::STYLE;

// ============================================================================
// Escaping
// ============================================================================

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Serialize a value for embedding inside a `<script>` element.
pub fn script_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}

// ============================================================================
// Base Template
// ============================================================================

pub fn base_html(title: &str, content: &str, script: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{style}</style>
</head>
<body>
    {content}
    <script>{script}</script>
</body>
</html>"#,
        title = html_escape(title),
        style = STYLE,
        content = content,
        script = script,
    )
}
