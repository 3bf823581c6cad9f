//! Error report rendering
//!
//! Presentation helpers over an `ErrorList`. Every format keeps the order in
//! which the checks recorded their failures.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IntakeError;
use crate::models::ErrorList;

/// Output formats for an error report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorFormat {
    /// HTML-escaped messages, each followed by `<br />`
    Html,
    /// Backslash-escaped messages joined by newlines
    #[default]
    EscapedText,
    /// JSON object from error code to message
    Json,
    /// Script array literal of single-quoted messages
    JsArray,
    /// Plain messages joined by newlines
    Text,
    /// One `CODE<TAB>message` line per error
    Raw,
}

impl ErrorFormat {
    pub const ALL: [ErrorFormat; 6] = [
        ErrorFormat::Html,
        ErrorFormat::EscapedText,
        ErrorFormat::Json,
        ErrorFormat::JsArray,
        ErrorFormat::Text,
        ErrorFormat::Raw,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorFormat::Html => "html",
            ErrorFormat::EscapedText => "escaped_text",
            ErrorFormat::Json => "json",
            ErrorFormat::JsArray => "js_array",
            ErrorFormat::Text => "text",
            ErrorFormat::Raw => "raw",
        }
    }
}

impl FromStr for ErrorFormat {
    type Err = IntakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        ErrorFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == normalized)
            .ok_or_else(|| {
                IntakeError::InvalidConfig(format!(
                    "Unknown error format '{}' (expected one of: html, escaped_text, json, js_array, text, raw)",
                    s
                ))
            })
    }
}

impl Display for ErrorFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl ErrorList {
    /// Render the report in `format`; an empty list renders as the empty
    /// value of that format (`""`, `{}` or `[]`)
    pub fn render(&self, format: ErrorFormat) -> String {
        match format {
            ErrorFormat::Html => self
                .messages()
                .map(|message| format!("{}<br />\n", escape_html(message)))
                .collect(),
            ErrorFormat::EscapedText => self
                .messages()
                .map(add_slashes)
                .collect::<Vec<_>>()
                .join("\n"),
            ErrorFormat::Json => {
                serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
            }
            ErrorFormat::JsArray => {
                let items: Vec<String> = self
                    .messages()
                    .map(|message| format!("'{}'", add_slashes(message)))
                    .collect();
                format!("[{}]", items.join(","))
            }
            ErrorFormat::Text => self.messages().collect::<Vec<_>>().join("\n"),
            ErrorFormat::Raw => self
                .iter()
                .map(|issue| format!("{}\t{}", issue.kind.code(), issue.message))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Escape the five HTML-significant characters
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Backslash-escape quotes, backslashes and NUL
pub fn add_slashes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\'' | '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\0' => out.push_str("\\0"),
            _ => out.push(c),
        }
    }
    out
}
