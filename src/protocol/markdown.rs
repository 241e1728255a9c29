//! Markdown variant of the protocol
//!
//! A light restructuring of the text layout: the document title becomes
//! an H1, all-caps section labels become H2s, `TOP <n>:` lines become
//! H3s and attendance bullets switch to Markdown list markers. Content
//! lines pass through untouched.

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::entity::SitzungData;
use crate::protocol::render_protocol;

pub fn render_markdown(data: &SitzungData, generated_at: DateTime<Utc>) -> String {
    let text = render_protocol(data, generated_at);
    restructure(&text)
}

fn restructure(text: &str) -> String {
    let top_line = Regex::new(r"^TOP \d+: ").expect("valid TOP pattern");
    let label_line = Regex::new(r"^[A-ZÄÖÜ][A-ZÄÖÜ ]*:").expect("valid label pattern");

    let mut out = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if index == 0 && line == "PROTOKOLL" {
            out.push(format!("# {}", line));
        } else if top_line.is_match(line) {
            out.push(format!("### {}", line));
        } else if label_line.is_match(line) {
            out.push(format!("## {}", line));
        } else if let Some(rest) = line.strip_prefix("• ") {
            out.push(format!("- {}", rest));
        } else {
            out.push(line.to_string());
        }
    }
    out.join("\n")
}
