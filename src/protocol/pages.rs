//! Paginated protocol layout
//!
//! Splits the rendered text into fixed-height pages. This structure is
//! what a page-rendering backend (PDF or print) consumes; actually
//! drawing the pages is outside this crate.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entity::SitzungData;
use crate::protocol::render_protocol;

pub const LINES_PER_PAGE: usize = 40;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolPage {
    pub number: usize,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolPages {
    pub title: String,
    pub total_pages: usize,
    pub pages: Vec<ProtocolPage>,
}

pub fn paginate(data: &SitzungData, generated_at: DateTime<Utc>) -> ProtocolPages {
    let text = render_protocol(data, generated_at);
    let lines: Vec<&str> = text.lines().collect();

    let mut pages = Vec::new();
    for (index, chunk) in lines.chunks(LINES_PER_PAGE).enumerate() {
        // Leading blank lines carry no meaning at a page break.
        let trimmed: Vec<String> = chunk
            .iter()
            .skip_while(|line| line.is_empty())
            .map(|line| line.to_string())
            .collect();
        pages.push(ProtocolPage {
            number: index + 1,
            lines: trimmed,
        });
    }

    if pages.is_empty() {
        pages.push(ProtocolPage {
            number: 1,
            lines: Vec::new(),
        });
    }

    ProtocolPages {
        title: data.title.clone(),
        total_pages: pages.len(),
        pages,
    }
}
