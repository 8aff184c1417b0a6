//! Structured reports posted to the report channel.
//!
//! A [`Report`] carries its items pre-split into sections of at most
//! [`SECTION_BUDGET`] characters so the channel adapter can render each
//! section as one embed field without further checks.

use serde::Serialize;

use crate::types::MemberId;

/// Maximum characters per report section.
pub const SECTION_BUDGET: usize = 1000;

/// Base URL of the public country page in the game client.
pub const COUNTRY_URL_BASE: &str = "https://app.warera.io/country";

/// A report ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub title: String,
    pub description: String,
    /// Heading repeated above every section.
    pub section_name: String,
    /// Newline-terminated item lines, each section within [`SECTION_BUDGET`].
    pub sections: Vec<String>,
    /// Number of items across all sections.
    pub total: usize,
}

impl Report {
    /// Members whose display name matched no game account.
    pub fn unidentified_members<'a, I>(members: I) -> Self
    where
        I: IntoIterator<Item = (MemberId, &'a str)>,
    {
        let lines: Vec<String> = members
            .into_iter()
            .map(|(id, name)| format!("* {name} ({id})"))
            .collect();

        Self::from_lines(
            "Unidentified Players Found",
            "The following members could not be matched:",
            "Players",
            &lines,
        )
    }

    /// Countries with a vacant government.
    pub fn takeover_countries<'a, I>(countries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let lines: Vec<String> = countries
            .into_iter()
            .map(|(name, id)| format!("* {name} ({COUNTRY_URL_BASE}/{id})"))
            .collect();

        Self::from_lines(
            "Takeover Countries Found",
            "The following countries can be captured:",
            "Countries",
            &lines,
        )
    }

    fn from_lines(title: &str, description: &str, section_name: &str, lines: &[String]) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            section_name: section_name.to_string(),
            sections: chunk_lines(lines, SECTION_BUDGET),
            total: lines.len(),
        }
    }
}

/// Pack lines into newline-joined groups of at most `budget` characters.
///
/// Lines are never split across groups and keep their order. A single line
/// longer than the budget is truncated so that its group still fits.
pub fn chunk_lines<S: AsRef<str>>(lines: &[S], budget: usize) -> Vec<String> {
    let mut groups = Vec::new();
    let mut chunk = String::new();
    let mut chunk_len = 0usize;

    for line in lines {
        let line = truncate_chars(line.as_ref(), budget.saturating_sub(1));
        let line_len = line.chars().count() + 1;

        if chunk_len > 0 && chunk_len + line_len > budget {
            groups.push(std::mem::take(&mut chunk));
            chunk_len = 0;
        }

        chunk.push_str(line);
        chunk.push('\n');
        chunk_len += line_len;
    }

    if !chunk.is_empty() {
        groups.push(chunk);
    }

    groups
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
