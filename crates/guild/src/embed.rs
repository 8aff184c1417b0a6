//! Discord embed rendering of reports.
//!
//! Discord rejects an embed with more than [`MAX_EMBED_FIELDS`] fields or
//! more than [`MAX_EMBED_CHARS`] characters across title, description,
//! field names, field values and footer. A report is therefore split into
//! as many embeds as needed, each posted as its own message.

use chrono::{DateTime, Utc};
use serde::Serialize;
use warbot_core::report::Report;

/// Discord's "orange" embed colour.
pub const REPORT_COLOR: u32 = 0xE67E22;

/// Maximum number of fields in one embed.
pub const MAX_EMBED_FIELDS: usize = 25;

/// Maximum characters counted across one embed.
pub const MAX_EMBED_CHARS: usize = 6000;

#[derive(Debug, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    /// Only the last embed of a report carries the total.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

/// Body of `POST /channels/{id}/messages`.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub embeds: Vec<Embed>,
}

impl Embed {
    /// Characters Discord counts toward [`MAX_EMBED_CHARS`].
    pub fn char_count(&self) -> usize {
        self.title.chars().count()
            + self.description.chars().count()
            + self
                .fields
                .iter()
                .map(|f| f.name.chars().count() + f.value.chars().count())
                .sum::<usize>()
            + self.footer.as_ref().map_or(0, |f| f.text.chars().count())
    }

    /// Render `report` as one or more embeds within Discord's limits.
    ///
    /// Every embed repeats the title and description; sections are never
    /// split and keep their order. The `Total: N` footer goes on the last
    /// embed. A report without sections still yields one embed.
    pub fn from_report(report: &Report, timestamp: DateTime<Utc>) -> Vec<Embed> {
        let footer = format!("Total: {}", report.total);
        // Reserve room for the footer on every page so the last one fits too.
        let base = report.title.chars().count()
            + report.description.chars().count()
            + footer.chars().count();
        let name_len = report.section_name.chars().count();

        let new_embed = || Embed {
            title: report.title.clone(),
            description: report.description.clone(),
            color: REPORT_COLOR,
            fields: Vec::new(),
            footer: None,
            timestamp,
        };

        let mut embeds = Vec::new();
        let mut current = new_embed();
        let mut used = base;

        for section in &report.sections {
            let cost = name_len + section.chars().count();
            let full = current.fields.len() == MAX_EMBED_FIELDS || used + cost > MAX_EMBED_CHARS;
            if full && !current.fields.is_empty() {
                embeds.push(std::mem::replace(&mut current, new_embed()));
                used = base;
            }

            current.fields.push(EmbedField {
                name: report.section_name.clone(),
                value: section.clone(),
                inline: false,
            });
            used += cost;
        }

        current.footer = Some(EmbedFooter { text: footer });
        embeds.push(current);
        embeds
    }
}
