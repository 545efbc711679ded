//! # Result Cards
//!
//! Turns a [`LookupOutcome`] into one card per record, as an HTML fragment for
//! the web page or as plain text for the terminal. Missing optional fields get
//! placeholders; AI-generated records get a badge.

use crate::catalog::TechnologyRecord;
use crate::lookup::normalize::is_web_url;
use crate::lookup::LookupOutcome;
use std::fmt::Write;

pub const YEAR_PLACEHOLDER: &str = "Not provided";
pub const LINK_PLACEHOLDER: &str = "#";
pub const AI_BADGE: &str = "(AI generated)";

/// Escape text for HTML element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

fn year_text(record: &TechnologyRecord) -> String {
    record
        .year_created
        .map(|y| y.to_string())
        .unwrap_or_else(|| YEAR_PLACEHOLDER.to_string())
}

pub fn render_html(outcome: &LookupOutcome) -> String {
    if let Some(message) = outcome.message() {
        return format!("<p>{}</p>", escape_html(message));
    }

    let ai_generated = outcome.is_ai_generated();
    let mut html = String::new();
    for record in outcome.records() {
        html.push_str(&html_card(record, ai_generated));
    }
    html
}

fn html_card(record: &TechnologyRecord, ai_generated: bool) -> String {
    let name = escape_html(&record.name);
    let mut card = String::from("<article class=\"card\">\n");

    // Catalog files can be edited by hand, so URLs are checked again here.
    if let Some(logo) = record.logo.as_deref().filter(|l| is_web_url(l)) {
        let _ = writeln!(
            card,
            "  <div class=\"card-logo-container\"><img src=\"{}\" alt=\"Logo of {}\" class=\"card-logo\"></div>",
            escape_html(logo),
            name
        );
    }

    let badge = if ai_generated {
        format!(" <span class=\"ai-badge\">{}</span>", AI_BADGE)
    } else {
        String::new()
    };

    let _ = writeln!(card, "  <div class=\"card-content\">");
    let _ = writeln!(card, "    <h2>{}{}</h2>", name, badge);
    let _ = writeln!(
        card,
        "    <p><strong>Year created:</strong> {}</p>",
        year_text(record)
    );
    let _ = writeln!(card, "    <p>{}</p>", escape_html(&record.description));
    let _ = writeln!(
        card,
        "    <a href=\"{}\" target=\"_blank\">Learn more...</a>",
        escape_html(
            record
                .link
                .as_deref()
                .filter(|l| is_web_url(l))
                .unwrap_or(LINK_PLACEHOLDER)
        )
    );
    card.push_str("  </div>\n</article>\n");
    card
}

pub fn render_text(outcome: &LookupOutcome) -> String {
    if let Some(message) = outcome.message() {
        return format!("{}\n", message);
    }

    let ai_generated = outcome.is_ai_generated();
    let mut text = String::new();
    for record in outcome.records() {
        if ai_generated {
            let _ = writeln!(text, "{} {}", record.name, AI_BADGE);
        } else {
            let _ = writeln!(text, "{}", record.name);
        }
        let _ = writeln!(text, "  Year created: {}", year_text(record));
        if !record.description.is_empty() {
            let _ = writeln!(text, "  {}", record.description);
        }
        let _ = writeln!(
            text,
            "  {}",
            record.link.as_deref().unwrap_or(LINK_PLACEHOLDER)
        );
        text.push('\n');
    }
    text
}
