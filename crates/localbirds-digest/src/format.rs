//! Digest rendering: an HTML table for email and a compact Markdown list for
//! Telegram.

use std::fmt::Write as _;

use localbirds_core::{AppConfig, FilterMode, ObservationResult, QueryPoint};

const EMPTY_DIGEST: &str = "No observations found.";

const HTML_HEADERS: [&str; 9] = [
    "From",
    "Species",
    "Distance",
    "How Many",
    "Date",
    "Location",
    "Comments",
    "Photos",
    "eBird Link",
];

/// One-line summary of what a run searched for, used as the digest header.
#[must_use]
pub fn filter_description(config: &AppConfig, points: &[QueryPoint]) -> String {
    let labels = points
        .iter()
        .map(|p| p.label.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let days = match config.days_back {
        1 => "the last day".to_string(),
        n => format!("the last {n} days"),
    };

    match config.filter_mode {
        FilterMode::Species => {
            let species = config.species_codes.join(", ");
            match (&config.region_code, points.first()) {
                (Some(region), Some(first)) => format!(
                    "Sightings of {species} in {region} over {days} (distances from {})",
                    first.label
                ),
                (Some(region), None) => {
                    format!("Sightings of {species} in {region} over {days}")
                }
                (None, _) => format!(
                    "Sightings of {species} within {} miles of {labels} over {days}",
                    config.max_distance_miles
                ),
            }
        }
        FilterMode::Notable => {
            let mut text = format!(
                "Notable sightings within {} miles of {labels} over {days}",
                config.max_distance_miles
            );
            if !config.additional_species_codes.is_empty() {
                let _ = write!(text, ", plus {}", config.additional_species_codes.join(", "));
            }
            text
        }
    }
}

/// Renders the digest as an HTML fragment with one table row per result.
#[must_use]
pub fn render_html(results: &[ObservationResult], description: &str) -> String {
    let mut html = format!("<p>{}</p>\n", escape_html(description));

    if results.is_empty() {
        let _ = writeln!(html, "<p>{EMPTY_DIGEST}</p>");
        return html;
    }

    html.push_str("<table>\n<tr>");
    for header in HTML_HEADERS {
        let _ = write!(html, "<th>{header}</th>");
    }
    html.push_str("</tr>\n");

    for r in results {
        let photo = if r.has_photo { "\u{2705}" } else { "\u{274c}" };
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{} mi</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{photo}</td><td><a href=\"{}\">checklist</a></td></tr>",
            escape_html(&r.origin),
            escape_html(&r.species),
            r.distance_miles,
            r.count,
            r.observed_at.format("%Y-%m-%d %H:%M"),
            escape_html(&r.location_name),
            escape_html(r.comment.as_deref().unwrap_or("")),
            escape_html(&r.checklist_url),
        );
    }

    html.push_str("</table>\n");
    html
}

/// Renders the digest as Telegram (legacy) Markdown.
///
/// Each result is a linked `MM/DD Species` line followed by its location,
/// distance, and origin.
#[must_use]
pub fn render_markdown(results: &[ObservationResult], description: &str) -> String {
    let mut md = format!("*{}*\n\n", escape_markdown(description));

    if results.is_empty() {
        let _ = writeln!(md, "{EMPTY_DIGEST}");
        return md;
    }

    for r in results {
        let _ = write!(
            md,
            "[{} {} \u{1f517}]({})\n\u{1f4cd}{} ({} mi from {})\n\n",
            r.observed_at.format("%m/%d"),
            escape_markdown(&r.species),
            r.checklist_url,
            escape_markdown(&r.location_name),
            r.distance_miles,
            escape_markdown(&r.origin),
        );
    }
    md
}

fn escape_html(text: &str) -> String {
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

// Telegram's legacy Markdown only treats these four as entity markers.
fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
