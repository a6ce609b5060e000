//! HTML index generation.
//!
//! This module renders the browsable index page from collected month
//! entries. The output is a single static document: inline styles, no
//! scripts, and no timestamps, so unchanged inputs render identically.

use crate::config::{IndexConfig, PageLanguage};
use crate::models::{GameRow, IndexEntry, MonthSummary};
use chrono::NaiveDate;

const STYLE: &str = "\
body{font-family:sans-serif;max-width:900px;margin:2rem auto;padding:0 1rem}
h1{margin-bottom:.2rem}
.card{border:1px solid #ddd;border-radius:10px;padding:1rem;margin:.8rem 0}
small{color:#666}
table{width:100%;border-collapse:collapse}
th,td{border-bottom:1px solid #eee;padding:.4rem .2rem;text-align:right}
th:first-child,td:first-child{text-align:left}
.rate{font-weight:bold}
";

/// Fixed page text in one language.
struct Labels {
    lang: &'static str,
    generated_by: &'static str,
    no_months: &'static str,
    games: &'static str,
    total_decisions: &'static str,
    mismatches: &'static str,
    mismatch_rate: &'static str,
    game_id: &'static str,
    decisions: &'static str,
}

const ENGLISH: Labels = Labels {
    lang: "en",
    generated_by: "Generated by review-trends",
    no_months: "No months found.",
    games: "Games",
    total_decisions: "Decisions",
    mismatches: "Mismatches",
    mismatch_rate: "Mismatch rate",
    game_id: "Game",
    decisions: "Decisions",
};

const JAPANESE: Labels = Labels {
    lang: "ja",
    generated_by: "自動生成: review-trends",
    no_months: "月別データがありません。",
    games: "対局数",
    total_decisions: "総手数",
    mismatches: "不一致",
    mismatch_rate: "不一致率",
    game_id: "対局ID",
    decisions: "手数",
};

fn labels(language: PageLanguage) -> &'static Labels {
    match language {
        PageLanguage::En => &ENGLISH,
        PageLanguage::Ja => &JAPANESE,
    }
}

/// Generate the complete index page.
pub fn generate_index_html(entries: &[IndexEntry], config: &IndexConfig) -> String {
    let text = labels(config.language);
    let title = escape_html(&config.title);
    let mut output = String::new();

    output.push_str(&format!(
        "<!doctype html>\n<html lang=\"{}\">\n<head>\n",
        text.lang
    ));
    output.push_str("<meta charset=\"utf-8\">\n");
    output.push_str(&format!("<title>{}</title>\n", title));
    output.push_str(&format!("<style>\n{}</style>\n", STYLE));
    output.push_str("</head>\n<body>\n");
    output.push_str(&format!("<h1>{}</h1>\n", title));
    output.push_str(&format!("<p><small>{}</small></p>\n", text.generated_by));

    if entries.is_empty() {
        output.push_str(&format!("<p>{}</p>\n", text.no_months));
    }

    for entry in entries {
        output.push_str(&generate_month_section(entry, config.language));
    }

    output.push_str("</body>\n</html>\n");
    output
}

/// Generate the card for one month.
fn generate_month_section(entry: &IndexEntry, language: PageLanguage) -> String {
    let text = labels(language);
    let mut section = String::new();
    let name = escape_html(&entry.month_name);

    section.push_str("<div class=\"card\">\n");
    match month_label(&entry.month_name, language) {
        Some(label) => section.push_str(&format!("  <h2>{} <small>{}</small></h2>\n", name, label)),
        None => section.push_str(&format!("  <h2>{}</h2>\n", name)),
    }

    if let Some(ref summary) = entry.summary {
        section.push_str(&generate_summary_line(summary, text));
    }

    section.push_str("  <table>\n");
    section.push_str(&format!(
        "    <tr><th>{}</th><th>{}</th><th>{}</th><th>{}</th></tr>\n",
        text.game_id, text.decisions, text.mismatches, text.mismatch_rate
    ));
    for game in &entry.games {
        section.push_str(&generate_game_row(&entry.month_name, game));
    }
    section.push_str("  </table>\n</div>\n");

    section
}

/// Generate the aggregate line shown under a month heading.
fn generate_summary_line(summary: &MonthSummary, text: &Labels) -> String {
    format!(
        "  <p>{}: {} / {}: {} / {}: {} / {}: <span class=\"rate\">{}</span></p>\n",
        text.games,
        summary.games,
        text.total_decisions,
        summary.total_decisions,
        text.mismatches,
        summary.mismatches,
        text.mismatch_rate,
        format_percent(summary.mismatch_rate)
    )
}

/// Generate one table row linking to the game's report.
fn generate_game_row(month: &str, game: &GameRow) -> String {
    format!(
        "    <tr><td><a href=\"{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
        report_href(month, &game.id),
        escape_html(&game.id),
        game.total,
        game.mism,
        format_percent(game.rate)
    )
}

/// Relative link to a game's report, each path segment percent-encoded.
pub fn report_href(month: &str, game_id: &str) -> String {
    format!(
        "{}/{}/index.html",
        urlencoding::encode(month),
        urlencoding::encode(game_id)
    )
}

/// Format a rate as a percentage with one decimal place.
pub fn format_percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Human label for `YYYYMM` month names, e.g. "January 2025" or "2025年1月".
pub fn month_label(name: &str, language: PageLanguage) -> Option<String> {
    if name.len() != 6 || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year: i32 = name[..4].parse().ok()?;
    let month: u32 = name[4..].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, 1)?;
    let format = match language {
        PageLanguage::En => "%B %Y",
        PageLanguage::Ja => "%Y年%-m月",
    };
    Some(date.format(format).to_string())
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
