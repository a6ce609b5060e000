//! Markup flattening for report documents.
//!
//! Produces the plain text the matchers run against: one text run per
//! line, whitespace collapsed inside each run, everything lowercased.

use std::borrow::Cow;

/// Elements whose content is not document text.
const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

/// Decode raw bytes, replacing invalid UTF-8 sequences.
pub fn decode_lossy(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

/// Strip markup and return lowercased text, one run per line.
pub fn flatten_markup(html: &str) -> String {
    let mut runs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut rest = html;

    while let Some(pos) = rest.find('<') {
        current.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        match markup_len(tail) {
            Some(len) => {
                flush_run(&mut current, &mut runs);
                rest = &tail[len..];
            }
            None => {
                // A bare '<' in text, e.g. "a < b".
                current.push('<');
                rest = &tail[1..];
            }
        }
    }
    current.push_str(rest);
    flush_run(&mut current, &mut runs);

    runs.join("\n").to_lowercase()
}

/// Length of the markup construct at the start of `tail`, or `None` if the
/// leading '<' does not open one.
fn markup_len(tail: &str) -> Option<usize> {
    let after = &tail[1..];

    if after.starts_with("!--") {
        return Some(find_from(tail, "-->", 4).map_or(tail.len(), |end| end + 3));
    }

    let first = after.chars().next()?;
    if !(first.is_ascii_alphabetic() || matches!(first, '/' | '!' | '?')) {
        return None;
    }

    let close = tag_end(tail).map_or(tail.len(), |end| end + 1);
    let tag = &tail[1..close];
    let name = tag_name(tag);

    let opens_raw_text = first != '/'
        && !tag.trim_end_matches('>').ends_with('/')
        && RAW_TEXT_TAGS.contains(&name.as_str());

    if opens_raw_text {
        let end_tag = format!("</{}", name);
        let end = match find_ascii_ci(tail, &end_tag, close) {
            Some(start) => find_from(tail, ">", start).map_or(tail.len(), |e| e + 1),
            None => tail.len(),
        };
        return Some(end);
    }

    Some(close)
}

/// Byte offset of the '>' closing the tag at the start of `tail`.
/// A '>' inside a quoted attribute value does not close the tag.
fn tag_end(tail: &str) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, b) in tail.bytes().enumerate() {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => return Some(i),
            (None, _) => {}
        }
    }
    None
}

fn tag_name(tag: &str) -> String {
    tag.trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn find_from(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    haystack.get(from..)?.find(needle).map(|i| i + from)
}

/// ASCII case-insensitive search; `needle` must be ASCII.
fn find_ascii_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let hay = haystack.as_bytes();
    let pat = needle.as_bytes();
    if pat.is_empty() || hay.len() < pat.len() {
        return None;
    }

    (from..=hay.len() - pat.len()).find(|&i| hay[i..i + pat.len()].eq_ignore_ascii_case(pat))
}

fn flush_run(current: &mut String, runs: &mut Vec<String>) {
    if current.is_empty() {
        return;
    }
    let run = normalize_ws(&decode_entities(current));
    if !run.is_empty() {
        runs.push(run);
    }
    current.clear();
}

/// Collapse whitespace runs to a single space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// Decode the character references reports commonly contain.
/// Unknown references are kept verbatim.
pub fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        let decoded = tail
            .find(';')
            .filter(|&semi| semi > 1 && semi <= 10)
            .and_then(|semi| entity_char(&tail[1..semi]).map(|c| (c, semi + 1)));

        match decoded {
            Some((ch, len)) => {
                out.push(ch);
                rest = &tail[len..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn entity_char(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }

    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_splits_runs_on_tags() {
        let html = "<html><body><h1>Game  Review</h1><p>Turn 1:\n  <b>Discard</b> 5m</p></body></html>";
        assert_eq!(flatten_markup(html), "game review\nturn 1:\ndiscard\n5m");
    }

    #[test]
    fn test_flatten_skips_comments_scripts_and_styles() {
        let html = r#"<!doctype html><!-- turn --><style>td { color: red }</style>
<SCRIPT type="text/javascript">var turn = "mismatch";</SCRIPT><p>kept</p>"#;
        assert_eq!(flatten_markup(html), "kept");
    }

    #[test]
    fn test_flatten_keeps_bare_angle_brackets() {
        assert_eq!(flatten_markup("<p>a < b</p>"), "a < b");
        assert_eq!(flatten_markup("<p>3 <= 4</p>"), "3 <= 4");
    }

    #[test]
    fn test_flatten_unclosed_tag_drops_rest() {
        assert_eq!(flatten_markup("<p>text</p><div class="), "text");
        assert_eq!(flatten_markup("<p>text<script>turn"), "text");
    }

    #[test]
    fn test_flatten_ignores_gt_inside_attribute_values() {
        let html = r#"<div data-note="x > mismatch">ok</div><a title='a>b' href="/">link</a>"#;
        assert_eq!(flatten_markup(html), "ok\nlink");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a&amp;b &lt;c&gt;"), "a&b <c>");
        assert_eq!(decode_entities("&#24033; &#x5DE1;"), "巡 巡");
        assert_eq!(decode_entities("AT&T &unknown; &"), "AT&T &unknown; &");
        assert_eq!(normalize_ws(&decode_entities("turn&nbsp;1")), "turn 1");
    }

    #[test]
    fn test_decode_lossy_never_fails() {
        let text = decode_lossy(&[b't', 0xff, b'u', 0xfe]);
        assert!(text.starts_with('t'));
        assert!(text.ends_with('\u{fffd}'));
    }
}
