//! HTML to plain text conversion for syllabus bodies.
//!
//! Every text node becomes its own line, so content from separate blocks
//! (table cells, list items, paragraphs) stays on separate lines for the
//! windowed scanner. Comments and `<script>`/`<style>` contents are dropped,
//! character references are decoded, and whitespace-only nodes are skipped.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Regex for character references (`&amp;`, `&#8211;`, `&#x2013;`).
static ENTITY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z][a-zA-Z0-9]*);").expect("Invalid entity regex")
});

/// Elements whose contents are not text.
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Converts an HTML fragment to newline-separated text.
///
/// # Example
///
/// ```
/// use deadlinesync_core::html_to_text;
///
/// let text = html_to_text("<p>Final Exam</p><p>Dec 11 &amp; 12</p>");
/// assert_eq!(text, "Final Exam\nDec 11 & 12");
/// ```
pub fn html_to_text(html: &str) -> String {
    let mut segments: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut rest = html;

    while let Some(pos) = rest.find('<') {
        current.push_str(&rest[..pos]);
        let markup = &rest[pos..];
        match skip_markup(markup) {
            Some(after) => {
                flush(&mut current, &mut segments);
                rest = after;
            }
            None => {
                current.push('<');
                rest = &markup[1..];
            }
        }
    }
    current.push_str(rest);
    flush(&mut current, &mut segments);

    segments.join("\n")
}

/// Moves the buffered text node into `segments`, decoded.
fn flush(current: &mut String, segments: &mut Vec<String>) {
    if !current.trim().is_empty() {
        segments.push(decode_entities(current));
    }
    current.clear();
}

/// Skips one piece of markup starting at `<`.
///
/// Returns the remaining input, or `None` if the `<` does not open markup
/// (as in `a < b`).
fn skip_markup(markup: &str) -> Option<&str> {
    if let Some(body) = markup.strip_prefix("<!--") {
        return Some(body.find("-->").map_or("", |end| &body[end + 3..]));
    }

    let first = markup[1..].chars().next()?;
    if !(first.is_ascii_alphabetic() || matches!(first, '/' | '!' | '?')) {
        return None;
    }

    let after_tag = match markup.find('>') {
        Some(end) => end + 1,
        None => return Some(""),
    };

    let tag_name = markup[1..after_tag]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    if RAW_TEXT_ELEMENTS.contains(&tag_name.as_str()) {
        let contents = &markup[after_tag..];
        let closing = format!("</{tag_name}");
        return Some(match find_ignore_ascii_case(contents, &closing) {
            Some(start) => match contents[start..].find('>') {
                Some(end) => &contents[start + end + 1..],
                None => "",
            },
            None => "",
        });
    }

    Some(&markup[after_tag..])
}

/// Byte offset of the first ASCII-case-insensitive match of `needle`.
fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Decodes HTML character references; unknown names are left as written.
pub fn decode_entities(text: &str) -> String {
    ENTITY_REGEX
        .replace_all(text, |caps: &Captures<'_>| {
            let name = &caps[1];
            let decoded = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                named_entity(name)
            };
            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{00A0}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "shy" => '\u{00AD}',
        "rsquo" => '\u{2019}',
        "lsquo" => '\u{2018}',
        "rdquo" => '\u{201D}',
        "ldquo" => '\u{201C}',
        "hellip" => '\u{2026}',
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_nodes_become_lines() {
        let html = "<h2>Schedule</h2><ul><li>Midterm</li><li>Oct 3</li></ul>";
        assert_eq!(html_to_text(html), "Schedule\nMidterm\nOct 3");
    }

    #[test]
    fn inline_markup_splits_text() {
        assert_eq!(html_to_text("Final <b>Exam</b> Dec 11"), "Final \nExam\n Dec 11");
    }

    #[test]
    fn whitespace_only_nodes_are_skipped() {
        let html = "<p>Final Exam</p>\n  <p>Dec 11</p>\n";
        assert_eq!(html_to_text(html), "Final Exam\nDec 11");
    }

    #[test]
    fn drops_comments_scripts_and_styles() {
        let html = "<!-- exam Dec 1 --><style>p{}</style><p>Quiz</p><SCRIPT>var x = '<p>';</SCRIPT>";
        assert_eq!(html_to_text(html), "Quiz");
    }

    #[test]
    fn raw_text_closer_matches_any_case() {
        let html = "<Script type=\"x\">café < “quiz” </sCrIpT ><p>Midterm</p><style>é</STYLE>";
        assert_eq!(html_to_text(html), "Midterm");
    }

    #[test]
    fn many_tags_in_a_long_body() {
        let html = "<td>x</td>".repeat(20_000) + "<p>Final Exam Dec 11</p>";
        let text = html_to_text(&html);
        assert!(text.ends_with("x\nFinal Exam Dec 11"));
        assert_eq!(text.lines().count(), 20_001);
    }

    #[test]
    fn attributes_are_not_text() {
        let html = r#"<a href="/files/final.pdf" title="Final">Download</a>"#;
        assert_eq!(html_to_text(html), "Download");
    }

    #[test]
    fn literal_less_than_is_text() {
        assert_eq!(html_to_text("<p>score < 50</p>"), "score < 50");
    }

    #[test]
    fn unterminated_tag_is_dropped() {
        assert_eq!(html_to_text("Exam<p class="), "Exam");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(html_to_text("no markup here"), "no markup here");
        assert_eq!(html_to_text(""), "");
    }

    mod entities {
        use super::*;

        #[test]
        fn named() {
            assert_eq!(decode_entities("A &amp; B &lt;C&gt;"), "A & B <C>");
            assert_eq!(decode_entities("2pm&ndash;3pm"), "2pm\u{2013}3pm");
        }

        #[test]
        fn numeric() {
            assert_eq!(decode_entities("&#8211;&#x2014;&#X41;"), "\u{2013}\u{2014}A");
        }

        #[test]
        fn unknown_is_kept() {
            assert_eq!(decode_entities("&bogus; &#xZZ;"), "&bogus; &#xZZ;");
        }

        #[test]
        fn nbsp_is_non_breaking_space() {
            assert_eq!(decode_entities("Dec&nbsp;11"), "Dec\u{00A0}11");
        }
    }
}
