use std::sync::LazyLock;

use regex::Regex;

#[expect(clippy::unwrap_used, reason = "static regex pattern is compile-time validated")]
static SCRIPT_OR_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>|<!--.*?-->").unwrap()
});

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Visible text of an HTML page, one non-empty line per text run.
///
/// Every tag acts as a line break; scripts, styles and comments are dropped.
#[must_use]
pub fn html_to_lines(html: &str) -> Vec<String> {
    let cleaned = SCRIPT_OR_STYLE.replace_all(html, "\n");
    let mut text = String::with_capacity(cleaned.len());
    let mut in_tag = false;
    for ch in cleaned.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                text.push('\n');
            },
            _ if !in_tag => text.push(ch),
            _ => {},
        }
    }
    text.lines()
        .map(|line| normalize_ws(&decode_entities(line)))
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_tags_and_drops_scripts() {
        let html = r#"<html><head><style>.a{color:red}</style><script>var fnm = 1;</script></head>
            <body><div>Friday Night Magic &amp; Pizza</div><p>Draft   7pm<br>6/14/2024</p>
            <!-- commander hidden --></body></html>"#;
        assert_eq!(
            html_to_lines(html),
            vec!["Friday Night Magic & Pizza", "Draft 7pm", "6/14/2024"]
        );
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(html_to_lines("one\n\n  two  "), vec!["one", "two"]);
    }
}
