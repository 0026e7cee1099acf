//! Markdown-like assistant output to HTML
//!
//! Supports the small subset the system prompt asks the model to use:
//! `#` headings, `**bold**`, `-`/`*`/`•` bullets and paragraphs. Everything
//! else is escaped and rendered as text.

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// `**text**` to `<strong>text</strong>`, an unpaired marker is left as is
fn inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("**") {
        let after = &rest[start + 2..];
        match after.find("**") {
            Some(end) if end > 0 => {
                out.push_str(&rest[..start]);
                out.push_str("<strong>");
                out.push_str(&after[..end]);
                out.push_str("</strong>");
                rest = &after[end + 2..];
            }
            _ => break,
        }
    }
    out.push_str(rest);
    out
}

fn heading(line: &str) -> Option<&str> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if !(1..=3).contains(&hashes) {
        return None;
    }
    line[hashes..]
        .strip_prefix(' ')
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn bullet(line: &str) -> Option<&str> {
    ["- ", "* ", "• "]
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
        .map(str::trim)
}

enum Open {
    Nothing,
    Paragraph(Vec<String>),
    List(Vec<String>),
}

fn close(open: &mut Open, html: &mut String) {
    match std::mem::replace(open, Open::Nothing) {
        Open::Nothing => {}
        Open::Paragraph(lines) => {
            html.push_str("<p>");
            html.push_str(&lines.join("<br>"));
            html.push_str("</p>");
        }
        Open::List(items) => {
            html.push_str("<ul class=\"chat-list\">");
            for item in items {
                html.push_str("<li>");
                html.push_str(&item);
                html.push_str("</li>");
            }
            html.push_str("</ul>");
        }
    }
}

/// Render assistant text as HTML for the chat panel
#[must_use]
pub fn to_html(text: &str) -> String {
    let escaped = escape_html(text.trim());
    let mut html = String::new();
    let mut open = Open::Nothing;

    for raw in escaped.lines() {
        let line = raw.trim();
        if line.is_empty() {
            close(&mut open, &mut html);
            continue;
        }

        if let Some(title) = heading(line) {
            close(&mut open, &mut html);
            html.push_str("<h3 class=\"chat-heading\">");
            html.push_str(&inline(title));
            html.push_str("</h3>");
        } else if let Some(item) = bullet(line) {
            if !matches!(open, Open::List(_)) {
                close(&mut open, &mut html);
                open = Open::List(Vec::new());
            }
            if let Open::List(items) = &mut open {
                items.push(inline(item));
            }
        } else {
            if !matches!(open, Open::Paragraph(_)) {
                close(&mut open, &mut html);
                open = Open::Paragraph(Vec::new());
            }
            if let Open::Paragraph(lines) = &mut open {
                lines.push(inline(line));
            }
        }
    }
    close(&mut open, &mut html);
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("# Day one", "<h3 class=\"chat-heading\">Day one</h3>")]
    #[case("### Where to eat", "<h3 class=\"chat-heading\">Where to eat</h3>")]
    #[case("Try **paella** here", "<p>Try <strong>paella</strong> here</p>")]
    #[case("line one\nline two", "<p>line one<br>line two</p>")]
    #[case("first\n\nsecond", "<p>first</p><p>second</p>")]
    #[case("#hashtag", "<p>#hashtag</p>")]
    #[case("**unclosed", "<p>**unclosed</p>")]
    fn test_blocks(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(to_html(input), expected);
    }

    #[test]
    fn test_bullets_become_one_list() {
        let html = to_html("Pack:\n- sunscreen\n* a **hat**\n• water");
        assert_eq!(
            html,
            "<p>Pack:</p><ul class=\"chat-list\"><li>sunscreen</li><li>a <strong>hat</strong></li><li>water</li></ul>"
        );
    }

    #[test]
    fn test_markup_is_escaped() {
        let html = to_html("<script>alert('x')</script> & more");
        assert_eq!(
            html,
            "<p>&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; more</p>"
        );
    }
}
