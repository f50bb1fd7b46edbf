//! Local HTML helpers for the formatting stage
//!
//! `render_markdown` is the deterministic fallback used when the HTML
//! converter is in local mode or the model answers without markup. It covers
//! what draft agents actually produce: paragraphs, bullet and numbered lists,
//! `**bold**` and `*emphasis*`. All text is escaped before markup is added.

/// Escape text for inclusion in HTML
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

/// Contents of the first Markdown code fence (```html ... ```), wherever it
/// appears; text without a fence is returned trimmed
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };
    let rest = &trimmed[start + 3..];
    // Drop the info string (e.g. "html") on the opening line
    let body = match rest.find('\n') {
        Some(i) => &rest[i + 1..],
        None => rest,
    };
    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

/// Whether the text already contains HTML markup
pub fn looks_like_html(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    let has_open_tag = lower.match_indices('<').any(|(i, _)| {
        lower[i + 1..].starts_with(|c: char| c.is_ascii_alphabetic()) && lower[i..].contains('>')
    });
    has_open_tag && (lower.contains("</") || lower.contains("/>") || lower.contains("<br"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Paragraph,
    Bullets,
    Numbered,
}

/// Render a plain-text/Markdown email body as simple HTML
pub fn render_markdown(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");
    let mut html = Vec::new();

    for block in normalized.split("\n\n") {
        let lines: Vec<&str> = block
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if lines.is_empty() {
            continue;
        }

        let kind = if lines.iter().all(|l| bullet_item(l).is_some()) {
            Block::Bullets
        } else if lines.iter().all(|l| numbered_item(l).is_some()) {
            Block::Numbered
        } else {
            Block::Paragraph
        };

        match kind {
            Block::Paragraph => {
                let body: Vec<String> = lines.iter().map(|l| render_inline(l)).collect();
                html.push(format!("<p>{}</p>", body.join("<br>\n")));
            }
            Block::Bullets | Block::Numbered => {
                let tag = if kind == Block::Bullets { "ul" } else { "ol" };
                let items: String = lines
                    .iter()
                    .filter_map(|l| bullet_item(l).or_else(|| numbered_item(l)))
                    .map(|item| format!("<li>{}</li>", render_inline(item)))
                    .collect();
                html.push(format!("<{tag}>{items}</{tag}>"));
            }
        }
    }

    html.join("\n")
}

fn bullet_item(line: &str) -> Option<&str> {
    line.strip_prefix("- ").or_else(|| line.strip_prefix("* "))
}

fn numbered_item(line: &str) -> Option<&str> {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    line[digits..]
        .strip_prefix(". ")
        .or_else(|| line[digits..].strip_prefix(") "))
}

fn render_inline(text: &str) -> String {
    let escaped = escape_html(text);
    let bold = wrap_pairs(&escaped, "**", "strong");
    wrap_pairs(&bold, "*", "em")
}

/// Replace paired `marker`s with `<tag>`/`</tag>`; an unpaired trailing marker is kept
fn wrap_pairs(text: &str, marker: &str, tag: &str) -> String {
    let parts: Vec<&str> = text.split(marker).collect();
    if parts.len() < 3 {
        return text.to_string();
    }

    let paired = (parts.len() - 1) / 2 * 2;
    let mut out = String::with_capacity(text.len() + 8);
    out.push_str(parts[0]);
    for (i, part) in parts.iter().enumerate().skip(1) {
        if i <= paired {
            if i % 2 == 1 {
                out.push_str(&format!("<{tag}>"));
            } else {
                out.push_str(&format!("</{tag}>"));
            }
        } else {
            out.push_str(marker);
        }
        out.push_str(part);
    }
    out
}
