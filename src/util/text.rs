use scraper::Html;
use std::borrow::Cow;

/// Strips terminal control sequences and C0/DEL control characters.
///
/// Feed text ends up printed straight to the terminal, so ANSI CSI/OSC
/// sequences are removed whole. Tabs, newlines and carriage returns are kept.
/// Returns `Cow::Borrowed` when the input is already clean.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(is_unsafe_char) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\x1b' {
            if !is_unsafe_char(c) {
                out.push(c);
            }
            continue;
        }

        match chars.peek() {
            // CSI: parameters until a final byte in 0x40..=0x7e
            Some('[') => {
                chars.next();
                for c in chars.by_ref() {
                    if ('\x40'..='\x7e').contains(&c) {
                        break;
                    }
                }
            }
            // OSC: until BEL or ST (ESC \)
            Some(']') => {
                chars.next();
                while let Some(c) = chars.next() {
                    if c == '\x07' {
                        break;
                    }
                    if c == '\x1b' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    Cow::Owned(out)
}

fn is_unsafe_char(c: char) -> bool {
    c == '\x7f' || (c < '\x20' && !matches!(c, '\t' | '\n' | '\r'))
}

/// Renders an HTML fragment (typically an item description) as plain text.
///
/// Markup is dropped and entities are decoded; the text nodes are joined in
/// document order and surrounding whitespace is trimmed.
pub fn html_to_text(html: &str) -> String {
    if !html.contains('<') && !html.contains('&') {
        return html.trim().to_string();
    }

    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect();
    text.trim().to_string()
}

/// Turns an arbitrary title into a safe single-component file stem.
///
/// Path separators, characters reserved on common filesystems and control
/// characters become `_`; leading dots are dropped so the file is never
/// hidden or a relative path. An empty result falls back to `feed`.
pub fn sanitize_file_stem(title: &str) -> String {
    let replaced: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let stem = replaced.trim_start_matches('.').trim();
    if stem.is_empty() {
        "feed".to_string()
    } else {
        stem.to_string()
    }
}
