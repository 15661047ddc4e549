//! Markup helpers used to derive and render notification content.
//!
//! - [`strip_tags`] derives plain text from rich content.
//! - [`texturize`] converts typewriter punctuation into typographic
//!   characters, leaving tags and preformatted blocks alone.
//! - [`autop`] wraps blank-line separated text into `<p>` blocks.
//! - [`escape_html`] escapes untrusted text before it is embedded in markup.

use std::sync::LazyLock;

use regex::Regex;

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

/// HTML comments, including an unterminated trailing comment.
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?(?:-->|$)").expect("valid regex"));

/// Opening, closing and declaration tags, including an unterminated trailing tag.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[a-zA-Z/!?][^>]*(?:>|$)").expect("valid regex"));

/// Tags and comments that [`texturize`] passes through verbatim.
static SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->|<[a-zA-Z/!?][^>]*>").expect("valid regex"));

/// One or more blank lines separating paragraphs.
static PARAGRAPH_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n\s*").expect("valid regex"));

/// A chunk that already starts with a block-level element.
static BLOCK_START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^<(?:p|div|ul|ol|li|dl|table|thead|tbody|tr|td|th|h[1-6]|blockquote|pre|hr|section|article|header|footer|address|form)[\s/>]",
    )
    .expect("valid regex")
});

/// Elements whose text content is never texturized.
const NO_TEXTURIZE_TAGS: &[&str] = &["code", "kbd", "pre", "script", "style", "tt"];

// ---------------------------------------------------------------------------
// strip_tags
// ---------------------------------------------------------------------------

/// Remove every tag and comment from `input`, keeping the text content.
///
/// Nested tags need no special handling since each tag is removed on its own.
pub fn strip_tags(input: &str) -> String {
    let without_comments = COMMENT_RE.replace_all(input, "");
    TAG_RE.replace_all(&without_comments, "").into_owned()
}

// ---------------------------------------------------------------------------
// texturize
// ---------------------------------------------------------------------------

/// Replace typewriter punctuation with typographic characters.
///
/// Only text outside tags is touched, and text inside `<pre>`, `<code>` and
/// similar elements is left as written.
pub fn texturize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev: Option<char> = None;
    let mut skip_depth = 0usize;
    let mut last = 0;

    for tag in SEGMENT_RE.find_iter(input) {
        push_text(&mut out, &input[last..tag.start()], skip_depth, &mut prev);
        skip_depth = track_verbatim_depth(tag.as_str(), skip_depth);
        out.push_str(tag.as_str());
        last = tag.end();
    }
    push_text(&mut out, &input[last..], skip_depth, &mut prev);

    out
}

fn push_text(out: &mut String, text: &str, skip_depth: usize, prev: &mut Option<char>) {
    if text.is_empty() {
        return;
    }
    if skip_depth > 0 {
        out.push_str(text);
        *prev = text.chars().last();
    } else {
        out.push_str(&texturize_text(text, prev));
    }
}

fn track_verbatim_depth(tag: &str, depth: usize) -> usize {
    let inner = tag.trim_start_matches('<');
    let (closing, rest) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, inner),
    };
    let name: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();

    if !NO_TEXTURIZE_TAGS.contains(&name.as_str()) {
        depth
    } else if closing {
        depth.saturating_sub(1)
    } else if tag.ends_with("/>") {
        depth
    } else {
        depth + 1
    }
}

fn texturize_text(text: &str, prev: &mut Option<char>) -> String {
    let replaced = text
        .replace("---", "\u{2014}")
        .replace(" -- ", " \u{2014} ")
        .replace("--", "\u{2013}")
        .replace("...", "\u{2026}")
        .replace("(tm)", "\u{2122}");

    let chars: Vec<char> = replaced.chars().collect();
    let mut out = String::with_capacity(replaced.len());

    for (i, &c) in chars.iter().enumerate() {
        let before = if i == 0 { *prev } else { Some(chars[i - 1]) };
        let opening =
            before.map_or(true, |b| b.is_whitespace() || "([{\u{2014}\u{2013}".contains(b));

        match c {
            '"' => out.push(if opening { '\u{201C}' } else { '\u{201D}' }),
            '\'' => out.push(if opening { '\u{2018}' } else { '\u{2019}' }),
            'x' if before.is_some_and(|b| b.is_ascii_digit())
                && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit()) =>
            {
                out.push('\u{00D7}')
            }
            _ => out.push(c),
        }
    }

    if let Some(&last) = chars.last() {
        *prev = Some(last);
    }
    out
}

// ---------------------------------------------------------------------------
// autop
// ---------------------------------------------------------------------------

/// Wrap blank-line separated chunks of `input` in `<p>` elements.
///
/// Single line breaks inside a paragraph become `<br />`. Chunks that already
/// open with a block-level element are emitted unchanged.
pub fn autop(input: &str) -> String {
    let normalized = input.replace("\r\n", "\n").replace('\r', "\n");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let mut out = String::with_capacity(trimmed.len() + 16);
    for chunk in PARAGRAPH_BREAK_RE.split(trimmed) {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            continue;
        }
        if BLOCK_START_RE.is_match(chunk) {
            out.push_str(chunk);
        } else {
            out.push_str("<p>");
            out.push_str(&chunk.replace('\n', "<br />\n"));
            out.push_str("</p>");
        }
        out.push('\n');
    }
    out
}

// ---------------------------------------------------------------------------
// escape_html
// ---------------------------------------------------------------------------

/// Escape the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
