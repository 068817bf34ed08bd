//! Text formatting for cross-network display.
//!
//! Gitter speaks Markdown, Matrix gets plain text plus an optional HTML body.
//! Everything here is a pure function.

use fancy_regex::Regex;
use tracing::warn;

/// Escape the characters that are structural in Matrix HTML bodies.
///
/// `&` goes first so the entities produced for `<` and `>` are not escaped twice.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape a string so it matches literally when embedded in a regex.
pub fn quote_meta(s: &str) -> String {
    fancy_regex::escape(s).into_owned()
}

/// First word of `s`, including any whitespace in front of it.
pub fn first_word(s: &str) -> &str {
    let start = match s.find(|c: char| !c.is_whitespace()) {
        Some(start) => start,
        None => return "",
    };
    let end = s[start..]
        .find(char::is_whitespace)
        .map_or(s.len(), |len| start + len);
    &s[..end]
}

/// Last word of `s`, including any whitespace after it.
pub fn final_word(s: &str) -> &str {
    let trimmed = s.trim_end();
    if trimmed.is_empty() {
        return "";
    }
    let start = trimmed
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map_or(0, |(i, c)| i + c.len_utf8());
    &s[start..]
}

/// Turn `"@bob waves"` into `"waves"` when `bob` sent it.
pub fn strip_self_mention(body: &str, username: &str) -> String {
    strip_leading_pattern(body, &format!("^@{} ", quote_meta(username)))
}

/// HTML counterpart of [`strip_self_mention`].
///
/// Gitter renders the mention as `<span class="mention" ...>@bob</span>`, so
/// this is a best-effort match on that markup.
pub fn strip_self_mention_html(html: &str, username: &str) -> String {
    strip_leading_pattern(
        html,
        &format!("^<span [^>]+>@{}</span> ", quote_meta(username)),
    )
}

fn strip_leading_pattern(s: &str, pattern: &str) -> String {
    match Regex::new(pattern) {
        Ok(regex) => regex.replace(s, "").into_owned(),
        Err(e) => {
            warn!("Invalid mention pattern '{}': {}", pattern, e);
            s.to_string()
        }
    }
}

/// Wrap an emote in Markdown emphasis for Gitter, escaping any `*` inside it.
pub fn emote_for_remote(label: &str, body: &str) -> String {
    format!("*{}*", format!("{} {}", label, body).replace('*', "\\*"))
}

/// Prefix a message with the sender label in Markdown code notation.
pub fn code_prefixed(label: &str, body: &str) -> String {
    format!("`{}` {}", label, body)
}

/// HTML counterpart of [`code_prefixed`].
pub fn code_prefixed_html(label: &str, body: &str) -> String {
    format!("<code>{}</code> {}", escape_html(label), escape_html(body))
}
