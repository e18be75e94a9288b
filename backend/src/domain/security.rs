//! Heuristic injection detectors and storage sanitisers.
//!
//! These are pattern matchers, not parsers: they err on the side of flagging
//! and will produce false positives on unusual but benign text. Every function
//! is pure and total.

use std::sync::OnceLock;

use regex::Regex;

/// Characters treated as SQL metacharacters by [`is_sql_injection_attempt`].
pub const SQL_METACHARACTERS: [char; 5] = ['\'', '"', ';', '\\', '-'];

/// Entities emitted by the encoder. An ampersand already opening one of these
/// is left alone so sanitising twice changes nothing.
const ENCODED_ENTITIES: [&str; 5] = ["&lt;", "&gt;", "&quot;", "&#39;", "&amp;"];

static SQL_KEYWORD_RE: OnceLock<Regex> = OnceLock::new();
static XSS_RE: OnceLock<Regex> = OnceLock::new();
static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();
static TAG_RE: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("security pattern failed to compile: {error}"))
    })
}

fn sql_keyword_regex() -> &'static Regex {
    compiled(
        &SQL_KEYWORD_RE,
        r"(?i)\b(union|select|insert|update|delete|drop|create|alter|exec|execute|script|declare|truncate)\b",
    )
}

fn xss_regex() -> &'static Regex {
    compiled(
        &XSS_RE,
        r"(?i)<(script|iframe|object|embed|form|input|link|style|img|svg|math)[^>]*>|<[^>]*on\w+\s*=|javascript:|data:text/html|vbscript:",
    )
}

fn whitespace_regex() -> &'static Regex {
    compiled(&WHITESPACE_RE, r"\s+")
}

fn tag_regex() -> &'static Regex {
    compiled(&TAG_RE, r"<[^>]*>")
}

/// Whether `text` looks like an SQL injection attempt.
///
/// Flags any SQL keyword appearing as a whole word, case-insensitively, or
/// any of [`SQL_METACHARACTERS`]. Blank text is never flagged.
///
/// # Examples
/// ```
/// use applicant_backend::domain::security::is_sql_injection_attempt;
///
/// assert!(is_sql_injection_attempt("1 UNION SELECT password"));
/// assert!(is_sql_injection_attempt("x'; --"));
/// assert!(!is_sql_injection_attempt("Selection Committee"));
/// ```
#[must_use]
pub fn is_sql_injection_attempt(text: &str) -> bool {
    is_sql_injection_attempt_allowing(text, &[])
}

/// [`is_sql_injection_attempt`] for fields whose grammar admits some
/// metacharacters, such as the hyphen and apostrophe in personal names.
///
/// Keywords are always flagged; metacharacters listed in `admitted` are not.
#[must_use]
pub fn is_sql_injection_attempt_allowing(text: &str, admitted: &[char]) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    if sql_keyword_regex().is_match(text) {
        return true;
    }
    text.chars()
        .any(|c| SQL_METACHARACTERS.contains(&c) && !admitted.contains(&c))
}

/// Whether `text` looks like a cross-site scripting attempt.
///
/// # Examples
/// ```
/// use applicant_backend::domain::security::is_xss_attempt;
///
/// assert!(is_xss_attempt("<script>alert(1)</script>"));
/// assert!(is_xss_attempt("<a href=x onclick = 'steal()'>"));
/// assert!(!is_xss_attempt("5 < 6 and 7 > 3"));
/// ```
#[must_use]
pub fn is_xss_attempt(text: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    xss_regex().is_match(text)
}

/// Normalise free text for storage.
///
/// Strips NUL and SUB, collapses whitespace runs to one space, trims, and
/// entity-encodes `<`, `>`, `"`, `'` and `&`. Whitespace-only input is
/// returned unchanged. Idempotent.
///
/// # Examples
/// ```
/// use applicant_backend::domain::security::sanitize_input;
///
/// let once = sanitize_input("  Tom   & <Jerry>\0 ");
/// assert_eq!(once, "Tom &amp; &lt;Jerry&gt;");
/// assert_eq!(sanitize_input(&once), once);
/// ```
#[must_use]
pub fn sanitize_input(text: &str) -> String {
    if text.trim().is_empty() {
        return text.to_owned();
    }
    let stripped: String = text.chars().filter(|c| !matches!(c, '\0' | '\u{1A}')).collect();
    let collapsed = whitespace_regex().replace_all(&stripped, " ");
    encode_entities(collapsed.trim())
}

/// Remove every `<...>` construct, then sanitise the remainder like
/// [`sanitize_input`].
///
/// # Examples
/// ```
/// use applicant_backend::domain::security::sanitize_html;
///
/// assert_eq!(sanitize_html("<b>Bold</b> \"move\""), "Bold &quot;move&quot;");
/// ```
#[must_use]
pub fn sanitize_html(text: &str) -> String {
    let without_tags = tag_regex().replace_all(text, "");
    sanitize_input(&without_tags)
}

fn encode_entities(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    for (index, c) in text.char_indices() {
        match c {
            '<' => encoded.push_str("&lt;"),
            '>' => encoded.push_str("&gt;"),
            '"' => encoded.push_str("&quot;"),
            '\'' => encoded.push_str("&#39;"),
            '&' if opens_encoded_entity(text.get(index..).unwrap_or_default()) => encoded.push('&'),
            '&' => encoded.push_str("&amp;"),
            other => encoded.push(other),
        }
    }
    encoded
}

fn opens_encoded_entity(rest: &str) -> bool {
    ENCODED_ENTITIES.iter().any(|entity| rest.starts_with(entity))
}
