// src/text/normalize.rs
use once_cell::sync::Lazy;
use regex::Regex;

/// `MSRP` followed by an optional `$` and a price with optional thousands
/// separators and up to two decimals.
static MSRP_PRICE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)MSRP\s*\$?\s*(\d[\d,]*\.?\d{0,2})").expect("valid MSRP price pattern")
});

const MSRP: &str = "MSRP";

/// Remove every ASCII case-insensitive occurrence of `token`, then trim.
///
/// Removal is repeated until nothing matches, since taking a token out can
/// splice a new one together (`"ststockock"`).
pub fn remove_substring(text: &str, token: &str) -> String {
    if token.is_empty() {
        return text.trim().to_string();
    }
    let needle = token.to_ascii_lowercase();
    let mut out = text.to_string();
    // ASCII lowercasing keeps byte offsets identical to `out`.
    while let Some(start) = out.to_ascii_lowercase().find(&needle) {
        out.replace_range(start..start + needle.len(), "");
    }
    out.trim().to_string()
}

/// Rewrite whole-word `msrp` (any case) to `MSRP`. Word edges are any
/// non-alphanumeric neighbour or the ends of the string.
pub fn normalize_msrp_token(text: &str) -> String {
    // ASCII lowercasing keeps byte offsets identical to `text`.
    let lower = text.to_ascii_lowercase();
    let needle = "msrp";
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for (start, _) in lower.match_indices(needle) {
        let end = start + needle.len();
        let before_ok = text[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = text[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if before_ok && after_ok {
            out.push_str(&text[last..start]);
            out.push_str(MSRP);
            last = end;
        }
    }
    out.push_str(&text[last..]);
    out
}

/// Capitalize each word while reproducing the original whitespace exactly.
/// Words starting with `MSRP` (any case) are left as they are.
pub fn capitalize_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word = String::new();

    for c in text.chars() {
        if c.is_whitespace() {
            flush_word(&mut word, &mut out);
            out.push(c);
        } else {
            word.push(c);
        }
    }
    flush_word(&mut word, &mut out);
    out
}

fn flush_word(word: &mut String, out: &mut String) {
    if word.is_empty() {
        return;
    }
    if word.to_uppercase().starts_with(MSRP) {
        out.push_str(word);
    } else {
        out.push_str(&capitalize(word));
    }
    word.clear();
}

/// First character upper, the rest lower.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// `MSRP $1,234.50` → `MSRP USD 1,234.50`; the number is kept verbatim.
pub fn format_msrp_price(text: &str) -> String {
    MSRP_PRICE
        .replace_all(text, |caps: &regex::Captures| format!("MSRP USD {}", &caps[1]))
        .into_owned()
}
