//! Display labels for property keys.

use once_cell::sync::Lazy;
use regex::Regex;

/// An uppercase letter anywhere after the first character
static UPPERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([A-Z])").expect("valid regex"));

/// "Today" followed by exactly one word
static TODAY_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(Today)\s([0-9A-Za-z_]+)").expect("valid regex"));

/// Turns a camelCase property key into a display label.
///
/// Steps, in order: space before each inner uppercase letter, capitalize the
/// first character, collapse the first `" Per One "` into `/`, then move the
/// first word after `Today` in front of it.
///
/// ```
/// use choropleth::format_label;
///
/// assert_eq!(format_label("casesPerOneMillion"), "Cases/Million");
/// assert_eq!(format_label("todayCases"), "Cases Today");
/// ```
pub fn format_label(key: &str) -> String {
    let mut chars = key.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let rest = UPPERCASE.replace_all(chars.as_str(), " $1");

    let mut capped: String = first.to_uppercase().collect();
    capped.push_str(&rest);

    let shrunk = capped.replacen(" Per One ", "/", 1);

    TODAY_WORD.replace(&shrunk, "$2 $1").into_owned()
}
