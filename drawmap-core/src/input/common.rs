//! Helpers shared by the report parsers

use once_cell::sync::Lazy;
use regex::Regex;

static ACCURACY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\((\d+)%\)").expect("accuracy pattern is valid"));

static ACCURACY_STRIP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\(\d+%\)\s*").expect("accuracy strip pattern is valid"));

/// Extracts the leading guess from an OS guess list
///
/// Nmap prints guesses as `"Linux 5.4 (95%), Linux 5.10 (93%), ..."`. Only the first entry
/// is kept; its `(NN%)` annotation becomes the accuracy and is removed from the label.
///
/// # Examples
///
/// ```
/// use drawmap_core::input::common::first_guess;
///
/// assert_eq!(
///     first_guess("Linux 5.4 (95%), Linux 5.10 (93%)"),
///     (Some("Linux 5.4".to_string()), Some(95))
/// );
/// assert_eq!(first_guess("FreeBSD 13.1"), (Some("FreeBSD 13.1".to_string()), None));
/// assert_eq!(first_guess(""), (None, None));
/// ```
pub fn first_guess(list: &str) -> (Option<String>, Option<u32>) {
    if list.is_empty() {
        return (None, None);
    }

    let first = list.split(',').next().unwrap_or_default().trim();

    let accuracy = ACCURACY_RE
        .captures(first)
        .and_then(|caps| caps[1].parse::<u32>().ok());

    let label = ACCURACY_STRIP_RE.replace_all(first, "");
    let label = label.trim();

    if label.is_empty() {
        (None, accuracy)
    } else {
        (Some(label.to_string()), accuracy)
    }
}

/// Normalises Windows line endings so line-anchored patterns behave the same everywhere
pub fn normalize_newlines(text: &str) -> std::borrow::Cow<'_, str> {
    if text.contains("\r\n") {
        std::borrow::Cow::Owned(text.replace("\r\n", "\n"))
    } else {
        std::borrow::Cow::Borrowed(text)
    }
}
