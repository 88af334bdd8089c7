//! Small helpers shared by the pages (form events, confirmations, filters…).

use wasm_bindgen::JsCast;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::api::ApiError;

/// Current value of the `<input>`, `<select>` or `<textarea>` that fired `e`.
pub fn input_value<E: AsRef<Event>>(e: &E) -> String {
    let Some(target) = e.as_ref().target() else {
        return String::new();
    };
    if let Some(input) = target.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(select) = target.dyn_ref::<HtmlSelectElement>() {
        select.value()
    } else if let Some(area) = target.dyn_ref::<HtmlTextAreaElement>() {
        area.value()
    } else {
        String::new()
    }
}

pub fn input_checked<E: AsRef<Event>>(e: &E) -> bool {
    e.as_ref()
        .target()
        .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
        .is_some_and(|i| i.checked())
}

/// Browser confirm dialog.
pub fn confirm(message: &str) -> bool {
    gloo_dialogs::confirm(message)
}

/// Backend message when there is one, the page's own wording otherwise.
pub fn failure_text(err: &ApiError, fallback: &str) -> String {
    err.backend_message()
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

/// Case-insensitive substring test on optional text.
pub fn contains_ci(haystack: Option<&str>, needle_lower: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(needle_lower))
}

/// The search needle, or `None` while the term is too short to filter on.
pub fn search_needle(term: &str, min_len: usize) -> Option<String> {
    let term = term.trim();
    (term.chars().count() >= min_len).then(|| term.to_lowercase())
}

pub fn parse_or<T: std::str::FromStr>(raw: &str, default: T) -> T {
    raw.trim().parse().unwrap_or(default)
}

/// Empty input means "no value".
pub fn non_empty(raw: String) -> Option<String> {
    (!raw.trim().is_empty()).then_some(raw)
}

pub fn text_or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".into(),
    }
}

pub fn format_money(value: f64) -> String {
    format!("{value:.2} €")
}

/// Current calendar year according to the browser clock.
pub fn current_year() -> i32 {
    js_sys::Date::new_0().get_full_year() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needle_needs_min_length() {
        assert_eq!(search_needle(" a ", 2), None);
        assert_eq!(search_needle("Ab", 2).as_deref(), Some("ab"));
        assert_eq!(search_needle("", 2), None);
    }

    #[test]
    fn contains_is_case_insensitive() {
        assert!(contains_ci(Some("KHM Slider"), "slider"));
        assert!(!contains_ci(None, "x"));
    }

    #[test]
    fn failure_text_prefers_backend_message() {
        let e = ApiError::Http {
            status: 409,
            message: Some("Duplicate".into()),
        };
        assert_eq!(failure_text(&e, "Failed"), "Duplicate");
        let bare = ApiError::Http { status: 500, message: None };
        assert_eq!(failure_text(&bare, "Failed to save"), "Failed to save");
        assert_eq!(failure_text(&ApiError::NotFound, "Failed"), "Failed");
        assert_eq!(
            failure_text(&ApiError::Network("offline".into()), "Failed to fetch"),
            "Failed to fetch"
        );
    }

    #[test]
    fn small_formatters() {
        assert_eq!(parse_or("12", 0_i64), 12);
        assert_eq!(parse_or("x", 3_i64), 3);
        assert_eq!(non_empty("  ".into()), None);
        assert_eq!(text_or_dash(Some("")), "-");
        assert_eq!(format_money(3.2), "3.20 €");
    }
}
