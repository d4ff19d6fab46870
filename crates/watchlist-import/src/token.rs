use scraper::{Html, Selector};
use tracing::debug;

/// Form field IMDB's list-edit pages submit adds under. The name is an
/// obfuscated constant, not a per-session value.
pub const ADD_FORM_FIELD: &str = "49e6c";

/// Where a token came from, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    NamedInput,
    MetaTag,
    Cookie,
    FuzzyInput,
}

impl TokenSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenSource::NamedInput => "named input",
            TokenSource::MetaTag => "meta tag",
            TokenSource::Cookie => "cookie",
            TokenSource::FuzzyInput => "fuzzy input",
        }
    }
}

/// Find the CSRF token on a list-edit page, trying strategies from most
/// to least specific: the known form field, a csrf meta tag, a csrf
/// cookie, then any input whose name mentions csrf.
pub fn discover_token(html: &str, cookie_header: &str) -> Option<(String, TokenSource)> {
    let document = Html::parse_document(html);

    if let Some(value) = input_value(&document, &format!(r#"input[name="{}"]"#, ADD_FORM_FIELD)) {
        debug!("Token found in the named form input");
        return Some((value, TokenSource::NamedInput));
    }

    if let Ok(selector) = Selector::parse(r#"meta[name="csrf-token"]"#) {
        if let Some(content) = document
            .select(&selector)
            .next()
            .and_then(|meta| meta.value().attr("content"))
            .map(str::trim)
            .filter(|c| !c.is_empty())
        {
            debug!("Token found in the csrf meta tag");
            return Some((content.to_string(), TokenSource::MetaTag));
        }
    }

    if let Some(value) = csrf_cookie_value(cookie_header) {
        debug!("Token found in a csrf cookie");
        return Some((value, TokenSource::Cookie));
    }

    if let Some(value) = fuzzy_csrf_input(&document) {
        debug!("Token found in a fuzzy csrf input");
        return Some((value, TokenSource::FuzzyInput));
    }

    None
}

fn input_value(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn csrf_cookie_value(cookie_header: &str) -> Option<String> {
    cookie_header.split(';').find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        if name.trim().to_lowercase().contains("csrf") {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        } else {
            None
        }
    })
}

fn fuzzy_csrf_input(document: &Html) -> Option<String> {
    let selector = Selector::parse("input[name]").ok()?;
    document.select(&selector).find_map(|input| {
        let name = input.value().attr("name")?;
        if !name.to_lowercase().contains("csrf") {
            return None;
        }
        input
            .value()
            .attr("value")
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_input_wins_over_everything() {
        let html = r#"
            <form>
                <input name="49e6c" value="token-a">
                <input name="csrf_token" value="token-b">
            </form>
            <meta name="csrf-token" content="token-c">
        "#;
        let (token, source) = discover_token(html, "csrf=token-d").unwrap();
        assert_eq!(token, "token-a");
        assert_eq!(source, TokenSource::NamedInput);
    }

    #[test]
    fn test_meta_tag_is_second_choice() {
        let html = r#"<head><meta name="csrf-token" content="meta-token"></head>"#;
        let (token, source) = discover_token(html, "").unwrap();
        assert_eq!(token, "meta-token");
        assert_eq!(source, TokenSource::MetaTag);
    }

    #[test]
    fn test_cookie_is_third_choice() {
        let html = "<html><body></body></html>";
        let cookies = "session-id=abc123; x-csrf-state=cookie-token; uu=xyz";
        let (token, source) = discover_token(html, cookies).unwrap();
        assert_eq!(token, "cookie-token");
        assert_eq!(source, TokenSource::Cookie);
    }

    #[test]
    fn test_fuzzy_input_is_the_last_resort() {
        let html = r#"<form><input name="list_csrf" value="fuzzy-token"></form>"#;
        let (token, source) = discover_token(html, "session-id=abc").unwrap();
        assert_eq!(token, "fuzzy-token");
        assert_eq!(source, TokenSource::FuzzyInput);
    }

    #[test]
    fn test_no_token_anywhere() {
        assert!(discover_token("<html></html>", "session-id=abc").is_none());
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let html = r#"<input name="49e6c" value="">
                      <meta name="csrf-token" content="real-token">"#;
        let (token, source) = discover_token(html, "").unwrap();
        assert_eq!(token, "real-token");
        assert_eq!(source, TokenSource::MetaTag);
    }
}
