use serde::{Deserialize, Deserializer};

use crate::db::Page;

// `?page=abc` and a missing page both mean the first page, while a number too
// large for i64 is still a page past the end
pub fn deserialize_page_or_first<'de, D>(deserializer: D) -> Result<Page, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().map(parse_page).unwrap_or_default())
}

fn parse_page(value: &str) -> Page {
    let value = value.trim();
    if let Ok(page) = value.parse::<i64>() {
        return Page(page);
    }
    let (negative, digits) = match value.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Page::default();
    }
    if negative {
        Page(i64::MIN)
    } else {
        Page(i64::MAX)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Integer(i64),
    Float(f64),
}

/// Accepts a JSON string or number, yielding the number's decimal text.
pub fn deserialize_option_string_from_number<'de, D>(
    deserializer: D,
) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<TextOrNumber>::deserialize(deserializer)?;
    Ok(value.map(|value| match value {
        TextOrNumber::Text(text) => text,
        TextOrNumber::Integer(number) => number.to_string(),
        TextOrNumber::Float(number) => number.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use axum::extract::Query;
    use axum::http::Uri;
    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize)]
    struct PageQuery {
        #[serde(default, deserialize_with = "deserialize_page_or_first")]
        page: Page,
    }

    fn parse(query: &str) -> Page {
        let uri: Uri = format!("/questions?{query}").parse().unwrap();
        Query::<PageQuery>::try_from_uri(&uri).unwrap().0.page
    }

    #[test]
    fn numeric_page_is_kept() {
        assert_eq!(parse("page=3"), Page(3));
        assert_eq!(parse("page=-2"), Page(-2));
    }

    #[test]
    fn missing_or_garbage_page_falls_back_to_first() {
        assert_eq!(parse(""), Page(1));
        assert_eq!(parse("page=abc"), Page(1));
        assert_eq!(parse("page="), Page(1));
        assert_eq!(parse("page=12abc"), Page(1));
    }

    #[test]
    fn search_text_from_number() {
        #[derive(Deserialize)]
        struct Body {
            #[serde(default, deserialize_with = "deserialize_option_string_from_number")]
            term: Option<String>,
        }
        let term = |json: &str| serde_json::from_str::<Body>(json).unwrap().term;

        assert_eq!(term(r#"{"term": "abc"}"#).as_deref(), Some("abc"));
        assert_eq!(term(r#"{"term": 42}"#).as_deref(), Some("42"));
        assert_eq!(term(r#"{"term": 2.5}"#).as_deref(), Some("2.5"));
        assert_eq!(term("{}"), None);
        assert!(serde_json::from_str::<Body>(r#"{"term": [1]}"#).is_err());
    }

    #[test]
    fn overflowing_page_stays_out_of_range() {
        assert_eq!(parse("page=99999999999999999999"), Page(i64::MAX));
        assert_eq!(parse("page=-99999999999999999999"), Page(i64::MIN));
    }
}
