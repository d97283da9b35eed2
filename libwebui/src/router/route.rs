//! Route value objects

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use url::form_urlencoded;

use super::page::{Page, UrlParam};

/// Query parameters of a route
///
/// Keys are unique. When a query string repeats a key, the first
/// occurrence wins, matching what `URLSearchParams.get` reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string, with or without the leading `?`
    pub fn parse(search: &str) -> Self {
        let search = search.strip_prefix('?').unwrap_or(search);
        let mut params = BTreeMap::new();
        for (key, value) in form_urlencoded::parse(search.as_bytes()) {
            params
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }
        Self(params)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Builder-style setter for a well-known parameter
    pub fn with(mut self, param: UrlParam, value: impl Into<String>) -> Self {
        self.set(param.key(), value);
        self
    }
}

/// Serializes as `application/x-www-form-urlencoded`, without a leading `?`
impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish();
        f.write_str(&encoded)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (key, value) in iter {
            params.set(key, value);
        }
        params
    }
}

/// Where the UI currently is
///
/// The router hands routes out as `Rc<Route<P>>` and never mutates one after
/// publishing it, so `Rc::ptr_eq` tells observers whether anything changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route<P: Page> {
    pub page: P,
    pub query_parameters: QueryParams,
}

impl<P: Page> Route<P> {
    pub fn new(page: P, query_parameters: QueryParams) -> Self {
        Self {
            page,
            query_parameters,
        }
    }

    /// URL of this route relative to the origin: `/page` or `/page?query`
    pub fn url(&self) -> String {
        let mut url = self.page.path();
        if !self.query_parameters.is_empty() {
            url.push('?');
            url.push_str(&self.query_parameters.to_string());
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::page::PasswordManagerPage;

    #[test]
    fn test_parse_with_and_without_question_mark() {
        assert_eq!(QueryParams::parse("?q=test"), QueryParams::parse("q=test"));
        assert_eq!(QueryParams::parse("?q=test").get("q"), Some("test"));
    }

    #[test]
    fn test_parse_decodes_percent_and_plus() {
        let params = QueryParams::parse("q=hello+world&site=a%26b");
        assert_eq!(params.get("q"), Some("hello world"));
        assert_eq!(params.get("site"), Some("a&b"));
    }

    #[test]
    fn test_first_duplicate_wins() {
        let params = QueryParams::parse("q=first&q=second");
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("q"), Some("first"));
    }

    #[test]
    fn test_empty_params_serialize_to_empty_string() {
        assert_eq!(QueryParams::new().to_string(), "");
        assert!(QueryParams::parse("").is_empty());
        assert!(QueryParams::parse("?").is_empty());
    }

    #[test]
    fn test_display_encodes() {
        let params: QueryParams = [("q", "a b&c")].into_iter().collect();
        assert_eq!(params.to_string(), "q=a+b%26c");
        assert_eq!(QueryParams::parse(&params.to_string()), params);
    }

    #[test]
    fn test_route_url() {
        let bare = Route::new(PasswordManagerPage::Checkup, QueryParams::new());
        assert_eq!(bare.url(), "/checkup");

        let searched = Route::new(
            PasswordManagerPage::Passwords,
            QueryParams::new().with(UrlParam::SearchTerm, "bank"),
        );
        assert_eq!(searched.url(), "/passwords?q=bank");
    }
}
