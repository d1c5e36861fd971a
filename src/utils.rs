//! Utility functions and helpers

use crate::error::{Result, RequestsError};
use std::collections::BTreeMap;
use url::{form_urlencoded, Position, Url};

/// Multi-valued parameter map: key to values in insertion order
pub type Params = BTreeMap<String, Vec<String>>;

/// A URL split into its base and the parameters of its query string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUrl {
    /// `scheme://host[:port]/path`
    pub base: String,
    pub params: Params,
}

/// URL validation and parsing utilities
pub struct UrlUtils;

impl UrlUtils {
    /// Resolve a caller supplied URL, defaulting to `http://` when no scheme is given.
    ///
    /// Only HTTP and HTTPS URLs are accepted. Query string, fragment and
    /// userinfo are stripped from the returned base.
    pub fn resolve(input: &str) -> Result<ResolvedUrl> {
        let url = match (Self::explicit_scheme(input), Url::parse(input)) {
            (_, Ok(url)) if Self::is_http(&url) => url,
            (Some(_), Ok(_)) => return Err(Self::unsupported_scheme(input)),
            (Some(_), Err(e)) => {
                return Err(RequestsError::InvalidUrl(format!(
                    "Invalid URL '{}': {}",
                    input, e
                )))
            }
            (None, _) => Url::parse(&format!("http://{}", input)).map_err(|e| {
                RequestsError::InvalidUrl(format!("Invalid URL '{}': {}", input, e))
            })?,
        };

        let base = format!(
            "{}://{}{}",
            url.scheme(),
            &url[Position::BeforeHost..Position::AfterPort],
            url.path()
        );

        let mut params = Params::new();
        for (key, value) in url.query_pairs() {
            params
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }

        Ok(ResolvedUrl { base, params })
    }

    /// Scheme of a leading `scheme://` prefix, if the input has one
    fn explicit_scheme(input: &str) -> Option<&str> {
        let (scheme, _) = input.split_once("://")?;
        let mut chars = scheme.chars();
        let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        valid.then_some(scheme)
    }

    fn is_http(url: &Url) -> bool {
        matches!(url.scheme(), "http" | "https")
    }

    fn unsupported_scheme(input: &str) -> RequestsError {
        RequestsError::InvalidUrl(format!(
            "'{}': only HTTP and HTTPS are accepted",
            input
        ))
    }
}

/// Parameter encoding utilities
pub struct ParamUtils;

impl ParamUtils {
    /// Encode parameters as `application/x-www-form-urlencoded`, keys sorted.
    pub fn encode(params: &Params) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, values) in params {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }

    /// Encode a single key with all of its values.
    pub fn encode_pair(key: &str, values: &[String]) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for value in values {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }
}
