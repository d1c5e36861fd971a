//! Session cookie merging
//!
//! Default cookies of a session are written into the cookie jar before a
//! request is sent, unless the jar already holds a cookie of that name
//! for the target URL.

use reqwest::cookie::{CookieStore, Jar};
use std::collections::HashMap;
use url::Url;

/// Lifetime of injected session cookies: seven days
pub const DEFAULT_COOKIE_MAX_AGE: u64 = 3600 * 24 * 7;

/// A name/value cookie pair as carried by a `Cookie` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

/// Parse a `Cookie` header value (`a=1; b=2`)
pub fn parse_cookie_header(header: &str) -> Vec<Cookie> {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            if name.is_empty() {
                return None;
            }
            Some(Cookie {
                name: name.to_string(),
                value: value.to_string(),
            })
        })
        .collect()
}

/// Whether a cookie survives being written as `name=value; Max-Age=...`
pub fn is_storable(cookie: &Cookie) -> bool {
    !cookie.name.is_empty()
        && !cookie
            .name
            .contains(|c: char| c == ';' || c == '=' || c.is_whitespace() || c.is_control())
        && !cookie
            .value
            .contains(|c: char| c == ';' || c.is_control())
}

/// Defaults whose name is absent from `existing`, sorted by name
pub fn missing_defaults(existing: &[Cookie], defaults: &HashMap<String, String>) -> Vec<Cookie> {
    let mut missing: Vec<Cookie> = defaults
        .iter()
        .filter(|(name, _)| !existing.iter().any(|c| &c.name == *name))
        .map(|(name, value)| Cookie {
            name: name.clone(),
            value: value.clone(),
        })
        .collect();
    missing.sort_by(|a, b| a.name.cmp(&b.name));
    missing
}

/// Cookies the jar would send to `url`
pub fn jar_cookies(jar: &Jar, url: &Url) -> Vec<Cookie> {
    jar.cookies(url)
        .and_then(|value| value.to_str().ok().map(parse_cookie_header))
        .unwrap_or_default()
}

/// Store every default cookie missing from the jar for `url`.
///
/// Cookies whose name or value cannot be written verbatim are skipped.
/// Returns the number of cookies added.
pub fn merge_into_jar(jar: &Jar, url: &Url, defaults: &HashMap<String, String>) -> usize {
    if defaults.is_empty() {
        return 0;
    }

    let existing = jar_cookies(jar, url);
    let mut added = 0;
    for cookie in missing_defaults(&existing, defaults) {
        if !is_storable(&cookie) {
            log::warn!(
                "skipping session cookie '{}': name or value contains a separator",
                cookie.name
            );
            continue;
        }
        log::trace!("adding session cookie '{}' for {}", cookie.name, url);
        jar.add_cookie_str(
            &format!(
                "{}={}; Max-Age={}",
                cookie.name, cookie.value, DEFAULT_COOKIE_MAX_AGE
            ),
            url,
        );
        added += 1;
    }
    added
}
