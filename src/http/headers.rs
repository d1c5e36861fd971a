//! Outgoing header normalization

use crate::error::{Result, RequestsError};
use crate::utils::Params;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, USER_AGENT};

/// Build the outgoing header map from caller headers.
///
/// Adds `Accept: */*` and `User-Agent: <user_agent>` when the caller did
/// not set them. Header names are matched case-insensitively.
pub fn normalize_headers(headers: &Params, user_agent: &str) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (key, values) in headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| RequestsError::InvalidHeader(format!("'{}': {}", key, e)))?;
        for value in values {
            let value = HeaderValue::from_str(value)
                .map_err(|e| RequestsError::InvalidHeader(format!("'{}': {}", key, e)))?;
            map.append(name.clone(), value);
        }
    }

    if !map.contains_key(ACCEPT) {
        map.insert(ACCEPT, HeaderValue::from_static("*/*"));
    }
    if !map.contains_key(USER_AGENT) {
        let value = HeaderValue::from_str(user_agent)
            .map_err(|e| RequestsError::InvalidHeader(format!("User-Agent: {}", e)))?;
        map.insert(USER_AGENT, value);
    }

    Ok(map)
}
